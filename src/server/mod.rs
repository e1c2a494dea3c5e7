mod archives;
mod channels;
mod namespaces;
mod resources;
pub mod response;
mod router;
mod versions;

pub use router::{create_router, AppState};
