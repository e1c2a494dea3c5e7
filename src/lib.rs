//! # Crucible
//!
//! A content-addressed artifact registry, usable both as a standalone
//! server binary and as a library.
//!
//! Resources are organized as namespaces → resources → versions, with
//! channels as mutable pointers to versions. Each version can carry one
//! tar+zstd archive, stored on disk under its SHA-256 digest.
//!
//! ## Library Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use rusqlite::Connection;
//! use crucible::server::{create_router, AppState};
//! use crucible::store::SqlRegistry;
//!
//! let conn = Connection::open("./data/crucible.db").unwrap();
//! let registry = SqlRegistry::new(conn, "./data/archives").unwrap();
//!
//! let state = Arc::new(AppState {
//!     registry: Arc::new(registry),
//! });
//! let router = create_router(state);
//! // Serve with axum...
//! ```
//!
//! The [`reference`] module parses the wire syntax identifying resources
//! and constraining their versions (`widget myorg/mywidget >=1.0.0 <2.0.0`),
//! and the [`archive`] module packs and unpacks resource archives.

pub mod archive;
pub mod config;
pub mod error;
pub mod reference;
pub mod server;
pub mod store;
pub mod types;
