mod models;

pub use models::*;

/// Well-known resource types.
pub const TYPE_SERVICE: &str = "service";
pub const TYPE_TEMPLATE: &str = "template";
pub const TYPE_WIDGET: &str = "widget";

/// Vendor media types for content negotiation.
///
/// JSON payloads append a `+json` suffix; the archive media type carries
/// raw tar+zstd bytes.
pub mod media_type {
    pub const ERROR: &str = "application/vnd.crucible.error.v0";
    pub const NAMESPACE_INFO: &str = "application/vnd.crucible.namespace-info.v0";
    pub const NAMESPACE: &str = "application/vnd.crucible.namespace.v0";
    pub const NAMESPACE_LIST: &str = "application/vnd.crucible.namespace-list.v0";
    pub const RESOURCE_INFO: &str = "application/vnd.crucible.resource-info.v0";
    pub const RESOURCE: &str = "application/vnd.crucible.resource.v0";
    pub const RESOURCE_LIST: &str = "application/vnd.crucible.resource-list.v0";
    pub const VERSION_INFO: &str = "application/vnd.crucible.version-info.v0";
    pub const VERSION: &str = "application/vnd.crucible.version.v0";
    pub const VERSION_LIST: &str = "application/vnd.crucible.version-list.v0";
    pub const CHANNEL_INFO: &str = "application/vnd.crucible.channel-info.v0";
    pub const CHANNEL: &str = "application/vnd.crucible.channel.v0";
    pub const CHANNEL_LIST: &str = "application/vnd.crucible.channel-list.v0";
    pub const ARCHIVE: &str = "application/vnd.crucible.archive.v0";
}
