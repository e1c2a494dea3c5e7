mod db;
mod schema;
mod sql;
mod storage;
pub mod validate;

use std::io::Read;

pub use sql::SqlRegistry;

use crate::error::Result;
use crate::types::*;

/// Registry defines the artifact registry interface.
///
/// Implementations store namespaces, resources, versions, and channels
/// with referential integrity, plus a content-addressed archive per
/// version. [`SqlRegistry`] is the SQL-backed implementation; a remote
/// client can satisfy the same trait.
pub trait Registry: Send + Sync {
    // Namespace operations
    fn create_namespace(&self, info: &NamespaceInfo) -> Result<Namespace>;
    fn read_namespace(&self, namespace: &str) -> Result<Namespace>;
    fn update_namespace(&self, namespace: &str, info: &NamespaceInfo) -> Result<Namespace>;
    fn delete_namespace(&self, namespace: &str) -> Result<()>;
    fn list_namespaces(&self) -> Result<NamespaceList>;

    // Resource operations
    fn create_resource(&self, namespace: &str, info: &ResourceInfo) -> Result<Resource>;
    fn read_resource(&self, namespace: &str, resource: &str) -> Result<Resource>;
    fn update_resource(
        &self,
        namespace: &str,
        resource: &str,
        info: &ResourceInfo,
    ) -> Result<Resource>;
    fn delete_resource(&self, namespace: &str, resource: &str) -> Result<()>;
    fn list_resources(&self, namespace: &str) -> Result<ResourceList>;

    // Version operations
    fn create_version(&self, namespace: &str, resource: &str, info: &VersionInfo)
        -> Result<Version>;
    fn read_version(&self, namespace: &str, resource: &str, version: &str) -> Result<Version>;
    fn update_version(
        &self,
        namespace: &str,
        resource: &str,
        version: &str,
        info: &VersionInfo,
    ) -> Result<Version>;
    fn delete_version(&self, namespace: &str, resource: &str, version: &str) -> Result<()>;
    fn list_versions(&self, namespace: &str, resource: &str) -> Result<VersionList>;

    // Archive operations
    fn upload_archive(
        &self,
        namespace: &str,
        resource: &str,
        version: &str,
        reader: &mut dyn Read,
    ) -> Result<Version>;
    fn download_archive(
        &self,
        namespace: &str,
        resource: &str,
        version: &str,
    ) -> Result<Box<dyn Read + Send>>;

    // Channel operations
    fn create_channel(&self, namespace: &str, resource: &str, info: &ChannelInfo)
        -> Result<Channel>;
    fn read_channel(&self, namespace: &str, resource: &str, channel: &str) -> Result<Channel>;
    fn update_channel(
        &self,
        namespace: &str,
        resource: &str,
        channel: &str,
        info: &ChannelInfo,
    ) -> Result<Channel>;
    fn delete_channel(&self, namespace: &str, resource: &str, channel: &str) -> Result<()>;
    fn list_channels(&self, namespace: &str, resource: &str) -> Result<ChannelList>;
}
