use std::fs;
use std::io::Read;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

use rusqlite::Connection;

use super::schema::SCHEMA;
use super::validate;
use super::Registry;
use crate::error::{Error, Result};
use crate::types::*;

// Namespace operation error messages
const MSG_CREATE_NAMESPACE: &str = "unable to create namespace due to internal error";
const MSG_RETRIEVE_NAMESPACE: &str = "unable to retrieve namespace information";
const MSG_SAVE_NAMESPACE: &str = "unable to save namespace changes";
const MSG_DELETE_NAMESPACE: &str = "unable to delete namespace - it may contain resources";
const MSG_RETRIEVE_NAMESPACE_LIST: &str = "unable to retrieve namespace list";
const MSG_NAMESPACE_NOT_FOUND: &str = "namespace not found";

// Resource operation error messages
const MSG_CREATE_RESOURCE: &str = "unable to create resource due to internal error";
const MSG_RETRIEVE_RESOURCE: &str = "unable to retrieve resource information";
const MSG_SAVE_RESOURCE: &str = "unable to save resource changes";
const MSG_DELETE_RESOURCE: &str = "unable to delete resource - it may contain versions or channels";
const MSG_RETRIEVE_RESOURCE_LIST: &str = "unable to retrieve resource list for namespace";
const MSG_RESOURCE_NOT_FOUND: &str = "resource not found";

// Version operation error messages
const MSG_CREATE_VERSION: &str = "unable to create version due to internal error";
const MSG_RETRIEVE_VERSION: &str = "unable to retrieve version information";
const MSG_SAVE_VERSION: &str = "unable to save version changes";
const MSG_DELETE_VERSION: &str = "unable to delete version - it may be referenced by channels";
const MSG_RETRIEVE_VERSION_LIST: &str = "unable to retrieve version list for resource";
const MSG_VERSION_NOT_FOUND: &str = "version not found";

// Archive operation error messages
const MSG_STORE_ARCHIVE: &str = "unable to store archive";
const MSG_UPDATE_ARCHIVE: &str = "unable to update archive metadata";
const MSG_ACCESS_ARCHIVE: &str = "unable to access archive file - it may be missing or inaccessible";
const MSG_ARCHIVE_NOT_FOUND: &str = "archive not found";

// Channel operation error messages
const MSG_CREATE_CHANNEL: &str = "unable to create channel - ensure the target version exists";
const MSG_UPDATE_CHANNEL: &str = "unable to update channel - ensure the target version exists";
const MSG_RETRIEVE_CHANNEL: &str = "unable to retrieve channel information";
const MSG_DELETE_CHANNEL: &str = "unable to delete channel";
const MSG_RETRIEVE_CHANNEL_LIST: &str = "unable to retrieve channel list for resource";
const MSG_CHANNEL_NOT_FOUND: &str = "channel not found";

fn internal(
    message: &'static str,
    cause: impl std::error::Error + Send + Sync + 'static,
) -> Error {
    Error::Internal {
        message,
        cause: Some(Box::new(cause)),
    }
}

fn bad_request(message: String) -> Error {
    Error::BadRequest(message)
}

/// SQL-backed registry.
///
/// Stores namespaces, resources, versions, and channels in SQLite with
/// foreign keys enforcing the deletion order, and archives on the local
/// filesystem addressed by content digest. Thread-safe; the connection is
/// serialized behind a mutex and archive uploads run under a process-wide
/// exclusive lock.
pub struct SqlRegistry {
    conn: Mutex<Connection>,
    pub(super) archive_root: PathBuf,
    upload_lock: Mutex<()>,
}

impl SqlRegistry {
    /// Creates a registry over an open database connection.
    ///
    /// The caller owns the connection's configuration and lifecycle; this
    /// constructor enables foreign-key enforcement and creates the schema
    /// if it does not exist. `archive_root` is the directory where archive
    /// files are stored.
    pub fn new(conn: Connection, archive_root: impl Into<PathBuf>) -> Result<Self> {
        conn.pragma_update(None, "foreign_keys", "ON")
            .map_err(|e| internal("failed to enable foreign keys", e))?;

        conn.execute_batch(SCHEMA).map_err(|e| {
            tracing::error!(error = %e, "failed to create schema");
            internal("failed to create schema", e)
        })?;

        Ok(Self {
            conn: Mutex::new(conn),
            archive_root: archive_root.into(),
            upload_lock: Mutex::new(()),
        })
    }

    pub(super) fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn resource_summaries(&self, namespace: &str) -> Result<Vec<ResourceSummary>> {
        self.list_resource_rows(namespace).map_err(|e| {
            tracing::error!(namespace, error = %e, "failed to list resources");
            internal(MSG_RETRIEVE_RESOURCE_LIST, e)
        })
    }

    fn version_summaries(&self, namespace: &str, resource: &str) -> Result<Vec<VersionSummary>> {
        self.list_version_rows(namespace, resource).map_err(|e| {
            tracing::error!(namespace, resource, error = %e, "failed to list versions");
            internal(MSG_RETRIEVE_VERSION_LIST, e)
        })
    }

    fn channel_summaries(&self, namespace: &str, resource: &str) -> Result<Vec<ChannelSummary>> {
        self.list_channel_rows(namespace, resource).map_err(|e| {
            tracing::error!(namespace, resource, error = %e, "failed to list channels");
            internal(MSG_RETRIEVE_CHANNEL_LIST, e)
        })
    }
}

impl Registry for SqlRegistry {
    /// Creates a new namespace with an empty resource list.
    fn create_namespace(&self, info: &NamespaceInfo) -> Result<Namespace> {
        validate::validate_namespace(&info.name).map_err(bad_request)?;

        match self.insert_namespace(info) {
            Ok(ns) => Ok(ns),
            Err(e) => {
                // A conflict and any other insert failure arrive as the
                // same raw error; probe to disambiguate. There is a race
                // here, but the semantics hold: if it exists now, it
                // already exists.
                if let Ok(Some(_)) = self.get_namespace(&info.name) {
                    return Err(Error::NamespaceExists);
                }
                tracing::error!(namespace = %info.name, error = %e, "failed to create namespace");
                Err(internal(MSG_CREATE_NAMESPACE, e))
            }
        }
    }

    /// Retrieves a namespace with summaries of its resources.
    fn read_namespace(&self, namespace: &str) -> Result<Namespace> {
        validate::validate_namespace(namespace).map_err(bad_request)?;

        let mut ns = match self.get_namespace(namespace) {
            Ok(Some(ns)) => ns,
            Ok(None) => return Err(Error::NotFound(MSG_NAMESPACE_NOT_FOUND.to_string())),
            Err(e) => {
                tracing::error!(namespace, error = %e, "failed to read namespace");
                return Err(internal(MSG_RETRIEVE_NAMESPACE, e));
            }
        };

        ns.resources = self.resource_summaries(namespace)?;
        Ok(ns)
    }

    /// Updates a namespace's description. The name cannot change.
    fn update_namespace(&self, namespace: &str, info: &NamespaceInfo) -> Result<Namespace> {
        validate::validate_namespace(namespace).map_err(bad_request)?;

        let mut ns = match self.update_namespace_row(namespace, info) {
            Ok(Some(ns)) => ns,
            Ok(None) => return Err(Error::NotFound(MSG_NAMESPACE_NOT_FOUND.to_string())),
            Err(e) => {
                tracing::error!(namespace, error = %e, "failed to update namespace");
                return Err(internal(MSG_SAVE_NAMESPACE, e));
            }
        };

        ns.resources = self.resource_summaries(namespace)?;
        Ok(ns)
    }

    /// Deletes a namespace. Contained resources block deletion.
    fn delete_namespace(&self, namespace: &str) -> Result<()> {
        validate::validate_namespace(namespace).map_err(bad_request)?;

        match self.delete_namespace_row(namespace) {
            Ok(true) => Ok(()),
            Ok(false) => Err(Error::NotFound(MSG_NAMESPACE_NOT_FOUND.to_string())),
            Err(e) => {
                tracing::error!(namespace, error = %e, "failed to delete namespace");
                Err(internal(MSG_DELETE_NAMESPACE, e))
            }
        }
    }

    fn list_namespaces(&self) -> Result<NamespaceList> {
        let namespaces = self.list_namespace_rows().map_err(|e| {
            tracing::error!(error = %e, "failed to list namespaces");
            internal(MSG_RETRIEVE_NAMESPACE_LIST, e)
        })?;
        Ok(NamespaceList { namespaces })
    }

    /// Creates a resource in a namespace.
    fn create_resource(&self, namespace: &str, info: &ResourceInfo) -> Result<Resource> {
        validate::validate_identifier(namespace, &info.name).map_err(bad_request)?;

        match self.insert_resource(namespace, info) {
            Ok(res) => Ok(res),
            Err(e) => {
                if let Ok(Some(_)) = self.get_resource(namespace, &info.name) {
                    return Err(Error::ResourceExists);
                }
                // Insert may also fail because the parent namespace is gone.
                if let Ok(None) = self.get_namespace(namespace) {
                    return Err(Error::NotFound(MSG_NAMESPACE_NOT_FOUND.to_string()));
                }
                tracing::error!(namespace, resource = %info.name, error = %e, "failed to create resource");
                Err(internal(MSG_CREATE_RESOURCE, e))
            }
        }
    }

    /// Retrieves a resource with version and channel summaries.
    fn read_resource(&self, namespace: &str, resource: &str) -> Result<Resource> {
        validate::validate_identifier(namespace, resource).map_err(bad_request)?;

        let mut res = match self.get_resource(namespace, resource) {
            Ok(Some(res)) => res,
            Ok(None) => return Err(Error::NotFound(MSG_RESOURCE_NOT_FOUND.to_string())),
            Err(e) => {
                tracing::error!(namespace, resource, error = %e, "failed to read resource");
                return Err(internal(MSG_RETRIEVE_RESOURCE, e));
            }
        };

        res.versions = self.version_summaries(namespace, resource)?;
        res.channels = self.channel_summaries(namespace, resource)?;
        Ok(res)
    }

    /// Updates a resource's type and description. The name cannot change.
    fn update_resource(
        &self,
        namespace: &str,
        resource: &str,
        info: &ResourceInfo,
    ) -> Result<Resource> {
        validate::validate_identifier(namespace, resource).map_err(bad_request)?;

        let mut res = match self.update_resource_row(namespace, resource, info) {
            Ok(Some(res)) => res,
            Ok(None) => return Err(Error::NotFound(MSG_RESOURCE_NOT_FOUND.to_string())),
            Err(e) => {
                tracing::error!(namespace, resource, error = %e, "failed to update resource");
                return Err(internal(MSG_SAVE_RESOURCE, e));
            }
        };

        res.versions = self.version_summaries(namespace, resource)?;
        res.channels = self.channel_summaries(namespace, resource)?;
        Ok(res)
    }

    /// Deletes a resource. Contained versions and channels block deletion.
    fn delete_resource(&self, namespace: &str, resource: &str) -> Result<()> {
        validate::validate_identifier(namespace, resource).map_err(bad_request)?;

        match self.delete_resource_row(namespace, resource) {
            Ok(true) => Ok(()),
            Ok(false) => Err(Error::NotFound(MSG_RESOURCE_NOT_FOUND.to_string())),
            Err(e) => {
                tracing::error!(namespace, resource, error = %e, "failed to delete resource");
                Err(internal(MSG_DELETE_RESOURCE, e))
            }
        }
    }

    fn list_resources(&self, namespace: &str) -> Result<ResourceList> {
        validate::validate_namespace(namespace).map_err(bad_request)?;
        Ok(ResourceList {
            resources: self.resource_summaries(namespace)?,
        })
    }

    /// Creates a version with no archive; upload populates it later.
    fn create_version(
        &self,
        namespace: &str,
        resource: &str,
        info: &VersionInfo,
    ) -> Result<Version> {
        validate::validate_reference(namespace, resource, &info.string).map_err(bad_request)?;

        match self.insert_version(namespace, resource, info) {
            Ok(v) => Ok(v),
            Err(e) => {
                if let Ok(Some(_)) = self.get_version(namespace, resource, &info.string) {
                    return Err(Error::VersionExists);
                }
                if let Ok(None) = self.get_resource(namespace, resource) {
                    return Err(Error::NotFound(MSG_RESOURCE_NOT_FOUND.to_string()));
                }
                tracing::error!(namespace, resource, version = %info.string, error = %e, "failed to create version");
                Err(internal(MSG_CREATE_VERSION, e))
            }
        }
    }

    fn read_version(&self, namespace: &str, resource: &str, version: &str) -> Result<Version> {
        validate::validate_reference(namespace, resource, version).map_err(bad_request)?;

        match self.get_version(namespace, resource, version) {
            Ok(Some(v)) => Ok(v),
            Ok(None) => Err(Error::NotFound(MSG_VERSION_NOT_FOUND.to_string())),
            Err(e) => {
                tracing::error!(namespace, resource, version, error = %e, "failed to read version");
                Err(internal(MSG_RETRIEVE_VERSION, e))
            }
        }
    }

    /// Touches a version's metadata. The version string cannot change.
    fn update_version(
        &self,
        namespace: &str,
        resource: &str,
        version: &str,
        _info: &VersionInfo,
    ) -> Result<Version> {
        validate::validate_reference(namespace, resource, version).map_err(bad_request)?;

        match self.update_version_row(namespace, resource, version) {
            Ok(Some(v)) => Ok(v),
            Ok(None) => Err(Error::NotFound(MSG_VERSION_NOT_FOUND.to_string())),
            Err(e) => {
                tracing::error!(namespace, resource, version, error = %e, "failed to update version");
                Err(internal(MSG_SAVE_VERSION, e))
            }
        }
    }

    /// Deletes a version. Referencing channels block deletion; the archive
    /// blob, if any, is left on disk.
    fn delete_version(&self, namespace: &str, resource: &str, version: &str) -> Result<()> {
        validate::validate_reference(namespace, resource, version).map_err(bad_request)?;

        match self.delete_version_row(namespace, resource, version) {
            Ok(true) => Ok(()),
            Ok(false) => Err(Error::NotFound(MSG_VERSION_NOT_FOUND.to_string())),
            Err(e) => {
                tracing::error!(namespace, resource, version, error = %e, "failed to delete version");
                Err(internal(MSG_DELETE_VERSION, e))
            }
        }
    }

    fn list_versions(&self, namespace: &str, resource: &str) -> Result<VersionList> {
        validate::validate_identifier(namespace, resource).map_err(bad_request)?;
        Ok(VersionList {
            versions: self.version_summaries(namespace, resource)?,
        })
    }

    /// Uploads an archive for a version.
    ///
    /// The stream is hashed with SHA-256 while being staged to disk; the
    /// version row is then updated with the digest, size, and final path.
    /// The whole sequence runs under the exclusive upload lock. If the
    /// version vanished or the metadata update fails, the freshly written
    /// blob is removed before returning.
    fn upload_archive(
        &self,
        namespace: &str,
        resource: &str,
        version: &str,
        reader: &mut dyn Read,
    ) -> Result<Version> {
        validate::validate_reference(namespace, resource, version).map_err(bad_request)?;

        let _guard = self
            .upload_lock
            .lock()
            .unwrap_or_else(|e| e.into_inner());

        let (digest, path, size) = self
            .store_archive_file(namespace, resource, version, reader)
            .map_err(|e| {
                tracing::error!(namespace, resource, version, error = %e, "failed to store archive");
                internal(MSG_STORE_ARCHIVE, e)
            })?;

        let path_str = path.to_string_lossy().into_owned();
        match self.set_version_archive(namespace, resource, version, &digest, &path_str, size) {
            Ok(true) => {}
            Ok(false) => {
                let _ = fs::remove_file(&path);
                return Err(Error::NotFound(MSG_VERSION_NOT_FOUND.to_string()));
            }
            Err(e) => {
                let _ = fs::remove_file(&path);
                tracing::error!(namespace, resource, version, error = %e, "failed to update archive metadata");
                return Err(internal(MSG_UPDATE_ARCHIVE, e));
            }
        }

        match self.get_version(namespace, resource, version) {
            Ok(Some(v)) => Ok(v),
            Ok(None) => Err(Error::NotFound(MSG_VERSION_NOT_FOUND.to_string())),
            Err(e) => {
                tracing::error!(namespace, resource, version, error = %e, "failed to read version after upload");
                Err(internal(MSG_RETRIEVE_VERSION, e))
            }
        }
    }

    /// Opens a version's archive for reading.
    fn download_archive(
        &self,
        namespace: &str,
        resource: &str,
        version: &str,
    ) -> Result<Box<dyn Read + Send>> {
        validate::validate_reference(namespace, resource, version).map_err(bad_request)?;

        let v = match self.get_version(namespace, resource, version) {
            Ok(Some(v)) => v,
            Ok(None) => return Err(Error::NotFound(MSG_VERSION_NOT_FOUND.to_string())),
            Err(e) => {
                tracing::error!(namespace, resource, version, error = %e, "failed to read version");
                return Err(internal(MSG_RETRIEVE_VERSION, e));
            }
        };

        let Some(path) = v.archive else {
            return Err(Error::NotFound(MSG_ARCHIVE_NOT_FOUND.to_string()));
        };

        match fs::File::open(&path) {
            Ok(file) => Ok(Box::new(file)),
            Err(e) => {
                tracing::error!(namespace, resource, version, error = %e, "failed to open archive file");
                Err(internal(MSG_ACCESS_ARCHIVE, e))
            }
        }
    }

    /// Creates a channel pointing at an existing version.
    fn create_channel(&self, namespace: &str, resource: &str, info: &ChannelInfo) -> Result<Channel> {
        validate::validate_channel_info(namespace, resource, info).map_err(bad_request)?;

        if let Err(e) = self.insert_channel(namespace, resource, info) {
            if let Ok(Some(_)) = self.get_channel(namespace, resource, &info.name) {
                return Err(Error::ChannelExists);
            }
            if let Ok(None) = self.get_resource(namespace, resource) {
                return Err(Error::NotFound(MSG_RESOURCE_NOT_FOUND.to_string()));
            }
            if let Ok(None) = self.get_version(namespace, resource, &info.version) {
                return Err(Error::NotFound(MSG_VERSION_NOT_FOUND.to_string()));
            }
            tracing::error!(namespace, resource, channel = %info.name, error = %e, "failed to create channel");
            return Err(internal(MSG_CREATE_CHANNEL, e));
        }

        match self.get_channel(namespace, resource, &info.name) {
            Ok(Some(c)) => Ok(c),
            Ok(None) => Err(Error::internal(MSG_RETRIEVE_CHANNEL)),
            Err(e) => {
                tracing::error!(namespace, resource, channel = %info.name, error = %e, "failed to read channel");
                Err(internal(MSG_RETRIEVE_CHANNEL, e))
            }
        }
    }

    /// Retrieves a channel with the full version object it points to.
    fn read_channel(&self, namespace: &str, resource: &str, channel: &str) -> Result<Channel> {
        validate::validate_channel_reference(namespace, resource, channel).map_err(bad_request)?;

        match self.get_channel(namespace, resource, channel) {
            Ok(Some(c)) => Ok(c),
            Ok(None) => Err(Error::NotFound(MSG_CHANNEL_NOT_FOUND.to_string())),
            Err(e) => {
                tracing::error!(namespace, resource, channel, error = %e, "failed to read channel");
                Err(internal(MSG_RETRIEVE_CHANNEL, e))
            }
        }
    }

    /// Retargets a channel or updates its description. The channel name
    /// cannot change.
    fn update_channel(
        &self,
        namespace: &str,
        resource: &str,
        channel: &str,
        info: &ChannelInfo,
    ) -> Result<Channel> {
        validate::validate_channel_reference(namespace, resource, channel).map_err(bad_request)?;
        validate::validate_channel_info(namespace, resource, info).map_err(bad_request)?;

        match self.update_channel_row(namespace, resource, channel, info) {
            Ok(Some(c)) => Ok(c),
            Ok(None) => Err(Error::NotFound(MSG_CHANNEL_NOT_FOUND.to_string())),
            Err(e) => {
                if let Ok(None) = self.get_version(namespace, resource, &info.version) {
                    return Err(Error::NotFound(MSG_VERSION_NOT_FOUND.to_string()));
                }
                tracing::error!(namespace, resource, channel, error = %e, "failed to update channel");
                Err(internal(MSG_UPDATE_CHANNEL, e))
            }
        }
    }

    /// Deletes a channel. The referenced version is unaffected.
    fn delete_channel(&self, namespace: &str, resource: &str, channel: &str) -> Result<()> {
        validate::validate_channel_reference(namespace, resource, channel).map_err(bad_request)?;

        match self.delete_channel_row(namespace, resource, channel) {
            Ok(true) => Ok(()),
            Ok(false) => Err(Error::NotFound(MSG_CHANNEL_NOT_FOUND.to_string())),
            Err(e) => {
                tracing::error!(namespace, resource, channel, error = %e, "failed to delete channel");
                Err(internal(MSG_DELETE_CHANNEL, e))
            }
        }
    }

    fn list_channels(&self, namespace: &str, resource: &str) -> Result<ChannelList> {
        validate::validate_identifier(namespace, resource).map_err(bad_request)?;
        Ok(ChannelList {
            channels: self.channel_summaries(namespace, resource)?,
        })
    }
}
