//! Row-level statements behind the registry facade.
//!
//! Every function here speaks raw `rusqlite::Result`: inserts return the
//! post-image of the new row, gets return `None` on a miss, and updates
//! check the affected-row count before refetching. No error translation
//! or logging happens at this layer.

use chrono::Utc;
use rusqlite::{params, OptionalExtension};

use super::sql::SqlRegistry;
use crate::types::*;

fn now() -> i64 {
    Utc::now().timestamp()
}

impl SqlRegistry {
    pub(super) fn insert_namespace(&self, info: &NamespaceInfo) -> rusqlite::Result<Namespace> {
        let now = now();
        self.conn().execute(
            "INSERT INTO namespaces (name, description, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![info.name, info.description, now, now],
        )?;

        Ok(Namespace {
            name: info.name.clone(),
            description: info.description.clone(),
            resources: Vec::new(),
            created_at: now,
            updated_at: now,
        })
    }

    pub(super) fn get_namespace(&self, name: &str) -> rusqlite::Result<Option<Namespace>> {
        self.conn()
            .query_row(
                "SELECT name, description, created_at, updated_at
                 FROM namespaces WHERE name = ?1",
                params![name],
                |row| {
                    Ok(Namespace {
                        name: row.get(0)?,
                        description: row.get(1)?,
                        resources: Vec::new(),
                        created_at: row.get(2)?,
                        updated_at: row.get(3)?,
                    })
                },
            )
            .optional()
    }

    pub(super) fn update_namespace_row(
        &self,
        namespace: &str,
        info: &NamespaceInfo,
    ) -> rusqlite::Result<Option<Namespace>> {
        let rows = self.conn().execute(
            "UPDATE namespaces SET description = ?1, updated_at = ?2 WHERE name = ?3",
            params![info.description, now(), namespace],
        )?;

        if rows == 0 {
            return Ok(None);
        }

        // Refetch for created_at. A RETURNING clause would save the round
        // trip at the cost of database portability.
        self.get_namespace(namespace)
    }

    pub(super) fn delete_namespace_row(&self, namespace: &str) -> rusqlite::Result<bool> {
        let rows = self
            .conn()
            .execute("DELETE FROM namespaces WHERE name = ?1", params![namespace])?;
        Ok(rows > 0)
    }

    pub(super) fn list_namespace_rows(&self) -> rusqlite::Result<Vec<NamespaceSummary>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT n.name, n.description, n.created_at, n.updated_at,
                    (SELECT COUNT(*) FROM resources r WHERE r.namespace = n.name)
             FROM namespaces n ORDER BY n.name",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(NamespaceSummary {
                name: row.get(0)?,
                description: row.get(1)?,
                created_at: row.get(2)?,
                updated_at: row.get(3)?,
                resource_count: row.get(4)?,
            })
        })?;

        rows.collect()
    }

    pub(super) fn insert_resource(
        &self,
        namespace: &str,
        info: &ResourceInfo,
    ) -> rusqlite::Result<Resource> {
        let now = now();
        self.conn().execute(
            "INSERT INTO resources (namespace, name, type, description, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                namespace,
                info.name,
                info.resource_type,
                info.description,
                now,
                now
            ],
        )?;

        Ok(Resource {
            namespace: namespace.to_string(),
            name: info.name.clone(),
            resource_type: info.resource_type.clone(),
            description: info.description.clone(),
            versions: Vec::new(),
            channels: Vec::new(),
            created_at: now,
            updated_at: now,
        })
    }

    pub(super) fn get_resource(
        &self,
        namespace: &str,
        resource: &str,
    ) -> rusqlite::Result<Option<Resource>> {
        self.conn()
            .query_row(
                "SELECT name, type, description, created_at, updated_at
                 FROM resources WHERE namespace = ?1 AND name = ?2",
                params![namespace, resource],
                |row| {
                    Ok(Resource {
                        namespace: namespace.to_string(),
                        name: row.get(0)?,
                        resource_type: row.get(1)?,
                        description: row.get(2)?,
                        versions: Vec::new(),
                        channels: Vec::new(),
                        created_at: row.get(3)?,
                        updated_at: row.get(4)?,
                    })
                },
            )
            .optional()
    }

    pub(super) fn update_resource_row(
        &self,
        namespace: &str,
        resource: &str,
        info: &ResourceInfo,
    ) -> rusqlite::Result<Option<Resource>> {
        let rows = self.conn().execute(
            "UPDATE resources SET type = ?1, description = ?2, updated_at = ?3
             WHERE namespace = ?4 AND name = ?5",
            params![
                info.resource_type,
                info.description,
                now(),
                namespace,
                resource
            ],
        )?;

        if rows == 0 {
            return Ok(None);
        }
        self.get_resource(namespace, resource)
    }

    pub(super) fn delete_resource_row(
        &self,
        namespace: &str,
        resource: &str,
    ) -> rusqlite::Result<bool> {
        let rows = self.conn().execute(
            "DELETE FROM resources WHERE namespace = ?1 AND name = ?2",
            params![namespace, resource],
        )?;
        Ok(rows > 0)
    }

    pub(super) fn list_resource_rows(
        &self,
        namespace: &str,
    ) -> rusqlite::Result<Vec<ResourceSummary>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT r.name, r.type, r.description, r.created_at, r.updated_at,
                    (SELECT COUNT(*) FROM versions v
                     WHERE v.namespace = r.namespace AND v.resource = r.name),
                    (SELECT COUNT(*) FROM channels c
                     WHERE c.namespace = r.namespace AND c.resource = r.name),
                    (SELECT MAX(v.version) FROM versions v
                     WHERE v.namespace = r.namespace AND v.resource = r.name)
             FROM resources r WHERE r.namespace = ?1 ORDER BY r.name",
        )?;

        let rows = stmt.query_map(params![namespace], |row| {
            Ok(ResourceSummary {
                name: row.get(0)?,
                resource_type: row.get(1)?,
                description: row.get(2)?,
                created_at: row.get(3)?,
                updated_at: row.get(4)?,
                version_count: row.get(5)?,
                channel_count: row.get(6)?,
                latest_version: row.get(7)?,
            })
        })?;

        rows.collect()
    }

    pub(super) fn insert_version(
        &self,
        namespace: &str,
        resource: &str,
        info: &VersionInfo,
    ) -> rusqlite::Result<Version> {
        let now = now();
        self.conn().execute(
            "INSERT INTO versions (namespace, resource, version, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![namespace, resource, info.string, now, now],
        )?;

        Ok(Version {
            namespace: namespace.to_string(),
            resource: resource.to_string(),
            string: info.string.clone(),
            archive: None,
            size: None,
            digest: None,
            created_at: now,
            updated_at: now,
        })
    }

    pub(super) fn get_version(
        &self,
        namespace: &str,
        resource: &str,
        version: &str,
    ) -> rusqlite::Result<Option<Version>> {
        self.conn()
            .query_row(
                "SELECT version, digest, size, path, created_at, updated_at
                 FROM versions WHERE namespace = ?1 AND resource = ?2 AND version = ?3",
                params![namespace, resource, version],
                |row| {
                    Ok(Version {
                        namespace: namespace.to_string(),
                        resource: resource.to_string(),
                        string: row.get(0)?,
                        digest: row.get(1)?,
                        size: row.get(2)?,
                        archive: row.get(3)?,
                        created_at: row.get(4)?,
                        updated_at: row.get(5)?,
                    })
                },
            )
            .optional()
    }

    pub(super) fn update_version_row(
        &self,
        namespace: &str,
        resource: &str,
        version: &str,
    ) -> rusqlite::Result<Option<Version>> {
        let rows = self.conn().execute(
            "UPDATE versions SET updated_at = ?1
             WHERE namespace = ?2 AND resource = ?3 AND version = ?4",
            params![now(), namespace, resource, version],
        )?;

        if rows == 0 {
            return Ok(None);
        }
        self.get_version(namespace, resource, version)
    }

    pub(super) fn delete_version_row(
        &self,
        namespace: &str,
        resource: &str,
        version: &str,
    ) -> rusqlite::Result<bool> {
        let rows = self.conn().execute(
            "DELETE FROM versions WHERE namespace = ?1 AND resource = ?2 AND version = ?3",
            params![namespace, resource, version],
        )?;
        Ok(rows > 0)
    }

    pub(super) fn list_version_rows(
        &self,
        namespace: &str,
        resource: &str,
    ) -> rusqlite::Result<Vec<VersionSummary>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT version, created_at, updated_at
             FROM versions WHERE namespace = ?1 AND resource = ?2 ORDER BY version",
        )?;

        let rows = stmt.query_map(params![namespace, resource], |row| {
            Ok(VersionSummary {
                string: row.get(0)?,
                created_at: row.get(1)?,
                updated_at: row.get(2)?,
            })
        })?;

        rows.collect()
    }

    /// Sets archive metadata for a version. Returns false when the
    /// version row does not exist.
    pub(super) fn set_version_archive(
        &self,
        namespace: &str,
        resource: &str,
        version: &str,
        digest: &str,
        path: &str,
        size: i64,
    ) -> rusqlite::Result<bool> {
        let rows = self.conn().execute(
            "UPDATE versions SET digest = ?1, size = ?2, path = ?3, updated_at = ?4
             WHERE namespace = ?5 AND resource = ?6 AND version = ?7",
            params![digest, size, path, now(), namespace, resource, version],
        )?;
        Ok(rows > 0)
    }

    pub(super) fn insert_channel(
        &self,
        namespace: &str,
        resource: &str,
        info: &ChannelInfo,
    ) -> rusqlite::Result<()> {
        let now = now();
        self.conn().execute(
            "INSERT INTO channels (namespace, resource, name, description, version, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                namespace,
                resource,
                info.name,
                info.description,
                info.version,
                now,
                now
            ],
        )?;
        Ok(())
    }

    /// Fetches a channel with the full version object it points to.
    pub(super) fn get_channel(
        &self,
        namespace: &str,
        resource: &str,
        channel: &str,
    ) -> rusqlite::Result<Option<Channel>> {
        self.conn()
            .query_row(
                "SELECT c.name, c.description, c.version, c.created_at, c.updated_at,
                        v.digest, v.size, v.path, v.created_at, v.updated_at
                 FROM channels c
                 JOIN versions v
                   ON v.namespace = c.namespace
                  AND v.resource = c.resource
                  AND v.version = c.version
                 WHERE c.namespace = ?1 AND c.resource = ?2 AND c.name = ?3",
                params![namespace, resource, channel],
                |row| {
                    let version_string: String = row.get(2)?;
                    Ok(Channel {
                        namespace: namespace.to_string(),
                        resource: resource.to_string(),
                        name: row.get(0)?,
                        description: row.get(1)?,
                        version: Version {
                            namespace: namespace.to_string(),
                            resource: resource.to_string(),
                            string: version_string,
                            digest: row.get(5)?,
                            size: row.get(6)?,
                            archive: row.get(7)?,
                            created_at: row.get(8)?,
                            updated_at: row.get(9)?,
                        },
                        created_at: row.get(3)?,
                        updated_at: row.get(4)?,
                    })
                },
            )
            .optional()
    }

    pub(super) fn update_channel_row(
        &self,
        namespace: &str,
        resource: &str,
        channel: &str,
        info: &ChannelInfo,
    ) -> rusqlite::Result<Option<Channel>> {
        let rows = self.conn().execute(
            "UPDATE channels SET description = ?1, version = ?2, updated_at = ?3
             WHERE namespace = ?4 AND resource = ?5 AND name = ?6",
            params![
                info.description,
                info.version,
                now(),
                namespace,
                resource,
                channel
            ],
        )?;

        if rows == 0 {
            return Ok(None);
        }
        self.get_channel(namespace, resource, channel)
    }

    pub(super) fn delete_channel_row(
        &self,
        namespace: &str,
        resource: &str,
        channel: &str,
    ) -> rusqlite::Result<bool> {
        let rows = self.conn().execute(
            "DELETE FROM channels WHERE namespace = ?1 AND resource = ?2 AND name = ?3",
            params![namespace, resource, channel],
        )?;
        Ok(rows > 0)
    }

    pub(super) fn list_channel_rows(
        &self,
        namespace: &str,
        resource: &str,
    ) -> rusqlite::Result<Vec<ChannelSummary>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT name, version, description, created_at, updated_at
             FROM channels WHERE namespace = ?1 AND resource = ?2 ORDER BY name",
        )?;

        let rows = stmt.query_map(params![namespace, resource], |row| {
            Ok(ChannelSummary {
                name: row.get(0)?,
                version: row.get(1)?,
                description: row.get(2)?,
                created_at: row.get(3)?,
                updated_at: row.get(4)?,
            })
        })?;

        rows.collect()
    }
}
