// All foreign keys use ON DELETE RESTRICT: deletion must happen
// bottom-up (channels, then versions, then resources, then namespaces).
// Archive data lives in nullable columns on versions, populated by
// archive upload. Timestamps are Unix seconds.
pub const SCHEMA: &str = r#"
-- Namespaces group resources
CREATE TABLE IF NOT EXISTS namespaces (
    name TEXT PRIMARY KEY,
    description TEXT NOT NULL DEFAULT '',
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);

-- Typed resources within a namespace
CREATE TABLE IF NOT EXISTS resources (
    namespace TEXT NOT NULL REFERENCES namespaces(name) ON DELETE RESTRICT,
    name TEXT NOT NULL,
    type TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL,

    PRIMARY KEY (namespace, name)
);

-- Versions; digest, size, and path are NULL until an archive is uploaded
CREATE TABLE IF NOT EXISTS versions (
    namespace TEXT NOT NULL,
    resource TEXT NOT NULL,
    version TEXT NOT NULL,
    digest TEXT,
    size INTEGER,
    path TEXT,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL,

    PRIMARY KEY (namespace, resource, version),
    FOREIGN KEY (namespace, resource)
        REFERENCES resources(namespace, name) ON DELETE RESTRICT
);

-- Channels are mutable pointers to a version of the same resource
CREATE TABLE IF NOT EXISTS channels (
    namespace TEXT NOT NULL,
    resource TEXT NOT NULL,
    name TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    version TEXT NOT NULL,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL,

    PRIMARY KEY (namespace, resource, name),
    FOREIGN KEY (namespace, resource)
        REFERENCES resources(namespace, name) ON DELETE RESTRICT,
    FOREIGN KEY (namespace, resource, version)
        REFERENCES versions(namespace, resource, version) ON DELETE RESTRICT
);

CREATE INDEX IF NOT EXISTS idx_resources_namespace ON resources(namespace);
CREATE INDEX IF NOT EXISTS idx_versions_resource ON versions(namespace, resource);
CREATE INDEX IF NOT EXISTS idx_channels_resource ON channels(namespace, resource);
CREATE INDEX IF NOT EXISTS idx_channels_version ON channels(namespace, resource, version);
"#;
