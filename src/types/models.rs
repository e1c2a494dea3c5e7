use serde::{Deserialize, Serialize};

/// Mutable properties of a namespace for creation or update.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamespaceInfo {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Complete namespace with its resource summaries.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Namespace {
    pub name: String,
    pub description: String,
    pub resources: Vec<ResourceSummary>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Lightweight namespace representation for listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamespaceSummary {
    pub name: String,
    pub description: String,
    pub resource_count: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamespaceList {
    pub namespaces: Vec<NamespaceSummary>,
}

/// Mutable properties of a resource for creation or update.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub resource_type: String,
    #[serde(default)]
    pub description: String,
}

/// Complete resource with version and channel summaries.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub namespace: String,
    pub name: String,
    #[serde(rename = "type")]
    pub resource_type: String,
    pub description: String,
    pub versions: Vec<VersionSummary>,
    pub channels: Vec<ChannelSummary>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Lightweight resource representation for listings.
///
/// `latest_version` is the greatest version string, or `None` when the
/// resource has no versions yet.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceSummary {
    pub name: String,
    #[serde(rename = "type")]
    pub resource_type: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_version: Option<String>,
    pub version_count: i64,
    pub channel_count: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceList {
    pub resources: Vec<ResourceSummary>,
}

/// Mutable properties of a version for creation or update.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionInfo {
    pub string: String,
}

/// Complete version with archive details.
///
/// The archive, size, and digest fields are all `None` before an archive
/// upload and all set afterward.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Version {
    pub namespace: String,
    pub resource: String,
    pub string: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archive: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Lightweight version representation for listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionSummary {
    pub string: String,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionList {
    pub versions: Vec<VersionSummary>,
}

/// Mutable properties of a channel for creation or update.
///
/// `version` is a plain string reference to an existing version of the
/// same resource; changing it retargets the channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelInfo {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub description: String,
}

/// Mutable pointer to a version, with full details of the current target.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Channel {
    pub namespace: String,
    pub resource: String,
    pub name: String,
    pub version: Version,
    pub description: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Lightweight channel representation for listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelSummary {
    pub name: String,
    pub version: String,
    pub description: String,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelList {
    pub channels: Vec<ChannelSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_field_names_are_camel_case() {
        let summary = ResourceSummary {
            name: "mywidget".to_string(),
            resource_type: "widget".to_string(),
            description: String::new(),
            latest_version: Some("1.0.0".to_string()),
            version_count: 3,
            channel_count: 1,
            created_at: 100,
            updated_at: 200,
        };

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["type"], "widget");
        assert_eq!(json["latestVersion"], "1.0.0");
        assert_eq!(json["versionCount"], 3);
        assert_eq!(json["createdAt"], 100);
    }

    #[test]
    fn absent_archive_fields_are_omitted() {
        let version = Version {
            namespace: "myorg".to_string(),
            resource: "mywidget".to_string(),
            string: "1.0.0".to_string(),
            archive: None,
            size: None,
            digest: None,
            created_at: 100,
            updated_at: 100,
        };

        let json = serde_json::to_value(&version).unwrap();
        assert!(json.get("archive").is_none());
        assert!(json.get("digest").is_none());
        assert!(json.get("size").is_none());
    }

    #[test]
    fn info_description_defaults_to_empty() {
        let info: NamespaceInfo = serde_json::from_str(r#"{"name":"myorg"}"#).unwrap();
        assert_eq!(info.description, "");
    }
}
