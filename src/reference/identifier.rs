use std::fmt;

use super::parser::TokenParser;
use super::ReferenceError;

/// Default protocol scheme.
pub const DEFAULT_SCHEME: &str = "https";

/// Default registry authority.
pub const DEFAULT_REGISTRY: &str = "registry.crucible.net";

/// Default namespace for resources in the default registry.
pub const DEFAULT_NAMESPACE: &str = "official";

/// Resource identifier.
///
/// An identifier locates a resource without specifying a particular
/// version. Use [`Identifier::parse`] to construct valid identifiers.
#[derive(Debug, Clone)]
pub struct Identifier {
    pub(super) resource_type: String,
    pub(super) scheme: String,
    pub(super) registry: String,
    pub(super) namespace: Option<String>,
    pub(super) name: Option<String>,
    pub(super) path: Option<String>,
}

/// Options for parsing identifiers and references.
///
/// Unset fields fall back to the package defaults ([`DEFAULT_SCHEME`],
/// [`DEFAULT_REGISTRY`], [`DEFAULT_NAMESPACE`]). Parse functions accept
/// `None` in place of an options value, which means all defaults.
#[derive(Debug, Clone, Default)]
pub struct IdentifierOptions {
    pub default_scheme: Option<String>,
    pub default_registry: Option<String>,
    pub default_namespace: Option<String>,
}

impl IdentifierOptions {
    pub(super) fn scheme(&self) -> &str {
        self.default_scheme.as_deref().unwrap_or(DEFAULT_SCHEME)
    }

    pub(super) fn registry(&self) -> &str {
        self.default_registry.as_deref().unwrap_or(DEFAULT_REGISTRY)
    }

    pub(super) fn namespace(&self) -> &str {
        self.default_namespace
            .as_deref()
            .unwrap_or(DEFAULT_NAMESPACE)
    }
}

impl Identifier {
    /// Parses an identifier string.
    ///
    /// The expected format is `[<type>] [[scheme://]registry/]<path>`. The
    /// type is optional and must be lowercase alphabetic; when present it
    /// must match the context type exactly, and when omitted the context
    /// type is used.
    ///
    /// The resource location can take three forms:
    ///   - full URI with scheme: `https://registry.example.com/path/to/resource`
    ///   - registry without scheme: `registry.example.com/path/to/resource`
    ///   - default registry path: `namespace/name` or just `name`
    ///
    /// Registry detection relies on the presence of dots or a port colon in
    /// the first path segment. When using the default registry, the
    /// namespace defaults to the configured default if not specified.
    pub fn parse(
        s: &str,
        context_type: &str,
        options: Option<&IdentifierOptions>,
    ) -> Result<Self, ReferenceError> {
        let defaults = IdentifierOptions::default();
        let options = options.unwrap_or(&defaults);

        let mut parser = TokenParser::new(s, options);
        let id = parser.parse_identifier(context_type)?;
        parser.ensure_done()?;
        Ok(id)
    }

    /// Resource type (e.g. "widget"). Lowercase alphabetic only.
    pub fn resource_type(&self) -> &str {
        &self.resource_type
    }

    /// Protocol scheme (e.g. "https").
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Registry authority (e.g. "registry.crucible.net").
    pub fn registry(&self) -> &str {
        &self.registry
    }

    /// Namespace segment of the path. Only used with the default registry.
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Resource name. Only used with the default registry.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The full path component.
    ///
    /// For default registry identifiers this is `namespace/name`; for
    /// other registries it is the stored path.
    pub fn path(&self) -> String {
        if let Some(path) = &self.path {
            return path.clone();
        }
        match (&self.namespace, &self.name) {
            (Some(namespace), Some(name)) => format!("{namespace}/{name}"),
            (None, Some(name)) => name.clone(),
            _ => String::new(),
        }
    }

    /// The full URI, including scheme, registry, and path.
    pub fn uri(&self) -> String {
        format!("{}://{}/{}", self.scheme, self.registry, self.path())
    }
}

// Two identifiers are equal when they locate the same resource: the
// canonical form emits `namespace/name` as a plain path, so equality
// compares the effective path rather than how it was spelled.
impl PartialEq for Identifier {
    fn eq(&self, other: &Self) -> bool {
        self.resource_type == other.resource_type
            && self.scheme == other.scheme
            && self.registry == other.registry
            && self.path() == other.path()
    }
}

impl Eq for Identifier {}

impl fmt::Display for Identifier {
    /// The canonical form: `<type> <scheme>://<registry>/<path>`. The
    /// scheme and registry are always included, even when defaults.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.resource_type, self.uri())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_namespace_and_name() {
        let id = Identifier::parse("myorg/mywidget", "widget", None).unwrap();
        assert_eq!(id.resource_type(), "widget");
        assert_eq!(id.scheme(), DEFAULT_SCHEME);
        assert_eq!(id.registry(), DEFAULT_REGISTRY);
        assert_eq!(id.namespace(), Some("myorg"));
        assert_eq!(id.name(), Some("mywidget"));
        assert_eq!(id.path(), "myorg/mywidget");
    }

    #[test]
    fn parse_bare_name_uses_default_namespace() {
        let id = Identifier::parse("mywidget", "widget", None).unwrap();
        assert_eq!(id.namespace(), Some(DEFAULT_NAMESPACE));
        assert_eq!(id.name(), Some("mywidget"));
    }

    #[test]
    fn parse_with_custom_defaults() {
        let options = IdentifierOptions {
            default_namespace: Some("myteam".to_string()),
            ..Default::default()
        };
        let id = Identifier::parse("mywidget", "widget", Some(&options)).unwrap();
        assert_eq!(id.namespace(), Some("myteam"));
    }

    #[test]
    fn parse_full_uri() {
        let id = Identifier::parse(
            "https://registry.example.com/path/to/resource",
            "widget",
            None,
        )
        .unwrap();
        assert_eq!(id.scheme(), "https");
        assert_eq!(id.registry(), "registry.example.com");
        assert_eq!(id.path(), "path/to/resource");
        assert_eq!(id.namespace(), None);
    }

    #[test]
    fn parse_registry_without_scheme() {
        let id = Identifier::parse("registry.example.com/tools/hammer", "widget", None).unwrap();
        assert_eq!(id.scheme(), DEFAULT_SCHEME);
        assert_eq!(id.registry(), "registry.example.com");
        assert_eq!(id.path(), "tools/hammer");
    }

    #[test]
    fn parse_registry_with_port() {
        let id = Identifier::parse("localhost.dev:5000/tools/hammer", "widget", None).unwrap();
        assert_eq!(id.registry(), "localhost.dev:5000");
    }

    #[test]
    fn parse_explicit_type() {
        let id = Identifier::parse("widget myorg/mywidget", "widget", None).unwrap();
        assert_eq!(id.resource_type(), "widget");
        assert_eq!(id.name(), Some("mywidget"));
    }

    #[test]
    fn parse_type_mismatch() {
        let err = Identifier::parse("service myorg/mywidget", "widget", None).unwrap_err();
        assert!(matches!(err, ReferenceError::TypeMismatch { .. }));
    }

    #[test]
    fn parse_single_token_is_name_not_type() {
        // A lone lowercase-alpha token is a resource name, never a type.
        let id = Identifier::parse("widget", "widget", None).unwrap();
        assert_eq!(id.name(), Some("widget"));
    }

    #[test]
    fn parse_empty() {
        assert!(Identifier::parse("", "widget", None).is_err());
        assert!(Identifier::parse("   ", "widget", None).is_err());
    }

    #[test]
    fn parse_invalid_context_type() {
        assert!(Identifier::parse("myorg/mywidget", "Widget!", None).is_err());
    }

    #[test]
    fn parse_trailing_token() {
        assert!(Identifier::parse("myorg/mywidget extra", "widget", None).is_err());
    }

    #[test]
    fn parse_invalid_scheme() {
        assert!(Identifier::parse("1http://registry.example.com/a", "widget", None).is_err());
    }

    #[test]
    fn parse_missing_path_after_registry() {
        assert!(Identifier::parse("https://registry.example.com", "widget", None).is_err());
        assert!(Identifier::parse("https://registry.example.com/", "widget", None).is_err());
    }

    #[test]
    fn parse_invalid_names() {
        assert!(Identifier::parse("MyOrg/mywidget", "widget", None).is_err());
        assert!(Identifier::parse("myorg/my_widget", "widget", None).is_err());
        assert!(Identifier::parse("-myorg/mywidget", "widget", None).is_err());
    }

    #[test]
    fn display_includes_defaults() {
        let id = Identifier::parse("myorg/mywidget", "widget", None).unwrap();
        assert_eq!(
            id.to_string(),
            "widget https://registry.crucible.net/myorg/mywidget"
        );
    }

    #[test]
    fn uri_for_explicit_registry() {
        let id = Identifier::parse("http://reg.example.com/a/b", "widget", None).unwrap();
        assert_eq!(id.uri(), "http://reg.example.com/a/b");
    }

    #[test]
    fn equality_compares_effective_path() {
        // The same resource spelled as a default-registry path and as a
        // full URI compares equal.
        let short = Identifier::parse("myorg/mywidget", "widget", None).unwrap();
        let full = Identifier::parse(
            "https://registry.crucible.net/myorg/mywidget",
            "widget",
            None,
        )
        .unwrap();
        assert_eq!(short, full);

        let other = Identifier::parse("myorg/otherwidget", "widget", None).unwrap();
        assert_ne!(short, other);
    }
}
