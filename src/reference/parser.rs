use std::sync::LazyLock;

use regex::Regex;

use super::identifier::{Identifier, IdentifierOptions};
use super::ReferenceError;

// Type: lowercase alphabetic only.
static TYPE_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-z]+$").unwrap());

// Scheme: lowercase alphabetic followed by optional digits, plus, dot, or hyphen.
static SCHEME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z][a-z0-9+.-]*$").unwrap());

// Registry: alphanumeric labels separated by dots, optionally ending with
// a colon and port.
static REGISTRY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9]([a-zA-Z0-9-]*[a-zA-Z0-9])?(\.([a-zA-Z0-9]([a-zA-Z0-9-]*[a-zA-Z0-9])?))+\.?(:\d+)?$")
        .unwrap()
});

// Name: lowercase alphanumeric with hyphens, starting with a letter.
static NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z]([a-z0-9-]{0,126}[a-z0-9])?$").unwrap());

// Path: lowercase, digits, hyphens, slashes, underscores, dots.
static PATH_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-z0-9/_.-]+$").unwrap());

pub(super) fn is_valid_grammar_name(s: &str) -> bool {
    NAME_PATTERN.is_match(s)
}

/// Index of the first token opening the version/channel part of a
/// reference; everything before it belongs to the identifier.
pub(super) fn identifier_span(tokens: &[&str]) -> usize {
    tokens
        .iter()
        .position(|tok| is_version_or_channel_start(tok))
        .unwrap_or(tokens.len())
}

// Channel tokens start with ':'. Version constraint tokens start with an
// operator, a wildcard, or a digit; location tokens starting with a digit
// always carry a '/' (registry/path form).
fn is_version_or_channel_start(tok: &str) -> bool {
    tok.starts_with([':', '>', '<', '=', '~', '^'])
        || tok == "*"
        || (tok.as_bytes().first().is_some_and(u8::is_ascii_digit) && !tok.contains('/'))
}

/// Whitespace-tokenized identifier string parser.
pub(super) struct TokenParser<'a> {
    tokens: Vec<&'a str>,
    pos: usize,
    options: &'a IdentifierOptions,
}

impl<'a> TokenParser<'a> {
    pub(super) fn new(s: &'a str, options: &'a IdentifierOptions) -> Self {
        Self::from_tokens(s.split_whitespace().collect(), options)
    }

    pub(super) fn from_tokens(tokens: Vec<&'a str>, options: &'a IdentifierOptions) -> Self {
        Self {
            tokens,
            pos: 0,
            options,
        }
    }

    fn peek(&self) -> Option<&'a str> {
        self.tokens.get(self.pos).copied()
    }

    fn next(&mut self) -> Option<&'a str> {
        let tok = self.peek();
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    /// Errors unless every token has been consumed.
    pub(super) fn ensure_done(&self) -> Result<(), ReferenceError> {
        if let Some(tok) = self.peek() {
            return Err(ReferenceError::InvalidIdentifier(format!(
                "unexpected token {tok:?}"
            )));
        }
        Ok(())
    }

    /// Parses an identifier (optional type prefix plus one location token).
    pub(super) fn parse_identifier(
        &mut self,
        context_type: &str,
    ) -> Result<Identifier, ReferenceError> {
        if !TYPE_PATTERN.is_match(context_type) {
            return Err(ReferenceError::InvalidIdentifier(
                "invalid context type".to_string(),
            ));
        }

        if self.tokens.is_empty() {
            return Err(ReferenceError::InvalidIdentifier(
                "empty identifier".to_string(),
            ));
        }

        let mut id = Identifier {
            resource_type: context_type.to_string(),
            scheme: self.options.scheme().to_string(),
            registry: self.options.registry().to_string(),
            namespace: None,
            name: None,
            path: None,
        };

        self.parse_type(context_type)?;
        self.parse_location(&mut id)?;

        Ok(id)
    }

    // Consumes the optional type prefix.
    fn parse_type(&mut self, context_type: &str) -> Result<(), ReferenceError> {
        let Some(tok) = self.peek() else {
            return Ok(());
        };
        if !TYPE_PATTERN.is_match(tok) {
            return Ok(());
        }

        // Look ahead: the current token is a type only when the next token
        // is shaped like a location. A single remaining token is always a
        // path, never a type.
        match self.tokens.get(self.pos + 1) {
            Some(next) if next.contains('/') || looks_like_registry(next) => {}
            _ => return Ok(()),
        }

        if tok != context_type {
            return Err(ReferenceError::TypeMismatch {
                found: tok.to_string(),
                context: context_type.to_string(),
            });
        }
        self.pos += 1;

        Ok(())
    }

    // Parses the resource location (scheme, registry, path).
    fn parse_location(&mut self, id: &mut Identifier) -> Result<(), ReferenceError> {
        let Some(tok) = self.next() else {
            return Err(ReferenceError::InvalidIdentifier(
                "empty identifier".to_string(),
            ));
        };

        // Full URI: scheme://registry/path
        if let Some((scheme, rest)) = tok.split_once("://") {
            return parse_uri(id, scheme, rest);
        }

        // Registry without scheme: registry/path
        if let Some((first, rest)) = tok.split_once('/') {
            if looks_like_registry(first) {
                return parse_registry_path(id, first, rest);
            }
        }

        // Default registry: namespace/name or name
        self.parse_default_path(id, tok)
    }

    fn parse_default_path(&self, id: &mut Identifier, tok: &str) -> Result<(), ReferenceError> {
        if let Some((namespace, name)) = tok.split_once('/') {
            if !NAME_PATTERN.is_match(namespace) {
                return Err(ReferenceError::InvalidIdentifier(format!(
                    "invalid namespace {namespace:?}"
                )));
            }
            if !NAME_PATTERN.is_match(name) {
                return Err(ReferenceError::InvalidIdentifier(format!(
                    "invalid name {name:?}"
                )));
            }
            id.namespace = Some(namespace.to_string());
            id.name = Some(name.to_string());
        } else {
            if !NAME_PATTERN.is_match(tok) {
                return Err(ReferenceError::InvalidIdentifier(format!(
                    "invalid name {tok:?}"
                )));
            }
            id.namespace = Some(self.options.namespace().to_string());
            id.name = Some(tok.to_string());
        }

        Ok(())
    }
}

fn parse_uri(id: &mut Identifier, scheme: &str, rest: &str) -> Result<(), ReferenceError> {
    if !SCHEME_PATTERN.is_match(scheme) {
        return Err(ReferenceError::InvalidIdentifier(format!(
            "invalid scheme {scheme:?}"
        )));
    }

    let Some((registry, path)) = rest.split_once('/') else {
        return Err(ReferenceError::InvalidIdentifier(
            "missing path".to_string(),
        ));
    };
    if registry.is_empty() {
        return Err(ReferenceError::InvalidIdentifier(
            "missing registry".to_string(),
        ));
    }
    if path.is_empty() {
        return Err(ReferenceError::InvalidIdentifier(
            "missing path".to_string(),
        ));
    }

    if !REGISTRY_PATTERN.is_match(registry) {
        return Err(ReferenceError::InvalidIdentifier(format!(
            "invalid registry {registry:?}"
        )));
    }
    if !PATH_PATTERN.is_match(path) {
        return Err(ReferenceError::InvalidIdentifier(format!(
            "invalid path {path:?}"
        )));
    }

    id.scheme = scheme.to_string();
    id.registry = registry.to_string();
    id.path = Some(path.to_string());

    Ok(())
}

fn parse_registry_path(id: &mut Identifier, registry: &str, path: &str) -> Result<(), ReferenceError> {
    if !REGISTRY_PATTERN.is_match(registry) {
        return Err(ReferenceError::InvalidIdentifier(format!(
            "invalid registry {registry:?}"
        )));
    }
    if path.is_empty() {
        return Err(ReferenceError::InvalidIdentifier("empty path".to_string()));
    }
    if !PATH_PATTERN.is_match(path) {
        return Err(ReferenceError::InvalidIdentifier(format!(
            "invalid path {path:?}"
        )));
    }

    id.registry = registry.to_string();
    id.path = Some(path.to_string());

    Ok(())
}

// A first segment containing a dot or a port colon is a registry
// hostname, not a namespace.
fn looks_like_registry(s: &str) -> bool {
    s.contains('.') || s.contains(':')
}
