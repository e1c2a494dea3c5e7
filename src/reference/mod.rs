//! Reference grammar for locating and constraining registry resources.
//!
//! A [`Reference`] combines an [`Identifier`] (type, scheme, registry,
//! path) with either a [`VersionConstraint`] or a channel name, and an
//! optional [`Digest`] that freezes the reference to exact content.

mod constraint;
mod digest;
mod identifier;
mod parser;
mod version;

use std::fmt;

use thiserror::Error;

pub use constraint::{ConstraintError, VersionConstraint};
pub use digest::Digest;
pub use identifier::{
    Identifier, IdentifierOptions, DEFAULT_NAMESPACE, DEFAULT_REGISTRY, DEFAULT_SCHEME,
};
pub use version::{parse_version, PartialVersion, Version};

use parser::TokenParser;

#[derive(Debug, Error)]
pub enum ReferenceError {
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("invalid reference: {0}")]
    InvalidReference(String),

    #[error("invalid digest: {0}")]
    InvalidDigest(String),

    #[error("resource type mismatch: type {found:?} does not match context {context:?}")]
    TypeMismatch { found: String, context: String },

    #[error("invalid version constraint")]
    Constraint(#[from] ConstraintError),
}

/// Resource reference.
///
/// A reference encapsulates all information needed to locate, identify,
/// and verify a resource. It combines an [`Identifier`] with version
/// information: exactly one of a version constraint or a channel, plus an
/// optional digest. References are immutable once created; use
/// [`Reference::parse`] to construct valid references.
#[derive(Debug, Clone, PartialEq)]
pub struct Reference {
    identifier: Identifier,
    version: Option<VersionConstraint>,
    channel: Option<String>,
    digest: Option<Digest>,
}

impl Reference {
    /// Parses a reference string.
    ///
    /// The expected format is:
    ///
    /// ```text
    /// [<type>] [[scheme://]registry/]<path> (<version> | :<channel>) [<digest>]
    /// ```
    ///
    /// The context type is required: it sets the type when the string does
    /// not include one and must match the type when it does. Version
    /// constraints may span multiple tokens (e.g. `>=1.0.0 <2.0.0`);
    /// channels are introduced by a colon (e.g. `:stable`). The optional
    /// trailing digest (`algorithm:hash`) freezes the reference. Options
    /// can be `None`, in which case package defaults apply.
    pub fn parse(
        s: &str,
        context_type: &str,
        options: Option<&IdentifierOptions>,
    ) -> Result<Self, ReferenceError> {
        let defaults = IdentifierOptions::default();
        let options = options.unwrap_or(&defaults);

        let tokens: Vec<&str> = s.split_whitespace().collect();
        let span = parser::identifier_span(&tokens);

        let mut id_parser = TokenParser::from_tokens(tokens[..span].to_vec(), options);
        let identifier = id_parser.parse_identifier(context_type)?;
        id_parser.ensure_done()?;

        let mut rest = tokens[span..].iter().copied().peekable();

        let mut channel = None;
        let mut version_tokens = Vec::new();

        if let Some(tok) = rest.peek() {
            if let Some(name) = tok.strip_prefix(':') {
                if !parser::is_valid_grammar_name(name) {
                    return Err(ReferenceError::InvalidReference(format!(
                        "invalid channel name {name:?}"
                    )));
                }
                channel = Some(name.to_string());
                rest.next();
            }
        }

        if channel.is_none() {
            while let Some(tok) = rest.peek() {
                if tok.contains(':') {
                    break;
                }
                version_tokens.push(*tok);
                rest.next();
            }
        }

        let mut digest = None;
        if let Some(tok) = rest.peek() {
            if tok.starts_with(':') {
                return Err(ReferenceError::InvalidReference(
                    "reference cannot include both a version and a channel".to_string(),
                ));
            }
            if tok.contains(':') {
                digest = Some(Digest::parse(tok)?);
                rest.next();
            }
        }

        if let Some(tok) = rest.next() {
            return Err(ReferenceError::InvalidReference(format!(
                "unexpected token {tok:?}"
            )));
        }

        let version = if channel.is_none() {
            if version_tokens.is_empty() {
                return Err(ReferenceError::InvalidReference(
                    "missing version or channel".to_string(),
                ));
            }
            Some(VersionConstraint::parse(&version_tokens.join(" "))?)
        } else {
            None
        };

        Ok(Self {
            identifier,
            version,
            channel,
            digest,
        })
    }

    pub fn identifier(&self) -> &Identifier {
        &self.identifier
    }

    /// Semantic version constraint. `None` if channel-based.
    pub fn version(&self) -> Option<&VersionConstraint> {
        self.version.as_ref()
    }

    /// Named release track. `None` if version-based.
    pub fn channel(&self) -> Option<&str> {
        self.channel.as_deref()
    }

    /// Cryptographic hash for content verification. `None` if not frozen.
    pub fn digest(&self) -> Option<&Digest> {
        self.digest.as_ref()
    }

    /// Whether the reference includes a digest.
    ///
    /// A frozen reference refers to an exact, immutable resource version.
    pub fn is_frozen(&self) -> bool {
        self.digest.is_some()
    }

    /// Whether the reference uses a channel instead of a version constraint.
    pub fn is_channel_based(&self) -> bool {
        self.channel.is_some()
    }

    /// Whether the reference uses a version constraint.
    pub fn is_version_based(&self) -> bool {
        self.version.is_some()
    }

    pub fn resource_type(&self) -> &str {
        self.identifier.resource_type()
    }

    pub fn namespace(&self) -> Option<&str> {
        self.identifier.namespace()
    }

    pub fn name(&self) -> Option<&str> {
        self.identifier.name()
    }

    /// The constraint satisfied by versions matching both references.
    ///
    /// Errors when either reference is channel-based. A disjoint result is
    /// returned as a well-formed constraint that matches no version; use
    /// [`VersionConstraint::require_satisfiable`] to detect it.
    pub fn intersect(&self, other: &Reference) -> Result<VersionConstraint, ReferenceError> {
        match (&self.version, &other.version) {
            (Some(a), Some(b)) => Ok(a.intersect(b)),
            _ => Err(ReferenceError::InvalidReference(
                "cannot intersect channel-based references".to_string(),
            )),
        }
    }
}

impl fmt::Display for Reference {
    /// The canonical form. The type, scheme, and registry are always
    /// included, even when defaults; version or channel is always
    /// included, and the digest is appended if present.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.identifier)?;

        if let Some(channel) = &self.channel {
            write!(f, " :{channel}")?;
        } else if let Some(version) = &self.version {
            write!(f, " {version}")?;
        }

        if let Some(digest) = &self.digest {
            write!(f, " {digest}")?;
        }

        Ok(())
    }
}
