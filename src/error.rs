use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Machine-readable error code surfaced to callers.
///
/// Provides granular error classification beyond HTTP status codes. Some
/// codes are reserved for lifecycle rules and content negotiation and are
/// not currently emitted by the registry core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    BadRequest,
    NotFound,
    NamespaceExists,
    NamespaceNotEmpty,
    ResourceExists,
    ResourceHasPublishedVersions,
    VersionExists,
    VersionPublished,
    ChannelExists,
    PreconditionFailed,
    UnsupportedMediaType,
    NotAcceptable,
    InternalError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::BadRequest => "bad_request",
            ErrorCode::NotFound => "not_found",
            ErrorCode::NamespaceExists => "namespace_exists",
            ErrorCode::NamespaceNotEmpty => "namespace_not_empty",
            ErrorCode::ResourceExists => "resource_exists",
            ErrorCode::ResourceHasPublishedVersions => "resource_has_published_versions",
            ErrorCode::VersionExists => "version_exists",
            ErrorCode::VersionPublished => "version_published",
            ErrorCode::ChannelExists => "channel_exists",
            ErrorCode::PreconditionFailed => "precondition_failed",
            ErrorCode::UnsupportedMediaType => "unsupported_media_type",
            ErrorCode::NotAcceptable => "not_acceptable",
            ErrorCode::InternalError => "internal_error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Registry error.
///
/// Internal causes are carried for logging but never serialized; callers
/// see only the code and a stable message.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("namespace already exists")]
    NamespaceExists,

    #[error("resource already exists")]
    ResourceExists,

    #[error("version already exists")]
    VersionExists,

    #[error("channel already exists")]
    ChannelExists,

    #[error("{message}")]
    Internal {
        message: &'static str,
        #[source]
        cause: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl Error {
    pub fn internal(message: &'static str) -> Self {
        Self::Internal {
            message,
            cause: None,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Error::BadRequest(_) => ErrorCode::BadRequest,
            Error::NotFound(_) => ErrorCode::NotFound,
            Error::NamespaceExists => ErrorCode::NamespaceExists,
            Error::ResourceExists => ErrorCode::ResourceExists,
            Error::VersionExists => ErrorCode::VersionExists,
            Error::ChannelExists => ErrorCode::ChannelExists,
            Error::Internal { .. } => ErrorCode::InternalError,
        }
    }

    /// The wire representation: code plus human-readable message.
    pub fn body(&self) -> ErrorBody {
        ErrorBody {
            code: self.code(),
            message: self.to_string(),
        }
    }
}

/// Error response payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: ErrorCode,
    pub message: String,
}

pub type Result<T> = std::result::Result<T, Error>;
