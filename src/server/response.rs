use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::error::{Error, ErrorCode};
use crate::types::media_type;

/// Registry error carried to an HTTP response.
///
/// The body is the wire `Error { code, message }` shape under the error
/// vendor media type.
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::BadRequest => StatusCode::BAD_REQUEST,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::NamespaceExists
        | ErrorCode::ResourceExists
        | ErrorCode::VersionExists
        | ErrorCode::ChannelExists
        | ErrorCode::NamespaceNotEmpty
        | ErrorCode::ResourceHasPublishedVersions
        | ErrorCode::VersionPublished => StatusCode::CONFLICT,
        ErrorCode::PreconditionFailed => StatusCode::PRECONDITION_FAILED,
        ErrorCode::UnsupportedMediaType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        ErrorCode::NotAcceptable => StatusCode::NOT_ACCEPTABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(self.0.code());
        let mut response = (status, Json(self.0.body())).into_response();
        response
            .headers_mut()
            .insert(header::CONTENT_TYPE, json_content_type(media_type::ERROR));
        response
    }
}

/// Serializes a body as JSON under a vendor media type (`+json` suffixed).
pub fn json_response<T: Serialize>(status: StatusCode, media_type: &str, body: &T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response
        .headers_mut()
        .insert(header::CONTENT_TYPE, json_content_type(media_type));
    response
}

fn json_content_type(media_type: &str) -> HeaderValue {
    HeaderValue::from_str(&format!("{media_type}+json")).expect("valid media type")
}
