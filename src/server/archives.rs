use std::io::Read;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};

use super::response::{json_response, ApiError};
use super::AppState;
use crate::error::Error;
use crate::types::media_type;

pub async fn upload_archive(
    State(state): State<Arc<AppState>>,
    Path((ns, res, ver)): Path<(String, String, String)>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let mut reader = body.as_ref();
    let version = state
        .registry
        .upload_archive(&ns, &res, &ver, &mut reader)?;
    Ok(json_response(StatusCode::OK, media_type::VERSION, &version))
}

pub async fn download_archive(
    State(state): State<Arc<AppState>>,
    Path((ns, res, ver)): Path<(String, String, String)>,
) -> Result<Response, ApiError> {
    let mut reader = state.registry.download_archive(&ns, &res, &ver)?;

    let mut data = Vec::new();
    reader.read_to_end(&mut data).map_err(|e| {
        tracing::error!(namespace = %ns, resource = %res, version = %ver, error = %e, "failed to read archive");
        Error::Internal {
            message: "unable to read archive file",
            cause: Some(Box::new(e)),
        }
    })?;

    let mut response = data.into_response();
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(media_type::ARCHIVE),
    );
    Ok(response)
}
