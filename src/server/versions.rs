use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;

use super::response::{json_response, ApiError};
use super::AppState;
use crate::types::{media_type, VersionInfo};

pub async fn create_version(
    State(state): State<Arc<AppState>>,
    Path((ns, res)): Path<(String, String)>,
    Json(info): Json<VersionInfo>,
) -> Result<Response, ApiError> {
    let version = state.registry.create_version(&ns, &res, &info)?;
    Ok(json_response(
        StatusCode::CREATED,
        media_type::VERSION,
        &version,
    ))
}

pub async fn list_versions(
    State(state): State<Arc<AppState>>,
    Path((ns, res)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    let list = state.registry.list_versions(&ns, &res)?;
    Ok(json_response(
        StatusCode::OK,
        media_type::VERSION_LIST,
        &list,
    ))
}

pub async fn read_version(
    State(state): State<Arc<AppState>>,
    Path((ns, res, ver)): Path<(String, String, String)>,
) -> Result<Response, ApiError> {
    let version = state.registry.read_version(&ns, &res, &ver)?;
    Ok(json_response(StatusCode::OK, media_type::VERSION, &version))
}

pub async fn update_version(
    State(state): State<Arc<AppState>>,
    Path((ns, res, ver)): Path<(String, String, String)>,
    Json(info): Json<VersionInfo>,
) -> Result<Response, ApiError> {
    let version = state.registry.update_version(&ns, &res, &ver, &info)?;
    Ok(json_response(StatusCode::OK, media_type::VERSION, &version))
}

pub async fn delete_version(
    State(state): State<Arc<AppState>>,
    Path((ns, res, ver)): Path<(String, String, String)>,
) -> Result<StatusCode, ApiError> {
    state.registry.delete_version(&ns, &res, &ver)?;
    Ok(StatusCode::NO_CONTENT)
}
