use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;

use super::response::{json_response, ApiError};
use super::AppState;
use crate::types::{media_type, NamespaceInfo};

pub async fn create_namespace(
    State(state): State<Arc<AppState>>,
    Json(info): Json<NamespaceInfo>,
) -> Result<Response, ApiError> {
    let ns = state.registry.create_namespace(&info)?;
    Ok(json_response(
        StatusCode::CREATED,
        media_type::NAMESPACE,
        &ns,
    ))
}

pub async fn list_namespaces(State(state): State<Arc<AppState>>) -> Result<Response, ApiError> {
    let list = state.registry.list_namespaces()?;
    Ok(json_response(
        StatusCode::OK,
        media_type::NAMESPACE_LIST,
        &list,
    ))
}

pub async fn read_namespace(
    State(state): State<Arc<AppState>>,
    Path(ns): Path<String>,
) -> Result<Response, ApiError> {
    let namespace = state.registry.read_namespace(&ns)?;
    Ok(json_response(
        StatusCode::OK,
        media_type::NAMESPACE,
        &namespace,
    ))
}

pub async fn update_namespace(
    State(state): State<Arc<AppState>>,
    Path(ns): Path<String>,
    Json(info): Json<NamespaceInfo>,
) -> Result<Response, ApiError> {
    let namespace = state.registry.update_namespace(&ns, &info)?;
    Ok(json_response(
        StatusCode::OK,
        media_type::NAMESPACE,
        &namespace,
    ))
}

pub async fn delete_namespace(
    State(state): State<Arc<AppState>>,
    Path(ns): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.registry.delete_namespace(&ns)?;
    Ok(StatusCode::NO_CONTENT)
}
