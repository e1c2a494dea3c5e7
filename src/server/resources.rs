use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;

use super::response::{json_response, ApiError};
use super::AppState;
use crate::types::{media_type, ResourceInfo};

pub async fn create_resource(
    State(state): State<Arc<AppState>>,
    Path(ns): Path<String>,
    Json(info): Json<ResourceInfo>,
) -> Result<Response, ApiError> {
    let resource = state.registry.create_resource(&ns, &info)?;
    Ok(json_response(
        StatusCode::CREATED,
        media_type::RESOURCE,
        &resource,
    ))
}

pub async fn list_resources(
    State(state): State<Arc<AppState>>,
    Path(ns): Path<String>,
) -> Result<Response, ApiError> {
    let list = state.registry.list_resources(&ns)?;
    Ok(json_response(
        StatusCode::OK,
        media_type::RESOURCE_LIST,
        &list,
    ))
}

pub async fn read_resource(
    State(state): State<Arc<AppState>>,
    Path((ns, res)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    let resource = state.registry.read_resource(&ns, &res)?;
    Ok(json_response(StatusCode::OK, media_type::RESOURCE, &resource))
}

pub async fn update_resource(
    State(state): State<Arc<AppState>>,
    Path((ns, res)): Path<(String, String)>,
    Json(info): Json<ResourceInfo>,
) -> Result<Response, ApiError> {
    let resource = state.registry.update_resource(&ns, &res, &info)?;
    Ok(json_response(StatusCode::OK, media_type::RESOURCE, &resource))
}

pub async fn delete_resource(
    State(state): State<Arc<AppState>>,
    Path((ns, res)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    state.registry.delete_resource(&ns, &res)?;
    Ok(StatusCode::NO_CONTENT)
}
