use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;

use super::response::{json_response, ApiError};
use super::AppState;
use crate::types::{media_type, ChannelInfo};

pub async fn create_channel(
    State(state): State<Arc<AppState>>,
    Path((ns, res)): Path<(String, String)>,
    Json(info): Json<ChannelInfo>,
) -> Result<Response, ApiError> {
    let channel = state.registry.create_channel(&ns, &res, &info)?;
    Ok(json_response(
        StatusCode::CREATED,
        media_type::CHANNEL,
        &channel,
    ))
}

pub async fn list_channels(
    State(state): State<Arc<AppState>>,
    Path((ns, res)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    let list = state.registry.list_channels(&ns, &res)?;
    Ok(json_response(
        StatusCode::OK,
        media_type::CHANNEL_LIST,
        &list,
    ))
}

pub async fn read_channel(
    State(state): State<Arc<AppState>>,
    Path((ns, res, ch)): Path<(String, String, String)>,
) -> Result<Response, ApiError> {
    let channel = state.registry.read_channel(&ns, &res, &ch)?;
    Ok(json_response(StatusCode::OK, media_type::CHANNEL, &channel))
}

pub async fn update_channel(
    State(state): State<Arc<AppState>>,
    Path((ns, res, ch)): Path<(String, String, String)>,
    Json(info): Json<ChannelInfo>,
) -> Result<Response, ApiError> {
    let channel = state.registry.update_channel(&ns, &res, &ch, &info)?;
    Ok(json_response(StatusCode::OK, media_type::CHANNEL, &channel))
}

pub async fn delete_channel(
    State(state): State<Arc<AppState>>,
    Path((ns, res, ch)): Path<(String, String, String)>,
) -> Result<StatusCode, ApiError> {
    state.registry.delete_channel(&ns, &res, &ch)?;
    Ok(StatusCode::NO_CONTENT)
}
