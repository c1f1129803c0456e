use std::sync::Arc;

use axum::{
    Json,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::IntoResponse,
};

use crate::auth::RequireUser;
use crate::error::Error;
use crate::server::AppState;
use crate::server::dto::{ItemBody, ItemIdParams, ItemListParams};
use crate::server::response::{ApiError, MessageResponse};
use crate::server::validation::validate_item_body;

pub async fn list_items(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    params: Result<Query<ItemListParams>, QueryRejection>,
) -> impl IntoResponse {
    let Query(params) = params?;

    let items = state
        .items
        .get_items(auth.user_id, &params.category_name)
        .map_err(|e| match e {
            Error::NotFound(_) => ApiError::bad_request(e.to_string()),
            e => ApiError::from(e),
        })?;

    Ok::<_, ApiError>(Json(items))
}

pub async fn create_item(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    body: Result<Json<ItemBody>, JsonRejection>,
) -> impl IntoResponse {
    let Json(body) = body?;
    let request = validate_item_body(body)?;

    state
        .items
        .create_item(auth.user_id, &request)
        .map_err(|e| match e {
            Error::NotFound(_) | Error::NameConflict(_) => ApiError::bad_request(e.to_string()),
            e => ApiError::from(e),
        })?;

    Ok::<_, ApiError>(MessageResponse::with_status(
        StatusCode::CREATED,
        "item created",
    ))
}

pub async fn update_item(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    params: Result<Query<ItemIdParams>, QueryRejection>,
    body: Result<Json<ItemBody>, JsonRejection>,
) -> impl IntoResponse {
    let Query(params) = params?;
    let Json(body) = body?;
    let request = validate_item_body(body)?;

    state
        .items
        .update_item(auth.user_id, &params.item_id, &request)
        .map_err(|e| match e {
            Error::NameConflict(_) => ApiError::bad_request(e.to_string()),
            e => ApiError::from(e),
        })?;

    Ok::<_, ApiError>(MessageResponse::with_status(StatusCode::OK, "item updated"))
}

pub async fn delete_item(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    params: Result<Query<ItemIdParams>, QueryRejection>,
) -> impl IntoResponse {
    let Query(params) = params?;

    state.items.delete_item(auth.user_id, &params.item_id)?;

    Ok::<_, ApiError>(MessageResponse::with_status(StatusCode::OK, "item deleted"))
}
