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
use crate::server::dto::{CategoryBody, CategoryIdParams, CategoryItemsParams};
use crate::server::response::{ApiError, MessageResponse};
use crate::server::validation::validate_category_body;

pub async fn list_categories(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let categories = state.categories.list_categories(auth.user_id)?;

    Ok::<_, ApiError>(Json(categories))
}

pub async fn list_category_items(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    params: Result<Query<CategoryItemsParams>, QueryRejection>,
) -> impl IntoResponse {
    let Query(params) = params?;
    let items = state
        .categories
        .get_category_items(auth.user_id, &params.category_id)?;

    Ok::<_, ApiError>(Json(items))
}

pub async fn create_category(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    body: Result<Json<CategoryBody>, JsonRejection>,
) -> impl IntoResponse {
    let Json(body) = body?;
    let request = validate_category_body(body)?;

    let category = state.categories.create_category(&request, auth.user_id)?;

    Ok::<_, ApiError>((StatusCode::CREATED, Json(category)))
}

pub async fn update_category(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    params: Result<Query<CategoryIdParams>, QueryRejection>,
    body: Result<Json<CategoryBody>, JsonRejection>,
) -> impl IntoResponse {
    let Query(params) = params?;
    let Json(body) = body?;
    let request = validate_category_body(body)?;

    state
        .categories
        .update_category(&params.category_id, &request, auth.user_id)
        .map_err(|e| match e {
            Error::NotFound(_) => ApiError::bad_request(e.to_string()),
            e => ApiError::from(e),
        })?;

    Ok::<_, ApiError>(MessageResponse::with_status(
        StatusCode::OK,
        "category updated",
    ))
}

pub async fn delete_category(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    params: Result<Query<CategoryIdParams>, QueryRejection>,
) -> impl IntoResponse {
    let Query(params) = params?;

    state
        .categories
        .delete_category(&params.category_id, auth.user_id)?;

    Ok::<_, ApiError>(MessageResponse::with_status(
        StatusCode::ACCEPTED,
        "category deleted",
    ))
}
