use crate::api::extractors::{PathId, RequestId, resource};
use crate::api::handlers::json_body;
use crate::api::models::users::{UserBookRequest, UserBookResponse};
use crate::errors::Result;
use crate::types::Resource;
use crate::AppState;
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use tracing::info;

#[tracing::instrument(skip_all)]
pub async fn create_user_with_books(
    State(state): State<AppState>,
    request_id: RequestId<resource::User>,
    body: std::result::Result<Json<Option<UserBookRequest>>, JsonRejection>,
) -> Result<Json<UserBookResponse>> {
    info!(request_id = %request_id.value, "Got create user with books request");

    let mut request = json_body(body, Resource::User)?.unwrap_or_default();
    let user_request = request.user_request.take();
    let response = state
        .user_book_service()
        .create_user_with_books(user_request, request.books())
        .await?;

    Ok(Json(response))
}

#[tracing::instrument(skip_all, fields(user_id = path.id))]
pub async fn update_user_with_books(
    State(state): State<AppState>,
    path: PathId<resource::User>,
    body: std::result::Result<Json<Option<UserBookRequest>>, JsonRejection>,
) -> Result<Json<UserBookResponse>> {
    let mut request = json_body(body, Resource::User)?.unwrap_or_default();
    let user_request = request.user_request.take();
    let response = state
        .user_book_service()
        .update_user_with_books(path.id, user_request, request.books())
        .await?;

    Ok(Json(response))
}

#[tracing::instrument(skip_all, fields(user_id = path.id))]
pub async fn get_user_with_books(State(state): State<AppState>, path: PathId<resource::User>) -> Result<Json<UserBookResponse>> {
    let response = state.user_book_service().get_user_with_books(path.id).await?;

    Ok(Json(response))
}

#[tracing::instrument(skip_all, fields(user_id = path.id))]
pub async fn delete_user_with_books(State(state): State<AppState>, path: PathId<resource::User>) -> Result<StatusCode> {
    state.user_book_service().delete_user_with_books(path.id).await?;

    Ok(StatusCode::OK)
}
