use crate::api::extractors::{PathId, RequestId, resource};
use crate::api::handlers::json_body;
use crate::api::models::books::{BookRequest, BookResponse};
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
pub async fn create_book(
    State(state): State<AppState>,
    request_id: RequestId<resource::Book>,
    body: std::result::Result<Json<Option<BookRequest>>, JsonRejection>,
) -> Result<Json<BookResponse>> {
    info!(request_id = %request_id.value, "Got create book request");

    let request = json_body(body, Resource::Book)?;
    let book = state.book_service().create_book(request).await?;

    Ok(Json(BookResponse::from(book)))
}

#[tracing::instrument(skip_all, fields(book_id = path.id))]
pub async fn update_book(
    State(state): State<AppState>,
    path: PathId<resource::Book>,
    body: std::result::Result<Json<Option<BookRequest>>, JsonRejection>,
) -> Result<Json<BookResponse>> {
    let request = json_body(body, Resource::Book)?;
    let book = state.book_service().update_book(path.id, request).await?;

    Ok(Json(BookResponse::from(book)))
}

#[tracing::instrument(skip_all, fields(book_id = path.id))]
pub async fn get_book(State(state): State<AppState>, path: PathId<resource::Book>) -> Result<Json<BookResponse>> {
    let book = state.book_service().get_book(path.id).await?;

    Ok(Json(BookResponse::from(book)))
}

#[tracing::instrument(skip_all, fields(book_id = path.id))]
pub async fn delete_book(State(state): State<AppState>, path: PathId<resource::Book>) -> Result<StatusCode> {
    state.book_service().delete_book(path.id).await?;

    Ok(StatusCode::OK)
}
