//! HTTP request handlers for all API endpoints.
//!
//! Handlers translate requests into service calls; failures become responses through the
//! `IntoResponse` impl on [`crate::errors::Error`].
//!
//! - [`books`]: single-book create, update, get and delete
//! - [`users`]: a user together with its books

pub mod books;
pub mod users;

use crate::errors::{Error, Result};
use crate::types::Resource;
use axum::{Json, extract::rejection::JsonRejection};

/// Unwrap a JSON body, reporting unreadable bodies as invalid input for `resource`
pub(crate) fn json_body<T>(body: std::result::Result<Json<Option<T>>, JsonRejection>, resource: Resource) -> Result<Option<T>> {
    match body {
        Ok(Json(value)) => Ok(value),
        Err(rejection) => Err(Error::invalid_input(resource, rejection.body_text())),
    }
}
