//! Custom Axum extractors

use crate::AppState;
use crate::errors::{Error, Result};
use crate::validation::{parse_id, validate_request_id};
use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;
use std::marker::PhantomData;
use tracing::instrument;

/// Marker types naming the resource an extractor's failures are reported against
pub mod resource {
    use crate::types::Resource;

    pub trait ResourceKind: Send + Sync + 'static {
        const RESOURCE: Resource;
    }

    #[derive(Debug)]
    pub struct User;
    #[derive(Debug)]
    pub struct Book;

    impl ResourceKind for User {
        const RESOURCE: Resource = Resource::User;
    }

    impl ResourceKind for Book {
        const RESOURCE: Resource = Resource::Book;
    }
}

use resource::ResourceKind;

/// The caller's request id, taken from the configured header and checked against the configured
/// pattern. Missing or malformed values are rejected as invalid input for `R`.
#[derive(Debug)]
pub struct RequestId<R> {
    pub value: String,
    _resource: PhantomData<R>,
}

impl<R: ResourceKind> FromRequestParts<AppState> for RequestId<R> {
    type Rejection = Error;

    #[instrument(skip(parts, state))]
    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        let header = parts
            .headers
            .get(state.config.api.request_id_header.as_str())
            .map(|value| value.to_str().unwrap_or_default());

        let value = validate_request_id(header, &state.request_id_pattern, R::RESOURCE)?;

        Ok(Self {
            value,
            _resource: PhantomData,
        })
    }
}

/// A numeric id from the path. Anything unparsable is invalid input for `R`, not a 404.
#[derive(Debug)]
pub struct PathId<R> {
    pub id: i64,
    _resource: PhantomData<R>,
}

impl<S, R> FromRequestParts<S> for PathId<R>
where
    S: Send + Sync,
    R: ResourceKind,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self> {
        let Path(raw): Path<String> = Path::from_request_parts(parts, state)
            .await
            .map_err(|e| Error::invalid_input(R::RESOURCE, format!("{} id is missing: {e}", R::RESOURCE)))?;

        Ok(Self {
            id: parse_id(&raw, R::RESOURCE)?,
            _resource: PhantomData,
        })
    }
}
