//! Extractors whose rejections go through `DomainError`, so malformed ids,
//! query strings and bodies answer 400 with a `{"detail"}` body like every
//! other error.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts};

use crate::domain::DomainError;

#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(DomainError))]
pub(super) struct ApiJson<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(DomainError))]
pub(super) struct ApiPath<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(DomainError))]
pub(super) struct ApiQuery<T>(pub T);

impl From<JsonRejection> for DomainError {
    fn from(rejection: JsonRejection) -> Self {
        DomainError::InvalidInput(rejection.body_text())
    }
}

impl From<PathRejection> for DomainError {
    fn from(rejection: PathRejection) -> Self {
        DomainError::InvalidInput(rejection.body_text())
    }
}

impl From<QueryRejection> for DomainError {
    fn from(rejection: QueryRejection) -> Self {
        DomainError::InvalidInput(rejection.body_text())
    }
}
