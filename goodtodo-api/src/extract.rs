/// Request extractors that reject with [`ApiError`]
///
/// axum's own `Json` and `Path` answer malformed input with 422 or a plain
/// text 400. These wrappers route the rejection through `ApiError` so every
/// failure carries the standard JSON error body.
use crate::error::ApiError;
use axum::extract::{FromRequest, FromRequestParts};

/// JSON request body
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// URL path parameters
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);
