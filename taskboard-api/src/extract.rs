/// Request extractors
///
/// [`JsonBody`] behaves like `axum::Json` but rejects malformed or non-JSON
/// bodies with the same JSON error shape as every other failure.

use axum::extract::FromRequest;

use crate::error::ApiError;

/// JSON request body
#[derive(Debug, Clone, Copy, Default, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);
