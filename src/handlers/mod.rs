// handlers/mod.rs - Two-tier handler layout
//
// Public (no auth) and Admin (bearer token + admin role). Every handler maps
// one request onto exactly one DocumentStore call and returns its raw result.

pub mod admin;
pub mod public;

use axum::http::Uri;

use crate::error::ApiError;

/// Fallback for unmatched routes
pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::not_found(format!("Cannot find {}", uri.path()))
}
