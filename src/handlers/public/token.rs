// handlers/public/token.rs - GET /jwt/:uid/:email
//
// Mints a signed token for whatever uid and email the caller supplies. No
// credential is checked here: sign-in happens client-side against the identity
// provider before this is called. Admin routes still resolve the uid against
// the users collection, so a minted token alone grants nothing privileged.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use crate::auth::{generate_jwt, Claims};
use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

pub async fn token_get(
    State(state): State<AppState>,
    Path((uid, email)): Path<(String, String)>,
) -> Result<Json<TokenResponse>, ApiError> {
    let claims = Claims::new(uid, email, state.tokens.expiry_days);
    let token = generate_jwt(&claims, &state.tokens.secret)?;
    tracing::debug!(uid = %claims.uid, "Issued access token");
    Ok(Json(TokenResponse { token }))
}
