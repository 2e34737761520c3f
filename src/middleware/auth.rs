use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use crate::auth::{decode_jwt, Claims, JwtError};
use crate::error::ApiError;
use crate::services::{authorize_admin, UserRecord};
use crate::AppState;

/// Admin context injected into request extensions once the gate admits a caller
#[derive(Clone, Debug)]
pub struct AdminContext {
    pub claims: Claims,
    pub user: UserRecord,
}

/// Gate for admin-only routes.
///
/// Missing header is 401. Anything wrong with the token itself, or a subject
/// that does not resolve to an admin, is 403 "Access denied".
pub async fn require_admin(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = extract_authorization(&headers)?;

    let claims = verify_bearer(header, &state.tokens.secret)?;

    let user = authorize_admin(state.store.as_ref(), &claims.uid).await?;

    request
        .extensions_mut()
        .insert(AdminContext { claims, user });

    Ok(next.run(request).await)
}

/// An empty or blank header counts as missing
fn extract_authorization(headers: &HeaderMap) -> Result<&str, ApiError> {
    let missing = || ApiError::unauthorized("unauthorized access");

    let value = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or_else(missing)?;

    if value.as_bytes().iter().all(u8::is_ascii_whitespace) {
        return Err(missing());
    }

    value.to_str().map_err(|_| {
        tracing::debug!("Authorization header is not valid ASCII");
        ApiError::access_denied()
    })
}

fn verify_bearer(header: &str, secret: &str) -> Result<Claims, ApiError> {
    let Some(token) = header.strip_prefix("Bearer ").map(str::trim) else {
        tracing::debug!("Authorization header does not use the Bearer scheme");
        return Err(ApiError::access_denied());
    };

    decode_jwt(token, secret).map_err(|e| {
        if let JwtError::Invalid(reason) = &e {
            tracing::warn!("Rejected bearer token: {}", reason);
        }
        ApiError::from(e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::generate_jwt;
    use axum::http::{HeaderValue, StatusCode};

    #[test]
    fn missing_header_is_unauthorized() {
        let err = extract_authorization(&HeaderMap::new()).unwrap_err();
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn blank_header_is_unauthorized() {
        for blank in ["", "   "] {
            let mut headers = HeaderMap::new();
            headers.insert("authorization", HeaderValue::from_static(blank));
            let err = extract_authorization(&headers).unwrap_err();
            assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED, "header {:?}", blank);
        }
    }

    #[test]
    fn header_value_is_returned_verbatim() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_static("Bearer abc"));
        assert_eq!(extract_authorization(&headers).unwrap(), "Bearer abc");
    }

    #[test]
    fn non_bearer_scheme_is_forbidden() {
        let err = verify_bearer("Basic dXNlcjpwYXNz", "secret").unwrap_err();
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(err.message(), "Access denied");
    }

    #[test]
    fn valid_bearer_yields_claims() {
        let token = generate_jwt(&Claims::new("u9", "u9@example.com", 30), "secret").unwrap();
        let claims = verify_bearer(&format!("Bearer {}", token), "secret").unwrap();
        assert_eq!(claims.uid, "u9");
    }
}
