//! Authentication middleware
//!
//! Tokens are issued by the account service; this layer only verifies them.

use axum::{
    body::Body,
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::{
    constants::BEARER_PREFIX,
    error::{AppError, AppResult},
    state::AppState,
};

/// JWT claims the engine relies on
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: String,
    pub exp: i64,
}

/// Authenticated user extracted from JWT
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub id: Uuid,
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .copied()
            .ok_or(AppError::Unauthorized)
    }
}

/// Verify an HS256 token and extract its claims
pub fn verify_token(token: &str, secret: &str) -> AppResult<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;

    Ok(token_data.claims)
}

/// Authentication middleware
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let path = request.uri().path().to_string();

    let Some(auth_header) = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
    else {
        debug!(path = %path, "Auth failed: No Authorization header");
        return Err(AppError::Unauthorized);
    };

    let Some(token) = auth_header.strip_prefix(BEARER_PREFIX) else {
        debug!(path = %path, "Auth failed: expected 'Bearer <token>'");
        return Err(AppError::Unauthorized);
    };

    let claims = verify_token(token, &state.config().jwt.secret).inspect_err(|e| {
        debug!(path = %path, error = ?e, "Auth failed: Token verification failed");
    })?;

    let user_id = Uuid::parse_str(&claims.sub).map_err(|e| {
        debug!(path = %path, sub = %claims.sub, error = ?e, "Auth failed: Invalid user ID in token");
        AppError::InvalidToken
    })?;

    debug!(path = %path, user_id = %user_id, "User authenticated");

    request.extensions_mut().insert(AuthenticatedUser { id: user_id });
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use jsonwebtoken::{EncodingKey, Header, encode};

    use super::*;

    fn token(sub: &str, exp: i64, secret: &str) -> String {
        encode(
            &Header::default(),
            &Claims { sub: sub.to_string(), exp },
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_valid_token_yields_subject() {
        let user = Uuid::new_v4().to_string();
        let exp = chrono::Utc::now().timestamp() + 3600;

        let claims = verify_token(&token(&user, exp, "secret"), "secret").unwrap();
        assert_eq!(claims.sub, user);
    }

    #[test]
    fn test_expired_token() {
        let exp = chrono::Utc::now().timestamp() - 3600;
        let result = verify_token(&token("someone", exp, "secret"), "secret");
        assert!(matches!(result, Err(AppError::TokenExpired)));
    }

    #[test]
    fn test_wrong_secret() {
        let exp = chrono::Utc::now().timestamp() + 3600;
        let result = verify_token(&token("someone", exp, "secret"), "other");
        assert!(matches!(result, Err(AppError::InvalidToken)));
    }
}
