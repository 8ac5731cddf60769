//! Contest scope middleware
//!
//! Contest-scoped routes name their contest in the `X-Contest-Id` header.
//! A missing header leaves the scope empty and the access rules deny the
//! request; a malformed one is rejected here.

use axum::{
    body::Body,
    extract::{FromRequestParts, Request},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::{constants::CONTEST_ID_HEADER, error::AppError};

/// Contest named by the request, if any
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContestScope(pub Option<Uuid>);

impl ContestScope {
    /// Read the scope from request headers
    pub fn from_headers(headers: &axum::http::HeaderMap) -> Result<Self, AppError> {
        let Some(value) = headers.get(CONTEST_ID_HEADER) else {
            return Ok(Self(None));
        };

        let raw = value
            .to_str()
            .map_err(|_| AppError::InvalidInput(format!("{} must be a UUID", CONTEST_ID_HEADER)))?;
        let id = Uuid::parse_str(raw.trim())
            .map_err(|_| AppError::InvalidInput(format!("{} must be a UUID, got '{}'", CONTEST_ID_HEADER, raw)))?;

        Ok(Self(Some(id)))
    }

    /// The scoped contest; access guards reject unscoped requests first
    pub fn require(self) -> Result<Uuid, AppError> {
        self.0
            .ok_or_else(|| AppError::Forbidden("requires a contest context".to_string()))
    }
}

impl<S> FromRequestParts<S> for ContestScope
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<ContestScope>() {
            Some(scope) => Ok(*scope),
            None => Self::from_headers(&parts.headers),
        }
    }
}

/// Parse `X-Contest-Id` once and store it in request extensions
pub async fn contest_scope_middleware(mut request: Request<Body>, next: Next) -> Result<Response, AppError> {
    let scope = ContestScope::from_headers(request.headers())?;
    request.extensions_mut().insert(scope);
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use axum::http::{HeaderMap, HeaderValue};

    use super::*;

    #[test]
    fn test_missing_header_is_empty_scope() {
        assert_eq!(ContestScope::from_headers(&HeaderMap::new()).unwrap(), ContestScope(None));
    }

    #[test]
    fn test_header_parsed() {
        let id = Uuid::new_v4();
        let mut headers = HeaderMap::new();
        headers.insert(CONTEST_ID_HEADER, HeaderValue::from_str(&id.to_string()).unwrap());

        assert_eq!(ContestScope::from_headers(&headers).unwrap(), ContestScope(Some(id)));
    }

    #[test]
    fn test_malformed_header_rejected() {
        let mut headers = HeaderMap::new();
        headers.insert(CONTEST_ID_HEADER, HeaderValue::from_static("contest-7"));

        assert!(matches!(
            ContestScope::from_headers(&headers),
            Err(AppError::InvalidInput(_))
        ));
    }
}
