//! Shared-secret authentication for the data endpoints.
//!
//! Credential precedence:
//! 1. Pre-shared key in `X-API-Key` or the `api_key` query parameter
//! 2. `Authorization: Basic base64(username:password)`
//!
//! A supplied but wrong credential is `Forbidden`; an undecodable basic
//! credential is `BadFormat`; no credential at all is `Unauthenticated`.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Query, State},
    http::{header::AUTHORIZATION, HeaderMap, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Deserialize;

use crate::config::AuthConfig;
use crate::http::error::ApiError;
use crate::http::request::request_id;

pub const X_API_KEY: &str = "x-api-key";

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("no credential supplied")]
    Unauthenticated,
    #[error("credential rejected")]
    Forbidden,
    #[error("malformed basic credential")]
    BadFormat,
}

impl AuthError {
    fn reason(&self) -> &'static str {
        match self {
            AuthError::Unauthenticated => "missing",
            AuthError::Forbidden => "forbidden",
            AuthError::BadFormat => "bad_format",
        }
    }
}

/// Who was let through. Attached to request extensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Principal {
    ApiKey,
    Basic { username: String },
}

/// Check the request credentials against the configured secrets.
pub fn authenticate(
    config: &AuthConfig,
    headers: &HeaderMap,
    query_key: Option<&str>,
) -> Result<Principal, AuthError> {
    let header_key = match headers.get(X_API_KEY) {
        Some(value) => Some(value.to_str().map_err(|_| AuthError::Forbidden)?),
        None => None,
    };
    let present = |key: &&str| !key.is_empty();

    if let Some(supplied) = header_key.filter(present).or(query_key.filter(present)) {
        return match config.api_key.as_deref() {
            Some(expected) if expected == supplied => Ok(Principal::ApiKey),
            _ => Err(AuthError::Forbidden),
        };
    }

    let Some(header) = headers.get(AUTHORIZATION) else {
        return Err(AuthError::Unauthenticated);
    };
    let header = header.to_str().map_err(|_| AuthError::BadFormat)?;
    let Some(encoded) = strip_basic(header) else {
        return Err(AuthError::Unauthenticated);
    };

    let (username, password) = decode_basic(encoded)?;
    match (config.username.as_deref(), config.password.as_deref()) {
        (Some(u), Some(p)) if u == username && p == password => {
            Ok(Principal::Basic { username })
        }
        _ => Err(AuthError::Forbidden),
    }
}

fn strip_basic(header: &str) -> Option<&str> {
    let (scheme, rest) = header.trim().split_once(' ')?;
    scheme.eq_ignore_ascii_case("basic").then(|| rest.trim())
}

fn decode_basic(encoded: &str) -> Result<(String, String), AuthError> {
    let bytes = STANDARD.decode(encoded).map_err(|_| AuthError::BadFormat)?;
    let decoded = String::from_utf8(bytes).map_err(|_| AuthError::BadFormat)?;
    let (username, password) = decoded.split_once(':').ok_or(AuthError::BadFormat)?;
    Ok((username.to_string(), password.to_string()))
}

/// State required by the auth middleware.
#[derive(Clone)]
pub struct AuthState {
    config: Arc<AuthConfig>,
}

impl AuthState {
    pub fn new(config: AuthConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

#[derive(Deserialize)]
struct KeyQuery {
    api_key: Option<String>,
}

/// Route layer guarding the data endpoints.
pub async fn require_credentials(
    State(state): State<AuthState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let query_key = Query::<KeyQuery>::try_from_uri(request.uri())
        .ok()
        .and_then(|Query(q)| q.api_key);

    match authenticate(&state.config, request.headers(), query_key.as_deref()) {
        Ok(principal) => {
            tracing::debug!(
                request_id = %request_id(request.headers()),
                principal = ?principal,
                "Authenticated"
            );
            request.extensions_mut().insert(principal);
            next.run(request).await
        }
        Err(err) => {
            tracing::warn!(
                request_id = %request_id(request.headers()),
                path = %request.uri().path(),
                reason = err.reason(),
                "Rejected credentials"
            );
            metrics::counter!("wimbledon_auth_rejections_total", "reason" => err.reason())
                .increment(1);
            ApiError::from(err).into_response()
        }
    }
}
