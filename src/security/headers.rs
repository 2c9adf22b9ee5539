//! Response hardening headers.

use axum::http::HeaderValue;

/// Value for `X-Content-Type-Options`.
pub const NOSNIFF: HeaderValue = HeaderValue::from_static("nosniff");
