//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request for a data endpoint:
//!     → auth.rs (API key, then basic auth; reject before any data access)
//!     → handler
//! Every response:
//!     → headers.rs (X-Content-Type-Options)
//! ```
//!
//! # Design Decisions
//! - Fail closed: reject on any credential problem
//! - Applied as a route layer so /health stays public

pub mod auth;
pub mod headers;
