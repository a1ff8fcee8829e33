//! Core client library for the cycle calculation API.
//!
//! # Overview
//! This crate builds HTTP requests and parses HTTP responses for the
//! calculate endpoint without performing any I/O itself. The host owns the
//! network: it executes each `HttpRequest` with whatever HTTP stack it
//! likes and hands the `HttpResponse` back for parsing.
//!
//! # Design
//! - No async runtime and no HTTP dependency; the core is pure functions
//!   over plain data and trivially testable.
//! - Input validation runs locally against a declarative rule table before
//!   any request is built, with every violation collected in one pass.
//! - All types are owned so they can cross a C FFI boundary.

pub mod client;
pub mod error;
pub mod http;
pub mod params;
pub mod types;
pub mod validate;

pub use client::{CycleClient, DEFAULT_BASE_URL};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use types::{CycleRequest, CycleResponse};
pub use validate::ValidationError;
