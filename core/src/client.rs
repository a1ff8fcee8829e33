//! Stateless API client for the cycle calculation service.
//!
//! # Design
//! The client never performs I/O. `build_*` methods validate input and
//! return an `HttpRequest` describing the call; the host executes it and
//! feeds the resulting `HttpResponse` to `parse_*`. The raw builder skips
//! validation entirely so callers can exercise the server's own checks or
//! forward parameters verbatim.

use std::collections::BTreeMap;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{ApiErrorBody, CycleRequest, CycleResponse};

/// Production endpoint for the calculate operation.
pub const DEFAULT_BASE_URL: &str = "https://api.apiverve.com/v1/menstrualcycle";

/// Stateless request builder and response parser.
///
/// Holds only the API key and base URL; every method is a pure function of
/// its inputs and this configuration.
#[derive(Debug, Clone)]
pub struct CycleClient {
    api_key: String,
    base_url: String,
}

impl CycleClient {
    /// Create a client against the production endpoint.
    pub fn new(api_key: &str) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Create a client against a custom endpoint, e.g. a local test server.
    pub fn with_base_url(api_key: &str, base_url: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Build a calculate request after validating `input` locally.
    ///
    /// Fails with `ApiError::MissingApiKey` when the client has no key and
    /// `ApiError::Validation` when any parameter violates its constraints.
    /// No request is produced in either case.
    pub fn build_calculate(&self, input: &CycleRequest) -> Result<HttpRequest, ApiError> {
        self.check_api_key()?;
        input.validate()?;
        Ok(self.get_request(input.to_query_params()))
    }

    /// Build a calculate request from raw query parameters, skipping local
    /// validation. The server still enforces its own constraints.
    pub fn build_calculate_raw(
        &self,
        params: &BTreeMap<String, String>,
    ) -> Result<HttpRequest, ApiError> {
        self.check_api_key()?;
        Ok(self.get_request(params.clone()))
    }

    /// Parse the response to a calculate request.
    pub fn parse_calculate(&self, response: HttpResponse) -> Result<CycleResponse, ApiError> {
        check_status(&response)?;
        serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
    }

    fn check_api_key(&self) -> Result<(), ApiError> {
        if self.api_key.is_empty() {
            return Err(ApiError::MissingApiKey);
        }
        Ok(())
    }

    fn get_request(&self, query: BTreeMap<String, String>) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: self.base_url.clone(),
            query,
            headers: vec![("x-api-key".to_string(), self.api_key.clone())],
        }
    }
}

/// Map non-success statuses to `ApiError::Api`, preferring the message from
/// the server's error envelope over the raw body.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if (200..300).contains(&response.status) {
        return Ok(());
    }
    let message = match serde_json::from_str::<ApiErrorBody>(&response.body) {
        Ok(body) => body.error,
        Err(_) if !response.body.is_empty() => response.body.clone(),
        Err(_) => format!("status {}", response.status),
    };
    Err(ApiError::Api {
        status: response.status,
        message,
    })
}
