//! C-ABI wrapper around `cycle-core`.
//!
//! # Overview
//! Exposes the cycle calculation client through `extern "C"` functions so
//! any language with a C FFI can validate parameters and build and parse
//! HTTP requests/responses without linking to serde directly.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - `cycle_validate` runs the local rule check standalone, so C callers can
//!   surface all violations without building a request.
//! - A single `FfiCycleResult` envelope conveys success payloads (as
//!   canonical JSON) and errors uniformly.
//! - The C caller owns all returned pointers and must call the matching
//!   `cycle_free_*` function to release them.
//!
//! Integer parameters use 0 for "unset"; the server then applies its own
//! defaults.

pub mod types;

use std::collections::BTreeMap;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::panic::catch_unwind;

use cycle_core::http::HttpResponse;
use cycle_core::types::CycleRequest;

use types::*;

fn cstr_to_string(ptr: *const c_char) -> String {
    if ptr.is_null() {
        String::new()
    } else {
        unsafe { CStr::from_ptr(ptr) }
            .to_str()
            .unwrap_or("")
            .to_string()
    }
}

fn request_from_args(
    last_period: *const c_char,
    cycle_length: i64,
    period_length: i64,
    cycles: i64,
) -> CycleRequest {
    CycleRequest {
        last_period: cstr_to_string(last_period),
        cycle_length,
        period_length,
        cycles,
    }
}

// ---------------------------------------------------------------------------
// Client lifecycle
// ---------------------------------------------------------------------------

/// Create a new `CycleClient` with the given API key.
///
/// `base_url` may be null, in which case the production endpoint is used.
/// Returns null if `api_key` is null or if an internal panic occurs.
/// The caller must free the returned pointer with `cycle_client_free`.
#[unsafe(no_mangle)]
pub extern "C" fn cycle_client_new(
    api_key: *const c_char,
    base_url: *const c_char,
) -> *mut FfiCycleClient {
    catch_unwind(|| {
        if api_key.is_null() {
            return std::ptr::null_mut();
        }
        let key = unsafe { CStr::from_ptr(api_key) }.to_str().unwrap_or("");
        let client = if base_url.is_null() {
            cycle_core::CycleClient::new(key)
        } else {
            let url = unsafe { CStr::from_ptr(base_url) }.to_str().unwrap_or("");
            cycle_core::CycleClient::with_base_url(key, url)
        };
        Box::into_raw(Box::new(FfiCycleClient { inner: client }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a `CycleClient` created by `cycle_client_new`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn cycle_client_free(client: *mut FfiCycleClient) {
    if !client.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { Box::from_raw(client) });
        });
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate calculate parameters against the local rule table.
///
/// `last_period` may be null (treated as unset, which the required-field
/// rule reports). On success the result carries `error_code = Ok` and no
/// payload; on failure `error_code = Validation` and `error_message` lists
/// every violation.
/// The caller must free the returned pointer with `cycle_free_result`.
#[unsafe(no_mangle)]
pub extern "C" fn cycle_validate(
    last_period: *const c_char,
    cycle_length: i64,
    period_length: i64,
    cycles: i64,
) -> *mut FfiCycleResult {
    catch_unwind(|| {
        let input = request_from_args(last_period, cycle_length, period_length, cycles);
        match input.validate() {
            Ok(()) => FfiCycleResult::ok_empty(),
            Err(e) => FfiCycleResult::from_error(e.into()),
        }
    })
    .unwrap_or_else(|_| FfiCycleResult::panic("panic in cycle_validate"))
}

// ---------------------------------------------------------------------------
// Build request functions
// ---------------------------------------------------------------------------

/// Build an HTTP request for the calculate operation.
///
/// Validates parameters first; returns null if `client` is null, the client
/// has no API key, or validation fails. Call `cycle_validate` to obtain the
/// violation messages.
/// The caller must free the returned pointer with `cycle_free_request`.
#[unsafe(no_mangle)]
pub extern "C" fn cycle_build_calculate(
    client: *const FfiCycleClient,
    last_period: *const c_char,
    cycle_length: i64,
    period_length: i64,
    cycles: i64,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        let input = request_from_args(last_period, cycle_length, period_length, cycles);
        match client.inner.build_calculate(&input) {
            Ok(req) => FfiHttpRequest::from_core(req),
            Err(_) => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Build a calculate request from raw query parameters, skipping local
/// validation. `params` may be null when `params_len` is 0.
///
/// Returns null if `client` is null or any key/value pointer in `params`
/// is null.
#[unsafe(no_mangle)]
pub extern "C" fn cycle_build_calculate_raw(
    client: *const FfiCycleClient,
    params: *const FfiQueryParam,
    params_len: u32,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() || (params.is_null() && params_len > 0) {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        let mut query = BTreeMap::new();
        if !params.is_null() {
            let slice = unsafe { std::slice::from_raw_parts(params, params_len as usize) };
            for param in slice {
                if param.key.is_null() || param.value.is_null() {
                    return std::ptr::null_mut();
                }
                query.insert(cstr_to_string(param.key), cstr_to_string(param.value));
            }
        }
        match client.inner.build_calculate_raw(&query) {
            Ok(req) => FfiHttpRequest::from_core(req),
            Err(_) => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Parse response functions
// ---------------------------------------------------------------------------

fn ffi_response_to_core(resp: &FfiHttpResponse) -> HttpResponse {
    let body = if resp.body.is_null() {
        String::new()
    } else {
        unsafe { CStr::from_ptr(resp.body) }
            .to_str()
            .unwrap_or("")
            .to_string()
    };
    HttpResponse {
        status: resp.status,
        headers: Vec::new(),
        body,
    }
}

/// Parse an HTTP response from a calculate request.
///
/// On success the result's `data_json` holds the full response envelope as
/// canonical JSON.
/// The caller must free the returned pointer with `cycle_free_result`.
#[unsafe(no_mangle)]
pub extern "C" fn cycle_parse_calculate(
    client: *const FfiCycleClient,
    response: *const FfiHttpResponse,
) -> *mut FfiCycleResult {
    catch_unwind(|| {
        if client.is_null() {
            return FfiCycleResult::null_arg("client");
        }
        if response.is_null() {
            return FfiCycleResult::null_arg("response");
        }
        let client = unsafe { &*client };
        let resp = unsafe { &*response };
        let core_resp = ffi_response_to_core(resp);
        match client.inner.parse_calculate(core_resp) {
            Ok(parsed) => FfiCycleResult::ok_response(&parsed),
            Err(e) => FfiCycleResult::from_error(e),
        }
    })
    .unwrap_or_else(|_| FfiCycleResult::panic("panic in cycle_parse_calculate"))
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free an `FfiHttpRequest` returned by any `cycle_build_*` function.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn cycle_free_request(req: *mut FfiHttpRequest) {
    if req.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let req = unsafe { Box::from_raw(req) };
        if !req.path.is_null() {
            drop(unsafe { CString::from_raw(req.path) });
        }
        if !req.query.is_null() && req.query_len > 0 {
            let query = unsafe {
                Vec::from_raw_parts(req.query, req.query_len as usize, req.query_len as usize)
            };
            for param in query {
                if !param.key.is_null() {
                    drop(unsafe { CString::from_raw(param.key) });
                }
                if !param.value.is_null() {
                    drop(unsafe { CString::from_raw(param.value) });
                }
            }
        }
        if !req.headers.is_null() && req.headers_len > 0 {
            let headers = unsafe {
                Vec::from_raw_parts(req.headers, req.headers_len as usize, req.headers_len as usize)
            };
            for h in headers {
                if !h.key.is_null() {
                    drop(unsafe { CString::from_raw(h.key) });
                }
                if !h.value.is_null() {
                    drop(unsafe { CString::from_raw(h.value) });
                }
            }
        }
    });
}

/// Free an `FfiCycleResult` returned by `cycle_validate` or any
/// `cycle_parse_*` function. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn cycle_free_result(result: *mut FfiCycleResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let result = unsafe { Box::from_raw(result) };
        if !result.error_message.is_null() {
            drop(unsafe { CString::from_raw(result.error_message) });
        }
        if !result.data_json.is_null() {
            drop(unsafe { CString::from_raw(result.data_json) });
        }
    });
}

/// Free a C string allocated by this library. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn cycle_free_string(s: *mut c_char) {
    if !s.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { CString::from_raw(s) });
        });
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
