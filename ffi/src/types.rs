//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type but uses C-compatible representations:
//! `*mut c_char` instead of `String`, raw pointers instead of `Vec`, and
//! tagged enums with explicit discriminants. The deeply nested forecast
//! payload crosses the boundary as a canonical JSON string rather than a
//! mirrored C struct tree; only the result envelope itself is structured.
//! Conversion functions live here to keep `lib.rs` focused on the
//! `extern "C"` surface.

use std::ffi::CString;
use std::os::raw::c_char;

use cycle_core::error::ApiError;
use cycle_core::http::HttpMethod;
use cycle_core::types::CycleResponse;

/// Opaque handle to a `CycleClient`. C callers receive a pointer to this
/// and pass it back into every FFI function.
pub struct FfiCycleClient {
    pub(crate) inner: cycle_core::CycleClient,
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// HTTP method as a C enum.
#[repr(C)]
pub enum FfiHttpMethod {
    Get = 0,
}

impl From<HttpMethod> for FfiHttpMethod {
    fn from(m: HttpMethod) -> Self {
        match m {
            HttpMethod::Get => FfiHttpMethod::Get,
        }
    }
}

/// A single query parameter as a key-value pair of C strings.
#[repr(C)]
pub struct FfiQueryParam {
    pub key: *mut c_char,
    pub value: *mut c_char,
}

/// A single HTTP header as a key-value pair of C strings.
#[repr(C)]
pub struct FfiHeader {
    pub key: *mut c_char,
    pub value: *mut c_char,
}

/// An HTTP request described as C-compatible plain data.
///
/// Built by `cycle_build_*` functions. The C caller executes the request
/// (appending the query parameters to the URL) and passes the response back
/// through `cycle_parse_*`.
#[repr(C)]
pub struct FfiHttpRequest {
    pub method: FfiHttpMethod,
    pub path: *mut c_char,
    pub query: *mut FfiQueryParam,
    pub query_len: u32,
    pub headers: *mut FfiHeader,
    pub headers_len: u32,
}

impl FfiHttpRequest {
    /// Convert a core `HttpRequest` into a heap-allocated `FfiHttpRequest`.
    pub(crate) fn from_core(req: cycle_core::HttpRequest) -> *mut Self {
        let path = CString::new(req.path).unwrap().into_raw();

        let query_len = req.query.len() as u32;
        let query = if req.query.is_empty() {
            std::ptr::null_mut()
        } else {
            let mut ffi_query: Vec<FfiQueryParam> = req
                .query
                .into_iter()
                .map(|(k, v)| FfiQueryParam {
                    key: CString::new(k).unwrap().into_raw(),
                    value: CString::new(v).unwrap().into_raw(),
                })
                .collect();
            let ptr = ffi_query.as_mut_ptr();
            std::mem::forget(ffi_query);
            ptr
        };

        let headers_len = req.headers.len() as u32;
        let headers = if req.headers.is_empty() {
            std::ptr::null_mut()
        } else {
            let mut ffi_headers: Vec<FfiHeader> = req
                .headers
                .into_iter()
                .map(|(k, v)| FfiHeader {
                    key: CString::new(k).unwrap().into_raw(),
                    value: CString::new(v).unwrap().into_raw(),
                })
                .collect();
            let ptr = ffi_headers.as_mut_ptr();
            std::mem::forget(ffi_headers);
            ptr
        };

        let ffi_req = Box::new(FfiHttpRequest {
            method: req.method.into(),
            path,
            query,
            query_len,
            headers,
            headers_len,
        });
        Box::into_raw(ffi_req)
    }
}

// ---------------------------------------------------------------------------
// Response input (caller-provided, not heap-allocated by us)
// ---------------------------------------------------------------------------

/// An HTTP response described as C-compatible plain data.
///
/// The C caller constructs this on the stack after executing an HTTP request,
/// then passes a pointer to a `cycle_parse_*` function. The FFI layer reads
/// but does not free these fields.
#[repr(C)]
pub struct FfiHttpResponse {
    pub status: u16,
    pub body: *const c_char,
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Error codes returned in `FfiCycleResult`.
#[repr(C)]
pub enum FfiErrorCode {
    Ok = 0,
    MissingApiKey = 1,
    Validation = 2,
    Api = 3,
    Deserialization = 4,
    Panic = 5,
    NullArg = 6,
}

/// Result envelope for validate and parse operations.
///
/// On success `error_code` is `Ok`, `error_message` is null, and `data_json`
/// holds the canonical JSON of the parsed response envelope (null for
/// operations with no payload, e.g. validation).
/// On failure `error_code` describes the category, `error_message` is a
/// human-readable C string, and `data_json` is null. For `Api` errors
/// `http_status` carries the server's status code.
#[repr(C)]
pub struct FfiCycleResult {
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    pub http_status: u16,
    pub data_json: *mut c_char,
}

impl FfiCycleResult {
    /// Build a success result carrying the response as canonical JSON.
    pub(crate) fn ok_response(response: &CycleResponse) -> *mut Self {
        let json = serde_json::to_string(response).unwrap();
        let result = Box::new(FfiCycleResult {
            error_code: FfiErrorCode::Ok,
            error_message: std::ptr::null_mut(),
            http_status: 0,
            data_json: CString::new(json).unwrap().into_raw(),
        });
        Box::into_raw(result)
    }

    /// Build a success result with no data payload (e.g. validation).
    pub(crate) fn ok_empty() -> *mut Self {
        let result = Box::new(FfiCycleResult {
            error_code: FfiErrorCode::Ok,
            error_message: std::ptr::null_mut(),
            http_status: 0,
            data_json: std::ptr::null_mut(),
        });
        Box::into_raw(result)
    }

    /// Build an error result from an `ApiError`.
    pub(crate) fn from_error(err: ApiError) -> *mut Self {
        let (error_code, http_status, msg) = match &err {
            ApiError::MissingApiKey => (FfiErrorCode::MissingApiKey, 0u16, err.to_string()),
            ApiError::Validation(_) => (FfiErrorCode::Validation, 0, err.to_string()),
            ApiError::Api { status, .. } => (FfiErrorCode::Api, *status, err.to_string()),
            ApiError::Deserialization(_) => (FfiErrorCode::Deserialization, 0, err.to_string()),
        };

        let result = Box::new(FfiCycleResult {
            error_code,
            error_message: CString::new(msg).unwrap().into_raw(),
            http_status,
            data_json: std::ptr::null_mut(),
        });
        Box::into_raw(result)
    }

    /// Build an error result for a null argument.
    pub(crate) fn null_arg(name: &str) -> *mut Self {
        let msg = format!("null argument: {name}");
        let result = Box::new(FfiCycleResult {
            error_code: FfiErrorCode::NullArg,
            error_message: CString::new(msg).unwrap().into_raw(),
            http_status: 0,
            data_json: std::ptr::null_mut(),
        });
        Box::into_raw(result)
    }

    /// Build an error result for a caught panic.
    pub(crate) fn panic(msg: &str) -> *mut Self {
        let result = Box::new(FfiCycleResult {
            error_code: FfiErrorCode::Panic,
            error_message: CString::new(msg).unwrap_or_default().into_raw(),
            http_status: 0,
            data_json: std::ptr::null_mut(),
        });
        Box::into_raw(result)
    }
}
