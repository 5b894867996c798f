//! FFI interface for C/C++ hosts
//!
//! Results cross the boundary as JSON strings owned by Rust; every result
//! must be released with `free_extraction_result`.

use std::ffi::{c_char, CStr, CString};
use std::ptr;

use serde::Serialize;
use serde_json::json;

use crate::config::ScraperConfig;
use crate::engine::ExtractionEngine;
use crate::extractors::parse_price;

/// Result struct returned to the host.
/// Both pointers are owned by Rust and must be freed via free_extraction_result
#[repr(C)]
pub struct ExtractionResultFFI {
    /// JSON-serialized result (null-terminated), or null on failure
    pub json_ptr: *mut c_char,
    /// Error message (null-terminated), or null on success
    pub error_ptr: *mut c_char,
}

/// Install the default tracing subscriber. Returns false if one was
/// already installed.
#[no_mangle]
pub extern "C" fn wishlist_init_logging() -> bool {
    crate::logging::init()
}

/// Scrape name, price and image for a product URL.
///
/// # Arguments
/// * `url` - Product page URL (null-terminated UTF-8)
/// * `config_json` - JSON `ScraperConfig`, or null for defaults
///
/// # Returns
/// On success `json_ptr` holds `{"site", "name", "price", "image_url"}`;
/// otherwise `error_ptr` holds the error message.
///
/// # Safety
/// - `url` must be a valid null-terminated C string
/// - `config_json` must be null or a valid null-terminated C string
/// - Caller must free the result via `free_extraction_result`
#[no_mangle]
pub unsafe extern "C" fn extract_product_ffi(
    url: *const c_char,
    config_json: *const c_char,
) -> ExtractionResultFFI {
    let url = match read_c_str(url, "URL") {
        Ok(s) => s,
        Err(result) => return result,
    };

    let config = if config_json.is_null() {
        ScraperConfig::default()
    } else {
        let raw = match read_c_str(config_json, "config JSON") {
            Ok(s) => s,
            Err(result) => return result,
        };
        match ScraperConfig::from_json(raw) {
            Ok(config) => config,
            Err(e) => return make_error_result(&format!("Invalid config: {e}")),
        }
    };

    match ExtractionEngine::new(&config).extract_product(url) {
        Ok(outcome) => make_json_result(&outcome),
        Err(e) => make_error_result(&e.to_string()),
    }
}

/// Parse a displayed price (`"R$ 1.234,56"`, `"$1,234.56"`) into
/// `{"price": "<decimal>"}`.
///
/// # Safety
/// - `raw` must be a valid null-terminated C string
/// - Caller must free the result via `free_extraction_result`
#[no_mangle]
pub unsafe extern "C" fn parse_price_ffi(raw: *const c_char) -> ExtractionResultFFI {
    let raw = match read_c_str(raw, "price") {
        Ok(s) => s,
        Err(result) => return result,
    };

    match parse_price(raw) {
        Ok(price) => make_json_result(&json!({ "price": price })),
        Err(e) => make_error_result(&e.to_string()),
    }
}

/// Free an ExtractionResultFFI returned by any function in this module
///
/// # Safety
/// - `result` must have been returned by a function in this module
/// - Must only be called once per result
#[no_mangle]
pub unsafe extern "C" fn free_extraction_result(result: ExtractionResultFFI) {
    if !result.json_ptr.is_null() {
        drop(CString::from_raw(result.json_ptr));
    }
    if !result.error_ptr.is_null() {
        drop(CString::from_raw(result.error_ptr));
    }
}

unsafe fn read_c_str<'a>(
    ptr: *const c_char,
    what: &str,
) -> Result<&'a str, ExtractionResultFFI> {
    if ptr.is_null() {
        return Err(make_error_result(&format!("{what} is null")));
    }
    CStr::from_ptr(ptr)
        .to_str()
        .map_err(|_| make_error_result(&format!("Invalid UTF-8 in {what}")))
}

fn make_json_result<T: Serialize>(value: &T) -> ExtractionResultFFI {
    match serde_json::to_string(value) {
        Ok(json) => match CString::new(json) {
            Ok(cstr) => ExtractionResultFFI {
                json_ptr: cstr.into_raw(),
                error_ptr: ptr::null_mut(),
            },
            Err(_) => make_error_result("Result contains null bytes"),
        },
        Err(e) => make_error_result(&format!("Serialize error: {e}")),
    }
}

fn make_error_result(msg: &str) -> ExtractionResultFFI {
    let error_cstr = CString::new(msg.replace('\0', " ")).unwrap_or_default();
    ExtractionResultFFI {
        json_ptr: ptr::null_mut(),
        error_ptr: error_cstr.into_raw(),
    }
}
