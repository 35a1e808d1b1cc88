//! FFI bindings for Peach Flux
//!
//! This module provides C-compatible functions for calling Peach Flux from other
//! languages. All functions use C strings (null-terminated) and return allocated
//! memory that must be freed by the caller using `peach_free_string`.

use std::cell::RefCell;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::ptr;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Result;
use crate::import::ImportOptions;
use crate::pipeline::FluxProcessor;
use crate::types::{Athlete, PeriodicQuery, PeriodicRecord, StrokeRecord};

// Thread-local storage for the last error message
thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

/// Set the last error message
fn set_last_error(msg: &str) {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = CString::new(msg).ok();
    });
}

/// Clear the last error message
fn clear_last_error() {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = None;
    });
}

/// Helper to convert C string to Rust string
unsafe fn cstr_to_string(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    CStr::from_ptr(ptr).to_str().ok().map(|s| s.to_string())
}

/// Helper to convert Rust string to C string (caller must free)
fn string_to_cstr(s: &str) -> *mut c_char {
    match CString::new(s) {
        Ok(cstr) => cstr.into_raw(),
        Err(_) => ptr::null_mut(),
    }
}

fn from_json<T: DeserializeOwned>(json: &str) -> Result<T> {
    Ok(serde_json::from_str(json)?)
}

fn to_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?)
}

/// Hand a result across the boundary: JSON string on success, NULL plus
/// last error on failure
fn respond(result: Result<String>) -> *mut c_char {
    match result {
        Ok(json) => string_to_cstr(&json),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

/// Read a required string argument, recording an error when it is invalid
macro_rules! required_str {
    ($ptr:expr, $what:literal) => {
        match cstr_to_string($ptr) {
            Some(s) => s,
            None => {
                set_last_error(concat!("Invalid ", $what, " string pointer"));
                return ptr::null_mut();
            }
        }
    };
}

// ============================================================================
// Stateless API
// ============================================================================

/// Parse a PowerLine export and return its sections as JSON.
///
/// # Safety
/// - `text` must be a valid null-terminated C string.
/// - Returns a newly allocated string that must be freed with `peach_free_string`.
/// - Returns NULL on error; call `peach_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn peach_parse_to_json(text: *const c_char) -> *mut c_char {
    clear_last_error();
    let text = required_str!(text, "export text");

    respond(to_json(&FluxProcessor::new().parse(&text)))
}

/// Parse a PowerLine export and return its session import bundle as JSON.
///
/// # Safety
/// - `text` must be a valid null-terminated C string.
/// - `session_name` may be NULL; otherwise it must be a valid C string.
/// - Returns a newly allocated string that must be freed with `peach_free_string`.
/// - Returns NULL on error; call `peach_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn peach_import_to_json(
    text: *const c_char,
    session_name: *const c_char,
) -> *mut c_char {
    clear_last_error();
    let text = required_str!(text, "export text");

    let options = ImportOptions {
        session_name: cstr_to_string(session_name),
        ..ImportOptions::default()
    };
    respond(to_json(&FluxProcessor::new().import(&text, &options)))
}

/// Compute piece averages from athlete and stroke record JSON arrays.
///
/// # Safety
/// - `athletes_json` and `strokes_json` must be valid null-terminated C strings.
/// - Returns a newly allocated string that must be freed with `peach_free_string`.
/// - Returns NULL on error; call `peach_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn peach_averages_json(
    athletes_json: *const c_char,
    strokes_json: *const c_char,
) -> *mut c_char {
    clear_last_error();
    let athletes_json = required_str!(athletes_json, "athletes JSON");
    let strokes_json = required_str!(strokes_json, "strokes JSON");

    respond((|| -> Result<String> {
        let athletes: Vec<Athlete> = from_json(&athletes_json)?;
        let strokes: Vec<StrokeRecord> = from_json(&strokes_json)?;
        to_json(&FluxProcessor::new().averages(&athletes, &strokes)?)
    })())
}

/// Extract the force curve of one stroke.
///
/// # Safety
/// - `strokes_json` and `periodic_json` must be valid null-terminated C strings.
/// - Returns a newly allocated string that must be freed with `peach_free_string`.
/// - Returns NULL on error; call `peach_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn peach_force_curve_json(
    strokes_json: *const c_char,
    periodic_json: *const c_char,
    stroke_number: i64,
) -> *mut c_char {
    clear_last_error();
    let strokes_json = required_str!(strokes_json, "strokes JSON");
    let periodic_json = required_str!(periodic_json, "periodic JSON");

    respond((|| -> Result<String> {
        let strokes: Vec<StrokeRecord> = from_json(&strokes_json)?;
        let periodic: Vec<PeriodicRecord> = from_json(&periodic_json)?;
        to_json(&FluxProcessor::new().force_curve(&strokes, &periodic, stroke_number)?)
    })())
}

/// Filter and downsample a periodic series.
///
/// # Safety
/// - `periodic_json` must be a valid null-terminated C string.
/// - `query_json` may be NULL (whole series); otherwise it must be a valid C string.
/// - Returns a newly allocated string that must be freed with `peach_free_string`.
/// - Returns NULL on error; call `peach_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn peach_periodic_window_json(
    periodic_json: *const c_char,
    query_json: *const c_char,
) -> *mut c_char {
    clear_last_error();
    let periodic_json = required_str!(periodic_json, "periodic JSON");
    let query_json = cstr_to_string(query_json);

    respond((|| -> Result<String> {
        let periodic: Vec<PeriodicRecord> = from_json(&periodic_json)?;
        let query: PeriodicQuery = match query_json {
            Some(json) => from_json(&json)?,
            None => PeriodicQuery::default(),
        };
        to_json(&FluxProcessor::new().periodic_window(&periodic, &query)?)
    })())
}

// ============================================================================
// Stateful Processor API
// ============================================================================

/// Opaque handle to a FluxProcessor
pub struct FluxProcessorHandle {
    processor: FluxProcessor,
}

/// Create a processor from a JSON configuration, or defaults when NULL.
///
/// # Safety
/// - `config_json` may be NULL; otherwise it must be a valid C string.
/// - Returns a pointer that must be freed with `peach_processor_free`.
/// - Returns NULL on error; call `peach_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn peach_processor_new(
    config_json: *const c_char,
) -> *mut FluxProcessorHandle {
    clear_last_error();

    let processor = match cstr_to_string(config_json) {
        None => FluxProcessor::new(),
        Some(json) => match FluxProcessor::from_config_json(&json) {
            Ok(p) => p,
            Err(e) => {
                set_last_error(&e.to_string());
                return ptr::null_mut();
            }
        },
    };

    Box::into_raw(Box::new(FluxProcessorHandle { processor }))
}

/// Free a FluxProcessor.
///
/// # Safety
/// - `processor` must be a valid pointer returned by `peach_processor_new`.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn peach_processor_free(processor: *mut FluxProcessorHandle) {
    if !processor.is_null() {
        drop(Box::from_raw(processor));
    }
}

/// Import an export with a configured processor.
///
/// # Safety
/// - `processor` must be a valid pointer returned by `peach_processor_new`.
/// - `text` must be a valid null-terminated C string; `session_name` may be NULL.
/// - Returns a newly allocated string that must be freed with `peach_free_string`.
/// - Returns NULL on error; call `peach_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn peach_processor_import(
    processor: *const FluxProcessorHandle,
    text: *const c_char,
    session_name: *const c_char,
) -> *mut c_char {
    clear_last_error();

    if processor.is_null() {
        set_last_error("Null processor pointer");
        return ptr::null_mut();
    }
    let handle = &*processor;
    let text = required_str!(text, "export text");

    let options = ImportOptions {
        session_name: cstr_to_string(session_name),
        ..ImportOptions::default()
    };
    respond(to_json(&handle.processor.import(&text, &options)))
}

/// Force curve of one stroke using the processor's configured window.
///
/// # Safety
/// - `processor` must be a valid pointer returned by `peach_processor_new`.
/// - `strokes_json` and `periodic_json` must be valid null-terminated C strings.
/// - Returns a newly allocated string that must be freed with `peach_free_string`.
/// - Returns NULL on error; call `peach_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn peach_processor_force_curve(
    processor: *const FluxProcessorHandle,
    strokes_json: *const c_char,
    periodic_json: *const c_char,
    stroke_number: i64,
) -> *mut c_char {
    clear_last_error();

    if processor.is_null() {
        set_last_error("Null processor pointer");
        return ptr::null_mut();
    }
    let handle = &*processor;
    let strokes_json = required_str!(strokes_json, "strokes JSON");
    let periodic_json = required_str!(periodic_json, "periodic JSON");

    respond((|| -> Result<String> {
        let strokes: Vec<StrokeRecord> = from_json(&strokes_json)?;
        let periodic: Vec<PeriodicRecord> = from_json(&periodic_json)?;
        to_json(&handle.processor.force_curve(&strokes, &periodic, stroke_number)?)
    })())
}

// ============================================================================
// Memory Management
// ============================================================================

/// Free a string returned by Peach Flux functions.
///
/// # Safety
/// - `ptr` must be a valid pointer returned by a Peach Flux function, or NULL.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn peach_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(CString::from_raw(ptr));
    }
}

// ============================================================================
// Error Handling
// ============================================================================

/// Get the last error message.
///
/// # Safety
/// - Returns a pointer to a thread-local error string.
/// - The returned pointer is valid until the next Peach Flux call on this thread.
/// - Do NOT free the returned pointer.
/// - Returns NULL if no error occurred.
#[no_mangle]
pub unsafe extern "C" fn peach_last_error() -> *const c_char {
    LAST_ERROR.with(|e| match &*e.borrow() {
        Some(cstr) => cstr.as_ptr(),
        None => ptr::null(),
    })
}

// ============================================================================
// Version Information
// ============================================================================

/// Get the Peach Flux library version.
///
/// # Safety
/// - Returns a pointer to a static string. Do NOT free.
#[no_mangle]
pub unsafe extern "C" fn peach_version() -> *const c_char {
    static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();
    VERSION.as_ptr() as *const c_char
}
