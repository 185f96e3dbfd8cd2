//! FFI bindings for the BMI engine
//!
//! This module provides C-compatible functions for calling the engine from other languages.
//! All functions use C strings (null-terminated) and return allocated memory that
//! must be freed by the caller using `bmi_free_string`.
//!
//! Inputs that cannot be computed are not errors: the returned JSON is the
//! literal `null`. NULL is only returned for bad pointers, unknown unit tags
//! or malformed records.

use std::cell::RefCell;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::ptr;

use crate::calculator::BmiCalculator;
use crate::classify::compute_and_classify;
use crate::error::BmiError;
use crate::pipeline::measurement_to_report;
use crate::types::{BmiResult, HeightUnit, WeightUnit};
use crate::units::{convert_height_to_meters, convert_weight_to_kilograms};

// Thread-local storage for the last error message
thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

fn set_last_error(msg: &str) {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = CString::new(msg).ok();
    });
}

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

/// Serialize an optional result; absence becomes the JSON literal `null`
fn result_to_cstr(result: Option<&BmiResult>) -> *mut c_char {
    match serde_json::to_string(&result) {
        Ok(json) => string_to_cstr(&json),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

fn compute(
    height: &str,
    height_unit: &str,
    inches: Option<&str>,
    weight: &str,
    weight_unit: &str,
) -> Result<Option<BmiResult>, BmiError> {
    let height_unit: HeightUnit = height_unit.parse()?;
    let weight_unit: WeightUnit = weight_unit.parse()?;

    let height_m = convert_height_to_meters(height, height_unit, inches);
    let weight_kg = convert_weight_to_kilograms(weight, weight_unit);

    Ok(match (height_m, weight_kg) {
        (Some(h), Some(w)) => compute_and_classify(h, w),
        _ => None,
    })
}

// ============================================================================
// Stateless API
// ============================================================================

/// Compute and classify from raw text fields.
///
/// # Safety
/// - `height`, `height_unit`, `weight`, and `weight_unit` must be valid null-terminated C strings.
/// - `inches` may be NULL; it is only read when `height_unit` is `"ft"`.
/// - Returns a newly allocated JSON string (a result object or `null`) that must be
///   freed with `bmi_free_string`.
/// - Returns NULL on error; call `bmi_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn bmi_compute(
    height: *const c_char,
    height_unit: *const c_char,
    inches: *const c_char,
    weight: *const c_char,
    weight_unit: *const c_char,
) -> *mut c_char {
    clear_last_error();

    let Some(height_str) = cstr_to_string(height) else {
        set_last_error("Invalid height string pointer");
        return ptr::null_mut();
    };
    let Some(height_unit_str) = cstr_to_string(height_unit) else {
        set_last_error("Invalid height_unit string pointer");
        return ptr::null_mut();
    };
    let Some(weight_str) = cstr_to_string(weight) else {
        set_last_error("Invalid weight string pointer");
        return ptr::null_mut();
    };
    let Some(weight_unit_str) = cstr_to_string(weight_unit) else {
        set_last_error("Invalid weight_unit string pointer");
        return ptr::null_mut();
    };
    let inches_str = cstr_to_string(inches);

    match compute(
        &height_str,
        &height_unit_str,
        inches_str.as_deref(),
        &weight_str,
        &weight_unit_str,
    ) {
        Ok(result) => result_to_cstr(result.as_ref()),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

/// Convert a measurement record (JSON) into a report (JSON).
///
/// # Safety
/// - `json` must be a valid null-terminated C string.
/// - Returns a newly allocated string that must be freed with `bmi_free_string`.
/// - Returns NULL on error; call `bmi_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn bmi_measurement_to_report(json: *const c_char) -> *mut c_char {
    clear_last_error();

    let Some(json_str) = cstr_to_string(json) else {
        set_last_error("Invalid JSON string pointer");
        return ptr::null_mut();
    };

    match measurement_to_report(json_str) {
        Ok(report) => string_to_cstr(&report),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

// ============================================================================
// Stateful Calculator API
// ============================================================================

/// Opaque handle to a BmiCalculator
pub struct BmiCalculatorHandle {
    calculator: BmiCalculator,
}

/// Create a new calculator with the given starting units (`"cm"`/`"ft"`, `"kg"`/`"lbs"`).
///
/// # Safety
/// - Both arguments must be valid null-terminated C strings, or NULL for the metric default.
/// - Must be freed with `bmi_calculator_free`.
/// - Returns NULL on an unknown unit tag or a tag that is not valid UTF-8.
#[no_mangle]
pub unsafe extern "C" fn bmi_calculator_new(
    height_unit: *const c_char,
    weight_unit: *const c_char,
) -> *mut BmiCalculatorHandle {
    clear_last_error();

    // Only a NULL tag falls back to metric; unreadable bytes are an error
    let height_unit = if height_unit.is_null() {
        Ok(HeightUnit::default())
    } else {
        match cstr_to_string(height_unit) {
            Some(tag) => tag.parse::<HeightUnit>(),
            None => {
                set_last_error("Invalid height_unit string pointer");
                return ptr::null_mut();
            }
        }
    };
    let weight_unit = if weight_unit.is_null() {
        Ok(WeightUnit::default())
    } else {
        match cstr_to_string(weight_unit) {
            Some(tag) => tag.parse::<WeightUnit>(),
            None => {
                set_last_error("Invalid weight_unit string pointer");
                return ptr::null_mut();
            }
        }
    };

    match (height_unit, weight_unit) {
        (Ok(h), Ok(w)) => Box::into_raw(Box::new(BmiCalculatorHandle {
            calculator: BmiCalculator::with_units(h, w),
        })),
        (Err(e), _) | (_, Err(e)) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

/// Free a calculator.
///
/// # Safety
/// - `calculator` must be a valid pointer returned by `bmi_calculator_new`.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn bmi_calculator_free(calculator: *mut BmiCalculatorHandle) {
    if !calculator.is_null() {
        drop(Box::from_raw(calculator));
    }
}

/// Set one calculator field and return the current result.
///
/// `field` is one of `height`, `feet`, `inches`, `weight`, `height_unit`, `weight_unit`.
///
/// # Safety
/// - `calculator` must be a valid pointer returned by `bmi_calculator_new`.
/// - `field` and `value` must be valid null-terminated C strings.
/// - Returns a newly allocated JSON string (result or `null`) that must be freed
///   with `bmi_free_string`.
/// - Returns NULL on error; call `bmi_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn bmi_calculator_set(
    calculator: *mut BmiCalculatorHandle,
    field: *const c_char,
    value: *const c_char,
) -> *mut c_char {
    clear_last_error();

    if calculator.is_null() {
        set_last_error("Null calculator pointer");
        return ptr::null_mut();
    }

    let handle = &mut *calculator;

    let Some(field_str) = cstr_to_string(field) else {
        set_last_error("Invalid field string pointer");
        return ptr::null_mut();
    };
    let Some(value_str) = cstr_to_string(value) else {
        set_last_error("Invalid value string pointer");
        return ptr::null_mut();
    };

    let calc = &mut handle.calculator;
    let updated = match field_str.as_str() {
        "height" => Ok(calc.set_height(value_str)),
        "feet" => Ok(calc.set_feet(value_str)),
        "inches" => Ok(calc.set_inches(value_str)),
        "weight" => Ok(calc.set_weight(value_str)),
        "height_unit" => match value_str.parse::<HeightUnit>() {
            Ok(unit) => Ok(calc.set_height_unit(unit)),
            Err(e) => Err(e),
        },
        "weight_unit" => match value_str.parse::<WeightUnit>() {
            Ok(unit) => Ok(calc.set_weight_unit(unit)),
            Err(e) => Err(e),
        },
        other => Err(BmiError::InvalidRecord(format!("unknown field: {other}"))),
    };

    match updated {
        Ok(result) => result_to_cstr(result),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

/// Clear all fields and the stored result.
///
/// # Safety
/// - `calculator` must be a valid pointer returned by `bmi_calculator_new`.
/// - Returns 0 on success, non-zero on a NULL pointer.
#[no_mangle]
pub unsafe extern "C" fn bmi_calculator_reset(calculator: *mut BmiCalculatorHandle) -> i32 {
    clear_last_error();

    if calculator.is_null() {
        set_last_error("Null calculator pointer");
        return -1;
    }

    (*calculator).calculator.reset();
    0
}

// ============================================================================
// Memory Management
// ============================================================================

/// Free a string returned by engine functions.
///
/// # Safety
/// - `ptr` must be a valid pointer returned by an engine function, or NULL.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn bmi_free_string(ptr: *mut c_char) {
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
/// - The returned pointer is valid until the next engine call on this thread.
/// - Do NOT free the returned pointer.
/// - Returns NULL if no error occurred.
#[no_mangle]
pub unsafe extern "C" fn bmi_last_error() -> *const c_char {
    LAST_ERROR.with(|e| match &*e.borrow() {
        Some(cstr) => cstr.as_ptr(),
        None => ptr::null(),
    })
}

/// Get the library version.
///
/// # Safety
/// - Returns a pointer to a static string. Do NOT free.
#[no_mangle]
pub unsafe extern "C" fn bmi_version() -> *const c_char {
    static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();
    VERSION.as_ptr() as *const c_char
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CString;

    fn c(s: &str) -> CString {
        CString::new(s).unwrap()
    }

    unsafe fn take(ptr: *mut c_char) -> String {
        assert!(!ptr.is_null());
        let s = CStr::from_ptr(ptr).to_str().unwrap().to_string();
        bmi_free_string(ptr);
        s
    }

    #[test]
    fn test_ffi_compute_imperial() {
        let (h, hu, i, w, wu) = (c("5"), c("ft"), c("10"), c("250"), c("lbs"));

        unsafe {
            let json = take(bmi_compute(
                h.as_ptr(),
                hu.as_ptr(),
                i.as_ptr(),
                w.as_ptr(),
                wu.as_ptr(),
            ));
            let result: BmiResult = serde_json::from_str(&json).unwrap();
            assert_eq!(result.category.label(), "Obese");
        }
    }

    #[test]
    fn test_ffi_absent_is_null_json() {
        let (h, hu, w, wu) = (c(""), c("cm"), c("70"), c("kg"));

        unsafe {
            let json = take(bmi_compute(
                h.as_ptr(),
                hu.as_ptr(),
                ptr::null(),
                w.as_ptr(),
                wu.as_ptr(),
            ));
            assert_eq!(json, "null");
            assert!(bmi_last_error().is_null());
        }
    }

    #[test]
    fn test_ffi_unknown_unit_sets_error() {
        let (h, hu, w, wu) = (c("170"), c("m"), c("70"), c("kg"));

        unsafe {
            let result = bmi_compute(h.as_ptr(), hu.as_ptr(), ptr::null(), w.as_ptr(), wu.as_ptr());
            assert!(result.is_null());

            let error = bmi_last_error();
            assert!(!error.is_null());
            let error_str = CStr::from_ptr(error).to_str().unwrap();
            assert!(error_str.contains("Unknown height unit"));
        }
    }

    #[test]
    fn test_ffi_measurement_to_report() {
        let json = c(r#"{"height": "170", "weight": "70"}"#);

        unsafe {
            let report = take(bmi_measurement_to_report(json.as_ptr()));
            assert!(report.contains("\"Normal Weight\""));
            assert!(report.contains("report_version"));

            let bad = c("not json");
            assert!(bmi_measurement_to_report(bad.as_ptr()).is_null());
            assert!(!bmi_last_error().is_null());
        }
    }

    #[test]
    fn test_ffi_calculator_lifecycle() {
        let (height, weight, weight_unit) = (c("height"), c("weight"), c("weight_unit"));
        let (tall, heavy, empty, stone) = (c("170"), c("70"), c(""), c("stone"));

        unsafe {
            let calc = bmi_calculator_new(ptr::null(), ptr::null());
            assert!(!calc.is_null());

            assert_eq!(take(bmi_calculator_set(calc, height.as_ptr(), tall.as_ptr())), "null");

            let json = take(bmi_calculator_set(calc, weight.as_ptr(), heavy.as_ptr()));
            assert!(json.contains("Normal Weight"));

            // An unusable edit keeps the previous result
            let json = take(bmi_calculator_set(calc, weight.as_ptr(), empty.as_ptr()));
            assert!(json.contains("Normal Weight"));

            assert!(bmi_calculator_set(calc, weight_unit.as_ptr(), stone.as_ptr()).is_null());
            assert!(!bmi_last_error().is_null());

            assert_eq!(bmi_calculator_reset(calc), 0);
            assert_eq!(take(bmi_calculator_set(calc, weight.as_ptr(), heavy.as_ptr())), "null");

            bmi_calculator_free(calc);
        }
    }

    #[test]
    fn test_ffi_calculator_new_rejects_unreadable_unit() {
        let bad = [0xffu8, 0xfe, 0x00];

        unsafe {
            let calc = bmi_calculator_new(bad.as_ptr() as *const c_char, ptr::null());
            assert!(calc.is_null());
            let error = CStr::from_ptr(bmi_last_error()).to_str().unwrap();
            assert!(error.contains("height_unit"));

            let calc = bmi_calculator_new(ptr::null(), bad.as_ptr() as *const c_char);
            assert!(calc.is_null());
            let error = CStr::from_ptr(bmi_last_error()).to_str().unwrap();
            assert!(error.contains("weight_unit"));
        }
    }

    #[test]
    fn test_ffi_calculator_new_units() {
        let (ft, lbs, upper) = (c("ft"), c("lbs"), c("CM"));

        unsafe {
            let calc = bmi_calculator_new(ft.as_ptr(), lbs.as_ptr());
            assert!(!calc.is_null());
            assert_eq!((*calc).calculator.height_unit(), HeightUnit::FeetInches);
            assert_eq!((*calc).calculator.weight_unit(), WeightUnit::Pounds);
            bmi_calculator_free(calc);

            // Tags match the record format exactly
            assert!(bmi_calculator_new(upper.as_ptr(), ptr::null()).is_null());
            assert!(!bmi_last_error().is_null());
        }
    }

    #[test]
    fn test_ffi_version() {
        unsafe {
            let version = bmi_version();
            assert!(!version.is_null());

            let version_str = CStr::from_ptr(version).to_str().unwrap();
            assert!(!version_str.is_empty());
        }
    }
}
