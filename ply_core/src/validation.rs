//! # Elastic Constant Validation
//!
//! Pure predicates over the textual form of material inputs, shared by both
//! constituent types and by the batch table readers.
//!
//! - names: letters, digits, `_` and `-` only
//! - positive constants: unsigned plain decimal, strictly greater than zero
//! - ratios: a positive constant no greater than 0.5
//!
//! The `parse_*`/`check_*` companions turn a rejection into
//! [`PlyError::InvalidArgument`] carrying the offending field.

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::errors::{PlyError, PlyResult};
use crate::precision::quantize;

static NAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("name pattern is a valid regex"));

static CONSTANT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]*\.?[0-9]*$").expect("constant pattern is a valid regex"));

/// True iff the trimmed name is non-empty and contains only `[A-Za-z0-9_-]`.
pub fn is_valid_name(s: &str) -> bool {
    let trimmed = s.trim();
    !trimmed.is_empty() && NAME_PATTERN.is_match(trimmed)
}

/// True iff `s` is an unsigned plain decimal whose value is strictly positive.
pub fn is_valid_positive_constant(s: &str) -> bool {
    constant_value(s).is_some_and(|v| v > Decimal::ZERO)
}

/// True iff `s` is a positive constant no greater than 0.5.
pub fn is_valid_ratio(s: &str) -> bool {
    constant_value(s).is_some_and(|v| v > Decimal::ZERO && v <= max_poissons_ratio())
}

/// Upper bound of a physically admissible Poisson ratio
fn max_poissons_ratio() -> Decimal {
    Decimal::new(5, 1)
}

fn constant_value(s: &str) -> Option<Decimal> {
    if s.is_empty() || !CONSTANT_PATTERN.is_match(s) {
        return None;
    }
    // The pattern admits "5." and ".5"; "." alone is not a number
    let digits = s.trim_end_matches('.');
    if digits.is_empty() {
        return None;
    }
    if let Some(fraction) = digits.strip_prefix('.') {
        return Decimal::from_str(&format!("0.{}", fraction)).ok();
    }
    Decimal::from_str(digits).ok()
}

/// Validate a material name, returning it trimmed.
pub fn check_name(s: &str) -> PlyResult<String> {
    if is_valid_name(s) {
        Ok(s.trim().to_string())
    } else {
        Err(PlyError::invalid_argument(
            "name",
            s,
            "Name must be non-empty and contain only letters, digits, '_' or '-'",
        ))
    }
}

/// Parse a strictly positive elastic constant.
pub fn parse_positive_constant(field: &str, s: &str) -> PlyResult<Decimal> {
    let s = s.trim();
    if !is_valid_positive_constant(s) {
        return Err(PlyError::invalid_argument(
            field,
            s,
            "Must be a positive decimal constant",
        ));
    }
    constant_value(s).ok_or_else(|| PlyError::invalid_argument(field, s, "Not a decimal number"))
}

/// Parse a Poisson ratio in (0, 0.5].
pub fn parse_ratio(field: &str, s: &str) -> PlyResult<Decimal> {
    let s = s.trim();
    if !is_valid_ratio(s) {
        return Err(PlyError::invalid_argument(
            field,
            s,
            "Must be a decimal ratio with 0 < v <= 0.5",
        ));
    }
    constant_value(s).ok_or_else(|| PlyError::invalid_argument(field, s, "Not a decimal number"))
}

/// Validate an already-numeric positive constant through the textual predicate.
pub fn check_positive_constant(field: &str, value: Decimal) -> PlyResult<Decimal> {
    parse_positive_constant(field, &value.to_string())
}

/// Validate an already-numeric Poisson ratio through the textual predicate.
pub fn check_ratio(field: &str, value: Decimal) -> PlyResult<Decimal> {
    parse_ratio(field, &value.to_string())
}

/// Validate a positive constant and quantize it to `scale` places.
///
/// A value that passes as positive but rounds to zero is rejected too.
pub fn quantized_constant(field: &str, value: Decimal, scale: u32) -> PlyResult<Decimal> {
    let q = quantize(check_positive_constant(field, value)?, scale);
    if q.is_zero() {
        return Err(rounds_to_zero(field, value, scale));
    }
    Ok(q)
}

/// Validate a Poisson ratio and quantize it to `scale` places.
pub fn quantized_ratio(field: &str, value: Decimal, scale: u32) -> PlyResult<Decimal> {
    let q = quantize(check_ratio(field, value)?, scale);
    if q.is_zero() {
        return Err(rounds_to_zero(field, value, scale));
    }
    Ok(q)
}

fn rounds_to_zero(field: &str, value: Decimal, scale: u32) -> PlyError {
    PlyError::invalid_argument(
        field,
        value.to_string(),
        format!("Rounds to zero at {} decimal places", scale),
    )
}
