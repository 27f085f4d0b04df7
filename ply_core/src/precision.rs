//! # Decimal Precision
//!
//! All elastic constants are fixed-point decimals. Moduli and constituent
//! Poisson ratios carry 3 decimal places, the effective major Poisson ratio
//! carries 4, and the fiber volume fraction grid is stored at 4.
//!
//! Quantization rounds half away from zero and then pins the scale, so
//! `2.8` becomes `2.800` and `46.51162…` becomes `46.512`.
//!
//! ```rust
//! use ply_core::precision::{quantize, MODULUS_SCALE};
//! use rust_decimal::Decimal;
//!
//! let e = quantize(Decimal::new(28, 1), MODULUS_SCALE);
//! assert_eq!(e.to_string(), "2.800");
//! ```

use rust_decimal::prelude::*;

use crate::errors::{PlyError, PlyResult};

/// Decimal places for moduli and constituent Poisson ratios
pub const MODULUS_SCALE: u32 = 3;

/// Decimal places for the effective major Poisson ratio
pub const EFFECTIVE_RATIO_SCALE: u32 = 4;

/// Decimal places of the stored fiber volume fraction grid
pub const FRACTION_SCALE: u32 = 4;

/// Decimal places a requested fraction is rounded to before grid lookup
pub const LOOKUP_SCALE: u32 = 2;

/// Round to `scale` places (half away from zero) and fix the scale.
pub fn quantize(value: Decimal, scale: u32) -> Decimal {
    let mut q = value.round_dp_with_strategy(scale, RoundingStrategy::MidpointAwayFromZero);
    q.rescale(scale);
    q
}

/// Checked division that reports a degenerate denominator against `field`.
pub(crate) fn checked_ratio(numerator: Decimal, denominator: Decimal, field: &str) -> PlyResult<Decimal> {
    numerator.checked_div(denominator).ok_or_else(|| {
        PlyError::invalid_argument(
            field,
            format!("{} / {}", numerator, denominator),
            "Closure denominator is zero or the quotient overflows",
        )
    })
}
