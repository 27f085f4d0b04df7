//! Fiber volume fraction grid
//!
//! Every estimator samples the same 101 fractions `0.00, 0.01, ..., 1.00`.
//! The grid is built once per process and handed out by shared reference.
//! Values are exact multiples of 0.01 stored at 4 decimal places.
//!
//! [`VolumeFractionIndex`] turns a requested fraction into a grid index.
//! Requests are rounded to 2 decimals in decimal arithmetic before lookup, so
//! float noise such as `0.1 + 0.2` still lands on index 30.

use std::ops::RangeInclusive;

use once_cell::sync::Lazy;
use rust_decimal::prelude::*;

use crate::errors::{PlyError, PlyResult};
use crate::precision::{FRACTION_SCALE, LOOKUP_SCALE};

/// Number of fiber volume fraction samples
pub const SAMPLE_COUNT: usize = 101;

static FIBER_VOLUME_FRACTIONS: Lazy<[Decimal; SAMPLE_COUNT]> = Lazy::new(|| {
    std::array::from_fn(|i| {
        let mut vf = Decimal::new(i as i64, LOOKUP_SCALE);
        vf.rescale(FRACTION_SCALE);
        vf
    })
});

/// The shared 101-point grid, ascending from 0 to 1.
pub fn fiber_volume_fractions() -> &'static [Decimal; SAMPLE_COUNT] {
    &FIBER_VOLUME_FRACTIONS
}

/// Maps fiber volume fractions onto grid indices.
#[derive(Debug, Clone, Copy, Default)]
pub struct VolumeFractionIndex;

impl VolumeFractionIndex {
    /// Index of the grid sample nearest `value` at 2-decimal granularity.
    ///
    /// Fails with `OutOfRange` for non-finite values or values outside `[0, 1]`.
    pub fn resolve(value: f64) -> PlyResult<usize> {
        if !value.is_finite() || !(0.0..=1.0).contains(&value) {
            return Err(PlyError::out_of_range(
                value.to_string(),
                "Fiber volume fraction must lie in [0, 1]",
            ));
        }
        let exact = Decimal::from_f64(value).ok_or_else(|| {
            PlyError::out_of_range(value.to_string(), "Fraction has no decimal representation")
        })?;
        Self::resolve_decimal(exact)
    }

    /// Exact-input form of [`resolve`](Self::resolve).
    pub fn resolve_decimal(value: Decimal) -> PlyResult<usize> {
        if value < Decimal::ZERO || value > Decimal::ONE {
            return Err(PlyError::out_of_range(
                value.to_string(),
                "Fiber volume fraction must lie in [0, 1]",
            ));
        }
        let rounded =
            value.round_dp_with_strategy(LOOKUP_SCALE, RoundingStrategy::MidpointAwayFromZero);
        fiber_volume_fractions()
            .binary_search(&rounded)
            .map_err(|_| PlyError::out_of_range(value.to_string(), "Fraction is not on the sample grid"))
    }

    /// Inclusive index range covering `start..=end`.
    ///
    /// Both ends resolve as in [`resolve`](Self::resolve); `end <= start` is
    /// an `InvalidArgument`.
    pub fn resolve_range(start: f64, end: f64) -> PlyResult<RangeInclusive<usize>> {
        let first = Self::resolve(start)?;
        let last = Self::resolve(end)?;
        if end <= start {
            return Err(PlyError::invalid_argument(
                "end",
                end.to_string(),
                format!("Range end must be greater than start ({})", start),
            ));
        }
        Ok(first..=last)
    }
}
