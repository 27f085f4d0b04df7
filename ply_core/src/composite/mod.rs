//! # Composite Estimation
//!
//! Homogenized properties of a unidirectional ply from its fiber and matrix.
//!
//! - [`halpin_tsai`] - the Halpin-Tsai estimator and its query surface
//! - [`volume_fraction`] - the shared 101-point fraction grid and index lookup
//! - [`property`] - property identifiers and fraction queries

pub mod halpin_tsai;
pub mod property;
pub mod volume_fraction;

pub use halpin_tsai::{CompositeReport, HalpinTsai, SweepRow};
pub use property::{EffectiveProperty, FractionQuery};
pub use volume_fraction::{fiber_volume_fractions, VolumeFractionIndex, SAMPLE_COUNT};
