//! Effective ply properties and fraction queries

use serde::{Deserialize, Serialize};

use crate::precision::{EFFECTIVE_RATIO_SCALE, MODULUS_SCALE};

/// One of the six homogenized properties an estimator produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectiveProperty {
    /// E1*
    AxialYoungsModulus,
    /// E2*
    TransverseYoungsModulus,
    /// G12*
    AxialShearModulus,
    /// G23*
    TransverseShearModulus,
    /// v12*
    MajorPoissonsRatio,
    /// K23*
    PlaneStrainBulkModulus,
}

impl EffectiveProperty {
    /// All properties in report column order
    pub const ALL: [EffectiveProperty; 6] = [
        EffectiveProperty::AxialYoungsModulus,
        EffectiveProperty::TransverseYoungsModulus,
        EffectiveProperty::AxialShearModulus,
        EffectiveProperty::TransverseShearModulus,
        EffectiveProperty::MajorPoissonsRatio,
        EffectiveProperty::PlaneStrainBulkModulus,
    ];

    /// Short engineering symbol (e.g., "E1", "v12")
    pub fn symbol(&self) -> &'static str {
        match self {
            EffectiveProperty::AxialYoungsModulus => "E1",
            EffectiveProperty::TransverseYoungsModulus => "E2",
            EffectiveProperty::AxialShearModulus => "G12",
            EffectiveProperty::TransverseShearModulus => "G23",
            EffectiveProperty::MajorPoissonsRatio => "v12",
            EffectiveProperty::PlaneStrainBulkModulus => "K23",
        }
    }

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            EffectiveProperty::AxialYoungsModulus => "Axial Young's Modulus",
            EffectiveProperty::TransverseYoungsModulus => "Transverse Young's Modulus",
            EffectiveProperty::AxialShearModulus => "Axial Shear Modulus",
            EffectiveProperty::TransverseShearModulus => "Transverse Shear Modulus",
            EffectiveProperty::MajorPoissonsRatio => "Major Poisson's Ratio",
            EffectiveProperty::PlaneStrainBulkModulus => "Plane-Strain Bulk Modulus",
        }
    }

    /// Decimal places the property is stored at
    pub fn scale(&self) -> u32 {
        match self {
            EffectiveProperty::MajorPoissonsRatio => EFFECTIVE_RATIO_SCALE,
            _ => MODULUS_SCALE,
        }
    }

    /// Parse a symbol, case-insensitive
    pub fn from_symbol(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.symbol().eq_ignore_ascii_case(s.trim()))
    }
}

impl std::fmt::Display for EffectiveProperty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Which samples of a property sweep to return.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum FractionQuery {
    /// All 101 samples
    #[default]
    All,
    /// The single sample at a fraction
    At(f64),
    /// Every sample from `min` to `max`, inclusive
    Range(f64, f64),
}
