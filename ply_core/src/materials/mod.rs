//! # Constituent Materials
//!
//! Elastic constituents of a unidirectional ply. A fiber or a matrix is
//! either isotropic (glass, epoxy) or transversely isotropic (carbon,
//! aramid).
//!
//! ## Material Types
//!
//! - **Isotropic**: `E`, `v`; derives `G` and the plane-strain bulk modulus `K`
//! - **Transversely isotropic**: `E1`, `E2`, `G12`, `G23`, `v12`; derives `K23`
//!
//! Micromechanics code never branches on the variant. It asks for
//! [`ElasticConstants`], in which an isotropic material reports the same
//! modulus for its axial and transverse roles.
//!
//! ## Example
//!
//! ```rust
//! use ply_core::materials::{Constituent, IsotropicMaterial};
//! use rust_decimal::Decimal;
//!
//! let epoxy: Constituent = IsotropicMaterial::parse("Epoxy", "2.8", "0.3").unwrap().into();
//! let c = epoxy.elastic_constants();
//! assert_eq!(c.axial_modulus, c.transverse_modulus);
//! assert_eq!(c.plane_strain_bulk_modulus, Decimal::new(2692, 3));
//! ```

pub mod isotropic;
pub mod transtropic;
pub(crate) mod table;

pub use isotropic::{IsotropicMaterial, ISOTROPIC_COLUMNS};
pub use transtropic::{TransverselyIsotropicMaterial, TRANSTROPIC_COLUMNS};

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::PlyResult;

/// Constituent constants in the roles micromechanics formulas use them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElasticConstants {
    /// Young's modulus along the fiber axis (E1, or E)
    pub axial_modulus: Decimal,
    /// Young's modulus across the fiber axis (E2, or E)
    pub transverse_modulus: Decimal,
    /// In-plane shear modulus (G12, or G)
    pub axial_shear_modulus: Decimal,
    /// Cross-section shear modulus (G23, or G)
    pub transverse_shear_modulus: Decimal,
    /// Major Poisson's ratio (v12, or v)
    pub poissons_ratio: Decimal,
    /// Plane-strain bulk modulus (K23, or K)
    pub plane_strain_bulk_modulus: Decimal,
}

/// Closed set of constituent material variants.
///
/// ## JSON Serialization
///
/// ```json
/// { "type": "Isotropic", "name": "Epoxy", "youngs_modulus": "2.800", ... }
/// { "type": "TransverselyIsotropic", "name": "Carbon", "axial_youngs_modulus": "250.000", ... }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Constituent {
    Isotropic(IsotropicMaterial),
    TransverselyIsotropic(TransverselyIsotropicMaterial),
}

impl Constituent {
    pub fn name(&self) -> &str {
        match self {
            Constituent::Isotropic(m) => m.name(),
            Constituent::TransverselyIsotropic(m) => m.name(),
        }
    }

    /// Constants in their axial/transverse/shear roles
    pub fn elastic_constants(&self) -> ElasticConstants {
        match self {
            Constituent::Isotropic(m) => ElasticConstants {
                axial_modulus: m.youngs_modulus(),
                transverse_modulus: m.youngs_modulus(),
                axial_shear_modulus: m.shear_modulus(),
                transverse_shear_modulus: m.shear_modulus(),
                poissons_ratio: m.poissons_ratio(),
                plane_strain_bulk_modulus: m.plane_strain_bulk_modulus(),
            },
            Constituent::TransverselyIsotropic(m) => ElasticConstants {
                axial_modulus: m.axial_youngs_modulus(),
                transverse_modulus: m.transverse_youngs_modulus(),
                axial_shear_modulus: m.axial_shear_modulus(),
                transverse_shear_modulus: m.transverse_shear_modulus(),
                poissons_ratio: m.major_poissons_ratio(),
                plane_strain_bulk_modulus: m.plane_strain_bulk_modulus(),
            },
        }
    }

    /// Get material type as a string
    pub fn material_type(&self) -> &'static str {
        match self {
            Constituent::Isotropic(_) => "Isotropic",
            Constituent::TransverselyIsotropic(_) => "Transversely Isotropic",
        }
    }

    /// Attribute map consumed by report writers
    pub fn info(&self) -> BTreeMap<&'static str, String> {
        let mut info = match self {
            Constituent::Isotropic(m) => m.info(),
            Constituent::TransverselyIsotropic(m) => m.info(),
        };
        info.insert("type", self.material_type().to_string());
        info
    }

    /// Read a table of either variant, chosen by its column count.
    ///
    /// Three columns mean `(name, E, v)`; six mean `(name, E1, E2, G12, G23, v12)`.
    /// Anything else is reported by the isotropic reader as `InvalidFormat`.
    pub fn read_from_table<S: AsRef<str>>(rows: &[Vec<S>]) -> PlyResult<Vec<Constituent>> {
        let width = rows.first().map(Vec::len).unwrap_or(0);
        if width == TRANSTROPIC_COLUMNS.len() {
            Ok(TransverselyIsotropicMaterial::read_from_table(rows)?
                .into_iter()
                .map(Constituent::from)
                .collect())
        } else {
            Ok(IsotropicMaterial::read_from_table(rows)?
                .into_iter()
                .map(Constituent::from)
                .collect())
        }
    }
}

impl std::fmt::Display for Constituent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Constituent::Isotropic(m) => write!(f, "{}", m),
            Constituent::TransverselyIsotropic(m) => write!(f, "{}", m),
        }
    }
}

impl From<IsotropicMaterial> for Constituent {
    fn from(mat: IsotropicMaterial) -> Self {
        Constituent::Isotropic(mat)
    }
}

impl From<TransverselyIsotropicMaterial> for Constituent {
    fn from(mat: TransverselyIsotropicMaterial) -> Self {
        Constituent::TransverselyIsotropic(mat)
    }
}
