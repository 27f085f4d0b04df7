//! Isotropic constituents
//!
//! An isotropic material is fully described by Young's modulus `E` and
//! Poisson's ratio `v`. The shear modulus and the plane-strain bulk modulus
//! follow from them:
//!
//! ```text
//! G = E / (2(1 + v))
//! K = E / (2(1 + v)(1 - 2v))
//! ```
//!
//! Both derived values are refreshed on every mutation and can only be read.
//! The write-checked setters accept a derived value only when it equals the
//! formula output, which is what a deserialized record goes through.
//!
//! ## Example
//!
//! ```rust
//! use ply_core::materials::IsotropicMaterial;
//! use rust_decimal::Decimal;
//!
//! let glass = IsotropicMaterial::parse("Fiberglass", "120", "0.29").unwrap();
//! assert_eq!(glass.shear_modulus(), Decimal::new(46512, 3));
//! ```

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{PlyError, PlyResult};
use crate::materials::table::{self, TableSchema};
use crate::precision::{checked_ratio, quantize, MODULUS_SCALE};
use crate::validation;

/// Column layout of an isotropic batch table
pub const ISOTROPIC_COLUMNS: [&str; 3] = ["name", "youngs_modulus", "poissons_ratio"];

/// Isotropic elastic constituent (fiber or matrix).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "IsotropicRecord")]
pub struct IsotropicMaterial {
    name: String,
    youngs_modulus: Decimal,
    poissons_ratio: Decimal,
    shear_modulus: Decimal,
    plane_strain_bulk_modulus: Decimal,
}

impl IsotropicMaterial {
    /// Build a material from numeric constants.
    ///
    /// Inputs are quantized to 3 decimals after validation; a constant that
    /// rounds to zero is rejected.
    pub fn new(name: &str, youngs_modulus: Decimal, poissons_ratio: Decimal) -> PlyResult<Self> {
        let name = validation::check_name(name)?;
        let e = validation::quantized_constant("youngs_modulus", youngs_modulus, MODULUS_SCALE)?;
        let v = validation::quantized_ratio("poissons_ratio", poissons_ratio, MODULUS_SCALE)?;
        let (g, k) = derive(e, v)?;
        Ok(IsotropicMaterial {
            name,
            youngs_modulus: e,
            poissons_ratio: v,
            shear_modulus: g,
            plane_strain_bulk_modulus: k,
        })
    }

    /// Build a material from textual inputs, as read from a table or prompt.
    pub fn parse(name: &str, youngs_modulus: &str, poissons_ratio: &str) -> PlyResult<Self> {
        let e = validation::parse_positive_constant("youngs_modulus", youngs_modulus)?;
        let v = validation::parse_ratio("poissons_ratio", poissons_ratio)?;
        Self::new(name, e, v)
    }

    /// Build one material per data row of a `(name, E, v)` table.
    ///
    /// The first row is the header. The batch fails on the first bad row.
    pub fn read_from_table<S: AsRef<str>>(rows: &[Vec<S>]) -> PlyResult<Vec<Self>> {
        table::read_rows(rows, &ISOTROPIC_SCHEMA, |cells| {
            Self::parse(cells[0], cells[1], cells[2])
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn youngs_modulus(&self) -> Decimal {
        self.youngs_modulus
    }

    pub fn poissons_ratio(&self) -> Decimal {
        self.poissons_ratio
    }

    /// Shear modulus `G = E / (2(1 + v))`
    pub fn shear_modulus(&self) -> Decimal {
        self.shear_modulus
    }

    /// Plane-strain bulk modulus `K = E / (2(1 + v)(1 - 2v))`
    pub fn plane_strain_bulk_modulus(&self) -> Decimal {
        self.plane_strain_bulk_modulus
    }

    pub fn set_name(&mut self, name: &str) -> PlyResult<()> {
        self.name = validation::check_name(name)?;
        Ok(())
    }

    /// Replace `E`; derived moduli follow.
    pub fn set_youngs_modulus(&mut self, youngs_modulus: Decimal) -> PlyResult<()> {
        let e = validation::quantized_constant("youngs_modulus", youngs_modulus, MODULUS_SCALE)?;
        let (g, k) = derive(e, self.poissons_ratio)?;
        self.youngs_modulus = e;
        self.shear_modulus = g;
        self.plane_strain_bulk_modulus = k;
        Ok(())
    }

    /// Replace `v`; derived moduli follow.
    pub fn set_poissons_ratio(&mut self, poissons_ratio: Decimal) -> PlyResult<()> {
        let v = validation::quantized_ratio("poissons_ratio", poissons_ratio, MODULUS_SCALE)?;
        let (g, k) = derive(self.youngs_modulus, v)?;
        self.poissons_ratio = v;
        self.shear_modulus = g;
        self.plane_strain_bulk_modulus = k;
        Ok(())
    }

    /// Accept `G` only if it matches `E / (2(1 + v))` at 3 decimals.
    pub fn set_shear_modulus(&mut self, shear_modulus: Decimal) -> PlyResult<()> {
        check_relation("shear_modulus", shear_modulus, self.shear_modulus)
    }

    /// Accept `K` only if it matches `E / (2(1 + v)(1 - 2v))` at 3 decimals.
    pub fn set_plane_strain_bulk_modulus(&mut self, bulk_modulus: Decimal) -> PlyResult<()> {
        check_relation(
            "plane_strain_bulk_modulus",
            bulk_modulus,
            self.plane_strain_bulk_modulus,
        )
    }

    /// Attribute map consumed by report writers
    pub fn info(&self) -> BTreeMap<&'static str, String> {
        BTreeMap::from([
            ("name", self.name.clone()),
            ("youngs_modulus", self.youngs_modulus.to_string()),
            ("poissons_ratio", self.poissons_ratio.to_string()),
            ("shear_modulus", self.shear_modulus.to_string()),
            ("plane_strain_bulk_modulus", self.plane_strain_bulk_modulus.to_string()),
        ])
    }
}

impl std::fmt::Display for IsotropicMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} (isotropic): E = {}, v = {}, G = {}, K = {}",
            self.name,
            self.youngs_modulus,
            self.poissons_ratio,
            self.shear_modulus,
            self.plane_strain_bulk_modulus
        )
    }
}

const ISOTROPIC_SCHEMA: TableSchema = TableSchema {
    source_name: "isotropic material table",
    columns: &ISOTROPIC_COLUMNS,
};

fn derive(e: Decimal, v: Decimal) -> PlyResult<(Decimal, Decimal)> {
    let two = Decimal::TWO;
    let g = checked_ratio(e, two * (Decimal::ONE + v), "shear_modulus")?;
    let k = checked_ratio(
        e,
        two * (Decimal::ONE + v) * (Decimal::ONE - two * v),
        "plane_strain_bulk_modulus",
    )?;
    Ok((quantize(g, MODULUS_SCALE), quantize(k, MODULUS_SCALE)))
}

fn check_relation(field: &str, supplied: Decimal, expected: Decimal) -> PlyResult<()> {
    if quantize(supplied, MODULUS_SCALE) == expected {
        return Ok(());
    }
    tracing::warn!(field, %supplied, %expected, "rejected derived modulus write");
    Err(PlyError::invalid_argument(
        field,
        supplied.to_string(),
        format!("Value violates isotropic relation (expected {})", expected),
    ))
}

/// Wire form of [`IsotropicMaterial`]; derived fields are optional and
/// write-checked when present.
#[derive(Debug, Deserialize)]
struct IsotropicRecord {
    name: String,
    youngs_modulus: Decimal,
    poissons_ratio: Decimal,
    #[serde(default)]
    shear_modulus: Option<Decimal>,
    #[serde(default)]
    plane_strain_bulk_modulus: Option<Decimal>,
}

impl TryFrom<IsotropicRecord> for IsotropicMaterial {
    type Error = PlyError;

    fn try_from(record: IsotropicRecord) -> PlyResult<Self> {
        let mut material = IsotropicMaterial::new(
            &record.name,
            record.youngs_modulus,
            record.poissons_ratio,
        )?;
        if let Some(g) = record.shear_modulus {
            material.set_shear_modulus(g)?;
        }
        if let Some(k) = record.plane_strain_bulk_modulus {
            material.set_plane_strain_bulk_modulus(k)?;
        }
        Ok(material)
    }
}
