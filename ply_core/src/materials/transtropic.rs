//! Transversely isotropic constituents
//!
//! Carbon and aramid fibers are stiff along their axis and isotropic in the
//! cross-section. Five independent constants describe them: `E1`, `E2`,
//! `G12`, `G23` and `v12`. The plane-strain bulk modulus follows from the
//! transverse-isotropy closure:
//!
//! ```text
//! K23 = (G23 * E2) / (4 * G23 - E2 - 4 * v12^2 * G23 * E2 / E1)
//! ```
//!
//! Each constant passing its own check is not enough: this type also requires
//! `K23` to come out positive, and rejects a constant set that drives the
//! closure denominator to zero or below even though every value is valid.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{PlyError, PlyResult};
use crate::materials::table::{self, TableSchema};
use crate::precision::{checked_ratio, quantize, MODULUS_SCALE};
use crate::validation;

/// Column layout of a transversely isotropic batch table
pub const TRANSTROPIC_COLUMNS: [&str; 6] = [
    "name",
    "axial_youngs_modulus",
    "transverse_youngs_modulus",
    "axial_shear_modulus",
    "transverse_shear_modulus",
    "major_poissons_ratio",
];

/// The five independent constants of a transversely isotropic solid.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Independents {
    e1: Decimal,
    e2: Decimal,
    g12: Decimal,
    g23: Decimal,
    v12: Decimal,
}

/// Transversely isotropic elastic constituent, axis 1 along the fiber.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TranstropicRecord")]
pub struct TransverselyIsotropicMaterial {
    name: String,
    axial_youngs_modulus: Decimal,
    transverse_youngs_modulus: Decimal,
    axial_shear_modulus: Decimal,
    transverse_shear_modulus: Decimal,
    major_poissons_ratio: Decimal,
    plane_strain_bulk_modulus: Decimal,
}

impl TransverselyIsotropicMaterial {
    /// Build a material from numeric constants (E1, E2, G12, G23, v12).
    pub fn new(
        name: &str,
        axial_youngs_modulus: Decimal,
        transverse_youngs_modulus: Decimal,
        axial_shear_modulus: Decimal,
        transverse_shear_modulus: Decimal,
        major_poissons_ratio: Decimal,
    ) -> PlyResult<Self> {
        let name = validation::check_name(name)?;
        let independents = Independents {
            e1: modulus("axial_youngs_modulus", axial_youngs_modulus)?,
            e2: modulus("transverse_youngs_modulus", transverse_youngs_modulus)?,
            g12: modulus("axial_shear_modulus", axial_shear_modulus)?,
            g23: modulus("transverse_shear_modulus", transverse_shear_modulus)?,
            v12: ratio("major_poissons_ratio", major_poissons_ratio)?,
        };
        let k23 = derive(&independents)?;
        Ok(Self::assemble(name, independents, k23))
    }

    /// Build a material from textual inputs.
    pub fn parse(
        name: &str,
        axial_youngs_modulus: &str,
        transverse_youngs_modulus: &str,
        axial_shear_modulus: &str,
        transverse_shear_modulus: &str,
        major_poissons_ratio: &str,
    ) -> PlyResult<Self> {
        Self::new(
            name,
            validation::parse_positive_constant("axial_youngs_modulus", axial_youngs_modulus)?,
            validation::parse_positive_constant(
                "transverse_youngs_modulus",
                transverse_youngs_modulus,
            )?,
            validation::parse_positive_constant("axial_shear_modulus", axial_shear_modulus)?,
            validation::parse_positive_constant(
                "transverse_shear_modulus",
                transverse_shear_modulus,
            )?,
            validation::parse_ratio("major_poissons_ratio", major_poissons_ratio)?,
        )
    }

    /// Build one material per data row of a `(name, E1, E2, G12, G23, v12)` table.
    pub fn read_from_table<S: AsRef<str>>(rows: &[Vec<S>]) -> PlyResult<Vec<Self>> {
        table::read_rows(rows, &TRANSTROPIC_SCHEMA, |c| {
            Self::parse(c[0], c[1], c[2], c[3], c[4], c[5])
        })
    }

    fn assemble(name: String, ind: Independents, k23: Decimal) -> Self {
        TransverselyIsotropicMaterial {
            name,
            axial_youngs_modulus: ind.e1,
            transverse_youngs_modulus: ind.e2,
            axial_shear_modulus: ind.g12,
            transverse_shear_modulus: ind.g23,
            major_poissons_ratio: ind.v12,
            plane_strain_bulk_modulus: k23,
        }
    }

    fn independents(&self) -> Independents {
        Independents {
            e1: self.axial_youngs_modulus,
            e2: self.transverse_youngs_modulus,
            g12: self.axial_shear_modulus,
            g23: self.transverse_shear_modulus,
            v12: self.major_poissons_ratio,
        }
    }

    /// Apply a change to the independents, re-deriving K23 before committing.
    fn update(&mut self, change: impl FnOnce(&mut Independents)) -> PlyResult<()> {
        let mut next = self.independents();
        change(&mut next);
        let k23 = derive(&next)?;
        self.axial_youngs_modulus = next.e1;
        self.transverse_youngs_modulus = next.e2;
        self.axial_shear_modulus = next.g12;
        self.transverse_shear_modulus = next.g23;
        self.major_poissons_ratio = next.v12;
        self.plane_strain_bulk_modulus = k23;
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// E1
    pub fn axial_youngs_modulus(&self) -> Decimal {
        self.axial_youngs_modulus
    }

    /// E2
    pub fn transverse_youngs_modulus(&self) -> Decimal {
        self.transverse_youngs_modulus
    }

    /// G12
    pub fn axial_shear_modulus(&self) -> Decimal {
        self.axial_shear_modulus
    }

    /// G23
    pub fn transverse_shear_modulus(&self) -> Decimal {
        self.transverse_shear_modulus
    }

    /// v12
    pub fn major_poissons_ratio(&self) -> Decimal {
        self.major_poissons_ratio
    }

    /// K23 from the transverse-isotropy closure
    pub fn plane_strain_bulk_modulus(&self) -> Decimal {
        self.plane_strain_bulk_modulus
    }

    pub fn set_name(&mut self, name: &str) -> PlyResult<()> {
        self.name = validation::check_name(name)?;
        Ok(())
    }

    pub fn set_axial_youngs_modulus(&mut self, value: Decimal) -> PlyResult<()> {
        let e1 = modulus("axial_youngs_modulus", value)?;
        self.update(|ind| ind.e1 = e1)
    }

    pub fn set_transverse_youngs_modulus(&mut self, value: Decimal) -> PlyResult<()> {
        let e2 = modulus("transverse_youngs_modulus", value)?;
        self.update(|ind| ind.e2 = e2)
    }

    pub fn set_axial_shear_modulus(&mut self, value: Decimal) -> PlyResult<()> {
        let g12 = modulus("axial_shear_modulus", value)?;
        self.update(|ind| ind.g12 = g12)
    }

    pub fn set_transverse_shear_modulus(&mut self, value: Decimal) -> PlyResult<()> {
        let g23 = modulus("transverse_shear_modulus", value)?;
        self.update(|ind| ind.g23 = g23)
    }

    pub fn set_major_poissons_ratio(&mut self, value: Decimal) -> PlyResult<()> {
        let v12 = ratio("major_poissons_ratio", value)?;
        self.update(|ind| ind.v12 = v12)
    }

    /// Accept K23 only if it matches the closure at 3 decimals.
    pub fn set_plane_strain_bulk_modulus(&mut self, value: Decimal) -> PlyResult<()> {
        if quantize(value, MODULUS_SCALE) == self.plane_strain_bulk_modulus {
            return Ok(());
        }
        tracing::warn!(
            material = %self.name,
            supplied = %value,
            expected = %self.plane_strain_bulk_modulus,
            "rejected plane-strain bulk modulus write"
        );
        Err(PlyError::invalid_argument(
            "plane_strain_bulk_modulus",
            value.to_string(),
            format!(
                "Value violates transverse isotropy relation (expected {})",
                self.plane_strain_bulk_modulus
            ),
        ))
    }

    /// Attribute map consumed by report writers
    pub fn info(&self) -> BTreeMap<&'static str, String> {
        BTreeMap::from([
            ("name", self.name.clone()),
            ("axial_youngs_modulus", self.axial_youngs_modulus.to_string()),
            ("transverse_youngs_modulus", self.transverse_youngs_modulus.to_string()),
            ("axial_shear_modulus", self.axial_shear_modulus.to_string()),
            ("transverse_shear_modulus", self.transverse_shear_modulus.to_string()),
            ("major_poissons_ratio", self.major_poissons_ratio.to_string()),
            ("plane_strain_bulk_modulus", self.plane_strain_bulk_modulus.to_string()),
        ])
    }
}

impl std::fmt::Display for TransverselyIsotropicMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} (transversely isotropic): E1 = {}, E2 = {}, G12 = {}, G23 = {}, v12 = {}, K23 = {}",
            self.name,
            self.axial_youngs_modulus,
            self.transverse_youngs_modulus,
            self.axial_shear_modulus,
            self.transverse_shear_modulus,
            self.major_poissons_ratio,
            self.plane_strain_bulk_modulus
        )
    }
}

const TRANSTROPIC_SCHEMA: TableSchema = TableSchema {
    source_name: "transversely isotropic material table",
    columns: &TRANSTROPIC_COLUMNS,
};

fn modulus(field: &str, value: Decimal) -> PlyResult<Decimal> {
    validation::quantized_constant(field, value, MODULUS_SCALE)
}

fn ratio(field: &str, value: Decimal) -> PlyResult<Decimal> {
    validation::quantized_ratio(field, value, MODULUS_SCALE)
}

/// K23 from the closure, quantized.
///
/// Goes beyond the per-constant checks: a denominator at or below zero is an
/// `InvalidArgument` whose reason says it must be positive.
fn derive(ind: &Independents) -> PlyResult<Decimal> {
    let four = Decimal::from(4);
    let coupling = checked_ratio(
        four * ind.v12 * ind.v12 * ind.g23 * ind.e2,
        ind.e1,
        "plane_strain_bulk_modulus",
    )?;
    let denominator = four * ind.g23 - ind.e2 - coupling;
    if denominator <= Decimal::ZERO {
        return Err(PlyError::invalid_argument(
            "plane_strain_bulk_modulus",
            denominator.to_string(),
            "Closure denominator 4*G23 - E2 - 4*v12^2*G23*E2/E1 must be positive",
        ));
    }
    let k23 = checked_ratio(ind.g23 * ind.e2, denominator, "plane_strain_bulk_modulus")?;
    Ok(quantize(k23, MODULUS_SCALE))
}

/// Wire form of [`TransverselyIsotropicMaterial`]; K23 is write-checked when present.
#[derive(Debug, Deserialize)]
struct TranstropicRecord {
    name: String,
    axial_youngs_modulus: Decimal,
    transverse_youngs_modulus: Decimal,
    axial_shear_modulus: Decimal,
    transverse_shear_modulus: Decimal,
    major_poissons_ratio: Decimal,
    #[serde(default)]
    plane_strain_bulk_modulus: Option<Decimal>,
}

impl TryFrom<TranstropicRecord> for TransverselyIsotropicMaterial {
    type Error = PlyError;

    fn try_from(r: TranstropicRecord) -> PlyResult<Self> {
        let mut material = TransverselyIsotropicMaterial::new(
            &r.name,
            r.axial_youngs_modulus,
            r.transverse_youngs_modulus,
            r.axial_shear_modulus,
            r.transverse_shear_modulus,
            r.major_poissons_ratio,
        )?;
        if let Some(k23) = r.plane_strain_bulk_modulus {
            material.set_plane_strain_bulk_modulus(k23)?;
        }
        Ok(material)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn carbon() -> TransverselyIsotropicMaterial {
        TransverselyIsotropicMaterial::new(
            "Carbon",
            dec!(250),
            dec!(25),
            dec!(20),
            dec!(10),
            dec!(0.28),
        )
        .unwrap()
    }

    #[test]
    fn test_plane_strain_bulk_closure() {
        // 250 / (40 - 25 - 4 * 0.0784 * 250 / 250) = 17.0225...
        assert_eq!(carbon().plane_strain_bulk_modulus(), dec!(17.023));
    }

    #[test]
    fn test_constants_are_quantized() {
        let c = carbon();
        assert_eq!(c.axial_youngs_modulus().to_string(), "250.000");
        assert_eq!(c.major_poissons_ratio().to_string(), "0.280");
    }

    #[test]
    fn test_each_constant_is_validated() {
        let base = [dec!(250), dec!(25), dec!(20), dec!(10)];
        for i in 0..4 {
            let mut moduli = base;
            moduli[i] = dec!(-1);
            let result = TransverselyIsotropicMaterial::new(
                "Carbon", moduli[0], moduli[1], moduli[2], moduli[3], dec!(0.28),
            );
            assert!(matches!(result, Err(PlyError::InvalidArgument { .. })), "modulus {i}");
        }
        assert!(TransverselyIsotropicMaterial::new(
            "Carbon", dec!(250), dec!(25), dec!(20), dec!(10), dec!(0.55)
        )
        .is_err());
        assert!(TransverselyIsotropicMaterial::new(
            "Car bon", dec!(250), dec!(25), dec!(20), dec!(10), dec!(0.28)
        )
        .is_err());
    }

    #[test]
    fn test_constants_rounding_to_zero_rejected() {
        let tiny = TransverselyIsotropicMaterial::new(
            "Carbon", dec!(250), dec!(25), dec!(20), dec!(10), dec!(0.0001),
        );
        assert!(matches!(
            tiny,
            Err(PlyError::InvalidArgument { ref field, .. }) if field == "major_poissons_ratio"
        ));
        assert!(TransverselyIsotropicMaterial::parse("Carbon", "250", "25", "0.0004", "10", "0.28").is_err());

        let mut c = carbon();
        let before = c.clone();
        assert!(c.set_axial_youngs_modulus(dec!(0.0004)).is_err());
        assert!(c.set_transverse_shear_modulus(dec!(0.0002)).is_err());
        assert!(c.set_major_poissons_ratio(dec!(0.0004)).is_err());
        assert_eq!(c, before);
    }

    #[test]
    fn test_non_positive_closure_rejected() {
        // 4 * G23 < E2 drives K23 negative
        let result = TransverselyIsotropicMaterial::new(
            "Odd", dec!(250), dec!(25), dec!(20), dec!(5), dec!(0.28),
        );
        match result {
            Err(PlyError::InvalidArgument { field, value, reason }) => {
                assert_eq!(field, "plane_strain_bulk_modulus");
                // 20 - 25 - 4 * 0.0784 * 125 / 250
                assert_eq!(value.parse::<Decimal>().unwrap(), dec!(-5.1568));
                assert!(reason.contains("must be positive"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_setters_rederive_and_stay_atomic() {
        let mut c = carbon();
        c.set_transverse_shear_modulus(dec!(12)).unwrap();
        // 300 / (48 - 25 - 4 * 0.0784 * 300 / 250) = 13.2604...
        assert_eq!(c.plane_strain_bulk_modulus(), dec!(13.260));

        let before = c.clone();
        assert!(c.set_transverse_youngs_modulus(dec!(60)).is_err());
        assert!(c.set_major_poissons_ratio(dec!(0.7)).is_err());
        assert_eq!(c, before);

        c.set_axial_shear_modulus(dec!(18)).unwrap();
        assert_eq!(c.axial_shear_modulus(), dec!(18));
        assert_eq!(c.plane_strain_bulk_modulus(), dec!(13.260));
        c.set_name("T300").unwrap();
        assert_eq!(c.name(), "T300");
    }

    #[test]
    fn test_derived_write_check() {
        let mut c = carbon();
        assert!(c.set_plane_strain_bulk_modulus(dec!(17.023)).is_ok());
        assert!(c.set_plane_strain_bulk_modulus(dec!(17.0225)).is_ok());
        assert!(c.set_plane_strain_bulk_modulus(dec!(17.022)).is_err());
        let err = c.set_plane_strain_bulk_modulus(dec!(17.024)).unwrap_err();
        assert!(err.to_string().contains("transverse isotropy"));
    }

    #[test]
    fn test_read_from_table() {
        let rows = vec![
            vec!["name", "E1", "E2", "G12", "G23", "v12"],
            vec!["Carbon", "250", "25", "20", "10", "0.28"],
            vec!["Aramid", "130", "10", "12", "3.5", "0.35"],
        ];
        let fibers = TransverselyIsotropicMaterial::read_from_table(&rows).unwrap();
        assert_eq!(fibers.len(), 2);
        assert_eq!(fibers[0], carbon());

        let iso_shaped = vec![vec!["name", "E", "v"], vec!["Epoxy", "2.8", "0.3"]];
        assert!(matches!(
            TransverselyIsotropicMaterial::read_from_table(&iso_shaped),
            Err(PlyError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn test_serde_roundtrip() {
        let c = carbon();
        let json = serde_json::to_string(&c).unwrap();
        let back: TransverselyIsotropicMaterial = serde_json::from_str(&json).unwrap();
        assert_eq!(back, c);

        let tampered = json.replace("\"17.023\"", "\"17.000\"");
        assert!(serde_json::from_str::<TransverselyIsotropicMaterial>(&tampered).is_err());
    }
}
