//! # Halpin-Tsai Estimator
//!
//! Effective elastic properties of a unidirectional ply, sampled over the
//! shared 101-point fiber volume fraction grid. With `Vm = 1 - Vf`:
//!
//! ```text
//! E1*  = Ef*Vf + Em*Vm
//! v12* = vf*Vf + vm*Vm
//! G12* = [(Gf+Gm)*Gm*Vm + 2*Gf*Gm*Vf] / [(Gf+Gm)*Vm + 2*Gm*Vf]
//! K23* = [Km*(Kf+Gm)*Vm + Kf*(Km+Gm)*Vf] / [(Kf+Gm)*Vm + (Km+Gm)*Vf]
//! G23* = Gm*[Km*(Gm+Gf) + 2*Gf*Gm + Km*(Gf-Gm)*Vf]
//!           / [Km*(Gm+Gf) + 2*Gf*Gm - (Km+2*Gm)*(Gf-Gm)*Vf]
//! E2*  = 4*G23*K23* / [K23* + G23* + 4*v12*^2*G23*K23*/E1*]
//! ```
//!
//! In `G12*` the shear moduli are axial (G12); in `K23*` and `G23*` they are
//! transverse (G23). `E2*` is evaluated element-wise from the four quantized
//! sequences it depends on. `v12*` is kept at 4 decimals, everything else at 3.
//!
//! Everything is computed once in [`HalpinTsai::new`]; afterwards the
//! estimator is read-only and can be shared across threads.
//!
//! ## Example
//!
//! ```rust
//! use ply_core::composite::{FractionQuery, HalpinTsai};
//! use ply_core::materials::{Constituent, IsotropicMaterial, TransverselyIsotropicMaterial};
//!
//! let carbon = TransverselyIsotropicMaterial::parse("Carbon", "250", "25", "20", "10", "0.28")?;
//! let epoxy = IsotropicMaterial::parse("Epoxy", "2.8", "0.3")?;
//! let ply = HalpinTsai::new(Constituent::from(carbon), Constituent::from(epoxy))?;
//!
//! assert_eq!(ply.name(), "Carbon-Epoxy");
//! let e1 = ply.e1_eff(FractionQuery::At(0.5))?;
//! assert_eq!(e1[0].1.to_string(), "126.400");
//! # Ok::<(), ply_core::errors::PlyError>(())
//! ```

use std::ops::RangeInclusive;
use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::composite::property::{EffectiveProperty, FractionQuery};
use crate::composite::volume_fraction::{fiber_volume_fractions, VolumeFractionIndex, SAMPLE_COUNT};
use crate::errors::{PlyError, PlyResult};
use crate::materials::{Constituent, ElasticConstants};
use crate::precision::{checked_ratio, quantize, EFFECTIVE_RATIO_SCALE, MODULUS_SCALE};

/// Halpin-Tsai composite estimator for one fiber/matrix pair.
#[derive(Debug, Clone)]
pub struct HalpinTsai {
    name: String,
    fiber: Arc<Constituent>,
    matrix: Arc<Constituent>,
    eff_axial_youngs_moduli: Vec<Decimal>,
    eff_major_poissons_ratios: Vec<Decimal>,
    eff_axial_shear_moduli: Vec<Decimal>,
    eff_pstrain_bulk_moduli: Vec<Decimal>,
    eff_transverse_shear_moduli: Vec<Decimal>,
    eff_transverse_youngs_moduli: Vec<Decimal>,
}

type Formula = fn(&ElasticConstants, &ElasticConstants, Decimal) -> PlyResult<Decimal>;

impl HalpinTsai {
    /// Evaluate all six properties at every grid fraction.
    ///
    /// Any pairing of isotropic and transversely isotropic constituents is
    /// accepted. Errors only surface if a formula denominator degenerates.
    pub fn new(
        fiber: impl Into<Arc<Constituent>>,
        matrix: impl Into<Arc<Constituent>>,
    ) -> PlyResult<Self> {
        let fiber = fiber.into();
        let matrix = matrix.into();
        let f = fiber.elastic_constants();
        let m = matrix.elastic_constants();

        let e1 = evaluate_over_grid(&f, &m, axial_youngs_modulus, MODULUS_SCALE)?;
        let v12 = evaluate_over_grid(&f, &m, major_poissons_ratio, EFFECTIVE_RATIO_SCALE)?;
        let g12 = evaluate_over_grid(&f, &m, axial_shear_modulus, MODULUS_SCALE)?;
        let k23 = evaluate_over_grid(&f, &m, plane_strain_bulk_modulus, MODULUS_SCALE)?;
        let g23 = evaluate_over_grid(&f, &m, transverse_shear_modulus, MODULUS_SCALE)?;
        let e2 = e1
            .iter()
            .zip(&v12)
            .zip(&g23)
            .zip(&k23)
            .map(|(((&e1, &v12), &g23), &k23)| {
                transverse_youngs_modulus(e1, v12, g23, k23).map(|e2| quantize(e2, MODULUS_SCALE))
            })
            .collect::<PlyResult<Vec<_>>>()?;

        let name = format!("{}-{}", fiber.name(), matrix.name());
        debug!(composite = %name, samples = SAMPLE_COUNT, "computed Halpin-Tsai sweep");

        Ok(HalpinTsai {
            name,
            fiber,
            matrix,
            eff_axial_youngs_moduli: e1,
            eff_major_poissons_ratios: v12,
            eff_axial_shear_moduli: g12,
            eff_pstrain_bulk_moduli: k23,
            eff_transverse_shear_moduli: g23,
            eff_transverse_youngs_moduli: e2,
        })
    }

    /// `"<fiber>-<matrix>"`
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fiber(&self) -> &Arc<Constituent> {
        &self.fiber
    }

    pub fn matrix(&self) -> &Arc<Constituent> {
        &self.matrix
    }

    /// The shared fraction grid the sequences are sampled on
    pub fn fiber_volume_fractions(&self) -> &'static [Decimal] {
        fiber_volume_fractions()
    }

    pub fn eff_axial_youngs_moduli(&self) -> &[Decimal] {
        &self.eff_axial_youngs_moduli
    }

    pub fn eff_major_poissons_ratios(&self) -> &[Decimal] {
        &self.eff_major_poissons_ratios
    }

    pub fn eff_axial_shear_moduli(&self) -> &[Decimal] {
        &self.eff_axial_shear_moduli
    }

    pub fn eff_pstrain_bulk_moduli(&self) -> &[Decimal] {
        &self.eff_pstrain_bulk_moduli
    }

    pub fn eff_transverse_shear_moduli(&self) -> &[Decimal] {
        &self.eff_transverse_shear_moduli
    }

    pub fn eff_transverse_youngs_moduli(&self) -> &[Decimal] {
        &self.eff_transverse_youngs_moduli
    }

    /// Full 101-sample sequence of one property
    pub fn sequence(&self, property: EffectiveProperty) -> &[Decimal] {
        match property {
            EffectiveProperty::AxialYoungsModulus => &self.eff_axial_youngs_moduli,
            EffectiveProperty::TransverseYoungsModulus => &self.eff_transverse_youngs_moduli,
            EffectiveProperty::AxialShearModulus => &self.eff_axial_shear_moduli,
            EffectiveProperty::TransverseShearModulus => &self.eff_transverse_shear_moduli,
            EffectiveProperty::MajorPoissonsRatio => &self.eff_major_poissons_ratios,
            EffectiveProperty::PlaneStrainBulkModulus => &self.eff_pstrain_bulk_moduli,
        }
    }

    /// `(Vf, value)` pairs of one property for the queried fractions.
    pub fn effective(
        &self,
        property: EffectiveProperty,
        query: FractionQuery,
    ) -> PlyResult<Vec<(Decimal, Decimal)>> {
        let indices = resolve_query(query)?;
        let grid = fiber_volume_fractions();
        let values = self.sequence(property);
        Ok(indices.map(|i| (grid[i], values[i])).collect())
    }

    pub fn e1_eff(&self, query: FractionQuery) -> PlyResult<Vec<(Decimal, Decimal)>> {
        self.effective(EffectiveProperty::AxialYoungsModulus, query)
    }

    pub fn e2_eff(&self, query: FractionQuery) -> PlyResult<Vec<(Decimal, Decimal)>> {
        self.effective(EffectiveProperty::TransverseYoungsModulus, query)
    }

    pub fn g12_eff(&self, query: FractionQuery) -> PlyResult<Vec<(Decimal, Decimal)>> {
        self.effective(EffectiveProperty::AxialShearModulus, query)
    }

    pub fn g23_eff(&self, query: FractionQuery) -> PlyResult<Vec<(Decimal, Decimal)>> {
        self.effective(EffectiveProperty::TransverseShearModulus, query)
    }

    pub fn v12_eff(&self, query: FractionQuery) -> PlyResult<Vec<(Decimal, Decimal)>> {
        self.effective(EffectiveProperty::MajorPoissonsRatio, query)
    }

    pub fn k23_eff(&self, query: FractionQuery) -> PlyResult<Vec<(Decimal, Decimal)>> {
        self.effective(EffectiveProperty::PlaneStrainBulkModulus, query)
    }

    /// All six properties at each queried fraction, for report writers.
    pub fn sweep(&self, query: FractionQuery) -> PlyResult<Vec<SweepRow>> {
        let grid = fiber_volume_fractions();
        Ok(resolve_query(query)?
            .map(|i| SweepRow {
                fiber_volume_fraction: grid[i],
                axial_youngs_modulus: self.eff_axial_youngs_moduli[i],
                transverse_youngs_modulus: self.eff_transverse_youngs_moduli[i],
                axial_shear_modulus: self.eff_axial_shear_moduli[i],
                transverse_shear_modulus: self.eff_transverse_shear_moduli[i],
                major_poissons_ratio: self.eff_major_poissons_ratios[i],
                plane_strain_bulk_modulus: self.eff_pstrain_bulk_moduli[i],
            })
            .collect())
    }

    /// Serializable snapshot of the estimator and the queried rows.
    pub fn report(&self, query: FractionQuery) -> PlyResult<CompositeReport> {
        Ok(CompositeReport {
            name: self.name.clone(),
            fiber: (*self.fiber).clone(),
            matrix: (*self.matrix).clone(),
            rows: self.sweep(query)?,
        })
    }
}

impl std::fmt::Display for HalpinTsai {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (Halpin-Tsai, {} samples)", self.name, SAMPLE_COUNT)
    }
}

/// All six effective properties at one fiber volume fraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepRow {
    pub fiber_volume_fraction: Decimal,
    pub axial_youngs_modulus: Decimal,
    pub transverse_youngs_modulus: Decimal,
    pub axial_shear_modulus: Decimal,
    pub transverse_shear_modulus: Decimal,
    pub major_poissons_ratio: Decimal,
    pub plane_strain_bulk_modulus: Decimal,
}

impl SweepRow {
    pub fn get(&self, property: EffectiveProperty) -> Decimal {
        match property {
            EffectiveProperty::AxialYoungsModulus => self.axial_youngs_modulus,
            EffectiveProperty::TransverseYoungsModulus => self.transverse_youngs_modulus,
            EffectiveProperty::AxialShearModulus => self.axial_shear_modulus,
            EffectiveProperty::TransverseShearModulus => self.transverse_shear_modulus,
            EffectiveProperty::MajorPoissonsRatio => self.major_poissons_ratio,
            EffectiveProperty::PlaneStrainBulkModulus => self.plane_strain_bulk_modulus,
        }
    }
}

/// Estimator output as handed to table, CSV or JSON writers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeReport {
    pub name: String,
    pub fiber: Constituent,
    pub matrix: Constituent,
    pub rows: Vec<SweepRow>,
}

fn resolve_query(query: FractionQuery) -> PlyResult<RangeInclusive<usize>> {
    match query {
        FractionQuery::All => Ok(0..=SAMPLE_COUNT - 1),
        FractionQuery::At(min) => {
            check_bound("min", min)?;
            let i = VolumeFractionIndex::resolve(min)?;
            Ok(i..=i)
        }
        FractionQuery::Range(min, max) => {
            check_bound("min", min)?;
            if max < min {
                return Err(PlyError::invalid_argument(
                    "max",
                    max.to_string(),
                    format!("Upper fraction must not be below the lower fraction ({})", min),
                ));
            }
            check_bound("max", max)?;
            if max == min {
                let i = VolumeFractionIndex::resolve(min)?;
                return Ok(i..=i);
            }
            VolumeFractionIndex::resolve_range(min, max)
        }
    }
}

fn check_bound(field: &str, value: f64) -> PlyResult<()> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(PlyError::invalid_argument(
            field,
            value.to_string(),
            "Fiber volume fraction must lie in [0, 1]",
        ))
    }
}

fn evaluate_over_grid(
    fiber: &ElasticConstants,
    matrix: &ElasticConstants,
    formula: Formula,
    scale: u32,
) -> PlyResult<Vec<Decimal>> {
    fiber_volume_fractions()
        .iter()
        .map(|&vf| formula(fiber, matrix, vf).map(|value| quantize(value, scale)))
        .collect()
}

fn axial_youngs_modulus(f: &ElasticConstants, m: &ElasticConstants, vf: Decimal) -> PlyResult<Decimal> {
    Ok(f.axial_modulus * vf + m.axial_modulus * (Decimal::ONE - vf))
}

fn major_poissons_ratio(f: &ElasticConstants, m: &ElasticConstants, vf: Decimal) -> PlyResult<Decimal> {
    Ok(f.poissons_ratio * vf + m.poissons_ratio * (Decimal::ONE - vf))
}

fn axial_shear_modulus(f: &ElasticConstants, m: &ElasticConstants, vf: Decimal) -> PlyResult<Decimal> {
    let (gf, gm) = (f.axial_shear_modulus, m.axial_shear_modulus);
    let vm = Decimal::ONE - vf;
    let two = Decimal::TWO;
    checked_ratio(
        (gf + gm) * gm * vm + two * gf * gm * vf,
        (gf + gm) * vm + two * gm * vf,
        "eff_axial_shear_moduli",
    )
}

fn plane_strain_bulk_modulus(f: &ElasticConstants, m: &ElasticConstants, vf: Decimal) -> PlyResult<Decimal> {
    let (kf, km) = (f.plane_strain_bulk_modulus, m.plane_strain_bulk_modulus);
    let gm = m.transverse_shear_modulus;
    let vm = Decimal::ONE - vf;
    checked_ratio(
        km * (kf + gm) * vm + kf * (km + gm) * vf,
        (kf + gm) * vm + (km + gm) * vf,
        "eff_pstrain_bulk_moduli",
    )
}

fn transverse_shear_modulus(f: &ElasticConstants, m: &ElasticConstants, vf: Decimal) -> PlyResult<Decimal> {
    let (gf, gm) = (f.transverse_shear_modulus, m.transverse_shear_modulus);
    let km = m.plane_strain_bulk_modulus;
    let two = Decimal::TWO;
    let base = km * (gm + gf) + two * gf * gm;
    checked_ratio(
        gm * (base + km * (gf - gm) * vf),
        base - (km + two * gm) * (gf - gm) * vf,
        "eff_transverse_shear_moduli",
    )
}

fn transverse_youngs_modulus(e1: Decimal, v12: Decimal, g23: Decimal, k23: Decimal) -> PlyResult<Decimal> {
    let four = Decimal::from(4);
    let coupling = checked_ratio(four * v12 * v12 * g23 * k23, e1, "eff_transverse_youngs_moduli")?;
    checked_ratio(four * g23 * k23, k23 + g23 + coupling, "eff_transverse_youngs_moduli")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materials::{IsotropicMaterial, TransverselyIsotropicMaterial};
    use rust_decimal_macros::dec;

    fn carbon() -> Constituent {
        TransverselyIsotropicMaterial::new("Carbon", dec!(250), dec!(25), dec!(20), dec!(10), dec!(0.28))
            .unwrap()
            .into()
    }

    fn epoxy() -> Constituent {
        IsotropicMaterial::new("Epoxy", dec!(2.8), dec!(0.3)).unwrap().into()
    }

    fn glass() -> Constituent {
        IsotropicMaterial::new("Eglass", dec!(72), dec!(0.22)).unwrap().into()
    }

    /// Transversely isotropic matrix with G12 != G23
    fn drawn_thermoplastic() -> Constituent {
        TransverselyIsotropicMaterial::new("PEEK_drawn", dec!(4), dec!(3), dec!(1.5), dec!(1), dec!(0.35))
            .unwrap()
            .into()
    }

    fn row(ply: &HalpinTsai, i: usize) -> [Decimal; 6] {
        [
            ply.eff_axial_youngs_moduli()[i],
            ply.eff_major_poissons_ratios()[i],
            ply.eff_axial_shear_moduli()[i],
            ply.eff_pstrain_bulk_moduli()[i],
            ply.eff_transverse_shear_moduli()[i],
            ply.eff_transverse_youngs_moduli()[i],
        ]
    }

    fn carbon_epoxy() -> HalpinTsai {
        HalpinTsai::new(carbon(), epoxy()).unwrap()
    }

    #[test]
    fn test_name() {
        assert_eq!(carbon_epoxy().name(), "Carbon-Epoxy");
        assert_eq!(carbon_epoxy().to_string(), "Carbon-Epoxy (Halpin-Tsai, 101 samples)");
    }

    #[test]
    fn test_sequences_have_grid_length() {
        let ply = carbon_epoxy();
        assert_eq!(ply.fiber_volume_fractions().len(), SAMPLE_COUNT);
        for property in EffectiveProperty::ALL {
            assert_eq!(ply.sequence(property).len(), SAMPLE_COUNT, "{property}");
        }
    }

    #[test]
    fn test_carbon_epoxy_reference_values() {
        let ply = carbon_epoxy();
        assert_eq!(ply.eff_axial_youngs_moduli()[50].to_string(), "126.400");
        assert_eq!(ply.eff_pstrain_bulk_moduli()[100], dec!(17.023));

        assert_eq!(ply.eff_major_poissons_ratios()[50].to_string(), "0.2900");
        assert_eq!(ply.eff_axial_shear_moduli()[50], dec!(2.832));
        assert_eq!(ply.eff_pstrain_bulk_moduli()[50], dec!(5.162));
        assert_eq!(ply.eff_transverse_shear_moduli()[50], dec!(2.295));
        assert_eq!(ply.eff_transverse_youngs_moduli()[50], dec!(6.328));

        assert_eq!(ply.eff_axial_youngs_moduli()[60], dec!(151.120));
        assert_eq!(ply.eff_axial_shear_moduli()[60], dec!(3.592));
        assert_eq!(ply.eff_transverse_shear_moduli()[60], dec!(2.787));
        assert_eq!(ply.eff_transverse_youngs_moduli()[60], dec!(7.621));
    }

    #[test]
    fn test_boundary_samples_match_constituents() {
        let ply = carbon_epoxy();
        let f = carbon().elastic_constants();
        let m = epoxy().elastic_constants();

        assert_eq!(ply.eff_axial_youngs_moduli()[0], m.axial_modulus);
        assert_eq!(ply.eff_axial_youngs_moduli()[100], f.axial_modulus);
        assert_eq!(ply.eff_major_poissons_ratios()[0], m.poissons_ratio);
        assert_eq!(ply.eff_major_poissons_ratios()[100], f.poissons_ratio);
        assert_eq!(ply.eff_axial_shear_moduli()[0], m.axial_shear_modulus);
        assert_eq!(ply.eff_axial_shear_moduli()[100], f.axial_shear_modulus);
        assert_eq!(ply.eff_pstrain_bulk_moduli()[0], m.plane_strain_bulk_modulus);
        assert_eq!(ply.eff_pstrain_bulk_moduli()[100], f.plane_strain_bulk_modulus);
        assert_eq!(ply.eff_transverse_shear_moduli()[0], m.transverse_shear_modulus);
        assert_eq!(ply.eff_transverse_shear_moduli()[100], f.transverse_shear_modulus);
        assert_eq!(ply.eff_transverse_youngs_moduli()[0], m.transverse_modulus);
        assert_eq!(ply.eff_transverse_youngs_moduli()[100], f.transverse_modulus);
    }

    #[test]
    fn test_scales() {
        let ply = carbon_epoxy();
        assert!(ply.eff_major_poissons_ratios().iter().all(|v| v.scale() == 4));
        assert!(ply.eff_transverse_youngs_moduli().iter().all(|v| v.scale() == 3));
        assert!(ply.eff_axial_shear_moduli().iter().all(|v| v.scale() == 3));
    }

    #[test]
    fn test_isotropic_pair() {
        let ply = HalpinTsai::new(glass(), epoxy()).unwrap();
        assert_eq!(ply.name(), "Eglass-Epoxy");
        assert_eq!(ply.eff_axial_youngs_moduli()[50], dec!(37.400));
        assert_eq!(ply.eff_major_poissons_ratios()[50], dec!(0.2600));
        assert_eq!(ply.eff_axial_shear_moduli()[50], dec!(2.948));
        assert_eq!(ply.eff_pstrain_bulk_moduli()[50], dec!(5.967));
        assert_eq!(ply.eff_transverse_shear_moduli()[50], dec!(2.576));
        assert_eq!(ply.eff_transverse_youngs_moduli()[50], dec!(7.105));
        assert_eq!(ply.eff_transverse_youngs_moduli()[100], dec!(72));
    }

    #[test]
    fn test_transtropic_matrix_uses_shear_moduli_by_role() {
        let matrix = drawn_thermoplastic();
        let m = matrix.elastic_constants();
        // 1 * 3 / (4 - 3 - 4 * 0.1225 * 3 / 4) = 4.7430...
        assert_eq!(m.plane_strain_bulk_modulus, dec!(4.743));

        let ply = HalpinTsai::new(carbon(), matrix).unwrap();
        // E1, v12, G12 (matrix G12 = 1.5), K23 and G23 (matrix G23 = 1.0), E2
        assert_eq!(
            row(&ply, 0),
            [dec!(4.000), dec!(0.3500), dec!(1.500), dec!(4.743), dec!(1.000), dec!(3.000)]
        );
        assert_eq!(
            row(&ply, 50),
            [dec!(127.000), dec!(0.3150), dec!(3.765), dec!(7.710), dec!(2.236), dec!(6.896)]
        );
        assert_eq!(
            row(&ply, 100),
            [dec!(250.000), dec!(0.2800), dec!(20.000), dec!(17.023), dec!(10.000), dec!(25.000)]
        );
    }

    #[test]
    fn test_isotropic_fiber_in_transtropic_matrix() {
        let ply = HalpinTsai::new(glass(), drawn_thermoplastic()).unwrap();
        assert_eq!(ply.name(), "Eglass-PEEK_drawn");
        assert_eq!(
            row(&ply, 0),
            [dec!(4.000), dec!(0.3500), dec!(1.500), dec!(4.743), dec!(1.000), dec!(3.000)]
        );
        assert_eq!(
            row(&ply, 50),
            [dec!(38.000), dec!(0.2850), dec!(3.971), dec!(9.376), dec!(2.522), dec!(7.817)]
        );
        // Eglass: G = 72 / 2.44, K = 72 / (2.44 * 0.56)
        assert_eq!(
            row(&ply, 100),
            [dec!(72.000), dec!(0.2200), dec!(29.508), dec!(52.693), dec!(29.508), dec!(72.000)]
        );
    }

    #[test]
    fn test_monotone_in_fraction_for_stiff_fiber() {
        let ply = carbon_epoxy();
        for property in [
            EffectiveProperty::AxialYoungsModulus,
            EffectiveProperty::AxialShearModulus,
            EffectiveProperty::TransverseShearModulus,
            EffectiveProperty::PlaneStrainBulkModulus,
        ] {
            assert!(ply.sequence(property).windows(2).all(|w| w[0] <= w[1]), "{property}");
        }
    }

    #[test]
    fn test_constituents_are_shared() {
        let fiber = Arc::new(carbon());
        let a = HalpinTsai::new(Arc::clone(&fiber), epoxy()).unwrap();
        let b = HalpinTsai::new(Arc::clone(&fiber), glass()).unwrap();
        assert!(Arc::ptr_eq(a.fiber(), b.fiber()));
        drop(a);
        drop(b);
        assert_eq!(Arc::strong_count(&fiber), 1);
        assert_eq!(fiber.name(), "Carbon");
    }

    #[test]
    fn test_range_query() {
        let pairs = carbon_epoxy().e1_eff(FractionQuery::Range(0.5, 0.6)).unwrap();
        assert_eq!(pairs.len(), 11);
        assert_eq!(pairs[0], (dec!(0.50), dec!(126.400)));
        assert_eq!(pairs[10], (dec!(0.60), dec!(151.120)));
        assert!(pairs.windows(2).all(|w| w[0].0 < w[1].0));
    }

    #[test]
    fn test_point_and_full_queries() {
        let ply = carbon_epoxy();
        assert_eq!(ply.k23_eff(FractionQuery::At(1.0)).unwrap(), vec![(dec!(1), dec!(17.023))]);
        assert_eq!(ply.v12_eff(FractionQuery::At(0.1 + 0.2)).unwrap(), vec![(dec!(0.3), dec!(0.2940))]);
        assert_eq!(ply.g12_eff(FractionQuery::All).unwrap().len(), SAMPLE_COUNT);
        assert_eq!(ply.g23_eff(FractionQuery::Range(0.3, 0.3)).unwrap(), vec![(dec!(0.3), dec!(1.643))]);
        assert_eq!(ply.e2_eff(FractionQuery::At(0.3)).unwrap()[0].1, dec!(4.588));
    }

    #[test]
    fn test_query_errors() {
        let ply = carbon_epoxy();
        for query in [
            FractionQuery::At(-0.1),
            FractionQuery::At(1.5),
            FractionQuery::At(f64::NAN),
            FractionQuery::Range(0.6, 0.5),
            FractionQuery::Range(0.5, 1.2),
            FractionQuery::Range(-1.0, 0.5),
        ] {
            let err = ply.e1_eff(query).unwrap_err();
            assert_eq!(err.error_code(), "INVALID_ARGUMENT", "{query:?}");
        }
    }

    #[test]
    fn test_sweep_rows_and_report() {
        let ply = carbon_epoxy();
        let rows = ply.sweep(FractionQuery::Range(0.0, 0.1)).unwrap();
        assert_eq!(rows.len(), 11);
        assert_eq!(rows[0].get(EffectiveProperty::AxialYoungsModulus), dec!(2.8));

        let report = ply.report(FractionQuery::At(0.5)).unwrap();
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"axial_youngs_modulus\":\"126.400\""));
        let back: CompositeReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back, report);
    }

    #[test]
    fn test_estimator_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<HalpinTsai>();
        assert_send_sync::<Constituent>();
    }
}
