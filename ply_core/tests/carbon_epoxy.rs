//! End-to-end checks through the public API.

use std::sync::Arc;
use std::thread;

use ply_core::composite::{fiber_volume_fractions, SAMPLE_COUNT};
use ply_core::{
    Constituent, EffectiveProperty, FractionQuery, HalpinTsai, IsotropicMaterial, PlyError,
    TransverselyIsotropicMaterial, VolumeFractionIndex,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn carbon() -> Constituent {
    TransverselyIsotropicMaterial::new("Carbon", dec!(250), dec!(25), dec!(20), dec!(10), dec!(0.28))
        .unwrap()
        .into()
}

fn epoxy() -> Constituent {
    IsotropicMaterial::new("Epoxy", dec!(2.8), dec!(0.3)).unwrap().into()
}

#[test]
fn carbon_epoxy_scenario() {
    let ply = HalpinTsai::new(carbon(), epoxy()).unwrap();
    assert_eq!(ply.name(), "Carbon-Epoxy");
    assert_eq!(ply.eff_axial_youngs_moduli()[50], dec!(126.400));
    assert_eq!(ply.eff_pstrain_bulk_moduli()[100], dec!(17.023));

    let pairs = ply.e1_eff(FractionQuery::Range(0.5, 0.6)).unwrap();
    assert_eq!(pairs.len(), 11);
    assert_eq!(pairs.first().unwrap().0, dec!(0.50));
    assert_eq!(pairs.last().unwrap().0, dec!(0.60));
    assert!(pairs.windows(2).all(|w| w[0].0 < w[1].0 && w[0].1 < w[1].1));
}

#[test]
fn fiberglass_derived_moduli() {
    let glass = IsotropicMaterial::new("Fiberglass", dec!(120), dec!(0.29)).unwrap();
    assert_eq!(glass.shear_modulus(), dec!(46.512));
    assert_eq!(
        glass.plane_strain_bulk_modulus(),
        (dec!(120) / (dec!(2) * dec!(1.29) * dec!(0.42))).round_dp(3)
    );
}

#[test]
fn grid_contract_for_reporting() {
    let grid = fiber_volume_fractions();
    assert_eq!(grid.len(), SAMPLE_COUNT);
    for (i, vf) in grid.iter().enumerate() {
        assert_eq!(*vf, Decimal::new(i as i64, 2));
        assert_eq!(VolumeFractionIndex::resolve_decimal(*vf).unwrap(), i);
    }
}

#[test]
fn invalid_constituents() {
    for (name, e, v) in [("Bad Name!", dec!(50), dec!(0.25)), ("X", dec!(-10), dec!(0.25)), ("X", dec!(10), dec!(0.6))] {
        assert!(matches!(
            IsotropicMaterial::new(name, e, v),
            Err(PlyError::InvalidArgument { .. })
        ));
    }
}

#[test]
fn every_property_queryable_by_symbol() {
    let ply = HalpinTsai::new(carbon(), epoxy()).unwrap();
    for symbol in ["E1", "E2", "G12", "G23", "v12", "K23"] {
        let property = EffectiveProperty::from_symbol(symbol).unwrap();
        let full = ply.effective(property, FractionQuery::All).unwrap();
        assert_eq!(full.len(), SAMPLE_COUNT, "{symbol}");
        assert_eq!(full[70].1, ply.sequence(property)[70]);
    }
}

#[test]
fn estimators_share_constituents_across_threads() {
    let fiber = Arc::new(carbon());
    let matrix = Arc::new(epoxy());

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let fiber = Arc::clone(&fiber);
            let matrix = Arc::clone(&matrix);
            thread::spawn(move || {
                let ply = HalpinTsai::new(fiber, matrix).unwrap();
                ply.eff_transverse_youngs_moduli()[50]
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), dec!(6.328));
    }
    assert_eq!(Arc::strong_count(&fiber), 1);
}

#[test]
fn transtropic_matrix_boundaries() {
    let matrix: Constituent = TransverselyIsotropicMaterial::parse("PEEK_drawn", "4", "3", "1.5", "1", "0.35")
        .unwrap()
        .into();
    let glass: Constituent = IsotropicMaterial::parse("Eglass", "72", "0.22").unwrap().into();
    let m = matrix.elastic_constants();
    let matrix = Arc::new(matrix);

    for fiber in [carbon(), glass] {
        let f = fiber.elastic_constants();
        let ply = HalpinTsai::new(fiber, Arc::clone(&matrix)).unwrap();
        let ends = ply.sweep(FractionQuery::Range(0.0, 1.0)).unwrap();
        let (first, last) = (ends.first().unwrap(), ends.last().unwrap());

        assert_eq!(first.axial_shear_modulus, m.axial_shear_modulus, "{}", ply.name());
        assert_eq!(first.transverse_shear_modulus, m.transverse_shear_modulus, "{}", ply.name());
        assert_ne!(first.axial_shear_modulus, first.transverse_shear_modulus);
        assert_eq!(first.plane_strain_bulk_modulus, m.plane_strain_bulk_modulus);
        assert_eq!(first.transverse_youngs_modulus, m.transverse_modulus);

        assert_eq!(last.axial_youngs_modulus, f.axial_modulus, "{}", ply.name());
        assert_eq!(last.axial_shear_modulus, f.axial_shear_modulus);
        assert_eq!(last.transverse_shear_modulus, f.transverse_shear_modulus);
        assert_eq!(last.plane_strain_bulk_modulus, f.plane_strain_bulk_modulus);
        assert_eq!(last.transverse_youngs_modulus, f.transverse_modulus);
    }
}
