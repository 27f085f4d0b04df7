//! # ply_core - Unidirectional Ply Micromechanics
//!
//! `ply_core` predicts the homogenized elastic properties of a unidirectional
//! fiber-reinforced ply from the constants of its fiber and matrix, using the
//! Halpin-Tsai closure swept over fiber volume fraction.
//!
//! ## Design Philosophy
//!
//! - **Validated on write**: materials reject bad constants at construction
//!   and on every mutation; derived moduli can only be read
//! - **Exact decimals**: all constants are fixed-point, 3 decimals for moduli
//!   and 4 for the effective Poisson ratio
//! - **Eager and immutable**: an estimator computes all 606 samples up front
//! - **JSON-First**: materials, reports and errors implement Serialize/Deserialize
//!
//! ## Quick Start
//!
//! ```rust
//! use ply_core::composite::{FractionQuery, HalpinTsai};
//! use ply_core::materials::{Constituent, IsotropicMaterial, TransverselyIsotropicMaterial};
//!
//! let carbon = TransverselyIsotropicMaterial::parse("Carbon", "250", "25", "20", "10", "0.28")?;
//! let epoxy = IsotropicMaterial::parse("Epoxy", "2.8", "0.3")?;
//! let ply = HalpinTsai::new(Constituent::from(carbon), Constituent::from(epoxy))?;
//!
//! for (vf, e1) in ply.e1_eff(FractionQuery::Range(0.5, 0.6))? {
//!     println!("Vf = {vf:.2}  E1 = {e1}");
//! }
//! # Ok::<(), ply_core::errors::PlyError>(())
//! ```
//!
//! ## Modules
//!
//! - [`materials`] - Isotropic and transversely isotropic constituents
//! - [`composite`] - Halpin-Tsai estimator and the fraction grid
//! - [`validation`] - Input predicates shared by all materials
//! - [`precision`] - Decimal quantization rules
//! - [`library`] - Persistable collection of materials and pairings
//! - [`file_io`] - Library files with atomic saves and locking
//! - [`errors`] - Structured error types
//!
//! ## Concurrency
//!
//! Materials are plain values mutated through `&mut`. Once wrapped in an
//! `Arc` and handed to [`HalpinTsai`](composite::HalpinTsai) they are frozen,
//! and estimators may be shared across threads.

pub mod composite;
pub mod errors;
pub mod file_io;
pub mod library;
pub mod materials;
pub mod precision;
pub mod validation;

// Re-export commonly used types at crate root for convenience
pub use composite::{EffectiveProperty, FractionQuery, HalpinTsai, VolumeFractionIndex};
pub use errors::{PlyError, PlyResult};
pub use file_io::{load_library, save_library, FileLock, LockHolder};
pub use library::MaterialLibrary;
pub use materials::{Constituent, IsotropicMaterial, TransverselyIsotropicMaterial};
