//! # Material Library
//!
//! The `MaterialLibrary` is the root container persisted to `.plib` files as
//! human-readable JSON: named constituents, saved fiber/matrix pairings and a
//! few reporting settings.
//!
//! ## Structure
//!
//! ```text
//! MaterialLibrary
//! ├── meta: LibraryMetadata (schema version, author, title, timestamps)
//! ├── settings: LibrarySettings (default pairing, report fractions)
//! ├── materials: HashMap<Uuid, Constituent>
//! └── composites: HashMap<Uuid, CompositeDefinition>
//! ```
//!
//! Materials deserialize through their validating constructors, so a file
//! with a tampered derived modulus fails to load.
//!
//! ## Example
//!
//! ```rust
//! use ply_core::library::MaterialLibrary;
//! use ply_core::materials::{IsotropicMaterial, TransverselyIsotropicMaterial};
//!
//! let mut library = MaterialLibrary::new("A. Analyst", "Aerospace prepregs");
//! library.add_material(TransverselyIsotropicMaterial::parse("Carbon", "250", "25", "20", "10", "0.28")?.into())?;
//! library.add_material(IsotropicMaterial::parse("Epoxy", "2.8", "0.3")?.into())?;
//! library.add_composite("Carbon", "Epoxy")?;
//!
//! let ply = library.estimator("Carbon-Epoxy")?;
//! assert_eq!(ply.eff_pstrain_bulk_moduli()[100].to_string(), "17.023");
//! # Ok::<(), ply_core::errors::PlyError>(())
//! ```

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::composite::HalpinTsai;
use crate::errors::{PlyError, PlyResult};
use crate::materials::Constituent;

/// Current schema version for .plib files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Root library container.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterialLibrary {
    /// Library metadata (version, author, title)
    pub meta: LibraryMetadata,

    /// Reporting settings and default pairing
    #[serde(default)]
    pub settings: LibrarySettings,

    /// Constituents, keyed by UUID. Names are unique across the library.
    pub materials: HashMap<Uuid, Constituent>,

    /// Saved fiber/matrix pairings, keyed by UUID
    #[serde(default)]
    pub composites: HashMap<Uuid, CompositeDefinition>,
}

impl MaterialLibrary {
    /// Create a new empty library.
    pub fn new(author: impl Into<String>, title: impl Into<String>) -> Self {
        let now = Utc::now();
        MaterialLibrary {
            meta: LibraryMetadata {
                version: SCHEMA_VERSION.to_string(),
                author: author.into(),
                title: title.into(),
                created: now,
                modified: now,
            },
            settings: LibrarySettings::default(),
            materials: HashMap::new(),
            composites: HashMap::new(),
        }
    }

    /// Add a constituent. Returns the UUID assigned to it.
    ///
    /// Fails with `InvalidArgument` if a material with the same name exists.
    pub fn add_material(&mut self, material: Constituent) -> PlyResult<Uuid> {
        if self.material(material.name()).is_some() {
            return Err(PlyError::invalid_argument(
                "name",
                material.name(),
                "A material with this name is already in the library",
            ));
        }
        let id = Uuid::new_v4();
        self.materials.insert(id, material);
        self.touch();
        Ok(id)
    }

    /// Remove a constituent by UUID.
    ///
    /// Composite definitions referring to it are removed as well.
    pub fn remove_material(&mut self, id: &Uuid) -> Option<Constituent> {
        let removed = self.materials.remove(id)?;
        self.composites
            .retain(|_, c| c.fiber != removed.name() && c.matrix != removed.name());
        self.touch();
        Some(removed)
    }

    /// Look up a constituent by name.
    pub fn material(&self, name: &str) -> Option<&Constituent> {
        self.materials.values().find(|m| m.name() == name)
    }

    /// Material names, sorted
    pub fn material_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.materials.values().map(Constituent::name).collect();
        names.sort_unstable();
        names
    }

    /// Save a fiber/matrix pairing. Both materials must already exist.
    pub fn add_composite(&mut self, fiber: &str, matrix: &str) -> PlyResult<Uuid> {
        for name in [fiber, matrix] {
            if self.material(name).is_none() {
                return Err(PlyError::not_found(name));
            }
        }
        let definition = CompositeDefinition {
            fiber: fiber.to_string(),
            matrix: matrix.to_string(),
        };
        if self.composite(fiber, matrix).is_some() {
            return Err(PlyError::invalid_argument(
                "composite",
                definition.name(),
                "This pairing is already in the library",
            ));
        }
        let id = Uuid::new_v4();
        self.composites.insert(id, definition);
        self.touch();
        Ok(id)
    }

    /// Look up a saved pairing by its constituents.
    pub fn composite(&self, fiber: &str, matrix: &str) -> Option<&CompositeDefinition> {
        self.composites
            .values()
            .find(|c| c.fiber == fiber && c.matrix == matrix)
    }

    /// Build the estimator for a saved pairing named `"<fiber>-<matrix>"`.
    ///
    /// Names may contain `-`, so ("A-B", "C") and ("A", "B-C") both read
    /// "A-B-C". Such a name is `InvalidArgument`; use [`Self::estimator_for`].
    pub fn estimator(&self, name: &str) -> PlyResult<HalpinTsai> {
        let mut matches = self.composites.values().filter(|c| c.name() == name);
        let definition = matches.next().ok_or_else(|| PlyError::not_found(name))?;
        if matches.next().is_some() {
            return Err(PlyError::invalid_argument(
                "composite",
                name,
                "Name matches more than one fiber/matrix pairing",
            ));
        }
        self.estimator_for(&definition.fiber, &definition.matrix)
    }

    /// Build an estimator for any two library materials.
    pub fn estimator_for(&self, fiber: &str, matrix: &str) -> PlyResult<HalpinTsai> {
        let fiber = self.material(fiber).ok_or_else(|| PlyError::not_found(fiber))?;
        let matrix = self.material(matrix).ok_or_else(|| PlyError::not_found(matrix))?;
        HalpinTsai::new(Arc::new(fiber.clone()), Arc::new(matrix.clone()))
    }

    /// Check cross-references that serde alone cannot.
    ///
    /// Duplicate material names, repeated pairings, dangling composite
    /// references and report fractions outside `[0, 1]` are `InvalidFormat`.
    pub fn validate(&self) -> PlyResult<()> {
        let mut seen = HashSet::new();
        for material in self.materials.values() {
            if !seen.insert(material.name()) {
                return Err(PlyError::invalid_format(
                    "material library",
                    format!("Duplicate material name '{}'", material.name()),
                ));
            }
        }
        let mut pairs = HashSet::new();
        for composite in self.composites.values() {
            if !pairs.insert((composite.fiber.as_str(), composite.matrix.as_str())) {
                return Err(PlyError::invalid_format(
                    "material library",
                    format!("Pairing '{}' is saved twice", composite.name()),
                ));
            }
            for name in [&composite.fiber, &composite.matrix] {
                if !seen.contains(name.as_str()) {
                    return Err(PlyError::invalid_format(
                        "material library",
                        format!("Composite '{}' refers to unknown material '{}'", composite.name(), name),
                    ));
                }
            }
        }
        if let Some(bad) = self
            .settings
            .report_fractions
            .iter()
            .find(|vf| !(0.0..=1.0).contains(*vf))
        {
            return Err(PlyError::invalid_format(
                "material library",
                format!("Report fraction {} is outside [0, 1]", bad),
            ));
        }
        Ok(())
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }

    pub fn material_count(&self) -> usize {
        self.materials.len()
    }
}

impl Default for MaterialLibrary {
    fn default() -> Self {
        MaterialLibrary::new("", "")
    }
}

/// Library metadata stored in the file header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryMetadata {
    /// Schema version (for migration compatibility)
    pub version: String,

    /// Who maintains the library
    pub author: String,

    /// Free-form title
    pub title: String,

    /// When the library was created
    pub created: DateTime<Utc>,

    /// When the library was last modified
    pub modified: DateTime<Utc>,
}

/// Reporting defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LibrarySettings {
    /// Fiber used when none is named
    pub default_fiber: Option<String>,

    /// Matrix used when none is named
    pub default_matrix: Option<String>,

    /// Fiber volume fractions printed in summary tables
    pub report_fractions: Vec<f64>,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        LibrarySettings {
            default_fiber: None,
            default_matrix: None,
            report_fractions: (0..=10).map(|i| f64::from(i) / 10.0).collect(),
        }
    }
}

/// A saved fiber/matrix pairing, referenced by material name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompositeDefinition {
    pub fiber: String,
    pub matrix: String,
}

impl CompositeDefinition {
    /// `"<fiber>-<matrix>"`, the same name the estimator reports
    pub fn name(&self) -> String {
        format!("{}-{}", self.fiber, self.matrix)
    }
}
