//! # Project Data Structures
//!
//! The `Project` struct is the root container for a tunnel drive's cross
//! sections. Projects serialize to `.tbm` files as human-readable JSON.
//!
//! ## Structure
//!
//! ```text
//! Project
//! ├── meta: ProjectMetadata (version, engineer, job info, timestamps)
//! ├── settings: GlobalSettings (guideline, display unit)
//! └── sections: HashMap<Uuid, CrossSection> (input + soil profile each)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use face_core::calculations::FaceSupportInput;
//! use face_core::project::{CrossSection, Project};
//! use face_core::soil::{SoilLayer, SoilProfile};
//!
//! let mut project = Project::new("Jane Engineer", "T-042", "Metro Line 4");
//! let sand = SoilLayer::new("Sand", 100.0, 19.0, 9.0, 30.0, 5.0);
//! let profile = SoilProfile::homogeneous(sand).unwrap();
//! let input = FaceSupportInput::new("km 1+200", 10.0, 15.0, 5.0);
//! project.add_section(CrossSection::new(input, profile));
//!
//! let (_, section) = project.find_section("km 1+200").unwrap();
//! let result = section.analyze().unwrap();
//! assert!(result.forces.s_ci_kn > 0.0);
//! ```

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculations::{calculate, FaceSupportInput, FaceSupportResult};
use crate::errors::{CalcError, CalcResult};
use crate::soil::SoilProfile;
use crate::units::{Bar, KiloPascals};

/// Current schema version for .tbm files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// One analyzed tunnel cross section: geometry and loads plus the ground.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossSection {
    pub input: FaceSupportInput,
    pub profile: SoilProfile,
}

impl CrossSection {
    pub fn new(input: FaceSupportInput, profile: SoilProfile) -> Self {
        CrossSection { input, profile }
    }

    pub fn label(&self) -> &str {
        &self.input.label
    }

    /// Run the face support analysis for this section.
    pub fn analyze(&self) -> CalcResult<FaceSupportResult> {
        calculate(&self.input, &self.profile)
    }
}

/// Root project container.
///
/// This is the top-level struct that gets serialized to `.tbm` files.
/// Sections are stored in a flat UUID-keyed map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    /// Project metadata (version, engineer, job info)
    pub meta: ProjectMetadata,

    #[serde(default)]
    pub settings: GlobalSettings,

    /// All cross sections, keyed by UUID
    #[serde(default)]
    pub sections: HashMap<Uuid, CrossSection>,
}

impl Project {
    /// Create a new empty project.
    ///
    /// # Arguments
    ///
    /// * `engineer` - Name of the responsible engineer
    /// * `job_id` - Job/project number (e.g., "T-042")
    /// * `tunnel` - Name of the tunnel or drive
    pub fn new(
        engineer: impl Into<String>,
        job_id: impl Into<String>,
        tunnel: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Project {
            meta: ProjectMetadata {
                version: SCHEMA_VERSION.to_string(),
                engineer: engineer.into(),
                job_id: job_id.into(),
                tunnel: tunnel.into(),
                created: now,
                modified: now,
            },
            settings: GlobalSettings::default(),
            sections: HashMap::new(),
        }
    }

    /// Add a cross section to the project.
    ///
    /// Returns the UUID assigned to the section.
    pub fn add_section(&mut self, section: CrossSection) -> Uuid {
        let id = Uuid::new_v4();
        self.sections.insert(id, section);
        self.touch();
        id
    }

    /// Remove a cross section by UUID.
    pub fn remove_section(&mut self, id: &Uuid) -> Option<CrossSection> {
        let section = self.sections.remove(id);
        if section.is_some() {
            self.touch();
        }
        section
    }

    pub fn get_section(&self, id: &Uuid) -> Option<&CrossSection> {
        self.sections.get(id)
    }

    /// Get a mutable reference to a cross section; marks the project modified.
    pub fn get_section_mut(&mut self, id: &Uuid) -> Option<&mut CrossSection> {
        if self.sections.contains_key(id) {
            self.meta.modified = Utc::now();
            self.sections.get_mut(id)
        } else {
            None
        }
    }

    /// Look up a cross section by its label.
    ///
    /// # Errors
    ///
    /// `CalcError::SectionNotFound` if no section carries the label.
    pub fn find_section(&self, label: &str) -> CalcResult<(Uuid, &CrossSection)> {
        self.sections
            .iter()
            .find(|(_, section)| section.label() == label)
            .map(|(id, section)| (*id, section))
            .ok_or_else(|| CalcError::section_not_found(label))
    }

    /// Sections ordered by label, for stable output.
    pub fn sections_by_label(&self) -> Vec<(Uuid, &CrossSection)> {
        let mut sections: Vec<_> = self.sections.iter().map(|(id, s)| (*id, s)).collect();
        sections.sort_by(|a, b| a.1.label().cmp(b.1.label()));
        sections
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }

    pub fn section_count(&self) -> usize {
        self.sections.len()
    }
}

impl Default for Project {
    fn default() -> Self {
        Project::new("", "", "")
    }
}

/// Project metadata stored in the file header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectMetadata {
    /// Schema version (for migration compatibility)
    pub version: String,

    /// Name of the responsible engineer
    pub engineer: String,

    /// Job/project number
    pub job_id: String,

    /// Tunnel or drive name
    pub tunnel: String,

    pub created: DateTime<Utc>,

    pub modified: DateTime<Utc>,
}

/// Global project settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalSettings {
    /// Design guideline the analysis follows
    pub guideline: String,

    /// Unit used when reporting pressures
    pub pressure_unit: PressureUnit,
}

impl Default for GlobalSettings {
    fn default() -> Self {
        GlobalSettings {
            guideline: "DAUB 2016".to_string(),
            pressure_unit: PressureUnit::default(),
        }
    }
}

/// Display unit for support pressures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PressureUnit {
    #[default]
    KiloPascal,
    Bar,
}

impl PressureUnit {
    /// Format a pressure given in kPa in this unit
    pub fn format(&self, kpa: f64) -> String {
        match self {
            PressureUnit::KiloPascal => format!("{:.1} kPa", kpa),
            PressureUnit::Bar => format!("{:.2} bar", Bar::from(KiloPascals(kpa)).value()),
        }
    }
}
