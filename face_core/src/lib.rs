//! # face_core - TBM Face Support Pressure Engine
//!
//! `face_core` computes the support pressure needed to keep the face of a
//! slurry or earth-pressure-balance tunnel boring machine stable. The
//! analysis combines a sliding wedge limit-equilibrium model, Janssen silo
//! theory for the overburden and hydrostatic water pressure, and reports
//! minimum and operational pressures for three lowering scenarios together
//! with blow-out and water ingress checks.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Pure functions over an explicit soil profile snapshot
//! - **JSON-First**: All inputs and results implement Serialize/Deserialize
//! - **Rich Errors**: Structured error types, raised only at input boundaries
//!
//! ## Quick Start
//!
//! ```rust
//! use face_core::calculations::{calculate, FaceSupportInput};
//! use face_core::soil::{SoilLayer, SoilProfile};
//!
//! let profile = SoilProfile::new(vec![
//!     SoilLayer::new("Fill", 3.0, 18.0, 8.0, 27.5, 0.0),
//!     SoilLayer::new("Sand", 40.0, 19.0, 10.0, 32.5, 0.0),
//! ])
//! .unwrap();
//!
//! let mut input = FaceSupportInput::new("km 0+850", 9.5, 12.0, 2.0);
//! input.silo.enabled = true;
//!
//! let result = calculate(&input, &profile).unwrap();
//! println!("min crown pressure: {:.1} kPa", result.no_lowering.profile.min_crown_kpa);
//! ```
//!
//! ## Modules
//!
//! - [`soil`] - Layered soil profile, property averaging, vertical stress
//! - [`calculations`] - Silo, wedge, forces, pressure scenarios and checks
//! - [`project`] - Project container with cross sections
//! - [`file_io`] - File operations with atomic saves and locking
//! - [`units`] - Type-safe unit wrappers
//! - [`errors`] - Structured error types

pub mod calculations;
pub mod errors;
pub mod file_io;
pub mod project;
pub mod soil;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use errors::{CalcError, CalcResult};
pub use file_io::{load_project, save_project, FileLock};
pub use project::{CrossSection, GlobalSettings, Project, ProjectMetadata};
pub use soil::{PropertyBound, SoilLayer, SoilProfile};
