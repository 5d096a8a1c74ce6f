//! # Face Support Calculations
//!
//! Building blocks of the face support pressure analysis, leaf-first:
//!
//! - [`silo`] - Janssen silo reduction of the crown stress
//! - [`wedge`] - Sliding wedge equilibrium and critical angle search
//! - [`forces`] - Earth and water forces on the circular face
//! - [`pressure`] - Support pressure distributions per lowering scenario
//! - [`safety`] - Blow-out and water ingress checks
//! - [`face_support`] - Complete analysis of one cross section
//!
//! The complete analysis follows the crate-wide pattern:
//!
//! - [`FaceSupportInput`] - Input parameters (JSON-serializable)
//! - [`FaceSupportResult`] - Calculation results (JSON-serializable)
//! - [`calculate`] - Pure calculation function
//!
//! Everything below [`face_support`] is infallible: degenerate geometry
//! resolves to zero or fallback values instead of errors.

pub mod face_support;
pub mod forces;
pub mod pressure;
pub mod safety;
pub mod silo;
pub mod wedge;

// Re-export commonly used types
pub use face_support::{
    calculate, FaceSupportInput, FaceSupportResult, PartialLowering, ScenarioResult, SiloOptions,
};
pub use forces::FaceForces;
pub use pressure::{GoverningConstraint, LoweringScenario, PressureProfile, PressureSample};
pub use safety::{BlowoutCheck, IngressCheck};
pub use silo::SiloResult;
pub use wedge::{CriticalWedge, K2Model, VerticalStressModel, WedgeComponents};
