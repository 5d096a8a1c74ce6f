//! # Support Pressure Distributions
//!
//! Minimum and operational support pressure over the face height for the
//! three face support configurations:
//!
//! - [`pressure_profile_no_lowering`] - face fully filled with slurry
//! - [`pressure_profile_full_lowering`] - slurry fully lowered, compressed air
//! - [`pressure_profile_partial_lowering`] - slurry in the lower part, air above
//!
//! Each scenario takes the largest of its candidate crown pressures
//! (stability and water ingress) and adds the pressure deviation ΔP for the
//! operational value. Which candidate governs is reported for display only.

use serde::{Deserialize, Serialize};

use super::forces::FaceForces;
use crate::units::water_pressure_kpa;

/// Number of depth intervals between crown and invert (51 samples).
pub const PROFILE_INTERVALS: usize = 50;

/// Tolerance for reporting which candidate governs (kN/m²).
const GOVERNING_TOLERANCE: f64 = 0.01;

/// Face support configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoweringScenario {
    /// Face completely filled with slurry
    NoLowering,
    /// Slurry lowered to the invert, air supports the whole face
    FullLowering,
    /// Slurry in the lower part of the face, air cushion above
    PartialLowering,
}

impl LoweringScenario {
    pub fn display_name(&self) -> &'static str {
        match self {
            LoweringScenario::NoLowering => "No lowering (slurry)",
            LoweringScenario::FullLowering => "Full lowering (air)",
            LoweringScenario::PartialLowering => "Partial lowering (slurry + air)",
        }
    }
}

/// Constraint that set the minimum crown pressure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GoverningConstraint {
    /// Overall face stability (S_ci)
    Stability,
    /// Water ingress at the crown
    WaterIngressCrown,
    /// Water ingress at the invert
    WaterIngressInvert,
    /// No pressure required; clamped at zero
    NonNegative,
}

impl GoverningConstraint {
    pub fn description(&self) -> &'static str {
        match self {
            GoverningConstraint::Stability => "overall stability (S_ci)",
            GoverningConstraint::WaterIngressCrown => "water ingress at crown",
            GoverningConstraint::WaterIngressInvert => "water ingress at invert",
            GoverningConstraint::NonNegative => "minimum non-negative pressure",
        }
    }
}

/// One candidate minimum crown pressure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PressureCandidate {
    pub constraint: GoverningConstraint,
    pub pressure_kpa: f64,
}

/// Pressures at one depth of the face (kN/m²).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PressureSample {
    pub depth_m: f64,
    /// Unfactored pore water pressure
    pub water_kpa: f64,
    /// Mean earth pressure E_ci / A
    pub earth_kpa: f64,
    /// Minimum support pressure
    pub support_min_kpa: f64,
    /// Operational support pressure (minimum + ΔP)
    pub support_operational_kpa: f64,
}

/// Support pressure distribution of one scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PressureProfile {
    pub scenario: LoweringScenario,

    /// Samples from crown to invert
    pub samples: Vec<PressureSample>,

    /// Minimum support pressure at the crown (kN/m²)
    pub min_crown_kpa: f64,

    /// Operational support pressure at the crown (kN/m²)
    pub operational_crown_kpa: f64,

    /// Candidates considered, in reporting priority order
    pub candidates: Vec<PressureCandidate>,

    /// Candidate that set the minimum
    pub governing: GoverningConstraint,
}

impl PressureProfile {
    /// Candidate pressure for a constraint, if this scenario considers it.
    pub fn candidate(&self, constraint: GoverningConstraint) -> Option<f64> {
        self.candidates
            .iter()
            .find(|c| c.constraint == constraint)
            .map(|c| c.pressure_kpa)
    }

    /// Sample at the crown
    pub fn crown(&self) -> Option<&PressureSample> {
        self.samples.first()
    }

    /// Sample at the invert
    pub fn invert(&self) -> Option<&PressureSample> {
        self.samples.last()
    }
}

/// Largest candidate and the first candidate (in order) within tolerance of it.
///
/// The maximum is computed independently of the reporting order.
fn select_governing(
    candidates: &[PressureCandidate],
    fallback: GoverningConstraint,
) -> (f64, GoverningConstraint) {
    let max = candidates
        .iter()
        .map(|c| c.pressure_kpa)
        .fold(f64::NEG_INFINITY, f64::max);
    let governing = candidates
        .iter()
        .find(|c| (max - c.pressure_kpa).abs() < GOVERNING_TOLERANCE)
        .map_or(fallback, |c| c.constraint);
    (max, governing)
}

fn sample_depths(crown_depth_m: f64, diameter_m: f64) -> impl Iterator<Item = f64> {
    let step = diameter_m / PROFILE_INTERVALS as f64;
    (0..=PROFILE_INTERVALS).map(move |i| crown_depth_m + step * i as f64)
}

/// Stability share of S_ci at the crown, 0 for a degenerate face.
fn stability_pressure(forces: &FaceForces, slurry_head_kpa: f64) -> f64 {
    if forces.face_area_m2 > 0.0 {
        forces.s_ci_kn / forces.face_area_m2 - slurry_head_kpa
    } else {
        0.0
    }
}

/// Face fully supported by slurry of unit weight `slurry_unit_weight`.
///
/// Minimum crown pressure is the largest of
/// - stability: `S_ci/A - γS·D/2`
/// - crown ingress: `p_w(crown)·ηW`
/// - invert ingress: `p_w(invert)·ηW - γS·D`
///
/// Support pressure increases with depth at `γS`.
pub fn pressure_profile_no_lowering(
    diameter_m: f64,
    crown_depth_m: f64,
    water_depth_m: f64,
    slurry_unit_weight: f64,
    forces: &FaceForces,
    eta_w: f64,
    delta_p_kpa: f64,
) -> PressureProfile {
    let invert_depth_m = crown_depth_m + diameter_m;
    let candidates = vec![
        PressureCandidate {
            constraint: GoverningConstraint::Stability,
            pressure_kpa: stability_pressure(forces, slurry_unit_weight * diameter_m / 2.0),
        },
        PressureCandidate {
            constraint: GoverningConstraint::WaterIngressInvert,
            pressure_kpa: water_pressure_kpa(invert_depth_m, water_depth_m) * eta_w
                - slurry_unit_weight * diameter_m,
        },
        PressureCandidate {
            constraint: GoverningConstraint::WaterIngressCrown,
            pressure_kpa: water_pressure_kpa(crown_depth_m, water_depth_m) * eta_w,
        },
    ];
    let (min_crown_kpa, governing) =
        select_governing(&candidates, GoverningConstraint::WaterIngressCrown);
    let operational_crown_kpa = min_crown_kpa + delta_p_kpa;

    let earth_kpa = forces.mean_earth_pressure_kpa();
    let samples = sample_depths(crown_depth_m, diameter_m)
        .map(|depth_m| {
            let slurry = slurry_unit_weight * (depth_m - crown_depth_m);
            PressureSample {
                depth_m,
                water_kpa: water_pressure_kpa(depth_m, water_depth_m),
                earth_kpa,
                support_min_kpa: min_crown_kpa + slurry,
                support_operational_kpa: operational_crown_kpa + slurry,
            }
        })
        .collect();

    PressureProfile {
        scenario: LoweringScenario::NoLowering,
        samples,
        min_crown_kpa,
        operational_crown_kpa,
        candidates,
        governing,
    }
}

/// Face fully supported by compressed air; pressure constant over depth.
///
/// Minimum is the larger of `S_ci/A` and `p_w(invert)·ηW`.
pub fn pressure_profile_full_lowering(
    diameter_m: f64,
    crown_depth_m: f64,
    water_depth_m: f64,
    forces: &FaceForces,
    eta_w: f64,
    delta_p_kpa: f64,
) -> PressureProfile {
    let candidates = vec![
        PressureCandidate {
            constraint: GoverningConstraint::Stability,
            pressure_kpa: stability_pressure(forces, 0.0),
        },
        PressureCandidate {
            constraint: GoverningConstraint::WaterIngressInvert,
            pressure_kpa: water_pressure_kpa(crown_depth_m + diameter_m, water_depth_m) * eta_w,
        },
    ];
    let (min_crown_kpa, governing) =
        select_governing(&candidates, GoverningConstraint::WaterIngressInvert);
    let operational_crown_kpa = min_crown_kpa + delta_p_kpa;

    let earth_kpa = forces.mean_earth_pressure_kpa();
    let samples = sample_depths(crown_depth_m, diameter_m)
        .map(|depth_m| PressureSample {
            depth_m,
            water_kpa: water_pressure_kpa(depth_m, water_depth_m),
            earth_kpa,
            support_min_kpa: min_crown_kpa,
            support_operational_kpa: operational_crown_kpa,
        })
        .collect();

    PressureProfile {
        scenario: LoweringScenario::FullLowering,
        samples,
        min_crown_kpa,
        operational_crown_kpa,
        candidates,
        governing,
    }
}

/// Slurry fills the lower `slurry_level_fraction·D` of the face, air above.
///
/// With `L = slurry_level_fraction·D`, the minimum air pressure is the
/// largest of 0, `p_w(invert)·ηW - γS·L` and `S_ci/A - γS·L/2`. Support
/// pressure is constant above the slurry surface and grows at `γS` below it.
#[allow(clippy::too_many_arguments)]
pub fn pressure_profile_partial_lowering(
    diameter_m: f64,
    crown_depth_m: f64,
    water_depth_m: f64,
    slurry_level_fraction: f64,
    slurry_unit_weight: f64,
    forces: &FaceForces,
    eta_w: f64,
    delta_p_kpa: f64,
) -> PressureProfile {
    let slurry_height_m = diameter_m * slurry_level_fraction;
    let invert_depth_m = crown_depth_m + diameter_m;
    let slurry_column_kpa = slurry_unit_weight * slurry_height_m;

    let candidates = vec![
        PressureCandidate {
            constraint: GoverningConstraint::WaterIngressInvert,
            pressure_kpa: water_pressure_kpa(invert_depth_m, water_depth_m) * eta_w
                - slurry_column_kpa,
        },
        PressureCandidate {
            constraint: GoverningConstraint::Stability,
            pressure_kpa: stability_pressure(forces, slurry_column_kpa / 2.0),
        },
        PressureCandidate {
            constraint: GoverningConstraint::NonNegative,
            pressure_kpa: 0.0,
        },
    ];
    let (min_crown_kpa, governing) =
        select_governing(&candidates, GoverningConstraint::NonNegative);
    let operational_crown_kpa = min_crown_kpa + delta_p_kpa;

    let earth_kpa = forces.mean_earth_pressure_kpa();
    let samples = sample_depths(crown_depth_m, diameter_m)
        .map(|depth_m| {
            let height_above_invert = invert_depth_m - depth_m;
            let slurry = if height_above_invert <= slurry_height_m {
                slurry_unit_weight * (slurry_height_m - height_above_invert)
            } else {
                0.0
            };
            PressureSample {
                depth_m,
                water_kpa: water_pressure_kpa(depth_m, water_depth_m),
                earth_kpa,
                support_min_kpa: min_crown_kpa + slurry,
                support_operational_kpa: operational_crown_kpa + slurry,
            }
        })
        .collect();

    PressureProfile {
        scenario: LoweringScenario::PartialLowering,
        samples,
        min_crown_kpa,
        operational_crown_kpa,
        candidates,
        governing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::forces::aggregate_forces;

    fn forces() -> FaceForces {
        // D = 10, crown 15, water table 5
        aggregate_forces(10.0, 15.0, 5.0, 4861.6, 1.5, 1.05)
    }

    #[test]
    fn test_no_lowering_takes_maximum_candidate() {
        let f = forces();
        let p = pressure_profile_no_lowering(10.0, 15.0, 5.0, 10.0, &f, 1.05, 10.0);

        let stability = f.s_ci_kn / f.face_area_m2 - 50.0;
        let crown = 100.0 * 1.05;
        let invert = 200.0 * 1.05 - 100.0;
        let expected = stability.max(crown).max(invert);
        assert!((p.min_crown_kpa - expected).abs() < 1e-9);
        assert!((p.operational_crown_kpa - expected - 10.0).abs() < 1e-9);
        assert_eq!(p.candidate(GoverningConstraint::WaterIngressCrown), Some(crown));
        assert_eq!(p.governing, GoverningConstraint::Stability);
    }

    #[test]
    fn test_no_lowering_profile_is_linear_in_slurry_weight() {
        let p = pressure_profile_no_lowering(10.0, 15.0, 5.0, 12.0, &forces(), 1.05, 10.0);
        assert_eq!(p.samples.len(), PROFILE_INTERVALS + 1);
        let crown = p.crown().unwrap();
        let invert = p.invert().unwrap();
        assert_eq!(crown.depth_m, 15.0);
        assert!((invert.depth_m - 25.0).abs() < 1e-12);
        assert!((invert.support_min_kpa - crown.support_min_kpa - 120.0).abs() < 1e-9);
        assert!((invert.water_kpa - 200.0).abs() < 1e-9);
    }

    #[test]
    fn test_water_governs_with_light_slurry_and_weak_earth() {
        let f = aggregate_forces(10.0, 15.0, 0.0, 10.0, 1.5, 1.05);
        let p = pressure_profile_no_lowering(10.0, 15.0, 0.0, 0.0, &f, 1.05, 0.0);
        // With γS = 0 invert ingress (250·1.05) dominates
        assert_eq!(p.governing, GoverningConstraint::WaterIngressInvert);
        assert!((p.min_crown_kpa - 262.5).abs() < 1e-9);
    }

    #[test]
    fn test_full_lowering_is_constant() {
        let f = forces();
        let p = pressure_profile_full_lowering(10.0, 15.0, 5.0, &f, 1.05, 10.0);
        let expected = (f.s_ci_kn / f.face_area_m2).max(200.0 * 1.05);
        assert!((p.min_crown_kpa - expected).abs() < 1e-9);
        assert!(p.samples.iter().all(|s| s.support_min_kpa == p.min_crown_kpa));
        assert!(p.samples.iter().all(|s| s.support_operational_kpa == p.operational_crown_kpa));
    }

    #[test]
    fn test_partial_lowering_profile_shape() {
        let f = forces();
        let p = pressure_profile_partial_lowering(10.0, 15.0, 5.0, 0.5, 11.5, &f, 1.05, 10.0);
        let invert_candidate: f64 = 200.0 * 1.05 - 57.5;
        let stability = f.s_ci_kn / f.face_area_m2 - 28.75;
        assert!((p.min_crown_kpa - invert_candidate.max(stability).max(0.0)).abs() < 1e-9);

        // Above the slurry surface (upper half) the pressure is constant
        for s in p.samples.iter().filter(|s| s.depth_m < 20.0 - 1e-9) {
            assert_eq!(s.support_min_kpa, p.min_crown_kpa);
        }
        let invert = p.invert().unwrap();
        assert!((invert.support_min_kpa - p.min_crown_kpa - 57.5).abs() < 1e-9);
    }

    #[test]
    fn test_partial_lowering_never_negative() {
        let f = aggregate_forces(10.0, 15.0, 50.0, 0.0, 1.5, 1.05);
        let p = pressure_profile_partial_lowering(10.0, 15.0, 50.0, 0.5, 11.5, &f, 1.05, 10.0);
        assert_eq!(p.min_crown_kpa, 0.0);
        assert_eq!(p.governing, GoverningConstraint::NonNegative);
        assert_eq!(p.operational_crown_kpa, 10.0);
    }

    #[test]
    fn test_governing_report_does_not_change_maximum() {
        let candidates = [
            PressureCandidate { constraint: GoverningConstraint::Stability, pressure_kpa: 100.0 },
            PressureCandidate {
                constraint: GoverningConstraint::WaterIngressInvert,
                pressure_kpa: 100.005,
            },
        ];
        let (max, governing) = select_governing(&candidates, GoverningConstraint::NonNegative);
        assert_eq!(max, 100.005);
        assert_eq!(governing, GoverningConstraint::Stability);
    }
}
