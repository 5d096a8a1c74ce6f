//! # Face Support Analysis
//!
//! One complete support pressure calculation for a tunnel cross section:
//!
//! 1. Wedge side and sliding-plane properties from the soil profile
//! 2. Vertical effective stress at the crown (upper-bound weights, permanent
//!    and traffic surcharge), optionally reduced by silo theory
//! 3. Critical sliding wedge and the required face forces
//! 4. Support pressure distributions for no, full and partial lowering
//! 5. Blow-out and water ingress checks for each scenario
//!
//! ## Example
//!
//! ```rust
//! use face_core::calculations::face_support::{calculate, FaceSupportInput};
//! use face_core::soil::{SoilLayer, SoilProfile};
//!
//! let sand = SoilLayer::new("Sand", 100.0, 19.0, 9.0, 30.0, 5.0);
//! let profile = SoilProfile::homogeneous(sand).unwrap();
//! let input = FaceSupportInput::new("km 1+200", 10.0, 15.0, 5.0);
//!
//! let result = calculate(&input, &profile).unwrap();
//! assert!((result.sigma_v_crown_kpa - 185.0).abs() < 1e-9);
//! assert_eq!(result.wedge.curve.len(), 89);
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::forces::{aggregate_forces, FaceForces};
use super::pressure::{
    pressure_profile_full_lowering, pressure_profile_no_lowering, pressure_profile_partial_lowering,
    PressureProfile,
};
use super::safety::{blowout_check, ingress_check, BlowoutCheck, IngressCheck};
use super::silo::{silo_effective_stress, SiloResult, DEFAULT_K1};
use super::wedge::{critical_wedge, CriticalWedge, K2Model, VerticalStressModel};
use crate::errors::{CalcError, CalcResult};
use crate::soil::{
    base_properties, side_properties, vertical_effective_stress, BaseProperties, PropertyBound,
    SideProperties, SoilProfile,
};

fn default_slurry_unit_weight() -> f64 {
    10.0
}

fn default_eta_e() -> f64 {
    1.5
}

fn default_eta_w() -> f64 {
    1.05
}

fn default_k1() -> f64 {
    DEFAULT_K1
}

fn default_slurry_level_fraction() -> f64 {
    0.5
}

fn default_partial_slurry_unit_weight() -> f64 {
    11.5
}

/// Silo (arching) reduction of the crown stress.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SiloOptions {
    #[serde(default)]
    pub enabled: bool,

    /// Janssen lateral pressure coefficient
    #[serde(default = "default_k1")]
    pub k1: f64,
}

impl Default for SiloOptions {
    fn default() -> Self {
        SiloOptions {
            enabled: false,
            k1: DEFAULT_K1,
        }
    }
}

/// Slurry column for the partial lowering scenario.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PartialLowering {
    /// Slurry height as a fraction of D, measured from the invert
    #[serde(default = "default_slurry_level_fraction")]
    pub slurry_level_fraction: f64,

    /// Unit weight of the slurry (kN/m³)
    #[serde(default = "default_partial_slurry_unit_weight")]
    pub slurry_unit_weight: f64,
}

impl Default for PartialLowering {
    fn default() -> Self {
        PartialLowering {
            slurry_level_fraction: default_slurry_level_fraction(),
            slurry_unit_weight: default_partial_slurry_unit_weight(),
        }
    }
}

/// Geometry, loads and safety factors of one cross section.
///
/// Depths in m below ground surface, pressures in kN/m², unit weights in kN/m³.
///
/// ## JSON Example
///
/// ```json
/// {
///   "label": "km 1+200",
///   "diameter_m": 10.0,
///   "crown_depth_m": 15.0,
///   "water_depth_m": 5.0,
///   "surcharge_permanent_kpa": 10.0,
///   "surcharge_traffic_kpa": 10.0,
///   "eta_e": 1.5,
///   "eta_w": 1.05,
///   "delta_p_kpa": 10.0,
///   "silo": { "enabled": true, "k1": 0.8 },
///   "k2_model": "JancseczSteiner",
///   "vertical_stress_model": "Standard",
///   "slurry_unit_weight": 10.0,
///   "partial": { "slurry_level_fraction": 0.5, "slurry_unit_weight": 11.5 }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceSupportInput {
    /// User label for this cross section (e.g., "km 1+200")
    pub label: String,

    /// Excavation diameter D
    pub diameter_m: f64,

    /// Depth of the tunnel crown t
    pub crown_depth_m: f64,

    /// Depth of the groundwater table h_w
    pub water_depth_m: f64,

    #[serde(default)]
    pub surcharge_permanent_kpa: f64,

    #[serde(default)]
    pub surcharge_traffic_kpa: f64,

    /// Partial safety factor on the earth force
    #[serde(default = "default_eta_e")]
    pub eta_e: f64,

    /// Partial safety factor on the water force
    #[serde(default = "default_eta_w")]
    pub eta_w: f64,

    /// Pressure deviation added to the minimum for the operational pressure
    #[serde(default)]
    pub delta_p_kpa: f64,

    #[serde(default)]
    pub silo: SiloOptions,

    #[serde(default)]
    pub k2_model: K2Model,

    #[serde(default)]
    pub vertical_stress_model: VerticalStressModel,

    /// Slurry unit weight for the no lowering scenario
    #[serde(default = "default_slurry_unit_weight")]
    pub slurry_unit_weight: f64,

    #[serde(default)]
    pub partial: PartialLowering,
}

impl FaceSupportInput {
    /// Cross section with default factors, no surcharge and no silo reduction.
    pub fn new(
        label: impl Into<String>,
        diameter_m: f64,
        crown_depth_m: f64,
        water_depth_m: f64,
    ) -> Self {
        FaceSupportInput {
            label: label.into(),
            diameter_m,
            crown_depth_m,
            water_depth_m,
            surcharge_permanent_kpa: 0.0,
            surcharge_traffic_kpa: 0.0,
            eta_e: default_eta_e(),
            eta_w: default_eta_w(),
            delta_p_kpa: 0.0,
            silo: SiloOptions::default(),
            k2_model: K2Model::default(),
            vertical_stress_model: VerticalStressModel::default(),
            slurry_unit_weight: default_slurry_unit_weight(),
            partial: PartialLowering::default(),
        }
    }

    /// Permanent plus traffic surcharge
    pub fn total_surcharge_kpa(&self) -> f64 {
        self.surcharge_permanent_kpa + self.surcharge_traffic_kpa
    }

    pub fn invert_depth_m(&self) -> f64 {
        self.crown_depth_m + self.diameter_m
    }

    /// Validate input parameters.
    pub fn validate(&self) -> CalcResult<()> {
        let finite = [
            ("diameter_m", self.diameter_m),
            ("crown_depth_m", self.crown_depth_m),
            ("water_depth_m", self.water_depth_m),
            ("surcharge_permanent_kpa", self.surcharge_permanent_kpa),
            ("surcharge_traffic_kpa", self.surcharge_traffic_kpa),
            ("eta_e", self.eta_e),
            ("eta_w", self.eta_w),
            ("delta_p_kpa", self.delta_p_kpa),
            ("silo.k1", self.silo.k1),
            ("slurry_unit_weight", self.slurry_unit_weight),
            ("partial.slurry_level_fraction", self.partial.slurry_level_fraction),
            ("partial.slurry_unit_weight", self.partial.slurry_unit_weight),
        ];
        if let Some((field, value)) = finite.iter().find(|(_, v)| !v.is_finite()) {
            return Err(CalcError::invalid_input(*field, value.to_string(), "Value must be finite"));
        }

        if self.diameter_m <= 0.0 {
            return Err(CalcError::invalid_input(
                "diameter_m",
                self.diameter_m.to_string(),
                "Diameter must be positive",
            ));
        }
        if self.crown_depth_m < 0.0 {
            return Err(CalcError::invalid_input(
                "crown_depth_m",
                self.crown_depth_m.to_string(),
                "Crown cannot be above the ground surface",
            ));
        }
        if self.surcharge_permanent_kpa < 0.0 {
            return Err(CalcError::invalid_input(
                "surcharge_permanent_kpa",
                self.surcharge_permanent_kpa.to_string(),
                "Surcharge cannot be negative",
            ));
        }
        if self.surcharge_traffic_kpa < 0.0 {
            return Err(CalcError::invalid_input(
                "surcharge_traffic_kpa",
                self.surcharge_traffic_kpa.to_string(),
                "Surcharge cannot be negative",
            ));
        }
        if self.eta_e <= 0.0 {
            return Err(CalcError::invalid_input(
                "eta_e",
                self.eta_e.to_string(),
                "Safety factor must be positive",
            ));
        }
        if self.eta_w <= 0.0 {
            return Err(CalcError::invalid_input(
                "eta_w",
                self.eta_w.to_string(),
                "Safety factor must be positive",
            ));
        }
        if self.delta_p_kpa < 0.0 {
            return Err(CalcError::invalid_input(
                "delta_p_kpa",
                self.delta_p_kpa.to_string(),
                "Pressure deviation cannot be negative",
            ));
        }
        if self.silo.k1 < 0.0 {
            return Err(CalcError::invalid_input(
                "silo.k1",
                self.silo.k1.to_string(),
                "K1 cannot be negative",
            ));
        }
        if self.slurry_unit_weight < 0.0 {
            return Err(CalcError::invalid_input(
                "slurry_unit_weight",
                self.slurry_unit_weight.to_string(),
                "Unit weight cannot be negative",
            ));
        }
        if !(0.0..=1.0).contains(&self.partial.slurry_level_fraction) {
            return Err(CalcError::invalid_input(
                "partial.slurry_level_fraction",
                self.partial.slurry_level_fraction.to_string(),
                "Slurry level must be between 0 and 1",
            ));
        }
        if self.partial.slurry_unit_weight < 0.0 {
            return Err(CalcError::invalid_input(
                "partial.slurry_unit_weight",
                self.partial.slurry_unit_weight.to_string(),
                "Unit weight cannot be negative",
            ));
        }
        Ok(())
    }
}

/// Pressure distribution and checks of one lowering scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub profile: PressureProfile,
    pub blowout: BlowoutCheck,
    pub ingress_crown: IngressCheck,
    pub ingress_invert: IngressCheck,
}

impl ScenarioResult {
    fn evaluate(
        input: &FaceSupportInput,
        min_crown_stress_kpa: f64,
        profile: PressureProfile,
    ) -> Self {
        let blowout = blowout_check(
            input.crown_depth_m,
            min_crown_stress_kpa,
            input.water_depth_m,
            profile.operational_crown_kpa,
            input.delta_p_kpa,
        );
        let crown_support = profile.crown().map_or(profile.min_crown_kpa, |s| s.support_min_kpa);
        let invert_support = profile.invert().map_or(profile.min_crown_kpa, |s| s.support_min_kpa);
        let hw = input.water_depth_m;
        let ingress_crown = ingress_check(input.crown_depth_m, hw, crown_support, input.eta_w);
        let ingress_invert = ingress_check(input.invert_depth_m(), hw, invert_support, input.eta_w);

        ScenarioResult {
            profile,
            blowout,
            ingress_crown,
            ingress_invert,
        }
    }

    /// True when blow-out and both ingress checks pass
    pub fn passed(&self) -> bool {
        self.blowout.passed && self.ingress_crown.passed && self.ingress_invert.passed
    }
}

/// Results of a face support analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceSupportResult {
    pub label: String,

    /// Trapezoid-weighted properties on the wedge side faces
    pub side: SideProperties,

    /// Properties along the sliding plane
    pub base: BaseProperties,

    /// Crown stress acting on the wedge (silo-reduced when enabled)
    pub sigma_v_crown_kpa: f64,

    /// Crown stress without silo reduction, for comparison
    pub sigma_v_crown_unreduced_kpa: f64,

    /// Crown stress with lower-bound weights and permanent surcharge only
    pub sigma_v_crown_min_kpa: f64,

    /// Silo intermediates, when the reduction is enabled
    pub silo: Option<SiloResult>,

    pub wedge: CriticalWedge,

    pub forces: FaceForces,

    pub no_lowering: ScenarioResult,

    pub full_lowering: ScenarioResult,

    pub partial_lowering: ScenarioResult,
}

impl FaceSupportResult {
    /// Scenarios in the order no, full, partial lowering
    pub fn scenarios(&self) -> [&ScenarioResult; 3] {
        [&self.no_lowering, &self.full_lowering, &self.partial_lowering]
    }

    /// True when every scenario passes all of its checks
    pub fn all_passed(&self) -> bool {
        self.scenarios().iter().all(|s| s.passed())
    }
}

/// Run the face support analysis for one cross section.
///
/// Only the input is validated here; the soil profile was validated when it
/// was constructed.
pub fn calculate(input: &FaceSupportInput, profile: &SoilProfile) -> CalcResult<FaceSupportResult> {
    input.validate()?;

    let d = input.diameter_m;
    let t = input.crown_depth_m;
    let hw = input.water_depth_m;
    info!(
        label = %input.label,
        diameter_m = d,
        crown_depth_m = t,
        water_depth_m = hw,
        "face support analysis"
    );

    let side = side_properties(t, d, hw, profile);
    let base = base_properties(t, d, profile);

    let sigma_v_crown_unreduced_kpa =
        vertical_effective_stress(t, input.total_surcharge_kpa(), hw, profile, PropertyBound::Max);
    let silo = input.silo.enabled.then(|| {
        let surcharge = input.total_surcharge_kpa();
        silo_effective_stress(t, surcharge, hw, profile, d, input.silo.k1, PropertyBound::Max)
    });
    let sigma_v_crown_kpa = silo.as_ref().map_or(sigma_v_crown_unreduced_kpa, |s| s.sigma_v_kpa);
    let permanent = input.surcharge_permanent_kpa;
    let sigma_v_crown_min_kpa =
        vertical_effective_stress(t, permanent, hw, profile, PropertyBound::Min);

    debug!(
        sigma_v_crown_kpa,
        sigma_v_crown_unreduced_kpa,
        sigma_v_crown_min_kpa,
        side_gamma = side.gamma_eff,
        side_phi = side.phi_deg,
        "crown stresses"
    );

    let wedge = critical_wedge(
        d,
        sigma_v_crown_kpa,
        &side,
        &base,
        input.k2_model,
        input.vertical_stress_model,
    );
    let forces = aggregate_forces(d, t, hw, wedge.max_ere_kn, input.eta_e, input.eta_w);

    let no_lowering = pressure_profile_no_lowering(
        d,
        t,
        hw,
        input.slurry_unit_weight,
        &forces,
        input.eta_w,
        input.delta_p_kpa,
    );
    let full_lowering =
        pressure_profile_full_lowering(d, t, hw, &forces, input.eta_w, input.delta_p_kpa);
    let partial_lowering = pressure_profile_partial_lowering(
        d,
        t,
        hw,
        input.partial.slurry_level_fraction,
        input.partial.slurry_unit_weight,
        &forces,
        input.eta_w,
        input.delta_p_kpa,
    );

    let result = FaceSupportResult {
        label: input.label.clone(),
        side,
        base,
        sigma_v_crown_kpa,
        sigma_v_crown_unreduced_kpa,
        sigma_v_crown_min_kpa,
        silo,
        wedge,
        forces,
        no_lowering: ScenarioResult::evaluate(input, sigma_v_crown_min_kpa, no_lowering),
        full_lowering: ScenarioResult::evaluate(input, sigma_v_crown_min_kpa, full_lowering),
        partial_lowering: ScenarioResult::evaluate(input, sigma_v_crown_min_kpa, partial_lowering),
    };

    info!(
        label = %input.label,
        theta_crit_deg = result.wedge.theta_crit_deg,
        s_ci_kn = result.forces.s_ci_kn,
        min_crown_kpa = result.no_lowering.profile.min_crown_kpa,
        passed = result.all_passed(),
        "face support analysis complete"
    );

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::pressure::GoverningConstraint;
    use crate::soil::tests::sample_profile;
    use crate::soil::SoilLayer;

    fn sand() -> SoilProfile {
        SoilProfile::homogeneous(SoilLayer::new("Sand", 100.0, 19.0, 9.0, 30.0, 5.0)).unwrap()
    }

    fn test_input() -> FaceSupportInput {
        FaceSupportInput::new("Test", 10.0, 15.0, 5.0)
    }

    #[test]
    fn test_reference_section() {
        let result = calculate(&test_input(), &sand()).unwrap();

        // 5·19 + 10·9
        assert!((result.sigma_v_crown_kpa - 185.0).abs() < 1e-9);
        assert_eq!(result.sigma_v_crown_kpa, result.sigma_v_crown_unreduced_kpa);
        assert!(result.silo.is_none());

        // Whole wedge below the water table
        assert!((result.side.gamma_eff - 9.0).abs() < 1e-9);
        assert!((result.side.phi_deg - 30.0).abs() < 1e-9);
        assert!((result.base.c_kpa - 5.0).abs() < 1e-9);

        assert_eq!(result.wedge.theta_crit_deg, 65.0);
        assert!((result.wedge.max_ere_kn - 4861.6).abs() < 0.1);

        let forces = &result.forces;
        assert!((forces.w_re_kn - 15000.0).abs() < 1e-9);
        let expected_s = 1.5 * forces.e_max_ci_kn + 1.05 * forces.w_ci_kn;
        assert!((forces.s_ci_kn - expected_s).abs() < 1e-9);
    }

    #[test]
    fn test_reference_section_scenarios() {
        let mut input = test_input();
        input.delta_p_kpa = 10.0;
        let result = calculate(&input, &sand()).unwrap();
        let stability = result.forces.s_ci_kn / result.forces.face_area_m2;

        let no = &result.no_lowering;
        assert!((no.profile.min_crown_kpa - (stability - 50.0)).abs() < 1e-9);
        assert_eq!(no.profile.governing, GoverningConstraint::Stability);
        assert!((no.profile.operational_crown_kpa - no.profile.min_crown_kpa - 10.0).abs() < 1e-9);

        let full = &result.full_lowering;
        assert!((full.profile.min_crown_kpa - stability).abs() < 1e-9);

        // Blow-out: σ'v,min uses lower-bound weights (same as upper here)
        assert!((no.blowout.sigma_v_crown_min_kpa - 285.0).abs() < 1e-9);
        assert!((no.blowout.required_kpa - no.profile.operational_crown_kpa - 10.0).abs() < 1e-9);

        // Invert ingress: 200 kPa · 1.05 against min + 10·10
        assert!((no.ingress_invert.required_kpa - 210.0).abs() < 1e-9);
        assert!(no.ingress_invert.passed);
        assert!(no.ingress_crown.passed);
    }

    #[test]
    fn test_min_stress_uses_lower_bound_and_permanent_surcharge() {
        let mut input = FaceSupportInput::new("Layered", 6.0, 12.0, 3.0);
        input.surcharge_permanent_kpa = 10.0;
        input.surcharge_traffic_kpa = 15.0;
        let profile = sample_profile();
        let result = calculate(&input, &profile).unwrap();

        let max = vertical_effective_stress(12.0, 25.0, 3.0, &profile, PropertyBound::Max);
        let min = vertical_effective_stress(12.0, 10.0, 3.0, &profile, PropertyBound::Min);
        assert!((result.sigma_v_crown_kpa - max).abs() < 1e-9);
        assert!((result.sigma_v_crown_min_kpa - min).abs() < 1e-9);
        assert!(result.sigma_v_crown_min_kpa < result.sigma_v_crown_kpa);
    }

    #[test]
    fn test_silo_reduces_crown_stress_and_support() {
        let mut input = test_input();
        let plain = calculate(&input, &sand()).unwrap();
        input.silo.enabled = true;
        let silo = calculate(&input, &sand()).unwrap();

        assert!(silo.silo.is_some());
        assert!(silo.sigma_v_crown_kpa < silo.sigma_v_crown_unreduced_kpa);
        assert_eq!(silo.sigma_v_crown_unreduced_kpa, plain.sigma_v_crown_kpa);
        assert!(silo.wedge.max_ere_kn < plain.wedge.max_ere_kn);
        assert!(silo.forces.s_ci_kn < plain.forces.s_ci_kn);
    }

    #[test]
    fn test_critical_force_increases_with_depth() {
        let profile = sand();
        let mut previous = 0.0;
        for t in (10..=30).map(f64::from) {
            let input = FaceSupportInput::new("Depth", 10.0, t, 5.0);
            let result = calculate(&input, &profile).unwrap();
            assert!(result.wedge.max_ere_kn >= previous, "Ere decreased at t = {}", t);
            previous = result.wedge.max_ere_kn;
        }
    }

    #[test]
    fn test_calculation_is_deterministic() {
        let mut input = test_input();
        input.silo.enabled = true;
        let profile = sample_profile();
        let a = calculate(&input, &profile).unwrap();
        let b = calculate(&input, &profile).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_dry_shallow_section() {
        let input = FaceSupportInput::new("Dry", 8.0, 4.0, 30.0);
        let result = calculate(&input, &sample_profile()).unwrap();
        assert_eq!(result.forces.w_ci_kn, 0.0);
        assert!(result.no_lowering.ingress_crown.eta.is_infinite());
        assert!(result.no_lowering.ingress_invert.passed);
        assert!(result.partial_lowering.profile.min_crown_kpa >= 0.0);
    }

    #[test]
    fn test_validation_errors() {
        let profile = sand();

        let mut input = test_input();
        input.diameter_m = 0.0;
        let err = calculate(&input, &profile).unwrap_err();
        assert!(matches!(err, CalcError::InvalidInput { ref field, .. } if field == "diameter_m"));

        let mut input = test_input();
        input.crown_depth_m = -1.0;
        assert!(calculate(&input, &profile).is_err());

        let mut input = test_input();
        input.partial.slurry_level_fraction = 1.5;
        assert!(calculate(&input, &profile).is_err());

        let mut input = test_input();
        input.eta_w = f64::NAN;
        assert!(input.validate().is_err());

        let mut input = test_input();
        input.delta_p_kpa = -5.0;
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_input_defaults_from_json() {
        let json = r#"{
            "label": "Minimal",
            "diameter_m": 9.5,
            "crown_depth_m": 12.0,
            "water_depth_m": 4.0,
            "k2_model": "Kirsch-Kolymbas"
        }"#;
        let input: FaceSupportInput = serde_json::from_str(json).unwrap();
        assert_eq!(input.eta_e, 1.5);
        assert_eq!(input.eta_w, 1.05);
        assert_eq!(input.slurry_unit_weight, 10.0);
        assert_eq!(input.silo, SiloOptions::default());
        assert_eq!(input.partial.slurry_level_fraction, 0.5);
        assert_eq!(input.partial.slurry_unit_weight, 11.5);
        assert_eq!(input.k2_model, K2Model::KirschKolymbas);
        assert_eq!(input.vertical_stress_model, VerticalStressModel::Standard);
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_input_serialization() {
        let mut input = test_input();
        input.silo.enabled = true;
        input.k2_model = K2Model::AnagnostouKovari;
        let json = serde_json::to_string(&input).unwrap();
        let parsed: FaceSupportInput = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, input);
    }
}
