//! # Sliding Wedge Equilibrium
//!
//! Limit-equilibrium model of the soil in front of the cutter head: a wedge
//! bounded by the (square, D × D) tunnel face, an inclined sliding plane at
//! angle θ through the invert and two vertical side faces, loaded from above by
//! the soil prism (σ'v at crown level).
//!
//! ## Forces
//!
//! ```text
//! G    = ½·D³·γ'/tanθ                       wedge weight
//! Pv   = D²·σ'v/tanθ                         prism load
//! T_C  = c_side·D²/(2·tanθ)                  cohesive side shear (per side)
//! T_R  = K2·tanφ_side·(T_R1 + T_R2)          frictional side shear (per side)
//! T_R1 = D²·σ'v/(2·tanθ) or D²·σ'v/(3·tanθ)  prism contribution
//! T_R2 = D³·γ'/(6·tanθ)                      self-weight contribution
//!
//! Ere  = [(G+Pv)(sinθ - cosθ·tanφ) - 2(T_R+T_C) - c·D²/sinθ] / (cosθ + sinθ·tanφ)
//! ```
//!
//! The required support force is the maximum of `Ere(θ)` over trial angles,
//! found by a 1° grid search in [`critical_wedge`].

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::soil::{BaseProperties, SideProperties};
use crate::units::Degrees;

/// First trial angle of the critical-angle search (degrees)
pub const THETA_MIN_DEG: u32 = 1;

/// Last trial angle of the critical-angle search (degrees)
pub const THETA_MAX_DEG: u32 = 89;

/// Lateral earth pressure coefficient K2 on the wedge side faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String")]
pub enum K2Model {
    /// K2 = (K0 + Ka) / 2
    #[default]
    JancseczSteiner,
    /// K2 = K0 = 1 - sin φ
    KirschKolymbas,
    /// K2 = 0.4
    AnagnostouKovari,
}

impl K2Model {
    /// Parse a model name; anything unrecognized selects Jancsecz–Steiner.
    pub fn from_name(name: &str) -> Self {
        let key: String = name
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match key.as_str() {
            "kirschkolymbas" => K2Model::KirschKolymbas,
            "anagnostoukovari" => K2Model::AnagnostouKovari,
            _ => K2Model::JancseczSteiner,
        }
    }

    /// Human-readable name
    pub fn display_name(&self) -> &'static str {
        match self {
            K2Model::JancseczSteiner => "Jancsecz-Steiner (K0 + Ka)/2",
            K2Model::KirschKolymbas => "Kirsch-Kolymbas K0",
            K2Model::AnagnostouKovari => "Anagnostou-Kovari 0.4",
        }
    }

    /// K2 for a side friction angle, given precomputed K0 and Ka.
    fn coefficient(&self, k0: f64, ka: f64) -> f64 {
        match self {
            K2Model::JancseczSteiner => (k0 + ka) / 2.0,
            K2Model::KirschKolymbas => k0,
            K2Model::AnagnostouKovari => 0.4,
        }
    }
}

impl From<String> for K2Model {
    fn from(name: String) -> Self {
        K2Model::from_name(&name)
    }
}

/// How the crown stress is distributed over the wedge side faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String")]
pub enum VerticalStressModel {
    /// Prism term `T_R1 = D²·σ'v / (3·tanθ)`
    #[default]
    Standard,
    /// Prism term `T_R1 = D²·σ'v / (2·tanθ)`
    KirschKolymbas,
}

impl VerticalStressModel {
    /// Parse a model name; anything unrecognized selects the standard model.
    pub fn from_name(name: &str) -> Self {
        let key: String = name
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match key.as_str() {
            "kirschkolymbas" => VerticalStressModel::KirschKolymbas,
            _ => VerticalStressModel::Standard,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            VerticalStressModel::Standard => "Standard (σ'v/3)",
            VerticalStressModel::KirschKolymbas => "Kirsch-Kolymbas (σ'v/2)",
        }
    }

    fn prism_divisor(&self) -> f64 {
        match self {
            VerticalStressModel::Standard => 3.0,
            VerticalStressModel::KirschKolymbas => 2.0,
        }
    }
}

impl From<String> for VerticalStressModel {
    fn from(name: String) -> Self {
        VerticalStressModel::from_name(&name)
    }
}

/// Force components of one trial wedge. Forces in kN.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WedgeComponents {
    /// Trial sliding angle θ (degrees)
    pub theta_deg: f64,

    /// Lateral pressure coefficient used on the side faces
    pub k2: f64,

    /// Active earth pressure coefficient Ka = tan²(45° - φ/2)
    pub ka: f64,

    /// At-rest earth pressure coefficient K0 = 1 - sin φ
    pub k0: f64,

    /// Wedge self-weight G
    pub weight_kn: f64,

    /// Vertical load from the soil prism above, Pv
    pub prism_load_kn: f64,

    /// Cohesive shear on one side face, T_C
    pub side_cohesion_kn: f64,

    /// Frictional shear on one side face, T_R
    pub side_friction_kn: f64,

    /// Total shear on one side face, T = T_R + T_C
    pub side_shear_kn: f64,

    /// Cohesive resistance along the sliding plane, c·D²/sinθ
    pub base_cohesion_kn: f64,

    /// Required support force, never negative
    pub ere_kn: f64,

    /// Side-face properties used
    pub side: SideProperties,

    /// Sliding-plane properties used
    pub base: BaseProperties,
}

/// Support force required to hold the wedge at trial angle `theta_deg`.
///
/// Returns `None` outside (0.1°, 89.9°) or for a non-positive wedge unit
/// weight; those trials are geometrically meaningless.
pub fn wedge_components(
    diameter_m: f64,
    crown_stress_kpa: f64,
    theta_deg: f64,
    side: &SideProperties,
    base: &BaseProperties,
    k2_model: K2Model,
    stress_model: VerticalStressModel,
) -> Option<WedgeComponents> {
    if theta_deg <= 0.1 || theta_deg >= 89.9 || side.gamma_eff <= 0.0 {
        return None;
    }

    let d = diameter_m;
    let theta = Degrees(theta_deg);
    let (sin_t, cos_t, tan_t) = (theta.sin(), theta.cos(), theta.tan());
    let phi_side = Degrees(side.phi_deg);
    let tan_phi_base = Degrees(base.phi_deg).tan();

    let ka = (Degrees(45.0) - phi_side / 2.0).tan().powi(2);
    let k0 = 1.0 - phi_side.sin();
    let k2 = k2_model.coefficient(k0, ka);

    let side_cohesion_kn = side.c_kpa * d * d / (2.0 * tan_t);
    let prism_term = d * d * crown_stress_kpa / (stress_model.prism_divisor() * tan_t);
    let weight_term = d.powi(3) * side.gamma_eff / (6.0 * tan_t);
    let side_friction_kn = k2 * phi_side.tan() * (prism_term + weight_term);
    let side_shear_kn = side_friction_kn + side_cohesion_kn;

    let weight_kn = 0.5 * d.powi(3) * side.gamma_eff / tan_t;
    let prism_load_kn = d * d * crown_stress_kpa / tan_t;
    let base_cohesion_kn = base.c_kpa * d * d / sin_t;

    let numerator = (weight_kn + prism_load_kn) * (sin_t - cos_t * tan_phi_base)
        - 2.0 * side_shear_kn
        - base_cohesion_kn;
    let denominator = cos_t + sin_t * tan_phi_base;
    let ere = if denominator.abs() < 1e-9 {
        0.0
    } else {
        numerator / denominator
    };

    Some(WedgeComponents {
        theta_deg,
        k2,
        ka,
        k0,
        weight_kn,
        prism_load_kn,
        side_cohesion_kn,
        side_friction_kn,
        side_shear_kn,
        base_cohesion_kn,
        ere_kn: ere.max(0.0),
        side: *side,
        base: *base,
    })
}

/// One point of the Ere(θ) curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EreSample {
    pub theta_deg: f64,
    pub ere_kn: f64,
}

/// Outcome of the critical-angle search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriticalWedge {
    /// Angle maximizing Ere (degrees, one of 1..=89)
    pub theta_crit_deg: f64,

    /// Maximum support force on the square face, E_max,re (kN)
    pub max_ere_kn: f64,

    /// Ere for every trial angle, ascending θ
    pub curve: Vec<EreSample>,

    /// Components at the critical angle
    pub components: Option<WedgeComponents>,
}

/// Grid search for the most demanding sliding angle.
///
/// Evaluates θ = 1°, 2°, …, 89°. Trials without components count as zero.
/// Ties keep the smallest angle.
///
/// # Example
///
/// ```
/// use face_core::calculations::wedge::{critical_wedge, K2Model, VerticalStressModel};
/// use face_core::soil::{BaseProperties, SideProperties};
///
/// let side = SideProperties { gamma_eff: 9.0, phi_deg: 30.0, c_kpa: 5.0 };
/// let base = BaseProperties { phi_deg: 30.0, c_kpa: 5.0 };
/// let (k2, stress) = (K2Model::JancseczSteiner, VerticalStressModel::Standard);
/// let critical = critical_wedge(10.0, 185.0, &side, &base, k2, stress);
///
/// assert_eq!(critical.curve.len(), 89);
/// assert!(critical.max_ere_kn > 0.0);
/// ```
pub fn critical_wedge(
    diameter_m: f64,
    crown_stress_kpa: f64,
    side: &SideProperties,
    base: &BaseProperties,
    k2_model: K2Model,
    stress_model: VerticalStressModel,
) -> CriticalWedge {
    let trials: Vec<(f64, Option<WedgeComponents>)> = (THETA_MIN_DEG..=THETA_MAX_DEG)
        .map(f64::from)
        .map(|theta| {
            let components = wedge_components(
                diameter_m,
                crown_stress_kpa,
                theta,
                side,
                base,
                k2_model,
                stress_model,
            );
            (theta, components)
        })
        .collect();

    let curve: Vec<EreSample> = trials
        .iter()
        .map(|(theta, components)| EreSample {
            theta_deg: *theta,
            ere_kn: components.map_or(0.0, |c| c.ere_kn),
        })
        .collect();

    let critical_index = curve
        .iter()
        .enumerate()
        .fold(0, |best, (i, sample)| if sample.ere_kn > curve[best].ere_kn { i } else { best });

    let (theta_crit_deg, components) = trials[critical_index];
    let max_ere_kn = curve[critical_index].ere_kn;

    debug!(theta_crit_deg, max_ere_kn, "critical wedge");

    CriticalWedge {
        theta_crit_deg,
        max_ere_kn,
        curve,
        components,
    }
}
