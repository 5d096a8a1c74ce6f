//! # Silo Pressure (Janssen)
//!
//! Reduces the vertical effective stress acting on the tunnel crown by
//! treating the overburden as a silo: friction on the silo walls carries part
//! of the soil weight (arching).
//!
//! ## Procedure
//!
//! 1. φ averaged over the face height `[t, t + D]`
//! 2. Terzaghi half-width `b1 = r / tan((45° + φ/2) / 2)`
//! 3. Effective silo height capped at `h1 = min(t, 5·b1)`; the soil above
//!    (`h2 = t - h1`) acts as an extra surcharge on top of the silo
//! 4. γ', c, φ averaged over `[0, h1]`
//! 5. Janssen with `λ = K1·tan φ`:
//!
//! ```text
//! σ'v = σ0·e^(-λ·h1/B) + (γ'·B - c)/λ · (1 - e^(-λ·h1/B))
//! ```
//!
//! With `λ ≈ 0` or `B ≈ 0` the linear estimate `σ0 + (γ' - c/B)·h1` is used.
//! Either way the result is clamped at zero: cohesion exceeding `γ'·B` would
//! otherwise produce a tensile (negative) crown stress.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::soil::{column_averages, face_friction_angle, ColumnAverages, PropertyBound, SoilProfile};
use crate::units::Degrees;

/// Design-code cap on the effective silo height, as a multiple of b1.
pub const SILO_HEIGHT_LIMIT_FACTOR: f64 = 5.0;

/// Default Janssen lateral pressure coefficient K1
pub const DEFAULT_K1: f64 = 0.8;

/// Intermediate values and the reduced crown stress of a silo calculation.
///
/// ## JSON Example
///
/// ```json
/// {
///   "half_width_m": 8.66,
///   "face_phi_deg": 30.0,
///   "height_limit_m": 43.3,
///   "silo_height_m": 15.0,
///   "surcharge_height_m": 0.0,
///   "lambda": 0.462,
///   "user_surcharge_kpa": 10.0,
///   "top_surcharge_kpa": 10.0,
///   "averages": { "gamma_eff": 12.33, "c_kpa": 5.0, "phi_deg": 30.0 },
///   "sigma_v_kpa": 125.9
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiloResult {
    /// Silo half-width B = b1 (m)
    pub half_width_m: f64,

    /// Friction angle averaged over the face, used for b1 (degrees)
    pub face_phi_deg: f64,

    /// Height cap 5·b1 (m)
    pub height_limit_m: f64,

    /// Effective silo height h1 (m)
    pub silo_height_m: f64,

    /// Overburden above the silo treated as surcharge, h2 (m)
    pub surcharge_height_m: f64,

    /// Janssen decay parameter λ = K1·tan φ
    pub lambda: f64,

    /// Surface surcharge supplied by the caller (kN/m²)
    pub user_surcharge_kpa: f64,

    /// Surcharge at the top of h1: user surcharge plus the weight of h2 (kN/m²)
    pub top_surcharge_kpa: f64,

    /// Properties averaged over [0, h1]
    pub averages: ColumnAverages,

    /// Reduced vertical effective stress at the crown (kN/m²)
    pub sigma_v_kpa: f64,
}

impl SiloResult {
    fn passthrough(surcharge_kpa: f64) -> Self {
        SiloResult {
            half_width_m: 0.0,
            face_phi_deg: 0.0,
            height_limit_m: 0.0,
            silo_height_m: 0.0,
            surcharge_height_m: 0.0,
            lambda: 0.0,
            user_surcharge_kpa: surcharge_kpa,
            top_surcharge_kpa: surcharge_kpa,
            averages: ColumnAverages::default(),
            sigma_v_kpa: surcharge_kpa,
        }
    }
}

/// Terzaghi half-width of the arching zone above a circular opening.
///
/// `b1 = r / tan((45° + φ/2) / 2)`
pub fn terzaghi_half_width(diameter_m: f64, phi_deg: f64) -> f64 {
    let slip_angle = Degrees(45.0) + Degrees(phi_deg) / 2.0;
    (diameter_m / 2.0) / (slip_angle / 2.0).tan()
}

/// Crown vertical effective stress reduced by silo theory.
///
/// Returns the surcharge unmodified (all geometry zero) for a crown at or
/// above the surface or a non-positive diameter. The reduced stress is never
/// negative.
///
/// # Example
///
/// ```
/// use face_core::calculations::silo::silo_effective_stress;
/// use face_core::soil::{vertical_effective_stress, PropertyBound, SoilLayer, SoilProfile};
///
/// let sand = SoilLayer::new("Sand", 100.0, 19.0, 9.0, 30.0, 5.0);
/// let profile = SoilProfile::homogeneous(sand).unwrap();
/// let silo = silo_effective_stress(15.0, 0.0, 5.0, &profile, 10.0, 0.8, PropertyBound::Max);
/// let full = vertical_effective_stress(15.0, 0.0, 5.0, &profile, PropertyBound::Max);
/// assert!(silo.sigma_v_kpa < full);
/// ```
pub fn silo_effective_stress(
    crown_depth_m: f64,
    surcharge_kpa: f64,
    water_depth_m: f64,
    profile: &SoilProfile,
    diameter_m: f64,
    k1: f64,
    bound: PropertyBound,
) -> SiloResult {
    if crown_depth_m <= 0.0 || diameter_m <= 0.0 {
        return SiloResult::passthrough(surcharge_kpa);
    }

    let face_phi_deg = face_friction_angle(crown_depth_m, diameter_m, profile);
    let half_width_m = terzaghi_half_width(diameter_m, face_phi_deg);

    let height_limit_m = SILO_HEIGHT_LIMIT_FACTOR * half_width_m;
    let (silo_height_m, surcharge_height_m) = if crown_depth_m <= height_limit_m {
        (crown_depth_m, 0.0)
    } else {
        (height_limit_m, crown_depth_m - height_limit_m)
    };

    let mut top_surcharge_kpa = surcharge_kpa;
    if surcharge_height_m > 0.0 {
        let upper = column_averages(surcharge_height_m, water_depth_m, profile, bound);
        top_surcharge_kpa += upper.gamma_eff * surcharge_height_m;
    }

    let averages = column_averages(silo_height_m, water_depth_m, profile, bound);
    let lambda = k1 * Degrees(averages.phi_deg).tan();

    let sigma_v_kpa = if lambda.abs() < 1e-9 || half_width_m < 1e-6 {
        let cohesion_per_m = averages.c_kpa / half_width_m.max(1e-6);
        (top_surcharge_kpa + (averages.gamma_eff - cohesion_per_m) * silo_height_m).max(0.0)
    } else {
        let decay = (-lambda * silo_height_m / half_width_m).exp();
        let asymptote = (averages.gamma_eff * half_width_m - averages.c_kpa) / lambda;
        (top_surcharge_kpa * decay + asymptote * (1.0 - decay)).max(0.0)
    };

    debug!(
        half_width_m,
        silo_height_m,
        surcharge_height_m,
        lambda,
        sigma_v_kpa,
        "silo crown stress"
    );

    SiloResult {
        half_width_m,
        face_phi_deg,
        height_limit_m,
        silo_height_m,
        surcharge_height_m,
        lambda,
        user_surcharge_kpa: surcharge_kpa,
        top_surcharge_kpa,
        averages,
        sigma_v_kpa,
    }
}
