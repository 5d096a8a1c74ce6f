//! # Safety Checks
//!
//! Checks applied to each support pressure scenario:
//!
//! - [`blowout_check`] - the operational pressure must not lift the overburden
//! - [`ingress_check`] - the support pressure must hold back the pore water

use serde::{Deserialize, Serialize};

use crate::units::water_pressure_kpa;

/// Share of the minimum total overburden stress available against blow-out.
pub const BLOWOUT_ALLOWABLE_FACTOR: f64 = 0.9;

/// Blow-out (uplift) check at the crown. Pressures in kN/m².
///
/// ## JSON Example
///
/// ```json
/// {
///   "sigma_v_crown_min_kpa": 275.0,
///   "allowable_kpa": 247.5,
///   "required_kpa": 230.4,
///   "eta": 1.074,
///   "passed": true
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlowoutCheck {
    /// Minimum total vertical stress at the crown, σ'v,min + p_w
    pub sigma_v_crown_min_kpa: f64,

    /// 0.9 · σv,min
    pub allowable_kpa: f64,

    /// Operational pressure plus the pressure deviation ΔP
    pub required_kpa: f64,

    /// allowable / required; infinite when nothing is required
    pub eta: f64,

    pub passed: bool,
}

/// Compare the upper operational support pressure with the overburden.
///
/// `min_crown_stress_kpa` is σ'v at the crown with lower-bound unit weights
/// and permanent surcharge only.
///
/// # Example
///
/// ```
/// use face_core::calculations::safety::blowout_check;
///
/// let check = blowout_check(15.0, 175.0, 5.0, 200.0, 10.0);
/// assert!((check.allowable_kpa - 247.5).abs() < 1e-9);
/// assert!(check.passed);
/// ```
pub fn blowout_check(
    crown_depth_m: f64,
    min_crown_stress_kpa: f64,
    water_depth_m: f64,
    operational_crown_kpa: f64,
    delta_p_kpa: f64,
) -> BlowoutCheck {
    let sigma_v_crown_min_kpa =
        min_crown_stress_kpa + water_pressure_kpa(crown_depth_m, water_depth_m);
    let allowable_kpa = BLOWOUT_ALLOWABLE_FACTOR * sigma_v_crown_min_kpa;
    let required_kpa = operational_crown_kpa + delta_p_kpa;
    let eta = if required_kpa > 0.0 {
        allowable_kpa / required_kpa
    } else {
        f64::INFINITY
    };

    BlowoutCheck {
        sigma_v_crown_min_kpa,
        allowable_kpa,
        required_kpa,
        eta,
        passed: allowable_kpa >= required_kpa,
    }
}

/// Water ingress check at one depth of the face. Pressures in kN/m².
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IngressCheck {
    pub depth_m: f64,

    /// Factored pore water pressure p_w · ηW
    pub required_kpa: f64,

    /// Minimum support pressure at this depth
    pub provided_kpa: f64,

    /// provided / required; infinite above the water table
    pub eta: f64,

    pub passed: bool,
}

/// Check the minimum support pressure against the factored water pressure.
pub fn ingress_check(
    depth_m: f64,
    water_depth_m: f64,
    support_min_kpa: f64,
    eta_w: f64,
) -> IngressCheck {
    let required_kpa = water_pressure_kpa(depth_m, water_depth_m) * eta_w;
    let eta = if required_kpa <= 1e-6 {
        f64::INFINITY
    } else {
        support_min_kpa / required_kpa
    };

    IngressCheck {
        depth_m,
        required_kpa,
        provided_kpa: support_min_kpa,
        eta,
        passed: eta >= 1.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blowout_adds_delta_p_to_operational() {
        // σ'v,min 175 + p_w 100 = 275, allowable 247.5
        let check = blowout_check(15.0, 175.0, 5.0, 230.0, 10.0);
        assert!((check.sigma_v_crown_min_kpa - 275.0).abs() < 1e-9);
        assert!((check.required_kpa - 240.0).abs() < 1e-9);
        assert!((check.eta - 247.5 / 240.0).abs() < 1e-12);
        assert!(check.passed);
    }

    #[test]
    fn test_blowout_fails_for_shallow_cover() {
        let check = blowout_check(3.0, 50.0, 10.0, 80.0, 10.0);
        assert!((check.allowable_kpa - 45.0).abs() < 1e-9);
        assert!(!check.passed);
        assert!(check.eta < 1.0);
    }

    #[test]
    fn test_blowout_without_required_pressure() {
        let check = blowout_check(10.0, 100.0, 20.0, 0.0, 0.0);
        assert!(check.eta.is_infinite());
        assert!(check.passed);
    }

    #[test]
    fn test_ingress_check() {
        // p_w at 20 m with water at 5 m: 150 kPa, factored 157.5
        let check = ingress_check(20.0, 5.0, 160.0, 1.05);
        assert!((check.required_kpa - 157.5).abs() < 1e-9);
        assert!(check.passed);

        let check = ingress_check(20.0, 5.0, 150.0, 1.05);
        assert!(!check.passed);
    }

    #[test]
    fn test_ingress_above_water_table_always_passes() {
        let check = ingress_check(10.0, 12.0, 0.0, 1.05);
        assert_eq!(check.required_kpa, 0.0);
        assert!(check.eta.is_infinite());
        assert!(check.passed);
    }
}
