//! # Face Forces
//!
//! Earth and water forces on the tunnel face and the total required
//! stabilization force `S_ci = ηE·E_ci + ηW·W_ci`.
//!
//! The wedge model works on a square D × D face; the circular face is obtained
//! by the area ratio π/4. Water forces on a partially submerged circular face
//! are integrated numerically over horizontal strips because the chord width
//! varies non-linearly with depth.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::units::water_pressure_kpa;

/// Area of a circle relative to its circumscribed square.
pub const CIRCULAR_FACE_FACTOR: f64 = PI / 4.0;

/// Number of horizontal strips used to integrate water pressure on the face.
pub const WATER_FORCE_STRIPS: usize = 200;

/// Area of the circular tunnel face (m²)
pub fn face_area_m2(diameter_m: f64) -> f64 {
    PI * diameter_m * diameter_m / 4.0
}

/// Water force on the square D × D face, W_re (kN).
///
/// Mean of crown and invert pore pressure times D².
pub fn water_force_square(diameter_m: f64, crown_depth_m: f64, water_depth_m: f64) -> f64 {
    let p_crown = water_pressure_kpa(crown_depth_m, water_depth_m);
    let p_invert = water_pressure_kpa(crown_depth_m + diameter_m, water_depth_m);
    (p_crown + p_invert) / 2.0 * diameter_m * diameter_m
}

/// Water force on the circular face by strip integration, W_ci (kN).
///
/// Zero when the water table is at or below the invert.
pub fn water_force_circular(diameter_m: f64, crown_depth_m: f64, water_depth_m: f64) -> f64 {
    if water_depth_m >= crown_depth_m + diameter_m {
        return 0.0;
    }
    let radius = diameter_m / 2.0;
    let center_depth = crown_depth_m + radius;
    let strip = diameter_m / WATER_FORCE_STRIPS as f64;

    (0..WATER_FORCE_STRIPS)
        .map(|i| {
            let y = -radius + (i as f64 + 0.5) * strip;
            let pressure = water_pressure_kpa(center_depth - y, water_depth_m);
            let width = 2.0 * (radius * radius - y * y).max(0.0).sqrt();
            pressure * width * strip
        })
        .sum()
}

/// Aggregated face forces (kN).
///
/// ## JSON Example
///
/// ```json
/// {
///   "e_max_re_kn": 4861.6,
///   "e_max_ci_kn": 3818.3,
///   "w_re_kn": 0.0,
///   "w_ci_kn": 11781.0,
///   "s_ci_kn": 18097.5,
///   "face_area_m2": 78.54
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FaceForces {
    /// Critical earth force on the square face
    pub e_max_re_kn: f64,

    /// Earth force on the circular face, E_max,re·π/4
    pub e_max_ci_kn: f64,

    /// Water force on the square face (0 when the water table is below the crown)
    pub w_re_kn: f64,

    /// Water force on the circular face
    pub w_ci_kn: f64,

    /// Required stabilization force ηE·E_ci + ηW·W_ci
    pub s_ci_kn: f64,

    /// Circular face area πD²/4 (m²)
    pub face_area_m2: f64,
}

impl FaceForces {
    /// Mean earth pressure over the circular face (kN/m²)
    pub fn mean_earth_pressure_kpa(&self) -> f64 {
        if self.face_area_m2 > 0.0 {
            self.e_max_ci_kn / self.face_area_m2
        } else {
            0.0
        }
    }

    /// Mean required stabilization pressure S_ci / A (kN/m²)
    pub fn mean_support_pressure_kpa(&self) -> f64 {
        if self.face_area_m2 > 0.0 {
            self.s_ci_kn / self.face_area_m2
        } else {
            0.0
        }
    }
}

/// Combine the critical wedge force with the water force on the face.
///
/// With the water table at or above the crown the whole face is submerged and
/// the square-face trapezoid scaled by π/4 is exact; otherwise the circular
/// face is integrated strip by strip.
pub fn aggregate_forces(
    diameter_m: f64,
    crown_depth_m: f64,
    water_depth_m: f64,
    e_max_re_kn: f64,
    eta_e: f64,
    eta_w: f64,
) -> FaceForces {
    let e_max_ci_kn = e_max_re_kn * CIRCULAR_FACE_FACTOR;

    let (w_re_kn, w_ci_kn) = if water_depth_m > crown_depth_m {
        (0.0, water_force_circular(diameter_m, crown_depth_m, water_depth_m))
    } else {
        let w_re = water_force_square(diameter_m, crown_depth_m, water_depth_m);
        (w_re, w_re * CIRCULAR_FACE_FACTOR)
    };

    FaceForces {
        e_max_re_kn,
        e_max_ci_kn,
        w_re_kn,
        w_ci_kn,
        s_ci_kn: eta_e * e_max_ci_kn + eta_w * w_ci_kn,
        face_area_m2: face_area_m2(diameter_m),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_square_water_force() {
        // crown 10 m below water table, invert 20 m: mean 150 kPa
        let w = water_force_square(10.0, 15.0, 5.0);
        assert!((w - 150.0 * 100.0).abs() < 1e-9);
        assert_eq!(water_force_square(10.0, 15.0, 40.0), 0.0);
    }

    #[test]
    fn test_circular_matches_square_when_submerged() {
        for (d, t, hw) in [(10.0, 15.0, 2.0), (10.0, 15.0, 15.0), (6.0, 20.0, 0.0)] {
            let circular = water_force_circular(d, t, hw);
            let square = water_force_square(d, t, hw) * CIRCULAR_FACE_FACTOR;
            assert!((circular - square).abs() / square < 1e-3);
        }
    }

    #[test]
    fn test_dry_face_has_no_water_force() {
        assert_eq!(water_force_circular(10.0, 15.0, 25.0), 0.0);
        assert_eq!(water_force_circular(10.0, 15.0, 40.0), 0.0);
        let forces = aggregate_forces(10.0, 15.0, 40.0, 1000.0, 1.5, 1.05);
        assert_eq!(forces.w_ci_kn, 0.0);
        assert_eq!(forces.w_re_kn, 0.0);
    }

    #[test]
    fn test_partially_submerged_face_is_below_trapezoid() {
        // Water table at mid-face: only the lower half is loaded
        let circular = water_force_circular(10.0, 15.0, 20.0);
        let square = water_force_square(10.0, 15.0, 20.0) * CIRCULAR_FACE_FACTOR;
        assert!(circular > 0.0);
        assert!(circular < square);
    }

    #[test]
    fn test_aggregate_forces() {
        let forces = aggregate_forces(10.0, 15.0, 5.0, 4000.0, 1.5, 1.05);
        assert!((forces.e_max_ci_kn - 4000.0 * PI / 4.0).abs() < 1e-9);
        assert!((forces.w_re_kn - 15000.0).abs() < 1e-9);
        assert!((forces.w_ci_kn - 15000.0 * PI / 4.0).abs() < 1e-9);
        let expected = 1.5 * forces.e_max_ci_kn + 1.05 * forces.w_ci_kn;
        assert!((forces.s_ci_kn - expected).abs() < 1e-9);
        assert!((forces.face_area_m2 - 25.0 * PI).abs() < 1e-12);
        assert!((forces.mean_earth_pressure_kpa() - 4000.0 / 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_diameter_is_finite() {
        let forces = aggregate_forces(0.0, 15.0, 5.0, 0.0, 1.5, 1.05);
        assert_eq!(forces.s_ci_kn, 0.0);
        assert_eq!(forces.mean_support_pressure_kpa(), 0.0);
        assert_eq!(water_force_circular(0.0, 15.0, 20.0), 0.0);
    }
}
