//! # Stratigraphy Averaging
//!
//! Weighted soil properties over a window through the layered profile. The
//! face support analysis uses three weighting rules:
//!
//! | Operation | Window | Weight |
//! |-----------|--------|--------|
//! | [`column_averages`] | `[0, Z]` | slice height |
//! | [`base_properties`] / [`face_friction_angle`] | `[t, t + D]` | slice height |
//! | [`side_properties`] | wedge trapezoid below the crown | slab area |
//!
//! The wedge side face is a trapezoid whose width tapers linearly from `D` at
//! the crown to zero at the invert. The area of a horizontal slab between
//! relative heights `h_a` and `h_b` below the crown is `A(h_b) - A(h_a)` with
//! `A(h) = D·h - h²/2`.
//!
//! When a window collects (almost) no measure, the layer containing the
//! window centre is used instead.

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{PropertyBound, SoilLayer, SoilProfile};

/// Below this accumulated height/area a window is treated as empty.
const MIN_MEASURE: f64 = 1e-6;

/// Height-weighted properties of the soil column between the surface and a depth.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ColumnAverages {
    /// Effective unit weight: bulk above the water table, submerged below (kN/m³)
    pub gamma_eff: f64,
    /// Cohesion (kN/m²)
    pub c_kpa: f64,
    /// Friction angle (degrees)
    pub phi_deg: f64,
}

/// Friction and cohesion acting on the wedge's sliding base.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BaseProperties {
    pub phi_deg: f64,
    pub c_kpa: f64,
}

/// Area-weighted properties of the wedge's side faces.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SideProperties {
    /// Effective unit weight of the wedge body (kN/m³)
    pub gamma_eff: f64,
    pub phi_deg: f64,
    pub c_kpa: f64,
}

/// Height-weighted γ', c and φ over `[0, target_depth_m]`.
///
/// Returns the zero-valued result for `target_depth_m <= 0`.
///
/// # Example
///
/// ```
/// use face_core::soil::{column_averages, PropertyBound, SoilLayer, SoilProfile};
///
/// let sand = SoilLayer::new("Sand", 100.0, 19.0, 9.0, 30.0, 5.0);
/// let profile = SoilProfile::homogeneous(sand).unwrap();
/// let avg = column_averages(15.0, 5.0, &profile, PropertyBound::Max);
/// // (5·19 + 10·9) / 15
/// assert!((avg.gamma_eff - 185.0 / 15.0).abs() < 1e-9);
/// assert_eq!(avg.phi_deg, 30.0);
/// ```
pub fn column_averages(
    target_depth_m: f64,
    water_depth_m: f64,
    profile: &SoilProfile,
    bound: PropertyBound,
) -> ColumnAverages {
    if target_depth_m <= 0.0 {
        return ColumnAverages::default();
    }

    let mut weighted_gamma = 0.0;
    let mut weighted_c = 0.0;
    let mut weighted_phi = 0.0;
    let mut total_height = 0.0;

    for slice in profile.slices(0.0, target_depth_m) {
        let height = slice.thickness();
        weighted_gamma += slice.effective_weight(water_depth_m, bound);
        weighted_c += slice.layer.c_kpa * height;
        weighted_phi += slice.layer.phi_deg * height;
        total_height += height;
    }

    if total_height < MIN_MEASURE {
        let center = target_depth_m / 2.0;
        let layer = center_layer(profile, center, "column");
        return ColumnAverages {
            gamma_eff: layer.effective_unit_weight_at(center, water_depth_m, bound),
            c_kpa: layer.c_kpa,
            phi_deg: layer.phi_deg,
        };
    }

    ColumnAverages {
        gamma_eff: weighted_gamma / total_height,
        c_kpa: weighted_c / total_height,
        phi_deg: weighted_phi / total_height,
    }
}

/// Height-weighted friction angle over the tunnel face `[t, t + D]`.
///
/// Used for the Terzaghi silo width. Returns 0 for a non-positive diameter.
pub fn face_friction_angle(crown_depth_m: f64, diameter_m: f64, profile: &SoilProfile) -> f64 {
    if diameter_m <= 0.0 {
        return 0.0;
    }

    let (weighted_phi, total_height) = profile
        .slices(crown_depth_m, crown_depth_m + diameter_m)
        .fold((0.0, 0.0), |(phi, height), slice| {
            (phi + slice.layer.phi_deg * slice.thickness(), height + slice.thickness())
        });

    if total_height < MIN_MEASURE {
        return center_layer(profile, crown_depth_m + diameter_m / 2.0, "face").phi_deg;
    }
    weighted_phi / total_height
}

/// Height-weighted φ and c of the prism strip `[t, t + D]` under the wedge base.
pub fn base_properties(
    crown_depth_m: f64,
    diameter_m: f64,
    profile: &SoilProfile,
) -> BaseProperties {
    let mut weighted_phi = 0.0;
    let mut weighted_c = 0.0;
    let mut total_height = 0.0;

    for slice in profile.slices(crown_depth_m, crown_depth_m + diameter_m) {
        let height = slice.thickness();
        weighted_phi += slice.layer.phi_deg * height;
        weighted_c += slice.layer.c_kpa * height;
        total_height += height;
    }

    if total_height < MIN_MEASURE {
        let layer = center_layer(profile, crown_depth_m + diameter_m / 2.0, "base");
        return BaseProperties {
            phi_deg: layer.phi_deg,
            c_kpa: layer.c_kpa,
        };
    }

    BaseProperties {
        phi_deg: weighted_phi / total_height,
        c_kpa: weighted_c / total_height,
    }
}

/// Area-weighted γ', φ and c over the wedge's trapezoidal side face.
///
/// Unit weights always use the upper bound: the wedge weight is a driving force.
pub fn side_properties(
    crown_depth_m: f64,
    diameter_m: f64,
    water_depth_m: f64,
    profile: &SoilProfile,
) -> SideProperties {
    let area = |h: f64| diameter_m * h - 0.5 * h * h;
    let slab = |h_top: f64, h_bottom: f64| {
        if h_bottom > h_top {
            area(h_bottom) - area(h_top)
        } else {
            0.0
        }
    };
    let water_rel = water_depth_m - crown_depth_m;

    let mut weighted_gamma = 0.0;
    let mut weighted_phi = 0.0;
    let mut weighted_c = 0.0;
    let mut total_area = 0.0;

    for slice in profile.slices(crown_depth_m, crown_depth_m + diameter_m) {
        let h_top = slice.top_m - crown_depth_m;
        let h_bottom = slice.bottom_m - crown_depth_m;
        let weight = slab(h_top, h_bottom);

        weighted_phi += slice.layer.phi_deg * weight;
        weighted_c += slice.layer.c_kpa * weight;
        total_area += weight;

        let above = slab(h_top, h_bottom.min(water_rel));
        let below = slab(h_top.max(water_rel), h_bottom);
        weighted_gamma += slice.layer.gamma_max * above + slice.layer.gamma_prime_max * below;
    }

    if total_area <= MIN_MEASURE {
        let center = crown_depth_m + diameter_m / 2.0;
        let layer = center_layer(profile, center, "wedge side");
        return SideProperties {
            gamma_eff: layer.effective_unit_weight_at(center, water_depth_m, PropertyBound::Max),
            phi_deg: layer.phi_deg,
            c_kpa: layer.c_kpa,
        };
    }

    SideProperties {
        gamma_eff: weighted_gamma / total_area,
        phi_deg: weighted_phi / total_area,
        c_kpa: weighted_c / total_area,
    }
}

fn center_layer<'a>(profile: &'a SoilProfile, center_m: f64, window: &str) -> &'a SoilLayer {
    let layer = profile.layer_at(center_m);
    warn!(
        window,
        center_m,
        layer = %layer.name,
        "averaging window is empty, using layer at window centre"
    );
    layer
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::soil::tests::sample_profile;

    fn homogeneous() -> SoilProfile {
        SoilProfile::homogeneous(
            SoilLayer::new("Sand", 100.0, 19.0, 9.0, 30.0, 5.0).with_min_weights(18.0, 8.0),
        )
        .unwrap()
    }

    #[test]
    fn test_zero_window_is_zero() {
        let profile = sample_profile();
        let empty = ColumnAverages::default();
        assert_eq!(column_averages(0.0, 5.0, &profile, PropertyBound::Max), empty);
        assert_eq!(column_averages(-3.0, 5.0, &profile, PropertyBound::Max), empty);
        assert_eq!(face_friction_angle(10.0, 0.0, &profile), 0.0);
    }

    #[test]
    fn test_homogeneous_dry_column_returns_layer_properties() {
        let profile = homogeneous();
        for depth in [0.5, 7.0, 42.0, 150.0] {
            let avg = column_averages(depth, 200.0, &profile, PropertyBound::Max);
            assert!((avg.gamma_eff - 19.0).abs() < 1e-12);
            assert!((avg.phi_deg - 30.0).abs() < 1e-12);
            assert!((avg.c_kpa - 5.0).abs() < 1e-12);
        }
        let base = base_properties(15.0, 10.0, &profile);
        assert_eq!(base, BaseProperties { phi_deg: 30.0, c_kpa: 5.0 });
        let side = side_properties(15.0, 10.0, 200.0, &profile);
        assert!((side.gamma_eff - 19.0).abs() < 1e-12);
        assert!((side.phi_deg - 30.0).abs() < 1e-12);
        assert!((face_friction_angle(15.0, 10.0, &profile) - 30.0).abs() < 1e-12);
    }

    #[test]
    fn test_column_splits_at_water_table() {
        let profile = homogeneous();
        let avg = column_averages(15.0, 5.0, &profile, PropertyBound::Max);
        assert!((avg.gamma_eff - (5.0 * 19.0 + 10.0 * 9.0) / 15.0).abs() < 1e-12);

        let min = column_averages(15.0, 5.0, &profile, PropertyBound::Min);
        assert!((min.gamma_eff - (5.0 * 18.0 + 10.0 * 8.0) / 15.0).abs() < 1e-12);
    }

    #[test]
    fn test_column_layered_weights() {
        let profile = sample_profile();
        // Sand 0-5, Clay 5-12, dry
        let avg = column_averages(12.0, 50.0, &profile, PropertyBound::Max);
        assert!((avg.phi_deg - (5.0 * 30.0 + 7.0 * 32.0) / 12.0).abs() < 1e-12);
        assert!((avg.c_kpa - (7.0 * 5.0) / 12.0).abs() < 1e-12);
        assert!((avg.gamma_eff - (5.0 * 18.0 + 7.0 * 19.0) / 12.0).abs() < 1e-12);
    }

    #[test]
    fn test_column_beyond_last_layer_extends_it() {
        let profile = sample_profile();
        let avg = column_averages(40.0, 100.0, &profile, PropertyBound::Max);
        let expected_phi = (5.0 * 30.0 + 10.0 * 32.0 + 25.0 * 35.0) / 40.0;
        assert!((avg.phi_deg - expected_phi).abs() < 1e-12);
    }

    #[test]
    fn test_base_properties_height_weighted() {
        let profile = sample_profile();
        // Face 10-20: Clay 10-15, Rock 15-20
        let base = base_properties(10.0, 10.0, &profile);
        assert!((base.phi_deg - 33.5).abs() < 1e-12);
        assert!((base.c_kpa - 7.5).abs() < 1e-12);
    }

    #[test]
    fn test_side_properties_area_weighted() {
        let profile = sample_profile();
        // Clay occupies h in [0, 5]: A = 10·5 - 12.5 = 37.5 of total 50
        let side = side_properties(10.0, 10.0, 100.0, &profile);
        let expected_phi = (37.5 * 32.0 + 12.5 * 35.0) / 50.0;
        assert!((side.phi_deg - expected_phi).abs() < 1e-12);
        let expected_gamma = (37.5 * 19.0 + 12.5 * 20.0) / 50.0;
        assert!((side.gamma_eff - expected_gamma).abs() < 1e-12);

        // Area weighting favours the upper part, height weighting does not
        let base = base_properties(10.0, 10.0, &profile);
        assert!(side.phi_deg < base.phi_deg);
    }

    #[test]
    fn test_side_properties_water_table_inside_face() {
        let profile = homogeneous();
        // Water at mid-face: above area 10·5 - 12.5 = 37.5, below 12.5
        let side = side_properties(10.0, 10.0, 15.0, &profile);
        let expected = (37.5 * 19.0 + 12.5 * 9.0) / 50.0;
        assert!((side.gamma_eff - expected).abs() < 1e-12);
    }

    #[test]
    fn test_zero_diameter_falls_back_to_center_layer() {
        let profile = sample_profile();
        let base = base_properties(10.0, 0.0, &profile);
        assert_eq!(base, BaseProperties { phi_deg: 32.0, c_kpa: 5.0 });

        let side = side_properties(10.0, 0.0, 5.0, &profile);
        assert_eq!(side.gamma_eff, 9.0); // centre below water table
        assert_eq!(side.phi_deg, 32.0);

        let side_deep = side_properties(60.0, 0.0, 100.0, &profile);
        assert_eq!(side_deep.gamma_eff, 20.0); // beyond all layers: last layer, dry
    }
}
