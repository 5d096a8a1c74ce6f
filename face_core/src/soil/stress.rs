//! Vertical effective stress from surcharge and layered self-weight.

use super::{PropertyBound, SoilProfile};

/// Effective vertical stress σ'_v (kN/m²) at `depth_m`.
///
/// Sums the surface surcharge and the weight of every layer slice between the
/// surface and `depth_m`, using bulk unit weights above the water table and
/// submerged weights below it. Returns `surcharge_kpa` unchanged for
/// `depth_m <= 0`.
///
/// # Example
///
/// ```
/// use face_core::soil::{vertical_effective_stress, PropertyBound, SoilLayer, SoilProfile};
///
/// let sand = SoilLayer::new("Sand", 100.0, 19.0, 9.0, 30.0, 5.0);
/// let profile = SoilProfile::homogeneous(sand).unwrap();
/// let sigma = vertical_effective_stress(15.0, 0.0, 5.0, &profile, PropertyBound::Max);
/// assert!((sigma - 185.0).abs() < 1e-9); // 5·19 + 10·9
/// ```
pub fn vertical_effective_stress(
    depth_m: f64,
    surcharge_kpa: f64,
    water_depth_m: f64,
    profile: &SoilProfile,
    bound: PropertyBound,
) -> f64 {
    if depth_m <= 0.0 {
        return surcharge_kpa;
    }
    surcharge_kpa
        + profile
            .slices(0.0, depth_m)
            .map(|slice| slice.effective_weight(water_depth_m, bound))
            .sum::<f64>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::soil::tests::sample_profile;
    use crate::soil::SoilLayer;

    #[test]
    fn test_surface_returns_surcharge() {
        let profile = sample_profile();
        assert_eq!(vertical_effective_stress(0.0, 20.0, 3.0, &profile, PropertyBound::Max), 20.0);
        assert_eq!(vertical_effective_stress(-1.0, 20.0, 3.0, &profile, PropertyBound::Min), 20.0);
    }

    #[test]
    fn test_layered_stress_with_water_table_inside_layer() {
        let profile = sample_profile();
        // Sand 0-5 (water at 3): 3·18 + 2·8, Clay 5-15: 10·9, Rock 15-20: 5·10
        let sigma = vertical_effective_stress(20.0, 10.0, 3.0, &profile, PropertyBound::Max);
        let expected = 10.0 + 3.0 * 18.0 + 2.0 * 8.0 + 10.0 * 9.0 + 5.0 * 10.0;
        assert!((sigma - expected).abs() < 1e-9);
    }

    #[test]
    fn test_min_bound_uses_lower_weights() {
        let profile = sample_profile();
        let max = vertical_effective_stress(15.0, 0.0, 5.0, &profile, PropertyBound::Max);
        let min = vertical_effective_stress(15.0, 0.0, 5.0, &profile, PropertyBound::Min);
        assert!((max - (5.0 * 18.0 + 10.0 * 9.0)).abs() < 1e-9);
        assert!((min - (5.0 * 17.0 + 10.0 * 8.0)).abs() < 1e-9);
    }

    #[test]
    fn test_below_last_layer_extends_it() {
        let silt = SoilLayer::new("Silt", 10.0, 20.0, 10.0, 28.0, 0.0);
        let profile = SoilProfile::homogeneous(silt).unwrap();
        let sigma = vertical_effective_stress(25.0, 0.0, 100.0, &profile, PropertyBound::Max);
        assert!((sigma - 500.0).abs() < 1e-9);
    }

    #[test]
    fn test_stress_is_repeatable() {
        let profile = sample_profile();
        let a = vertical_effective_stress(17.3, 12.0, 4.2, &profile, PropertyBound::Max);
        let b = vertical_effective_stress(17.3, 12.0, 4.2, &profile, PropertyBound::Max);
        assert_eq!(a.to_bits(), b.to_bits());
    }
}
