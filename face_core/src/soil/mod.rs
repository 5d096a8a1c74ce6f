//! # Soil Profile
//!
//! Layered ground model used by every face support calculation.
//!
//! - [`SoilLayer`] - one stratum with unit weights, friction angle and cohesion
//! - [`SoilProfile`] - validated, ordered sequence of layers (semi-infinite)
//! - [`PropertyBound`] - selects upper or lower characteristic unit weights
//! - [`averaging`] - height- and area-weighted property averages
//! - [`stress`] - vertical effective stress integration
//!
//! Layer depths are cumulative from the ground surface: the top of layer *i*
//! is the bottom of layer *i-1*, the first layer starts at 0. Everything below
//! the last layer's bottom inherits the last layer's properties.
//!
//! # Example
//!
//! ```
//! use face_core::soil::{SoilLayer, SoilProfile};
//!
//! let profile = SoilProfile::new(vec![
//!     SoilLayer::new("Sand", 5.0, 18.0, 8.0, 30.0, 0.0),
//!     SoilLayer::new("Clay", 15.0, 19.0, 9.0, 32.0, 5.0),
//! ])
//! .unwrap();
//!
//! assert_eq!(profile.layer_at(7.5).name, "Clay");
//! assert_eq!(profile.layer_at(40.0).name, "Clay"); // semi-infinite
//! ```

pub mod averaging;
pub mod stress;

pub use averaging::{
    base_properties, column_averages, face_friction_angle, side_properties, BaseProperties,
    ColumnAverages, SideProperties,
};
pub use stress::vertical_effective_stress;

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Thickness of a layer added by [`SoilProfile::with_layer_appended`] (m)
pub const NEW_LAYER_THICKNESS_M: f64 = 5.0;

/// Gap kept below an edited layer bottom when the next layer is pushed down (m)
pub const MIN_LAYER_GAP_M: f64 = 0.1;

/// Which characteristic unit weights to use.
///
/// Upper-bound weights are destabilizing (they maximize the load on the
/// wedge), lower-bound weights are used where a small overburden is critical
/// (blow-out).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PropertyBound {
    /// `gamma_max` / `gamma_prime_max`
    #[default]
    Max,
    /// `gamma_min` / `gamma_prime_min`, falling back to the max values when unset
    Min,
}

/// A single soil stratum.
///
/// ## JSON Example
///
/// ```json
/// {
///   "name": "Clay",
///   "depth_bottom_m": 15.0,
///   "gamma_max": 19.0,
///   "gamma_min": 18.0,
///   "gamma_prime_max": 9.0,
///   "gamma_prime_min": 8.0,
///   "phi_deg": 32.0,
///   "c_kpa": 5.0
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoilLayer {
    /// Layer label (e.g., "Sand", "Glacial Till")
    pub name: String,

    /// Depth of the layer bottom below ground surface (m)
    #[serde(alias = "depth")]
    pub depth_bottom_m: f64,

    /// Bulk unit weight above the water table, upper bound (kN/m³)
    pub gamma_max: f64,

    /// Bulk unit weight above the water table, lower bound (kN/m³)
    #[serde(default)]
    pub gamma_min: Option<f64>,

    /// Submerged unit weight below the water table, upper bound (kN/m³)
    pub gamma_prime_max: f64,

    /// Submerged unit weight below the water table, lower bound (kN/m³)
    #[serde(default)]
    pub gamma_prime_min: Option<f64>,

    /// Effective friction angle φ' (degrees)
    #[serde(alias = "phi")]
    pub phi_deg: f64,

    /// Effective cohesion c' (kN/m²)
    #[serde(alias = "c")]
    pub c_kpa: f64,
}

impl SoilLayer {
    /// Create a layer with upper-bound unit weights only.
    pub fn new(
        name: impl Into<String>,
        depth_bottom_m: f64,
        gamma: f64,
        gamma_prime: f64,
        phi_deg: f64,
        c_kpa: f64,
    ) -> Self {
        SoilLayer {
            name: name.into(),
            depth_bottom_m,
            gamma_max: gamma,
            gamma_min: None,
            gamma_prime_max: gamma_prime,
            gamma_prime_min: None,
            phi_deg,
            c_kpa,
        }
    }

    /// Set lower-bound unit weights (builder pattern)
    pub fn with_min_weights(mut self, gamma_min: f64, gamma_prime_min: f64) -> Self {
        self.gamma_min = Some(gamma_min);
        self.gamma_prime_min = Some(gamma_prime_min);
        self
    }

    /// Unit weight above the water table for the given bound (kN/m³)
    pub fn unit_weight(&self, bound: PropertyBound) -> f64 {
        match bound {
            PropertyBound::Max => self.gamma_max,
            PropertyBound::Min => or_max(self.gamma_min, self.gamma_max),
        }
    }

    /// Submerged unit weight below the water table for the given bound (kN/m³)
    pub fn submerged_unit_weight(&self, bound: PropertyBound) -> f64 {
        match bound {
            PropertyBound::Max => self.gamma_prime_max,
            PropertyBound::Min => or_max(self.gamma_prime_min, self.gamma_prime_max),
        }
    }

    /// Effective unit weight at a depth: bulk above the water table, submerged below.
    pub fn effective_unit_weight_at(
        &self,
        depth_m: f64,
        water_depth_m: f64,
        bound: PropertyBound,
    ) -> f64 {
        if depth_m > water_depth_m {
            self.submerged_unit_weight(bound)
        } else {
            self.unit_weight(bound)
        }
    }

    fn validate(&self, index: usize) -> CalcResult<()> {
        let field = |name: &str| format!("layers[{}].{}", index, name);
        if !self.depth_bottom_m.is_finite() || self.depth_bottom_m <= 0.0 {
            return Err(CalcError::invalid_input(
                field("depth_bottom_m"),
                self.depth_bottom_m.to_string(),
                "Layer bottom must be a positive depth",
            ));
        }
        for (name, value) in [
            ("gamma_max", Some(self.gamma_max)),
            ("gamma_min", self.gamma_min),
            ("gamma_prime_max", Some(self.gamma_prime_max)),
            ("gamma_prime_min", self.gamma_prime_min),
        ] {
            if let Some(v) = value {
                if !v.is_finite() || v < 0.0 {
                    return Err(CalcError::invalid_input(
                        field(name),
                        v.to_string(),
                        "Unit weight cannot be negative",
                    ));
                }
            }
        }
        if !(0.0..90.0).contains(&self.phi_deg) {
            return Err(CalcError::invalid_input(
                field("phi_deg"),
                self.phi_deg.to_string(),
                "Friction angle must be between 0 and 90 degrees",
            ));
        }
        if !self.c_kpa.is_finite() || self.c_kpa < 0.0 {
            return Err(CalcError::invalid_input(
                field("c_kpa"),
                self.c_kpa.to_string(),
                "Cohesion cannot be negative",
            ));
        }
        Ok(())
    }
}

// An unset or zero lower bound falls back to the upper bound.
fn or_max(min: Option<f64>, max: f64) -> f64 {
    match min {
        Some(v) if v > 0.0 => v,
        _ => max,
    }
}

/// Validated, ordered soil profile.
///
/// Guaranteed non-empty with strictly increasing layer bottoms. Serializes as
/// a plain array of layers; deserialization runs the same validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<SoilLayer>", into = "Vec<SoilLayer>")]
pub struct SoilProfile {
    layers: Vec<SoilLayer>,
}

impl SoilProfile {
    /// Build a profile from layers ordered top to bottom.
    ///
    /// # Errors
    ///
    /// `CalcError::InvalidInput` if the sequence is empty, depths are not
    /// strictly increasing, or any layer property is out of range.
    pub fn new(layers: Vec<SoilLayer>) -> CalcResult<Self> {
        if layers.is_empty() {
            return Err(CalcError::invalid_input(
                "layers",
                "[]",
                "Soil profile needs at least one layer",
            ));
        }
        let mut previous_bottom = 0.0;
        for (index, layer) in layers.iter().enumerate() {
            layer.validate(index)?;
            if layer.depth_bottom_m <= previous_bottom {
                return Err(CalcError::invalid_input(
                    format!("layers[{}].depth_bottom_m", index),
                    layer.depth_bottom_m.to_string(),
                    format!("Layer bottom must be deeper than {} m", previous_bottom),
                ));
            }
            previous_bottom = layer.depth_bottom_m;
        }
        Ok(SoilProfile { layers })
    }

    /// Single homogeneous layer down to `depth_bottom_m` (and beyond).
    pub fn homogeneous(layer: SoilLayer) -> CalcResult<Self> {
        SoilProfile::new(vec![layer])
    }

    /// Layers ordered top to bottom
    pub fn layers(&self) -> &[SoilLayer] {
        &self.layers
    }

    /// Number of layers (always ≥ 1)
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Always false for a constructed profile.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// The deepest defined layer, which extends indefinitely.
    pub fn last(&self) -> &SoilLayer {
        // non-empty by construction
        &self.layers[self.layers.len() - 1]
    }

    /// Depth of the top of layer `index` (m)
    pub fn layer_top(&self, index: usize) -> f64 {
        if index == 0 {
            0.0
        } else {
            self.layers[index - 1].depth_bottom_m
        }
    }

    /// Layer whose depth range contains `depth_m`; the last layer beyond the profile.
    pub fn layer_at(&self, depth_m: f64) -> &SoilLayer {
        self.layers
            .iter()
            .find(|layer| depth_m <= layer.depth_bottom_m)
            .unwrap_or_else(|| self.last())
    }

    /// Copy of this profile with a new layer appended below the last one.
    ///
    /// The new layer repeats the last layer's properties and is
    /// [`NEW_LAYER_THICKNESS_M`] thick.
    pub fn with_layer_appended(&self) -> SoilProfile {
        let last = self.last();
        let mut layers = self.layers.clone();
        layers.push(SoilLayer {
            name: "New Layer".to_string(),
            depth_bottom_m: last.depth_bottom_m + NEW_LAYER_THICKNESS_M,
            ..last.clone()
        });
        SoilProfile { layers }
    }

    /// Copy of this profile without layer `index`.
    ///
    /// # Errors
    ///
    /// `CalcError::InvalidInput` for an index out of range or when the
    /// profile has a single layer.
    pub fn without_layer(&self, index: usize) -> CalcResult<SoilProfile> {
        self.check_index(index)?;
        if self.layers.len() == 1 {
            return Err(CalcError::invalid_input(
                "layers",
                index.to_string(),
                "Soil profile needs at least one layer",
            ));
        }
        let mut layers = self.layers.clone();
        layers.remove(index);
        SoilProfile::new(layers)
    }

    /// Copy of this profile with the bottom of layer `index` moved to `depth_bottom_m`.
    ///
    /// If the new bottom reaches the next layer's bottom, that layer is pushed
    /// down to [`MIN_LAYER_GAP_M`] below it. The result is validated again.
    pub fn with_layer_depth(&self, index: usize, depth_bottom_m: f64) -> CalcResult<SoilProfile> {
        self.check_index(index)?;
        let mut layers = self.layers.clone();
        layers[index].depth_bottom_m = depth_bottom_m;
        if let Some(next) = layers.get_mut(index + 1) {
            if depth_bottom_m >= next.depth_bottom_m {
                next.depth_bottom_m = depth_bottom_m + MIN_LAYER_GAP_M;
            }
        }
        SoilProfile::new(layers)
    }

    fn check_index(&self, index: usize) -> CalcResult<()> {
        if index >= self.layers.len() {
            return Err(CalcError::invalid_input(
                "layers",
                index.to_string(),
                format!("Layer index out of range (profile has {} layers)", self.layers.len()),
            ));
        }
        Ok(())
    }

    /// Intersect the window `[top_m, bottom_m]` with every layer, top down.
    ///
    /// The traversal starts at the surface and stops as soon as a layer begins
    /// below the window. The last layer is treated as unbounded, so the slices
    /// always cover the full window.
    pub fn slices(&self, top_m: f64, bottom_m: f64) -> LayerSlices<'_> {
        LayerSlices {
            layers: &self.layers,
            next: 0,
            layer_top: 0.0,
            top_m: top_m.max(0.0),
            bottom_m,
        }
    }
}

impl TryFrom<Vec<SoilLayer>> for SoilProfile {
    type Error = CalcError;

    fn try_from(layers: Vec<SoilLayer>) -> Result<Self, Self::Error> {
        SoilProfile::new(layers)
    }
}

impl From<SoilProfile> for Vec<SoilLayer> {
    fn from(profile: SoilProfile) -> Self {
        profile.layers
    }
}

/// Part of one layer that falls inside an averaging window.
#[derive(Debug, Clone, Copy)]
pub struct LayerSlice<'a> {
    pub layer: &'a SoilLayer,
    pub top_m: f64,
    pub bottom_m: f64,
}

impl LayerSlice<'_> {
    pub fn thickness(&self) -> f64 {
        self.bottom_m - self.top_m
    }

    /// Split the slice at the water table into (above, below) thicknesses.
    pub fn split_at_water_table(&self, water_depth_m: f64) -> (f64, f64) {
        let above = (self.bottom_m.min(water_depth_m) - self.top_m).max(0.0);
        let below = (self.bottom_m - self.top_m.max(water_depth_m)).max(0.0);
        (above, below)
    }

    /// Self-weight of the slice per unit area (kN/m²).
    pub fn effective_weight(&self, water_depth_m: f64, bound: PropertyBound) -> f64 {
        let (above, below) = self.split_at_water_table(water_depth_m);
        self.layer.unit_weight(bound) * above + self.layer.submerged_unit_weight(bound) * below
    }
}

/// Iterator returned by [`SoilProfile::slices`].
pub struct LayerSlices<'a> {
    layers: &'a [SoilLayer],
    next: usize,
    layer_top: f64,
    top_m: f64,
    bottom_m: f64,
}

impl<'a> Iterator for LayerSlices<'a> {
    type Item = LayerSlice<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.next < self.layers.len() {
            let layer = &self.layers[self.next];
            let layer_top = self.layer_top;
            let layer_bottom = if self.next + 1 == self.layers.len() {
                f64::INFINITY
            } else {
                layer.depth_bottom_m
            };
            self.next += 1;
            self.layer_top = layer_bottom;

            if layer_top >= self.bottom_m {
                self.next = self.layers.len();
                return None;
            }

            let top_m = self.top_m.max(layer_top);
            let bottom_m = self.bottom_m.min(layer_bottom);
            if bottom_m > top_m {
                return Some(LayerSlice { layer, top_m, bottom_m });
            }
        }
        None
    }
}
