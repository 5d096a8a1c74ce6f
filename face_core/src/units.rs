//! # Unit Types
//!
//! Lightweight newtype wrappers for the few places where unit confusion is
//! easy: angles (soil parameters are entered in degrees, trigonometry wants
//! radians) and pressures (the engine works in kN/m², TBM operators read bar).
//!
//! ## SI Units (Primary)
//!
//! Everything else in face_core is a plain `f64` with the unit in the field name:
//! - Length: meters (`_m`)
//! - Stress / pressure: kN/m² = kPa (`_kpa`)
//! - Unit weight: kN/m³
//! - Force: kN (per wedge or per face)
//!
//! ## Example
//!
//! ```rust
//! use face_core::units::{Bar, Degrees, KiloPascals};
//!
//! let phi = Degrees(30.0);
//! assert!((phi.tan() - 0.5774).abs() < 1e-4);
//!
//! let support: Bar = KiloPascals(250.0).into();
//! assert!((support.0 - 2.5).abs() < 1e-12);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

/// Unit weight of water γ_w in kN/m³
pub const UNIT_WEIGHT_WATER: f64 = 10.0;

// ============================================================================
// Angle Units
// ============================================================================

/// Angle in degrees
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Degrees(pub f64);

impl Degrees {
    /// Angle in radians
    pub fn radians(self) -> f64 {
        self.0.to_radians()
    }

    pub fn sin(self) -> f64 {
        self.radians().sin()
    }

    pub fn cos(self) -> f64 {
        self.radians().cos()
    }

    pub fn tan(self) -> f64 {
        self.radians().tan()
    }
}

// ============================================================================
// Pressure Units
// ============================================================================

/// Pressure in kilopascals (kN/m²)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KiloPascals(pub f64);

/// Pressure in bar (1 bar = 100 kPa)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Bar(pub f64);

impl From<KiloPascals> for Bar {
    fn from(kpa: KiloPascals) -> Self {
        Bar(kpa.0 / 100.0)
    }
}

impl From<Bar> for KiloPascals {
    fn from(bar: Bar) -> Self {
        KiloPascals(bar.0 * 100.0)
    }
}

// ============================================================================
// Arithmetic Operations
// ============================================================================

macro_rules! impl_arithmetic {
    ($type:ty) => {
        impl Add for $type {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $type {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }

        impl Mul<f64> for $type {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }

        impl Div<f64> for $type {
            type Output = Self;
            fn div(self, rhs: f64) -> Self::Output {
                Self(self.0 / rhs)
            }
        }

        impl $type {
            /// Get the raw value
            pub fn value(self) -> f64 {
                self.0
            }
        }
    };
}

impl_arithmetic!(Degrees);
impl_arithmetic!(KiloPascals);
impl_arithmetic!(Bar);

/// Hydrostatic pore water pressure (kN/m²) at `depth_m` for a water table at
/// `water_depth_m`. Zero above the water table.
pub fn water_pressure_kpa(depth_m: f64, water_depth_m: f64) -> f64 {
    (depth_m - water_depth_m).max(0.0) * UNIT_WEIGHT_WATER
}
