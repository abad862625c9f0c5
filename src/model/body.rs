use nalgebra::Point3;
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct BodyID(pub usize);

/// A flat ring around a body. Radii are multiples of the body's own radius, so
/// the ring can share the body's transform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ring {
    pub inner_radius: f32,
    pub outer_radius: f32,
}

/// Numbers for the info panel. These are real-world values and have nothing to
/// do with the (purely cosmetic) animation parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BodyFacts {
    pub semi_major_axis_km: f64,
    pub orbital_period_days: Option<f64>,
    pub mass_kg: f64,
    pub volume_km3: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CelestialBody {
    // Assigned by the registry from the body's position in the table
    #[serde(skip)]
    pub id: BodyID,
    pub name: String,
    // -- animation --
    pub mean_radius: f32,
    pub orbit_radius: f64,
    pub angular_speed: f64,
    pub spin_rate: f64,
    // -- material --
    pub color: Point3<f32>,
    #[serde(default)]
    pub texture: Option<String>,
    #[serde(default)]
    pub ring: Option<Ring>,
    // -- display only --
    #[serde(default)]
    pub facts: BodyFacts,
}

impl CelestialBody {
    /// Sits still at the origin. The registry only allows this for its first body.
    pub fn is_central(&self) -> bool {
        self.orbit_radius == 0.0 && self.angular_speed == 0.0
    }
}
