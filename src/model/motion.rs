use nalgebra::{Matrix4, Point3, Translation3, UnitQuaternion, Vector3};

use super::body::{BodyID, CelestialBody};
use super::registry::BodyRegistry;

// Orbits are circles in the y = 0 plane around the origin, and every body spins
// about +y. Everything here is a function of absolute scene time; nothing is
// integrated frame-to-frame, so evaluating at the same time always gives the
// same answer.

pub fn orbit_angle(body: &CelestialBody, time: f64) -> f64 {
    body.angular_speed * time
}

pub fn spin_angle(body: &CelestialBody, time: f64) -> f64 {
    body.spin_rate * time
}

pub fn world_position(body: &CelestialBody, time: f64) -> Point3<f64> {
    let (sin, cos) = orbit_angle(body, time).sin_cos();
    Point3::new(body.orbit_radius * cos, 0.0, body.orbit_radius * sin)
}

/// Where a body is, and how far it has turned, at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyPose {
    pub id: BodyID,
    pub orbit_angle: f64,
    pub spin_angle: f64,
    pub position: Point3<f64>,
}

impl BodyPose {
    pub fn of(body: &CelestialBody, time: f64) -> Self {
        BodyPose {
            id: body.id,
            orbit_angle: orbit_angle(body, time),
            spin_angle: spin_angle(body, time),
            position: world_position(body, time),
        }
    }

    pub fn rotation(&self) -> UnitQuaternion<f32> {
        UnitQuaternion::from_axis_angle(&Vector3::y_axis(), self.spin_angle as f32)
    }

    pub fn translation(&self) -> Translation3<f32> {
        let position: Point3<f32> = nalgebra::convert(self.position);
        Translation3::from(position.coords)
    }

    /// Maps a unit-sized mesh into world space: scale first, then spin, then move
    /// out to the orbit position.
    pub fn model_matrix(&self, scale: f32) -> Matrix4<f32> {
        self.translation().to_homogeneous()
            * self.rotation().to_homogeneous()
            * Matrix4::new_scaling(scale)
    }
}

/// Poses for every body in the registry, in registry order.
pub fn snapshot(registry: &BodyRegistry, time: f64) -> Vec<BodyPose> {
    registry.bodies().map(|b| BodyPose::of(b, time)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn test_rest_state() {
        let registry = BodyRegistry::solar_system();
        for pose in snapshot(&registry, 0.0) {
            let body = registry.get(pose.id);
            assert_eq!(pose.orbit_angle, 0.0);
            assert_eq!(pose.spin_angle, 0.0);
            assert_eq!(pose.position, Point3::new(body.orbit_radius, 0.0, 0.0));
        }
    }

    #[test]
    fn test_orbits_are_circular() {
        let registry = BodyRegistry::solar_system();
        for &t in &[0.0, 0.37, 10.0, 123.456, 1e4, -55.0] {
            for body in registry.bodies() {
                let p = world_position(body, t);
                assert_eq!(p.y, 0.0);
                assert_relative_eq!(
                    p.x * p.x + p.z * p.z,
                    body.orbit_radius * body.orbit_radius,
                    max_relative = 1e-12
                );
            }
        }
    }

    #[test]
    fn test_pure_function() {
        let registry = BodyRegistry::solar_system();
        let first = snapshot(&registry, 42.5);
        let _ = snapshot(&registry, 1000.0);
        let second = snapshot(&registry, 42.5);
        assert_eq!(first, second);
    }

    #[test]
    fn test_sun_stays_put() {
        let registry = BodyRegistry::solar_system();
        let pose = BodyPose::of(registry.central(), 100.0);
        assert_eq!(pose.position, Point3::origin());
        assert_relative_eq!(pose.spin_angle, registry.central().spin_rate * 100.0);
    }

    #[test]
    fn test_model_matrix() {
        let registry = BodyRegistry::solar_system();
        let earth = registry.find("Earth").unwrap();
        // A quarter orbit puts Earth on the +z axis
        let t = std::f64::consts::FRAC_PI_2 / earth.angular_speed;
        let pose = BodyPose::of(earth, t);

        let m = pose.model_matrix(earth.mean_radius);
        let center = m.transform_point(&Point3::origin());
        assert_abs_diff_eq!(center, Point3::new(0.0, 0.0, 8.5), epsilon = 1e-5);

        // Scale is applied before the translation, so the top of the unit sphere
        // ends up one radius above the center
        let top = m.transform_point(&Point3::new(0.0, 1.0, 0.0));
        assert_abs_diff_eq!(top - center, Vector3::new(0.0, 0.42, 0.0), epsilon = 1e-5);
    }
}
