use std::collections::HashSet;
use std::fs;
use std::path::Path;

use nalgebra::Point3;

use super::body::{BodyFacts, BodyID, CelestialBody, Ring};
use crate::error::RegistryError;

/// The fixed, ordered table of bodies in the scene. The central body comes
/// first, then the orbiting bodies from innermost to outermost.
///
/// There's no way to add or remove bodies once the registry is built.
#[derive(Debug, Clone)]
pub struct BodyRegistry {
    bodies: Vec<CelestialBody>,
}

impl BodyRegistry {
    /// Takes ownership of a table of bodies and assigns ids by position.
    pub fn from_bodies(mut bodies: Vec<CelestialBody>) -> Result<Self, RegistryError> {
        let central = bodies.first().ok_or(RegistryError::Empty)?;
        if !central.is_central() {
            return Err(RegistryError::CentralBodyOrbits(central.name.clone()));
        }

        let mut names = HashSet::new();
        for (idx, body) in bodies.iter_mut().enumerate() {
            body.id = BodyID(idx);

            if idx > 0 && !(body.orbit_radius > 0.0) {
                return Err(RegistryError::InvalidOrbit(body.name.clone()));
            }
            if !names.insert(body.name.clone()) {
                return Err(RegistryError::DuplicateName(body.name.clone()));
            }
            if !(body.mean_radius > 0.0) {
                return Err(RegistryError::InvalidRadius(body.name.clone()));
            }
            if let Some(ring) = &body.ring {
                if !(0.0 <= ring.inner_radius && ring.inner_radius < ring.outer_radius) {
                    return Err(RegistryError::InvalidRing(body.name.clone()));
                }
            }
        }

        // Overlapping orbits only look odd, so this isn't fatal
        for pair in bodies.windows(2) {
            if pair[1].orbit_radius <= pair[0].orbit_radius {
                tracing::warn!(
                    inner = %pair[0].name,
                    outer = %pair[1].name,
                    "orbit radii are not strictly increasing"
                );
            }
        }

        Ok(BodyRegistry { bodies })
    }

    /// Reads a RON list of bodies, in the same order `from_bodies` expects.
    pub fn load(path: &Path) -> Result<Self, RegistryError> {
        let contents = fs::read_to_string(path).map_err(RegistryError::ReadError)?;
        let bodies: Vec<CelestialBody> =
            ron::from_str(&contents).map_err(RegistryError::ParseError)?;
        let registry = Self::from_bodies(bodies)?;
        tracing::info!(
            path = %path.display(),
            count = registry.len(),
            "loaded body registry"
        );
        Ok(registry)
    }

    /// The sun and its eight planets.
    ///
    /// Sizes, distances and speeds are tuned to look reasonable on screen, and are
    /// nowhere near to scale.
    pub fn solar_system() -> Self {
        let bodies = vec![
            CelestialBody {
                id: BodyID::default(),
                name: "Sun".to_owned(),
                mean_radius: 2.0,
                orbit_radius: 0.0,
                angular_speed: 0.0,
                spin_rate: 0.05,
                color: Point3::new(1.0, 0.82, 0.3),
                texture: Some("sun.jpg".to_owned()),
                ring: None,
                facts: BodyFacts {
                    semi_major_axis_km: 0.0,
                    orbital_period_days: None,
                    mass_kg: 1.989e30,
                    volume_km3: 1.412e18,
                },
            },
            planet("Mercury", 0.25, 4.0, 1.6, 0.5, (0.62, 0.58, 0.55))
                .with_facts(57.9e6, 88.0, 3.301e23, 6.083e10),
            planet("Venus", 0.4, 6.0, 1.2, -0.3, (0.9, 0.75, 0.45))
                .with_facts(108.2e6, 224.7, 4.867e24, 9.284e11),
            planet("Earth", 0.42, 8.5, 1.0, 2.0, (0.25, 0.45, 0.85))
                .with_facts(149.6e6, 365.2, 5.972e24, 1.083e12),
            planet("Mars", 0.3, 11.0, 0.8, 1.9, (0.8, 0.35, 0.2))
                .with_facts(227.9e6, 687.0, 6.417e23, 1.632e11),
            planet("Jupiter", 1.1, 15.0, 0.43, 4.5, (0.8, 0.65, 0.45))
                .with_facts(778.5e6, 4331.0, 1.898e27, 1.431e15),
            planet("Saturn", 0.95, 19.5, 0.32, 4.2, (0.9, 0.8, 0.55))
                .with_ring(1.3, 2.3)
                .with_facts(1432.0e6, 10747.0, 5.683e26, 8.271e14),
            planet("Uranus", 0.7, 23.5, 0.23, -2.8, (0.6, 0.85, 0.9))
                .with_ring(1.6, 1.8)
                .with_facts(2867.0e6, 30589.0, 8.681e25, 6.833e13),
            planet("Neptune", 0.68, 27.0, 0.18, 2.9, (0.3, 0.45, 0.9))
                .with_facts(4515.0e6, 59800.0, 1.024e26, 6.254e13),
        ];

        Self::from_bodies(bodies).expect("Built-in registry is valid")
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn bodies(&self) -> impl Iterator<Item = &CelestialBody> + '_ {
        self.bodies.iter()
    }

    pub fn get(&self, id: BodyID) -> &CelestialBody {
        &self.bodies[id.0]
    }

    pub fn central(&self) -> &CelestialBody {
        &self.bodies[0]
    }

    pub fn planets(&self) -> impl Iterator<Item = &CelestialBody> + '_ {
        self.bodies.iter().skip(1)
    }

    pub fn find(&self, name: &str) -> Option<&CelestialBody> {
        self.bodies
            .iter()
            .find(|b| b.name.eq_ignore_ascii_case(name))
    }
}

fn planet(
    name: &str,
    mean_radius: f32,
    orbit_radius: f64,
    angular_speed: f64,
    spin_rate: f64,
    (r, g, b): (f32, f32, f32),
) -> CelestialBody {
    CelestialBody {
        id: BodyID::default(),
        name: name.to_owned(),
        mean_radius,
        orbit_radius,
        angular_speed,
        spin_rate,
        color: Point3::new(r, g, b),
        texture: Some(format!("{}.jpg", name.to_lowercase())),
        ring: None,
        facts: BodyFacts::default(),
    }
}

impl CelestialBody {
    fn with_ring(mut self, inner_radius: f32, outer_radius: f32) -> Self {
        self.ring = Some(Ring {
            inner_radius,
            outer_radius,
        });
        self
    }

    fn with_facts(mut self, sma_km: f64, period_days: f64, mass_kg: f64, volume_km3: f64) -> Self {
        self.facts = BodyFacts {
            semi_major_axis_km: sma_km,
            orbital_period_days: Some(period_days),
            mass_kg,
            volume_km3,
        };
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solar_system_layout() {
        let registry = BodyRegistry::solar_system();
        assert_eq!(registry.len(), 9);
        assert_eq!(registry.planets().count(), 8);

        let sun = registry.central();
        assert_eq!(sun.id, BodyID(0));
        assert_eq!(sun.orbit_radius, 0.0);
        assert_eq!(sun.angular_speed, 0.0);

        for (idx, body) in registry.bodies().enumerate() {
            assert_eq!(body.id, BodyID(idx));
        }

        let radii: Vec<f64> = registry.bodies().map(|b| b.orbit_radius).collect();
        assert!(radii.windows(2).all(|w| w[0] < w[1]));

        let ringed: Vec<&str> = registry
            .bodies()
            .filter(|b| b.ring.is_some())
            .map(|b| b.name.as_str())
            .collect();
        assert_eq!(ringed, ["Saturn", "Uranus"]);
    }

    #[test]
    fn test_find() {
        let registry = BodyRegistry::solar_system();
        assert_eq!(registry.find("earth").map(|b| b.id), Some(BodyID(3)));
        assert!(registry.find("Pluto").is_none());
    }

    #[test]
    fn test_validation() {
        let sun = BodyRegistry::solar_system().central().clone();
        let earth = planet("Earth", 0.4, 8.0, 1.0, 1.0, (0.0, 0.0, 1.0));

        assert!(matches!(
            BodyRegistry::from_bodies(vec![]),
            Err(RegistryError::Empty)
        ));
        assert!(matches!(
            BodyRegistry::from_bodies(vec![earth.clone(), sun.clone()]),
            Err(RegistryError::CentralBodyOrbits(_))
        ));
        assert!(matches!(
            BodyRegistry::from_bodies(vec![sun.clone(), earth.clone(), earth.clone()]),
            Err(RegistryError::DuplicateName(name)) if name == "Earth"
        ));

        let mut tiny = earth.clone();
        tiny.mean_radius = 0.0;
        assert!(matches!(
            BodyRegistry::from_bodies(vec![sun.clone(), tiny]),
            Err(RegistryError::InvalidRadius(_))
        ));

        let inside_out = earth.clone().with_ring(2.0, 1.0);
        assert!(matches!(
            BodyRegistry::from_bodies(vec![sun.clone(), inside_out]),
            Err(RegistryError::InvalidRing(_))
        ));

        // The central body has to stay put, not just sit at the origin
        let mut spinning_sun = sun.clone();
        spinning_sun.angular_speed = 0.3;
        assert!(matches!(
            BodyRegistry::from_bodies(vec![spinning_sun, earth.clone()]),
            Err(RegistryError::CentralBodyOrbits(_))
        ));

        // Only the first body may sit at the origin
        let mut second_sun = earth.clone();
        second_sun.orbit_radius = 0.0;
        assert!(matches!(
            BodyRegistry::from_bodies(vec![sun.clone(), second_sun]),
            Err(RegistryError::InvalidOrbit(name)) if name == "Earth"
        ));
        let mut backwards = earth.clone();
        backwards.orbit_radius = -8.0;
        assert!(matches!(
            BodyRegistry::from_bodies(vec![sun.clone(), backwards]),
            Err(RegistryError::InvalidOrbit(_))
        ));

        let registry = BodyRegistry::from_bodies(vec![sun, earth]).unwrap();
        assert_eq!(registry.get(BodyID(1)).name, "Earth");
    }

    #[test]
    fn test_load_from_ron() {
        let bodies: Vec<CelestialBody> = BodyRegistry::solar_system().bodies().cloned().collect();
        let text = ron::to_string(&bodies).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bodies.ron");
        fs::write(&path, text).unwrap();

        let registry = BodyRegistry::load(&path).unwrap();
        assert_eq!(registry.len(), 9);
        assert_eq!(registry.get(BodyID(6)).name, "Saturn");
        assert_eq!(registry.get(BodyID(6)).ring, BodyRegistry::solar_system().get(BodyID(6)).ring);
    }

    #[test]
    fn test_load_missing_file() {
        let result = BodyRegistry::load(Path::new("/definitely/not/here.ron"));
        assert!(matches!(result, Err(RegistryError::ReadError(_))));
    }
}
