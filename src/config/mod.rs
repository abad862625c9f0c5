//! Scene settings, loaded from an optional RON file and overridden from the
//! command line.

use std::f32::consts::FRAC_PI_2;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::model::{CameraLimits, CameraState};

mod cli;

pub use cli::CliArgs;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SceneConfig {
    pub window: WindowConfig,
    pub camera: CameraConfig,
    pub geometry: GeometryConfig,
    pub time: TimeConfig,
    pub selection: SelectionConfig,
    pub assets: AssetConfig,
    /// Tracing filter, e.g. "info" or "rust_orrery=debug". `RUST_LOG` wins over this.
    pub log_level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Frames per second cap; `None` leaves it up to the backend.
    pub framerate: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    pub initial_yaw: f32,
    pub initial_pitch: f32,
    pub initial_distance: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    /// Largest pitch magnitude, in radians. Anything above pi/2 is treated as pi/2.
    pub pitch_limit: f32,
    /// Radians per pixel of drag
    pub rotation_speed: f32,
    pub zoom_step: f32,
    pub fovy: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GeometryConfig {
    pub sun_bands: u32,
    pub planet_bands: u32,
    pub orbit_segments: u32,
    pub ring_segments: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TimeConfig {
    /// Scene seconds per wall-clock second
    pub time_scale: f64,
    pub start_paused: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SelectionConfig {
    /// Largest NDC distance between a click and a body's center that still picks it
    pub threshold: f32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AssetConfig {
    /// Directory with the body textures. Without one, bodies are drawn in flat colors.
    pub texture_dir: Option<PathBuf>,
    /// RON file with a custom body table, instead of the built-in solar system.
    pub bodies_file: Option<PathBuf>,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Orrery".to_string(),
            width: 1280,
            height: 720,
            framerate: Some(60),
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            initial_yaw: 0.0,
            initial_pitch: 0.45,
            initial_distance: 42.0,
            min_distance: 1.5,
            max_distance: 80.0,
            pitch_limit: FRAC_PI_2 - 0.001,
            rotation_speed: 0.005,
            zoom_step: 0.5,
            fovy: std::f32::consts::FRAC_PI_4,
        }
    }
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            sun_bands: 48,
            planet_bands: 32,
            orbit_segments: 180,
            ring_segments: 96,
        }
    }
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            time_scale: 1.0,
            start_paused: false,
        }
    }
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self { threshold: 0.05 }
    }
}

impl CameraConfig {
    pub fn limits(&self) -> CameraLimits {
        CameraLimits {
            min_distance: self.min_distance,
            max_distance: self.max_distance,
            pitch_limit: self.pitch_limit,
            rotation_speed: self.rotation_speed,
            zoom_step: self.zoom_step,
        }
    }

    pub fn initial_state(&self) -> CameraState {
        CameraState::new(self.initial_yaw, self.initial_pitch, self.initial_distance)
    }
}

impl SceneConfig {
    /// Reads the config file at `path`. Missing sections and fields take their
    /// defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::ReadError)?;
        let config: SceneConfig = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads the file named on the command line (or the defaults if there isn't
    /// one), then applies the remaining flags on top.
    pub fn from_args(args: &CliArgs) -> Result<Self, ConfigError> {
        let mut config = match &args.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.apply_cli_overrides(args);
        config.validate()?;
        Ok(config)
    }

    /// Rejects settings the scene can't be built from. Everything downstream
    /// (mesh generation, the zoom clamp, picking) assumes these hold.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let window = &self.window;
        if window.width == 0 || window.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "window size {}x{} has a zero dimension",
                window.width, window.height
            )));
        }

        let geometry = &self.geometry;
        for (name, count) in [
            ("sun_bands", geometry.sun_bands),
            ("planet_bands", geometry.planet_bands),
            ("orbit_segments", geometry.orbit_segments),
            ("ring_segments", geometry.ring_segments),
        ] {
            if count == 0 {
                return Err(ConfigError::Invalid(format!("{} must be at least 1", name)));
            }
        }

        let camera = &self.camera;
        if !is_positive(camera.min_distance) {
            return Err(ConfigError::Invalid(format!(
                "min_distance {} must be positive",
                camera.min_distance
            )));
        }
        if camera.min_distance > camera.max_distance {
            return Err(ConfigError::Invalid(format!(
                "min_distance {} is larger than max_distance {}",
                camera.min_distance, camera.max_distance
            )));
        }
        if !is_positive(camera.fovy) || camera.fovy >= std::f32::consts::PI {
            return Err(ConfigError::Invalid(format!(
                "fovy {} must be between 0 and pi",
                camera.fovy
            )));
        }
        if !is_positive(camera.zoom_step) {
            return Err(ConfigError::Invalid(format!(
                "zoom_step {} must be positive",
                camera.zoom_step
            )));
        }
        if !is_non_negative(camera.pitch_limit) {
            return Err(ConfigError::Invalid(format!(
                "pitch_limit {} must not be negative",
                camera.pitch_limit
            )));
        }

        if !is_non_negative(self.selection.threshold) {
            return Err(ConfigError::Invalid(format!(
                "selection threshold {} must not be negative",
                self.selection.threshold
            )));
        }
        if !self.time.time_scale.is_finite() {
            return Err(ConfigError::Invalid(format!(
                "time_scale {} must be finite",
                self.time.time_scale
            )));
        }
        Ok(())
    }
}

// NaN fails both of these
fn is_positive(x: f32) -> bool {
    x > 0.0
}

fn is_non_negative(x: f32) -> bool {
    x >= 0.0
}
