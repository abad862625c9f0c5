use std::f32::consts::{FRAC_PI_2, TAU};

use nalgebra::{Point2, Vector3};

use super::body::BodyID;

// How far (in pixels) the pointer may wander between press and release and
// still count as a click instead of a drag.
const CLICK_SLOP: f64 = 4.0;

/// Tunable knobs for the camera, fixed for the whole session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraLimits {
    pub min_distance: f32,
    pub max_distance: f32,
    pub pitch_limit: f32,
    /// Radians of rotation per pixel of drag
    pub rotation_speed: f32,
    pub zoom_step: f32,
}

impl Default for CameraLimits {
    fn default() -> Self {
        CameraLimits {
            min_distance: 1.5,
            max_distance: 80.0,
            pitch_limit: FRAC_PI_2 - 0.001,
            rotation_speed: 0.005,
            zoom_step: 0.5,
        }
    }
}

/// Orbit-style camera. It looks at a pivot point (the origin, or the followed
/// body, shifted by `pivot_offset`) from `distance` away.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    pub yaw: f32,
    pub pitch: f32,
    pub distance: f32,
    pub follow: Option<BodyID>,
    pub pivot_offset: Vector3<f32>,
}

impl CameraState {
    pub fn new(yaw: f32, pitch: f32, distance: f32) -> Self {
        CameraState {
            yaw,
            pitch,
            distance,
            follow: None,
            pivot_offset: Vector3::zeros(),
        }
    }

    /// Unit vector from the pivot towards the eye (y is up).
    pub fn eye_direction(&self) -> Vector3<f32> {
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        Vector3::new(cos_pitch * sin_yaw, sin_pitch, cos_pitch * cos_yaw)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragState {
    pub last: Point2<f64>,
    pub travelled: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerDown { x: f64, y: f64 },
    PointerMove { x: f64, y: f64 },
    PointerUp,
    /// Positive is "scroll up", which zooms in
    Wheel(f32),
    ZoomIn,
    ZoomOut,
    Rotate { yaw: f32, pitch: f32 },
    Pan { dx: f32, dz: f32 },
    Select(Option<BodyID>),
    ToggleFollow,
}

/// Everything the user has done to the view, as plain data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputState {
    pub camera: CameraState,
    pub selected: Option<BodyID>,
    pub drag: Option<DragState>,
    pub limits: CameraLimits,
}

impl InputState {
    pub fn new(camera: CameraState, limits: CameraLimits) -> Self {
        let mut camera = camera;
        camera.distance = clamp_distance(camera.distance, &limits);
        camera.pitch = clamp_pitch(camera.pitch, &limits);
        InputState {
            camera,
            selected: None,
            drag: None,
            limits,
        }
    }

    pub fn update(self, event: InputEvent) -> InputState {
        let mut state = self;
        let limits = self.limits;
        let camera = &mut state.camera;

        match event {
            InputEvent::PointerDown { x, y } => {
                state.drag = Some(DragState {
                    last: Point2::new(x, y),
                    travelled: 0.0,
                });
            }
            InputEvent::PointerMove { x, y } => {
                if let Some(drag) = state.drag.as_mut() {
                    let pos = Point2::new(x, y);
                    let delta = pos - drag.last;
                    rotate(
                        camera,
                        &limits,
                        delta.x as f32 * limits.rotation_speed,
                        delta.y as f32 * limits.rotation_speed,
                    );
                    drag.travelled += delta.norm();
                    drag.last = pos;
                }
            }
            InputEvent::PointerUp => {
                state.drag = None;
            }
            InputEvent::Wheel(delta) => {
                camera.distance = clamp_distance(camera.distance - delta * limits.zoom_step, &limits);
            }
            InputEvent::ZoomIn => {
                camera.distance = clamp_distance(camera.distance - limits.zoom_step, &limits);
            }
            InputEvent::ZoomOut => {
                camera.distance = clamp_distance(camera.distance + limits.zoom_step, &limits);
            }
            InputEvent::Rotate { yaw, pitch } => rotate(camera, &limits, yaw, pitch),
            InputEvent::Pan { dx, dz } => {
                camera.pivot_offset += Vector3::new(dx, 0.0, dz);
            }
            InputEvent::Select(id) => {
                if id != state.selected {
                    // A new target (or none at all) starts from a clean pivot
                    camera.follow = None;
                    camera.pivot_offset = Vector3::zeros();
                }
                state.selected = id;
            }
            InputEvent::ToggleFollow => {
                camera.follow = match camera.follow {
                    Some(_) => None,
                    None => state.selected,
                };
                camera.pivot_offset = Vector3::zeros();
            }
        }

        state
    }

    /// Whether releasing the pointer now should be treated as a click.
    pub fn is_click_release(&self) -> bool {
        matches!(self.drag, Some(drag) if drag.travelled < CLICK_SLOP)
    }

    /// The body `step` places after the current selection, wrapping around.
    /// With nothing selected, stepping forwards starts at the first body and
    /// stepping backwards at the last.
    pub fn cycle_selection(&self, num_bodies: usize, step: isize) -> Option<BodyID> {
        if num_bodies == 0 {
            return None;
        }
        let n = num_bodies as isize;
        let idx = match self.selected {
            Some(BodyID(idx)) => idx as isize + step,
            None if step >= 0 => step - 1,
            None => n + step,
        };
        Some(BodyID(idx.rem_euclid(n) as usize))
    }
}

fn rotate(camera: &mut CameraState, limits: &CameraLimits, dyaw: f32, dpitch: f32) {
    camera.yaw = (camera.yaw + dyaw) % TAU;
    camera.pitch = clamp_pitch(camera.pitch + dpitch, limits);
}

fn clamp_pitch(pitch: f32, limits: &CameraLimits) -> f32 {
    let limit = limits.pitch_limit.min(FRAC_PI_2);
    nalgebra::clamp(pitch, -limit, limit)
}

fn clamp_distance(distance: f32, limits: &CameraLimits) -> f32 {
    nalgebra::clamp(distance, limits.min_distance, limits.max_distance)
}
