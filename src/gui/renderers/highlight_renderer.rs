use std::f32::consts::FRAC_PI_2;

use kiss3d::camera::Camera;
use kiss3d::renderer::{LineRenderer, Renderer};
use nalgebra::{Isometry3, Point3, UnitQuaternion, Vector3};

use crate::math::mesh::generate_orbit_ring;
use crate::model::{BodyPose, CelestialBody};

const CIRCLE_SEGMENTS: u32 = 48;
// Gap between the surface and the circle, as a fraction of the body's radius
const SURFACE_MARGIN: f32 = 0.6;
// The circle never shrinks below this fraction of its distance from the eye,
// which keeps small, far away bodies visibly marked.
const MIN_APPARENT_SIZE: f32 = 0.025;

struct Highlight {
    center: Point3<f32>,
    body_radius: f32,
    color: Point3<f32>,
}

/// Rings the selected body with a circle in the screen plane.
///
/// Only one body is selected at a time, so this holds at most one pending
/// highlight, and it's consumed by the next render.
pub struct HighlightRenderer {
    line_renderer: LineRenderer,
    unit_circle: Vec<Point3<f32>>,
    pending: Option<Highlight>,
}

impl HighlightRenderer {
    pub fn new() -> Self {
        HighlightRenderer {
            line_renderer: LineRenderer::new(),
            unit_circle: generate_orbit_ring(1.0, CIRCLE_SEGMENTS),
            pending: None,
        }
    }

    pub fn highlight(&mut self, pose: &BodyPose, body: &CelestialBody, color: Point3<f32>) {
        self.pending = Some(Highlight {
            center: nalgebra::convert(pose.position),
            body_radius: body.mean_radius,
            color,
        });
    }
}

impl Renderer for HighlightRenderer {
    fn render(&mut self, pass: usize, camera: &mut dyn Camera) {
        if let Some(highlight) = self.pending.take() {
            let eye_distance = nalgebra::distance(&camera.eye(), &highlight.center);
            let radius = highlight_radius(highlight.body_radius, eye_distance);
            let points = facing_circle(
                &self.unit_circle,
                &highlight.center,
                radius,
                &camera.view_transform(),
            );
            for pair in points.windows(2) {
                self.line_renderer
                    .draw_line(pair[0], pair[1], highlight.color);
            }
        }
        self.line_renderer.render(pass, camera);
    }
}

fn highlight_radius(body_radius: f32, eye_distance: f32) -> f32 {
    let around_body = body_radius * (1.0 + SURFACE_MARGIN);
    around_body.max(MIN_APPARENT_SIZE * eye_distance)
}

/// Places a unit circle from the y = 0 plane around `center`, perpendicular to
/// the view direction.
fn facing_circle(
    unit_circle: &[Point3<f32>],
    center: &Point3<f32>,
    radius: f32,
    view: &Isometry3<f32>,
) -> Vec<Point3<f32>> {
    // Tip the circle into the camera's xy plane, then undo the view rotation
    let tip = UnitQuaternion::from_axis_angle(&Vector3::x_axis(), FRAC_PI_2);
    let to_world = view.rotation.inverse() * tip;
    unit_circle
        .iter()
        .map(|p| center + to_world * (p.coords * radius))
        .collect()
}
