use kiss3d::camera::Camera;
use kiss3d::renderer::Renderer;
use nalgebra::Point3;

use self::highlight_renderer::HighlightRenderer;
use self::orbit_renderer::OrbitRenderer;
use crate::model::{BodyPose, CelestialBody};

mod highlight_renderer;
mod orbit_renderer;
mod utils;

/// The line-based overlays drawn on top of kiss3d's own scene graph. Bodies and
/// rings are ordinary scene nodes; everything here is extra.
pub struct CompoundRenderer {
    orbit_renderer: OrbitRenderer,
    highlight_renderer: HighlightRenderer,
}

impl CompoundRenderer {
    pub fn new() -> Self {
        CompoundRenderer {
            orbit_renderer: OrbitRenderer::new(),
            highlight_renderer: HighlightRenderer::new(),
        }
    }

    pub fn add_orbit(&mut self, points: &[Point3<f32>], color: Point3<f32>) {
        self.orbit_renderer.add_orbit(points, color);
    }

    pub fn num_orbits(&self) -> usize {
        self.orbit_renderer.num_orbits()
    }

    pub fn draw_highlight(&mut self, pose: &BodyPose, body: &CelestialBody, color: Point3<f32>) {
        self.highlight_renderer.highlight(pose, body, color);
    }
}

impl Renderer for CompoundRenderer {
    fn render(&mut self, pass: usize, camera: &mut dyn Camera) {
        self.orbit_renderer.render(pass, camera);
        self.highlight_renderer.render(pass, camera);
    }
}
