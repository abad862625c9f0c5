use std::time::{Duration, Instant};

use kiss3d::camera::Camera;
use kiss3d::planar_camera::PlanarCamera;
use kiss3d::post_processing::PostProcessingEffect;
use kiss3d::renderer::Renderer;
use kiss3d::resource::TextureManager;
use kiss3d::scene::SceneNode;
use kiss3d::text::Font;
use kiss3d::window::Window;
use nalgebra::{Isometry3, Point2, Point3, Vector3};

use super::assets::SceneAssets;
use super::camera::OrbitCamera;
use super::controller::Controller;
use super::frame_rate::FrameRate;
use super::renderers::CompoundRenderer;
use crate::config::SceneConfig;
use crate::model::motion::{snapshot, BodyPose};
use crate::model::selection::detect_body_at_position;
use crate::model::{BodyID, BodyRegistry, CelestialBody, InputState};

// Orbit lines are drawn in a dimmed version of the body color
const ORBIT_DIMMING: f32 = 0.35;
const HIGHLIGHT_COLOR: [f32; 3] = [1.0, 1.0, 1.0];

const TEXT_SIZE: f32 = 60.0;
const TEXT_MARGIN: f32 = 20.0;
// kiss3d lays text out in a space twice the window's size in each direction
const TEXT_SPACE_SCALE: f32 = 2.0;

struct BodyNodes {
    sphere: SceneNode,
    ring: Option<SceneNode>,
}

pub struct View {
    // Object state
    registry: BodyRegistry,
    time: f64,
    poses: Vec<BodyPose>,
    nodes: Vec<BodyNodes>,
    // Camera
    camera: OrbitCamera,
    // Misc
    renderer: CompoundRenderer,
    selection_threshold: f32,
    frame_rate: FrameRate,
    font: std::rc::Rc<Font>,
    // Owns the GPU-side handles for as long as the scene lives
    _assets: SceneAssets,
}

impl View {
    pub fn new(
        window: &mut Window,
        registry: BodyRegistry,
        assets: SceneAssets,
        input: &InputState,
        config: &SceneConfig,
    ) -> Self {
        let camera = OrbitCamera::new(
            input.camera,
            config.camera.fovy,
            window.width(),
            window.height(),
        );

        let nodes = registry
            .bodies()
            .map(|body| Self::create_body_nodes(window, &assets, body))
            .collect();

        let mut renderer = CompoundRenderer::new();
        for (id, points) in assets.orbit_paths.iter() {
            let color = registry.get(*id).color * ORBIT_DIMMING;
            renderer.add_orbit(points, color);
        }
        tracing::debug!(orbits = renderer.num_orbits(), "uploaded orbit paths");

        let mut view = View {
            poses: snapshot(&registry, 0.0),
            registry,
            time: 0.0,
            nodes,
            camera,
            renderer,
            selection_threshold: config.selection.threshold,
            frame_rate: FrameRate::new(Duration::from_secs(1), Instant::now()),
            font: Font::default(),
            _assets: assets,
        };
        view.update(0.0, input);
        view
    }

    fn create_body_nodes(window: &mut Window, assets: &SceneAssets, body: &CelestialBody) -> BodyNodes {
        let mesh = if body.is_central() {
            assets.sun_mesh.clone()
        } else {
            assets.planet_mesh.clone()
        };

        // Meshes are unit-sized; the node scale makes them the body's size
        let r = body.mean_radius;
        let mut sphere = window.add_mesh(mesh, Vector3::repeat(r));
        let color = &body.color;
        sphere.set_color(color.x, color.y, color.z);
        if let Some(image) = assets.textures.get(&body.id) {
            // Registry names are unique, so they double as texture keys
            let texture =
                TextureManager::get_global_manager(|tm| tm.add_image(image.clone(), &body.name));
            sphere.set_texture(texture);
        }

        let ring = assets.ring_meshes.get(&body.id).map(|mesh| {
            let mut ring = window.add_mesh(mesh.clone(), Vector3::repeat(r));
            ring.set_color(color.x * 0.8, color.y * 0.8, color.z * 0.8);
            // Visible from above and below
            ring.enable_backface_culling(false);
            ring
        });

        BodyNodes { sphere, ring }
    }

    /// Moves everything to where it belongs at scene time `time`, and points the
    /// camera according to the input state.
    pub fn update(&mut self, time: f64, input: &InputState) {
        self.time = time;
        self.poses = snapshot(&self.registry, time);

        let followed = input
            .camera
            .follow
            .map(|id| self.poses[id.0].translation().vector)
            .unwrap_or_else(Vector3::zeros);
        let pivot = Point3::from(followed + input.camera.pivot_offset);
        self.camera.set_view(input.camera, pivot);

        for (pose, nodes) in self.poses.iter().zip(self.nodes.iter_mut()) {
            let transform = Isometry3::from_parts(pose.translation(), pose.rotation());
            nodes.sphere.set_local_transformation(transform);
            if let Some(ring) = nodes.ring.as_mut() {
                ring.set_local_transformation(transform);
            }
        }
    }

    pub fn pick(&self, click_ndc: Point2<f32>) -> Option<BodyID> {
        detect_body_at_position(
            &self.poses,
            &self.camera.transformation(),
            click_ndc,
            self.selection_threshold,
        )
    }

    pub fn canvas_size(&self) -> (u32, u32) {
        (self.camera.width(), self.camera.height())
    }

    pub fn registry(&self) -> &BodyRegistry {
        &self.registry
    }

    pub fn prerender_scene(&mut self, window: &mut Window, controller: &Controller) {
        self.frame_rate.tick(Instant::now());
        let input = controller.input();
        let text_color = Point3::new(1.0, 1.0, 1.0);

        if let Some(id) = input.selected {
            let body = self.registry.get(id);
            let [r, g, b] = HIGHLIGHT_COLOR;
            self.renderer
                .draw_highlight(&self.poses[id.0], body, Point3::new(r, g, b));

            let following = input.camera.follow == Some(id);
            window.draw_text(
                &body_summary_text(body, following),
                &Point2::new(TEXT_MARGIN, TEXT_MARGIN),
                TEXT_SIZE,
                &self.font,
                &text_color,
            );
        }

        let clock = controller.clock();
        let time_text = time_summary_text(
            self.time,
            clock.rate(),
            clock.is_paused(),
            self.frame_rate.reading(),
        );
        // Right-aligned against the window edge
        let right_edge = window.width() as f32 * TEXT_SPACE_SCALE - TEXT_MARGIN;
        let x = right_edge - text_width(&self.font, &time_text, TEXT_SIZE);
        window.draw_text(
            &time_text,
            &Point2::new(x.max(0.0), TEXT_MARGIN),
            TEXT_SIZE,
            &self.font,
            &text_color,
        );
    }

    pub fn cameras_and_effect_and_renderer(
        &mut self,
    ) -> (
        Option<&mut dyn Camera>,
        Option<&mut dyn PlanarCamera>,
        Option<&mut dyn Renderer>,
        Option<&mut dyn PostProcessingEffect>,
    ) {
        (Some(&mut self.camera), None, Some(&mut self.renderer), None)
    }
}

impl Drop for View {
    fn drop(&mut self) {
        for nodes in self.nodes.iter_mut() {
            nodes.sphere.unlink();
            if let Some(ring) = nodes.ring.as_mut() {
                ring.unlink();
            }
        }
    }
}

fn body_summary_text(body: &CelestialBody, following: bool) -> String {
    let facts = &body.facts;
    let period = match facts.orbital_period_days {
        Some(days) => format!("{:.1} days", days),
        None => String::from("N/A"),
    };

    let lines = [
        body.name.clone(),
        format!("  Orbit radius: {:.3e} km", facts.semi_major_axis_km),
        format!("  Period: {}", period),
        format!("  Mass: {:.3e} kg", facts.mass_kg),
        format!("  Volume: {:.3e} km^3", facts.volume_km3),
        format!("Follow: {} (F)", if following { "on" } else { "off" }),
    ];
    lines.join("\n")
}

/// Width of the widest line of `text`, in kiss3d text units.
fn text_width(font: &Font, text: &str, size: f32) -> f32 {
    let scale = rusttype::Scale::uniform(size);
    text.lines()
        .filter_map(|line| {
            let last = font
                .font()
                .layout(line, scale, rusttype::point(0.0, 0.0))
                .last()?;
            Some(last.position().x + last.unpositioned().h_metrics().advance_width)
        })
        .fold(0.0, f32::max)
}

fn time_summary_text(time: f64, rate: f64, paused: bool, fps: f64) -> String {
    format!(
        "Time: {:.1} s
Rate: {}x{}
FPS: {:.0}",
        time,
        rate,
        if paused { " (paused)" } else { "" },
        fps,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_summary_text() {
        let registry = BodyRegistry::solar_system();
        let text = body_summary_text(registry.find("Earth").unwrap(), true);
        assert!(text.starts_with("Earth\n"));
        assert!(text.contains("Period: 365.2 days"));
        assert!(text.contains("Mass: 5.972e24 kg"));
        assert!(text.contains("Follow: on"));

        let text = body_summary_text(registry.central(), false);
        assert!(text.contains("Period: N/A"));
        assert!(text.contains("Follow: off"));
    }

    #[test]
    fn test_text_width() {
        let font = Font::default();
        assert_eq!(text_width(&font, "", TEXT_SIZE), 0.0);

        let short = text_width(&font, "FPS: 60", TEXT_SIZE);
        let long = text_width(&font, "Rate: 1024x (paused)", TEXT_SIZE);
        assert!(short > 0.0);
        assert!(long > short);

        // Multi-line text is as wide as its widest line
        let both = text_width(&font, "FPS: 60\nRate: 1024x (paused)", TEXT_SIZE);
        assert_eq!(both, long);

        // Doubling the size roughly doubles the width
        let big = text_width(&font, "FPS: 60", 2.0 * TEXT_SIZE);
        assert!((big / short - 2.0).abs() < 0.1);
    }

    #[test]
    fn test_time_summary_text() {
        let text = time_summary_text(12.345, 2.0, true, 59.6);
        assert_eq!(text, "Time: 12.3 s\nRate: 2x (paused)\nFPS: 60");
    }
}
