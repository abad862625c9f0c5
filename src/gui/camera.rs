use kiss3d::camera::Camera;
use kiss3d::event::WindowEvent;
use kiss3d::resource::ShaderUniform;
use kiss3d::window::Canvas;
use nalgebra::{Isometry3, Matrix4, Perspective3, Point3, Vector3};

use crate::model::CameraState;

// Keeps the far plane comfortably past the outermost orbit, even when we're
// zoomed right in on something at the edge of the system.
const Z_FAR_PADDING: f32 = 200.0;

// This camera is a close cousin of ArcBall: it orbits a pivot at some distance,
// with y as up. Unlike ArcBall it doesn't handle input itself. The controller
// runs everything through the input reducer, and the view hands us the result
// (plus where the pivot is this frame) via `set_view`.
pub struct OrbitCamera {
    // -- position --
    state: CameraState,
    pivot: Point3<f32>,
    // -- perspective --
    width: u32,
    height: u32,
    fovy: f32,
    // -- knobs to fiddle with --
    z_near_multiplier: f32,
}

impl OrbitCamera {
    pub fn new(state: CameraState, fovy: f32, width: u32, height: u32) -> Self {
        OrbitCamera {
            state,
            pivot: Point3::origin(),
            width,
            height,
            fovy,
            z_near_multiplier: 0.02,
        }
    }

    pub fn set_view(&mut self, state: CameraState, pivot: Point3<f32>) {
        self.state = state;
        self.pivot = pivot;
    }

    fn projection(&self) -> Perspective3<f32> {
        Perspective3::new(
            self.width.max(1) as f32 / self.height.max(1) as f32,
            self.fovy,
            self.state.distance * self.z_near_multiplier,
            self.state.distance + Z_FAR_PADDING,
        )
    }

    fn projection_matrix(&self) -> Matrix4<f32> {
        self.projection().into_inner()
    }

    fn view_matrix(&self) -> Matrix4<f32> {
        self.view_transform().to_homogeneous()
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

impl Camera for OrbitCamera {
    fn handle_event(&mut self, _canvas: &Canvas, event: &WindowEvent) {
        if let WindowEvent::FramebufferSize(w, h) = *event {
            self.width = w;
            self.height = h;
        }
    }

    fn eye(&self) -> Point3<f32> {
        self.pivot + self.state.distance * self.state.eye_direction()
    }

    fn view_transform(&self) -> Isometry3<f32> {
        Isometry3::look_at_rh(&self.eye(), &self.pivot, &Vector3::y())
    }

    fn transformation(&self) -> Matrix4<f32> {
        self.projection_matrix() * self.view_matrix()
    }

    fn inverse_transformation(&self) -> Matrix4<f32> {
        self.transformation()
            .try_inverse()
            .unwrap_or_else(Matrix4::identity)
    }

    fn clip_planes(&self) -> (f32, f32) {
        (self.projection().znear(), self.projection().zfar())
    }

    fn update(&mut self, _canvas: &Canvas) {}

    fn upload(
        &self,
        _: usize,
        proj: &mut ShaderUniform<Matrix4<f32>>,
        view: &mut ShaderUniform<Matrix4<f32>>,
    ) {
        proj.upload(&self.projection_matrix());
        view.upload(&self.view_matrix());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn test_eye_position() {
        let mut camera = OrbitCamera::new(CameraState::new(0.0, 0.0, 10.0), 0.8, 800, 600);
        assert_relative_eq!(camera.eye(), Point3::new(0.0, 0.0, 10.0));

        let state = CameraState::new(std::f32::consts::FRAC_PI_2, 0.0, 4.0);
        camera.set_view(state, Point3::new(1.0, 2.0, 3.0));
        assert_relative_eq!(camera.eye(), Point3::new(5.0, 2.0, 3.0), epsilon = 1e-5);
    }

    #[test]
    fn test_pivot_projects_to_center() {
        let mut camera = OrbitCamera::new(CameraState::new(0.7, 0.4, 25.0), 0.8, 800, 600);
        let pivot = Point3::new(8.0, 0.0, -3.0);
        camera.set_view(camera.state, pivot);

        let clip = camera.transformation() * pivot.to_homogeneous();
        assert!(clip.w > 0.0);
        assert_relative_eq!(clip.x / clip.w, 0.0, epsilon = 1e-5);
        assert_relative_eq!(clip.y / clip.w, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn test_zero_sized_framebuffer() {
        let camera = OrbitCamera::new(CameraState::new(0.0, 0.3, 20.0), 0.8, 0, 0);
        let m = camera.transformation();
        assert!(m.iter().all(|x| x.is_finite()));
    }
}
