use kiss3d::camera::Camera;
use kiss3d::context::Context;
use kiss3d::renderer::Renderer;
use kiss3d::resource::{
    AllocationType, BufferType, Effect, GPUVec, ShaderAttribute, ShaderUniform,
};
use nalgebra::{Matrix4, Point3};

use super::utils::strip_to_line_pairs;

/// Draws every orbit circle in one call.
///
/// Orbits are fixed for the lifetime of the scene, so all of them share a
/// single static buffer of interleaved (position, color) vertices.
pub struct OrbitRenderer {
    shader: Effect,
    position: ShaderAttribute<Point3<f32>>,
    color: ShaderAttribute<Point3<f32>>,
    transform: ShaderUniform<Matrix4<f32>>,
    vertices: GPUVec<Point3<f32>>,
    num_orbits: usize,
}

impl OrbitRenderer {
    pub fn new() -> Self {
        let mut shader = Effect::new_from_str(ORBIT_VERTEX_SRC, ORBIT_FRAGMENT_SRC);
        shader.use_program();

        OrbitRenderer {
            position: shader
                .get_attrib("position")
                .expect("orbit shader is missing `position`"),
            color: shader
                .get_attrib("color")
                .expect("orbit shader is missing `color`"),
            transform: shader
                .get_uniform("transform")
                .expect("orbit shader is missing `transform`"),
            shader,
            vertices: GPUVec::new(vec![], BufferType::Array, AllocationType::StaticDraw),
            num_orbits: 0,
        }
    }

    /// Adds an orbit, given as a closed line strip in world space.
    pub fn add_orbit(&mut self, points: &[Point3<f32>], color: Point3<f32>) {
        // Touching the data marks the buffer for re-upload on the next bind
        if let Some(data) = self.vertices.data_mut() {
            data.extend(strip_to_line_pairs(points, color));
        }
        self.num_orbits += 1;
    }

    pub fn num_orbits(&self) -> usize {
        self.num_orbits
    }
}

impl Renderer for OrbitRenderer {
    fn render(&mut self, _pass: usize, camera: &mut dyn Camera) {
        if self.num_orbits == 0 {
            return;
        }

        self.shader.use_program();
        self.position.enable();
        self.color.enable();
        self.transform.upload(&camera.transformation());

        // Stride of one skips over the interleaved partner
        self.position.bind_sub_buffer(&mut self.vertices, 1, 0);
        self.color.bind_sub_buffer(&mut self.vertices, 1, 1);

        let ctxt = Context::get();
        let num_vertices = self.vertices.len() / 2;
        ctxt.draw_arrays(Context::LINES, 0, num_vertices as i32);

        self.position.disable();
        self.color.disable();
    }
}

static ORBIT_VERTEX_SRC: &str = "#version 100
attribute vec3 position;
attribute vec3 color;
uniform mat4 transform;
varying vec3 v_color;

void main() {
    gl_Position = transform * vec4(position, 1.0);
    v_color = color;
}";

static ORBIT_FRAGMENT_SRC: &str = "#version 100
#ifdef GL_FRAGMENT_PRECISION_HIGH
precision highp float;
#else
precision mediump float;
#endif
varying vec3 v_color;

void main() {
    gl_FragColor = vec4(v_color, 1.0);
}";
