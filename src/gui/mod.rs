use std::time::Instant;

use kiss3d::camera::Camera;
use kiss3d::event::EventManager;
use kiss3d::light::Light;
use kiss3d::planar_camera::PlanarCamera;
use kiss3d::post_processing::PostProcessingEffect;
use kiss3d::renderer::Renderer;
use kiss3d::window::{State, Window};

use self::assets::SceneAssets;
use self::controller::Controller;
use self::view::View;
use crate::config::SceneConfig;
use crate::error::SceneError;
use crate::model::{BodyRegistry, InputState, SceneClock};

pub mod assets;
mod camera;
mod controller;
mod frame_rate;
mod renderers;
mod view;

pub struct Simulation {
    view: View,
    controller: Controller,
}

impl Simulation {
    pub fn new(registry: BodyRegistry, window: &mut Window, config: &SceneConfig) -> Result<Self, SceneError> {
        let assets = SceneAssets::load(&registry, &config.geometry, &config.assets)?;

        let input = InputState::new(config.camera.initial_state(), config.camera.limits());
        let clock = SceneClock::new(
            Instant::now(),
            config.time.time_scale,
            config.time.start_paused,
        );

        Ok(Self {
            view: View::new(window, registry, assets, &input, config),
            controller: Controller::new(input, clock),
        })
    }

    fn process_user_input(&mut self, mut events: EventManager) {
        for event in events.iter() {
            self.controller.process_event(&event.value, &self.view);
        }
    }
}

impl State for Simulation {
    fn cameras_and_effect_and_renderer(
        &mut self,
    ) -> (
        Option<&mut dyn Camera>,
        Option<&mut dyn PlanarCamera>,
        Option<&mut dyn Renderer>,
        Option<&mut dyn PostProcessingEffect>,
    ) {
        self.view.cameras_and_effect_and_renderer()
    }

    fn step(&mut self, window: &mut Window) {
        self.process_user_input(window.events());
        let time = self.controller.clock().now();
        self.view.update(time, self.controller.input());
        self.view.prerender_scene(window, &self.controller);
    }
}

/// Opens the window. Context creation panics deep inside the backend when
/// there's no usable OpenGL, so we catch that and report it as an error.
pub fn create_window(config: &SceneConfig) -> Result<Window, SceneError> {
    let window_config = &config.window;
    let result = std::panic::catch_unwind(|| {
        Window::new_with_size(
            &window_config.title,
            window_config.width,
            window_config.height,
        )
    });

    let mut window = result.map_err(|payload| {
        let message = payload
            .downcast_ref::<String>()
            .map(String::as_str)
            .or_else(|| payload.downcast_ref::<&str>().copied())
            .unwrap_or("unknown error");
        SceneError::UnsupportedBackend(message.to_owned())
    })?;

    window.set_light(Light::StickToCamera);
    window.set_background_color(0.0, 0.0, 0.0);
    window.set_framerate_limit(window_config.framerate);
    Ok(window)
}
