use std::time::Instant;

use kiss3d::event::{Action, Key, MouseButton, WindowEvent};
use nalgebra::Point2;

use super::view::View;
use crate::model::selection::pixel_to_ndc;
use crate::model::{BodyID, InputEvent, InputState, SceneClock};

// Key config, all in one place
const KEY_CAMERA_MOVE_UP: Key = Key::W;
const KEY_CAMERA_MOVE_DOWN: Key = Key::S;
const KEY_CAMERA_MOVE_LEFT: Key = Key::A;
const KEY_CAMERA_MOVE_RIGHT: Key = Key::D;
const KEY_CAMERA_ZOOM_IN: Key = Key::Equals;
const KEY_CAMERA_ZOOM_OUT: Key = Key::Minus;
const KEY_PREV_SELECTION: Key = Key::Q;
const KEY_NEXT_SELECTION: Key = Key::E;
const KEY_DESELECT: Key = Key::X;
const KEY_TOGGLE_FOLLOW: Key = Key::F;
const KEY_SPEED_UP: Key = Key::Period;
const KEY_SLOW_DOWN: Key = Key::Comma;
const KEY_REWIND: Key = Key::R;
const KEY_TOGGLE_PAUSE: Key = Key::Space;

const KEY_ANGLE_STEP: f32 = 0.1;
const KEY_PAN_STEP: f32 = 0.5;

pub struct Controller {
    input: InputState,
    clock: SceneClock,
    cursor: Point2<f64>,
}

impl Controller {
    pub fn new(input: InputState, clock: SceneClock) -> Self {
        Controller {
            input,
            clock,
            cursor: Point2::origin(),
        }
    }

    /// Turns one window event into zero or more reducer events, plus whatever
    /// clock changes the keyboard asks for.
    pub fn process_event(&mut self, event: &WindowEvent, view: &View) {
        let now = Instant::now();
        match *event {
            WindowEvent::CursorPos(x, y, _) => {
                self.cursor = Point2::new(x, y);
                self.apply(InputEvent::PointerMove { x, y });
            }
            WindowEvent::MouseButton(MouseButton::Button1, Action::Press, _) => {
                let (x, y) = (self.cursor.x, self.cursor.y);
                self.apply(InputEvent::PointerDown { x, y });
            }
            WindowEvent::MouseButton(MouseButton::Button1, Action::Release, _) => {
                if self.input.is_click_release() {
                    let (width, height) = view.canvas_size();
                    let ndc = pixel_to_ndc(self.cursor.x, self.cursor.y, width, height);
                    self.select(view.pick(ndc), view);
                }
                self.apply(InputEvent::PointerUp);
            }
            WindowEvent::Scroll(_, off, _) => self.apply(InputEvent::Wheel(off as f32)),
            WindowEvent::Key(key, Action::Press, _) => self.process_key(key, now, view),
            _ => {}
        }
    }

    fn process_key(&mut self, key: Key, now: Instant, view: &View) {
        match key {
            KEY_CAMERA_MOVE_UP => self.apply(InputEvent::Rotate {
                yaw: 0.0,
                pitch: KEY_ANGLE_STEP,
            }),
            KEY_CAMERA_MOVE_DOWN => self.apply(InputEvent::Rotate {
                yaw: 0.0,
                pitch: -KEY_ANGLE_STEP,
            }),
            KEY_CAMERA_MOVE_LEFT => self.apply(InputEvent::Rotate {
                yaw: -KEY_ANGLE_STEP,
                pitch: 0.0,
            }),
            KEY_CAMERA_MOVE_RIGHT => self.apply(InputEvent::Rotate {
                yaw: KEY_ANGLE_STEP,
                pitch: 0.0,
            }),
            KEY_CAMERA_ZOOM_IN => self.apply(InputEvent::ZoomIn),
            KEY_CAMERA_ZOOM_OUT => self.apply(InputEvent::ZoomOut),
            Key::Left => self.apply(InputEvent::Pan {
                dx: -KEY_PAN_STEP,
                dz: 0.0,
            }),
            Key::Right => self.apply(InputEvent::Pan {
                dx: KEY_PAN_STEP,
                dz: 0.0,
            }),
            Key::Up => self.apply(InputEvent::Pan {
                dx: 0.0,
                dz: -KEY_PAN_STEP,
            }),
            Key::Down => self.apply(InputEvent::Pan {
                dx: 0.0,
                dz: KEY_PAN_STEP,
            }),
            KEY_NEXT_SELECTION => {
                let id = self.input.cycle_selection(view.registry().len(), 1);
                self.select(id, view);
            }
            KEY_PREV_SELECTION => {
                let id = self.input.cycle_selection(view.registry().len(), -1);
                self.select(id, view);
            }
            KEY_DESELECT => self.select(None, view),
            KEY_TOGGLE_FOLLOW => {
                self.apply(InputEvent::ToggleFollow);
                match self.input.camera.follow {
                    Some(id) => tracing::info!(body = %view.registry().get(id).name, "following"),
                    None => tracing::info!("follow off"),
                }
            }
            KEY_SPEED_UP => {
                self.clock.scale_rate(2.0, now);
                tracing::info!("Time scale is {}x", self.clock.rate());
            }
            KEY_SLOW_DOWN => {
                self.clock.scale_rate(0.5, now);
                tracing::info!("Time scale is {}x", self.clock.rate());
            }
            KEY_REWIND => {
                self.clock.reverse(now);
                tracing::info!("Time scale is {}x", self.clock.rate());
            }
            KEY_TOGGLE_PAUSE => {
                self.clock.toggle_pause(now);
                tracing::debug!(paused = self.clock.is_paused(), "toggled pause");
            }
            _ => {}
        }
    }

    fn select(&mut self, id: Option<BodyID>, view: &View) {
        if id != self.input.selected {
            match id {
                Some(id) => tracing::info!(body = %view.registry().get(id).name, "selected"),
                None => tracing::info!("selection cleared"),
            }
        }
        self.apply(InputEvent::Select(id));
    }

    fn apply(&mut self, event: InputEvent) {
        self.input = self.input.update(event);
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn clock(&self) -> &SceneClock {
        &self.clock
    }
}
