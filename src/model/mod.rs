pub mod body;
pub mod clock;
pub mod input;
pub mod motion;
pub mod registry;
pub mod selection;

pub use body::{BodyFacts, BodyID, CelestialBody, Ring};
pub use clock::SceneClock;
pub use input::{CameraLimits, CameraState, InputEvent, InputState};
pub use motion::BodyPose;
pub use registry::BodyRegistry;
