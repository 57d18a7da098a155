pub mod common;
pub mod headless;
pub mod native;

pub use common::{LightUniform, SceneUniform, UniformBlock};
pub use headless::HeadlessRenderer;
pub use native::Renderer;
