//! Flat row-major vector and matrix math plus a small scene renderer that
//! spins one lit, textured mesh.
//!
//! The math lives in [`math`] as free functions over fixed-size `f32`
//! arrays. Everything above it is split so the interesting parts stay
//! testable without a GPU: [`resources`] parses asset bytes, [`session`]
//! owns the per-frame state and drives any [`session::FrameBackend`], and
//! [`render`] holds the wgpu backend alongside a headless one.

pub mod config;
pub mod lighting;
pub mod math;
pub mod render;
pub mod resources;
pub mod session;

pub use config::{ConfigError, SceneConfig};
pub use lighting::{DirectionLight, LightError, LightRig, MAX_DIRECTION_LIGHTS};
pub use math::{Mat2, Mat3, Mat4, MathError, Vec2, Vec3};
pub use render::{HeadlessRenderer, Renderer};
pub use resources::{
    Material, ModelData, ResourceError, SceneResources, ShaderSources, TextureImage,
};
pub use session::{FrameBackend, FrameStats, RenderSession};
