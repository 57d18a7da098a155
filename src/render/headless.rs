use std::convert::Infallible;

use crate::lighting::LightRig;
use crate::math::{Mat4, Vec3};
use crate::resources::Material;
use crate::session::FrameBackend;

use super::common::{SceneUniform, UniformBlock};

/// Backend that packs uniforms exactly like the GPU renderer but never
/// touches a device. Used by `--summary-only` runs and in tests.
#[derive(Debug, Default)]
pub struct HeadlessRenderer {
    uniforms: UniformBlock,
    draws: u64,
    bytes_flushed: usize,
    last_flush: usize,
    last_clear: [f32; 4],
}

impl HeadlessRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn uniform(&self) -> &SceneUniform {
        self.uniforms.uniform()
    }

    pub fn draws(&self) -> u64 {
        self.draws
    }

    /// Bytes that a GPU backend would have written, across all frames.
    pub fn bytes_flushed(&self) -> usize {
        self.bytes_flushed
    }

    /// Bytes written by the most recent draw.
    pub fn last_flush(&self) -> usize {
        self.last_flush
    }

    pub fn last_clear(&self) -> [f32; 4] {
        self.last_clear
    }
}

impl FrameBackend for HeadlessRenderer {
    type Error = Infallible;

    fn upload_material(&mut self, material: &Material) {
        self.uniforms.set_material(material);
    }

    fn upload_eye(&mut self, eye: Vec3) {
        self.uniforms.set_eye(eye);
    }

    fn upload_model(&mut self, model: &Mat4) {
        self.uniforms.set_model(model);
    }

    fn upload_view(&mut self, view: &Mat4) {
        self.uniforms.set_view(view);
    }

    fn upload_projection(&mut self, projection: &Mat4) {
        self.uniforms.set_projection(projection);
    }

    fn upload_ambient(&mut self, ambient: Vec3) {
        self.uniforms.set_ambient(ambient);
    }

    fn upload_lights(&mut self, lights: &LightRig) {
        self.uniforms.set_lights(lights);
    }

    fn draw_frame(&mut self, clear_color: [f32; 4]) -> Result<(), Infallible> {
        self.last_flush = self
            .uniforms
            .take_dirty()
            .map(|(_, bytes)| bytes.len())
            .unwrap_or(0);
        self.bytes_flushed += self.last_flush;
        self.last_clear = clear_color;
        self.draws += 1;
        Ok(())
    }
}
