//! Render-session orchestration.
//!
//! A [`RenderSession`] owns the camera matrices, material and light rig for
//! one run of the demo. It pushes static state to a [`FrameBackend`] once in
//! [`RenderSession::begin`], then on every display refresh recomputes the
//! model matrix from elapsed time and asks the backend for a single draw.

use std::f32::consts::TAU;
use std::time::Duration;

use log::{debug, info};

use crate::config::SceneConfig;
use crate::lighting::LightRig;
use crate::math::{mat4, Mat4, Vec3};
use crate::resources::Material;

/// Destination for the values a session produces.
///
/// Implemented by the GPU renderer and by headless backends.
pub trait FrameBackend {
    type Error;

    fn upload_material(&mut self, material: &Material);
    fn upload_eye(&mut self, eye: Vec3);
    fn upload_model(&mut self, model: &Mat4);
    fn upload_view(&mut self, view: &Mat4);
    fn upload_projection(&mut self, projection: &Mat4);
    fn upload_ambient(&mut self, ambient: Vec3);
    fn upload_lights(&mut self, lights: &LightRig);

    /// Clears color and depth, then issues the indexed draw.
    fn draw_frame(&mut self, clear_color: [f32; 4]) -> Result<(), Self::Error>;
}

/// Result of one [`RenderSession::frame`] call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStats {
    pub frame: u64,
    pub angle: f32,
    pub model: Mat4,
}

#[derive(Debug, Clone)]
pub struct RenderSession {
    config: SceneConfig,
    material: Material,
    lights: LightRig,
    model: Mat4,
    view: Mat4,
    projection: Mat4,
    frames: u64,
}

impl RenderSession {
    pub fn new(
        config: SceneConfig,
        material: Material,
        lights: LightRig,
        width: u32,
        height: u32,
    ) -> Self {
        let view = mat4::look_at(config.eye, config.target, config.up);
        let projection = projection_for(&config, width, height);
        debug!("view matrix: {view:?}");
        debug!("projection matrix: {projection:?}");
        Self {
            config,
            material,
            lights,
            model: mat4::identity(),
            view,
            projection,
            frames: 0,
        }
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn lights(&self) -> &LightRig {
        &self.lights
    }

    pub fn model(&self) -> &Mat4 {
        &self.model
    }

    pub fn view(&self) -> &Mat4 {
        &self.view
    }

    pub fn projection(&self) -> &Mat4 {
        &self.projection
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames
    }

    /// Uploads every piece of static state. Call once before the first frame.
    pub fn begin<B: FrameBackend>(&self, backend: &mut B) {
        backend.upload_material(&self.material);
        backend.upload_eye(self.config.eye);
        backend.upload_model(&self.model);
        backend.upload_view(&self.view);
        backend.upload_projection(&self.projection);
        backend.upload_ambient(self.config.ambient_light);
        backend.upload_lights(&self.lights);
        info!(
            "scene session started ({} direction lights lit)",
            self.lights.lit_count()
        );
    }

    /// Rotation angle after `elapsed` wall-clock time. Grows without bound;
    /// the trigonometry in [`mat4::rotate`] wraps it.
    pub fn angle_at(&self, elapsed: Duration) -> f32 {
        TAU * elapsed.as_secs_f32() / self.config.rotation_period_secs
    }

    /// Model matrix for `angle`, built from identity with both configured
    /// axes turned by the same angle.
    pub fn model_at(&self, angle: f32) -> Mat4 {
        let model = mat4::rotate(&mat4::identity(), self.config.primary_axis, angle);
        mat4::rotate(&model, self.config.secondary_axis, angle)
    }

    /// Advances to the state at `elapsed`, re-uploads the model matrix and
    /// draws once.
    pub fn frame<B: FrameBackend>(
        &mut self,
        backend: &mut B,
        elapsed: Duration,
    ) -> Result<FrameStats, B::Error> {
        let angle = self.angle_at(elapsed);
        self.model = self.model_at(angle);
        backend.upload_model(&self.model);
        backend.draw_frame(self.config.clear_color)?;
        self.frames += 1;
        Ok(FrameStats {
            frame: self.frames,
            angle,
            model: self.model,
        })
    }

    /// Replaces the directional lights and pushes them to the backend.
    pub fn update_direction_lights<B: FrameBackend>(&mut self, backend: &mut B, lights: LightRig) {
        self.lights = lights;
        backend.upload_lights(&self.lights);
        debug!("direction lights updated: {:?}", self.lights.lights());
    }

    /// Recomputes the projection for a new surface size.
    pub fn resize<B: FrameBackend>(&mut self, backend: &mut B, width: u32, height: u32) {
        self.projection = projection_for(&self.config, width, height);
        backend.upload_projection(&self.projection);
    }
}

fn projection_for(config: &SceneConfig, width: u32, height: u32) -> Mat4 {
    let aspect = width as f32 / height.max(1) as f32;
    mat4::perspective(config.fov, aspect, config.depth_range())
}
