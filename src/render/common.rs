use std::mem::{offset_of, size_of};
use std::ops::Range;

use bytemuck::{Pod, Zeroable};

use crate::lighting::{LightRig, MAX_DIRECTION_LIGHTS};
use crate::math::{mat4, Mat4, Vec3};
use crate::resources::Material;

/// Right-multiplied onto a projection: `z' = (z + w) / 2`.
#[rustfmt::skip]
const DEPTH_ZERO_TO_ONE: Mat4 = [
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
];

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct LightUniform {
    pub intensity: [f32; 4],
    pub direction: [f32; 4],
}

/// Mirror of the `Scene` uniform struct declared by the shaders.
///
/// Matrices are copied verbatim from their row-major storage; WGSL reads
/// each run of four floats as a column.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct SceneUniform {
    pub model: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
    pub eye: [f32; 4],
    pub ambient: [f32; 4],
    /// `xyz` specular, `w` roughness.
    pub specular: [f32; 4],
    /// `xyz` emission, `w` metallic.
    pub emission: [f32; 4],
    pub lights: [LightUniform; MAX_DIRECTION_LIGHTS],
}

/// CPU-side copy of [`SceneUniform`] that remembers which bytes changed
/// since the last flush, so a frame only sends what it touched.
#[derive(Debug, Default)]
pub struct UniformBlock {
    data: SceneUniform,
    dirty: Option<Range<usize>>,
}

impl UniformBlock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn uniform(&self) -> &SceneUniform {
        &self.data
    }

    pub fn set_model(&mut self, model: &Mat4) {
        self.data.model = columns(model);
        self.mark(offset_of!(SceneUniform, model), size_of::<[[f32; 4]; 4]>());
    }

    pub fn set_view(&mut self, view: &Mat4) {
        self.data.view = columns(view);
        self.mark(offset_of!(SceneUniform, view), size_of::<[[f32; 4]; 4]>());
    }

    /// Stores `projection` remapped from `[-1, 1]` clip depth to the
    /// `[0, 1]` range wgpu rasterizes.
    pub fn set_projection(&mut self, projection: &Mat4) {
        self.data.projection = columns(&mat4::multiply(projection, &DEPTH_ZERO_TO_ONE));
        self.mark(
            offset_of!(SceneUniform, projection),
            size_of::<[[f32; 4]; 4]>(),
        );
    }

    pub fn set_eye(&mut self, eye: Vec3) {
        self.data.eye = extend(eye, 1.0);
        self.mark(offset_of!(SceneUniform, eye), size_of::<[f32; 4]>());
    }

    pub fn set_ambient(&mut self, ambient: Vec3) {
        self.data.ambient = extend(ambient, 0.0);
        self.mark(offset_of!(SceneUniform, ambient), size_of::<[f32; 4]>());
    }

    pub fn set_material(&mut self, material: &Material) {
        self.data.specular = extend(material.specular, material.roughness);
        self.data.emission = extend(material.emission, material.metallic);
        self.mark(offset_of!(SceneUniform, specular), 2 * size_of::<[f32; 4]>());
    }

    pub fn set_lights(&mut self, rig: &LightRig) {
        for light in rig.lights() {
            self.data.lights[light.slot] = LightUniform {
                intensity: extend(light.intensity, 0.0),
                direction: extend(light.direction, 0.0),
            };
        }
        self.mark(
            offset_of!(SceneUniform, lights),
            size_of::<[LightUniform; MAX_DIRECTION_LIGHTS]>(),
        );
    }

    /// Returns the byte offset and contents of everything changed since the
    /// previous call, or `None` when nothing changed.
    pub fn take_dirty(&mut self) -> Option<(u64, &[u8])> {
        let range = self.dirty.take()?;
        let bytes = bytemuck::bytes_of(&self.data);
        Some((range.start as u64, &bytes[range]))
    }

    fn mark(&mut self, offset: usize, len: usize) {
        let range = offset..offset + len;
        self.dirty = Some(match self.dirty.take() {
            Some(dirty) => dirty.start.min(range.start)..dirty.end.max(range.end),
            None => range,
        });
    }
}

fn columns(m: &Mat4) -> [[f32; 4]; 4] {
    bytemuck::cast(*m)
}

fn extend(v: Vec3, w: f32) -> [f32; 4] {
    [v[0], v[1], v[2], w]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SceneConfig;

    #[test]
    fn uniform_layout_matches_shader_struct() {
        assert_eq!(size_of::<SceneUniform>(), 384);
        assert_eq!(offset_of!(SceneUniform, eye), 192);
        assert_eq!(offset_of!(SceneUniform, lights), 256);
        assert_eq!(size_of::<SceneUniform>() % 16, 0);
    }

    #[test]
    fn model_update_only_dirties_model_bytes() {
        let mut block = UniformBlock::new();
        block.set_model(&mat4::rotate(&mat4::identity(), [0.0, 1.0, 0.0], 0.5));
        let (offset, bytes) = block.take_dirty().unwrap();
        assert_eq!(offset, 0);
        assert_eq!(bytes.len(), 64);
        assert!(block.take_dirty().is_none());
    }

    #[test]
    fn dirty_ranges_merge() {
        let mut block = UniformBlock::new();
        block.set_eye([0.0, 0.0, 40.0]);
        block.set_lights(&LightRig::default_rig());
        let (offset, bytes) = block.take_dirty().unwrap();
        assert_eq!(offset, 192);
        assert_eq!(bytes.len(), 384 - 192);
    }

    #[test]
    fn matrices_keep_flat_order() {
        let mut block = UniformBlock::new();
        let view = mat4::look_at([0.0, 0.0, 40.0], [0.0; 3], [0.0, 1.0, 0.0]);
        block.set_view(&view);
        let flat: [f32; 16] = bytemuck::cast(block.uniform().view);
        assert_eq!(flat, view);
        assert_eq!(block.uniform().view[3][2], -40.0);
    }

    fn ndc_depth(projection: &Mat4, view_depth: f32) -> f32 {
        let clip = mat4::transform_point([0.0, 0.0, -view_depth], projection);
        clip[2] / clip[3]
    }

    #[test]
    fn projection_depth_lands_in_zero_to_one() {
        let config = SceneConfig::default();
        let [near, far] = config.depth_range();
        let projection = mat4::perspective(config.fov, 1.0, config.depth_range());
        let mut block = UniformBlock::new();
        block.set_projection(&projection);
        let uploaded: Mat4 = bytemuck::cast(block.uniform().projection);

        assert!(ndc_depth(&uploaded, near).abs() < 1e-4);
        assert!((ndc_depth(&uploaded, far) - 1.0).abs() < 1e-4);
        assert!(ndc_depth(&uploaded, 0.15) > 0.0);
        assert!(ndc_depth(&uploaded, 40.0) < 1.0);
        // x, y and w are untouched.
        assert_eq!(uploaded[0], projection[0]);
        assert_eq!(uploaded[5], projection[5]);
        assert_eq!(uploaded[11], projection[11]);
        assert!((ndc_depth(&projection, near) + 1.0).abs() < 1e-4);
    }

    #[test]
    fn material_packs_scalars_into_w() {
        let mut block = UniformBlock::new();
        let material = Material {
            specular: [1.0, 0.9, 0.8],
            emission: [0.1, 0.0, 0.0],
            roughness: 0.25,
            metallic: 0.75,
        };
        block.set_material(&material);
        assert_eq!(block.uniform().specular, [1.0, 0.9, 0.8, 0.25]);
        assert_eq!(block.uniform().emission, [0.1, 0.0, 0.0, 0.75]);
        let (offset, bytes) = block.take_dirty().unwrap();
        assert_eq!((offset, bytes.len()), (224, 32));
    }

    #[test]
    fn lights_land_in_their_slots() {
        let mut block = UniformBlock::new();
        block.set_lights(&LightRig::default_rig());
        let lights = block.uniform().lights;
        assert_eq!(lights[0].intensity, [0.0, 0.5, 0.0, 0.0]);
        assert_eq!(lights[2].direction, [-1.0, 0.5, 1.5, 0.0]);
        assert_eq!(lights[3], LightUniform::default());
    }
}
