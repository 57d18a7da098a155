//! Parsers for the assets a scene is built from.
//!
//! Nothing here touches the filesystem; callers hand over the text or bytes
//! they loaded and get validated, GPU-ready data back.

use serde::Deserialize;
use thiserror::Error;

use crate::math::{vector, MathError, Vec3};

#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("model does not contain any meshes")]
    NoMeshes,

    #[error("{field} has {len} values, which is not a multiple of {stride}")]
    BadStride {
        field: &'static str,
        len: usize,
        stride: usize,
    },

    #[error("{field} describes {actual} vertices but positions describe {expected}")]
    VertexCountMismatch {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("face index {index} is out of range for {vertex_count} vertices")]
    IndexOutOfRange { index: u32, vertex_count: usize },

    #[error("material {field}: {source}")]
    Material {
        field: &'static str,
        #[source]
        source: MathError,
    },

    #[error("failed to decode texture: {0}")]
    Texture(#[from] image::ImageError),
}

/// Geometry of the first mesh in an assimp-style JSON export.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ModelData {
    /// `xyz` per vertex.
    pub positions: Vec<f32>,
    /// `xyz` per vertex.
    pub normals: Vec<f32>,
    /// `uv` per vertex.
    pub tex_coords: Vec<f32>,
    /// Triangle list, faces flattened in order.
    pub indices: Vec<u32>,
}

#[derive(Deserialize)]
struct ModelFile {
    #[serde(default)]
    meshes: Vec<MeshFile>,
}

#[derive(Deserialize)]
struct MeshFile {
    vertices: Vec<f32>,
    #[serde(default)]
    normals: Vec<f32>,
    #[serde(default)]
    texturecoords: Vec<Vec<f32>>,
    faces: Vec<Vec<u32>>,
}

impl ModelData {
    pub fn from_json_str(data: &str) -> Result<Self, ResourceError> {
        let file: ModelFile = serde_json::from_str(data)?;
        let mesh = file.meshes.into_iter().next().ok_or(ResourceError::NoMeshes)?;

        check_stride("vertices", &mesh.vertices, 3)?;
        let vertex_count = mesh.vertices.len() / 3;

        let normals = mesh.normals;
        check_stride("normals", &normals, 3)?;
        let normals = fill_or_check("normals", normals, 3, vertex_count)?;

        let tex_coords = mesh.texturecoords.into_iter().next().unwrap_or_default();
        check_stride("texturecoords", &tex_coords, 2)?;
        let tex_coords = fill_or_check("texturecoords", tex_coords, 2, vertex_count)?;

        let indices: Vec<u32> = mesh.faces.into_iter().flatten().collect();
        if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertex_count) {
            return Err(ResourceError::IndexOutOfRange {
                index,
                vertex_count,
            });
        }

        Ok(Self {
            positions: mesh.vertices,
            normals,
            tex_coords,
            indices,
        })
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

fn check_stride(field: &'static str, values: &[f32], stride: usize) -> Result<(), ResourceError> {
    if values.len() % stride != 0 {
        return Err(ResourceError::BadStride {
            field,
            len: values.len(),
            stride,
        });
    }
    Ok(())
}

/// Missing attributes are zero-filled; present ones must cover every vertex.
fn fill_or_check(
    field: &'static str,
    values: Vec<f32>,
    stride: usize,
    vertex_count: usize,
) -> Result<Vec<f32>, ResourceError> {
    if values.is_empty() {
        return Ok(vec![0.0; vertex_count * stride]);
    }
    let actual = values.len() / stride;
    if actual != vertex_count {
        return Err(ResourceError::VertexCountMismatch {
            field,
            expected: vertex_count,
            actual,
        });
    }
    Ok(values)
}

/// Surface constants handed to the fragment shader.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub specular: Vec3,
    pub emission: Vec3,
    pub roughness: f32,
    pub metallic: f32,
}

#[derive(Deserialize)]
struct MaterialFile {
    specular: Vec<f32>,
    emission: Vec<f32>,
    roughness: f32,
    metallic: f32,
}

impl Material {
    pub fn from_json_str(data: &str) -> Result<Self, ResourceError> {
        let file: MaterialFile = serde_json::from_str(data)?;
        let vec3 = |field: &'static str, values: &[f32]| {
            vector::from_slice::<3>(values)
                .map_err(|source| ResourceError::Material { field, source })
        };
        Ok(Self {
            specular: vec3("specular", &file.specular)?,
            emission: vec3("emission", &file.emission)?,
            roughness: file.roughness,
            metallic: file.metallic,
        })
    }
}

impl Default for Material {
    fn default() -> Self {
        Self {
            specular: [0.5, 0.5, 0.5],
            emission: [0.0, 0.0, 0.0],
            roughness: 0.5,
            metallic: 0.0,
        }
    }
}

/// WGSL source text for the two programmable stages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSources {
    pub vertex: String,
    pub fragment: String,
}

/// Decoded RGBA8 texture, stored bottom row first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl TextureImage {
    /// Decodes PNG or JPEG bytes. Rows are flipped so that `v = 0` addresses
    /// the bottom of the image, which is how the model's UVs are authored.
    pub fn decode(bytes: &[u8]) -> Result<Self, ResourceError> {
        let image = image::load_from_memory(bytes)?.flipv().to_rgba8();
        Ok(Self {
            width: image.width(),
            height: image.height(),
            rgba: image.into_raw(),
        })
    }

    /// Single opaque white texel, used when a scene ships no texture.
    pub fn white() -> Self {
        Self {
            width: 1,
            height: 1,
            rgba: vec![255; 4],
        }
    }
}

/// Everything the renderer needs, loaded up front.
#[derive(Debug, Clone)]
pub struct SceneResources {
    pub model: ModelData,
    pub material: Material,
    pub texture: TextureImage,
    pub shaders: ShaderSources,
}
