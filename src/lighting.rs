use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::math::Vec3;

/// Size of the directional light array declared by the shaders.
pub const MAX_DIRECTION_LIGHTS: usize = 4;

pub const DEFAULT_AMBIENT_LIGHT: Vec3 = [0.05, 0.05, 0.1];

#[derive(Debug, Error)]
pub enum LightError {
    #[error("{count} direction lights given, at most {max} are supported", max = MAX_DIRECTION_LIGHTS)]
    TooMany { count: usize },

    #[error("invalid light JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// A directional light bound to one entry of the shader's light array.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DirectionLight {
    pub intensity: Vec3,
    pub direction: Vec3,
    /// Index into the shader light array; assigned by [`LightRig`].
    #[serde(skip)]
    pub slot: usize,
}

impl DirectionLight {
    pub fn new(intensity: Vec3, direction: Vec3) -> Self {
        Self {
            intensity,
            direction,
            slot: 0,
        }
    }

    fn off() -> Self {
        Self::new([0.0; 3], [0.0; 3])
    }

    /// True when the light shades anything: some color and a non-zero
    /// direction. The fragment shader skips zero-direction slots.
    pub fn is_lit(&self) -> bool {
        self.intensity.iter().any(|&c| c != 0.0) && self.direction.iter().any(|&d| d != 0.0)
    }
}

/// The full set of directional lights for a scene, always
/// [`MAX_DIRECTION_LIGHTS`] long so every shader slot is written.
#[derive(Debug, Clone, PartialEq)]
pub struct LightRig {
    lights: [DirectionLight; MAX_DIRECTION_LIGHTS],
}

impl LightRig {
    /// Assigns slots in order and pads with unlit entries.
    pub fn new(lights: Vec<DirectionLight>) -> Result<Self, LightError> {
        if lights.len() > MAX_DIRECTION_LIGHTS {
            return Err(LightError::TooMany {
                count: lights.len(),
            });
        }
        let mut slots = [DirectionLight::off(); MAX_DIRECTION_LIGHTS];
        slots[..lights.len()].copy_from_slice(&lights);
        Ok(Self::from_slots(slots))
    }

    fn from_slots(mut lights: [DirectionLight; MAX_DIRECTION_LIGHTS]) -> Self {
        for (slot, light) in lights.iter_mut().enumerate() {
            light.slot = slot;
        }
        Self { lights }
    }

    /// Green key light above the camera with red and blue fills to either
    /// side; the fourth slot is dark.
    pub fn default_rig() -> Self {
        Self::from_slots([
            DirectionLight::new([0.0, 0.5, 0.0], [0.0, 0.5, 1.5]),
            DirectionLight::new([0.5, 0.0, 0.0], [1.0, 0.5, 1.5]),
            DirectionLight::new([0.0, 0.0, 0.5], [-1.0, 0.5, 1.5]),
            DirectionLight::off(),
        ])
    }

    /// Parses `[{"intensity": [r, g, b], "direction": [x, y, z]}, ...]`.
    pub fn from_json_str(data: &str) -> Result<Self, LightError> {
        let lights: Vec<DirectionLight> = serde_json::from_str(data)?;
        Self::new(lights)
    }

    pub fn lights(&self) -> &[DirectionLight; MAX_DIRECTION_LIGHTS] {
        &self.lights
    }

    /// Number of lights that contribute any color.
    pub fn lit_count(&self) -> usize {
        self.lights.iter().filter(|light| light.is_lit()).count()
    }
}

impl Default for LightRig {
    fn default() -> Self {
        Self::default_rig()
    }
}
