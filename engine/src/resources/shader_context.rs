// SPDX-FileCopyrightText: 2025 Jens Pitkänen <jens.pitkanen@helsinki.fi>
//
// SPDX-License-Identifier: GPL-3.0-or-later

use arrayvec::{ArrayString, ArrayVec};
use platform::ShaderUniform;
use tracing::{trace, warn};

use super::AssetId;

/// The maximum amount of uniform locations cached per shader.
pub const MAX_SHADER_UNIFORMS: usize = 32;
/// The maximum length of a uniform name, in bytes.
pub const UNIFORM_NAME_LENGTH: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniformLocation {
    pub name: ArrayString<UNIFORM_NAME_LENGTH>,
    pub location: i32,
}

/// A shader and the locations of its uniforms, so that draw code can look up
/// uniforms by name without querying the backend.
#[derive(Debug, Clone)]
pub struct ShaderContext {
    shader: AssetId,
    uniforms: ArrayVec<UniformLocation, MAX_SHADER_UNIFORMS>,
}

impl ShaderContext {
    /// Creates a context for `shader` from the uniforms the backend reported
    /// for it. Uniforms without a location are left out.
    pub(crate) fn new(shader: AssetId, shader_uniforms: Vec<ShaderUniform>) -> ShaderContext {
        let mut uniforms = ArrayVec::new();
        for ShaderUniform { name, location } in shader_uniforms {
            if location == -1 {
                trace!("Uniform {name} of shader {shader:?} has no location, skipping.");
                continue;
            }
            let Ok(name) = ArrayString::from(&name) else {
                warn!(
                    "Uniform name {name:?} is longer than {UNIFORM_NAME_LENGTH} bytes, it won't be cached.",
                );
                continue;
            };
            if let Err(err) = uniforms.try_push(UniformLocation { name, location }) {
                warn!(
                    "Shader {shader:?} has more than {MAX_SHADER_UNIFORMS} uniforms, uniform {} won't be cached.",
                    err.element().name,
                );
            }
        }
        ShaderContext { shader, uniforms }
    }

    pub fn shader(&self) -> AssetId {
        self.shader
    }

    pub fn uniforms(&self) -> &[UniformLocation] {
        &self.uniforms
    }

    /// Returns the cached location of the uniform called `name`.
    pub fn uniform_location(&self, name: &str) -> Option<i32> {
        self.uniforms
            .iter()
            .find(|uniform| uniform.name.as_str() == name)
            .map(|uniform| uniform.location)
    }
}
