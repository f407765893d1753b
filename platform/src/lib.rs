// SPDX-FileCopyrightText: 2024 Jens Pitkänen <jens.pitkanen@helsinki.fi>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! This crate mainly revolves around the [`Platform`] trait, which can be
//! implemented to provide the GPU and audio backends for the engine's asset
//! groups. Otherwise, this crate contains the descriptor types which are
//! passed between the format-specific loaders, the package format, and the
//! backends.
//!
//! This is split off of the main engine crate so that the engine and the
//! backend implementations can be compiled independently, and so that
//! loaders can produce descriptors without depending on the engine.

#![no_std]
#![warn(missing_docs)]

extern crate alloc;

mod audio;
mod gfx;

use alloc::{string::String, vec::Vec};

pub use audio::*;
pub use gfx::*;

/// An active uniform of a compiled shader, as reported by
/// [`Platform::shader_uniforms`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderUniform {
    /// The name of the uniform as declared in the shader source.
    pub name: String,
    /// The location of the uniform, or -1 if the backend couldn't resolve a
    /// location for it (e.g. it was optimized out).
    pub location: i32,
}

/// A trait for creating and destroying GPU and audio resources from the
/// engine without depending on any backend implementation directly.
///
/// All the functions have a `&self` parameter, so that the methods can access
/// some (possibly internally mutable) state, but still keeping the platform
/// object as widely usable as possible (a "platform" is about as global an
/// object as you get). None of these functions are (supposed to be) hot, and
/// this trait is object safe, so using &dyn [`Platform`] should be fine
/// performance-wise.
///
/// ### Implementation note
///
/// Resources are owned by whoever created them. The engine's asset groups
/// destroy every resource they created exactly once, so implementations don't
/// need to track double frees.
pub trait Platform {
    /// Create a GPU buffer with the given contents. Returns None if the buffer
    /// could not be created due to any reason (out of vram, etc.).
    fn create_buffer(&self, desc: &GfxBufferDesc) -> Option<BufferRef>;

    /// Destroy a buffer created with [`Platform::create_buffer`].
    fn destroy_buffer(&self, buffer: BufferRef);

    /// Create a texture from the given pixels. Returns None if the texture
    /// could not be created due to any reason (texture dimensions too large,
    /// out of vram, etc.).
    fn create_texture(&self, desc: &GfxTextureDesc) -> Option<TextureRef>;

    /// Destroy a texture created with [`Platform::create_texture`].
    fn destroy_texture(&self, texture: TextureRef);

    /// Compile and link a shader program from the given sources. Returns None
    /// if compilation or linking failed.
    fn create_shader(&self, desc: &GfxShaderDesc) -> Option<ShaderRef>;

    /// Destroy a shader created with [`Platform::create_shader`].
    fn destroy_shader(&self, shader: ShaderRef);

    /// Returns the active uniforms of the shader program.
    fn shader_uniforms(&self, shader: ShaderRef) -> Vec<ShaderUniform>;

    /// Upload PCM data into a playable audio buffer. Returns None if the
    /// buffer could not be created (unsupported format, out of memory, etc.).
    fn create_audio_buffer(&self, desc: &AudioBufferDesc) -> Option<AudioBufferRef>;

    /// Destroy an audio buffer created with [`Platform::create_audio_buffer`].
    fn destroy_audio_buffer(&self, buffer: AudioBufferRef);
}
