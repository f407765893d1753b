// SPDX-FileCopyrightText: 2024 Jens Pitkänen <jens.pitkanen@helsinki.fi>
//
// SPDX-License-Identifier: GPL-3.0-or-later

use alloc::{string::String, vec::Vec};

macro_rules! gen_resource_ref {
    ($(#[$attr:meta])* $ref_name:ident) => {
        $(#[$attr])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $ref_name(u64);

        impl $ref_name {
            #[doc = concat!("Creates a new [`", stringify!($ref_name), "`]. Should only be created")]
            /// in the platform implementation, which also knows how the inner
            /// value is going to be used.
            pub fn new(id: u64) -> $ref_name {
                $ref_name(id)
            }

            #[doc = concat!("Returns the inner value passed into [`", stringify!($ref_name), "::new`].")]
            /// Generally only relevant to the platform implementation.
            pub fn inner(self) -> u64 {
                self.0
            }
        }
    };
}

pub(crate) use gen_resource_ref;

gen_resource_ref!(
    /// Platform-specific GPU buffer reference.
    BufferRef
);

gen_resource_ref!(
    /// Platform-specific texture reference.
    TextureRef
);

gen_resource_ref!(
    /// Platform-specific shader program reference.
    ShaderRef
);

/// Descriptions of pixel data layouts, used to interpret the byte arrays passed
/// into uploading functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PixelFormat {
    /// 8-bit per channel RGBA colors, arranged in order: `[red, green, blue,
    /// alpha, red, ...]`.
    Rgba = 0,
    /// 8-bit per channel RGB colors, arranged in order: `[red, green, blue,
    /// red, ...]`.
    Rgb = 1,
    /// A single 8-bit channel, used for e.g. glyph coverage masks.
    R = 2,
}

impl PixelFormat {
    /// Returns the amount of bytes each pixel takes up in a pixel buffer if
    /// that buffer is using this pixel format.
    ///
    /// E.g. for 8-bit RGBA, this returns 4, as each of the four channels takes
    /// up eight bits.
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::Rgba => 4,
            PixelFormat::Rgb => 3,
            PixelFormat::R => 1,
        }
    }

    /// Returns the pixel format with the given `repr(u8)` value, if there is
    /// one.
    pub const fn from_u8(value: u8) -> Option<PixelFormat> {
        match value {
            0 => Some(PixelFormat::Rgba),
            1 => Some(PixelFormat::Rgb),
            2 => Some(PixelFormat::R),
            _ => None,
        }
    }
}

/// How a GPU buffer is going to be bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferUsage {
    /// Vertex attribute data.
    Vertex,
    /// Index data for indexed draws.
    Index,
    /// Uniform block data.
    Uniform,
}

/// Everything needed to create a GPU buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GfxBufferDesc {
    /// What the buffer will be bound as.
    pub usage: BufferUsage,
    /// The initial contents of the buffer. Use [`bytemuck::cast_slice`] to
    /// pass in e.g. vertex structs.
    pub data: Vec<u8>,
}

/// Everything needed to create a texture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GfxTextureDesc {
    /// The width of the texture in pixels.
    pub width: u32,
    /// The height of the texture in pixels.
    pub height: u32,
    /// The layout of `pixels`.
    pub format: PixelFormat,
    /// Tightly packed pixels, row by row starting from the top-left. Should be
    /// [`GfxTextureDesc::pixel_data_size`] bytes long.
    pub pixels: Vec<u8>,
}

impl GfxTextureDesc {
    /// Returns the amount of pixel bytes a texture with these dimensions and
    /// this format has.
    pub fn pixel_data_size(&self) -> usize {
        self.width as usize * self.height as usize * self.format.bytes_per_pixel()
    }
}

/// The sources of a shader program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GfxShaderDesc {
    /// A rasterization pipeline program.
    Graphics {
        /// Vertex stage source.
        vertex: String,
        /// Pixel (fragment) stage source.
        pixel: String,
    },
    /// A compute program.
    Compute {
        /// Compute stage source.
        compute: String,
    },
}
