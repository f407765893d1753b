// SPDX-FileCopyrightText: 2025 Jens Pitkänen <jens.pitkanen@helsinki.fi>
//
// SPDX-License-Identifier: GPL-3.0-or-later

use platform::{AudioBufferDesc, GfxShaderDesc, GfxTextureDesc};

use super::{
    deserialize::{SHADER_KIND_COMPUTE, SHADER_KIND_GRAPHICS},
    package::{NamedAsset, RunHeader},
};

pub trait Serialize {
    /// The length of the buffer passed into [`Serialize::serialize`].
    fn serialized_size(&self) -> usize;
    /// Serializes the value into the byte buffer. The length of `dst` must
    /// match [`Serialize::serialized_size`].
    fn serialize(&self, dst: &mut [u8]);
}

/// Serializes `value` into a new buffer of exactly the right size.
pub fn serialize_to_vec<S: Serialize + ?Sized>(value: &S) -> Vec<u8> {
    let mut dst = vec![0; value.serialized_size()];
    let mut cursor = 0;
    serialize(value, &mut dst, &mut cursor);
    dst
}

impl<S: Serialize> Serialize for NamedAsset<S> {
    fn serialized_size(&self) -> usize {
        self.name.serialized_size() + u32::SIZE + self.asset.serialized_size()
    }
    fn serialize(&self, dst: &mut [u8]) {
        assert_eq!(self.serialized_size(), dst.len());
        let mut cursor = 0;
        let NamedAsset { name, asset } = self;
        serialize::<str>(name, dst, &mut cursor);
        serialize::<u32>(&length_prefix(asset.serialized_size()), dst, &mut cursor);
        serialize::<S>(asset, dst, &mut cursor);
    }
}

impl Serialize for RunHeader {
    fn serialized_size(&self) -> usize {
        u8::SIZE + u32::SIZE
    }
    fn serialize(&self, dst: &mut [u8]) {
        assert_eq!(self.serialized_size(), dst.len());
        let mut cursor = 0;
        let RunHeader { asset_type, count } = self;
        serialize::<u8>(&asset_type.tag(), dst, &mut cursor);
        serialize::<u32>(count, dst, &mut cursor);
    }
}

impl Serialize for GfxTextureDesc {
    fn serialized_size(&self) -> usize {
        u32::SIZE * 2 + u8::SIZE + self.pixels.len()
    }
    fn serialize(&self, dst: &mut [u8]) {
        assert_eq!(self.serialized_size(), dst.len());
        let mut cursor = 0;
        let GfxTextureDesc {
            width,
            height,
            format,
            pixels,
        } = self;
        serialize::<u32>(width, dst, &mut cursor);
        serialize::<u32>(height, dst, &mut cursor);
        serialize::<u8>(&(*format as u8), dst, &mut cursor);
        // The pixel count is implied by the dimensions and format.
        dst[cursor..].copy_from_slice(pixels);
    }
}

impl Serialize for GfxShaderDesc {
    fn serialized_size(&self) -> usize {
        u8::SIZE
            + match self {
                GfxShaderDesc::Graphics { vertex, pixel } => {
                    vertex.serialized_size() + pixel.serialized_size()
                }
                GfxShaderDesc::Compute { compute } => compute.serialized_size(),
            }
    }
    fn serialize(&self, dst: &mut [u8]) {
        assert_eq!(self.serialized_size(), dst.len());
        let mut cursor = 0;
        match self {
            GfxShaderDesc::Graphics { vertex, pixel } => {
                serialize::<u8>(&SHADER_KIND_GRAPHICS, dst, &mut cursor);
                serialize::<str>(vertex, dst, &mut cursor);
                serialize::<str>(pixel, dst, &mut cursor);
            }
            GfxShaderDesc::Compute { compute } => {
                serialize::<u8>(&SHADER_KIND_COMPUTE, dst, &mut cursor);
                serialize::<str>(compute, dst, &mut cursor);
            }
        }
    }
}

impl Serialize for AudioBufferDesc {
    fn serialized_size(&self) -> usize {
        u8::SIZE * 2 + u32::SIZE * 2 + self.pcm.len()
    }
    fn serialize(&self, dst: &mut [u8]) {
        assert_eq!(self.serialized_size(), dst.len());
        let mut cursor = 0;
        let AudioBufferDesc {
            format,
            channels,
            sample_rate,
            pcm,
        } = self;
        serialize::<u8>(&(*format as u8), dst, &mut cursor);
        serialize::<u8>(channels, dst, &mut cursor);
        serialize::<u32>(&length_prefix(pcm.len()), dst, &mut cursor);
        serialize::<u32>(sample_rate, dst, &mut cursor);
        dst[cursor..].copy_from_slice(pcm);
    }
}

// Serialization helpers, at the bottom because they're very long, just so they
// compile to something sane in debug builds.

#[inline(always)]
pub fn serialize<S: Serialize + ?Sized>(value: &S, dst: &mut [u8], cursor: &mut usize) {
    let size = value.serialized_size();
    value.serialize(&mut dst[*cursor..(*cursor + size)]);
    *cursor += size;
}

fn length_prefix(len: usize) -> u32 {
    assert!(
        len <= u32::MAX as usize,
        "length prefixes only support lengths up to 4 GiB",
    );
    len as u32
}

/// Fixed sizes of the primitives, for the `serialized_size` implementations.
trait FixedSize {
    const SIZE: usize;
}

impl FixedSize for u8 {
    const SIZE: usize = 1;
}

impl FixedSize for u32 {
    const SIZE: usize = 4;
}

impl Serialize for str {
    fn serialized_size(&self) -> usize {
        self.as_bytes().serialized_size()
    }
    #[inline]
    fn serialize(&self, dst: &mut [u8]) {
        self.as_bytes().serialize(dst);
    }
}

impl Serialize for String {
    fn serialized_size(&self) -> usize {
        self.as_str().serialized_size()
    }
    #[inline]
    fn serialize(&self, dst: &mut [u8]) {
        self.as_str().serialize(dst);
    }
}

impl Serialize for [u8] {
    fn serialized_size(&self) -> usize {
        u32::SIZE + self.len()
    }
    #[inline]
    fn serialize(&self, dst: &mut [u8]) {
        assert_eq!(self.serialized_size(), dst.len());
        length_prefix(self.len()).serialize(&mut dst[0..4]);
        dst[4..].copy_from_slice(self);
    }
}

impl Serialize for u8 {
    fn serialized_size(&self) -> usize {
        u8::SIZE
    }
    #[inline]
    fn serialize(&self, dst: &mut [u8]) {
        assert_eq!(u8::SIZE, dst.len());
        dst[0] = *self;
    }
}

impl Serialize for u32 {
    fn serialized_size(&self) -> usize {
        u32::SIZE
    }
    #[inline]
    fn serialize(&self, dst: &mut [u8]) {
        assert_eq!(u32::SIZE, dst.len());
        dst.copy_from_slice(&self.to_le_bytes());
    }
}

#[cfg(test)]
mod tests {
    use platform::{GfxShaderDesc, GfxTextureDesc, PixelFormat};

    use crate::resources::{package::NamedAsset, AssetType};

    use super::{serialize_to_vec, RunHeader};

    #[test]
    fn integers_are_little_endian() {
        assert_eq!(vec![0x04, 0x03, 0x02, 0x01], serialize_to_vec(&0x01020304u32));
    }

    #[test]
    fn strings_are_length_prefixed() {
        assert_eq!(vec![2, 0, 0, 0, b'h', b'i'], serialize_to_vec("hi"));
    }

    #[test]
    fn run_header_layout() {
        let header = RunHeader {
            asset_type: AssetType::Texture,
            count: 2,
        };
        assert_eq!(vec![1, 2, 0, 0, 0], serialize_to_vec(&header));
    }

    #[test]
    fn texture_pixels_are_written_without_prefix() {
        let texture = GfxTextureDesc {
            width: 1,
            height: 1,
            format: PixelFormat::Rgba,
            pixels: vec![0xAA, 0xBB, 0xCC, 0xDD],
        };
        let bytes = serialize_to_vec(&texture);
        assert_eq!(
            vec![1, 0, 0, 0, 1, 0, 0, 0, 0, 0xAA, 0xBB, 0xCC, 0xDD],
            bytes,
        );
    }

    #[test]
    fn named_asset_prefixes_descriptor_size() {
        let shader = NamedAsset {
            name: String::from("a"),
            asset: GfxShaderDesc::Compute {
                compute: String::from("x"),
            },
        };
        let bytes = serialize_to_vec(&shader);
        // name: 4 + 1, descriptor size: 4, descriptor: 1 + 4 + 1
        assert_eq!(15, bytes.len());
        assert_eq!(&[6, 0, 0, 0], &bytes[5..9], "descriptor size prefix mismatch");
    }
}
