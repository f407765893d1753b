// SPDX-FileCopyrightText: 2025 Jens Pitkänen <jens.pitkanen@helsinki.fi>
//
// SPDX-License-Identifier: GPL-3.0-or-later

use platform::{AudioBufferDesc, AudioFormat, GfxShaderDesc, GfxTextureDesc, PixelFormat};
use thiserror::Error;

use super::{
    package::{NamedAsset, RunHeader},
    AssetType,
};

pub(crate) const SHADER_KIND_GRAPHICS: u8 = 0;
pub(crate) const SHADER_KIND_COMPUTE: u8 = 1;

/// The reasons a byte buffer can fail to deserialize.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DeserializeError {
    #[error("unexpected end of data")]
    Truncated,
    #[error("{0:#04x} is not an asset type tag")]
    InvalidAssetType(u8),
    #[error("{0:#04x} is not a pixel format")]
    InvalidPixelFormat(u8),
    #[error("{0:#04x} is not an audio format")]
    InvalidAudioFormat(u8),
    #[error("{0:#04x} is not a shader kind")]
    InvalidShaderKind(u8),
    #[error("shader source is not valid UTF-8")]
    InvalidUtf8,
    #[error("descriptor was {expected} bytes according to its size prefix, but {actual} bytes were read")]
    SizeMismatch { expected: usize, actual: usize },
}

pub trait Deserialize: Sized {
    /// Deserializes a value from the start of `src`, returning the value and
    /// the amount of bytes it was serialized as.
    fn deserialize(src: &[u8]) -> Result<(Self, usize), DeserializeError>;
}

impl<D: Deserialize> Deserialize for NamedAsset<D> {
    fn deserialize(src: &[u8]) -> Result<(Self, usize), DeserializeError> {
        let mut cursor = 0;
        let name = deserialize::<String>(src, &mut cursor)?;
        let size = deserialize::<u32>(src, &mut cursor)? as usize;
        let descriptor_bytes = take(src, &mut cursor, size)?;
        let (asset, actual) = D::deserialize(descriptor_bytes)?;
        if actual != size {
            return Err(DeserializeError::SizeMismatch {
                expected: size,
                actual,
            });
        }
        Ok((NamedAsset { name, asset }, cursor))
    }
}

impl Deserialize for RunHeader {
    fn deserialize(src: &[u8]) -> Result<(Self, usize), DeserializeError> {
        let mut cursor = 0;
        let tag = deserialize::<u8>(src, &mut cursor)?;
        let asset_type = AssetType::from_tag(tag).ok_or(DeserializeError::InvalidAssetType(tag))?;
        let count = deserialize::<u32>(src, &mut cursor)?;
        Ok((RunHeader { asset_type, count }, cursor))
    }
}

impl Deserialize for GfxTextureDesc {
    fn deserialize(src: &[u8]) -> Result<(Self, usize), DeserializeError> {
        let mut cursor = 0;
        let width = deserialize::<u32>(src, &mut cursor)?;
        let height = deserialize::<u32>(src, &mut cursor)?;
        let format_tag = deserialize::<u8>(src, &mut cursor)?;
        let format = PixelFormat::from_u8(format_tag)
            .ok_or(DeserializeError::InvalidPixelFormat(format_tag))?;
        let pixel_data_size = (width as usize)
            .checked_mul(height as usize)
            .and_then(|pixels| pixels.checked_mul(format.bytes_per_pixel()))
            .ok_or(DeserializeError::Truncated)?;
        let pixels = take(src, &mut cursor, pixel_data_size)?.to_vec();
        let texture = GfxTextureDesc {
            width,
            height,
            format,
            pixels,
        };
        Ok((texture, cursor))
    }
}

impl Deserialize for GfxShaderDesc {
    fn deserialize(src: &[u8]) -> Result<(Self, usize), DeserializeError> {
        let mut cursor = 0;
        let shader = match deserialize::<u8>(src, &mut cursor)? {
            SHADER_KIND_GRAPHICS => GfxShaderDesc::Graphics {
                vertex: deserialize::<String>(src, &mut cursor)?,
                pixel: deserialize::<String>(src, &mut cursor)?,
            },
            SHADER_KIND_COMPUTE => GfxShaderDesc::Compute {
                compute: deserialize::<String>(src, &mut cursor)?,
            },
            kind => return Err(DeserializeError::InvalidShaderKind(kind)),
        };
        Ok((shader, cursor))
    }
}

impl Deserialize for AudioBufferDesc {
    fn deserialize(src: &[u8]) -> Result<(Self, usize), DeserializeError> {
        let mut cursor = 0;
        let format_tag = deserialize::<u8>(src, &mut cursor)?;
        let format = AudioFormat::from_u8(format_tag)
            .ok_or(DeserializeError::InvalidAudioFormat(format_tag))?;
        let channels = deserialize::<u8>(src, &mut cursor)?;
        let size = deserialize::<u32>(src, &mut cursor)? as usize;
        let sample_rate = deserialize::<u32>(src, &mut cursor)?;
        let pcm = take(src, &mut cursor, size)?.to_vec();
        let audio = AudioBufferDesc {
            format,
            channels,
            sample_rate,
            pcm,
        };
        Ok((audio, cursor))
    }
}

// Deserialization helpers, at the bottom because they're very long, just so
// they compile to something sane in debug builds.

#[inline(always)]
pub fn deserialize<D: Deserialize>(src: &[u8], cursor: &mut usize) -> Result<D, DeserializeError> {
    let remaining = src.get(*cursor..).ok_or(DeserializeError::Truncated)?;
    let (value, size) = D::deserialize(remaining)?;
    *cursor += size;
    Ok(value)
}

/// Borrows the next `len` bytes of `src`, advancing the cursor past them.
fn take<'a>(src: &'a [u8], cursor: &mut usize, len: usize) -> Result<&'a [u8], DeserializeError> {
    let end = cursor.checked_add(len).ok_or(DeserializeError::Truncated)?;
    let bytes = src.get(*cursor..end).ok_or(DeserializeError::Truncated)?;
    *cursor = end;
    Ok(bytes)
}

impl Deserialize for String {
    fn deserialize(src: &[u8]) -> Result<(Self, usize), DeserializeError> {
        let (bytes, size) = Vec::<u8>::deserialize(src)?;
        let string = String::from_utf8(bytes).map_err(|_| DeserializeError::InvalidUtf8)?;
        Ok((string, size))
    }
}

impl Deserialize for Vec<u8> {
    fn deserialize(src: &[u8]) -> Result<(Self, usize), DeserializeError> {
        let mut cursor = 0;
        let len = deserialize::<u32>(src, &mut cursor)? as usize;
        let bytes = take(src, &mut cursor, len)?.to_vec();
        Ok((bytes, cursor))
    }
}

impl Deserialize for u8 {
    #[inline]
    fn deserialize(src: &[u8]) -> Result<(Self, usize), DeserializeError> {
        let byte = *src.first().ok_or(DeserializeError::Truncated)?;
        Ok((byte, 1))
    }
}

impl Deserialize for u32 {
    #[inline]
    fn deserialize(src: &[u8]) -> Result<(Self, usize), DeserializeError> {
        let bytes: [u8; 4] = src
            .get(0..4)
            .and_then(|bytes| bytes.try_into().ok())
            .ok_or(DeserializeError::Truncated)?;
        Ok((u32::from_le_bytes(bytes), 4))
    }
}

#[cfg(test)]
mod tests {
    use platform::{AudioBufferDesc, GfxShaderDesc, GfxTextureDesc, PixelFormat};

    use crate::resources::{package::NamedAsset, serialize::serialize_to_vec};

    use super::{deserialize, DeserializeError};

    #[test]
    fn truncated_integers_are_reported() {
        let mut cursor = 0;
        assert_eq!(
            Err(DeserializeError::Truncated),
            deserialize::<u32>(&[1, 2, 3], &mut cursor),
        );
        assert_eq!(0, cursor, "cursor moved even though the read failed");
    }

    #[test]
    fn texture_survives_a_write_and_read() {
        let texture = GfxTextureDesc {
            width: 2,
            height: 1,
            format: PixelFormat::Rgba,
            pixels: vec![1, 2, 3, 4, 5, 6, 7, 8],
        };
        let bytes = serialize_to_vec(&texture);
        let mut cursor = 0;
        assert_eq!(Ok(texture), deserialize(&bytes, &mut cursor));
        assert_eq!(bytes.len(), cursor);
    }

    #[test]
    fn unknown_format_tags_are_rejected() {
        // width 1, height 1, format 9
        let bytes = [1, 0, 0, 0, 1, 0, 0, 0, 9, 0, 0, 0, 0];
        let mut cursor = 0;
        assert_eq!(
            Err(DeserializeError::InvalidPixelFormat(9)),
            deserialize::<GfxTextureDesc>(&bytes, &mut cursor),
        );

        let mut cursor = 0;
        assert_eq!(
            Err(DeserializeError::InvalidShaderKind(7)),
            deserialize::<GfxShaderDesc>(&[7], &mut cursor),
        );
    }

    #[test]
    fn missing_pcm_bytes_are_reported() {
        let mut bytes = serialize_to_vec(&AudioBufferDesc::from_s16_samples(1, 22050, &[1, 2]));
        bytes.pop();
        let mut cursor = 0;
        assert_eq!(
            Err(DeserializeError::Truncated),
            deserialize::<AudioBufferDesc>(&bytes, &mut cursor),
        );
    }

    #[test]
    fn descriptor_size_prefix_must_match() {
        let named = NamedAsset {
            name: String::from("n"),
            asset: GfxShaderDesc::Compute {
                compute: String::from("void main() {}"),
            },
        };
        let mut bytes = serialize_to_vec(&named);
        // Claim the descriptor is one byte longer, and supply that byte.
        bytes[5] += 1;
        bytes.push(0);
        let mut cursor = 0;
        assert!(matches!(
            deserialize::<NamedAsset<GfxShaderDesc>>(&bytes, &mut cursor),
            Err(DeserializeError::SizeMismatch { .. }),
        ));
    }
}
