// SPDX-FileCopyrightText: 2025 Jens Pitkänen <jens.pitkanen@helsinki.fi>
//
// SPDX-License-Identifier: GPL-3.0-or-later

use alloc::vec::Vec;

use crate::gfx::gen_resource_ref;

gen_resource_ref!(
    /// Platform-specific audio buffer reference.
    AudioBufferRef
);

/// Sample formats for PCM data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum AudioFormat {
    /// Unsigned 8-bit samples.
    U8 = 0,
    /// Signed 16-bit little-endian samples.
    S16 = 1,
    /// 32-bit little-endian floating point samples.
    F32 = 2,
}

impl AudioFormat {
    /// Returns the amount of bytes a single sample of a single channel takes
    /// up in this format.
    pub const fn bytes_per_sample(self) -> usize {
        match self {
            AudioFormat::U8 => 1,
            AudioFormat::S16 => 2,
            AudioFormat::F32 => 4,
        }
    }

    /// Returns the audio format with the given `repr(u8)` value, if there is
    /// one.
    pub const fn from_u8(value: u8) -> Option<AudioFormat> {
        match value {
            0 => Some(AudioFormat::U8),
            1 => Some(AudioFormat::S16),
            2 => Some(AudioFormat::F32),
            _ => None,
        }
    }
}

/// Everything needed to create a playable audio buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioBufferDesc {
    /// The sample format of `pcm`.
    pub format: AudioFormat,
    /// The amount of interleaved channels in `pcm`.
    pub channels: u8,
    /// Samples per second per channel.
    pub sample_rate: u32,
    /// Interleaved PCM data. The length of this is the "size" of the buffer.
    pub pcm: Vec<u8>,
}

impl AudioBufferDesc {
    /// Creates a descriptor for interleaved signed 16-bit samples, stored as
    /// little-endian bytes regardless of the host.
    pub fn from_s16_samples(channels: u8, sample_rate: u32, samples: &[i16]) -> AudioBufferDesc {
        let pcm = if cfg!(target_endian = "little") {
            bytemuck::cast_slice::<i16, u8>(samples).to_vec()
        } else {
            samples.iter().flat_map(|sample| sample.to_le_bytes()).collect()
        };
        AudioBufferDesc {
            format: AudioFormat::S16,
            channels,
            sample_rate,
            pcm,
        }
    }

    /// Returns the amount of sample frames (one sample for each channel) in
    /// the buffer.
    pub fn frames(&self) -> usize {
        let frame_size = self.format.bytes_per_sample() * self.channels.max(1) as usize;
        self.pcm.len() / frame_size
    }
}
