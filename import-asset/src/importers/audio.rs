// SPDX-FileCopyrightText: 2025 Jens Pitkänen <jens.pitkanen@helsinki.fi>
//
// SPDX-License-Identifier: GPL-3.0-or-later

use std::{fs::File, io::ErrorKind, path::Path};

use anyhow::Context;
use platform::AudioBufferDesc;
use symphonia::{
    core::{
        audio::{SampleBuffer, SignalSpec},
        codecs::DecoderOptions,
        errors::Error as SymphoniaError,
        formats::FormatOptions,
        io::{MediaSourceStream, MediaSourceStreamOptions},
        meta::MetadataOptions,
        probe::Hint,
    },
    default,
};
use tracing::{debug, trace};

/// Decodes the default track of the audio file into interleaved signed 16-bit
/// samples, keeping the channels and sample rate of the file.
pub fn load(audio_path: &Path) -> anyhow::Result<AudioBufferDesc> {
    let (spec, samples) = read_audio_file(audio_path).context("Failed to read the audio file")?;
    let channels = u8::try_from(spec.channels.count())
        .context("The audio file has too many channels")?;
    debug!(
        "Read {} samples of {channels}-channel {} Hz audio from {}.",
        samples.len(),
        spec.rate,
        audio_path.display(),
    );
    Ok(AudioBufferDesc::from_s16_samples(channels, spec.rate, &samples))
}

fn read_audio_file(path: &Path) -> anyhow::Result<(SignalSpec, Vec<i16>)> {
    debug!("Reading audio data from: {}", path.display());

    let codecs = default::get_codecs();
    let probe = default::get_probe();

    let mut hint = Hint::new();
    if let Some(extension) = path.extension().map(|s| s.to_string_lossy()) {
        hint.with_extension(&extension);
    }

    let file = File::open(path).context("Could not open audio file for reading")?;
    let source = MediaSourceStream::new(Box::new(file), MediaSourceStreamOptions::default());
    let mut source = probe
        .format(
            &hint,
            source,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .context("Could not recognize audio format")?;

    let track = source
        .format
        .default_track()
        .context("The file appears to be an audio file, but without any tracks?")?;
    let track_id = track.id;

    let mut decoder = codecs
        .make(&track.codec_params, &DecoderOptions::default())
        .context("Failed to create a decoder for the audio")?;

    let mut spec = None;
    let mut samples = Vec::new();
    loop {
        let packet = match source.format.next_packet() {
            Ok(packet) => packet,

            // This seems to signal that we're done, as "end of stream" means
            // "read finished" according to the docs, but there doesn't seem to
            // be a properly typed end of stream error.
            Err(SymphoniaError::IoError(err)) if err.kind() == ErrorKind::UnexpectedEof => break,

            // These are recoverable according to Decode::decoder docs.
            Err(SymphoniaError::IoError(_)) | Err(SymphoniaError::DecodeError(_)) => continue,
            Err(SymphoniaError::ResetRequired) => {
                samples.clear();
                decoder = codecs
                    .make(decoder.codec_params(), &DecoderOptions::default())
                    .context("Failed to recreate a decoder for the audio")?;
                continue;
            }

            Err(err) => Err(err).context("Failed to read audio data packet")?,
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = decoder
            .decode(&packet)
            .context("Failed to decode audio data packet")?;

        let decoded_spec = *decoded.spec();
        trace!(
            "Decoded audio data, {} frames of: {decoded_spec:?}",
            decoded.frames(),
        );
        if *spec.get_or_insert(decoded_spec) != decoded_spec {
            anyhow::bail!("The signal spec changes in the middle of the audio, which isn't supported");
        }

        let mut converted = SampleBuffer::<i16>::new(decoded.capacity() as u64, decoded_spec);
        converted.copy_interleaved_ref(decoded);
        samples.extend_from_slice(converted.samples());
    }

    let spec = spec.context("The audio track doesn't contain any audio")?;
    Ok((spec, samples))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use platform::AudioFormat;

    use super::load;

    /// A 16-bit PCM WAV file of the given interleaved samples.
    fn wav_file(channels: u16, sample_rate: u32, samples: &[i16]) -> Vec<u8> {
        let data_len = (samples.len() * 2) as u32;
        let mut wav = Vec::new();
        wav.extend(b"RIFF");
        wav.extend((36 + data_len).to_le_bytes());
        wav.extend(b"WAVEfmt ");
        wav.extend(16u32.to_le_bytes());
        wav.extend(1u16.to_le_bytes());
        wav.extend(channels.to_le_bytes());
        wav.extend(sample_rate.to_le_bytes());
        wav.extend((sample_rate * channels as u32 * 2).to_le_bytes());
        wav.extend((channels * 2).to_le_bytes());
        wav.extend(16u16.to_le_bytes());
        wav.extend(b"data");
        wav.extend(data_len.to_le_bytes());
        for sample in samples {
            wav.extend(sample.to_le_bytes());
        }
        wav
    }

    #[test]
    fn wav_channels_and_rate_are_kept() {
        let samples = [0, 1000, -1000, i16::MAX, i16::MIN, 42, 7, -7];
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blip.wav");
        fs::write(&path, wav_file(2, 22050, &samples)).unwrap();

        let audio = load(&path).unwrap();
        assert_eq!(AudioFormat::S16, audio.format);
        assert_eq!(2, audio.channels);
        assert_eq!(22050, audio.sample_rate);
        assert_eq!(4, audio.frames());
        let decoded: Vec<i16> = audio
            .pcm
            .chunks_exact(2)
            .map(|bytes| i16::from_le_bytes([bytes[0], bytes[1]]))
            .collect();
        assert_eq!(&samples[..], decoded);
    }

    #[test]
    fn missing_files_are_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load(&dir.path().join("missing.ogg")).is_err());
    }
}
