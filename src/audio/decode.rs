use std::path::Path;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::error::{AnalysisError, Result};

/// Mono sample buffer handed to every analysis stage.
#[derive(Clone, Debug)]
pub struct Signal {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl Signal {
    /// Build a mono signal. Non-finite samples are replaced with silence.
    pub fn mono(mut samples: Vec<f32>, sample_rate: u32) -> Self {
        let mut replaced = 0usize;
        for s in samples.iter_mut().filter(|s| !s.is_finite()) {
            *s = 0.0;
            replaced += 1;
        }
        if replaced > 0 {
            log::warn!("Replaced {} non-finite samples with silence", replaced);
        }
        Self {
            samples,
            sample_rate,
        }
    }

    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }
}

/// Deinterleaved channels of one decode, no downmix applied.
#[derive(Clone, Debug)]
pub struct ChannelData {
    pub channels: Vec<Vec<f32>>,
    pub sample_rate: u32,
}

impl ChannelData {
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Left and right channels when there are exactly two.
    pub fn stereo_pair(&self) -> Option<(&[f32], &[f32])> {
        match self.channels.as_slice() {
            [left, right] => Some((left.as_slice(), right.as_slice())),
            _ => None,
        }
    }
}

/// Decodes a file path into sample buffers.
pub trait AudioSource {
    /// All channels averaged into one.
    fn load_mono(&self, path: &Path) -> Result<Signal>;

    /// Every channel kept separate, without any gain normalization.
    fn load_channels(&self, path: &Path) -> Result<ChannelData>;
}

/// `AudioSource` backed by symphonia's default codec and format registry.
#[derive(Clone, Copy, Debug, Default)]
pub struct SymphoniaSource;

impl AudioSource for SymphoniaSource {
    fn load_mono(&self, path: &Path) -> Result<Signal> {
        let decoded = decode_interleaved(path)?;
        let channels = decoded.channels.max(1);

        let samples = if channels == 1 {
            decoded.samples
        } else {
            decoded
                .samples
                .chunks(channels)
                .map(|frame| frame.iter().sum::<f32>() / channels as f32)
                .collect()
        };

        let signal = Signal::mono(samples, decoded.sample_rate);
        log::info!(
            "Decoded audio: {} samples, {}Hz, {:.1}s",
            signal.samples.len(),
            signal.sample_rate,
            signal.duration_secs()
        );
        Ok(signal)
    }

    fn load_channels(&self, path: &Path) -> Result<ChannelData> {
        let decoded = decode_interleaved(path)?;
        let count = decoded.channels.max(1);
        let frames = decoded.samples.len() / count;

        let mut channels = vec![Vec::with_capacity(frames); count];
        for frame in decoded.samples.chunks_exact(count) {
            for (channel, &sample) in channels.iter_mut().zip(frame) {
                channel.push(if sample.is_finite() { sample } else { 0.0 });
            }
        }

        Ok(ChannelData {
            channels,
            sample_rate: decoded.sample_rate,
        })
    }
}

struct Interleaved {
    samples: Vec<f32>,
    channels: usize,
    sample_rate: u32,
}

fn decode_error(msg: impl Into<String>) -> AnalysisError {
    AnalysisError::Decode(msg.into())
}

fn decode_interleaved(path: &Path) -> Result<Interleaved> {
    if !path.exists() {
        return Err(AnalysisError::MissingInput(path.to_path_buf()));
    }

    let file = std::fs::File::open(path)
        .map_err(|e| decode_error(format!("failed to open {}: {}", path.display(), e)))?;

    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
        .map_err(|e| decode_error(format!("failed to probe audio format: {}", e)))?;

    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != symphonia::core::codecs::CODEC_TYPE_NULL)
        .ok_or_else(|| decode_error("no audio tracks found"))?;

    let track_id = track.id;
    let mut channels = track.codec_params.channels.map_or(0, |c| c.count());
    let sample_rate = track
        .codec_params
        .sample_rate
        .filter(|&sr| sr > 0)
        .ok_or_else(|| decode_error("unknown sample rate"))?;

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| decode_error(format!("failed to create audio decoder: {}", e)))?;

    let mut all_samples: Vec<f32> = Vec::new();

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(symphonia::core::errors::Error::IoError(ref e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(e) => return Err(decode_error(e.to_string())),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(d) => d,
            Err(symphonia::core::errors::Error::DecodeError(msg)) => {
                log::warn!("Skipping undecodable packet: {}", msg);
                continue;
            }
            Err(e) => return Err(decode_error(e.to_string())),
        };

        let spec = *decoded.spec();
        // Some containers only report the layout once packets decode.
        if channels == 0 {
            channels = spec.channels.count();
        }

        let num_frames = decoded.frames();

        let mut sample_buf = SampleBuffer::<f32>::new(num_frames as u64, spec);
        sample_buf.copy_interleaved_ref(decoded);
        all_samples.extend_from_slice(sample_buf.samples());
    }

    log::debug!(
        "Decoded {} interleaved samples from {} ({} channels)",
        all_samples.len(),
        path.display(),
        channels
    );

    Ok(Interleaved {
        samples: all_samples,
        channels: channels.max(1),
        sample_rate,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mono_signal_scrubs_non_finite_samples() {
        let signal = Signal::mono(vec![0.5, f32::NAN, f32::INFINITY, -0.25], 4);
        assert_eq!(signal.samples, vec![0.5, 0.0, 0.0, -0.25]);
        assert!((signal.duration_secs() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn stereo_pair_requires_two_channels() {
        let mono = ChannelData {
            channels: vec![vec![0.0; 4]],
            sample_rate: 8000,
        };
        assert!(mono.stereo_pair().is_none());

        let stereo = ChannelData {
            channels: vec![vec![1.0, 2.0], vec![3.0, 4.0]],
            sample_rate: 8000,
        };
        let (l, r) = stereo.stereo_pair().unwrap();
        assert_eq!(l, &[1.0, 2.0]);
        assert_eq!(r, &[3.0, 4.0]);

        let surround = ChannelData {
            channels: vec![vec![0.0]; 6],
            sample_rate: 48000,
        };
        assert_eq!(surround.channel_count(), 6);
        assert!(surround.stereo_pair().is_none());
    }

    #[test]
    fn missing_file_is_reported_as_missing() {
        let err = SymphoniaSource
            .load_mono(Path::new("/definitely/not/here.wav"))
            .unwrap_err();
        assert!(matches!(err, AnalysisError::MissingInput(_)));
    }
}
