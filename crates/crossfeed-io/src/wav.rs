//! WAV file reading and writing in pipeline fixed point.

use crate::sample::{fixed_to_float, fixed_to_pcm, float_to_fixed, pcm_to_fixed};
use crate::{Error, Result};
use hound::{SampleFormat, WavReader, WavWriter};
use std::path::Path;

/// WAV audio encoding format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WavFormat {
    /// Linear PCM (integer samples).
    Pcm,
    /// IEEE 754 floating-point samples.
    IeeeFloat,
}

impl From<SampleFormat> for WavFormat {
    fn from(format: SampleFormat) -> Self {
        match format {
            SampleFormat::Float => WavFormat::IeeeFloat,
            SampleFormat::Int => WavFormat::Pcm,
        }
    }
}

impl From<WavFormat> for SampleFormat {
    fn from(format: WavFormat) -> Self {
        match format {
            WavFormat::IeeeFloat => SampleFormat::Float,
            WavFormat::Pcm => SampleFormat::Int,
        }
    }
}

/// WAV file metadata extracted without loading sample data.
#[derive(Debug, Clone)]
pub struct WavInfo {
    /// Number of audio channels (1 = mono, 2 = stereo).
    pub channels: u16,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Bit depth per sample.
    pub bits_per_sample: u16,
    /// Total number of sample frames (samples per channel).
    pub num_frames: u64,
    /// Duration in seconds.
    pub duration_secs: f64,
    /// Audio encoding format.
    pub format: WavFormat,
}

/// Read WAV metadata without loading sample data.
pub fn read_wav_info<P: AsRef<Path>>(path: P) -> Result<WavInfo> {
    let reader = WavReader::open(path)?;
    let spec = reader.spec();
    let num_frames = u64::from(reader.duration());
    let duration_secs = num_frames as f64 / f64::from(spec.sample_rate);

    Ok(WavInfo {
        channels: spec.channels,
        sample_rate: spec.sample_rate,
        bits_per_sample: spec.bits_per_sample,
        num_frames,
        duration_secs,
        format: spec.sample_format.into(),
    })
}

/// WAV file specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavSpec {
    /// Number of audio channels (1 = mono, 2 = stereo).
    pub channels: u16,
    /// Sample rate in Hz (e.g., 44100, 48000).
    pub sample_rate: u32,
    /// Bit depth per sample (8 to 32 for PCM, 32 for float).
    pub bits_per_sample: u16,
    /// Sample encoding.
    pub format: WavFormat,
}

impl Default for WavSpec {
    fn default() -> Self {
        Self {
            channels: 2,
            sample_rate: 44100,
            bits_per_sample: 16,
            format: WavFormat::Pcm,
        }
    }
}

impl WavSpec {
    /// Check that the encoding is one this crate converts.
    pub fn validate(&self) -> Result<()> {
        let ok = match self.format {
            WavFormat::Pcm => (8..=32).contains(&self.bits_per_sample),
            WavFormat::IeeeFloat => self.bits_per_sample == 32,
        };
        if !ok {
            return Err(Error::UnsupportedFormat(format!(
                "{}-bit {:?}",
                self.bits_per_sample, self.format
            )));
        }
        if self.channels == 0 {
            return Err(Error::UnsupportedFormat("zero channels".to_string()));
        }
        Ok(())
    }
}

impl From<hound::WavSpec> for WavSpec {
    fn from(spec: hound::WavSpec) -> Self {
        Self {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            bits_per_sample: spec.bits_per_sample,
            format: spec.sample_format.into(),
        }
    }
}

impl From<WavSpec> for hound::WavSpec {
    fn from(spec: WavSpec) -> Self {
        hound::WavSpec {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            bits_per_sample: spec.bits_per_sample,
            sample_format: spec.format.into(),
        }
    }
}

/// De-interleaved fixed-point audio, one `Vec` per channel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlanarSamples {
    /// Channel data, all the same length.
    pub channels: Vec<Vec<i32>>,
}

impl PlanarSamples {
    /// Wrap channel vectors. Longer channels are cut to the shortest.
    pub fn new(mut channels: Vec<Vec<i32>>) -> Self {
        let frames = channels.iter().map(Vec::len).min().unwrap_or(0);
        for c in &mut channels {
            c.truncate(frames);
        }
        Self { channels }
    }

    /// Split interleaved samples into `channel_count` channels.
    ///
    /// A trailing partial frame is dropped.
    pub fn from_interleaved(samples: &[i32], channel_count: usize) -> Self {
        if channel_count == 0 {
            return Self::default();
        }
        let frames = samples.len() / channel_count;
        let mut channels = vec![Vec::with_capacity(frames); channel_count];
        for frame in samples.chunks_exact(channel_count) {
            for (channel, &s) in channels.iter_mut().zip(frame) {
                channel.push(s);
            }
        }
        Self { channels }
    }

    /// Interleave back into one buffer.
    pub fn to_interleaved(&self) -> Vec<i32> {
        let mut out = Vec::with_capacity(self.frames() * self.channel_count());
        for i in 0..self.frames() {
            out.extend(self.channels.iter().map(|c| c[i]));
        }
        out
    }

    /// Number of channels.
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Samples per channel.
    pub fn frames(&self) -> usize {
        self.channels.first().map_or(0, Vec::len)
    }

    /// Whether there is no audio.
    pub fn is_empty(&self) -> bool {
        self.frames() == 0
    }
}

/// Read a WAV file into pipeline fixed point.
///
/// Integer PCM of 8 to 32 bits and 32-bit float are accepted. Every channel is
/// kept.
pub fn read_wav<P: AsRef<Path>>(path: P) -> Result<(PlanarSamples, WavSpec)> {
    let path = path.as_ref();
    let reader = WavReader::open(path)?;
    let spec = WavSpec::from(reader.spec());
    spec.validate()?;

    let interleaved: Vec<i32> = match spec.format {
        WavFormat::IeeeFloat => reader
            .into_samples::<f32>()
            .map(|s| s.map(float_to_fixed))
            .collect::<std::result::Result<Vec<_>, _>>()?,
        WavFormat::Pcm => {
            let bits = spec.bits_per_sample;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| pcm_to_fixed(v, bits)))
                .collect::<std::result::Result<Vec<_>, _>>()?
        }
    };

    let samples = PlanarSamples::from_interleaved(&interleaved, usize::from(spec.channels));
    tracing::debug!(
        path = %path.display(),
        channels = spec.channels,
        sample_rate = spec.sample_rate,
        bits = spec.bits_per_sample,
        frames = samples.frames(),
        "read wav"
    );
    Ok((samples, spec))
}

/// Write pipeline fixed-point audio to a WAV file.
///
/// The channel count comes from `samples`; the rest from `spec`. Integer
/// output clips at full scale.
pub fn write_wav<P: AsRef<Path>>(path: P, samples: &PlanarSamples, spec: WavSpec) -> Result<()> {
    let path = path.as_ref();
    let spec = WavSpec {
        channels: u16::try_from(samples.channel_count())
            .map_err(|_| Error::UnsupportedFormat("too many channels".to_string()))?,
        ..spec
    };
    spec.validate()?;

    let mut writer = WavWriter::create(path, hound::WavSpec::from(spec))?;
    let interleaved = samples.to_interleaved();
    match spec.format {
        WavFormat::IeeeFloat => {
            for &s in &interleaved {
                writer.write_sample(fixed_to_float(s))?;
            }
        }
        WavFormat::Pcm => {
            let bits = spec.bits_per_sample;
            for &s in &interleaved {
                writer.write_sample(fixed_to_pcm(s, bits))?;
            }
        }
    }
    writer.finalize()?;

    tracing::debug!(
        path = %path.display(),
        channels = spec.channels,
        bits = spec.bits_per_sample,
        frames = samples.frames(),
        "wrote wav"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::FULL_SCALE;
    use tempfile::NamedTempFile;

    fn ramp(len: usize, scale: i32) -> Vec<i32> {
        (0..len as i32).map(|i| (i - len as i32 / 2) * scale).collect()
    }

    #[test]
    fn interleave_round_trip() {
        let planar = PlanarSamples::from_interleaved(&[1, 2, 3, 4, 5, 6, 7], 2);
        assert_eq!(planar.channels, vec![vec![1, 3, 5], vec![2, 4, 6]]);
        assert_eq!(planar.to_interleaved(), vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn new_truncates_to_shortest() {
        let planar = PlanarSamples::new(vec![vec![1, 2, 3], vec![4, 5]]);
        assert_eq!(planar.frames(), 2);
        assert_eq!(planar.channels[0], vec![1, 2]);
    }

    #[test]
    fn zero_channels_is_empty() {
        assert!(PlanarSamples::from_interleaved(&[1, 2], 0).is_empty());
    }

    #[test]
    fn sixteen_bit_stereo_round_trip() {
        let left = ramp(500, 1 << 14);
        let right: Vec<i32> = left.iter().map(|s| -s).collect();
        let samples = PlanarSamples::new(vec![left, right]);
        let spec = WavSpec::default();

        let file = NamedTempFile::new().unwrap();
        write_wav(file.path(), &samples, spec).unwrap();
        let (loaded, loaded_spec) = read_wav(file.path()).unwrap();

        assert_eq!(loaded_spec, spec);
        // multiples of 2^13 survive 16-bit exactly
        assert_eq!(loaded, samples);
    }

    #[test]
    fn float_round_trip_is_close() {
        let samples = PlanarSamples::new(vec![ramp(300, 1 << 19)]);
        let spec = WavSpec {
            channels: 1,
            bits_per_sample: 32,
            format: WavFormat::IeeeFloat,
            ..WavSpec::default()
        };
        let file = NamedTempFile::new().unwrap();
        write_wav(file.path(), &samples, spec).unwrap();
        let (loaded, _) = read_wav(file.path()).unwrap();
        for (a, b) in samples.channels[0].iter().zip(&loaded.channels[0]) {
            assert!((a - b).abs() <= 16, "{a} vs {b}");
        }
    }

    #[test]
    fn integer_output_clips() {
        let samples = PlanarSamples::new(vec![vec![FULL_SCALE * 2, -FULL_SCALE * 2]]);
        let spec = WavSpec {
            channels: 1,
            ..WavSpec::default()
        };
        let file = NamedTempFile::new().unwrap();
        write_wav(file.path(), &samples, spec).unwrap();
        let (loaded, _) = read_wav(file.path()).unwrap();
        assert_eq!(loaded.channels[0], vec![32767 << 13, -FULL_SCALE]);
    }

    #[test]
    fn unsupported_float_depth_is_rejected() {
        let spec = WavSpec {
            bits_per_sample: 64,
            format: WavFormat::IeeeFloat,
            ..WavSpec::default()
        };
        assert!(matches!(spec.validate(), Err(Error::UnsupportedFormat(_))));
        let spec = WavSpec {
            bits_per_sample: 4,
            ..WavSpec::default()
        };
        assert!(matches!(spec.validate(), Err(Error::UnsupportedFormat(_))));
    }

    #[test]
    fn info_reports_frames_and_duration() {
        let samples = PlanarSamples::new(vec![vec![0; 44100], vec![0; 44100]]);
        let file = NamedTempFile::new().unwrap();
        write_wav(file.path(), &samples, WavSpec::default()).unwrap();
        let info = read_wav_info(file.path()).unwrap();
        assert_eq!(info.num_frames, 44100);
        assert_eq!(info.channels, 2);
        assert!((info.duration_secs - 1.0).abs() < 1e-9);
        assert_eq!(info.format, WavFormat::Pcm);
    }
}
