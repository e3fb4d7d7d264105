// AudioLoader - decode audio files into mono PCM for feature extraction
//
// PCM WAV files go through hound; every other supported container (MP3, FLAC,
// OGG/Vorbis, M4A/AAC) is probed and decoded with symphonia. Multi-channel
// audio is averaged down to mono and only the first `max_duration_secs`
// seconds are kept; the reported duration is that of the kept window.

use std::fs::File;
use std::path::Path;

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::config::BatchConfig;
use crate::error::AnalysisError;

/// Decoded mono audio ready for the feature extractor
#[derive(Debug, Clone)]
pub struct DecodedAudio {
    /// Mono samples in [-1.0, 1.0], truncated to the analysis window
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl DecodedAudio {
    /// Length of the analysis window in seconds
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            0.0
        } else {
            self.samples.len() as f64 / self.sample_rate as f64
        }
    }
}

/// Loads audio files from disk
pub struct AudioLoader {
    max_duration_secs: f32,
    formats: BatchConfig,
}

impl AudioLoader {
    /// Create a loader that keeps at most `max_duration_secs` of audio
    ///
    /// # Arguments
    /// * `max_duration_secs` - Analysis window length; non-positive keeps everything
    /// * `formats` - Supported extension list
    pub fn new(max_duration_secs: f32, formats: BatchConfig) -> Self {
        Self {
            max_duration_secs,
            formats,
        }
    }

    /// Validate and decode a file
    ///
    /// # Returns
    /// * `Ok(DecodedAudio)` - mono samples at the file's native rate
    /// * `Err(AnalysisError)` - missing file, unsupported extension, decode failure or empty audio
    pub fn load(&self, path: &Path) -> Result<DecodedAudio, AnalysisError> {
        let display = path.display().to_string();
        if !path.is_file() {
            return Err(AnalysisError::FileNotFound { path: display });
        }

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        if !self.formats.is_supported_extension(&extension) {
            return Err(AnalysisError::UnsupportedFormat {
                path: display,
                extension,
            });
        }

        let audio = if extension == "wav" {
            self.decode_wav(path)?
        } else {
            self.decode_compressed(path, &extension)?
        };

        if audio.samples.is_empty() || audio.sample_rate == 0 {
            return Err(AnalysisError::EmptyAudio { path: display });
        }

        log::debug!(
            "[Loader] {}: {} samples at {} Hz ({:.1}s analysed)",
            display,
            audio.samples.len(),
            audio.sample_rate,
            audio.duration_secs()
        );
        Ok(audio)
    }

    fn sample_cap(&self, sample_rate: u32) -> usize {
        if self.max_duration_secs > 0.0 {
            (self.max_duration_secs as f64 * sample_rate as f64) as usize
        } else {
            usize::MAX
        }
    }

    fn decode_wav(&self, path: &Path) -> Result<DecodedAudio, AnalysisError> {
        let decode_err = |reason: String| AnalysisError::DecodeFailed {
            path: path.display().to_string(),
            reason,
        };

        let mut reader = hound::WavReader::open(path).map_err(|err| decode_err(err.to_string()))?;
        let spec = reader.spec();
        let channels = spec.channels.max(1) as usize;
        let sample_rate = spec.sample_rate;
        let cap = self.sample_cap(sample_rate).saturating_mul(channels);

        let interleaved: Vec<f32> = match spec.sample_format {
            hound::SampleFormat::Float => reader
                .samples::<f32>()
                .take(cap)
                .collect::<Result<Vec<f32>, _>>()
                .map_err(|err| decode_err(err.to_string()))?,
            hound::SampleFormat::Int => {
                let bits = spec.bits_per_sample;
                if !(8..=32).contains(&bits) {
                    return Err(decode_err(format!("unsupported bits per sample {}", bits)));
                }
                let max = ((1i64 << (bits - 1)) - 1) as f32;
                reader
                    .samples::<i32>()
                    .take(cap)
                    .map(|sample| sample.map(|value| value as f32 / max))
                    .collect::<Result<Vec<f32>, _>>()
                    .map_err(|err| decode_err(err.to_string()))?
            }
        };

        Ok(DecodedAudio {
            samples: downmix(&interleaved, channels),
            sample_rate,
        })
    }

    fn decode_compressed(&self, path: &Path, extension: &str) -> Result<DecodedAudio, AnalysisError> {
        let decode_err = |reason: String| AnalysisError::DecodeFailed {
            path: path.display().to_string(),
            reason,
        };

        let file = File::open(path)?;
        let mss = MediaSourceStream::new(Box::new(file), Default::default());
        let mut hint = Hint::new();
        hint.with_extension(extension);

        let probed = symphonia::default::get_probe()
            .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
            .map_err(|err| decode_err(err.to_string()))?;
        let mut format = probed.format;

        let track = format
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            .ok_or_else(|| decode_err("no audio track".to_string()))?;
        let track_id = track.id;
        let codec_params = track.codec_params.clone();
        let sample_rate = codec_params
            .sample_rate
            .ok_or_else(|| decode_err("sample rate not specified".to_string()))?;

        let mut decoder = symphonia::default::get_codecs()
            .make(&codec_params, &DecoderOptions::default())
            .map_err(|err| decode_err(err.to_string()))?;

        let cap = self.sample_cap(sample_rate);
        let mut samples = Vec::new();

        while samples.len() < cap {
            let packet = match format.next_packet() {
                Ok(packet) => packet,
                Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                    break;
                }
                Err(SymphoniaError::ResetRequired) => break,
                Err(err) => return Err(decode_err(err.to_string())),
            };

            if packet.track_id() != track_id {
                continue;
            }

            let decoded = match decoder.decode(&packet) {
                Ok(decoded) => decoded,
                // Corrupt packets are skipped, matching common player behaviour
                Err(SymphoniaError::DecodeError(msg)) => {
                    log::debug!("[Loader] skipping corrupt packet in {}: {}", path.display(), msg);
                    continue;
                }
                Err(err) => return Err(decode_err(err.to_string())),
            };

            let spec = *decoded.spec();
            let channels = spec.channels.count().max(1);
            let mut buffer = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
            buffer.copy_interleaved_ref(decoded);

            let room = cap - samples.len();
            samples.extend(downmix(buffer.samples(), channels).into_iter().take(room));
        }

        Ok(DecodedAudio {
            samples,
            sample_rate,
        })
    }
}

/// Average interleaved channels into one mono signal
pub fn downmix(interleaved: &[f32], channels: usize) -> Vec<f32> {
    if channels <= 1 {
        return interleaved.to_vec();
    }
    let scale = 1.0 / channels as f32;
    interleaved
        .chunks(channels)
        .map(|frame| frame.iter().sum::<f32>() * scale)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::signals::{sine, write_wav};

    fn loader(max_secs: f32) -> AudioLoader {
        AudioLoader::new(max_secs, BatchConfig::default())
    }

    #[test]
    fn test_missing_file_is_reported() {
        let err = loader(60.0)
            .load(Path::new("/no/such/track.wav"))
            .unwrap_err();
        assert!(matches!(err, AnalysisError::FileNotFound { .. }));
    }

    #[test]
    fn test_unsupported_extension_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "not audio").unwrap();

        let err = loader(60.0).load(&path).unwrap_err();
        match err {
            AnalysisError::UnsupportedFormat { extension, .. } => assert_eq!(extension, "txt"),
            other => panic!("Expected UnsupportedFormat, got {other:?}"),
        }
    }

    #[test]
    fn test_garbage_wav_fails_to_decode() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.wav");
        std::fs::write(&path, b"RIFFnope").unwrap();

        let err = loader(60.0).load(&path).unwrap_err();
        assert!(matches!(err, AnalysisError::DecodeFailed { .. }));
    }

    #[test]
    fn test_wav_is_truncated_to_analysis_window() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tone.wav");
        write_wav(&path, &sine(440.0, 8000, 3.0, 0.5), 8000).unwrap();

        let audio = loader(1.0).load(&path).unwrap();
        assert_eq!(audio.sample_rate, 8000);
        assert_eq!(audio.samples.len(), 8000);
        assert!((audio.duration_secs() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_wav_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.wav");
        write_wav(&path, &[], 8000).unwrap();

        let err = loader(60.0).load(&path).unwrap_err();
        assert!(matches!(err, AnalysisError::EmptyAudio { .. }));
    }

    #[test]
    fn test_downmix_averages_channels() {
        let mono = downmix(&[1.0, 0.0, 0.5, 0.5], 2);
        assert_eq!(mono, vec![0.5, 0.5]);
    }
}
