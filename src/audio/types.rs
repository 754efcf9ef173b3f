/// Represents decoded audio after reading
#[derive(Debug, Clone)]
pub struct AudioData {
    /// Interleaved samples normalized to [-1, 1] range
    pub samples: Vec<f32>,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Number of audio channels
    pub channels: u16,
}

impl AudioData {
    /// Number of frames (samples per channel)
    pub fn frames(&self) -> usize {
        if self.channels == 0 {
            return 0;
        }
        self.samples.len() / self.channels as usize
    }

    /// Duration of the audio in seconds
    pub fn duration_secs(&self) -> f32 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frames() as f32 / self.sample_rate as f32
    }

    /// Averages all channels into a single mono buffer.
    pub fn to_mono(&self) -> Vec<f32> {
        let channels = self.channels.max(1) as usize;
        if channels == 1 {
            return self.samples.clone();
        }
        self.samples
            .chunks_exact(channels)
            .map(|frame| frame.iter().sum::<f32>() / channels as f32)
            .collect()
    }
}

/// Scalar statistics describing an audio file
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AudioMetrics {
    /// Root-mean-square amplitude
    pub rms: f32,
    /// Maximum absolute sample value
    pub peak: f32,
    /// `peak - rms`
    pub dynamic_range: f32,
    /// Mean spectral centroid across STFT frames (Hz)
    pub spectral_centroid: f32,
    /// Mean spectral rolloff across STFT frames (Hz)
    pub spectral_rolloff: f32,
}

/// Configuration for feature extraction
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Sample rate the audio is resampled to before analysis, `None` keeps the native rate
    pub target_sample_rate: Option<u32>,
    /// STFT frame length in samples
    pub frame_size: usize,
    /// Distance between consecutive STFT frames in samples
    pub hop_size: usize,
    /// Fraction of spectral magnitude below the rolloff frequency
    pub roll_percent: f32,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            target_sample_rate: Some(22050),
            frame_size: 2048,
            hop_size: 512,
            roll_percent: 0.85,
        }
    }
}

/// Errors that can occur during audio processing
#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    /// IO errors when reading files
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The file could not be decoded
    #[error("Decode error: {0}")]
    Decode(String),

    /// Invalid parameter values
    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    /// General processing errors
    #[error("Processing error: {0}")]
    Processing(String),
}

impl AnalysisConfig {
    /// Validates the configuration
    ///
    /// # Returns
    /// * `Ok(())` if the configuration is valid
    /// * `Err(AudioError)` if the configuration is invalid
    pub fn validate(&self) -> Result<(), AudioError> {
        if self.frame_size < 2 {
            return Err(AudioError::InvalidParams(format!(
                "Frame size must be at least 2 samples, got {}",
                self.frame_size
            )));
        }

        if self.hop_size == 0 {
            return Err(AudioError::InvalidParams(
                "Hop size must be at least 1 sample".to_string(),
            ));
        }

        if !(self.roll_percent > 0.0 && self.roll_percent < 1.0) {
            return Err(AudioError::InvalidParams(format!(
                "Rolloff percent must be between 0 and 1, got {}",
                self.roll_percent
            )));
        }

        if self.target_sample_rate == Some(0) {
            return Err(AudioError::InvalidParams(
                "Target sample rate must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}
