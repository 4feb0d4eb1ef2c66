use std::path::PathBuf;

use thiserror::Error;

/// Fatal analysis failures. Stereo problems never surface here; the stereo
/// stage resolves them to a neutral value.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("input file not found: {}", .0.display())]
    MissingInput(PathBuf),

    #[error("audio too short for analysis ({samples} samples at {sample_rate} Hz)")]
    InsufficientAudio { samples: usize, sample_rate: u32 },

    #[error("failed to decode audio: {0}")]
    Decode(String),

    #[error("loudness measurement failed: {0}")]
    Loudness(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
