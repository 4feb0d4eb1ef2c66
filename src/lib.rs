//! Perceptual feature extraction for rendered audio buses.
//!
//! A bus file is decoded once to mono for loudness, spectral band ratios and
//! dynamics, and once more with channels intact for stereo spread. The result
//! is a flat [`FeatureReport`].

pub mod audio;
pub mod cli;
pub mod config;
pub mod error;
pub mod plan;

pub use audio::analysis::{Analyzer, BusAnalysis};
pub use audio::features::FeatureReport;
pub use config::AnalysisConfig;
pub use error::AnalysisError;
