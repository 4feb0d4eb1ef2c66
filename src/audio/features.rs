use serde::{Deserialize, Serialize};

use super::bands::BandEnergies;

/// Final bus measurements. Loudness is integrated LUFS; every other field is
/// a ratio in [0, 1].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeatureReport {
    pub loudness: f64,
    pub presence: f64,
    pub sibilance: f64,
    pub low_mid: f64,
    pub stereo_spread: f64,
    pub dynamic_complexity: f64,
}

/// Per-signal measurements gathered before stereo analysis.
#[derive(Clone, Debug)]
pub struct MonoMeasurements {
    pub loudness: f64,
    pub bands: BandEnergies,
    pub dynamic_complexity: f64,
    pub cepstra: Vec<Vec<f32>>,
}

impl FeatureReport {
    pub fn assemble(mono: &MonoMeasurements, stereo_spread: f64) -> Self {
        Self {
            loudness: mono.loudness,
            presence: mono.bands.presence,
            sibilance: mono.bands.sibilance,
            low_mid: mono.bands.low_mid,
            stereo_spread,
            dynamic_complexity: mono.dynamic_complexity,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
