use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::{AnalysisError, Result};

/// Every constant the pipeline depends on. Defaults reproduce the reference
/// analysis; a TOML file may override any subset.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub framing: FramingConfig,
    #[serde(default)]
    pub bands: BandsConfig,
    #[serde(default)]
    pub dynamics: DynamicsConfig,
    #[serde(default)]
    pub cepstrum: CepstrumConfig,
    /// Added to every ratio denominator.
    #[serde(default = "default_epsilon")]
    pub epsilon: f64,
    /// Shortest signal accepted, in seconds of audio.
    #[serde(default = "default_min_duration_secs")]
    pub min_duration_secs: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FramingConfig {
    #[serde(default = "default_frame_size")]
    pub frame_size: usize,
    #[serde(default = "default_hop_size")]
    pub hop_size: usize,
}

/// Inclusive frequency range in Hz.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct BandRange {
    pub lo: f64,
    pub hi: f64,
}

impl BandRange {
    pub const fn new(lo: f64, hi: f64) -> Self {
        Self { lo, hi }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BandsConfig {
    #[serde(default = "default_presence_band")]
    pub presence: BandRange,
    #[serde(default = "default_sibilance_band")]
    pub sibilance: BandRange,
    #[serde(default = "default_low_mid_band")]
    pub low_mid: BandRange,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DynamicsConfig {
    #[serde(default = "default_block_ms")]
    pub block_ms: u32,
    #[serde(default = "default_dynamics_hop_ms")]
    pub hop_ms: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CepstrumConfig {
    #[serde(default = "default_cepstrum_enabled")]
    pub enabled: bool,
    #[serde(default = "default_coefficients")]
    pub coefficients: usize,
    #[serde(default = "default_mel_bands")]
    pub mel_bands: usize,
    #[serde(default = "default_mel_low_hz")]
    pub low_hz: f64,
    #[serde(default = "default_mel_high_hz")]
    pub high_hz: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            framing: FramingConfig::default(),
            bands: BandsConfig::default(),
            dynamics: DynamicsConfig::default(),
            cepstrum: CepstrumConfig::default(),
            epsilon: default_epsilon(),
            min_duration_secs: default_min_duration_secs(),
        }
    }
}

impl Default for FramingConfig {
    fn default() -> Self {
        Self {
            frame_size: default_frame_size(),
            hop_size: default_hop_size(),
        }
    }
}

impl Default for BandsConfig {
    fn default() -> Self {
        Self {
            presence: default_presence_band(),
            sibilance: default_sibilance_band(),
            low_mid: default_low_mid_band(),
        }
    }
}

impl Default for DynamicsConfig {
    fn default() -> Self {
        Self {
            block_ms: default_block_ms(),
            hop_ms: default_dynamics_hop_ms(),
        }
    }
}

impl Default for CepstrumConfig {
    fn default() -> Self {
        Self {
            enabled: default_cepstrum_enabled(),
            coefficients: default_coefficients(),
            mel_bands: default_mel_bands(),
            low_hz: default_mel_low_hz(),
            high_hz: default_mel_high_hz(),
        }
    }
}

fn default_epsilon() -> f64 { 1e-9 }
fn default_min_duration_secs() -> f64 { 1.0 }
fn default_frame_size() -> usize { 2048 }
fn default_hop_size() -> usize { 512 }
fn default_presence_band() -> BandRange { BandRange::new(2000.0, 5000.0) }
fn default_sibilance_band() -> BandRange { BandRange::new(6000.0, 10000.0) }
fn default_low_mid_band() -> BandRange { BandRange::new(150.0, 400.0) }
fn default_block_ms() -> u32 { 400 }
fn default_dynamics_hop_ms() -> u32 { 100 }
fn default_cepstrum_enabled() -> bool { true }
fn default_coefficients() -> usize { 13 }
fn default_mel_bands() -> usize { 40 }
fn default_mel_low_hz() -> f64 { 0.0 }
fn default_mel_high_hz() -> f64 { 11000.0 }

impl AnalysisConfig {
    pub fn validate(&self) -> Result<()> {
        let framing = &self.framing;
        if framing.frame_size < 2 || framing.frame_size % 2 != 0 {
            return Err(invalid(format!(
                "frame_size must be an even number >= 2, got {}",
                framing.frame_size
            )));
        }
        if framing.hop_size == 0 {
            return Err(invalid("hop_size must be positive".into()));
        }

        for (name, band) in [
            ("presence", self.bands.presence),
            ("sibilance", self.bands.sibilance),
            ("low_mid", self.bands.low_mid),
        ] {
            if !(band.lo.is_finite() && band.hi.is_finite()) || band.lo < 0.0 || band.lo > band.hi {
                return Err(invalid(format!(
                    "{} band must satisfy 0 <= lo <= hi, got [{}, {}]",
                    name, band.lo, band.hi
                )));
            }
        }

        if !(self.epsilon > 0.0 && self.epsilon.is_finite()) {
            return Err(invalid(format!("epsilon must be positive, got {}", self.epsilon)));
        }
        if !(self.min_duration_secs >= 0.0 && self.min_duration_secs.is_finite()) {
            return Err(invalid(format!(
                "min_duration_secs must be non-negative, got {}",
                self.min_duration_secs
            )));
        }
        if self.dynamics.block_ms == 0 || self.dynamics.hop_ms == 0 {
            return Err(invalid("dynamics block_ms and hop_ms must be positive".into()));
        }

        let cep = &self.cepstrum;
        if cep.enabled {
            if cep.mel_bands == 0 || cep.coefficients == 0 || cep.coefficients > cep.mel_bands {
                return Err(invalid(format!(
                    "cepstrum needs 0 < coefficients <= mel_bands, got {} / {}",
                    cep.coefficients, cep.mel_bands
                )));
            }
            if cep.low_hz < 0.0 || cep.low_hz >= cep.high_hz {
                return Err(invalid(format!(
                    "cepstrum range must satisfy 0 <= low_hz < high_hz, got [{}, {}]",
                    cep.low_hz, cep.high_hz
                )));
            }
        }

        Ok(())
    }
}

fn invalid(msg: String) -> AnalysisError {
    AnalysisError::InvalidConfig(msg)
}

pub fn load_config(path: &Path) -> Option<AnalysisConfig> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(cfg) => Some(cfg),
        Err(err) => {
            log::warn!("Could not parse {}: {}", path.display(), err);
            None
        }
    }
}

/// Explicit path first, then `busprobe.toml` in the working directory, then
/// the per-user config locations.
pub fn discover_config(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    let local = PathBuf::from("busprobe.toml");
    if local.exists() {
        return Some(local);
    }
    if let Some(home) = dirs::home_dir() {
        let xdg = home.join(".config").join("busprobe").join("config.toml");
        if xdg.exists() {
            return Some(xdg);
        }
    }
    if let Some(config_dir) = dirs::config_dir() {
        let platform = config_dir.join("busprobe").join("config.toml");
        if platform.exists() {
            return Some(platform);
        }
    }
    None
}

/// Resolve the effective configuration, falling back to defaults when no
/// file is found or the file cannot be read.
pub fn resolve(explicit: Option<&Path>) -> AnalysisConfig {
    match discover_config(explicit) {
        Some(path) => match load_config(&path) {
            Some(cfg) => {
                log::info!("Loaded config from {}", path.display());
                cfg
            }
            None => {
                log::warn!("Failed to load config from {}", path.display());
                AnalysisConfig::default()
            }
        },
        None => AnalysisConfig::default(),
    }
}
