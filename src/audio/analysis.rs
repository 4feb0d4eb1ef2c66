use std::path::Path;

use crate::config::AnalysisConfig;
use crate::error::{AnalysisError, Result};

use super::bands::BandEnergyAnalyzer;
use super::cepstrum::CepstralExtractor;
use super::decode::{AudioSource, Signal, SymphoniaSource};
use super::dynamics;
use super::features::{FeatureReport, MonoMeasurements};
use super::frames::Framer;
use super::loudness;
use super::spectrum::SpectralEngine;
use super::stereo;

/// Report plus the per-frame cepstral coefficients kept for diagnostics.
#[derive(Clone, Debug)]
pub struct BusAnalysis {
    pub report: FeatureReport,
    pub cepstra: Vec<Vec<f32>>,
}

pub struct Analyzer<S = SymphoniaSource> {
    config: AnalysisConfig,
    source: S,
}

impl Analyzer<SymphoniaSource> {
    pub fn new(config: AnalysisConfig) -> Result<Self> {
        Self::with_source(config, SymphoniaSource)
    }
}

impl<S: AudioSource> Analyzer<S> {
    pub fn with_source(config: AnalysisConfig, source: S) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, source })
    }

    /// Decode `path`, measure the mono mix, then the stereo pair.
    pub fn analyze_file(&self, path: &Path) -> Result<BusAnalysis> {
        if !path.exists() {
            return Err(AnalysisError::MissingInput(path.to_path_buf()));
        }

        log::info!("Decoding {}", path.display());
        let signal = self.source.load_mono(path)?;
        let mono = self.measure(&signal)?;

        let stereo_spread = stereo::stereo_spread(&self.source, path);
        let report = FeatureReport::assemble(&mono, stereo_spread);

        log::info!(
            "Features: loudness={:.2} LUFS, presence={:.3}, sibilance={:.3}, low_mid={:.3}, stereo_spread={:.3}, dynamic_complexity={:.3}",
            report.loudness,
            report.presence,
            report.sibilance,
            report.low_mid,
            report.stereo_spread,
            report.dynamic_complexity
        );

        Ok(BusAnalysis {
            report,
            cepstra: mono.cepstra,
        })
    }

    /// Every mono measurement. Fails when the signal is under the minimum
    /// duration.
    pub fn measure(&self, signal: &Signal) -> Result<MonoMeasurements> {
        self.check_duration(signal)?;
        let cfg = &self.config;
        let samples = &signal.samples;
        let sr = signal.sample_rate;

        let loudness = loudness::integrated_loudness(samples, sr)?;

        let framer = Framer::from_config(&cfg.framing);
        let bin_count = cfg.framing.frame_size / 2 + 1;
        let cepstrum = cfg
            .cepstrum
            .enabled
            .then(|| CepstralExtractor::new(&cfg.cepstrum, sr, bin_count));
        let engine = SpectralEngine::new(cfg.framing.frame_size, cepstrum);

        let spectral = engine.analyze(&framer, samples);
        log::info!(
            "Spectral analysis: {} frames x {} bins",
            spectral.spectra.frame_count(),
            spectral.spectra.bin_count()
        );
        log_cepstral_summary(&spectral.cepstra);

        let bands = BandEnergyAnalyzer::new(&cfg.bands, sr, spectral.spectra.bin_count(), cfg.epsilon)
            .analyze(&spectral.spectra);

        let dynamic_complexity =
            dynamics::dynamic_complexity(samples, sr, &cfg.dynamics, cfg.epsilon);

        Ok(MonoMeasurements {
            loudness,
            bands,
            dynamic_complexity,
            cepstra: spectral.cepstra,
        })
    }

    fn check_duration(&self, signal: &Signal) -> Result<()> {
        let needed = (signal.sample_rate as f64 * self.config.min_duration_secs).ceil() as usize;
        if signal.sample_rate == 0 || signal.samples.is_empty() || signal.samples.len() < needed {
            return Err(AnalysisError::InsufficientAudio {
                samples: signal.samples.len(),
                sample_rate: signal.sample_rate,
            });
        }
        Ok(())
    }
}

fn log_cepstral_summary(cepstra: &[Vec<f32>]) {
    if !log::log_enabled!(log::Level::Debug) || cepstra.is_empty() {
        return;
    }
    let width = cepstra[0].len();
    let means: Vec<f32> = (0..width)
        .map(|k| cepstra.iter().map(|c| c[k]).sum::<f32>() / cepstra.len() as f32)
        .collect();
    log::debug!("Mean cepstral coefficients: {:?}", means);
}
