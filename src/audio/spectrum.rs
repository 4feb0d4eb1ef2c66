use rayon::prelude::*;
use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::sync::Arc;

use super::cepstrum::CepstralExtractor;
use super::frames::Framer;

/// Magnitude spectra in frame order. Every row has `bin_count` bins.
#[derive(Clone, Debug)]
pub struct SpectrumMatrix {
    rows: Vec<Vec<f32>>,
    bin_count: usize,
}

impl SpectrumMatrix {
    pub fn new(rows: Vec<Vec<f32>>, bin_count: usize) -> Self {
        debug_assert!(rows.iter().all(|r| r.len() == bin_count));
        Self { rows, bin_count }
    }

    pub fn rows(&self) -> &[Vec<f32>] {
        &self.rows
    }

    pub fn frame_count(&self) -> usize {
        self.rows.len()
    }

    pub fn bin_count(&self) -> usize {
        self.bin_count
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Frequency of bin `k` when `bin_count` bins span 0..=Nyquist.
pub fn bin_frequency(k: usize, sample_rate: u32, bin_count: usize) -> f64 {
    if bin_count < 2 {
        return 0.0;
    }
    k as f64 * (sample_rate as f64 / 2.0) / (bin_count - 1) as f64
}

pub struct SpectralAnalysis {
    pub spectra: SpectrumMatrix,
    /// One coefficient vector per frame; empty when cepstra are disabled.
    pub cepstra: Vec<Vec<f32>>,
}

pub struct SpectralEngine {
    fft: Arc<dyn Fft<f32>>,
    frame_size: usize,
    cepstrum: Option<CepstralExtractor>,
}

impl SpectralEngine {
    pub fn new(frame_size: usize, cepstrum: Option<CepstralExtractor>) -> Self {
        let mut planner = FftPlanner::<f32>::new();
        let fft = planner.plan_fft_forward(frame_size);
        Self {
            fft,
            frame_size,
            cepstrum,
        }
    }

    pub fn bin_count(&self) -> usize {
        self.frame_size / 2 + 1
    }

    /// |X[k]| for k in 0..=N/2 of one windowed frame.
    pub fn magnitude_spectrum(&self, frame: &[f32]) -> Vec<f32> {
        let mut buffer: Vec<Complex<f32>> =
            frame.iter().map(|&s| Complex::new(s, 0.0)).collect();
        buffer.resize(self.frame_size, Complex::new(0.0, 0.0));
        self.fft.process(&mut buffer);
        buffer[..self.bin_count()].iter().map(|c| c.norm()).collect()
    }

    /// Spectra (and cepstra) for every frame the framer yields. Frames are
    /// processed in parallel; the collected rows keep temporal order.
    pub fn analyze(&self, framer: &Framer, samples: &[f32]) -> SpectralAnalysis {
        let count = framer.frame_count(samples.len());

        let per_frame: Vec<(Vec<f32>, Option<Vec<f32>>)> = (0..count)
            .into_par_iter()
            .map(|idx| {
                let frame = framer.frame_at(samples, idx);
                let magnitudes = self.magnitude_spectrum(&frame);
                let coeffs = self.cepstrum.as_ref().map(|c| c.coefficients(&magnitudes));
                (magnitudes, coeffs)
            })
            .collect();

        let mut rows = Vec::with_capacity(per_frame.len());
        let mut cepstra = Vec::new();
        for (magnitudes, coeffs) in per_frame {
            rows.push(magnitudes);
            if let Some(c) = coeffs {
                cepstra.push(c);
            }
        }

        SpectralAnalysis {
            spectra: SpectrumMatrix::new(rows, self.bin_count()),
            cepstra,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CepstrumConfig;

    #[test]
    fn bin_mapping_spans_dc_to_nyquist() {
        assert_eq!(bin_frequency(0, 44100, 1025), 0.0);
        assert!((bin_frequency(1024, 44100, 1025) - 22050.0).abs() < 1e-9);
        assert!((bin_frequency(512, 44100, 1025) - 11025.0).abs() < 1e-9);
    }

    #[test]
    fn real_fft_bin_count() {
        let engine = SpectralEngine::new(2048, None);
        assert_eq!(engine.bin_count(), 1025);
        assert_eq!(engine.magnitude_spectrum(&vec![0.0; 2048]).len(), 1025);
    }

    #[test]
    fn sine_peaks_at_its_bin() {
        let size = 1024;
        let sr = 1024u32;
        let tone: Vec<f32> = (0..size)
            .map(|i| (2.0 * std::f32::consts::PI * 100.0 * i as f32 / sr as f32).sin())
            .collect();
        let engine = SpectralEngine::new(size, None);
        let mags = engine.magnitude_spectrum(&tone);
        let peak = mags
            .iter()
            .enumerate()
            .fold((0, 0.0f32), |best, (i, &m)| if m > best.1 { (i, m) } else { best })
            .0;
        // 1 Hz per bin at this rate and size.
        assert_eq!(peak, 100);
    }

    #[test]
    fn matrix_rows_follow_frame_order() {
        let framer = Framer::new(64, 32);
        // Silence then a burst, so the energy of each row rises with time.
        let mut samples = vec![0.0f32; 64 * 4];
        for (i, s) in samples.iter_mut().enumerate().skip(128) {
            *s = if i % 2 == 0 { 0.9 } else { -0.9 };
        }
        let engine = SpectralEngine::new(64, None);
        let analysis = engine.analyze(&framer, &samples);

        assert_eq!(analysis.spectra.frame_count(), framer.frame_count(samples.len()));
        assert!(analysis.cepstra.is_empty());
        let energy: Vec<f32> = analysis
            .spectra
            .rows()
            .iter()
            .map(|r| r.iter().map(|m| m * m).sum())
            .collect();
        assert!(energy[0] < 1e-6);
        assert!(energy.windows(2).all(|w| w[0] <= w[1] + 1e-3));
    }

    #[test]
    fn cepstra_are_computed_per_frame_when_enabled() {
        let framer = Framer::new(256, 128);
        let samples: Vec<f32> = (0..2048).map(|i| ((i * 7) % 13) as f32 / 13.0 - 0.5).collect();
        let cfg = CepstrumConfig::default();
        let engine = SpectralEngine::new(256, Some(CepstralExtractor::new(&cfg, 16000, 129)));
        let analysis = engine.analyze(&framer, &samples);

        assert_eq!(analysis.cepstra.len(), analysis.spectra.frame_count());
        assert!(analysis.cepstra.iter().all(|c| c.len() == 13));
    }

    #[test]
    fn short_signal_yields_empty_matrix() {
        let framer = Framer::new(2048, 512);
        let engine = SpectralEngine::new(2048, None);
        let analysis = engine.analyze(&framer, &vec![0.1; 1000]);
        assert!(analysis.spectra.is_empty());
        assert_eq!(analysis.spectra.bin_count(), 1025);
    }
}
