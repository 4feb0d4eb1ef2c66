//! Mel-frequency cepstral coefficients computed from a magnitude spectrum.
//!
//! Triangular HTK-mel filters over the power spectrum, log energies in dB,
//! then an orthonormal DCT-II truncated to the requested coefficient count.

use crate::config::CepstrumConfig;

const LOG_FLOOR: f64 = 1e-10;

fn hz_to_mel(hz: f64) -> f64 {
    2595.0 * (1.0 + hz / 700.0).log10()
}

fn mel_to_hz(mel: f64) -> f64 {
    700.0 * (10f64.powf(mel / 2595.0) - 1.0)
}

/// Filterbank and DCT basis for one (sample rate, bin count) pair.
#[derive(Clone, Debug)]
pub struct CepstralExtractor {
    /// Per filter: (first bin, weights from that bin on).
    filters: Vec<(usize, Vec<f64>)>,
    dct: Vec<Vec<f64>>,
}

impl CepstralExtractor {
    pub fn new(config: &CepstrumConfig, sample_rate: u32, bin_count: usize) -> Self {
        let nyquist = sample_rate as f64 / 2.0;
        let high_hz = config.high_hz.min(nyquist);
        let low_hz = config.low_hz.min(high_hz);
        let bands = config.mel_bands;

        let mel_lo = hz_to_mel(low_hz);
        let mel_hi = hz_to_mel(high_hz);
        let edges: Vec<f64> = (0..bands + 2)
            .map(|i| mel_to_hz(mel_lo + (mel_hi - mel_lo) * i as f64 / (bands + 1) as f64))
            .collect();

        let bin_hz = if bin_count > 1 { nyquist / (bin_count - 1) as f64 } else { nyquist };

        let filters = edges
            .windows(3)
            .map(|w| {
                let (left, center, right) = (w[0], w[1], w[2]);
                let first = (left / bin_hz).ceil().max(0.0) as usize;
                let last = ((right / bin_hz).floor() as usize).min(bin_count.saturating_sub(1));
                let weights = (first..=last)
                    .map(|k| {
                        let f = k as f64 * bin_hz;
                        if f <= center {
                            if center > left { (f - left) / (center - left) } else { 1.0 }
                        } else if right > center {
                            (right - f) / (right - center)
                        } else {
                            0.0
                        }
                    })
                    .map(|w| w.max(0.0))
                    .collect();
                (first, weights)
            })
            .collect();

        let n = bands as f64;
        let dct = (0..config.coefficients)
            .map(|k| {
                let scale = if k == 0 { (1.0 / n).sqrt() } else { (2.0 / n).sqrt() };
                (0..bands)
                    .map(|m| {
                        scale
                            * (std::f64::consts::PI * k as f64 * (m as f64 + 0.5) / n).cos()
                    })
                    .collect()
            })
            .collect();

        Self { filters, dct }
    }

    pub fn coefficient_count(&self) -> usize {
        self.dct.len()
    }

    pub fn coefficients(&self, magnitudes: &[f32]) -> Vec<f32> {
        let log_energies: Vec<f64> = self
            .filters
            .iter()
            .map(|(first, weights)| {
                let energy: f64 = weights
                    .iter()
                    .zip(magnitudes.iter().skip(*first))
                    .map(|(w, &m)| w * (m as f64) * (m as f64))
                    .sum();
                10.0 * energy.max(LOG_FLOOR).log10()
            })
            .collect();

        self.dct
            .iter()
            .map(|basis| {
                basis
                    .iter()
                    .zip(&log_energies)
                    .map(|(b, e)| b * e)
                    .sum::<f64>() as f32
            })
            .collect()
    }
}
