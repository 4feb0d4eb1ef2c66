use crate::config::{BandRange, BandsConfig};

use super::spectrum::{bin_frequency, SpectrumMatrix};
use super::stats::{mean, std_dev, unit_ratio};

/// Bin indices whose center frequency falls inside an inclusive range.
#[derive(Clone, Debug)]
pub struct BandMask {
    bins: Vec<usize>,
}

impl BandMask {
    pub fn new(range: BandRange, sample_rate: u32, bin_count: usize) -> Self {
        let bins = (0..bin_count)
            .filter(|&k| {
                let f = bin_frequency(k, sample_rate, bin_count);
                f >= range.lo && f <= range.hi
            })
            .collect();
        Self { bins }
    }

    pub fn bins(&self) -> &[usize] {
        &self.bins
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    /// Mean magnitude of the selected bins in one spectrum row.
    pub fn mean_of(&self, row: &[f32]) -> f64 {
        if self.bins.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.bins.iter().map(|&k| row[k] as f64).sum();
        sum / self.bins.len() as f64
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BandEnergies {
    pub presence: f64,
    pub sibilance: f64,
    pub low_mid: f64,
}

pub struct BandEnergyAnalyzer {
    presence: BandMask,
    sibilance: BandMask,
    low_mid: BandMask,
    epsilon: f64,
}

impl BandEnergyAnalyzer {
    /// Masks are built once for the given sample rate and bin count.
    pub fn new(bands: &BandsConfig, sample_rate: u32, bin_count: usize, epsilon: f64) -> Self {
        let analyzer = Self {
            presence: BandMask::new(bands.presence, sample_rate, bin_count),
            sibilance: BandMask::new(bands.sibilance, sample_rate, bin_count),
            low_mid: BandMask::new(bands.low_mid, sample_rate, bin_count),
            epsilon,
        };

        for (name, mask) in [
            ("presence", &analyzer.presence),
            ("sibilance", &analyzer.sibilance),
            ("low_mid", &analyzer.low_mid),
        ] {
            if mask.is_empty() {
                log::warn!("{} band has no bins at {} Hz; it will read as 0", name, sample_rate);
            } else {
                log::debug!("{} band: {} bins", name, mask.bins().len());
            }
        }

        analyzer
    }

    pub fn analyze(&self, spectra: &SpectrumMatrix) -> BandEnergies {
        let rows = spectra.rows();
        let per_frame = |mask: &BandMask| -> Vec<f64> { rows.iter().map(|r| mask.mean_of(r)).collect() };

        // Full-spectrum mean, shared by presence and low_mid.
        let full: Vec<f64> = rows
            .iter()
            .map(|r| {
                if r.is_empty() {
                    0.0
                } else {
                    r.iter().map(|&m| m as f64).sum::<f64>() / r.len() as f64
                }
            })
            .collect();
        let total = mean(&full);

        let presence = unit_ratio(mean(&per_frame(&self.presence)), total, self.epsilon);
        let low_mid = unit_ratio(mean(&per_frame(&self.low_mid)), total, self.epsilon);

        let sib = per_frame(&self.sibilance);
        let sibilance = unit_ratio(std_dev(&sib), mean(&sib), self.epsilon);

        BandEnergies {
            presence,
            sibilance,
            low_mid,
        }
    }
}
