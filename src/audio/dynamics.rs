use crate::config::DynamicsConfig;

use super::stats::{mean, std_dev, unit_ratio};

/// Short-term RMS envelope: `block_ms` windows every `hop_ms`. A signal
/// shorter than one block yields a single whole-signal value.
pub fn rms_envelope(samples: &[f32], sample_rate: u32, config: &DynamicsConfig) -> Vec<f64> {
    if samples.is_empty() {
        return Vec::new();
    }
    let block = ((sample_rate as u64 * config.block_ms as u64) / 1000).max(1) as usize;
    let hop = ((sample_rate as u64 * config.hop_ms as u64) / 1000).max(1) as usize;

    let rms = |chunk: &[f32]| -> f64 {
        let sum_sq: f64 = chunk.iter().map(|&s| s as f64 * s as f64).sum();
        (sum_sq / chunk.len() as f64).sqrt()
    };

    if samples.len() < block {
        return vec![rms(samples)];
    }

    (0..=(samples.len() - block) / hop)
        .map(|i| rms(&samples[i * hop..i * hop + block]))
        .collect()
}

/// Coefficient of variation of the RMS envelope, clamped to [0, 1].
pub fn dynamic_complexity(
    samples: &[f32],
    sample_rate: u32,
    config: &DynamicsConfig,
    epsilon: f64,
) -> f64 {
    let envelope = rms_envelope(samples, sample_rate, config);
    log::debug!("Dynamics envelope: {} blocks", envelope.len());
    unit_ratio(std_dev(&envelope), mean(&envelope), epsilon)
}
