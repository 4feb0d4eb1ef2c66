use ebur128::{EbuR128, Mode};

use crate::error::{AnalysisError, Result};

/// Reported when nothing passes the absolute gate.
pub const LOUDNESS_FLOOR_LUFS: f64 = -70.0;

fn meter_error(err: ebur128::Error) -> AnalysisError {
    AnalysisError::Loudness(format!("{:?}", err))
}

/// EBU R128 integrated loudness of a mono signal in LUFS. K-weighting and the
/// absolute/relative gates come from the meter; silent or near-silent input
/// reports the floor instead of an infinite value.
pub fn integrated_loudness(samples: &[f32], sample_rate: u32) -> Result<f64> {
    let mut meter = EbuR128::new(1, sample_rate, Mode::I).map_err(meter_error)?;
    meter.add_frames_f32(samples).map_err(meter_error)?;
    let lufs = meter.loudness_global().map_err(meter_error)?;

    if !lufs.is_finite() || lufs < LOUDNESS_FLOOR_LUFS {
        log::debug!("Integrated loudness {} below floor; reporting {}", lufs, LOUDNESS_FLOOR_LUFS);
        return Ok(LOUDNESS_FLOOR_LUFS);
    }
    Ok(lufs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(freq: f32, amp: f32, sr: u32, secs: f32) -> Vec<f32> {
        (0..(sr as f32 * secs) as usize)
            .map(|i| amp * (2.0 * std::f32::consts::PI * freq * i as f32 / sr as f32).sin())
            .collect()
    }

    #[test]
    fn silence_reports_floor() {
        let lufs = integrated_loudness(&vec![0.0; 88200], 44100).unwrap();
        assert_eq!(lufs, LOUDNESS_FLOOR_LUFS);
    }

    #[test]
    fn full_scale_sine_is_loud_and_finite() {
        // A 997 Hz full-scale sine on one channel measures about -3 LUFS.
        let lufs = integrated_loudness(&sine(997.0, 1.0, 48000, 2.0), 48000).unwrap();
        assert!(lufs.is_finite());
        assert!((lufs - -3.0).abs() < 1.0, "got {}", lufs);
    }

    #[test]
    fn halving_amplitude_drops_about_six_lu() {
        let loud = integrated_loudness(&sine(1000.0, 0.5, 44100, 2.0), 44100).unwrap();
        let quiet = integrated_loudness(&sine(1000.0, 0.25, 44100, 2.0), 44100).unwrap();
        assert!(((loud - quiet) - 6.02).abs() < 0.2);
    }
}
