use std::fmt;
use std::path::Path;

use crate::error::AnalysisError;

use super::decode::AudioSource;
use super::stats::clamp_unit;

/// Why no stereo spread could be measured. Never escapes this module as an
/// error; every variant resolves to a spread of 0.0.
#[derive(Debug)]
pub enum StereoUnavailable {
    Decode(AnalysisError),
    ChannelCount(usize),
    /// Both channels are constant, so there is nothing to correlate.
    Degenerate,
}

impl fmt::Display for StereoUnavailable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StereoUnavailable::Decode(err) => write!(f, "stereo decode failed: {}", err),
            StereoUnavailable::ChannelCount(n) => write!(f, "{} channel(s), not a stereo pair", n),
            StereoUnavailable::Degenerate => write!(f, "both channels are constant"),
        }
    }
}

fn is_constant(channel: &[f32]) -> bool {
    channel.windows(2).all(|w| w[0] == w[1])
}

/// Pearson correlation over the common length of both channels. `None` when
/// either channel is constant.
pub fn pearson(left: &[f32], right: &[f32]) -> Option<f64> {
    let n = left.len().min(right.len());
    if n == 0 {
        return None;
    }
    let (left, right) = (&left[..n], &right[..n]);
    if is_constant(left) || is_constant(right) {
        return None;
    }

    let mean_l = left.iter().map(|&v| v as f64).sum::<f64>() / n as f64;
    let mean_r = right.iter().map(|&v| v as f64).sum::<f64>() / n as f64;

    let mut cov = 0.0;
    let mut var_l = 0.0;
    let mut var_r = 0.0;
    for (&l, &r) in left.iter().zip(right) {
        let dl = l as f64 - mean_l;
        let dr = r as f64 - mean_r;
        cov += dl * dr;
        var_l += dl * dl;
        var_r += dr * dr;
    }

    if var_l <= 0.0 || var_r <= 0.0 {
        return None;
    }
    Some((cov / (var_l.sqrt() * var_r.sqrt())).clamp(-1.0, 1.0))
}

/// `1 - |corr|`, clamped. Identical and polarity-inverted pairs both read 0.
/// Content on one side against a constant other side reads as fully spread.
pub fn spread_from_pair(left: &[f32], right: &[f32]) -> Result<f64, StereoUnavailable> {
    if let Some(corr) = pearson(left, right) {
        return Ok(clamp_unit(1.0 - corr.abs()));
    }
    let n = left.len().min(right.len());
    if is_constant(&left[..n]) && is_constant(&right[..n]) {
        return Err(StereoUnavailable::Degenerate);
    }
    Ok(1.0)
}

pub fn measure(source: &dyn AudioSource, path: &Path) -> Result<f64, StereoUnavailable> {
    let data = source.load_channels(path).map_err(StereoUnavailable::Decode)?;
    let (left, right) = data
        .stereo_pair()
        .ok_or(StereoUnavailable::ChannelCount(data.channel_count()))?;
    spread_from_pair(left, right)
}

/// Stereo spread of the file at `path`, or 0.0 when it has no usable pair.
pub fn stereo_spread(source: &dyn AudioSource, path: &Path) -> f64 {
    match measure(source, path) {
        Ok(spread) => spread,
        Err(reason) => {
            log::debug!("Stereo spread unavailable ({}); using 0.0", reason);
            0.0
        }
    }
}
