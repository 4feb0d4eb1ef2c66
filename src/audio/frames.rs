use crate::config::FramingConfig;

/// Fixed-size, Hann-windowed frames taken from the start of a signal.
/// Trailing samples that don't fill a whole frame are dropped.
#[derive(Clone, Debug)]
pub struct Framer {
    frame_size: usize,
    hop_size: usize,
    window: Vec<f32>,
}

impl Framer {
    pub fn new(frame_size: usize, hop_size: usize) -> Self {
        Self {
            frame_size,
            hop_size,
            window: hann_window(frame_size),
        }
    }

    pub fn from_config(config: &FramingConfig) -> Self {
        Self::new(config.frame_size, config.hop_size)
    }

    pub fn frame_count(&self, len: usize) -> usize {
        if self.hop_size == 0 || len < self.frame_size {
            return 0;
        }
        (len - self.frame_size) / self.hop_size + 1
    }

    /// Windowed copy of frame `index`. `index` must be below `frame_count`.
    pub fn frame_at(&self, samples: &[f32], index: usize) -> Vec<f32> {
        let start = index * self.hop_size;
        samples[start..start + self.frame_size]
            .iter()
            .zip(&self.window)
            .map(|(s, w)| s * w)
            .collect()
    }

    /// Lazy pass over every frame. Call again to restart.
    pub fn frames<'a>(&'a self, samples: &'a [f32]) -> Frames<'a> {
        Frames {
            framer: self,
            samples,
            next: 0,
            count: self.frame_count(samples.len()),
        }
    }
}

pub struct Frames<'a> {
    framer: &'a Framer,
    samples: &'a [f32],
    next: usize,
    count: usize,
}

impl Iterator for Frames<'_> {
    type Item = Vec<f32>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.count {
            return None;
        }
        let frame = self.framer.frame_at(self.samples, self.next);
        self.next += 1;
        Some(frame)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.count - self.next;
        (left, Some(left))
    }
}

impl ExactSizeIterator for Frames<'_> {}

pub fn hann_window(size: usize) -> Vec<f32> {
    if size < 2 {
        return vec![1.0; size];
    }
    (0..size)
        .map(|i| {
            0.5 * (1.0 - (2.0 * std::f32::consts::PI * i as f32 / (size - 1) as f32).cos())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_full_frames_only() {
        let framer = Framer::new(8, 2);
        assert_eq!(framer.frame_count(7), 0);
        assert_eq!(framer.frame_count(8), 1);
        assert_eq!(framer.frame_count(9), 1);
        assert_eq!(framer.frame_count(10), 2);
        assert_eq!(framer.frame_count(20), 7);

        let framer = Framer::new(2048, 512);
        assert_eq!(framer.frame_count(44100), 83);
    }

    #[test]
    fn frames_start_at_zero_and_advance_by_hop() {
        let framer = Framer::new(4, 2);
        let samples: Vec<f32> = (0..9).map(|i| i as f32).collect();
        let window = hann_window(4);

        let frames: Vec<Vec<f32>> = framer.frames(&samples).collect();
        assert_eq!(frames.len(), 3);
        for (idx, frame) in frames.iter().enumerate() {
            for (j, &v) in frame.iter().enumerate() {
                let raw = (idx * 2 + j) as f32;
                assert!((v - raw * window[j]).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn iteration_is_restartable() {
        let framer = Framer::new(4, 1);
        let samples = vec![1.0f32; 10];
        let first: Vec<_> = framer.frames(&samples).collect();
        let second: Vec<_> = framer.frames(&samples).collect();
        assert_eq!(first, second);
        assert_eq!(framer.frames(&samples).len(), 7);
    }

    #[test]
    fn hann_is_symmetric_and_tapered() {
        let w = hann_window(2048);
        assert!(w[0].abs() < 1e-7);
        assert!(w[2047].abs() < 1e-7);
        for i in 0..1024 {
            assert!((w[i] - w[2047 - i]).abs() < 1e-5);
        }
        assert!(w.iter().all(|&v| (0.0..=1.0).contains(&v)));
    }
}
