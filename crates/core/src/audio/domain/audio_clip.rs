/// Decoded audio in the pipeline's canonical form: mono PCM samples
/// normalized to [-1.0, 1.0].
#[derive(Clone, Debug, PartialEq)]
pub struct AudioClip {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl AudioClip {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }

    /// Samples covering `[start, end)` seconds, clamped to the clip bounds.
    /// An inverted or fully out-of-range span yields an empty slice.
    pub fn span(&self, start: f64, end: f64) -> &[f32] {
        let from = self.index_at(start).min(self.samples.len());
        let to = self.index_at(end).min(self.samples.len());
        if from >= to {
            return &[];
        }
        &self.samples[from..to]
    }

    fn index_at(&self, seconds: f64) -> usize {
        (seconds.max(0.0) * self.sample_rate as f64) as usize
    }
}
