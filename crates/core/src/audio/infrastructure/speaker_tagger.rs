use std::path::Path;
use std::sync::Mutex;

use crate::audio::domain::audio_clip::AudioClip;

/// Attributes speaker identities to speech spans using a speaker-embedding
/// model run through ONNX Runtime.
///
/// Each span's waveform is embedded and L2-normalized, then assigned
/// greedily: it joins the most similar known speaker when the cosine
/// similarity clears the threshold, otherwise it founds the next id.
/// Ids are therefore stable in first-appearance order, which keeps repeated
/// runs over the same audio labeled identically.
pub struct EmbeddingSpeakerTagger {
    session: Mutex<ort::session::Session>,
    threshold: f64,
}

impl EmbeddingSpeakerTagger {
    pub fn new(model_path: &Path, threshold: f64) -> Result<Self, Box<dyn std::error::Error>> {
        let intra_threads = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        let session = ort::session::Session::builder()?
            .with_optimization_level(ort::session::builder::GraphOptimizationLevel::Level3)?
            .with_intra_threads(intra_threads)?
            .commit_from_file(model_path)?;
        Ok(Self {
            session: Mutex::new(session),
            threshold,
        })
    }

    /// Assign a speaker id to each `(start, end)` span of `clip`, in span
    /// order. Spans with no samples (outside the clip, inverted) come back
    /// as `None` and are left for the merge stage to drop.
    pub fn label_spans(
        &self,
        clip: &AudioClip,
        spans: &[(f64, f64)],
    ) -> Result<Vec<Option<u32>>, Box<dyn std::error::Error>> {
        let mut embeddings: Vec<Option<Vec<f32>>> = Vec::with_capacity(spans.len());
        for &(start, end) in spans {
            let span = clip.span(start, end);
            if span.is_empty() {
                embeddings.push(None);
            } else {
                embeddings.push(Some(self.embed(span)?));
            }
        }
        Ok(assign_speakers(&embeddings, self.threshold))
    }

    fn embed(&self, span: &[f32]) -> Result<Vec<f32>, Box<dyn std::error::Error>> {
        let tensor = ndarray::Array2::from_shape_vec((1, span.len()), span.to_vec())?;
        let input_value = ort::value::Tensor::from_array(tensor)?;
        let mut session = self
            .session
            .lock()
            .map_err(|e| format!("lock poisoned: {e}"))?;
        let outputs = session.run(ort::inputs![input_value])?;
        let embedding_array = outputs[0].try_extract_array::<f32>()?;
        let embedding_slice = embedding_array
            .as_slice()
            .ok_or("cannot read embedding output")?;

        let mut embedding = embedding_slice.to_vec();
        l2_normalize(&mut embedding);
        Ok(embedding)
    }
}

/// Greedy first-appearance grouping over optional embeddings. Centroids are
/// running sums per speaker; similarity is full cosine, so the sums need no
/// re-normalization between updates.
pub(crate) fn assign_speakers(embeddings: &[Option<Vec<f32>>], threshold: f64) -> Vec<Option<u32>> {
    let mut centroids: Vec<Vec<f32>> = Vec::new();
    let mut labels = Vec::with_capacity(embeddings.len());

    for embedding in embeddings {
        let embedding = match embedding {
            Some(e) => e,
            None => {
                labels.push(None);
                continue;
            }
        };

        let best = centroids
            .iter()
            .enumerate()
            .map(|(id, centroid)| (id, cosine_similarity(centroid, embedding)))
            .max_by(|a, b| a.1.total_cmp(&b.1));

        match best {
            Some((id, similarity)) if similarity >= threshold => {
                for (sum, value) in centroids[id].iter_mut().zip(embedding) {
                    *sum += value;
                }
                labels.push(Some(id as u32));
            }
            _ => {
                centroids.push(embedding.clone());
                labels.push(Some(centroids.len() as u32 - 1));
            }
        }
    }
    labels
}

pub(crate) fn l2_normalize(v: &mut [f32]) {
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in v.iter_mut() {
            *x /= norm;
        }
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    let dot: f64 = a
        .iter()
        .zip(b.iter())
        .map(|(x, y)| (*x as f64) * (*y as f64))
        .sum();
    let norm_a: f64 = a.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}
