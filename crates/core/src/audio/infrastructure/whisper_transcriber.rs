use std::path::{Path, PathBuf};

use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

use crate::audio::domain::batch_transcriber::BatchTranscriber;
use crate::audio::domain::transcript::SentenceFragment;
use crate::audio::infrastructure::speaker_tagger::EmbeddingSpeakerTagger;
use crate::audio::infrastructure::wav;

/// Batch transcription capability: whisper.cpp recognition via whisper-rs
/// plus speaker attribution from the embedding tagger.
///
/// The model context is loaded once; each item gets a fresh inference
/// state. Per-item failures (unreadable scratch file, inference error, no
/// recognizable speech) become `None` entries so one bad item never aborts
/// its batch siblings.
pub struct WhisperTranscriber {
    ctx: WhisperContext,
    tagger: EmbeddingSpeakerTagger,
}

impl WhisperTranscriber {
    pub fn new(
        model_path: &Path,
        tagger: EmbeddingSpeakerTagger,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        if !model_path.exists() {
            return Err(format!("speech model not found at {}", model_path.display()).into());
        }
        let ctx = WhisperContext::new_with_params(
            model_path.to_str().ok_or("invalid model path")?,
            WhisperContextParameters::default(),
        )
        .map_err(|e| format!("failed to load speech model: {e}"))?;
        Ok(Self { ctx, tagger })
    }

    fn transcribe_one(&self, input: &Path) -> Result<Vec<SentenceFragment>, Box<dyn std::error::Error>> {
        let clip = wav::read_clip(input)?;

        let mut state = self
            .ctx
            .create_state()
            .map_err(|e| format!("failed to create inference state: {e}"))?;

        let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 0 });
        params.set_language(Some("auto"));
        params.set_translate(false);
        params.set_token_timestamps(true);
        params.set_print_special(false);
        params.set_print_progress(false);
        params.set_print_realtime(false);
        params.set_print_timestamps(false);
        params.set_n_threads(num_cpus().min(4) as i32);

        state
            .full(params, clip.samples())
            .map_err(|e| format!("speech inference failed: {e}"))?;

        let mut sentences: Vec<(String, f64, f64)> = Vec::new();
        for seg_idx in 0..state.full_n_segments() {
            let segment = match state.get_segment(seg_idx) {
                Some(s) => s,
                None => continue,
            };

            let mut text = String::new();
            let mut t0 = i64::MAX;
            let mut t1 = i64::MIN;
            for tok_idx in 0..segment.n_tokens() {
                let token = match segment.get_token(tok_idx) {
                    Some(t) => t,
                    None => continue,
                };
                let piece = match token.to_str() {
                    Ok(p) => p,
                    Err(_) => continue,
                };
                // Skip special tokens ([_BEG_], [_SOT_], <|endoftext|>, ...)
                let trimmed = piece.trim();
                if trimmed.is_empty() || trimmed.starts_with('[') || trimmed.starts_with('<') {
                    continue;
                }
                let token_data = token.token_data();
                t0 = t0.min(token_data.t0);
                t1 = t1.max(token_data.t1);
                text.push_str(piece);
            }

            let text = text.trim().to_string();
            if text.is_empty() || t1 <= t0 {
                continue;
            }
            // Token timestamps are in centiseconds (10ms units)
            sentences.push((text, t0 as f64 / 100.0, t1 as f64 / 100.0));
        }

        if sentences.is_empty() {
            return Ok(Vec::new());
        }

        let spans: Vec<(f64, f64)> = sentences.iter().map(|s| (s.1, s.2)).collect();
        let speakers = self.tagger.label_spans(&clip, &spans)?;

        Ok(sentences
            .into_iter()
            .zip(speakers)
            .map(|((text, start, end), speaker)| SentenceFragment {
                speaker,
                text,
                start,
                end,
            })
            .collect())
    }
}

impl BatchTranscriber for WhisperTranscriber {
    fn transcribe_batch(
        &mut self,
        inputs: &[PathBuf],
    ) -> Result<Vec<Option<Vec<SentenceFragment>>>, Box<dyn std::error::Error>> {
        let mut results = Vec::with_capacity(inputs.len());
        for input in inputs {
            match self.transcribe_one(input) {
                Ok(fragments) if fragments.is_empty() => {
                    log::warn!("no speech recognized in {}", input.display());
                    results.push(None);
                }
                Ok(fragments) => results.push(Some(fragments)),
                Err(e) => {
                    log::warn!("transcription failed for {}: {e}", input.display());
                    results.push(None);
                }
            }
        }
        Ok(results)
    }
}

fn num_cpus() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::constants::{
        SPEAKER_MODEL_NAME, SPEAKER_MODEL_URL, SPEAKER_SIMILARITY_THRESHOLD, WHISPER_MODEL_NAME,
        WHISPER_MODEL_URL,
    };
    use crate::shared::model_resolver;

    #[test]
    #[ignore] // Requires speech and speaker model downloads
    fn test_sine_wave_yields_no_speech_not_an_error() {
        let speaker_model =
            model_resolver::resolve(SPEAKER_MODEL_NAME, SPEAKER_MODEL_URL, None, None)
                .expect("failed to resolve speaker model");
        let speech_model =
            model_resolver::resolve(WHISPER_MODEL_NAME, WHISPER_MODEL_URL, None, None)
                .expect("failed to resolve speech model");

        let tagger = EmbeddingSpeakerTagger::new(&speaker_model, SPEAKER_SIMILARITY_THRESHOLD)
            .expect("failed to create tagger");
        let mut transcriber =
            WhisperTranscriber::new(&speech_model, tagger).expect("failed to create transcriber");

        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("tone.wav");
        let samples: Vec<f32> = (0..48_000)
            .map(|i| {
                let t = i as f64 / 16_000.0;
                (2.0 * std::f64::consts::PI * 440.0 * t).sin() as f32
            })
            .collect();
        wav::write_clip(&path, &crate::audio::domain::audio_clip::AudioClip::new(samples, 16_000))
            .unwrap();

        let results = transcriber.transcribe_batch(&[path]).unwrap();
        assert_eq!(results.len(), 1);
    }
}
