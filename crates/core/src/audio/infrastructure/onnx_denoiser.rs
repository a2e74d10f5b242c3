use std::path::Path;
use std::sync::Mutex;

use crate::audio::domain::audio_clip::AudioClip;
use crate::audio::domain::speech_enhancer::SpeechEnhancer;
use crate::audio::infrastructure::wav;

/// Window length fed to the enhancement model, in samples (1 s at 16 kHz).
const CHUNK_SAMPLES: usize = 16_000;

/// Speech enhancer backed by a waveform-to-waveform denoising model run
/// through ONNX Runtime. The canonical WAV is processed in fixed windows
/// and rewritten to the target path at the same length and rate.
pub struct OnnxDenoiser {
    session: Mutex<ort::session::Session>,
}

impl OnnxDenoiser {
    pub fn new(model_path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let intra_threads = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        let session = ort::session::Session::builder()?
            .with_optimization_level(ort::session::builder::GraphOptimizationLevel::Level3)?
            .with_intra_threads(intra_threads)?
            .commit_from_file(model_path)?;
        Ok(Self {
            session: Mutex::new(session),
        })
    }

    fn denoise_chunk(&self, chunk: &[f32]) -> Result<Vec<f32>, Box<dyn std::error::Error>> {
        let tensor = ndarray::Array2::from_shape_vec((1, chunk.len()), chunk.to_vec())?;
        let input_value = ort::value::Tensor::from_array(tensor)?;
        let mut session = self
            .session
            .lock()
            .map_err(|e| format!("lock poisoned: {e}"))?;
        let outputs = session.run(ort::inputs![input_value])?;
        let array = outputs[0].try_extract_array::<f32>()?;
        let denoised = array.as_slice().ok_or("cannot read enhancer output")?;
        // Some models pad the final frame; keep the input length.
        Ok(denoised[..denoised.len().min(chunk.len())].to_vec())
    }
}

impl SpeechEnhancer for OnnxDenoiser {
    fn enhance(&self, input: &Path, output: &Path) -> Result<(), Box<dyn std::error::Error>> {
        let clip = wav::read_clip(input)?;
        let mut enhanced = Vec::with_capacity(clip.len());
        for chunk in clip.samples().chunks(CHUNK_SAMPLES) {
            enhanced.extend(self.denoise_chunk(chunk)?);
        }
        wav::write_clip(output, &AudioClip::new(enhanced, clip.sample_rate()))?;
        log::debug!("enhanced {} -> {}", input.display(), output.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_missing_model_errors() {
        assert!(OnnxDenoiser::new(Path::new("/nonexistent/denoiser.onnx")).is_err());
    }
}
