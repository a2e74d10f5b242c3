use std::path::Path;

/// Domain interface for the external speech-enhancement capability.
///
/// Treated as unreliable: the orchestrator substitutes the unenhanced input
/// when this fails, so implementations may error freely and must never be
/// load-bearing for the rest of the pipeline.
pub trait SpeechEnhancer: Send {
    fn enhance(&self, input: &Path, output: &Path) -> Result<(), Box<dyn std::error::Error>>;
}
