use std::path::PathBuf;

use super::transcript::SentenceFragment;

/// Domain interface for the external batch transcription capability.
///
/// The returned list is strictly order-preserving: one entry per input,
/// with entry `i` belonging to `inputs[i]`. `None` marks an item the
/// capability produced no sentence data for (not speech, unreadable); that
/// is a per-item condition, not a batch failure. An `Err` means the batch call
/// itself failed; callers treat that as zero results for the batch and
/// continue with the next one.
pub trait BatchTranscriber: Send {
    fn transcribe_batch(
        &mut self,
        inputs: &[PathBuf],
    ) -> Result<Vec<Option<Vec<SentenceFragment>>>, Box<dyn std::error::Error>>;
}
