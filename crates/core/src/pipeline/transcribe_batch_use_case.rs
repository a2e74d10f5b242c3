use std::fs;
use std::path::{Path, PathBuf};

use crate::audio::domain::audio_normalizer::AudioNormalizer;
use crate::audio::domain::batch_transcriber::BatchTranscriber;
use crate::audio::domain::speech_enhancer::SpeechEnhancer;
use crate::audio::domain::turn_merger::merge_fragments;
use crate::pipeline::derived_text_writer::DerivedTextWriter;
use crate::pipeline::run_summary::RunSummary;
use crate::shared::scratch::ScratchPath;

/// Orchestrates the transcription pipeline over fixed-size batches.
///
/// Per batch: normalize and enhance every candidate independently (a
/// failing item drops out without affecting its siblings), submit the
/// survivors to the transcriber in one call, merge each result into
/// speaker-turn text and persist it beside the source. All scratch audio
/// for a batch is released before the next batch starts, which bounds
/// peak temp-disk usage to one batch. Nothing here aborts the run: batch
/// failures are logged and counted as zero persisted.
pub struct TranscribeBatchUseCase {
    normalizer: Box<dyn AudioNormalizer>,
    enhancer: Box<dyn SpeechEnhancer>,
    transcriber: Box<dyn BatchTranscriber>,
    writer: DerivedTextWriter,
    overwrite: bool,
}

/// One candidate that survived preprocessing, with its scratch audio.
/// Both guards live until the end of the batch, success or not.
struct PreparedItem {
    source: PathBuf,
    // Retained so the pre-enhancement scratch file outlives the batch.
    _normalized: ScratchPath,
    enhanced: ScratchPath,
}

impl TranscribeBatchUseCase {
    pub fn new(
        normalizer: Box<dyn AudioNormalizer>,
        enhancer: Box<dyn SpeechEnhancer>,
        transcriber: Box<dyn BatchTranscriber>,
        writer: DerivedTextWriter,
        overwrite: bool,
    ) -> Self {
        Self {
            normalizer,
            enhancer,
            transcriber,
            writer,
            overwrite,
        }
    }

    pub fn run(&mut self, candidates: &[PathBuf], batch_size: usize) -> RunSummary {
        let batch_size = batch_size.max(1);
        let mut summary = RunSummary::default();

        for (index, batch) in candidates.chunks(batch_size).enumerate() {
            log::info!("processing batch {} ({} files)", index + 1, batch.len());
            summary.attempted += batch.len();
            let persisted = self.process_batch(batch);
            summary.persisted += persisted;
            log::info!(
                "batch {} finished, {} transcripts written",
                index + 1,
                persisted
            );
        }
        summary
    }

    fn process_batch(&mut self, batch: &[PathBuf]) -> usize {
        // 1. Prepare every item independently; failures drop the item only.
        let items: Vec<PreparedItem> = batch
            .iter()
            .filter_map(|source| self.prepare(source))
            .collect();
        if items.is_empty() {
            return 0;
        }

        // 2. One batch call; results pair with items by position.
        let inputs: Vec<PathBuf> = items
            .iter()
            .map(|item| item.enhanced.path().to_path_buf())
            .collect();
        let results = match self.transcriber.transcribe_batch(&inputs) {
            Ok(results) => results,
            Err(e) => {
                log::error!("batch transcription failed: {e}");
                return 0;
            }
        };
        if results.len() != items.len() {
            log::warn!(
                "transcriber returned {} results for {} items",
                results.len(),
                items.len()
            );
        }

        // 3. Merge and persist per item.
        let mut persisted = 0;
        for (item, fragments) in items.iter().zip(results) {
            let fragments = match fragments {
                Some(fragments) => fragments,
                None => {
                    log::warn!("no transcription for {}", item.source.display());
                    continue;
                }
            };
            let content = merge_fragments(&fragments);
            match self.writer.persist(&item.source, &content, self.overwrite) {
                Ok(true) => persisted += 1,
                Ok(false) => {}
                Err(e) => log::warn!(
                    "failed to persist transcript for {}: {e}",
                    item.source.display()
                ),
            }
        }
        persisted
        // `items` drops here, removing every scratch file of this batch.
    }

    fn prepare(&self, source: &Path) -> Option<PreparedItem> {
        if !self.overwrite && self.writer.derived_path(source).exists() {
            log::info!("transcript already exists, skipping {}", source.display());
            return None;
        }

        let normalized = match ScratchPath::allocate("normalized_", ".wav") {
            Ok(path) => path,
            Err(e) => {
                log::warn!("could not allocate scratch file for {}: {e}", source.display());
                return None;
            }
        };
        if let Err(e) = self.normalizer.normalize(source, normalized.path()) {
            log::warn!("preprocessing failed for {}: {e}", source.display());
            return None;
        }

        let enhanced = match ScratchPath::allocate("enhanced_", ".wav") {
            Ok(path) => path,
            Err(e) => {
                log::warn!("could not allocate scratch file for {}: {e}", source.display());
                return None;
            }
        };
        if let Err(e) = self.enhancer.enhance(normalized.path(), enhanced.path()) {
            log::warn!(
                "enhancement failed for {}: {e}; using unenhanced audio",
                source.display()
            );
            if let Err(e) = fs::copy(normalized.path(), enhanced.path()) {
                log::warn!("fallback copy failed for {}: {e}", source.display());
                return None;
            }
        }

        Some(PreparedItem {
            source: source.to_path_buf(),
            _normalized: normalized,
            enhanced,
        })
    }
}
