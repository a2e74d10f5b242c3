use std::fs;
use std::path::PathBuf;

use crate::pipeline::derived_text_writer::DerivedTextWriter;
use crate::pipeline::run_summary::RunSummary;
use crate::summary::domain::summarizer::TextSummarizer;

/// Summarizes transcript files one at a time, sharing the transcription
/// pipeline's skip-if-exists and persist semantics. Every failure is
/// per-item: read errors, empty transcripts, and summarizer errors are
/// logged and skipped, never fatal to the run.
pub struct SummarizeUseCase {
    summarizer: Box<dyn TextSummarizer>,
    writer: DerivedTextWriter,
    overwrite: bool,
}

impl SummarizeUseCase {
    pub fn new(
        summarizer: Box<dyn TextSummarizer>,
        writer: DerivedTextWriter,
        overwrite: bool,
    ) -> Self {
        Self {
            summarizer,
            writer,
            overwrite,
        }
    }

    pub fn run(&self, files: &[PathBuf]) -> RunSummary {
        let mut summary = RunSummary::default();

        for file in files {
            summary.attempted += 1;

            if !self.overwrite && self.writer.derived_path(file).exists() {
                log::info!("summary already exists, skipping {}", file.display());
                continue;
            }

            let text = match fs::read_to_string(file) {
                Ok(text) => text,
                Err(e) => {
                    log::warn!("failed to read {}: {e}", file.display());
                    continue;
                }
            };
            let text = text.trim();
            if text.is_empty() {
                log::warn!("{} is empty, skipping", file.display());
                continue;
            }

            let generated = match self.summarizer.summarize(text) {
                Ok(generated) => generated,
                Err(e) => {
                    log::warn!("summarization failed for {}: {e}", file.display());
                    continue;
                }
            };
            if generated.trim().is_empty() {
                log::warn!("empty summary generated for {}, skipping", file.display());
                continue;
            }

            match self.writer.persist(file, &generated, self.overwrite) {
                Ok(true) => summary.persisted += 1,
                Ok(false) => {}
                Err(e) => log::warn!("failed to persist summary for {}: {e}", file.display()),
            }
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::TempDir;

    // ─── Stubs ───

    struct StubSummarizer {
        response: Result<String, String>,
    }

    impl TextSummarizer for StubSummarizer {
        fn summarize(&self, text: &str) -> Result<String, Box<dyn std::error::Error>> {
            match &self.response {
                Ok(summary) => Ok(summary.replace("${len}", &text.len().to_string())),
                Err(message) => Err(message.clone().into()),
            }
        }
    }

    fn transcript(tmp: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = tmp.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn use_case(response: Result<String, String>, overwrite: bool) -> SummarizeUseCase {
        SummarizeUseCase::new(
            Box::new(StubSummarizer { response }),
            DerivedTextWriter::new("md"),
            overwrite,
        )
    }

    #[test]
    fn test_summaries_are_written_beside_transcripts() {
        let tmp = TempDir::new().unwrap();
        let files = vec![
            transcript(&tmp, "a.wav.txt", "Speaker_0: hello"),
            transcript(&tmp, "b.wav.txt", "Speaker_1: goodbye"),
        ];
        let uc = use_case(Ok("summary of ${len} chars".to_string()), false);

        let summary = uc.run(&files);

        assert_eq!(summary.attempted, 2);
        assert_eq!(summary.persisted, 2);
        let written = fs::read_to_string(tmp.path().join("a.wav.txt.md")).unwrap();
        assert_eq!(written, "summary of 16 chars");
    }

    #[test]
    fn test_existing_summary_is_skipped() {
        let tmp = TempDir::new().unwrap();
        let files = vec![transcript(&tmp, "a.wav.txt", "content")];
        fs::write(tmp.path().join("a.wav.txt.md"), "old summary").unwrap();
        let uc = use_case(Ok("new summary".to_string()), false);

        let summary = uc.run(&files);

        assert_eq!(summary.persisted, 0);
        assert_eq!(
            fs::read_to_string(tmp.path().join("a.wav.txt.md")).unwrap(),
            "old summary"
        );
    }

    #[test]
    fn test_overwrite_replaces_existing_summary() {
        let tmp = TempDir::new().unwrap();
        let files = vec![transcript(&tmp, "a.wav.txt", "content")];
        fs::write(tmp.path().join("a.wav.txt.md"), "old summary").unwrap();
        let uc = use_case(Ok("new summary".to_string()), true);

        let summary = uc.run(&files);

        assert_eq!(summary.persisted, 1);
        assert_eq!(
            fs::read_to_string(tmp.path().join("a.wav.txt.md")).unwrap(),
            "new summary"
        );
    }

    #[test]
    fn test_blank_transcript_is_skipped() {
        let tmp = TempDir::new().unwrap();
        let files = vec![transcript(&tmp, "blank.wav.txt", "   \n  ")];
        let uc = use_case(Ok("should not appear".to_string()), false);

        let summary = uc.run(&files);

        assert_eq!(summary.attempted, 1);
        assert_eq!(summary.persisted, 0);
        assert!(!tmp.path().join("blank.wav.txt.md").exists());
    }

    #[test]
    fn test_summarizer_failure_skips_item_and_continues() {
        let tmp = TempDir::new().unwrap();
        let files = vec![
            transcript(&tmp, "a.wav.txt", "content"),
            transcript(&tmp, "b.wav.txt", "content"),
        ];
        let uc = use_case(Err("model exploded".to_string()), false);

        let summary = uc.run(&files);

        assert_eq!(summary.attempted, 2);
        assert_eq!(summary.persisted, 0);
    }

    #[test]
    fn test_unreadable_file_is_skipped() {
        let uc = use_case(Ok("unused".to_string()), false);
        let summary = uc.run(&[Path::new("/nonexistent/x.txt").to_path_buf()]);
        assert_eq!(summary.attempted, 1);
        assert_eq!(summary.persisted, 0);
    }
}
