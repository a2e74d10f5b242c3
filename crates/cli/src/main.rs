use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};

use turnscribe_core::audio::infrastructure::ffmpeg_normalizer::FfmpegNormalizer;
use turnscribe_core::audio::infrastructure::onnx_denoiser::OnnxDenoiser;
use turnscribe_core::audio::infrastructure::speaker_tagger::EmbeddingSpeakerTagger;
use turnscribe_core::audio::infrastructure::whisper_transcriber::WhisperTranscriber;
use turnscribe_core::pipeline::derived_text_writer::DerivedTextWriter;
use turnscribe_core::pipeline::summarize_use_case::SummarizeUseCase;
use turnscribe_core::pipeline::transcribe_batch_use_case::TranscribeBatchUseCase;
use turnscribe_core::scan::domain::file_classifier::SuffixClassifier;
use turnscribe_core::scan::infrastructure::audio_classifier::AudioFileClassifier;
use turnscribe_core::scan::infrastructure::concurrent_scanner;
use turnscribe_core::shared::constants::{
    DEFAULT_BATCH_SIZE, DENOISE_MODEL_NAME, DENOISE_MODEL_URL, SPEAKER_MODEL_NAME,
    SPEAKER_MODEL_URL, SPEAKER_SIMILARITY_THRESHOLD, SUMMARY_MODEL_NAME, SUMMARY_MODEL_URL,
    SUMMARY_SUFFIX, TRANSCRIPT_SUFFIX, WHISPER_MODEL_NAME, WHISPER_MODEL_URL,
};
use turnscribe_core::shared::model_resolver;
use turnscribe_core::summary::domain::template::SummaryTemplate;
use turnscribe_core::summary::infrastructure::llama_summarizer::LlamaSummarizer;

/// Batch transcription and summarization for recorded speech.
#[derive(Parser)]
#[command(name = "turnscribe")]
#[command(version)]
struct Cli {
    /// Log level filter (error, warn, info, debug, trace).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Transcribe audio files into speaker-turn text transcripts.
    Transcribe {
        /// Audio files or directories to scan.
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Number of files submitted to the recognizer per batch.
        #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
        batch_size: usize,

        /// Replace transcripts that already exist.
        #[arg(long)]
        overwrite: bool,
    },
    /// Summarize transcript files with a local language model.
    Summarize {
        /// Transcript files or directories to scan.
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Prompt template file; must contain a ${text} placeholder.
        #[arg(long, default_value = "template.txt")]
        template: PathBuf,

        /// Replace summaries that already exist.
        #[arg(long)]
        overwrite: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    env_logger::Builder::new()
        .parse_filters(&cli.log_level)
        .init();

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run(command: Command) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Command::Transcribe {
            paths,
            batch_size,
            overwrite,
        } => run_transcribe(&paths, batch_size, overwrite),
        Command::Summarize {
            paths,
            template,
            overwrite,
        } => run_summarize(&paths, &template, overwrite),
    }
}

fn run_transcribe(
    paths: &[PathBuf],
    batch_size: usize,
    overwrite: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let candidates = concurrent_scanner::scan(paths, &AudioFileClassifier);
    if candidates.is_empty() {
        log::warn!("no audio files found");
        return Ok(());
    }
    log::info!("found {} audio files", candidates.len());

    let denoise_model = resolve_model(DENOISE_MODEL_NAME, DENOISE_MODEL_URL)?;
    let speech_model = resolve_model(WHISPER_MODEL_NAME, WHISPER_MODEL_URL)?;
    let speaker_model = resolve_model(SPEAKER_MODEL_NAME, SPEAKER_MODEL_URL)?;

    let tagger = EmbeddingSpeakerTagger::new(&speaker_model, SPEAKER_SIMILARITY_THRESHOLD)?;
    let transcriber = WhisperTranscriber::new(&speech_model, tagger)?;
    let enhancer = OnnxDenoiser::new(&denoise_model)?;

    let mut use_case = TranscribeBatchUseCase::new(
        Box::new(FfmpegNormalizer),
        Box::new(enhancer),
        Box::new(transcriber),
        DerivedTextWriter::new(TRANSCRIPT_SUFFIX),
        overwrite,
    );
    let summary = use_case.run(&candidates, batch_size);
    log::info!(
        "transcribed {} of {} files",
        summary.persisted,
        summary.attempted
    );
    Ok(())
}

fn run_summarize(
    paths: &[PathBuf],
    template_path: &Path,
    overwrite: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    // Template problems are configuration errors; fail before scanning.
    let template = SummaryTemplate::load(template_path)?;

    let files = concurrent_scanner::scan(paths, &SuffixClassifier::new(TRANSCRIPT_SUFFIX));
    if files.is_empty() {
        log::warn!("no transcript files found");
        return Ok(());
    }
    log::info!("found {} transcript files", files.len());

    let model = resolve_model(SUMMARY_MODEL_NAME, SUMMARY_MODEL_URL)?;
    let summarizer = LlamaSummarizer::from_file(&model, template)?;

    let use_case = SummarizeUseCase::new(
        Box::new(summarizer),
        DerivedTextWriter::new(SUMMARY_SUFFIX),
        overwrite,
    );
    let summary = use_case.run(&files);
    log::info!(
        "summarized {} of {} files",
        summary.persisted,
        summary.attempted
    );
    Ok(())
}

fn resolve_model(name: &str, url: &str) -> Result<PathBuf, Box<dyn std::error::Error>> {
    log::info!("resolving model: {name}");
    let path = model_resolver::resolve(name, url, None, Some(Box::new(download_progress)))?;
    eprintln!();
    Ok(path)
}

fn download_progress(downloaded: u64, total: u64) {
    if total > 0 {
        let pct = (downloaded as f64 / total as f64 * 100.0) as u32;
        eprint!("\rDownloading model... {pct}%");
    } else {
        eprint!("\rDownloading model... {downloaded} bytes");
    }
}
