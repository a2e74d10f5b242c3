/// Extensions accepted as audio input when container probing fails.
pub const AUDIO_EXTENSIONS: &[&str] = &["wav", "mp3", "flac", "aac", "ogg", "m4a", "opus"];

/// Canonical sample rate every recording is resampled to before recognition.
pub const TARGET_SAMPLE_RATE: u32 = 16_000;

pub const TRANSCRIPT_SUFFIX: &str = "txt";
pub const SUMMARY_SUFFIX: &str = "md";

pub const DEFAULT_BATCH_SIZE: usize = 10;

pub const DENOISE_MODEL_NAME: &str = "speech-denoiser-16k.onnx";
pub const DENOISE_MODEL_URL: &str =
    "https://github.com/turnscribe/turnscribe/releases/download/v0.1.0/speech-denoiser-16k.onnx";

pub const SPEAKER_MODEL_NAME: &str = "speaker-embedding-16k.onnx";
pub const SPEAKER_MODEL_URL: &str =
    "https://github.com/turnscribe/turnscribe/releases/download/v0.1.0/speaker-embedding-16k.onnx";

pub const WHISPER_MODEL_NAME: &str = "ggml-base.bin";
pub const WHISPER_MODEL_URL: &str =
    "https://huggingface.co/ggerganov/whisper.cpp/resolve/main/ggml-base.bin";

pub const SUMMARY_MODEL_NAME: &str = "qwen2.5-1.5b-instruct-q4_k_m.gguf";
pub const SUMMARY_MODEL_URL: &str =
    "https://huggingface.co/Qwen/Qwen2.5-1.5B-Instruct-GGUF/resolve/main/qwen2.5-1.5b-instruct-q4_k_m.gguf";

/// Cosine similarity above which two speech spans are attributed to the
/// same speaker.
pub const SPEAKER_SIMILARITY_THRESHOLD: f64 = 0.55;
