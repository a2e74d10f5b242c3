pub mod audio_clip;
pub mod audio_normalizer;
pub mod batch_transcriber;
pub mod speech_enhancer;
pub mod transcript;
pub mod turn_merger;
