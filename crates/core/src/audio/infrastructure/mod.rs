pub mod ffmpeg_normalizer;
pub mod onnx_denoiser;
pub mod speaker_tagger;
pub mod wav;
pub mod whisper_transcriber;
