use std::path::Path;

use crate::scan::domain::file_classifier::FileClassifier;
use crate::shared::constants::AUDIO_EXTENSIONS;

/// Accepts files that decode as audio containers, falling back to the
/// extension whitelist when probing fails (corrupt header, exotic muxer).
pub struct AudioFileClassifier;

impl FileClassifier for AudioFileClassifier {
    fn is_match(&self, path: &Path) -> bool {
        probe_has_audio(path) || has_audio_extension(path)
    }
}

fn probe_has_audio(path: &Path) -> bool {
    if ffmpeg_next::init().is_err() {
        return false;
    }
    match ffmpeg_next::format::input(path) {
        Ok(ictx) => ictx
            .streams()
            .best(ffmpeg_next::media::Type::Audio)
            .is_some(),
        Err(_) => false,
    }
}

fn has_audio_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| AUDIO_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}
