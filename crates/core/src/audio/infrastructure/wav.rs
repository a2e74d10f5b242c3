use std::path::Path;

use crate::audio::domain::audio_clip::AudioClip;

/// Write a clip as 16-bit PCM WAV, the canonical scratch format exchanged
/// between pipeline stages.
pub fn write_clip(path: &Path, clip: &AudioClip) -> Result<(), Box<dyn std::error::Error>> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: clip.sample_rate(),
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec)?;
    for &sample in clip.samples() {
        let clamped = sample.clamp(-1.0, 1.0);
        writer.write_sample((clamped * i16::MAX as f32) as i16)?;
    }
    writer.finalize()?;
    Ok(())
}

/// Read a canonical WAV back into a clip. Scratch WAVs are always written
/// mono by this crate; anything else is rejected.
pub fn read_clip(path: &Path) -> Result<AudioClip, Box<dyn std::error::Error>> {
    let mut reader = hound::WavReader::open(path)?;
    let spec = reader.spec();
    if spec.channels != 1 {
        return Err(format!(
            "expected mono wav, got {} channels: {}",
            spec.channels,
            path.display()
        )
        .into());
    }
    let samples = match spec.sample_format {
        hound::SampleFormat::Int => reader
            .samples::<i16>()
            .map(|s| s.map(|v| v as f32 / i16::MAX as f32))
            .collect::<Result<Vec<_>, _>>()?,
        hound::SampleFormat::Float => reader.samples::<f32>().collect::<Result<Vec<_>, _>>()?,
    };
    Ok(AudioClip::new(samples, spec.sample_rate))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use tempfile::TempDir;

    #[test]
    fn test_clip_survives_disk_round_trip() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("scratch.wav");
        let samples: Vec<f32> = (0..1_600)
            .map(|i| (i as f32 / 1_600.0 * std::f32::consts::TAU).sin() * 0.5)
            .collect();
        let clip = AudioClip::new(samples, 16_000);

        write_clip(&path, &clip).unwrap();
        let restored = read_clip(&path).unwrap();

        assert_eq!(restored.sample_rate(), 16_000);
        assert_eq!(restored.len(), clip.len());
        assert_relative_eq!(restored.samples()[400], clip.samples()[400], epsilon = 1e-3);
    }

    #[test]
    fn test_read_rejects_stereo() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("stereo.wav");
        let spec = hound::WavSpec {
            channels: 2,
            sample_rate: 16_000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(&path, spec).unwrap();
        for _ in 0..200 {
            writer.write_sample(0i16).unwrap();
        }
        writer.finalize().unwrap();

        assert!(read_clip(&path).is_err());
    }

    #[test]
    fn test_read_missing_file_errors() {
        assert!(read_clip(Path::new("/nonexistent/scratch.wav")).is_err());
    }
}
