use std::path::Path;

use crate::audio::domain::audio_clip::AudioClip;
use crate::audio::domain::audio_normalizer::AudioNormalizer;
use crate::audio::infrastructure::wav;
use crate::shared::constants::TARGET_SAMPLE_RATE;

/// Preprocessing stage backed by ffmpeg-next: decodes any supported
/// container/codec, downmixes to mono at the canonical sample rate, and
/// writes a 16-bit PCM WAV to the target path.
pub struct FfmpegNormalizer;

impl AudioNormalizer for FfmpegNormalizer {
    fn normalize(&self, input: &Path, output: &Path) -> Result<(), Box<dyn std::error::Error>> {
        let clip = decode_mono(input, TARGET_SAMPLE_RATE)?;
        if clip.is_empty() {
            return Err(format!("no decodable audio in {}", input.display()).into());
        }
        wav::write_clip(output, &clip)?;
        log::debug!("normalized {} -> {}", input.display(), output.display());
        Ok(())
    }
}

/// Decode the best audio stream of `path`, resampled to mono f32 at
/// `target_rate`. Errors if the file has no audio stream at all.
pub fn decode_mono(path: &Path, target_rate: u32) -> Result<AudioClip, Box<dyn std::error::Error>> {
    ffmpeg_next::init()?;

    let mut ictx = ffmpeg_next::format::input(path)?;

    let (stream_index, parameters) = {
        let stream = ictx
            .streams()
            .best(ffmpeg_next::media::Type::Audio)
            .ok_or_else(|| format!("no audio stream in {}", path.display()))?;
        (stream.index(), stream.parameters())
    };

    let codec_ctx = ffmpeg_next::codec::context::Context::from_parameters(parameters)?;
    let mut decoder = codec_ctx.decoder().audio()?;

    // Raw PCM streams often carry no layout; derive one from the channel count.
    let channel_layout = if decoder.channel_layout().bits() == 0 {
        ffmpeg_next::ChannelLayout::default(decoder.channels() as i32)
    } else {
        decoder.channel_layout()
    };

    let mut resampler = ffmpeg_next::software::resampling::Context::get(
        decoder.format(),
        channel_layout,
        decoder.rate(),
        ffmpeg_next::format::Sample::F32(ffmpeg_next::format::sample::Type::Planar),
        ffmpeg_next::ChannelLayout::MONO,
        target_rate,
    )?;

    let mut samples: Vec<f32> = Vec::new();
    let mut decoded = ffmpeg_next::util::frame::audio::Audio::empty();
    let mut resampled = ffmpeg_next::util::frame::audio::Audio::empty();

    for (stream, packet) in ictx.packets() {
        if stream.index() != stream_index {
            continue;
        }
        decoder.send_packet(&packet)?;
        while decoder.receive_frame(&mut decoded).is_ok() {
            resampler.run(&decoded, &mut resampled)?;
            extract_f32_samples(&resampled, &mut samples);
        }
    }

    // Flush the decoder, then the resampler's internal buffer.
    decoder.send_eof()?;
    while decoder.receive_frame(&mut decoded).is_ok() {
        resampler.run(&decoded, &mut resampled)?;
        extract_f32_samples(&resampled, &mut samples);
    }
    if let Ok(Some(delay)) = resampler.flush(&mut resampled) {
        if delay.output > 0 {
            extract_f32_samples(&resampled, &mut samples);
        }
    }

    Ok(AudioClip::new(samples, target_rate))
}

/// Extract f32 samples from a planar mono resampled frame.
fn extract_f32_samples(frame: &ffmpeg_next::util::frame::audio::Audio, out: &mut Vec<f32>) {
    let num_samples = frame.samples();
    if num_samples == 0 {
        return;
    }
    let data = frame.data(0);
    let floats = unsafe { std::slice::from_raw_parts(data.as_ptr() as *const f32, num_samples) };
    out.extend_from_slice(floats);
}
