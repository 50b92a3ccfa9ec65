/*!
    Probing functionality for extracting stream metadata.
*/

use std::time::Duration;

use ffmpeg_next::{ffi, format::context::Input as InputContext, media::Type};

use av_types::{AudioStreamInfo, VideoStreamInfo};

use crate::convert::rational_from_ffmpeg;

/**
    Extract video stream info from input context.
*/
pub(crate) fn extract_video_stream_info(input_ctx: &InputContext) -> Option<VideoStreamInfo> {
    let stream = input_ctx.streams().best(Type::Video)?;

    let time_base = rational_from_ffmpeg(stream.time_base());

    // Get duration from stream or container
    let duration = if stream.duration() > 0 {
        let seconds = stream.duration() as f64 * time_base.num as f64 / time_base.den as f64;
        Some(Duration::from_secs_f64(seconds))
    } else if input_ctx.duration() > 0 {
        Some(Duration::from_micros(input_ctx.duration() as u64))
    } else {
        None
    };

    // Get frame rate, preferring the container's nominal rate
    let frame_rate = if stream.rate().numerator() != 0 {
        Some(rational_from_ffmpeg(stream.rate()))
    } else if stream.avg_frame_rate().numerator() != 0 {
        Some(rational_from_ffmpeg(stream.avg_frame_rate()))
    } else {
        None
    };

    // Extract codec name, dimensions, bitrate from codec parameters
    // SAFETY: We're reading from a valid AVCodecParameters pointer that FFmpeg owns
    let (codec, width, height, bitrate) = unsafe {
        let ptr = stream.parameters().as_ptr();

        let codec = codec_name((*ptr).codec_id);
        let width = (*ptr).width.max(0) as u32;
        let height = (*ptr).height.max(0) as u32;

        let bitrate = if (*ptr).bit_rate > 0 {
            Some((*ptr).bit_rate as u64)
        } else {
            None
        };

        (codec, width, height, bitrate)
    };

    Some(VideoStreamInfo {
        codec,
        width,
        height,
        frame_rate,
        time_base,
        duration,
        bitrate,
    })
}

/**
    Extract audio stream info from input context.
*/
pub(crate) fn extract_audio_stream_info(input_ctx: &InputContext) -> Option<AudioStreamInfo> {
    let stream = input_ctx.streams().best(Type::Audio)?;

    let time_base = rational_from_ffmpeg(stream.time_base());

    // Get duration from stream or container
    let duration = if stream.duration() > 0 {
        let seconds = stream.duration() as f64 * time_base.num as f64 / time_base.den as f64;
        Some(Duration::from_secs_f64(seconds))
    } else if input_ctx.duration() > 0 {
        Some(Duration::from_micros(input_ctx.duration() as u64))
    } else {
        None
    };

    // Extract codec name, sample rate, channel count, frame size from codec parameters
    // SAFETY: We're reading from a valid AVCodecParameters pointer that FFmpeg owns
    let (codec, sample_rate, channels, frame_size, bitrate) = unsafe {
        let ptr = stream.parameters().as_ptr();

        let codec = codec_name((*ptr).codec_id);
        let sample_rate = (*ptr).sample_rate.max(0) as u32;
        let channels = (*ptr).ch_layout.nb_channels.max(0) as u16;

        // Samples per frame, when the codec declares it
        let frame_size = if (*ptr).frame_size > 0 {
            Some((*ptr).frame_size as u32)
        } else {
            None
        };

        let bitrate = if (*ptr).bit_rate > 0 {
            Some((*ptr).bit_rate as u64)
        } else {
            None
        };

        (codec, sample_rate, channels, frame_size, bitrate)
    };

    Some(AudioStreamInfo {
        codec,
        sample_rate,
        channels,
        frame_size,
        time_base,
        duration,
        bitrate,
    })
}

/**
    Descriptive name for a codec id, for display.
*/
fn codec_name(id: ffi::AVCodecID) -> String {
    // SAFETY: avcodec_get_name returns a valid static string for any id
    unsafe {
        let name = ffi::avcodec_get_name(id);
        std::ffi::CStr::from_ptr(name).to_string_lossy().into_owned()
    }
}
