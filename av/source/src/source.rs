/*!
    Media source implementation.
*/

use std::ffi::CString;
use std::path::Path;

use ffmpeg_next::{ffi, format::context::Input as InputContext};

use av_types::{Error, Packet, Rational, Result, StreamInfo, StreamType};

use crate::codec_config::CodecConfig;
use crate::convert::{
    duration_from_ffmpeg, media_type_to_ffmpeg, pts_from_ffmpeg, rational_from_ffmpeg,
};
use crate::probe;
use crate::synth::TimestampSynthesizer;

/**
    A media source bound to a single stream of a container.

    Created by [`Source::open`] with the kind of stream to bind. Produces
    that stream's encoded packets via [`Source::next_packet`]; packets from
    other streams are skipped.
*/
pub struct Source {
    /// The FFmpeg input context.
    input: InputContext,
    /// The kind of stream this source is bound to.
    stream_type: StreamType,
    /// Index of the bound stream within the container.
    stream_index: usize,
    /// Time base of the bound stream.
    time_base: Rational,
    /// Synthesizer for packets that arrive without a timestamp.
    synth: TimestampSynthesizer,
    /// Codec config of the bound stream.
    codec_config: CodecConfig,
    /// Cached stream info.
    info: StreamInfo,
}

impl Source {
    /**
        Open a media file and bind the best stream of the given kind.

        Fails with [`Error::NoMatchingStream`] when the container holds no
        stream of that kind.

        # Example

        ```ignore
        let mut source = Source::open("movie.mp4", StreamType::Video)?;
        while let Some(packet) = source.next_packet()? {
            // ...
        }
        ```
    */
    pub fn open<P: AsRef<Path>>(path: P, stream_type: StreamType) -> Result<Self> {
        ffmpeg_next::init().map_err(|e| Error::SourceOpen(e.to_string()))?;

        let path = path.as_ref();
        let input = open_input(path)?;

        // Bind the best stream of the requested kind
        let (stream_index, time_base, codec_config) = {
            let stream = match input.streams().best(media_type_to_ffmpeg(stream_type)) {
                Some(stream) => stream,
                None => return Err(Error::NoMatchingStream(stream_type)),
            };

            (
                stream.index(),
                rational_from_ffmpeg(stream.time_base()),
                CodecConfig::new(stream.parameters()),
            )
        };

        let (info, synth) = match stream_type {
            StreamType::Video => {
                let video = probe::extract_video_stream_info(&input).ok_or_else(|| {
                    Error::Probe(format!("{}: video stream info unavailable", path.display()))
                })?;
                let synth = TimestampSynthesizer::video(video.frame_rate, video.time_base);
                (StreamInfo::Video(video), synth)
            }
            StreamType::Audio => {
                let audio = probe::extract_audio_stream_info(&input).ok_or_else(|| {
                    Error::Probe(format!("{}: audio stream info unavailable", path.display()))
                })?;
                let synth = TimestampSynthesizer::audio(
                    audio.sample_rate,
                    audio.frame_size.unwrap_or(0),
                    audio.time_base,
                );
                (StreamInfo::Audio(audio), synth)
            }
        };

        Ok(Self {
            input,
            stream_type,
            stream_index,
            time_base,
            synth,
            codec_config,
            info,
        })
    }

    /**
        The kind of stream this source is bound to.
    */
    pub fn stream_type(&self) -> StreamType {
        self.stream_type
    }

    /**
        Index of the bound stream within its container.
    */
    pub fn stream_index(&self) -> usize {
        self.stream_index
    }

    /**
        Time base of the bound stream.
    */
    pub fn time_base(&self) -> Rational {
        self.time_base
    }

    /**
        Get the stream info for the bound stream.
    */
    pub fn stream_info(&self) -> &StreamInfo {
        &self.info
    }

    /**
        Get the codec configuration of the bound stream.

        Pass this to `av-sink` to create a matching output stream.
    */
    pub fn codec_config(&self) -> &CodecConfig {
        &self.codec_config
    }

    /**
        Read the next packet of the bound stream.

        Returns `Ok(Some(packet))` for each packet and `Ok(None)` at end of
        stream. Packets from other streams and empty packets are skipped.
        A packet that arrives without a timestamp gets one synthesized from
        the stream's nominal frame timing.
    */
    pub fn next_packet(&mut self) -> Result<Option<Packet>> {
        loop {
            // Get next packet from demuxer
            let (stream, ffmpeg_packet) = match self.input.packets().next() {
                Some(result) => result,
                None => return Ok(None), // End of stream
            };

            // Skip streams other than the bound one
            if stream.index() != self.stream_index {
                continue;
            }

            // Skip packets that carry no payload
            let data = ffmpeg_packet.data().map(|d| d.to_vec()).unwrap_or_default();
            if data.is_empty() {
                continue;
            }

            let is_keyframe = ffmpeg_packet.is_key();

            let mut packet = Packet::new(
                data,
                pts_from_ffmpeg(ffmpeg_packet.pts()),
                pts_from_ffmpeg(ffmpeg_packet.dts()),
                duration_from_ffmpeg(ffmpeg_packet.duration()),
                self.time_base,
                is_keyframe,
                self.stream_type,
            );

            if packet.pts.is_none() {
                let (pts, duration) = self.synth.next_frame();
                packet.pts = Some(pts);
                packet.dts = Some(pts);
                packet.duration = duration;
            }

            return Ok(Some(packet));
        }
    }
}

impl std::fmt::Debug for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Source")
            .field("stream_type", &self.stream_type)
            .field("stream_index", &self.stream_index)
            .field("time_base", &self.time_base)
            .finish_non_exhaustive()
    }
}

/**
    Open and probe an input container.

    The open and the stream-info scan are separate calls, so their failures
    stay distinguishable.
*/
fn open_input(path: &Path) -> Result<InputContext> {
    let path_c = CString::new(path.as_os_str().as_encoded_bytes())
        .map_err(|_| Error::SourceOpen(format!("{}: path contains NUL", path.display())))?;

    let mut ctx: *mut ffi::AVFormatContext = std::ptr::null_mut();

    // SAFETY: ctx starts null and is filled by avformat_open_input; on
    // success ownership moves into the wrapped InputContext, which closes
    // the input when dropped.
    unsafe {
        let ret = ffi::avformat_open_input(
            &mut ctx,
            path_c.as_ptr(),
            std::ptr::null(),
            std::ptr::null_mut(),
        );
        if ret < 0 {
            return Err(Error::SourceOpen(format!(
                "{}: {}",
                path.display(),
                ffmpeg_next::Error::from(ret)
            )));
        }

        let mut input = InputContext::wrap(ctx);

        let ret = ffi::avformat_find_stream_info(input.as_mut_ptr(), std::ptr::null_mut());
        if ret < 0 {
            return Err(Error::Probe(format!(
                "{}: {}",
                path.display(),
                ffmpeg_next::Error::from(ret)
            )));
        }

        Ok(input)
    }
}
