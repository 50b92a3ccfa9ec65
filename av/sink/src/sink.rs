/*!
    Media sink implementation.
*/

use std::ffi::CString;
use std::path::Path;

use ffmpeg_next::{
    Rational as FFmpegRational, codec::Parameters, ffi,
    format::context::Output as OutputContext, packet::Mut as PacketMut,
};

use av_types::{Error, Packet, Rational, Result, StreamType, rescale, rescale_timestamp};

use crate::config::{SinkConfig, StreamSpec};

/**
    Media sink for writing to container files.

    Takes encoded packets and writes them into a container format (MP4,
    MKV, etc.). Streams are laid out at creation time from the
    [`SinkConfig`]; the header must be written before the first packet.
*/
pub struct Sink {
    output: OutputContext,
    video_stream_index: Option<usize>,
    audio_stream_index: Option<usize>,
    video_time_base: Option<Rational>,
    audio_time_base: Option<Rational>,
    header_written: bool,
}

impl Sink {
    /**
        Create a new sink that writes to a file.

        This creates the output context, lays out one stream per configured
        [`StreamSpec`], and opens the file for writing. Call
        [`Sink::write_header`] before the first packet.
    */
    pub fn file<P: AsRef<Path>>(path: P, config: SinkConfig) -> Result<Self> {
        ffmpeg_next::init().map_err(|e| Error::OutputCreate(e.to_string()))?;

        let path = path.as_ref();
        let mut output = create_output(path)?;

        let mut video_stream_index = None;
        let mut audio_stream_index = None;
        let mut video_time_base = None;
        let mut audio_time_base = None;

        // Add video stream if configured
        if let Some(video) = config.video {
            let (index, time_base) = add_stream(&mut output, video)?;
            video_stream_index = Some(index);
            video_time_base = Some(time_base);
        }

        // Add audio stream if configured
        if let Some(audio) = config.audio {
            let (index, time_base) = add_stream(&mut output, audio)?;
            audio_stream_index = Some(index);
            audio_time_base = Some(time_base);
        }

        open_sink_file(&mut output, path)?;

        Ok(Self {
            output,
            video_stream_index,
            audio_stream_index,
            video_time_base,
            audio_time_base,
            header_written: false,
        })
    }

    /**
        Write the container header.

        The muxer may adjust stream time bases while writing the header, so
        the time bases used for packet rescaling are re-read afterwards.
    */
    pub fn write_header(&mut self) -> Result<()> {
        self.output
            .write_header()
            .map_err(|e| Error::HeaderWrite(e.to_string()))?;
        self.header_written = true;

        // Pick up the time bases the muxer settled on
        if let Some(index) = self.video_stream_index {
            if let Some(stream) = self.output.stream(index) {
                let tb = stream.time_base();
                self.video_time_base = Some(Rational::new(tb.numerator(), tb.denominator()));
            }
        }
        if let Some(index) = self.audio_stream_index {
            if let Some(stream) = self.output.stream(index) {
                let tb = stream.time_base();
                self.audio_time_base = Some(Rational::new(tb.numerator(), tb.denominator()));
            }
        }

        Ok(())
    }

    /**
        Index of the video stream in the output, if one was configured.
    */
    pub fn video_stream_index(&self) -> Option<usize> {
        self.video_stream_index
    }

    /**
        Index of the audio stream in the output, if one was configured.
    */
    pub fn audio_stream_index(&self) -> Option<usize> {
        self.audio_stream_index
    }

    /**
        Short name of the container format the output path selected.
    */
    pub fn format_name(&self) -> String {
        self.output.format().name().to_string()
    }

    /**
        Write a packet to the sink.

        Packets are routed to the matching stream by their type, and their
        timestamps are rescaled from the packet's time base into the output
        stream's.
    */
    pub fn write(&mut self, packet: &Packet) -> Result<()> {
        if !self.header_written {
            return Err(Error::Write("header not written".into()));
        }

        // Determine stream index and time base
        let (stream_index, stream_time_base) = match packet.stream_type {
            StreamType::Video => {
                let index = self
                    .video_stream_index
                    .ok_or_else(|| Error::Write("no video stream configured".into()))?;
                (index, self.video_time_base.unwrap_or(packet.time_base))
            }
            StreamType::Audio => {
                let index = self
                    .audio_stream_index
                    .ok_or_else(|| Error::Write("no audio stream configured".into()))?;
                (index, self.audio_time_base.unwrap_or(packet.time_base))
            }
        };

        // Create FFmpeg packet
        let mut ffmpeg_pkt = if packet.data.is_empty() {
            ffmpeg_next::Packet::empty()
        } else {
            ffmpeg_next::Packet::copy(&packet.data)
        };

        // Set stream index
        ffmpeg_pkt.set_stream(stream_index);

        // Set timing, rescaled into the output stream's time base. Missing
        // timestamps stay missing rather than turning into nonsense values.
        unsafe {
            let pkt_ptr = ffmpeg_pkt.as_mut_ptr();
            (*pkt_ptr).pts = rescale_timestamp(
                packet.pts.map_or(ffi::AV_NOPTS_VALUE, |pts| pts.0),
                packet.time_base,
                stream_time_base,
            );
            (*pkt_ptr).dts = rescale_timestamp(
                packet.dts.map_or(ffi::AV_NOPTS_VALUE, |dts| dts.0),
                packet.time_base,
                stream_time_base,
            );
            (*pkt_ptr).duration = rescale(packet.duration.0, packet.time_base, stream_time_base);
            // Byte position from the source file is meaningless in the output
            (*pkt_ptr).pos = -1;
        }

        // Set keyframe flag
        if packet.is_keyframe {
            ffmpeg_pkt.set_flags(ffmpeg_next::packet::Flags::KEY);
        }

        // Write packet
        ffmpeg_pkt
            .write_interleaved(&mut self.output)
            .map_err(|e| Error::Write(e.to_string()))?;

        Ok(())
    }

    /**
        Finish writing and close the sink.

        This writes any trailing metadata (duration, seeking index) and
        finalizes the container. The file may be corrupt if this is not called.
    */
    pub fn finish(mut self) -> Result<()> {
        self.output
            .write_trailer()
            .map_err(|e| Error::Write(e.to_string()))?;

        Ok(())
    }
}

impl std::fmt::Debug for Sink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sink")
            .field("video_stream", &self.video_stream_index)
            .field("audio_stream", &self.audio_stream_index)
            .field("header_written", &self.header_written)
            .finish_non_exhaustive()
    }
}

/**
    Create an output context for the given path.

    The container format is inferred from the path's extension.
*/
fn create_output(path: &Path) -> Result<OutputContext> {
    let path_c = CString::new(path.as_os_str().as_encoded_bytes())
        .map_err(|_| Error::OutputCreate(format!("{}: path contains NUL", path.display())))?;

    let mut ctx: *mut ffi::AVFormatContext = std::ptr::null_mut();

    // SAFETY: ctx starts null and is filled by avformat_alloc_output_context2;
    // on success ownership moves into the wrapped OutputContext, which frees
    // it when dropped.
    unsafe {
        let ret = ffi::avformat_alloc_output_context2(
            &mut ctx,
            std::ptr::null(),
            std::ptr::null(),
            path_c.as_ptr(),
        );
        if ctx.is_null() {
            return Err(Error::OutputCreate(format!(
                "{}: {}",
                path.display(),
                ffmpeg_next::Error::from(ret)
            )));
        }

        Ok(OutputContext::wrap(ctx))
    }
}

/**
    Add an output stream carrying the given codec configuration.

    The stream is created without an encoder, as for stream copy; the codec
    comes entirely from the copied parameters.
*/
fn add_stream(output: &mut OutputContext, spec: StreamSpec) -> Result<(usize, Rational)> {
    let global_header = output
        .format()
        .flags()
        .contains(ffmpeg_next::format::Flags::GLOBAL_HEADER);

    let mut stream = output
        .add_stream(ffmpeg_next::encoder::find(ffmpeg_next::codec::Id::None))
        .map_err(|e| Error::StreamCreate(e.to_string()))?;

    copy_parameters(&stream.parameters(), spec.codec.into_parameters(), global_header)?;

    // Request the source's time base; the muxer has the final say
    let tb = FFmpegRational::new(spec.time_base.num, spec.time_base.den);
    stream.set_time_base(tb);

    Ok((stream.index(), spec.time_base))
}

/**
    Copy codec parameters onto an output stream.

    The copy goes through a scratch codec context, clearing the container
    specific codec tag and picking up the global-header flag when the output
    format keeps extradata in the file header.
*/
fn copy_parameters(dst: &Parameters, src: Parameters, global_header: bool) -> Result<()> {
    // SAFETY: both parameter pointers are valid for the duration of the
    // call; the scratch context is freed on every path.
    unsafe {
        let mut codec_ctx = ffi::avcodec_alloc_context3(std::ptr::null());
        if codec_ctx.is_null() {
            return Err(Error::ParameterCopy(
                "could not allocate codec context".into(),
            ));
        }

        let ret = ffi::avcodec_parameters_to_context(codec_ctx, src.as_ptr());
        if ret < 0 {
            ffi::avcodec_free_context(&mut codec_ctx);
            return Err(Error::ParameterCopy(ffmpeg_next::Error::from(ret).to_string()));
        }

        (*codec_ctx).codec_tag = 0;
        if global_header {
            (*codec_ctx).flags |= ffi::AV_CODEC_FLAG_GLOBAL_HEADER as i32;
        }

        let ret = ffi::avcodec_parameters_from_context(
            dst.as_ptr() as *mut ffi::AVCodecParameters,
            codec_ctx,
        );
        ffi::avcodec_free_context(&mut codec_ctx);
        if ret < 0 {
            return Err(Error::ParameterCopy(ffmpeg_next::Error::from(ret).to_string()));
        }
    }

    Ok(())
}

/**
    Open the sink file for writing.

    Formats that carry their own I/O (AVFMT_NOFILE) skip this.
*/
fn open_sink_file(output: &mut OutputContext, path: &Path) -> Result<()> {
    let needs_file = !output
        .format()
        .flags()
        .contains(ffmpeg_next::format::Flags::NO_FILE);
    if !needs_file {
        return Ok(());
    }

    let path_c = CString::new(path.as_os_str().as_encoded_bytes())
        .map_err(|_| Error::SinkOpen(format!("{}: path contains NUL", path.display())))?;

    // SAFETY: pb belongs to the output context and starts unset; once
    // opened, the context owns the handle and closes it when dropped.
    unsafe {
        let ret = ffi::avio_open(
            &mut (*output.as_mut_ptr()).pb,
            path_c.as_ptr(),
            ffi::AVIO_FLAG_WRITE as i32,
        );
        if ret < 0 {
            return Err(Error::SinkOpen(format!(
                "{}: {}",
                path.display(),
                ffmpeg_next::Error::from(ret)
            )));
        }
    }

    Ok(())
}
