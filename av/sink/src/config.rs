/*!
    Sink configuration.
*/

use av_source::CodecConfig;
use av_types::Rational;

/**
    Everything the sink needs to create one output stream.
*/
#[derive(Clone, Debug)]
pub struct StreamSpec {
    /// Codec configuration copied from the source stream.
    pub codec: CodecConfig,
    /// Time base requested for the stream. The muxer may pick another one
    /// while writing the header.
    pub time_base: Rational,
}

/**
    Configuration for creating a sink.

    The container format is inferred from the output path's extension.
*/
#[derive(Clone, Debug, Default)]
pub struct SinkConfig {
    /// Video stream to create, if any.
    pub video: Option<StreamSpec>,
    /// Audio stream to create, if any.
    pub audio: Option<StreamSpec>,
}

impl SinkConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /**
        Add a video stream carrying the given codec configuration.
    */
    pub fn with_video(mut self, codec: CodecConfig, time_base: Rational) -> Self {
        self.video = Some(StreamSpec { codec, time_base });
        self
    }

    /**
        Add an audio stream carrying the given codec configuration.
    */
    pub fn with_audio(mut self, codec: CodecConfig, time_base: Rational) -> Self {
        self.audio = Some(StreamSpec { codec, time_base });
        self
    }
}
