/*!
    Opaque codec configuration for passing to sinks.
*/

use ffmpeg_next::codec;

/**
    Opaque codec configuration extracted from a source stream.

    This holds the codec parameters a sink needs to describe the stream in
    the output container. It's intentionally opaque to hide ffmpeg-next
    types from the public API.

    Pass this to `av-sink` to create an output stream carrying the same
    codec configuration.
*/
pub struct CodecConfig {
    /// The raw codec parameters.
    pub(crate) parameters: codec::Parameters,
}

impl CodecConfig {
    /**
        Create a new codec config from ffmpeg parameters.
    */
    pub(crate) fn new(parameters: codec::Parameters) -> Self {
        Self { parameters }
    }

    /**
        Consume the config, yielding the internal parameters.

        This is how `av-sink` gets at the parameters when it copies them
        onto an output stream.
    */
    pub fn into_parameters(self) -> codec::Parameters {
        self.parameters
    }
}

impl Clone for CodecConfig {
    fn clone(&self) -> Self {
        Self {
            parameters: self.parameters.clone(),
        }
    }
}

impl std::fmt::Debug for CodecConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CodecConfig")
            .field("codec_id", &self.parameters.id())
            .finish_non_exhaustive()
    }
}
