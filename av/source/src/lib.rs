/*!
    Media source and demuxing for the av crate ecosystem.

    This crate handles the input side of a mux: it opens a container file,
    binds the best stream of a requested kind, and produces the encoded
    packets of that stream. Packets that arrive without a presentation
    timestamp get one synthesized from the stream's nominal frame timing.
*/

mod codec_config;
mod convert;
mod probe;
mod source;
mod synth;

pub use codec_config::CodecConfig;
pub use source::Source;
