/*!
    Media output and muxing for the av crate ecosystem.

    This crate handles the output side of a mux. It takes encoded packets
    and writes them into a container file, rescaling their timestamps into
    the output streams' time bases along the way.
*/

mod config;
mod sink;

pub use config::{SinkConfig, StreamSpec};
pub use sink::Sink;
