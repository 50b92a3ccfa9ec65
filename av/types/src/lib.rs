/*!
    Shared types for the av crate ecosystem.

    This crate defines the vocabulary of the ecosystem: the types that cross crate
    boundaries. It has no dependency on FFmpeg, making it lightweight and enabling
    consumers to depend on it without pulling in FFmpeg bindings.
*/

mod error;
mod packet;
mod stream;
mod time;

pub use error::{Error, Result};
pub use packet::{Packet, StreamType};
pub use stream::{AudioStreamInfo, StreamInfo, VideoStreamInfo};
pub use time::{MediaDuration, Pts, Rational, compare_ts, rescale, rescale_timestamp};
