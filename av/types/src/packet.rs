/*!
    Encoded packet types.
*/

use crate::{MediaDuration, Pts, Rational};

/**
    The media kind of a stream.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StreamType {
    /// Video stream.
    Video,
    /// Audio stream.
    Audio,
}

impl std::fmt::Display for StreamType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StreamType::Video => write!(f, "video"),
            StreamType::Audio => write!(f, "audio"),
        }
    }
}

/**
    One encoded packet read from a source stream.

    The payload is opaque; no parsing or transcoding happens downstream.
    Timestamps are in ticks of `time_base`.
*/
#[derive(Clone)]
pub struct Packet {
    /// Encoded payload.
    pub data: Vec<u8>,
    /// Presentation timestamp, if the container provided one.
    pub pts: Option<Pts>,
    /// Decode timestamp, if the container provided one.
    pub dts: Option<Pts>,
    /// Duration of the packet's content.
    pub duration: MediaDuration,
    /// Time base the timestamps are expressed in.
    pub time_base: Rational,
    /// True if this packet starts a keyframe.
    pub is_keyframe: bool,
    /// Which kind of stream the packet belongs to.
    pub stream_type: StreamType,
}

impl Packet {
    /**
        Create a new packet.
    */
    pub fn new(
        data: Vec<u8>,
        pts: Option<Pts>,
        dts: Option<Pts>,
        duration: MediaDuration,
        time_base: Rational,
        is_keyframe: bool,
        stream_type: StreamType,
    ) -> Self {
        Self {
            data,
            pts,
            dts,
            duration,
            time_base,
            is_keyframe,
            stream_type,
        }
    }
}

impl std::fmt::Debug for Packet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Packet")
            .field("size", &self.data.len())
            .field("pts", &self.pts)
            .field("dts", &self.dts)
            .field("duration", &self.duration)
            .field("time_base", &self.time_base)
            .field("is_keyframe", &self.is_keyframe)
            .field("stream_type", &self.stream_type)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stream_type_display() {
        assert_eq!(StreamType::Video.to_string(), "video");
        assert_eq!(StreamType::Audio.to_string(), "audio");
    }

    #[test]
    fn packet_debug_reports_size_not_bytes() {
        let packet = Packet::new(
            vec![0u8; 1024],
            Some(Pts(3600)),
            Some(Pts(3600)),
            MediaDuration(1500),
            Rational::new(1, 90000),
            true,
            StreamType::Video,
        );

        let debug = format!("{:?}", packet);
        assert!(debug.contains("size: 1024"));
        assert!(!debug.contains("[0, 0"));
    }
}
