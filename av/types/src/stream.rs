/*!
    Stream information types.
*/

use std::time::Duration;

use crate::Rational;

/**
    Information about a bound video stream.
*/
#[derive(Clone, Debug)]
pub struct VideoStreamInfo {
    /// Codec name, as reported by the container library (display only).
    pub codec: String,
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Nominal frame rate (may be unavailable).
    pub frame_rate: Option<Rational>,
    /// Time base for timestamps.
    pub time_base: Rational,
    /// Total duration (may be unavailable for some streams).
    pub duration: Option<Duration>,
    /// Bitrate in bits per second (if known).
    pub bitrate: Option<u64>,
}

impl VideoStreamInfo {
    /**
        Returns the frame rate as fps, if available.
    */
    pub fn fps(&self) -> Option<f64> {
        self.frame_rate.map(|r| r.to_f64())
    }
}

/**
    Information about a bound audio stream.
*/
#[derive(Clone, Debug)]
pub struct AudioStreamInfo {
    /// Codec name, as reported by the container library (display only).
    pub codec: String,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Number of channels.
    pub channels: u16,
    /// Samples per frame (unavailable for some codecs).
    pub frame_size: Option<u32>,
    /// Time base for timestamps.
    pub time_base: Rational,
    /// Total duration (may be unavailable for some streams).
    pub duration: Option<Duration>,
    /// Bitrate in bits per second (if known).
    pub bitrate: Option<u64>,
}

/**
    Information about the single stream a source is bound to.
*/
#[derive(Clone, Debug)]
pub enum StreamInfo {
    Video(VideoStreamInfo),
    Audio(AudioStreamInfo),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn video_stream_info_fps() {
        let info = VideoStreamInfo {
            codec: "h264".to_string(),
            width: 1920,
            height: 1080,
            frame_rate: Some(Rational::new(30, 1)),
            time_base: Rational::new(1, 90000),
            duration: Some(Duration::from_secs(120)),
            bitrate: None,
        };

        assert_eq!(info.fps(), Some(30.0));
    }

    #[test]
    fn video_stream_info_fps_unavailable() {
        let info = VideoStreamInfo {
            codec: "h264".to_string(),
            width: 1280,
            height: 720,
            frame_rate: None,
            time_base: Rational::new(1, 1000),
            duration: None,
            bitrate: None,
        };

        assert_eq!(info.fps(), None);
    }
}
