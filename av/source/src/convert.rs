/*!
    Conversion utilities between ffmpeg-next types and av-types.
*/

use av_types::{MediaDuration, Pts, Rational, StreamType};

/**
    Convert ffmpeg_next::Rational to our Rational.
*/
pub fn rational_from_ffmpeg(r: ffmpeg_next::Rational) -> Rational {
    Rational::new(r.numerator(), r.denominator())
}

/**
    Convert our StreamType to ffmpeg_next's media type.
*/
pub fn media_type_to_ffmpeg(stream_type: StreamType) -> ffmpeg_next::media::Type {
    match stream_type {
        StreamType::Video => ffmpeg_next::media::Type::Video,
        StreamType::Audio => ffmpeg_next::media::Type::Audio,
    }
}

/**
    Create a Pts from an optional i64 timestamp.
*/
pub fn pts_from_ffmpeg(pts: Option<i64>) -> Option<Pts> {
    pts.map(Pts)
}

/**
    Create a MediaDuration from an i64 duration.
*/
pub fn duration_from_ffmpeg(duration: i64) -> MediaDuration {
    MediaDuration(duration)
}
