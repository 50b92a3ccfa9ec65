/*!
    Timestamp synthesis for packets that arrive without one.
*/

use av_types::{MediaDuration, Pts, Rational, rescale};

/**
    Synthesizes presentation timestamps for packets whose container did not
    record any.

    Timestamps are paced by the stream's nominal frame duration: one frame
    interval for video, one codec frame of samples for audio. The interval
    is computed once, in the stream's time base, so consecutive synthesized
    timestamps are spaced exactly evenly.

    Only packets missing a PTS consume a slot; packets that carry their own
    timestamps pass through untouched and do not advance the counter.
*/
#[derive(Debug)]
pub(crate) struct TimestampSynthesizer {
    /// Frame duration in the stream's time base.
    per_duration: i64,
    /// Number of frames synthesized so far.
    frame_index: i64,
}

impl TimestampSynthesizer {
    /**
        Synthesizer paced by a video frame rate.

        Without a usable frame rate the frame duration is zero and every
        synthesized timestamp is zero.
    */
    pub(crate) fn video(frame_rate: Option<Rational>, time_base: Rational) -> Self {
        let per_duration = match frame_rate {
            Some(rate) if rate.num > 0 && rate.den > 0 => {
                let micros = rescale(1, Rational::new(rate.den, rate.num), Rational::MICROSECONDS);
                rescale(micros, Rational::MICROSECONDS, time_base)
            }
            _ => 0,
        };

        Self {
            per_duration,
            frame_index: 0,
        }
    }

    /**
        Synthesizer paced by an audio codec's frame size and sample rate.
    */
    pub(crate) fn audio(sample_rate: u32, frame_size: u32, time_base: Rational) -> Self {
        let per_duration = if sample_rate > 0 && frame_size > 0 {
            let micros = rescale(
                frame_size as i64,
                Rational::new(1, sample_rate as i32),
                Rational::MICROSECONDS,
            );
            rescale(micros, Rational::MICROSECONDS, time_base)
        } else {
            0
        };

        Self {
            per_duration,
            frame_index: 0,
        }
    }

    /**
        Timestamp and duration for the next synthesized frame.
    */
    pub(crate) fn next_frame(&mut self) -> (Pts, MediaDuration) {
        let pts = Pts(self.frame_index * self.per_duration);
        self.frame_index += 1;
        (pts, MediaDuration(self.per_duration))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn video_timestamps_start_at_zero() {
        let mut synth = TimestampSynthesizer::video(
            Some(Rational::new(30, 1)),
            Rational::new(1, 90000),
        );

        let (pts, _) = synth.next_frame();
        assert_eq!(pts, Pts(0));
    }

    #[test]
    fn video_spacing_is_exactly_one_frame_interval() {
        // 30 fps in a 1/90000 time base is 3000 ticks per frame
        let mut synth = TimestampSynthesizer::video(
            Some(Rational::new(30, 1)),
            Rational::new(1, 90000),
        );

        let mut previous = None;
        for _ in 0..100 {
            let (pts, duration) = synth.next_frame();
            assert_eq!(duration, MediaDuration(3000));
            if let Some(prev) = previous {
                assert_eq!(pts.0 - prev, 3000);
            }
            previous = Some(pts.0);
        }
    }

    #[test]
    fn video_spacing_for_fractional_rate() {
        // 30000/1001 fps in a 1/90000 time base is 3003 ticks per frame
        let mut synth = TimestampSynthesizer::video(
            Some(Rational::new(30000, 1001)),
            Rational::new(1, 90000),
        );

        let (first, _) = synth.next_frame();
        let (second, _) = synth.next_frame();
        let (third, _) = synth.next_frame();

        assert_eq!(second.0 - first.0, 3003);
        assert_eq!(third.0 - second.0, 3003);
    }

    #[test]
    fn audio_spacing_matches_frame_size_over_sample_rate() {
        // 1024 samples at 48000 Hz in a 1/48000 time base is 1024 ticks
        let mut synth = TimestampSynthesizer::audio(48000, 1024, Rational::new(1, 48000));

        let mut previous = None;
        for _ in 0..100 {
            let (pts, duration) = synth.next_frame();
            assert_eq!(duration, MediaDuration(1024));
            if let Some(prev) = previous {
                assert_eq!(pts.0 - prev, 1024);
            }
            previous = Some(pts.0);
        }
    }

    #[test]
    fn audio_spacing_at_44100() {
        // 1024 samples at 44100 Hz is 23219.95 us, which is 1024 ticks
        // back in the stream's own 1/44100 time base
        let mut synth = TimestampSynthesizer::audio(44100, 1024, Rational::new(1, 44100));

        let (first, _) = synth.next_frame();
        let (second, _) = synth.next_frame();

        assert_eq!(second.0 - first.0, 1024);
    }

    #[test]
    fn missing_rate_synthesizes_zero_timestamps() {
        let mut synth = TimestampSynthesizer::video(None, Rational::new(1, 90000));

        let (first, first_duration) = synth.next_frame();
        let (second, _) = synth.next_frame();

        assert_eq!(first, Pts(0));
        assert_eq!(second, Pts(0));
        assert_eq!(first_duration, MediaDuration(0));
    }

    #[test]
    fn zero_frame_size_synthesizes_zero_timestamps() {
        let mut synth = TimestampSynthesizer::audio(48000, 0, Rational::new(1, 48000));

        let (pts, duration) = synth.next_frame();
        assert_eq!(pts, Pts(0));
        assert_eq!(duration, MediaDuration(0));
    }

    #[test]
    fn timestamps_are_strictly_increasing() {
        let mut synth = TimestampSynthesizer::audio(44100, 1152, Rational::new(1, 44100));

        let mut last = -1i64;
        for _ in 0..50 {
            let (pts, _) = synth.next_frame();
            assert!(pts.0 > last);
            last = pts.0;
        }
    }
}
