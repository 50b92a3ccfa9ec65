use std::cmp::Ordering;
use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};

use av_sink::{Sink, SinkConfig};
use av_source::Source;
use av_types::{Error, Packet, StreamInfo, StreamType, compare_ts};

/**
    Run the mux pipeline: bind the best video stream of one file and the
    best audio stream of another, then merge their packets into the output.
*/
pub fn run(video_path: &Path, audio_path: &Path, output_path: &Path) -> Result<()> {
    let mut video = Source::open(video_path, StreamType::Video)
        .with_context(|| format!("opening video input '{}'", video_path.display()))?;
    let mut audio = Source::open(audio_path, StreamType::Audio)
        .with_context(|| format!("opening audio input '{}'", audio_path.display()))?;

    println!("-------------input--------------------");
    dump_input(0, video_path, &video);
    dump_input(1, audio_path, &audio);
    println!("--------------------------------------");

    let config = SinkConfig::new()
        .with_video(video.codec_config().clone(), video.time_base())
        .with_audio(audio.codec_config().clone(), audio.time_base());

    let mut sink = Sink::file(output_path, config)
        .with_context(|| format!("creating output '{}'", output_path.display()))?;

    println!("-------------output-------------------");
    dump_output(output_path, &sink);
    println!("--------------------------------------");

    sink.write_header().context("writing container header")?;

    let mut packet_count = 0u64;
    let mut last_report = Instant::now();

    let stats = interleave(
        || {
            let packet = video.next_packet()?;
            if packet.is_none() {
                println!("Video stream ended");
            }
            Ok(packet)
        },
        || {
            let packet = audio.next_packet()?;
            if packet.is_none() {
                println!("Audio stream ended");
            }
            Ok(packet)
        },
        |packet| {
            sink.write(packet)?;
            packet_count += 1;
            if last_report.elapsed() > Duration::from_secs(2) {
                println!("Packets: {}", packet_count);
                last_report = Instant::now();
            }
            Ok(())
        },
    )?;

    sink.finish().context("finalizing output")?;

    println!(
        "Muxed {} packets ({} video, {} audio) into '{}'",
        stats.video_packets + stats.audio_packets,
        stats.video_packets,
        stats.audio_packets,
        output_path.display()
    );

    Ok(())
}

/**
    Print a short description of an opened input.
*/
fn dump_input(index: usize, path: &Path, source: &Source) {
    println!("Input #{index}, from '{}':", path.display());
    match source.stream_info() {
        StreamInfo::Video(video) => {
            let fps = video
                .fps()
                .map(|fps| format!("{fps:.2} fps"))
                .unwrap_or_else(|| "unknown fps".to_string());
            println!(
                "  Stream #{index}:{}: video: {}, {}x{}, {}{}, tb {}",
                source.stream_index(),
                video.codec,
                video.width,
                video.height,
                fps,
                bitrate_label(video.bitrate),
                video.time_base
            );
            if let Some(duration) = video.duration {
                println!("  Duration: {:.1}s", duration.as_secs_f64());
            }
        }
        StreamInfo::Audio(audio) => {
            println!(
                "  Stream #{index}:{}: audio: {}, {} Hz, {} ch{}, tb {}",
                source.stream_index(),
                audio.codec,
                audio.sample_rate,
                audio.channels,
                bitrate_label(audio.bitrate),
                audio.time_base
            );
            if let Some(duration) = audio.duration {
                println!("  Duration: {:.1}s", duration.as_secs_f64());
            }
        }
    }
}

fn bitrate_label(bitrate: Option<u64>) -> String {
    bitrate
        .map(|bits| format!(", {} kb/s", bits / 1000))
        .unwrap_or_default()
}

/**
    Print the stream layout of the output.
*/
fn dump_output(path: &Path, sink: &Sink) {
    println!("Output #0, {}, to '{}':", sink.format_name(), path.display());
    if let Some(index) = sink.video_stream_index() {
        println!("  Stream #0:{index}: video (stream copy)");
    }
    if let Some(index) = sink.audio_stream_index() {
        println!("  Stream #0:{index}: audio (stream copy)");
    }
}

/**
    Packet counts accumulated while interleaving.
*/
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct InterleaveStats {
    video_packets: u64,
    audio_packets: u64,
}

/**
    Drive two packet readers through a writer, merging the two streams in
    timeline order.

    Each round compares the pending packet of either stream on the shared
    timeline and writes the earlier one; ties go to video. The merge stops
    as soon as either reader is exhausted, so the output never carries a
    long tail of one stream alone.
*/
fn interleave(
    mut next_video: impl FnMut() -> Result<Option<Packet>, Error>,
    mut next_audio: impl FnMut() -> Result<Option<Packet>, Error>,
    mut write: impl FnMut(&Packet) -> Result<(), Error>,
) -> Result<InterleaveStats, Error> {
    let mut stats = InterleaveStats::default();
    let mut video_slot: Option<Packet> = None;
    let mut audio_slot: Option<Packet> = None;

    loop {
        let video = match video_slot.take() {
            Some(packet) => packet,
            None => match next_video()? {
                Some(packet) => packet,
                None => break,
            },
        };
        let audio = match audio_slot.take() {
            Some(packet) => packet,
            None => match next_audio()? {
                Some(packet) => packet,
                None => break,
            },
        };

        // Both streams have a packet pending; a packet without a timestamp
        // sorts first so it drains instead of stalling the merge
        let video_ts = video.pts.map_or(i64::MIN, |pts| pts.0);
        let audio_ts = audio.pts.map_or(i64::MIN, |pts| pts.0);

        if compare_ts(video_ts, video.time_base, audio_ts, audio.time_base) != Ordering::Greater {
            write(&video)?;
            stats.video_packets += 1;
            audio_slot = Some(audio);
        } else {
            write(&audio)?;
            stats.audio_packets += 1;
            video_slot = Some(video);
        }
    }

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::VecDeque;

    use av_types::{MediaDuration, Pts, Rational};

    fn packet(stream_type: StreamType, pts: i64, time_base: Rational) -> Packet {
        Packet::new(
            vec![0u8; 16],
            Some(Pts(pts)),
            Some(Pts(pts)),
            MediaDuration(0),
            time_base,
            false,
            stream_type,
        )
    }

    fn feeder(packets: Vec<Packet>) -> impl FnMut() -> Result<Option<Packet>, Error> {
        let mut queue = VecDeque::from(packets);
        move || Ok(queue.pop_front())
    }

    fn video_packets(pts_list: &[i64], time_base: Rational) -> Vec<Packet> {
        pts_list
            .iter()
            .map(|&pts| packet(StreamType::Video, pts, time_base))
            .collect()
    }

    fn audio_packets(pts_list: &[i64], time_base: Rational) -> Vec<Packet> {
        pts_list
            .iter()
            .map(|&pts| packet(StreamType::Audio, pts, time_base))
            .collect()
    }

    #[test]
    fn writes_packets_in_timeline_order() {
        let video_tb = Rational::new(1, 90000);
        let audio_tb = Rational::new(1, 48000);

        let mut written = Vec::new();
        let stats = interleave(
            feeder(video_packets(&[0, 3000, 6000], video_tb)),
            feeder(audio_packets(&[0, 1024, 2048], audio_tb)),
            |packet| {
                written.push((packet.stream_type, packet.pts.map_or(-1, |pts| pts.0)));
                Ok(())
            },
        )
        .unwrap();

        assert_eq!(
            written,
            vec![
                (StreamType::Video, 0),
                (StreamType::Audio, 0),
                (StreamType::Audio, 1024),
                (StreamType::Video, 3000),
                (StreamType::Audio, 2048),
            ]
        );
        assert_eq!(stats.video_packets, 2);
        assert_eq!(stats.audio_packets, 3);
    }

    #[test]
    fn tie_prefers_video() {
        let tb = Rational::new(1, 1000);

        let mut written = Vec::new();
        interleave(
            feeder(video_packets(&[0, 10], tb)),
            feeder(audio_packets(&[0], tb)),
            |packet| {
                written.push((packet.stream_type, packet.pts.map_or(-1, |pts| pts.0)));
                Ok(())
            },
        )
        .unwrap();

        assert_eq!(
            written,
            vec![(StreamType::Video, 0), (StreamType::Audio, 0)]
        );
    }

    #[test]
    fn stops_when_either_input_is_exhausted() {
        let tb = Rational::new(1, 1000);

        let mut written = Vec::new();
        let stats = interleave(
            feeder(video_packets(&[0, 10, 20, 30, 40], tb)),
            feeder(audio_packets(&[5, 15], tb)),
            |packet| {
                written.push((packet.stream_type, packet.pts.map_or(-1, |pts| pts.0)));
                Ok(())
            },
        )
        .unwrap();

        // Audio runs dry first, so the video tail is never written
        assert_eq!(
            written,
            vec![
                (StreamType::Video, 0),
                (StreamType::Audio, 5),
                (StreamType::Video, 10),
                (StreamType::Audio, 15),
            ]
        );
        assert_eq!(stats.video_packets, 2);
        assert_eq!(stats.audio_packets, 2);
    }

    #[test]
    fn per_stream_order_is_preserved() {
        let tb = Rational::new(1, 1000);

        let mut written = Vec::new();
        interleave(
            feeder(video_packets(&[0, 500, 1000, 1500], tb)),
            feeder(audio_packets(&[200, 700, 1200], tb)),
            |packet| {
                written.push((packet.stream_type, packet.pts.map_or(-1, |pts| pts.0)));
                Ok(())
            },
        )
        .unwrap();

        for stream_type in [StreamType::Video, StreamType::Audio] {
            let timestamps: Vec<i64> = written
                .iter()
                .filter(|(kind, _)| *kind == stream_type)
                .map(|(_, pts)| *pts)
                .collect();
            assert!(timestamps.windows(2).all(|pair| pair[0] <= pair[1]));
        }
    }

    #[test]
    fn comparison_spans_time_bases() {
        // 3600 ticks at 1/90000 is 40ms; 23 ticks at 1/1000 is 23ms
        let mut written = Vec::new();
        let stats = interleave(
            feeder(video_packets(&[3600], Rational::new(1, 90000))),
            feeder(audio_packets(&[23], Rational::new(1, 1000))),
            |packet| {
                written.push((packet.stream_type, packet.pts.map_or(-1, |pts| pts.0)));
                Ok(())
            },
        )
        .unwrap();

        // Audio comes first, then runs dry before the video packet goes out
        assert_eq!(written, vec![(StreamType::Audio, 23)]);
        assert_eq!(stats.video_packets, 0);
        assert_eq!(stats.audio_packets, 1);
    }

    #[test]
    fn failing_write_stops_the_merge() {
        let tb = Rational::new(1, 1000);

        let mut written = 0u32;
        let result = interleave(
            feeder(video_packets(&[0, 10], tb)),
            feeder(audio_packets(&[5, 15], tb)),
            |_| {
                if written == 1 {
                    return Err(Error::Write("disk full".to_string()));
                }
                written += 1;
                Ok(())
            },
        );

        assert!(result.is_err());
        assert_eq!(written, 1);
    }

    #[test]
    fn empty_video_input_writes_nothing() {
        let tb = Rational::new(1, 1000);

        let mut written = Vec::new();
        let stats = interleave(
            feeder(Vec::new()),
            feeder(audio_packets(&[0, 10], tb)),
            |packet: &Packet| {
                written.push(packet.stream_type);
                Ok(())
            },
        )
        .unwrap();

        assert!(written.is_empty());
        assert_eq!(stats, InterleaveStats::default());
    }
}
