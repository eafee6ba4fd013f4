use image::{Rgba, RgbaImage};

use super::*;
use crate::encode::sink::InMemorySink;
use crate::foundation::core::{FRAME_COUNT, Size};

fn secs(s: u32) -> VideoDuration {
    VideoDuration::from_secs(s).unwrap()
}

/// Four frames whose red channel is their index.
fn sequence(width: u32, height: u32) -> FrameSequence {
    let frames = (0..FRAME_COUNT as u8)
        .map(|i| RgbaImage::from_pixel(width, height, Rgba([i, 0, 0, 255])))
        .collect();
    FrameSequence::new(frames).unwrap()
}

fn red_ids(sink: &InMemorySink) -> Vec<u8> {
    sink.frames()
        .iter()
        .map(|(_, f)| f.get_pixel(0, 0)[0])
        .collect()
}

#[test]
fn duration_bounds() {
    assert!(VideoDuration::from_secs(0).is_err());
    assert!(VideoDuration::from_secs(31).is_err());
    assert_eq!(secs(1).secs(), 1);
    assert_eq!(secs(30).secs(), 30);
    assert_eq!(VideoDuration::default().secs(), 10);
}

#[test]
fn rate_scaling_encodes_each_frame_once() {
    let plan = plan_rate_scaling(4, secs(10)).unwrap();
    assert_eq!(plan.fps, Fps::new(4, 10).unwrap());
    assert!((plan.fps.as_f64() - 0.4).abs() < 1e-12);
    assert_eq!(plan.frames, vec![0, 1, 2, 3]);
    assert!((plan.duration_secs() - 10.0).abs() < 1e-9);
}

#[test]
fn rate_scaling_short_duration_gives_high_rate() {
    let plan = plan_rate_scaling(4, secs(1)).unwrap();
    assert_eq!(plan.fps.as_f64(), 4.0);
    assert!((plan.duration_secs() - 1.0).abs() < 1e-9);
}

#[test]
fn frame_repetition_exact_multiple() {
    let plan = plan_frame_repetition(4, secs(10), 10).unwrap();
    assert_eq!(plan.fps, Fps::new(10, 1).unwrap());
    assert_eq!(plan.frames.len(), 100);
    let expected: Vec<usize> = (0..25).flat_map(|_| 0..4).collect();
    assert_eq!(plan.frames, expected);
}

#[test]
fn frame_repetition_truncates_last_cycle() {
    let plan = plan_frame_repetition(4, secs(3), 10).unwrap();
    assert_eq!(plan.frames.len(), 30);
    let full: Vec<usize> = (0..8).flat_map(|_| 0..4).collect();
    assert_eq!(full.len(), 32);
    assert_eq!(plan.frames[..], full[..30]);
    assert_eq!(&plan.frames[28..], &[0, 1]);
    assert!((plan.duration_secs() - 3.0).abs() < 1e-9);
}

#[test]
fn frame_repetition_needs_frames() {
    assert!(plan_frame_repetition(0, secs(3), 10).is_err());
}

#[test]
fn policy_dispatch_and_default() {
    assert_eq!(VideoPolicy::default(), VideoPolicy::FrameRepetition);
    let a = VideoPlan::new(VideoPolicy::RateScaling, 4, secs(10)).unwrap();
    let b = VideoPlan::new(VideoPolicy::FrameRepetition, 4, secs(10)).unwrap();
    assert_eq!(a.frames.len(), 4);
    assert_eq!(b.frames.len(), 100);
    assert_eq!(b.fps.num, VIDEO_FPS);
}

#[test]
fn gif_render_pushes_frames_in_order() {
    let seq = sequence(100, 80);
    let mut sink = InMemorySink::new();
    render_gif(&seq, GifSpec::default(), &mut sink).unwrap();

    let cfg = sink.config().unwrap();
    assert_eq!(cfg.size, Size::new(100, 80));
    assert!((cfg.fps.frame_duration_secs() - 0.3).abs() < 1e-12);
    assert_eq!(red_ids(&sink), vec![0, 1, 2, 3]);
    let idx: Vec<u64> = sink.frames().iter().map(|(i, _)| i.0).collect();
    assert_eq!(idx, vec![0, 1, 2, 3]);
    assert!(sink.is_finished());
}

#[test]
fn video_render_follows_plan() {
    let seq = sequence(8, 6);
    let plan = VideoPlan::new(VideoPolicy::FrameRepetition, seq.len(), secs(3)).unwrap();
    let mut sink = InMemorySink::new();
    render_video(&seq, &plan, &mut sink).unwrap();

    let ids = red_ids(&sink);
    assert_eq!(ids.len(), 30);
    assert_eq!(&ids[..6], &[0, 1, 2, 3, 0, 1]);
    assert_eq!(sink.config().unwrap().fps, Fps::new(10, 1).unwrap());
}

#[test]
fn rate_scaling_render_sends_four_frames_at_scaled_rate() {
    let seq = sequence(8, 6);
    let plan = VideoPlan::new(VideoPolicy::RateScaling, seq.len(), secs(10)).unwrap();
    let mut sink = InMemorySink::new();
    render_video(&seq, &plan, &mut sink).unwrap();

    assert_eq!(sink.config().unwrap().fps, Fps::new(4, 10).unwrap());
    assert_eq!(red_ids(&sink), vec![0, 1, 2, 3]);
    assert!(sink.is_finished());
}

#[test]
fn video_render_rejects_out_of_range_plan() {
    let seq = sequence(8, 6);
    let plan = VideoPlan {
        fps: Fps::new(10, 1).unwrap(),
        frames: vec![0, 4],
    };
    let mut sink = InMemorySink::new();
    assert!(render_video(&seq, &plan, &mut sink).is_err());
}
