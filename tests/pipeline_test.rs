//! Pipeline behavior tests
//!
//! Runs the synthesis pipeline against a scripted synthesizer so byte
//! ordering, progress reporting and failure handling can be verified
//! without the real service.

use edgebook::pipeline;
use edgebook::segment::Segment;
use edgebook::synth::{Frame, FrameStream, Synthesizer, VoiceParams};
use edgebook::{BookError, Result};
use std::fs;
use std::path::PathBuf;

/// Canned response for one expected synthesis request
enum Scripted {
    /// Yield these frames, then end the stream
    Frames(Vec<Frame>),
    /// Fail the request before any frame is produced
    RequestFails,
    /// Yield these frames, then fail mid-stream
    FailsAfter(Vec<Frame>),
}

/// Synthesizer that replays a script and records the requests it saw
struct ScriptedSynth {
    script: Vec<Scripted>,
    requests: Vec<String>,
}

impl ScriptedSynth {
    fn new(script: Vec<Scripted>) -> Self {
        Self {
            script,
            requests: Vec::new(),
        }
    }
}

impl Synthesizer for ScriptedSynth {
    fn synthesize(&mut self, text: &str, _params: &VoiceParams) -> Result<FrameStream> {
        let call = self.requests.len();
        self.requests.push(text.to_string());

        let response = self
            .script
            .get(call)
            .unwrap_or_else(|| panic!("unexpected request #{call} for {text:?}"));

        match response {
            Scripted::Frames(frames) => {
                let items: Vec<Result<Frame>> = frames.iter().cloned().map(Ok).collect();
                Ok(Box::new(items.into_iter()))
            }
            Scripted::RequestFails => Err(BookError::Synthesis("scripted request failure".into())),
            Scripted::FailsAfter(frames) => {
                let mut items: Vec<Result<Frame>> = frames.iter().cloned().map(Ok).collect();
                items.push(Err(BookError::Synthesis("scripted stream failure".into())));
                Ok(Box::new(items.into_iter()))
            }
        }
    }

    fn voices(&mut self) -> Result<Vec<String>> {
        Ok(vec!["en-US-JennyNeural".to_string()])
    }
}

fn params() -> VoiceParams {
    VoiceParams::new("en-US-JennyNeural", "+0%", "+0Hz").unwrap()
}

fn segments(contents: &[&str]) -> Vec<Segment> {
    contents
        .iter()
        .enumerate()
        .map(|(index, content)| Segment {
            content: content.to_string(),
            index,
        })
        .collect()
}

fn audio(bytes: &[u8]) -> Frame {
    Frame::Audio(bytes.to_vec())
}

#[test]
fn test_output_concatenates_segments_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("book.mp3");

    let mut synth = ScriptedSynth::new(vec![
        Scripted::Frames(vec![
            audio(b"AAA-1"),
            Frame::Metadata("word boundary".into()),
            audio(b"AAA-2"),
        ]),
        Scripted::Frames(vec![Frame::Metadata("sentence boundary".into()), audio(b"BBB")]),
        Scripted::Frames(vec![audio(b"CC"), audio(b"CC")]),
    ]);

    let segs = segments(&["First chunk.", "Second chunk.", "Third chunk."]);
    let mut progress = Vec::new();

    pipeline::run(&segs, &mut synth, &params(), &out, |done, total| {
        progress.push((done, total));
    })
    .unwrap();

    assert_eq!(fs::read(&out).unwrap(), b"AAA-1AAA-2BBBCCCC");
    assert_eq!(progress, vec![(1, 3), (2, 3), (3, 3)]);
    assert_eq!(
        synth.requests,
        vec!["First chunk.", "Second chunk.", "Third chunk."]
    );
}

#[test]
fn test_failure_mid_run_stops_without_skipping_ahead() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("book.mp3");

    let mut synth = ScriptedSynth::new(vec![
        Scripted::Frames(vec![audio(b"ONE")]),
        Scripted::RequestFails,
        Scripted::Frames(vec![audio(b"THREE")]),
    ]);

    let segs = segments(&["One.", "Two.", "Three."]);
    let mut progress = Vec::new();

    let err = pipeline::run(&segs, &mut synth, &params(), &out, |done, total| {
        progress.push((done, total));
    })
    .unwrap_err();

    assert!(matches!(err, BookError::Synthesis(_)));
    // Segment 3 was never requested and the file holds exactly segment 1
    assert_eq!(synth.requests, vec!["One.", "Two."]);
    assert_eq!(fs::read(&out).unwrap(), b"ONE");
    assert_eq!(progress, vec![(1, 3)]);
}

#[test]
fn test_stream_failure_propagates_and_aborts() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("book.mp3");

    let mut synth = ScriptedSynth::new(vec![
        Scripted::Frames(vec![audio(b"ONE")]),
        Scripted::FailsAfter(vec![audio(b"TW")]),
        Scripted::Frames(vec![audio(b"THREE")]),
    ]);

    let segs = segments(&["One.", "Two.", "Three."]);

    let err = pipeline::run(&segs, &mut synth, &params(), &out, |_, _| {}).unwrap_err();

    assert!(matches!(err, BookError::Synthesis(_)));
    assert_eq!(synth.requests, vec!["One.", "Two."]);
    // Bytes received before the failure stay on disk; nothing from
    // segment 3 follows them
    assert_eq!(fs::read(&out).unwrap(), b"ONETW");
}

#[test]
fn test_empty_segment_list_is_no_content() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("book.mp3");

    let mut synth = ScriptedSynth::new(vec![]);
    let err = pipeline::run(&[], &mut synth, &params(), &out, |_, _| {}).unwrap_err();

    assert!(matches!(err, BookError::NoContent));
    assert!(synth.requests.is_empty());
    assert!(!out.exists());
}

#[test]
fn test_pre_existing_output_is_replaced() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("book.mp3");
    fs::write(&out, b"stale bytes from an earlier run").unwrap();

    let mut synth = ScriptedSynth::new(vec![Scripted::Frames(vec![audio(b"FRESH")])]);
    let segs = segments(&["Only chunk."]);

    pipeline::run(&segs, &mut synth, &params(), &out, |_, _| {}).unwrap();

    assert_eq!(fs::read(&out).unwrap(), b"FRESH");
}

#[test]
fn test_parent_directories_are_created() {
    let dir = tempfile::tempdir().unwrap();
    let out: PathBuf = dir.path().join("nested/deeper/book.mp3");

    let mut synth = ScriptedSynth::new(vec![Scripted::Frames(vec![audio(b"DEEP")])]);
    let segs = segments(&["Only chunk."]);

    pipeline::run(&segs, &mut synth, &params(), &out, |_, _| {}).unwrap();

    assert_eq!(fs::read(&out).unwrap(), b"DEEP");
}

#[test]
fn test_metadata_frames_never_reach_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("book.mp3");

    let mut synth = ScriptedSynth::new(vec![Scripted::Frames(vec![
        Frame::Metadata("turn start".into()),
        audio(b"AUDIO"),
        Frame::Metadata("turn end".into()),
    ])]);
    let segs = segments(&["Only chunk."]);

    pipeline::run(&segs, &mut synth, &params(), &out, |_, _| {}).unwrap();

    assert_eq!(fs::read(&out).unwrap(), b"AUDIO");
}
