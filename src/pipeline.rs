//! Synthesis pipeline
//!
//! Turns an ordered segment sequence into one output audio file. Segments
//! are synthesized strictly sequentially, one request in flight at a
//! time: the output file must receive bytes in document order, and
//! sequential requests bound memory use to a single response frame.
//!
//! The run always starts from a fresh file. On failure it aborts
//! immediately, closing but not deleting the output, so a partial file is
//! left on disk for the caller to keep or remove.

use crate::segment::Segment;
use crate::synth::{Frame, Synthesizer, VoiceParams};
use crate::{BookError, Result};
use log::{debug, info};
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::Path;

/// Synthesize `segments` in index order, appending all audio to
/// `output_path`.
///
/// Any pre-existing file at `output_path` is removed first and parent
/// directories are created as needed. After each segment's stream is
/// fully drained and flushed, `on_progress` is called with the 1-based
/// segment number and the total count.
///
/// Fails with [`BookError::NoContent`] when `segments` is empty; callers
/// are expected to reject empty documents upstream, and silently writing
/// an empty file would hide that mistake.
pub fn run(
    segments: &[Segment],
    synth: &mut dyn Synthesizer,
    params: &VoiceParams,
    output_path: &Path,
    mut on_progress: impl FnMut(usize, usize),
) -> Result<()> {
    if segments.is_empty() {
        return Err(BookError::NoContent);
    }

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    if output_path.exists() {
        fs::remove_file(output_path)?;
    }

    // Exclusive append handle; drops closed on every exit path
    let mut output = OpenOptions::new()
        .append(true)
        .create_new(true)
        .open(output_path)?;

    let total = segments.len();
    info!(
        "Synthesizing {} segment(s) to {}",
        total,
        output_path.display()
    );

    for segment in segments {
        append_segment(&mut output, synth, segment, params)?;
        output.sync_data()?;
        on_progress(segment.index + 1, total);
    }

    Ok(())
}

/// Drain one segment's response stream into the output file.
///
/// Audio frames are written verbatim in arrival order; metadata frames
/// are discarded.
fn append_segment(
    output: &mut File,
    synth: &mut dyn Synthesizer,
    segment: &Segment,
    params: &VoiceParams,
) -> Result<()> {
    debug!(
        "Synthesizing segment {} ({} characters)",
        segment.index,
        segment.content.chars().count()
    );

    let stream = synth.synthesize(&segment.content, params)?;

    let mut audio_bytes = 0usize;
    for frame in stream {
        match frame? {
            Frame::Audio(bytes) => {
                output.write_all(&bytes)?;
                audio_bytes += bytes.len();
            }
            Frame::Metadata(_) => {}
        }
    }

    debug!("Segment {} produced {} audio bytes", segment.index, audio_bytes);
    Ok(())
}
