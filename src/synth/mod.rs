//! Speech synthesis abstraction
//!
//! The remote synthesis service is consumed through the [`Synthesizer`]
//! trait: one request per text segment, answered with a lazy stream of
//! frames. The pipeline only appends [`Frame::Audio`] payloads; everything
//! else the service sends is discarded.

pub mod edge;

use crate::{BookError, Result};
use once_cell::sync::Lazy;
use regex::Regex;

/// Rate adjustment format, e.g. "+10%" or "-5%"
static RATE_FORMAT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[+-]\d+%$").expect("valid regex"));

/// Pitch adjustment format, e.g. "+2Hz" or "-6Hz"
static PITCH_FORMAT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[+-]\d+Hz$").expect("valid regex"));

/// Voice identifier used when the catalog query fails or returns nothing
pub const FALLBACK_VOICE: &str = "en-US-JennyNeural";

/// Preferred defaults, in order, when the catalog is available
const PREFERRED_VOICES: &[&str] = &["en-US-JennyNeural", "en-US-GuyNeural"];

/// One unit of a streamed synthesis response
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// Raw encoded audio bytes, appended verbatim to the output file
    Audio(Vec<u8>),
    /// Timing or boundary metadata; ignored downstream
    Metadata(String),
}

/// Lazy, finite, non-restartable sequence of response frames
pub type FrameStream = Box<dyn Iterator<Item = Result<Frame>>>;

/// Voice parameters bound to every synthesis request of a run
///
/// Validated at construction so a bad rate or pitch string is rejected
/// before any network or file activity begins.
#[derive(Debug, Clone)]
pub struct VoiceParams {
    voice: String,
    rate: String,
    pitch: String,
    rate_offset: i32,
    pitch_offset: i32,
}

impl VoiceParams {
    /// Validate and bind voice parameters.
    ///
    /// `rate` must be a signed percentage like `+10%`; `pitch` a signed
    /// Hz value like `-2Hz`.
    pub fn new(voice: &str, rate: &str, pitch: &str) -> Result<Self> {
        if voice.trim().is_empty() {
            return Err(BookError::InvalidConfig(
                "voice must not be empty".to_string(),
            ));
        }
        if !RATE_FORMAT.is_match(rate) {
            return Err(BookError::InvalidConfig(format!(
                "invalid rate '{rate}', expected a signed percentage like +10% or -5%"
            )));
        }
        if !PITCH_FORMAT.is_match(pitch) {
            return Err(BookError::InvalidConfig(format!(
                "invalid pitch '{pitch}', expected a signed Hz value like +2Hz or -2Hz"
            )));
        }

        let rate_offset = rate[..rate.len() - 1]
            .parse()
            .map_err(|_| BookError::InvalidConfig(format!("rate '{rate}' is out of range")))?;
        let pitch_offset = pitch[..pitch.len() - 2]
            .parse()
            .map_err(|_| BookError::InvalidConfig(format!("pitch '{pitch}' is out of range")))?;

        Ok(Self {
            voice: voice.to_string(),
            rate: rate.to_string(),
            pitch: pitch.to_string(),
            rate_offset,
            pitch_offset,
        })
    }

    /// Voice identifier, e.g. "en-US-JennyNeural"
    pub fn voice(&self) -> &str {
        &self.voice
    }

    /// Rate adjustment as given, e.g. "+10%"
    pub fn rate(&self) -> &str {
        &self.rate
    }

    /// Pitch adjustment as given, e.g. "+0Hz"
    pub fn pitch(&self) -> &str {
        &self.pitch
    }

    /// Rate adjustment in whole percent
    pub fn rate_offset(&self) -> i32 {
        self.rate_offset
    }

    /// Pitch adjustment in whole Hz
    pub fn pitch_offset(&self) -> i32 {
        self.pitch_offset
    }
}

/// Speech synthesizer trait
///
/// Backends turn text plus voice parameters into a stream of audio
/// frames. The pipeline holds exactly one request in flight.
pub trait Synthesizer {
    /// Issue one synthesis request and return its response stream
    fn synthesize(&mut self, text: &str, params: &VoiceParams) -> Result<FrameStream>;

    /// List the available voice short names
    fn voices(&mut self) -> Result<Vec<String>>;
}

/// Create the default synthesizer backed by the Edge TTS service
pub fn create_synthesizer() -> Box<dyn Synthesizer> {
    Box::new(edge::EdgeSynth::new())
}

/// Pick the default voice from a catalog listing.
///
/// Prefers the well-known English neural voices, then the first entry,
/// then the hardcoded fallback for an empty listing.
pub fn default_voice(voices: &[String]) -> &str {
    for &preferred in PREFERRED_VOICES {
        if voices.iter().any(|v| v.as_str() == preferred) {
            return preferred;
        }
    }
    voices.first().map(String::as_str).unwrap_or(FALLBACK_VOICE)
}
