//! Edge TTS backend
//!
//! Talks to the Microsoft Edge read-aloud service through the
//! `msedge-tts` crate. Each synthesis request opens a fresh websocket
//! connection and returns a frame iterator that drains it; the service
//! interleaves audio payloads with timing metadata, and both are passed
//! up tagged so the pipeline can keep the audio and drop the rest.

use crate::synth::{Frame, FrameStream, Synthesizer, VoiceParams};
use crate::{BookError, Result};
use log::debug;
use msedge_tts::tts::stream::{msedge_tts_split, Reader, Sender, SynthesizedResponse};
use msedge_tts::tts::SpeechConfig;
use msedge_tts::voice::get_voices_list;

/// Output encoding requested from the service. The pipeline concatenates
/// segment streams byte-for-byte, so the format must be one that tolerates
/// plain concatenation.
const AUDIO_FORMAT: &str = "audio-24khz-48kbitrate-mono-mp3";

/// Synthesizer backed by the Edge neural TTS service
pub struct EdgeSynth;

impl EdgeSynth {
    pub fn new() -> Self {
        debug!("Creating Edge TTS backend");
        Self
    }

    /// Map run parameters onto the service's speech configuration
    fn speech_config(params: &VoiceParams) -> SpeechConfig {
        SpeechConfig {
            voice_name: params.voice().to_string(),
            audio_format: AUDIO_FORMAT.to_string(),
            pitch: params.pitch_offset(),
            rate: params.rate_offset(),
            volume: 0,
        }
    }
}

impl Default for EdgeSynth {
    fn default() -> Self {
        Self::new()
    }
}

impl Synthesizer for EdgeSynth {
    fn synthesize(&mut self, text: &str, params: &VoiceParams) -> Result<FrameStream> {
        debug!(
            "Requesting synthesis of {} characters with voice {}",
            text.chars().count(),
            params.voice()
        );

        let (mut sender, reader) =
            msedge_tts_split().map_err(|e| BookError::Synthesis(e.to_string()))?;
        let config = Self::speech_config(params);
        sender
            .send(text, &config)
            .map_err(|e| BookError::Synthesis(e.to_string()))?;

        Ok(Box::new(EdgeStream {
            _sender: sender,
            reader,
            done: false,
        }))
    }

    fn voices(&mut self) -> Result<Vec<String>> {
        let voices = get_voices_list().map_err(|e| BookError::Synthesis(e.to_string()))?;

        let mut names: Vec<String> = voices
            .into_iter()
            .map(|v| v.short_name.unwrap_or(v.name))
            .collect();
        names.sort();
        names.dedup();

        debug!("Voice catalog returned {} voices", names.len());
        Ok(names)
    }
}

/// Frame iterator over one request's websocket responses
///
/// The sender half is held alive for the duration of the read so the
/// connection stays open; the stream ends when the service reports the
/// turn finished.
struct EdgeStream {
    _sender: Sender<std::net::TcpStream>,
    reader: Reader<std::net::TcpStream>,
    done: bool,
}

impl Iterator for EdgeStream {
    type Item = Result<Frame>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            if !self.reader.can_read() {
                self.done = true;
                break;
            }
            match self.reader.read() {
                Ok(Some(SynthesizedResponse::AudioBytes(bytes))) => {
                    return Some(Ok(Frame::Audio(bytes)))
                }
                Ok(Some(SynthesizedResponse::AudioMetadata(meta))) => {
                    return Some(Ok(Frame::Metadata(format!("{meta:?}"))))
                }
                // Service chatter that is neither audio nor metadata
                Ok(None) => continue,
                Err(e) => {
                    self.done = true;
                    return Some(Err(BookError::Synthesis(e.to_string())));
                }
            }
        }
        None
    }
}
