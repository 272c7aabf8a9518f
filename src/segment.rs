//! Text segmentation
//!
//! Splits a document into chunks bounded by a maximum character count
//! without ever cutting a sentence in half. Mid-sentence splits produce
//! audibly unnatural prosody breaks in the synthesized speech, so a
//! sentence that cannot fit the limit is a hard error rather than
//! something to truncate.
//!
//! Lengths are measured in characters (Unicode scalar values), which is
//! what the synthesis service's request limit counts.

use crate::{BookError, Result};
use once_cell::sync::Lazy;
use regex::Regex;

/// Sentence boundary: terminal punctuation followed by whitespace.
///
/// This is a heuristic with known false positives (abbreviations like
/// "Mr.", initials) and false negatives (sentences ending at a close
/// quote). Changing it changes chunk contents and therefore the audible
/// output, so keep it stable.
static SENTENCE_END: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?]\s+").expect("valid regex"));

/// A sentence/paragraph-respecting slice of text bounded by the
/// configured maximum length
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// Text sent to the synthesis service as one request
    pub content: String,
    /// 0-based position defining emission order
    pub index: usize,
}

/// Split `text` into segments of at most `max_chars` characters.
///
/// Paragraphs are lines of the trimmed input; blank lines are discarded.
/// A paragraph that fits the limit stays whole. A longer paragraph is
/// split at sentence boundaries, and the resulting units are greedily
/// packed back together: a single space joins sentences of the same
/// paragraph, a blank line (two characters) joins paragraphs.
///
/// Returns an empty list for input that is empty after trimming. Fails
/// with [`BookError::SegmentTooLong`] when a single sentence exceeds the
/// limit, and with [`BookError::InvalidConfig`] when `max_chars` is zero.
pub fn segment(text: &str, max_chars: usize) -> Result<Vec<Segment>> {
    if max_chars == 0 {
        return Err(BookError::InvalidConfig(
            "max_chars must be positive".to_string(),
        ));
    }

    let stripped = text.trim();
    if stripped.is_empty() {
        return Ok(Vec::new());
    }

    fn flush(buf: &mut String, segments: &mut Vec<Segment>) {
        if !buf.is_empty() {
            segments.push(Segment {
                content: std::mem::take(buf),
                index: segments.len(),
            });
        }
    }

    let mut segments: Vec<Segment> = Vec::new();
    let mut current = String::new();
    let mut current_chars = 0usize;

    for paragraph in stripped.lines().map(str::trim).filter(|p| !p.is_empty()) {
        let units: Vec<&str> = if paragraph.chars().count() <= max_chars {
            vec![paragraph]
        } else {
            split_sentences(paragraph)
        };

        let mut new_paragraph = true;
        for unit in units {
            let unit_chars = unit.chars().count();
            if unit_chars > max_chars {
                return Err(BookError::SegmentTooLong {
                    length: unit_chars,
                    limit: max_chars,
                });
            }

            // Separator to prepend: nothing into an empty buffer, a blank
            // line when this unit starts a new paragraph, a space otherwise
            let separator = if current.is_empty() {
                ""
            } else if new_paragraph {
                "\n\n"
            } else {
                " "
            };

            if current_chars + separator.len() + unit_chars <= max_chars {
                current.push_str(separator);
                current.push_str(unit);
                current_chars += separator.len() + unit_chars;
            } else {
                flush(&mut current, &mut segments);
                current.push_str(unit);
                current_chars = unit_chars;
            }

            new_paragraph = false;
        }
    }

    flush(&mut current, &mut segments);
    Ok(segments)
}

/// Split a paragraph into trimmed sentence units.
///
/// The terminator is a single ASCII character, so `match.start() + 1` is
/// the byte boundary right after it.
fn split_sentences(paragraph: &str) -> Vec<&str> {
    let mut units = Vec::new();
    let mut start = 0;

    for m in SENTENCE_END.find_iter(paragraph) {
        let sentence = paragraph[start..m.start() + 1].trim();
        if !sentence.is_empty() {
            units.push(sentence);
        }
        start = m.end();
    }

    let tail = paragraph[start..].trim();
    if !tail.is_empty() {
        units.push(tail);
    }

    units
}
