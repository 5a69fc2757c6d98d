//! Message segmentation
//!
//! Splits raw OCR output into discrete message blocks. Two policies exist,
//! selected by the configured source filter:
//!
//! - Generic: every keyword-matching line is its own one-line message,
//!   after a cleaning transform that anchors on "Lo"/"Sh" (Long/Short).
//! - Structured: a trigger keyword ("current trade") starts a new block;
//!   following lines accumulate into it. Discord's "(Edited ...)" OCR
//!   artifacts are dropped.
//!
//! Segmentation emits every candidate it finds; deduplication against
//! previously seen content is the ledger's job, not ours.


use crate::types::SourceFilter;

/// Anchor markers for generic signal lines, paired with the lowercase
/// side word they must begin. The marker alone is not enough: "Looking"
/// starts with "Lo" but is not a side call.
const LINE_ANCHORS: [(&str, &str); 2] = [("Lo", "long"), ("Sh", "short")];

/// Prefix of Discord's edited-message marker as it comes out of OCR.
const EDITED_MARKER: &str = "(Edited";

pub struct Segmenter {
    filter: SourceFilter,
    keywords: Vec<String>,
    trigger_keywords: Vec<String>,
}

impl Segmenter {
    /// Build a segmenter from comma-separated keyword lists. Keywords are
    /// matched case-insensitively as substrings.
    pub fn new(filter: SourceFilter, keywords: &str, trigger_keywords: &str) -> Self {
        Self {
            filter,
            keywords: split_keywords(keywords),
            trigger_keywords: split_keywords(trigger_keywords),
        }
    }

    /// Split raw OCR text into candidate message blocks.
    pub fn segment(&self, text: &str) -> Vec<String> {
        match self.filter {
            SourceFilter::Generic => self.segment_generic(text),
            SourceFilter::Structured => self.segment_structured(text),
        }
    }

    /// One keyword-matching line = one message. Lines that match a keyword
    /// but have no Lo/Sh anchor clean down to nothing and are dropped.
    fn segment_generic(&self, text: &str) -> Vec<String> {
        let mut messages = Vec::new();

        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let lower = line.to_lowercase();
            if !self.keywords.iter().any(|kw| lower.contains(kw)) {
                continue;
            }

            if let Some(cleaned) = clean_signal_line(line) {
                messages.push(cleaned);
            }
        }

        messages
    }

    /// Trigger lines flush the accumulating block and start a new one;
    /// everything else (except edited-markers) extends the current block.
    fn segment_structured(&self, text: &str) -> Vec<String> {
        let mut messages = Vec::new();
        let mut current: Vec<&str> = Vec::new();

        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let lower = line.to_lowercase();
            if self.trigger_keywords.iter().any(|kw| lower.contains(kw)) {
                if !current.is_empty() {
                    messages.push(current.join("\n"));
                }
                current = vec![line];
            } else if !line.starts_with(EDITED_MARKER) {
                current.push(line);
            }
        }

        if !current.is_empty() {
            messages.push(current.join("\n"));
        }

        messages
    }
}

/// Cleaning transform for generic signal lines: discard everything before
/// the first anchored "Lo"/"Sh" side word, strip literal "w/", truncate at
/// the first '@' (the trader handle), collapse whitespace. No anchor, no
/// message.
fn clean_signal_line(line: &str) -> Option<String> {
    let anchor = anchor_index(line)?;

    let mut rest = line[anchor..].replace("w/", "");
    if let Some(at) = rest.find('@') {
        rest.truncate(at);
    }

    // "w/" removal can leave a doubled space behind
    let cleaned = rest.split_whitespace().collect::<Vec<_>>().join(" ");
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

/// Earliest position where a marker begins a word that reads as the side
/// call itself ("Long", "Short", "Shorting", ...). Marker matching stays
/// case-sensitive so lowercase prose ("i am short on time") never anchors.
fn anchor_index(line: &str) -> Option<usize> {
    LINE_ANCHORS
        .iter()
        .filter_map(|(marker, side_word)| {
            line.match_indices(marker)
                .find(|(at, _)| starts_side_word(line, *at, side_word))
                .map(|(at, _)| at)
        })
        .min()
}

fn starts_side_word(line: &str, at: usize, side_word: &str) -> bool {
    let at_word_start = line[..at]
        .chars()
        .next_back()
        .map_or(true, |c| !c.is_alphanumeric());
    if !at_word_start {
        return false;
    }

    let word: String = line[at..].chars().take_while(|c| c.is_alphabetic()).collect();
    word.to_lowercase().starts_with(side_word)
}

fn split_keywords(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|kw| kw.trim().to_lowercase())
        .filter(|kw| !kw.is_empty())
        .collect()
}
