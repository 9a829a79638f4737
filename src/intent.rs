//! Voice command classification
//!
//! Maps a recognized transcript to one of the assistant's modes by
//! keyword matching.

use tracing::debug;

/// The command a transcript resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    BlindNavigation,
    CurrencyDetection,
    ReadingMode,
    Unrecognized,
}

impl Intent {
    /// Display name used in announcements and logs
    pub fn name(&self) -> &'static str {
        match self {
            Intent::BlindNavigation => "Blind Navigation",
            Intent::CurrencyDetection => "Currency Detection",
            Intent::ReadingMode => "Reading Mode",
            Intent::Unrecognized => "Unrecognized",
        }
    }
}

/// Trigger keywords per intent, in priority order.
///
/// Keyword sets overlap ("read the currency" hits both CurrencyDetection
/// and ReadingMode); the first matching row wins, so the table order IS
/// the priority order.
pub const KEYWORD_TABLE: &[(Intent, &[&str])] = &[
    (Intent::BlindNavigation, &["blind", "navigation"]),
    (Intent::CurrencyDetection, &["currency", "detection"]),
    (Intent::ReadingMode, &["reading", "read", "mode"]),
];

/// Classify a transcript into an intent.
///
/// Case-insensitive substring matching against each intent's keyword set,
/// tested in table order. Returns `Unrecognized` when nothing matches.
pub fn classify(transcript: &str) -> Intent {
    let text = transcript.trim().to_lowercase();
    if text.is_empty() {
        return Intent::Unrecognized;
    }

    for (intent, keywords) in KEYWORD_TABLE {
        if keywords.iter().any(|kw| text.contains(kw)) {
            debug!("Matched intent {:?} in '{}'", intent, text);
            return *intent;
        }
    }

    debug!("No intent matched for '{}'", text);
    Intent::Unrecognized
}
