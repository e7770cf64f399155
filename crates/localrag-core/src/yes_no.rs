//! Canonicalisation of answers to binary questions.
//!
//! Matching is plain substring containment on the lower-cased text, so a word
//! that merely contains "oui" or "non" (e.g. "nonobstant") counts as a hit.

use std::fmt;

const QUESTION_MARKERS: [&str; 2] = ["oui ou non", "yes or no"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YesNo {
    Yes,
    No,
    Unknown,
}

impl YesNo {
    pub fn as_str(self) -> &'static str {
        match self {
            YesNo::Yes => "Oui",
            YesNo::No => "Non",
            YesNo::Unknown => "Je ne sais pas.",
        }
    }

    /// Classify a raw model answer. Both markers present resolves to `No`.
    pub fn classify(raw_answer: &str) -> Self {
        let lowered = raw_answer.trim().to_lowercase();
        match (lowered.contains("oui"), lowered.contains("non")) {
            (true, true) | (false, true) => YesNo::No,
            (true, false) => YesNo::Yes,
            (false, false) => YesNo::Unknown,
        }
    }
}

impl fmt::Display for YesNo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether the question asks for a binary answer.
pub fn is_yes_no_question(question: &str) -> bool {
    let lowered = question.to_lowercase();
    QUESTION_MARKERS.iter().any(|marker| lowered.contains(marker))
}

/// Normalise `raw_answer` when `question` is binary; otherwise pass it through.
pub fn normalize(question: &str, raw_answer: &str) -> String {
    if is_yes_no_question(question) {
        YesNo::classify(raw_answer).to_string()
    } else {
        raw_answer.to_string()
    }
}
