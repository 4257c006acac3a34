//! Voice transcript hand-off.
//!
//! Takes the text produced by speech capture (or typed by the doctor), caps
//! its length, runs the prescription parser and reports what was found so
//! the caller can pre-fill the prescription form.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::ParserConfig;
use crate::pipeline::prescription::{ParsedMedicine, PrescriptionParser};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TranscriptError {
    #[error("No text to process: record or type a prescription first")]
    EmptyTranscript,
}

/// What the parser made of a transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ProcessingStatus {
    /// At least one named medicine was extracted.
    Extracted { count: usize },
    /// Nothing usable; the form is left for manual entry.
    NoMedicinesDetected,
}

impl ProcessingStatus {
    fn from_medicines(medicines: &[ParsedMedicine]) -> Self {
        match medicines.first() {
            Some(first) if first.has_name() => Self::Extracted {
                count: medicines.len(),
            },
            _ => Self::NoMedicinesDetected,
        }
    }

    /// Short message for the doctor.
    pub fn summary(&self) -> String {
        match self {
            Self::Extracted { count } => {
                format!("Extracted {count} medicine(s) from the transcript.")
            }
            Self::NoMedicinesDetected => {
                "No medicines detected. Try naming specific medicines more clearly.".to_string()
            }
        }
    }
}

/// Result of processing one transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptOutcome {
    pub id: Uuid,
    pub processed_at: DateTime<Utc>,
    /// The transcript as parsed (after any length cap).
    pub transcript: String,
    pub truncated: bool,
    pub medicines: Vec<ParsedMedicine>,
    #[serde(flatten)]
    pub status: ProcessingStatus,
}

/// Runs transcripts through the parser with the configured input cap.
#[derive(Debug, Clone)]
pub struct TranscriptProcessor {
    parser: PrescriptionParser,
    max_transcript_chars: usize,
}

impl TranscriptProcessor {
    pub fn new(config: &ParserConfig) -> Self {
        Self {
            parser: PrescriptionParser::with_policy(config.no_match_policy),
            max_transcript_chars: config.max_transcript_chars,
        }
    }

    pub fn process(&self, transcript: &str) -> Result<TranscriptOutcome, TranscriptError> {
        if transcript.trim().is_empty() {
            return Err(TranscriptError::EmptyTranscript);
        }

        let (text, truncated) = truncate_chars(transcript, self.max_transcript_chars);
        if truncated {
            warn!(
                limit = self.max_transcript_chars,
                "Transcript exceeds length cap, parsing truncated text"
            );
        }

        let medicines = self.parser.parse(text);
        let status = ProcessingStatus::from_medicines(&medicines);
        let outcome = TranscriptOutcome {
            id: Uuid::new_v4(),
            processed_at: Utc::now(),
            transcript: text.to_string(),
            truncated,
            medicines,
            status,
        };

        info!(
            outcome_id = %outcome.id,
            medicines = outcome.medicines.len(),
            truncated,
            "Transcript processed"
        );

        Ok(outcome)
    }
}

/// Cut `text` to at most `max_chars` characters, on a char boundary.
fn truncate_chars(text: &str, max_chars: usize) -> (&str, bool) {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => (&text[..idx], true),
        None => (text, false),
    }
}
