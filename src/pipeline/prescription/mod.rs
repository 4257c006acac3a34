//! Free-text prescription parser.
//!
//! Turns a dictated or typed prescription ("take amoxicillin 500mg twice
//! daily for 7 days after meals") into structured medicine records for the
//! doctor to review before anything is saved.
//!
//! ## Passes
//! ```text
//! normalize → split segments → match names → extract fields → assemble
//! ```
//! - Name families, by priority: dictionary/suffix, dosage form, generic
//!   `<word> <number><unit>` pair, then a token infix scan.
//! - Field families (dosage, frequency, duration, instructions) fall back to
//!   fixed defaults, so every record is fully populated.
//!
//! The parser is a best-effort heuristic: it never errors, and a poor result
//! is an empty or partially defaulted list rather than a failure.

pub mod types;
pub mod normalize;
pub mod patterns;
pub mod fields;
pub mod parser;

pub use types::*;
pub use parser::{parse_prescription_text, PrescriptionParser};
