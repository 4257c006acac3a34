//! `rxscribe` command line.
//!
//! Reads a transcript from `--text`, `--file` or stdin, parses it and prints
//! the outcome as JSON. Environment settings apply first; flags override.

use std::io::{Read, Write};
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use serde::Serialize;
use thiserror::Error;

use crate::config::{parse_transcript_limit, ConfigError, ParserConfig};
use crate::pipeline::prescription::NoMatchPolicy;
use crate::pipeline::transcript::{TranscriptError, TranscriptOutcome, TranscriptProcessor};
use crate::review::{entries_from_parsed, validate_medicines, FieldIssue, PrescriptionMedicine};

#[derive(Error, Debug)]
pub enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Transcript(#[from] TranscriptError),
}

#[derive(Parser, Debug)]
#[command(name = "rxscribe")]
#[command(version, about = "Parse a dictated prescription into structured medicines")]
pub struct Args {
    /// Transcript text (reads stdin when neither --text nor --file is given)
    #[arg(long, conflicts_with = "file")]
    pub text: Option<String>,

    /// File containing the transcript
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// What to return when no medicine is recognised
    #[arg(long, value_enum)]
    pub policy: Option<PolicyArg>,

    /// Maximum transcript length in characters
    #[arg(long, value_parser = parse_transcript_limit)]
    pub max_chars: Option<usize>,

    /// Also emit pre-filled form rows and their validation issues
    #[arg(long)]
    pub form: bool,

    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PolicyArg {
    Empty,
    Placeholder,
}

impl From<PolicyArg> for NoMatchPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Empty => NoMatchPolicy::Empty,
            PolicyArg::Placeholder => NoMatchPolicy::Placeholder,
        }
    }
}

/// JSON document written to stdout.
#[derive(Debug, Serialize)]
pub struct CliReport {
    #[serde(flatten)]
    pub outcome: TranscriptOutcome,
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub form: Option<FormReport>,
}

#[derive(Debug, Serialize)]
pub struct FormReport {
    pub entries: Vec<PrescriptionMedicine>,
    pub issues: Vec<FieldIssue>,
}

/// Apply flag overrides on top of `base`.
pub fn resolve_config(args: &Args, base: ParserConfig) -> ParserConfig {
    let mut config = base;
    if let Some(policy) = args.policy {
        config.no_match_policy = policy.into();
    }
    if let Some(max_chars) = args.max_chars {
        config.max_transcript_chars = max_chars;
    }
    config
}

pub fn read_transcript(args: &Args, mut stdin: impl Read) -> Result<String, CliError> {
    if let Some(text) = &args.text {
        return Ok(text.clone());
    }
    if let Some(path) = &args.file {
        return Ok(std::fs::read_to_string(path)?);
    }
    let mut buf = String::new();
    stdin.read_to_string(&mut buf)?;
    Ok(buf)
}

pub fn build_report(
    args: &Args,
    config: &ParserConfig,
    transcript: &str,
) -> Result<CliReport, CliError> {
    let outcome = TranscriptProcessor::new(config).process(transcript)?;
    let summary = outcome.status.summary();
    let form = args.form.then(|| {
        let entries = entries_from_parsed(outcome.medicines.clone());
        let issues = validate_medicines(&entries);
        FormReport { entries, issues }
    });

    Ok(CliReport {
        outcome,
        summary,
        form,
    })
}

pub fn execute(args: &Args, stdin: impl Read, mut out: impl Write) -> Result<(), CliError> {
    let config = resolve_config(args, ParserConfig::from_env()?);
    tracing::debug!(
        policy = config.no_match_policy.as_str(),
        max_chars = config.max_transcript_chars,
        "Resolved parser config"
    );

    let transcript = read_transcript(args, stdin)?;
    let report = build_report(args, &config, &transcript)?;

    if args.pretty {
        serde_json::to_writer_pretty(&mut out, &report)?;
    } else {
        serde_json::to_writer(&mut out, &report)?;
    }
    writeln!(out)?;
    Ok(())
}
