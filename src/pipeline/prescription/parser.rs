use tracing::{debug, trace};

use super::fields::{
    extract_dosage, extract_duration, extract_frequency, extract_instructions, mentions_dosage,
};
use super::normalize::{capitalize_first, normalize, split_segments};
use super::patterns::{match_names, NameMatch};
use super::types::{NoMatchPolicy, ParsedMedicine};

/// Free-text prescription parser.
///
/// Holds only its no-match policy; every call to [`parse`](Self::parse)
/// starts from scratch, so one parser can be shared across threads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PrescriptionParser {
    policy: NoMatchPolicy,
}

impl PrescriptionParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: NoMatchPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> NoMatchPolicy {
        self.policy
    }

    /// Convert one transcript into medicine records, in order of appearance.
    ///
    /// Never fails: unrecognisable input gives an empty list, or a single
    /// placeholder under [`NoMatchPolicy::Placeholder`]. Blank input always
    /// gives an empty list.
    pub fn parse(&self, text: &str) -> Vec<ParsedMedicine> {
        let normalized = normalize(text);
        let segments = split_segments(&normalized);

        let mut medicines = Vec::new();
        for segment in &segments {
            medicines.extend(parse_segment(segment));
        }

        debug!(
            segments = segments.len(),
            medicines = medicines.len(),
            policy = self.policy.as_str(),
            "Parsed prescription text"
        );

        let raw = text.trim();
        if medicines.is_empty() && self.policy == NoMatchPolicy::Placeholder && !raw.is_empty() {
            medicines.push(ParsedMedicine::placeholder(raw));
        }

        medicines
    }
}

/// Parse with the default (empty-on-no-match) policy.
pub fn parse_prescription_text(text: &str) -> Vec<ParsedMedicine> {
    PrescriptionParser::new().parse(text)
}

/// Which side of a name its dosage is dictated on, decided once per segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DosageSide {
    /// "give 500mg amoxicillin and 200mg ibuprofen"
    BeforeName,
    /// "amoxicillin, 500mg, then ibuprofen, 200mg"
    AfterName,
}

impl DosageSide {
    /// Doses come before names when the lead-in already carries one.
    fn for_segment(segment: &str, matches: &[NameMatch<'_>]) -> Self {
        let lead_in = matches.first().map_or("", |first| &segment[..first.start]);
        if mentions_dosage(lead_in) {
            Self::BeforeName
        } else {
            Self::AfterName
        }
    }
}

/// Where each field of one name match is looked up.
struct SearchRegions<'a> {
    dosage: Vec<&'a str>,
    context: Vec<&'a str>,
}

impl<'a> SearchRegions<'a> {
    /// A lone match reads its fields from the whole segment. With several
    /// matches, a dosage is read only from the side of the name the segment
    /// dictates doses on; frequency, duration and instructions come from the
    /// text after the name, then from the lead-in before the first name.
    fn for_match(
        segment: &'a str,
        matches: &[NameMatch<'a>],
        index: usize,
        side: DosageSide,
    ) -> Self {
        if matches.len() == 1 {
            return Self {
                dosage: vec![segment],
                context: vec![segment],
            };
        }

        let current = &matches[index];
        let prev_end = if index == 0 { 0 } else { matches[index - 1].end };
        let next_start = matches
            .get(index + 1)
            .map_or(segment.len(), |next| next.start);

        let leading = &segment[prev_end..current.start];
        let trailing = &segment[current.end..next_start];
        let lead_in = &segment[..matches[0].start];

        let dosage = match side {
            DosageSide::BeforeName if index + 1 == matches.len() => vec![leading, trailing],
            DosageSide::BeforeName => vec![leading],
            DosageSide::AfterName => vec![trailing],
        };

        Self {
            dosage,
            context: vec![trailing, lead_in],
        }
    }
}

fn parse_segment(segment: &str) -> Vec<ParsedMedicine> {
    let matches = match_names(segment);
    let side = DosageSide::for_segment(segment, &matches);
    trace!(matches = matches.len(), ?side, "Segment name matches");

    (0..matches.len())
        .map(|index| {
            let regions = SearchRegions::for_match(segment, &matches, index, side);
            assemble(&matches[index], &regions)
        })
        .collect()
}

fn assemble(name: &NameMatch<'_>, regions: &SearchRegions<'_>) -> ParsedMedicine {
    trace!(family = name.family.as_str(), "Assembling medicine record");
    ParsedMedicine {
        name: capitalize_first(name.name),
        dosage: extract_dosage(name.dosage, &regions.dosage),
        frequency: extract_frequency(&regions.context),
        duration: extract_duration(&regions.context),
        instructions: extract_instructions(&regions.context),
    }
}
