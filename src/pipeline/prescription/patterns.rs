//! Medicine-name pattern families.
//!
//! Families are tried in a fixed priority order against one segment:
//! dictionary/suffix names, then dosage-form phrases ("tablet of X"), then
//! generic `<word> <number><unit>` pairs. The first family with at least one
//! match owns the segment. When none match, an infix scan over the
//! segment's tokens is the last resort.
//!
//! Every family is a pure function over the segment. The compiled regexes
//! are shared, but `regex::Regex` keeps no scan position between calls, so
//! one call can never observe state left by another.

use std::sync::LazyLock;

use regex::Regex;

/// Quantity + unit token, e.g. "500mg", "2.5 ml", "10 units".
pub(crate) const DOSAGE_TOKEN: &str = r"\d+(?:\.\d+)?\s*(?:mg|mcg|g|ml|units?)\b";

/// Commonly dictated generic names recognised verbatim.
const KNOWN_MEDICINES: &[&str] = &[
    "ibuprofen",
    "acetaminophen",
    "aspirin",
    "metformin",
    "lisinopril",
    "amlodipine",
    "atorvastatin",
    "omeprazole",
    "levothyroxine",
    "paracetamol",
    "diclofenac",
    "naproxen",
    "warfarin",
    "insulin",
    "furosemide",
    "doxycycline",
    "tramadol",
    "codeine",
    "morphine",
    "gabapentin",
    "sertraline",
    "fluoxetine",
    "lorazepam",
    "diazepam",
];

/// Drug-class suffixes: any word ending in one of these is a name.
const NAME_SUFFIXES: &[&str] = &["cillin", "statin", "zole", "pril", "pine"];

/// Words that precede a dose in dictation but never name a medicine.
const NON_NAME_WORDS: &[&str] = &[
    "a", "an", "and", "at", "by", "give", "of", "or", "take", "the", "then", "to", "with",
];

/// Infixes accepted by the last-resort token scan.
const NAME_INFIXES: &[&str] = &["cillin", "phen", "stat", "zole", "pine", "pril"];

static DICTIONARY_NAME: LazyLock<Regex> = LazyLock::new(|| {
    let suffixes = NAME_SUFFIXES.join("|");
    let names = KNOWN_MEDICINES.join("|");
    compile(&format!(
        r"\b(\w*(?:{suffixes})|{names})\b(?:\s*({DOSAGE_TOKEN}))?"
    ))
});

static DOSAGE_FORM_NAME: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"\b(?:tablets?|capsules?|syrup|injection|cream|ointment|drops)\s+of\s+(\p{L}+)\b")
});

static GENERIC_PAIR_NAME: LazyLock<Regex> =
    LazyLock::new(|| compile(&format!(r"\b(\p{{L}}+)\s+({DOSAGE_TOKEN})")));

static TOKEN: LazyLock<Regex> = LazyLock::new(|| compile(r"\S+"));

pub(crate) fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("Invalid prescription regex pattern")
}

// ═══════════════════════════════════════════
// Types
// ═══════════════════════════════════════════

/// Which family produced a name match, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum NameFamily {
    Dictionary,
    DosageForm,
    GenericPair,
    InfixScan,
}

impl NameFamily {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dictionary => "dictionary",
            Self::DosageForm => "dosage_form",
            Self::GenericPair => "generic_pair",
            Self::InfixScan => "infix_scan",
        }
    }
}

/// A medicine name found in a segment, with byte offsets into that segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameMatch<'a> {
    pub family: NameFamily,
    pub name: &'a str,
    /// Dosage captured alongside the name, if the family has one.
    pub dosage: Option<&'a str>,
    /// Start of the whole match (name plus any captured dosage).
    pub start: usize,
    /// End of the whole match.
    pub end: usize,
}

// ═══════════════════════════════════════════
// Families
// ═══════════════════════════════════════════

/// Find the medicine names in one normalized segment.
///
/// Returns the non-overlapping matches of the highest-priority family that
/// matched, in order of appearance. Falls back to a single infix-scan match.
/// Empty when the segment carries no name signal.
pub fn match_names(segment: &str) -> Vec<NameMatch<'_>> {
    let families: [fn(&str) -> Vec<NameMatch<'_>>; 3] =
        [dictionary_matches, dosage_form_matches, generic_pair_matches];

    for family in families {
        let matches = family(segment);
        if !matches.is_empty() {
            return matches;
        }
    }

    infix_scan(segment).into_iter().collect()
}

/// Explicit drug names (dictionary or class suffix), optional trailing dosage.
pub fn dictionary_matches(segment: &str) -> Vec<NameMatch<'_>> {
    DICTIONARY_NAME
        .captures_iter(segment)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            Some(NameMatch {
                family: NameFamily::Dictionary,
                name: caps.get(1)?.as_str(),
                dosage: caps.get(2).map(|m| m.as_str()),
                start: whole.start(),
                end: whole.end(),
            })
        })
        .collect()
}

/// "<form> of <word>" phrases; the word after "of" is the name.
pub fn dosage_form_matches(segment: &str) -> Vec<NameMatch<'_>> {
    DOSAGE_FORM_NAME
        .captures_iter(segment)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            Some(NameMatch {
                family: NameFamily::DosageForm,
                name: caps.get(1)?.as_str(),
                dosage: None,
                start: whole.start(),
                end: whole.end(),
            })
        })
        .collect()
}

/// Any "<word> <number><unit>" pair. Weakest structured signal; filler
/// words such as "take" or "of" are never taken as the name.
pub fn generic_pair_matches(segment: &str) -> Vec<NameMatch<'_>> {
    GENERIC_PAIR_NAME
        .captures_iter(segment)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let name = caps.get(1)?.as_str();
            if NON_NAME_WORDS.contains(&name) {
                return None;
            }
            Some(NameMatch {
                family: NameFamily::GenericPair,
                name,
                dosage: caps.get(2).map(|m| m.as_str()),
                start: whole.start(),
                end: whole.end(),
            })
        })
        .collect()
}

/// First whitespace token longer than 3 characters, made only of lower-case
/// ASCII letters, that contains a known drug-name infix.
pub fn infix_scan(segment: &str) -> Option<NameMatch<'_>> {
    TOKEN
        .find_iter(segment)
        .find(|token| {
            let word = token.as_str();
            word.len() > 3
                && word.chars().all(|c| c.is_ascii_lowercase())
                && NAME_INFIXES.iter().any(|infix| word.contains(infix))
        })
        .map(|token| NameMatch {
            family: NameFamily::InfixScan,
            name: token.as_str(),
            dosage: None,
            start: token.start(),
            end: token.end(),
        })
}
