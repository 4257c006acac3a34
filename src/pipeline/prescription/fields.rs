//! Dosage, frequency, duration and instruction extraction.
//!
//! Each field has an ordered list of families. Extraction walks the search
//! regions in order and, inside a region, tries the families by priority;
//! the first hit wins and the field default applies otherwise.

use std::sync::LazyLock;

use regex::Regex;

use super::normalize::capitalize_first;
use super::patterns::{compile, DOSAGE_TOKEN};
use super::types::{DEFAULT_DOSAGE, DEFAULT_DURATION, DEFAULT_FREQUENCY};

static DOSAGE_UNIT: LazyLock<Regex> = LazyLock::new(|| compile(DOSAGE_TOKEN));

static DOSAGE_SPELLED: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"\d+(?:\.\d+)?\s*(?:milligrams?|micrograms?|grams?)\b")
});

static FREQUENCY_DAILY: LazyLock<Regex> = LazyLock::new(|| {
    compile(
        r"\b(once|twice|three\s+times?|four\s+times?|[1-4])\s*(?:times?\s*)?(?:daily|per\s+day|a\s+day)\b",
    )
});

static FREQUENCY_INTERVAL: LazyLock<Regex> =
    LazyLock::new(|| compile(r"\bevery\s+\d+\s+hours?\b"));

static FREQUENCY_TIME_OF_DAY: LazyLock<Regex> =
    LazyLock::new(|| compile(r"\b(?:morning|evening|night|bedtime)\b"));

static FREQUENCY_AS_NEEDED: LazyLock<Regex> =
    LazyLock::new(|| compile(r"\b(?:as\s+needed|when\s+needed|prn)\b"));

static FREQUENCY_BARE_TIMES: LazyLock<Regex> =
    LazyLock::new(|| compile(r"\b(\d+)\s*times?\b"));

static DURATION_SPAN: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"\b(?:for\s+)?(\d+\s*(?:days?|weeks?|months?))\b")
});

static DURATION_UNTIL: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"\buntil\s+symptoms\s+improve\b|\buntil\s+\w+")
});

static INSTRUCTION_MEALS: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"\b(?:(?:take|apply|use)\s+)?(?:after|before|without|with)\s+(?:meals?|food|eating)\b")
});

static INSTRUCTION_STOMACH_WATER: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"\bon\s+(?:an\s+)?empty\s+stomach\b|\bwith\s+plenty\s+of\s+water\b")
});

/// Try each region in order; inside a region, try each family in order.
fn first_hit(regions: &[&str], families: &[fn(&str) -> Option<String>]) -> Option<String> {
    regions
        .iter()
        .find_map(|&region| families.iter().find_map(|family| family(region)))
}

// ═══════════════════════════════════════════
// Dosage
// ═══════════════════════════════════════════

/// Dosage for a medicine: the name family's captured dosage when present,
/// otherwise the first quantity + unit in `regions`, else "As prescribed".
/// Kept verbatim.
pub fn extract_dosage(captured: Option<&str>, regions: &[&str]) -> String {
    if let Some(dosage) = captured {
        return dosage.to_string();
    }
    first_hit(regions, &[dosage_unit, dosage_spelled])
        .unwrap_or_else(|| DEFAULT_DOSAGE.to_string())
}

/// True when `text` holds a quantity + unit in either dosage family.
pub fn mentions_dosage(text: &str) -> bool {
    DOSAGE_UNIT.is_match(text) || DOSAGE_SPELLED.is_match(text)
}

fn dosage_unit(text: &str) -> Option<String> {
    DOSAGE_UNIT.find(text).map(|m| m.as_str().to_string())
}

fn dosage_spelled(text: &str) -> Option<String> {
    DOSAGE_SPELLED.find(text).map(|m| m.as_str().to_string())
}

// ═══════════════════════════════════════════
// Frequency
// ═══════════════════════════════════════════

/// Frequency normalized to the controlled vocabulary, else "As directed".
pub fn extract_frequency(regions: &[&str]) -> String {
    first_hit(
        regions,
        &[
            frequency_daily,
            frequency_interval,
            frequency_time_of_day,
            frequency_as_needed,
        ],
    )
    .or_else(|| first_hit(regions, &[frequency_bare_times]))
    .unwrap_or_else(|| DEFAULT_FREQUENCY.to_string())
}

fn frequency_daily(text: &str) -> Option<String> {
    let caps = FREQUENCY_DAILY.captures(text)?;
    let cardinal = caps.get(1)?.as_str();
    let normalized = match cardinal.split_whitespace().next()? {
        "once" | "1" => "Once daily",
        "twice" | "2" => "Twice daily",
        "three" | "3" => "Three times daily",
        _ => "Four times daily",
    };
    Some(normalized.to_string())
}

fn frequency_interval(text: &str) -> Option<String> {
    FREQUENCY_INTERVAL
        .find(text)
        .map(|m| capitalize_first(m.as_str()))
}

fn frequency_time_of_day(text: &str) -> Option<String> {
    FREQUENCY_TIME_OF_DAY
        .find(text)
        .map(|m| capitalize_first(m.as_str()))
}

fn frequency_as_needed(text: &str) -> Option<String> {
    FREQUENCY_AS_NEEDED
        .find(text)
        .map(|m| capitalize_first(m.as_str()))
}

/// Bare "<N> times" without a daily qualifier.
fn frequency_bare_times(text: &str) -> Option<String> {
    let caps = FREQUENCY_BARE_TIMES.captures(text)?;
    Some(times_daily(caps.get(1)?.as_str()))
}

/// Map a count of doses per day onto the frequency vocabulary.
pub fn times_daily(count: &str) -> String {
    let count = count.trim_start_matches('0');
    match count {
        "1" => "Once daily".to_string(),
        "2" => "Twice daily".to_string(),
        "3" => "Three times daily".to_string(),
        "4" => "Four times daily".to_string(),
        "" => "0 times daily".to_string(),
        n => format!("{n} times daily"),
    }
}

// ═══════════════════════════════════════════
// Duration
// ═══════════════════════════════════════════

/// Duration phrase kept verbatim ("7 days", "until symptoms improve"),
/// else "As needed".
pub fn extract_duration(regions: &[&str]) -> String {
    first_hit(regions, &[duration_span, duration_until])
        .unwrap_or_else(|| DEFAULT_DURATION.to_string())
}

fn duration_span(text: &str) -> Option<String> {
    let caps = DURATION_SPAN.captures(text)?;
    Some(caps.get(1)?.as_str().to_string())
}

fn duration_until(text: &str) -> Option<String> {
    DURATION_UNTIL.find(text).map(|m| m.as_str().to_string())
}

// ═══════════════════════════════════════════
// Instructions
// ═══════════════════════════════════════════

/// Capitalized instruction phrase ("After meals"), else empty.
pub fn extract_instructions(regions: &[&str]) -> String {
    first_hit(regions, &[instruction_meals, instruction_stomach_water]).unwrap_or_default()
}

fn instruction_meals(text: &str) -> Option<String> {
    INSTRUCTION_MEALS
        .find(text)
        .map(|m| capitalize_first(m.as_str()))
}

fn instruction_stomach_water(text: &str) -> Option<String> {
    INSTRUCTION_STOMACH_WATER
        .find(text)
        .map(|m| capitalize_first(m.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- Dosage ---------------------------------------------------------

    #[test]
    fn captured_dosage_wins() {
        assert_eq!(extract_dosage(Some("500mg"), &["250mg"]), "500mg");
    }

    #[test]
    fn dosage_scans_regions_in_order() {
        assert_eq!(extract_dosage(None, &["give 500mg ", " and 200mg"]), "500mg");
        assert_eq!(extract_dosage(None, &["give ", " then 5 ml"]), "5 ml");
    }

    #[test]
    fn dosage_accepts_units_and_decimals() {
        for (text, expected) in [
            ("take 100mcg", "100mcg"),
            ("1g stat", "1g"),
            ("10 units at night", "10 units"),
            ("1 unit", "1 unit"),
            ("2.5mg", "2.5mg"),
        ] {
            assert_eq!(extract_dosage(None, &[text]), expected, "text: {text}");
        }
    }

    #[test]
    fn dosage_spelled_out() {
        assert_eq!(extract_dosage(None, &["take 500 milligrams"]), "500 milligrams");
        assert_eq!(extract_dosage(None, &["250 micrograms daily"]), "250 micrograms");
        assert_eq!(extract_dosage(None, &["1 gram"]), "1 gram");
    }

    #[test]
    fn unit_family_beats_spelled_family_within_region() {
        assert_eq!(extract_dosage(None, &["500 milligrams or 250mg"]), "250mg");
    }

    #[test]
    fn mentions_dosage_checks_both_families() {
        assert!(mentions_dosage("give 500mg "));
        assert!(mentions_dosage("take 250 milligrams of"));
        assert!(!mentions_dosage("after meals take "));
        assert!(!mentions_dosage(""));
    }

    #[test]
    fn dosage_defaults() {
        assert_eq!(extract_dosage(None, &["twice daily"]), "As prescribed");
        assert_eq!(extract_dosage(None, &[]), "As prescribed");
    }

    // -- Frequency ------------------------------------------------------

    #[test]
    fn cardinal_daily_phrases_normalize() {
        for (text, expected) in [
            ("once daily", "Once daily"),
            ("twice a day", "Twice daily"),
            ("three times per day", "Three times daily"),
            ("four times daily", "Four times daily"),
            ("1 daily", "Once daily"),
            ("2 times a day", "Twice daily"),
            ("3 times a day", "Three times daily"),
            ("4 times per day", "Four times daily"),
        ] {
            assert_eq!(extract_frequency(&[text]), expected, "text: {text}");
        }
    }

    #[test]
    fn interval_phrase_is_capitalized() {
        assert_eq!(extract_frequency(&["every 8 hours"]), "Every 8 hours");
        assert_eq!(extract_frequency(&["every 1 hour"]), "Every 1 hour");
    }

    #[test]
    fn time_of_day_and_as_needed() {
        assert_eq!(extract_frequency(&["at bedtime"]), "Bedtime");
        assert_eq!(extract_frequency(&["in the morning"]), "Morning");
        assert_eq!(extract_frequency(&["as needed for pain"]), "As needed");
        assert_eq!(extract_frequency(&["prn"]), "Prn");
    }

    #[test]
    fn family_priority_beats_position() {
        // time-of-day appears first but the daily family has priority
        assert_eq!(extract_frequency(&["at night twice daily"]), "Twice daily");
        assert_eq!(extract_frequency(&["as needed every 6 hours"]), "Every 6 hours");
    }

    #[test]
    fn bare_times_fallback() {
        assert_eq!(extract_frequency(&["2 times"]), "Twice daily");
        assert_eq!(extract_frequency(&["take it 5 times"]), "5 times daily");
        assert_eq!(extract_frequency(&["12 times a day"]), "12 times daily");
    }

    #[test]
    fn bare_times_only_after_every_family_in_every_region() {
        assert_eq!(extract_frequency(&["5 times", "at night"]), "Night");
    }

    #[test]
    fn times_daily_mapping() {
        assert_eq!(times_daily("1"), "Once daily");
        assert_eq!(times_daily("02"), "Twice daily");
        assert_eq!(times_daily("3"), "Three times daily");
        assert_eq!(times_daily("4"), "Four times daily");
        assert_eq!(times_daily("6"), "6 times daily");
        assert_eq!(times_daily("000"), "0 times daily");
        assert_eq!(
            times_daily("99999999999999999999999"),
            "99999999999999999999999 times daily"
        );
    }

    #[test]
    fn frequency_default() {
        assert_eq!(extract_frequency(&["take with water"]), "As directed");
    }

    // -- Duration -------------------------------------------------------

    #[test]
    fn duration_span_drops_for() {
        assert_eq!(extract_duration(&["for 7 days"]), "7 days");
        assert_eq!(extract_duration(&["2 weeks"]), "2 weeks");
        assert_eq!(extract_duration(&["for 3 months then review"]), "3 months");
        assert_eq!(extract_duration(&["for 1 day"]), "1 day");
    }

    #[test]
    fn duration_does_not_read_daily_as_days() {
        assert_eq!(extract_duration(&["2 daily"]), "As needed");
    }

    #[test]
    fn duration_until_phrases() {
        assert_eq!(
            extract_duration(&["until symptoms improve"]),
            "until symptoms improve"
        );
        assert_eq!(extract_duration(&["until finished"]), "until finished");
    }

    #[test]
    fn duration_default() {
        assert_eq!(extract_duration(&["twice daily"]), "As needed");
    }

    // -- Instructions ---------------------------------------------------

    #[test]
    fn meal_instructions() {
        assert_eq!(extract_instructions(&["for 7 days after meals"]), "After meals");
        assert_eq!(extract_instructions(&["take with food"]), "Take with food");
        assert_eq!(extract_instructions(&["without eating"]), "Without eating");
        assert_eq!(extract_instructions(&["before meal"]), "Before meal");
    }

    #[test]
    fn stomach_and_water_instructions() {
        assert_eq!(
            extract_instructions(&["on an empty stomach"]),
            "On an empty stomach"
        );
        assert_eq!(
            extract_instructions(&["with plenty of water"]),
            "With plenty of water"
        );
    }

    #[test]
    fn instructions_default_empty() {
        assert_eq!(extract_instructions(&["twice daily"]), "");
    }
}
