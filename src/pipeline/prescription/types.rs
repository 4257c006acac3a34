use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// Dosage used when no quantity + unit is found for a medicine.
pub const DEFAULT_DOSAGE: &str = "As prescribed";
/// Frequency used when no frequency phrase is found.
pub const DEFAULT_FREQUENCY: &str = "As directed";
/// Duration used when no duration phrase is found.
pub const DEFAULT_DURATION: &str = "As needed";

// ═══════════════════════════════════════════
// Output record
// ═══════════════════════════════════════════

/// One medicine extracted from a transcript.
///
/// Every field is always populated: either with the extracted value or with
/// its default. `name`, `frequency` and `instructions` are capitalized
/// (first letter upper, rest lower); `dosage` and `duration` keep the text
/// exactly as matched, so "500mg" stays lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedMedicine {
    pub name: String,
    pub dosage: String,
    pub frequency: String,
    pub duration: String,
    /// Empty when no instruction phrase was found.
    pub instructions: String,
}

impl ParsedMedicine {
    /// Record returned by [`NoMatchPolicy::Placeholder`] when nothing matched.
    /// Carries the raw transcript in `instructions` so the doctor can copy
    /// from it while filling the form by hand.
    pub fn placeholder(raw_text: &str) -> Self {
        Self {
            name: String::new(),
            dosage: DEFAULT_DOSAGE.to_string(),
            frequency: DEFAULT_FREQUENCY.to_string(),
            duration: DEFAULT_DURATION.to_string(),
            instructions: raw_text.to_string(),
        }
    }

    /// True for records produced from a recognised medicine name.
    pub fn has_name(&self) -> bool {
        !self.name.is_empty()
    }
}

// ═══════════════════════════════════════════
// Policy
// ═══════════════════════════════════════════

/// What the parser returns when a non-blank transcript yields no medicine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoMatchPolicy {
    /// Return an empty list.
    #[default]
    Empty,
    /// Return a single [`ParsedMedicine::placeholder`] record.
    Placeholder,
}

impl NoMatchPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Placeholder => "placeholder",
        }
    }
}

impl std::str::FromStr for NoMatchPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "empty" => Ok(Self::Empty),
            "placeholder" => Ok(Self::Placeholder),
            other => Err(ConfigError::InvalidPolicy(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_uses_defaults_and_raw_text() {
        let record = ParsedMedicine::placeholder("Patient feels better");
        assert_eq!(record.name, "");
        assert_eq!(record.dosage, DEFAULT_DOSAGE);
        assert_eq!(record.frequency, DEFAULT_FREQUENCY);
        assert_eq!(record.duration, DEFAULT_DURATION);
        assert_eq!(record.instructions, "Patient feels better");
        assert!(!record.has_name());
    }

    #[test]
    fn policy_parses_case_insensitively() {
        assert_eq!("empty".parse::<NoMatchPolicy>().unwrap(), NoMatchPolicy::Empty);
        assert_eq!(
            " Placeholder ".parse::<NoMatchPolicy>().unwrap(),
            NoMatchPolicy::Placeholder
        );
    }

    #[test]
    fn policy_rejects_unknown_value() {
        let err = "sometimes".parse::<NoMatchPolicy>().unwrap_err();
        assert_eq!(err, ConfigError::InvalidPolicy("sometimes".into()));
    }

    #[test]
    fn policy_round_trips_through_as_str() {
        for policy in [NoMatchPolicy::Empty, NoMatchPolicy::Placeholder] {
            assert_eq!(policy.as_str().parse::<NoMatchPolicy>().unwrap(), policy);
        }
    }

    #[test]
    fn medicine_serializes_all_five_fields() {
        let record = ParsedMedicine {
            name: "Amoxicillin".into(),
            dosage: "500mg".into(),
            frequency: "Twice daily".into(),
            duration: "7 days".into(),
            instructions: String::new(),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["name"], "Amoxicillin");
        assert_eq!(json["dosage"], "500mg");
        assert_eq!(json["frequency"], "Twice daily");
        assert_eq!(json["duration"], "7 days");
        assert_eq!(json["instructions"], "");
    }

    #[test]
    fn policy_serializes_snake_case() {
        let json = serde_json::to_string(&NoMatchPolicy::Placeholder).unwrap();
        assert_eq!(json, "\"placeholder\"");
    }
}
