//! Prescription review before saving.
//!
//! Parsed medicines pre-fill an editable form. The doctor corrects fields,
//! the form is validated, and only then is the prescription persisted by the
//! caller. Nothing here touches storage.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pipeline::prescription::ParsedMedicine;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ReviewError {
    #[error("Unknown medicine field '{0}'")]
    UnknownField(String),
}

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One editable medicine row on the prescription form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrescriptionMedicine {
    pub name: String,
    pub dosage: String,
    pub frequency: String,
    pub duration: String,
    pub instructions: Option<String>,
}

impl From<ParsedMedicine> for PrescriptionMedicine {
    fn from(parsed: ParsedMedicine) -> Self {
        Self {
            name: parsed.name,
            dosage: parsed.dosage,
            frequency: parsed.frequency,
            duration: parsed.duration,
            instructions: non_blank(parsed.instructions),
        }
    }
}

/// Editable fields of a [`PrescriptionMedicine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MedicineField {
    Name,
    Dosage,
    Frequency,
    Duration,
    Instructions,
}

impl MedicineField {
    pub const ALL: [MedicineField; 5] = [
        Self::Name,
        Self::Dosage,
        Self::Frequency,
        Self::Duration,
        Self::Instructions,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Dosage => "dosage",
            Self::Frequency => "frequency",
            Self::Duration => "duration",
            Self::Instructions => "instructions",
        }
    }

    /// Label shown next to the input.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Name => "Medicine name",
            Self::Dosage => "Dosage",
            Self::Frequency => "Frequency",
            Self::Duration => "Duration",
            Self::Instructions => "Instructions",
        }
    }

    pub fn is_required(&self) -> bool {
        !matches!(self, Self::Instructions)
    }
}

impl std::str::FromStr for MedicineField {
    type Err = ReviewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| ReviewError::UnknownField(s.to_string()))
    }
}

/// A validation problem on the form. `index`/`field` are `None` for
/// form-level issues such as an empty medicine list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldIssue {
    pub index: Option<usize>,
    pub field: Option<MedicineField>,
    pub message: String,
}

/// A single edit made by the doctor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldCorrection {
    pub index: usize,
    pub field: MedicineField,
    pub value: String,
}

// ---------------------------------------------------------------------------
// Functions
// ---------------------------------------------------------------------------

/// Form rows to pre-fill from a parse result.
///
/// Parsed records replace the form only when the first one carries a name;
/// otherwise the doctor gets a single blank row to fill in by hand.
pub fn entries_from_parsed(parsed: Vec<ParsedMedicine>) -> Vec<PrescriptionMedicine> {
    match parsed.first() {
        Some(first) if first.has_name() => parsed.into_iter().map(Into::into).collect(),
        _ => vec![PrescriptionMedicine::default()],
    }
}

pub fn validate_medicines(medicines: &[PrescriptionMedicine]) -> Vec<FieldIssue> {
    if medicines.is_empty() {
        return vec![FieldIssue {
            index: None,
            field: None,
            message: "At least one medicine is required".into(),
        }];
    }

    let mut issues = Vec::new();
    for (index, medicine) in medicines.iter().enumerate() {
        let required = [
            (MedicineField::Name, &medicine.name, "Medicine name is required"),
            (MedicineField::Dosage, &medicine.dosage, "Dosage is required"),
            (MedicineField::Frequency, &medicine.frequency, "Frequency is required"),
            (MedicineField::Duration, &medicine.duration, "Duration is required"),
        ];
        for (field, value, message) in required {
            if value.trim().is_empty() {
                issues.push(FieldIssue {
                    index: Some(index),
                    field: Some(field),
                    message: message.into(),
                });
            }
        }
    }
    issues
}

/// Apply doctor edits to the form rows. Returns the number applied;
/// corrections pointing past the end of the list are skipped.
pub fn apply_corrections(
    medicines: &mut [PrescriptionMedicine],
    corrections: &[FieldCorrection],
) -> usize {
    let mut applied = 0;

    for correction in corrections {
        let medicine = match medicines.get_mut(correction.index) {
            Some(m) => m,
            None => continue,
        };

        let value = correction.value.clone();
        match correction.field {
            MedicineField::Name => medicine.name = value,
            MedicineField::Dosage => medicine.dosage = value,
            MedicineField::Frequency => medicine.frequency = value,
            MedicineField::Duration => medicine.duration = value,
            MedicineField::Instructions => medicine.instructions = non_blank(value),
        }
        applied += 1;
    }

    applied
}

fn non_blank(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}
