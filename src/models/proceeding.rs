use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{CaseId, ProceedingId};
use crate::entities::proceedings;
use crate::validation::{self, ValidationError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Proceeding {
    pub id: ProceedingId,
    pub case_id: CaseId,
    pub proceeding_date: NaiveDate,
    pub description: String,
    pub tentative_date: Option<NaiveDate>,
}

impl From<proceedings::Model> for Proceeding {
    fn from(model: proceedings::Model) -> Self {
        Self {
            id: ProceedingId::new(model.id),
            case_id: CaseId::new(model.case_id),
            proceeding_date: model.proceeding_date,
            description: model.description,
            tentative_date: model.tentative_date,
        }
    }
}

/// Raw proceeding fields as submitted, dates still unparsed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProceedingInput {
    pub proceeding_date: String,
    pub description: String,
    #[serde(default)]
    pub tentative_date: Option<String>,
}

impl ProceedingInput {
    pub fn new(
        proceeding_date: impl Into<String>,
        description: impl Into<String>,
        tentative_date: Option<&str>,
    ) -> Self {
        Self {
            proceeding_date: proceeding_date.into(),
            description: description.into(),
            tentative_date: tentative_date.map(str::to_string),
        }
    }
}

/// Proceeding fields after date validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProceedingFields {
    pub proceeding_date: NaiveDate,
    pub description: String,
    pub tentative_date: Option<NaiveDate>,
}

impl TryFrom<ProceedingInput> for ProceedingFields {
    type Error = ValidationError;

    fn try_from(input: ProceedingInput) -> Result<Self, Self::Error> {
        let proceeding_date = validation::validate_date(&input.proceeding_date, "proceeding")?;
        let tentative_date =
            validation::validate_optional_date(input.tentative_date.as_deref(), "tentative")?;

        Ok(Self {
            proceeding_date,
            description: input.description,
            tentative_date,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_tentative_date_becomes_none() {
        let fields =
            ProceedingFields::try_from(ProceedingInput::new("2024-01-15", "Hearing", Some("")))
                .unwrap();
        assert_eq!(fields.proceeding_date, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        assert_eq!(fields.tentative_date, None);
    }

    #[test]
    fn test_each_date_reports_its_own_field() {
        let err = ProceedingFields::try_from(ProceedingInput::new("soon", "Hearing", None))
            .unwrap_err();
        assert!(err.message().contains("proceeding date"));

        let err = ProceedingFields::try_from(ProceedingInput::new(
            "2024-01-15",
            "Hearing",
            Some("not-a-date"),
        ))
        .unwrap_err();
        assert!(err.message().contains("tentative date"));
    }
}
