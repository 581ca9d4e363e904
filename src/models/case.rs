use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::CaseId;
use crate::entities::cases;
use crate::models::proceeding::Proceeding;
use crate::validation::{self, ValidationError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Case {
    pub id: CaseId,
    pub client_name: String,
    pub case_status: String,
    pub date_created: DateTime<Utc>,
    pub case_file: Option<String>,
    pub interim_orders_file: Option<String>,
}

impl From<cases::Model> for Case {
    fn from(model: cases::Model) -> Self {
        Self {
            id: CaseId::new(model.id),
            client_name: model.client_name,
            case_status: model.case_status,
            date_created: model.date_created,
            case_file: model.case_file,
            interim_orders_file: model.interim_orders_file,
        }
    }
}

/// A case together with its proceedings, ordered by proceeding date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaseWithProceedings {
    #[serde(flatten)]
    pub case: Case,
    pub proceedings: Vec<Proceeding>,
}

/// The user-editable text fields of a case, checked on construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseFields {
    client_name: String,
    case_status: String,
}

impl CaseFields {
    pub fn new(
        client_name: impl Into<String>,
        case_status: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let client_name = client_name.into();
        validation::validate_client_name(&client_name)?;
        Ok(Self {
            client_name,
            case_status: case_status.into(),
        })
    }

    #[must_use]
    pub fn client_name(&self) -> &str {
        &self.client_name
    }

    #[must_use]
    pub fn case_status(&self) -> &str {
        &self.case_status
    }
}

/// Stored filenames for the two attachment slots.
///
/// `None` means "no new file for this slot": an insert leaves the column
/// empty and an update keeps the previous value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaseAttachments {
    pub case_file: Option<String>,
    pub interim_orders_file: Option<String>,
}

impl CaseAttachments {
    /// Filenames that were actually supplied.
    pub fn stored_names(&self) -> impl Iterator<Item = &str> {
        self.case_file
            .iter()
            .chain(self.interim_orders_file.iter())
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_fields_reject_long_client_name() {
        assert!(CaseFields::new("x".repeat(101), "Open").is_err());

        let fields = CaseFields::new("", "Open").unwrap();
        assert_eq!(fields.client_name(), "");
        assert_eq!(fields.case_status(), "Open");
    }

    #[test]
    fn test_stored_names_skips_empty_slots() {
        let attachments = CaseAttachments {
            case_file: None,
            interim_orders_file: Some("abc_order.pdf".to_string()),
        };
        assert_eq!(attachments.stored_names().collect::<Vec<_>>(), vec!["abc_order.pdf"]);
        assert_eq!(CaseAttachments::default().stored_names().count(), 0);
    }
}
