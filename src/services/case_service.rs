//! Domain service for cases.
//!
//! Owns the case business rules: client name validation, partial update of
//! the attachment slots, and cascading deletion of proceedings.

use thiserror::Error;

use crate::domain::{CaseId, RequestContext};
use crate::models::{Case, CaseWithProceedings};
use crate::services::upload::{PendingUploads, UploadError};
use crate::validation::ValidationError;

/// Errors specific to case operations.
#[derive(Debug, Error)]
pub enum CaseError {
    #[error("Case not found: {0}")]
    NotFound(CaseId),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<ValidationError> for CaseError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err.0)
    }
}

impl From<UploadError> for CaseError {
    fn from(err: UploadError) -> Self {
        match err {
            UploadError::Io(msg) => Self::Storage(msg),
            other => Self::Validation(other.to_string()),
        }
    }
}

impl From<sea_orm::DbErr> for CaseError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Storage(err.to_string())
    }
}

impl From<anyhow::Error> for CaseError {
    fn from(err: anyhow::Error) -> Self {
        Self::Storage(format!("{err:#}"))
    }
}

/// Submitted case form: text fields plus any files received for the slots.
#[derive(Debug, Clone, Default)]
pub struct CaseForm {
    pub client_name: String,
    pub case_status: String,
    pub uploads: PendingUploads,
}

impl CaseForm {
    pub fn new(client_name: impl Into<String>, case_status: impl Into<String>) -> Self {
        Self {
            client_name: client_name.into(),
            case_status: case_status.into(),
            uploads: PendingUploads::default(),
        }
    }

    #[must_use]
    pub fn with_uploads(mut self, uploads: PendingUploads) -> Self {
        self.uploads = uploads;
        self
    }
}

/// Domain service trait for cases.
#[async_trait::async_trait]
pub trait CaseService: Send + Sync {
    /// All cases, newest first.
    async fn list_cases(&self, ctx: &RequestContext) -> Result<Vec<Case>, CaseError>;

    async fn get_case(&self, ctx: &RequestContext, id: CaseId) -> Result<Case, CaseError>;

    /// The case plus its proceedings ordered by proceeding date.
    async fn get_case_with_proceedings(
        &self,
        ctx: &RequestContext,
        id: CaseId,
    ) -> Result<CaseWithProceedings, CaseError>;

    /// Validates and persists a new case, storing any attached files.
    ///
    /// # Errors
    ///
    /// Returns [`CaseError::Validation`] if the client name is longer than 100
    /// characters or an attachment is rejected; nothing is written in that case.
    async fn create_case(&self, ctx: &RequestContext, form: CaseForm) -> Result<Case, CaseError>;

    /// Overwrites client name and status. Attachment slots without a new file
    /// keep their previous value.
    async fn update_case(
        &self,
        ctx: &RequestContext,
        id: CaseId,
        form: CaseForm,
    ) -> Result<Case, CaseError>;

    /// Deletes the case together with all of its proceedings.
    async fn delete_case(&self, ctx: &RequestContext, id: CaseId) -> Result<(), CaseError>;
}
