//! Domain service for proceedings (hearings and other dated events on a case).

use thiserror::Error;

use crate::domain::{CaseId, ProceedingId, RequestContext};
use crate::models::{Proceeding, ProceedingInput};
use crate::validation::ValidationError;

/// Errors specific to proceeding operations.
#[derive(Debug, Error)]
pub enum ProceedingError {
    #[error("Case not found: {0}")]
    CaseNotFound(CaseId),

    #[error("Proceeding not found: {0}")]
    NotFound(ProceedingId),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<ValidationError> for ProceedingError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err.0)
    }
}

impl From<sea_orm::DbErr> for ProceedingError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Storage(err.to_string())
    }
}

impl From<anyhow::Error> for ProceedingError {
    fn from(err: anyhow::Error) -> Self {
        Self::Storage(format!("{err:#}"))
    }
}

/// Domain service trait for proceedings.
#[async_trait::async_trait]
pub trait ProceedingService: Send + Sync {
    async fn get_proceeding(
        &self,
        ctx: &RequestContext,
        id: ProceedingId,
    ) -> Result<Proceeding, ProceedingError>;

    /// Adds a proceeding to an existing case.
    ///
    /// # Errors
    ///
    /// Returns [`ProceedingError::CaseNotFound`] if the case does not exist and
    /// [`ProceedingError::Validation`] if either date fails to parse.
    async fn add_proceeding(
        &self,
        ctx: &RequestContext,
        case_id: CaseId,
        input: ProceedingInput,
    ) -> Result<Proceeding, ProceedingError>;

    /// Replaces date, description and tentative date. A blank tentative date
    /// clears it.
    async fn update_proceeding(
        &self,
        ctx: &RequestContext,
        id: ProceedingId,
        input: ProceedingInput,
    ) -> Result<Proceeding, ProceedingError>;

    async fn delete_proceeding(
        &self,
        ctx: &RequestContext,
        id: ProceedingId,
    ) -> Result<(), ProceedingError>;
}
