//! `SeaORM` implementation of the `ProceedingService` trait.

use async_trait::async_trait;
use tracing::info;

use crate::db::Store;
use crate::domain::{CaseId, ProceedingId, RequestContext};
use crate::models::{Proceeding, ProceedingFields, ProceedingInput};
use crate::services::proceeding_service::{ProceedingError, ProceedingService};

pub struct SeaOrmProceedingService {
    store: Store,
}

impl SeaOrmProceedingService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ProceedingService for SeaOrmProceedingService {
    async fn get_proceeding(
        &self,
        _ctx: &RequestContext,
        id: ProceedingId,
    ) -> Result<Proceeding, ProceedingError> {
        self.store
            .get_proceeding(id.value())
            .await?
            .ok_or(ProceedingError::NotFound(id))
    }

    async fn add_proceeding(
        &self,
        ctx: &RequestContext,
        case_id: CaseId,
        input: ProceedingInput,
    ) -> Result<Proceeding, ProceedingError> {
        if self.store.get_case(case_id.value()).await?.is_none() {
            return Err(ProceedingError::CaseNotFound(case_id));
        }

        let fields = ProceedingFields::try_from(input)?;
        let proceeding = self.store.insert_proceeding(case_id.value(), fields).await?;

        info!(
            user = %ctx.username,
            proceeding_id = %proceeding.id,
            "Proceeding added for case ID: {}",
            case_id
        );
        Ok(proceeding)
    }

    async fn update_proceeding(
        &self,
        ctx: &RequestContext,
        id: ProceedingId,
        input: ProceedingInput,
    ) -> Result<Proceeding, ProceedingError> {
        if self.store.get_proceeding(id.value()).await?.is_none() {
            return Err(ProceedingError::NotFound(id));
        }

        let fields = ProceedingFields::try_from(input)?;
        let proceeding = self
            .store
            .update_proceeding(id.value(), fields)
            .await?
            .ok_or(ProceedingError::NotFound(id))?;

        info!(user = %ctx.username, "Proceeding updated: {}", id);
        Ok(proceeding)
    }

    async fn delete_proceeding(
        &self,
        ctx: &RequestContext,
        id: ProceedingId,
    ) -> Result<(), ProceedingError> {
        if !self.store.delete_proceeding(id.value()).await? {
            return Err(ProceedingError::NotFound(id));
        }

        info!(user = %ctx.username, "Proceeding deleted: {}", id);
        Ok(())
    }
}
