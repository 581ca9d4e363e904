//! `SeaORM` implementation of the `CaseService` trait.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

use crate::db::Store;
use crate::domain::{CaseId, RequestContext};
use crate::models::{Case, CaseAttachments, CaseFields, CaseWithProceedings};
use crate::services::case_service::{CaseError, CaseForm, CaseService};
use crate::services::upload::{PendingUploads, UploadStore};

pub struct SeaOrmCaseService {
    store: Store,
    uploads: Arc<UploadStore>,
}

impl SeaOrmCaseService {
    #[must_use]
    pub const fn new(store: Store, uploads: Arc<UploadStore>) -> Self {
        Self { store, uploads }
    }

    /// Writes pending files to disk. If the second write fails the first is
    /// removed again, so either both slots are stored or neither is.
    async fn store_files(&self, pending: PendingUploads) -> Result<CaseAttachments, CaseError> {
        let mut attachments = CaseAttachments::default();

        if let Some(file) = pending.case_file {
            attachments.case_file = Some(self.uploads.persist(file).await?);
        }

        if let Some(file) = pending.interim_orders_file {
            match self.uploads.persist(file).await {
                Ok(name) => attachments.interim_orders_file = Some(name),
                Err(e) => {
                    self.discard(&attachments).await;
                    return Err(e.into());
                }
            }
        }

        Ok(attachments)
    }

    async fn discard(&self, attachments: &CaseAttachments) {
        let names: Vec<String> = attachments.stored_names().map(str::to_string).collect();
        if !names.is_empty() {
            self.uploads.discard(&names).await;
        }
    }
}

#[async_trait]
impl CaseService for SeaOrmCaseService {
    async fn list_cases(&self, _ctx: &RequestContext) -> Result<Vec<Case>, CaseError> {
        Ok(self.store.list_cases().await?)
    }

    async fn get_case(&self, _ctx: &RequestContext, id: CaseId) -> Result<Case, CaseError> {
        self.store
            .get_case(id.value())
            .await?
            .ok_or(CaseError::NotFound(id))
    }

    async fn get_case_with_proceedings(
        &self,
        _ctx: &RequestContext,
        id: CaseId,
    ) -> Result<CaseWithProceedings, CaseError> {
        self.store
            .get_case_with_proceedings(id.value())
            .await?
            .ok_or(CaseError::NotFound(id))
    }

    async fn create_case(&self, ctx: &RequestContext, form: CaseForm) -> Result<Case, CaseError> {
        let fields = CaseFields::new(form.client_name, form.case_status)?;
        let attachments = self.store_files(form.uploads).await?;

        match self.store.insert_case(&fields, attachments.clone()).await {
            Ok(case) => {
                info!(
                    user = %ctx.username,
                    case_id = %case.id,
                    "Case added: {}",
                    case.client_name
                );
                Ok(case)
            }
            Err(e) => {
                self.discard(&attachments).await;
                Err(e.into())
            }
        }
    }

    async fn update_case(
        &self,
        ctx: &RequestContext,
        id: CaseId,
        form: CaseForm,
    ) -> Result<Case, CaseError> {
        let existing = self
            .store
            .get_case(id.value())
            .await?
            .ok_or(CaseError::NotFound(id))?;

        let fields = CaseFields::new(form.client_name, form.case_status)?;
        let attachments = self.store_files(form.uploads).await?;

        match self
            .store
            .update_case(id.value(), &fields, attachments.clone())
            .await
        {
            Ok(Some(case)) => {
                info!(
                    user = %ctx.username,
                    case_id = %case.id,
                    "Case updated: {}",
                    case.client_name
                );
                self.discard(&replaced_attachments(&existing, &attachments))
                    .await;
                Ok(case)
            }
            Ok(None) => {
                self.discard(&attachments).await;
                Err(CaseError::NotFound(id))
            }
            Err(e) => {
                self.discard(&attachments).await;
                Err(e.into())
            }
        }
    }

    async fn delete_case(&self, ctx: &RequestContext, id: CaseId) -> Result<(), CaseError> {
        let removed = self
            .store
            .delete_case_cascade(id.value())
            .await?
            .ok_or(CaseError::NotFound(id))?;

        info!(
            user = %ctx.username,
            case_id = %id,
            "Case deleted: {}",
            removed.client_name
        );

        let attachments = CaseAttachments {
            case_file: removed.case_file,
            interim_orders_file: removed.interim_orders_file,
        };
        self.discard(&attachments).await;

        Ok(())
    }
}

/// Previously stored files whose slot received a new upload.
fn replaced_attachments(existing: &Case, new: &CaseAttachments) -> CaseAttachments {
    CaseAttachments {
        case_file: new
            .case_file
            .as_ref()
            .and(existing.case_file.clone()),
        interim_orders_file: new
            .interim_orders_file
            .as_ref()
            .and(existing.interim_orders_file.clone()),
    }
}
