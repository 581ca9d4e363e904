use crate::entities::{cases, prelude::*, proceedings};
use crate::models::{Case, CaseAttachments, CaseFields, CaseWithProceedings, Proceeding};
use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use tracing::info;

pub struct CaseRepository {
    conn: DatabaseConnection,
}

impl CaseRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Newest first; cases created in the same instant fall back to id order.
    pub async fn list_all(&self) -> Result<Vec<Case>> {
        let rows = Cases::find()
            .order_by_desc(cases::Column::DateCreated)
            .order_by_desc(cases::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list cases")?;

        Ok(rows.into_iter().map(Case::from).collect())
    }

    pub async fn get(&self, id: i32) -> Result<Option<Case>> {
        let row = Cases::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query case by ID")?;

        Ok(row.map(Case::from))
    }

    pub async fn get_with_proceedings(&self, id: i32) -> Result<Option<CaseWithProceedings>> {
        let Some(case) = self.get(id).await? else {
            return Ok(None);
        };

        let proceedings = Proceedings::find()
            .filter(proceedings::Column::CaseId.eq(id))
            .order_by_asc(proceedings::Column::ProceedingDate)
            .order_by_asc(proceedings::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to query proceedings for case")?;

        Ok(Some(CaseWithProceedings {
            case,
            proceedings: proceedings.into_iter().map(Proceeding::from).collect(),
        }))
    }

    pub async fn insert(&self, fields: &CaseFields, attachments: CaseAttachments) -> Result<Case> {
        let active_model = cases::ActiveModel {
            client_name: Set(fields.client_name().to_string()),
            case_status: Set(fields.case_status().to_string()),
            date_created: Set(chrono::Utc::now()),
            case_file: Set(attachments.case_file),
            interim_orders_file: Set(attachments.interim_orders_file),
            ..Default::default()
        };

        let model = active_model
            .insert(&self.conn)
            .await
            .context("Failed to insert case")?;

        Ok(Case::from(model))
    }

    /// Overwrites the text fields; attachment slots change only when a new
    /// filename is supplied. Returns `None` if the case does not exist.
    pub async fn update(
        &self,
        id: i32,
        fields: &CaseFields,
        attachments: CaseAttachments,
    ) -> Result<Option<Case>> {
        let Some(existing) = Cases::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query case for update")?
        else {
            return Ok(None);
        };

        let mut active: cases::ActiveModel = existing.into();
        active.client_name = Set(fields.client_name().to_string());
        active.case_status = Set(fields.case_status().to_string());
        if let Some(case_file) = attachments.case_file {
            active.case_file = Set(Some(case_file));
        }
        if let Some(interim_orders_file) = attachments.interim_orders_file {
            active.interim_orders_file = Set(Some(interim_orders_file));
        }

        let model = active
            .update(&self.conn)
            .await
            .context("Failed to update case")?;

        Ok(Some(Case::from(model)))
    }

    /// Deletes the case and all of its proceedings in one transaction.
    /// Returns the removed case, or `None` if it did not exist.
    pub async fn delete_cascade(&self, id: i32) -> Result<Option<Case>> {
        let txn = self.conn.begin().await?;

        let Some(existing) = Cases::find_by_id(id).one(&txn).await? else {
            txn.rollback().await?;
            return Ok(None);
        };

        let removed_proceedings = Proceedings::delete_many()
            .filter(proceedings::Column::CaseId.eq(id))
            .exec(&txn)
            .await?;

        Cases::delete_by_id(id).exec(&txn).await?;

        txn.commit().await.context("Failed to commit case deletion")?;

        info!(
            "Removed case {} with {} proceeding(s)",
            id, removed_proceedings.rows_affected
        );
        Ok(Some(Case::from(existing)))
    }
}
