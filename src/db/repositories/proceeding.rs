use crate::entities::{prelude::*, proceedings};
use crate::models::{Proceeding, ProceedingFields};
use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    Set,
};

/// Repository for proceeding operations
pub struct ProceedingRepository {
    conn: DatabaseConnection,
}

impl ProceedingRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn get(&self, id: i32) -> Result<Option<Proceeding>> {
        let row = Proceedings::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query proceeding by ID")?;

        Ok(row.map(Proceeding::from))
    }

    pub async fn insert(&self, case_id: i32, fields: ProceedingFields) -> Result<Proceeding> {
        let active_model = proceedings::ActiveModel {
            case_id: Set(case_id),
            proceeding_date: Set(fields.proceeding_date),
            description: Set(fields.description),
            tentative_date: Set(fields.tentative_date),
            ..Default::default()
        };

        let model = active_model
            .insert(&self.conn)
            .await
            .context("Failed to insert proceeding")?;

        Ok(Proceeding::from(model))
    }

    /// Full overwrite of the mutable fields, including clearing the tentative date.
    pub async fn update(&self, id: i32, fields: ProceedingFields) -> Result<Option<Proceeding>> {
        let Some(existing) = Proceedings::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query proceeding for update")?
        else {
            return Ok(None);
        };

        let mut active: proceedings::ActiveModel = existing.into();
        active.proceeding_date = Set(fields.proceeding_date);
        active.description = Set(fields.description);
        active.tentative_date = Set(fields.tentative_date);

        let model = active
            .update(&self.conn)
            .await
            .context("Failed to update proceeding")?;

        Ok(Some(Proceeding::from(model)))
    }

    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = Proceedings::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("Failed to delete proceeding")?;

        Ok(result.rows_affected > 0)
    }

    pub async fn count_for_case(&self, case_id: i32) -> Result<u64> {
        let count = Proceedings::find()
            .filter(proceedings::Column::CaseId.eq(case_id))
            .count(&self.conn)
            .await?;

        Ok(count)
    }
}
