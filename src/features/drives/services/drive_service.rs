use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::companies::dtos::CompanySummaryDto;
use crate::features::drives::dtos::{CreateDriveDto, DriveDetailDto, DriveDto};
use crate::features::drives::models::DRIVE_WITH_COUNTS_SELECT;

/// Service for placement drives
pub struct DriveService {
    pool: PgPool,
}

impl DriveService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Every drive, latest start date first
    pub async fn list_all(&self) -> Result<Vec<DriveDto>> {
        sqlx::query_as::<_, DriveDto>(&format!(
            "{DRIVE_WITH_COUNTS_SELECT} ORDER BY d.start_date DESC, d.created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list placement drives: {:?}", e);
            AppError::Database(e)
        })
    }

    pub async fn list_active(&self) -> Result<Vec<DriveDto>> {
        sqlx::query_as::<_, DriveDto>(&format!(
            "{DRIVE_WITH_COUNTS_SELECT} WHERE d.is_active ORDER BY d.start_date DESC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list active placement drives: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn find(&self, drive_id: Uuid) -> Result<DriveDto> {
        sqlx::query_as::<_, DriveDto>(&format!("{DRIVE_WITH_COUNTS_SELECT} WHERE d.id = $1"))
            .bind(drive_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get placement drive: {:?}", e);
                AppError::Database(e)
            })?
            .ok_or_else(|| AppError::NotFound(format!("Placement drive '{}' not found", drive_id)))
    }

    /// Drive with its participating companies
    pub async fn detail(&self, drive_id: Uuid) -> Result<DriveDetailDto> {
        let drive = self.find(drive_id).await?;

        let companies = sqlx::query_as::<_, CompanySummaryDto>(
            r#"
            SELECT c.id, c.name, c.industry, c.location
            FROM companies c
            JOIN placement_drive_companies dc ON dc.company_id = c.id
            WHERE dc.drive_id = $1
            ORDER BY c.name
            "#,
        )
        .bind(drive_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list drive companies: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(DriveDetailDto { drive, companies })
    }

    /// Create an active drive owned by the calling admin
    pub async fn create(&self, admin_id: Uuid, dto: CreateDriveDto) -> Result<DriveDetailDto> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            tracing::error!("Failed to begin transaction: {:?}", e);
            AppError::Database(e)
        })?;

        let drive_id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO placement_drives (title, description, start_date, end_date, is_active, created_by)
            VALUES ($1, $2, $3, $4, TRUE, $5)
            RETURNING id
            "#,
        )
        .bind(dto.title.trim())
        .bind(&dto.description)
        .bind(dto.start_date)
        .bind(dto.end_date)
        .bind(admin_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create placement drive: {:?}", e);
            AppError::Database(e)
        })?;

        Self::insert_companies(&mut tx, drive_id, &dto.company_ids).await?;

        tx.commit().await.map_err(|e| {
            tracing::error!("Failed to commit transaction: {:?}", e);
            AppError::Database(e)
        })?;

        tracing::info!("Placement drive '{}' created: id={}", dto.title, drive_id);
        self.detail(drive_id).await
    }

    pub async fn add_company(&self, drive_id: Uuid, company_id: Uuid) -> Result<DriveDetailDto> {
        self.find(drive_id).await?;

        let mut tx = self.pool.begin().await.map_err(|e| {
            tracing::error!("Failed to begin transaction: {:?}", e);
            AppError::Database(e)
        })?;
        Self::insert_companies(&mut tx, drive_id, &[company_id]).await?;
        tx.commit().await.map_err(|e| {
            tracing::error!("Failed to commit transaction: {:?}", e);
            AppError::Database(e)
        })?;

        tracing::info!("Company {} added to drive {}", company_id, drive_id);
        self.detail(drive_id).await
    }

    pub async fn remove_company(&self, drive_id: Uuid, company_id: Uuid) -> Result<DriveDetailDto> {
        self.find(drive_id).await?;

        let removed = sqlx::query(
            "DELETE FROM placement_drive_companies WHERE drive_id = $1 AND company_id = $2",
        )
        .bind(drive_id)
        .bind(company_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to remove drive company: {:?}", e);
            AppError::Database(e)
        })?
        .rows_affected();

        if removed == 0 {
            return Err(AppError::NotFound(format!(
                "Company '{}' is not part of this drive",
                company_id
            )));
        }

        tracing::info!("Company {} removed from drive {}", company_id, drive_id);
        self.detail(drive_id).await
    }

    pub async fn set_active(&self, drive_id: Uuid, is_active: bool) -> Result<DriveDto> {
        let updated = sqlx::query(
            "UPDATE placement_drives SET is_active = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(drive_id)
        .bind(is_active)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update placement drive: {:?}", e);
            AppError::Database(e)
        })?
        .rows_affected();

        if updated == 0 {
            return Err(AppError::NotFound(format!(
                "Placement drive '{}' not found",
                drive_id
            )));
        }

        tracing::info!("Placement drive {} active={}", drive_id, is_active);
        self.find(drive_id).await
    }

    async fn insert_companies(
        tx: &mut Transaction<'_, Postgres>,
        drive_id: Uuid,
        company_ids: &[Uuid],
    ) -> Result<()> {
        if company_ids.is_empty() {
            return Ok(());
        }

        sqlx::query(
            r#"
            INSERT INTO placement_drive_companies (drive_id, company_id)
            SELECT $1, UNNEST($2::uuid[])
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(drive_id)
        .bind(company_ids)
        .execute(&mut **tx)
        .await
        .map_err(|e| AppError::from_db(e, "Company already part of this drive"))?;

        Ok(())
    }
}
