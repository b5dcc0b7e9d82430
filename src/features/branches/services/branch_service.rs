use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::branches::dtos::{BranchDto, CreateBranchDto};
use crate::features::branches::models::Branch;

/// Service for the branch lookup table
pub struct BranchService {
    pool: PgPool,
}

impl BranchService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List all branches ordered by code
    pub async fn list(&self) -> Result<Vec<BranchDto>> {
        let branches = sqlx::query_as::<_, Branch>(
            "SELECT id, code, name, description, created_at FROM branches ORDER BY code",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list branches: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(branches.into_iter().map(Into::into).collect())
    }

    pub async fn create(&self, dto: CreateBranchDto) -> Result<BranchDto> {
        let branch = sqlx::query_as::<_, Branch>(
            r#"
            INSERT INTO branches (code, name, description)
            VALUES ($1, $2, $3)
            RETURNING id, code, name, description, created_at
            "#,
        )
        .bind(&dto.code)
        .bind(dto.name.trim())
        .bind(&dto.description)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::from_db(e, "A branch with this code already exists"))?;

        tracing::info!("Branch created: code={}", branch.code);
        Ok(branch.into())
    }

    /// Resolve branch ids, failing if any id is unknown
    pub async fn ensure_exist(&self, ids: &[Uuid]) -> Result<()> {
        if ids.is_empty() {
            return Ok(());
        }

        let found: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM branches WHERE id = ANY($1)")
                .bind(ids)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to check branches: {:?}", e);
                    AppError::Database(e)
                })?;

        let mut unique = ids.to_vec();
        unique.sort();
        unique.dedup();

        if found != unique.len() as i64 {
            return Err(AppError::BadRequest("Unknown branch selected".to_string()));
        }
        Ok(())
    }
}
