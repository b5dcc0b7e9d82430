use std::sync::Arc;

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::students::dtos::{StudentProfileDto, UpsertStudentProfileDto};
use crate::features::students::models::{StudentProfile, PROFILE_COLUMNS};
use crate::features::students::resume::validate_resume;
use crate::modules::storage::ResumeStorage;
use crate::shared::constants::RESUME_CONTENT_TYPE;

/// Resume bytes ready to be sent as an attachment
#[derive(Debug)]
pub struct ResumeFile {
    pub file_name: String,
    pub data: Vec<u8>,
}

/// Service for student profiles and their resumes
pub struct StudentService {
    pool: PgPool,
    storage: Arc<dyn ResumeStorage>,
    resume_prefix: String,
}

impl StudentService {
    pub fn new(pool: PgPool, storage: Arc<dyn ResumeStorage>, resume_prefix: String) -> Self {
        Self {
            pool,
            storage,
            resume_prefix,
        }
    }

    pub async fn find_by_user(&self, user_id: Uuid) -> Result<Option<StudentProfile>> {
        sqlx::query_as::<_, StudentProfile>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM student_profiles WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get student profile: {:?}", e);
            AppError::Database(e)
        })
    }

    /// Profile of the caller, or `ProfileRequired` when it has not been created yet
    pub async fn require_profile(&self, user_id: Uuid) -> Result<StudentProfile> {
        self.find_by_user(user_id).await?.ok_or_else(|| {
            AppError::ProfileRequired("Please complete your profile first.".to_string())
        })
    }

    pub async fn get_own(&self, user_id: Uuid) -> Result<StudentProfileDto> {
        Ok(self.require_profile(user_id).await?.into())
    }

    /// Create or update the caller's profile.
    ///
    /// Returns the profile and whether it was newly created.
    pub async fn upsert(
        &self,
        user_id: Uuid,
        dto: UpsertStudentProfileDto,
    ) -> Result<(StudentProfileDto, bool)> {
        let existed = self.find_by_user(user_id).await?.is_some();

        let profile = sqlx::query_as::<_, StudentProfile>(&format!(
            r#"
            INSERT INTO student_profiles (
                user_id, enrollment_number, date_of_birth, gender, branch_code, year,
                cgpa, backlogs, tenth_percentage, twelfth_percentage, skills,
                certifications, projects
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            ON CONFLICT (user_id) DO UPDATE SET
                enrollment_number = EXCLUDED.enrollment_number,
                date_of_birth = EXCLUDED.date_of_birth,
                gender = EXCLUDED.gender,
                branch_code = EXCLUDED.branch_code,
                year = EXCLUDED.year,
                cgpa = EXCLUDED.cgpa,
                backlogs = EXCLUDED.backlogs,
                tenth_percentage = EXCLUDED.tenth_percentage,
                twelfth_percentage = EXCLUDED.twelfth_percentage,
                skills = EXCLUDED.skills,
                certifications = EXCLUDED.certifications,
                projects = EXCLUDED.projects,
                updated_at = NOW()
            RETURNING {PROFILE_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(&dto.enrollment_number)
        .bind(dto.date_of_birth)
        .bind(dto.gender)
        .bind(&dto.branch_code)
        .bind(dto.year)
        .bind(dto.cgpa)
        .bind(dto.backlogs)
        .bind(dto.tenth_percentage)
        .bind(dto.twelfth_percentage)
        .bind(dto.skills.trim())
        .bind(&dto.certifications)
        .bind(&dto.projects)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::from_db(e, "Enrollment number is already registered"))?;

        tracing::info!(
            "Student profile {}: id={}, enrollment={}",
            if existed { "updated" } else { "created" },
            profile.id,
            profile.enrollment_number
        );

        Ok((profile.into(), !existed))
    }

    /// Store a new resume for the caller, replacing the previous file
    pub async fn upload_resume(
        &self,
        user_id: Uuid,
        file_name: Option<&str>,
        content_type: Option<&str>,
        data: Vec<u8>,
    ) -> Result<StudentProfileDto> {
        let profile = self.require_profile(user_id).await?;
        validate_resume(file_name, content_type, &data)?;

        let key = format!("{}/{}/{}.pdf", self.resume_prefix, profile.id, Uuid::now_v7());
        self.storage.put(&key, data, RESUME_CONTENT_TYPE).await?;

        let updated = sqlx::query_as::<_, StudentProfile>(&format!(
            r#"
            UPDATE student_profiles
            SET resume_key = $2, resume_uploaded_at = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING {PROFILE_COLUMNS}
            "#
        ))
        .bind(profile.id)
        .bind(&key)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await;

        let updated = match updated {
            Ok(row) => row,
            Err(e) => {
                tracing::error!("Failed to record resume upload: {:?}", e);
                if let Err(cleanup) = self.storage.delete(&key).await {
                    tracing::warn!("Failed to remove unrecorded resume '{}': {}", key, cleanup);
                }
                return Err(AppError::Database(e));
            }
        };

        if let Some(previous) = profile.resume_key {
            if let Err(e) = self.storage.delete(&previous).await {
                tracing::warn!("Failed to delete replaced resume '{}': {}", previous, e);
            }
        }

        tracing::info!("Resume uploaded for student {}", updated.id);
        Ok(updated.into())
    }

    /// Resume of the calling student
    pub async fn download_own_resume(&self, user_id: Uuid) -> Result<ResumeFile> {
        let profile = self.require_profile(user_id).await?;
        self.load_resume(&profile).await
    }

    /// Resume of any student, by profile id (staff access)
    pub async fn download_resume(&self, student_id: Uuid) -> Result<ResumeFile> {
        let profile = sqlx::query_as::<_, StudentProfile>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM student_profiles WHERE id = $1"
        ))
        .bind(student_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get student profile by id: {:?}", e);
            AppError::Database(e)
        })?
        .ok_or_else(|| AppError::NotFound(format!("Student '{}' not found", student_id)))?;

        self.load_resume(&profile).await
    }

    async fn load_resume(&self, profile: &StudentProfile) -> Result<ResumeFile> {
        let key = profile
            .resume_key
            .as_deref()
            .ok_or_else(|| AppError::NotFound("No resume uploaded yet.".to_string()))?;

        let data = self.storage.get(key).await?;
        Ok(ResumeFile {
            file_name: profile.resume_download_name(),
            data,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::auth::model::UserRole;
    use crate::shared::test_helpers::{insert_student_profile, insert_user, MemoryStorage};
    use rust_decimal::Decimal;

    const PDF: &[u8] = b"%PDF-1.4\n1 0 obj\n<<>>\nendobj\n%%EOF";

    #[sqlx::test(migrations = "./migrations")]
    async fn test_upload_stores_object_and_replaces_previous(pool: PgPool) {
        let storage = Arc::new(MemoryStorage::default());
        let service = StudentService::new(pool.clone(), storage.clone(), "resumes".to_string());
        let user = insert_user(&pool, UserRole::Student).await;
        insert_student_profile(&pool, user, Decimal::new(800, 2)).await;

        service
            .upload_resume(user, Some("cv.pdf"), Some(RESUME_CONTENT_TYPE), PDF.to_vec())
            .await
            .unwrap();
        service
            .upload_resume(user, Some("cv-v2.pdf"), Some(RESUME_CONTENT_TYPE), PDF.to_vec())
            .await
            .unwrap();

        assert_eq!(storage.len(), 1);
        let profile = service.require_profile(user).await.unwrap();
        assert!(storage.contains(profile.resume_key.as_deref().unwrap()));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_failed_upload_record_removes_stored_object(pool: PgPool) {
        let storage = Arc::new(MemoryStorage::default());
        let service = StudentService::new(pool.clone(), storage.clone(), "resumes".to_string());
        let user = insert_user(&pool, UserRole::Student).await;
        insert_student_profile(&pool, user, Decimal::new(800, 2)).await;

        // make the UPDATE fail after the object is stored
        sqlx::query(
            "ALTER TABLE student_profiles ADD CONSTRAINT no_resumes CHECK (resume_key IS NULL)",
        )
        .execute(&pool)
        .await
        .unwrap();

        let result = service
            .upload_resume(user, Some("cv.pdf"), Some(RESUME_CONTENT_TYPE), PDF.to_vec())
            .await;
        assert!(matches!(result, Err(AppError::Database(_))));
        assert_eq!(storage.len(), 0);
    }
}
