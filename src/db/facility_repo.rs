// src/db/facility_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::facility::{Facility, StaffMember},
};

#[derive(Clone)]
pub struct FacilityRepository {
    pool: PgPool,
}

impl FacilityRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Reads (run on the main pool)
    // ---

    pub async fn list_all(&self) -> Result<Vec<Facility>, AppError> {
        let facilities = sqlx::query_as::<_, Facility>(
            "SELECT id, name, location, description, created_at, updated_at
             FROM facilities ORDER BY name ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(facilities)
    }

    /// Facilities the given user is linked to as staff.
    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Facility>, AppError> {
        let facilities = sqlx::query_as::<_, Facility>(
            r#"
            SELECT f.id, f.name, f.location, f.description, f.created_at, f.updated_at
            FROM facilities f
            INNER JOIN user_facilities uf ON f.id = uf.facility_id
            WHERE uf.user_id = $1
            ORDER BY f.name ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(facilities)
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<Facility>, AppError> {
        let facility = sqlx::query_as::<_, Facility>(
            "SELECT id, name, location, description, created_at, updated_at
             FROM facilities WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(facility)
    }

    // ---
    // Writes
    // ---

    pub async fn create(
        &self,
        name: &str,
        location: &str,
        description: Option<&str>,
    ) -> Result<Facility, AppError> {
        let facility = sqlx::query_as::<_, Facility>(
            r#"
            INSERT INTO facilities (name, location, description)
            VALUES ($1, $2, $3)
            RETURNING id, name, location, description, created_at, updated_at
            "#,
        )
        .bind(name)
        .bind(location)
        .bind(description)
        .fetch_one(&self.pool)
        .await?;
        Ok(facility)
    }

    /// Returns false when no row matched. Dependent assignments and staff
    /// links go away through the ON DELETE CASCADE constraints.
    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM facilities WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Idempotent: linking an already-linked user is a no-op.
    pub async fn add_staff(&self, facility_id: Uuid, user_id: Uuid) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO user_facilities (user_id, facility_id)
             VALUES ($1, $2)
             ON CONFLICT (user_id, facility_id) DO NOTHING",
        )
        .bind(user_id)
        .bind(facility_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_foreign_key_violation() {
                    return AppError::NotFound("User");
                }
            }
            e.into()
        })?;
        Ok(())
    }

    pub async fn remove_staff(&self, facility_id: Uuid, user_id: Uuid) -> Result<bool, AppError> {
        let result =
            sqlx::query("DELETE FROM user_facilities WHERE user_id = $1 AND facility_id = $2")
                .bind(user_id)
                .bind(facility_id)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    // ---
    // Eligibility (also used inside the auto-assign transaction)
    // ---

    /// Eligible cleaners of a facility, ordered by id ascending. The order
    /// is the rotation order, so it must be stable across calls.
    pub async fn eligible_cleaners<'e, E>(
        &self,
        executor: E,
        facility_id: Uuid,
    ) -> Result<Vec<StaffMember>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let staff = sqlx::query_as::<_, StaffMember>(
            r#"
            SELECT u.id, u.username, u.email, u.full_name
            FROM users u
            INNER JOIN user_facilities uf ON u.id = uf.user_id
            WHERE uf.facility_id = $1 AND u.role = 'user'
            ORDER BY u.id ASC
            "#,
        )
        .bind(facility_id)
        .fetch_all(executor)
        .await?;
        Ok(staff)
    }

    pub async fn is_eligible_cleaner<'e, E>(
        &self,
        executor: E,
        facility_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let eligible = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1
                FROM user_facilities uf
                JOIN users u ON u.id = uf.user_id
                WHERE uf.facility_id = $1 AND uf.user_id = $2 AND u.role = 'user'
            )
            "#,
        )
        .bind(facility_id)
        .bind(user_id)
        .fetch_one(executor)
        .await?;
        Ok(eligible)
    }
}
