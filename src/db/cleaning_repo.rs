// src/db/cleaning_repo.rs

use chrono::NaiveDate;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::cleaning::{
        AssignmentStatus, AssignmentSummary, ChecklistArea, ChecklistItem,
        ChecklistItemWithAssignee, CleaningAssignment,
    },
};

const ASSIGNMENT_COLUMNS: &str = "id, facility_id, assigned_user_id, scheduled_date, status, \
                                  started_at, completed_at, created_at";

#[derive(Clone)]
pub struct CleaningRepository {
    pool: PgPool,
}

impl CleaningRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Read side (summaries and checklists, run on the main pool)
    // ---

    /// Assignments of a facility with their checklist completion counts,
    /// newest scheduled date first. Both range bounds are applied only
    /// when present.
    pub async fn list_summaries(
        &self,
        facility_id: Uuid,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<AssignmentSummary>, AppError> {
        let summaries = sqlx::query_as::<_, AssignmentSummary>(
            r#"
            SELECT
                ca.id, ca.facility_id, ca.assigned_user_id, ca.scheduled_date,
                ca.status, ca.started_at, ca.completed_at, ca.created_at,
                u.username AS cleaner_name,
                u.email AS cleaner_email,
                COUNT(cci.id) FILTER (WHERE cci.is_completed) AS completed_items,
                COUNT(cci.id) AS total_items
            FROM cleaning_assignments ca
            LEFT JOIN users u ON ca.assigned_user_id = u.id
            LEFT JOIN cleaning_checklist_items cci ON ca.id = cci.assignment_id
            WHERE ca.facility_id = $1
              AND ($2::date IS NULL OR ca.scheduled_date >= $2)
              AND ($3::date IS NULL OR ca.scheduled_date <= $3)
            GROUP BY ca.id, u.username, u.email
            ORDER BY ca.scheduled_date DESC
            "#,
        )
        .bind(facility_id)
        .bind(start_date)
        .bind(end_date)
        .fetch_all(&self.pool)
        .await?;
        Ok(summaries)
    }

    pub async fn get_summary(&self, id: Uuid) -> Result<Option<AssignmentSummary>, AppError> {
        let summary = sqlx::query_as::<_, AssignmentSummary>(
            r#"
            SELECT
                ca.id, ca.facility_id, ca.assigned_user_id, ca.scheduled_date,
                ca.status, ca.started_at, ca.completed_at, ca.created_at,
                u.username AS cleaner_name,
                u.email AS cleaner_email,
                COUNT(cci.id) FILTER (WHERE cci.is_completed) AS completed_items,
                COUNT(cci.id) AS total_items
            FROM cleaning_assignments ca
            LEFT JOIN users u ON ca.assigned_user_id = u.id
            LEFT JOIN cleaning_checklist_items cci ON ca.id = cci.assignment_id
            WHERE ca.id = $1
            GROUP BY ca.id, u.username, u.email
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(summary)
    }

    pub async fn checklist_for(&self, assignment_id: Uuid) -> Result<Vec<ChecklistItem>, AppError> {
        let items = sqlx::query_as::<_, ChecklistItem>(
            r#"
            SELECT id, assignment_id, area, task_name, is_completed, photo_url,
                   completed_at, created_at
            FROM cleaning_checklist_items
            WHERE assignment_id = $1
            ORDER BY area, id
            "#,
        )
        .bind(assignment_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    pub async fn get_item_with_assignee(
        &self,
        item_id: Uuid,
    ) -> Result<Option<ChecklistItemWithAssignee>, AppError> {
        let item = sqlx::query_as::<_, ChecklistItemWithAssignee>(
            r#"
            SELECT cci.id, cci.assignment_id, cci.area, cci.task_name, cci.is_completed,
                   cci.photo_url, cci.completed_at, cci.created_at, ca.assigned_user_id
            FROM cleaning_checklist_items cci
            JOIN cleaning_assignments ca ON cci.assignment_id = ca.id
            WHERE cci.id = $1
            "#,
        )
        .bind(item_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(item)
    }

    // ---
    // Rotation inputs (run inside the auto-assign transaction)
    // ---

    pub async fn get_assignment<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<CleaningAssignment>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let assignment = sqlx::query_as::<_, CleaningAssignment>(&format!(
            "SELECT {ASSIGNMENT_COLUMNS} FROM cleaning_assignments WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(executor)
        .await?;
        Ok(assignment)
    }

    pub async fn find_by_date<'e, E>(
        &self,
        executor: E,
        facility_id: Uuid,
        scheduled_date: NaiveDate,
    ) -> Result<Option<CleaningAssignment>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let assignment = sqlx::query_as::<_, CleaningAssignment>(&format!(
            "SELECT {ASSIGNMENT_COLUMNS} FROM cleaning_assignments
             WHERE facility_id = $1 AND scheduled_date = $2"
        ))
        .bind(facility_id)
        .bind(scheduled_date)
        .fetch_optional(executor)
        .await?;
        Ok(assignment)
    }

    /// Most recently scheduled assignment of the facility. The rotation
    /// cursor is re-derived from this row on every invocation instead of
    /// being stored anywhere.
    pub async fn latest_for_facility<'e, E>(
        &self,
        executor: E,
        facility_id: Uuid,
    ) -> Result<Option<CleaningAssignment>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let assignment = sqlx::query_as::<_, CleaningAssignment>(&format!(
            "SELECT {ASSIGNMENT_COLUMNS} FROM cleaning_assignments
             WHERE facility_id = $1
             ORDER BY scheduled_date DESC
             LIMIT 1"
        ))
        .bind(facility_id)
        .fetch_optional(executor)
        .await?;
        Ok(assignment)
    }

    pub async fn occupied_dates<'e, E>(
        &self,
        executor: E,
        facility_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<NaiveDate>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let dates = sqlx::query_scalar::<_, NaiveDate>(
            "SELECT scheduled_date FROM cleaning_assignments
             WHERE facility_id = $1 AND scheduled_date BETWEEN $2 AND $3",
        )
        .bind(facility_id)
        .bind(from)
        .bind(to)
        .fetch_all(executor)
        .await?;
        Ok(dates)
    }

    // ---
    // Writes (transactional: the service passes `&mut *tx`)
    // ---

    pub async fn insert_assignment<'e, E>(
        &self,
        executor: E,
        facility_id: Uuid,
        assigned_user_id: Uuid,
        scheduled_date: NaiveDate,
    ) -> Result<CleaningAssignment, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, CleaningAssignment>(&format!(
            "INSERT INTO cleaning_assignments (facility_id, assigned_user_id, scheduled_date)
             VALUES ($1, $2, $3)
             RETURNING {ASSIGNMENT_COLUMNS}"
        ))
        .bind(facility_id)
        .bind(assigned_user_id)
        .bind(scheduled_date)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                // UNIQUE (facility_id, scheduled_date): a concurrent caller
                // created this date first.
                if db_err.is_unique_violation() {
                    return AppError::Conflict;
                }
            }
            e.into()
        })
    }

    /// Override path: only the assignee changes. Status, timestamps and
    /// checklist progress stay untouched.
    pub async fn update_assignee<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        assigned_user_id: Uuid,
    ) -> Result<CleaningAssignment, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let assignment = sqlx::query_as::<_, CleaningAssignment>(&format!(
            "UPDATE cleaning_assignments SET assigned_user_id = $2
             WHERE id = $1
             RETURNING {ASSIGNMENT_COLUMNS}"
        ))
        .bind(id)
        .bind(assigned_user_id)
        .fetch_one(executor)
        .await?;
        Ok(assignment)
    }

    pub async fn insert_item<'e, E>(
        &self,
        executor: E,
        assignment_id: Uuid,
        area: ChecklistArea,
        task_name: &str,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            "INSERT INTO cleaning_checklist_items (assignment_id, area, task_name)
             VALUES ($1, $2, $3)",
        )
        .bind(assignment_id)
        .bind(area)
        .bind(task_name)
        .execute(executor)
        .await?;
        Ok(())
    }

    pub async fn set_status<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        status: AssignmentStatus,
        stamp_started: bool,
        stamp_completed: bool,
    ) -> Result<CleaningAssignment, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let assignment = sqlx::query_as::<_, CleaningAssignment>(&format!(
            "UPDATE cleaning_assignments
             SET status = $2,
                 started_at = CASE WHEN $3 THEN now() ELSE started_at END,
                 completed_at = CASE WHEN $4 THEN now() ELSE completed_at END
             WHERE id = $1
             RETURNING {ASSIGNMENT_COLUMNS}"
        ))
        .bind(id)
        .bind(status)
        .bind(stamp_started)
        .bind(stamp_completed)
        .fetch_one(executor)
        .await?;
        Ok(assignment)
    }

    /// Toggling off also clears the photo reference and completion time.
    pub async fn set_item_completed<'e, E>(
        &self,
        executor: E,
        item_id: Uuid,
        completed: bool,
    ) -> Result<ChecklistItem, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let query = if completed {
            "UPDATE cleaning_checklist_items
             SET is_completed = TRUE, completed_at = now()
             WHERE id = $1
             RETURNING id, assignment_id, area, task_name, is_completed, photo_url,
                       completed_at, created_at"
        } else {
            "UPDATE cleaning_checklist_items
             SET is_completed = FALSE, completed_at = NULL, photo_url = NULL
             WHERE id = $1
             RETURNING id, assignment_id, area, task_name, is_completed, photo_url,
                       completed_at, created_at"
        };
        let item = sqlx::query_as::<_, ChecklistItem>(query)
            .bind(item_id)
            .fetch_one(executor)
            .await?;
        Ok(item)
    }

    /// Attaching photo evidence implicitly completes the item.
    pub async fn attach_photo<'e, E>(
        &self,
        executor: E,
        item_id: Uuid,
        photo_url: &str,
    ) -> Result<ChecklistItem, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let item = sqlx::query_as::<_, ChecklistItem>(
            "UPDATE cleaning_checklist_items
             SET photo_url = $2, is_completed = TRUE, completed_at = now()
             WHERE id = $1
             RETURNING id, assignment_id, area, task_name, is_completed, photo_url,
                       completed_at, created_at",
        )
        .bind(item_id)
        .bind(photo_url)
        .fetch_one(executor)
        .await?;
        Ok(item)
    }
}
