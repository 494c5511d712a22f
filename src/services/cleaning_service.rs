// src/services/cleaning_service.rs

use std::collections::HashSet;

use chrono::{Local, NaiveDate};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{CleaningRepository, FacilityRepository},
    models::{
        auth::{User, UserRole},
        cleaning::{
            AreaProgress, AssignmentDetail, AssignmentStatus, AssignmentSummary, ChecklistItem,
            CleaningAssignment, CreatedAssignment,
        },
    },
    services::{checklist, rotation},
};

use crate::models::cleaning::AutoAssignResult;

#[derive(Clone)]
pub struct CleaningService {
    cleaning_repo: CleaningRepository,
    facility_repo: FacilityRepository,
    pool: PgPool,
}

impl CleaningService {
    pub fn new(
        cleaning_repo: CleaningRepository,
        facility_repo: FacilityRepository,
        pool: PgPool,
    ) -> Self {
        Self {
            cleaning_repo,
            facility_repo,
            pool,
        }
    }

    // ---
    // Read side
    // ---

    pub async fn get_assignments(
        &self,
        facility_id: Uuid,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<AssignmentSummary>, AppError> {
        if let (Some(start), Some(end)) = (start_date, end_date) {
            if start > end {
                return Err(AppError::InvalidInput(
                    "startDate must not be after endDate".to_string(),
                ));
            }
        }
        self.cleaning_repo
            .list_summaries(facility_id, start_date, end_date)
            .await
    }

    pub async fn get_assignment(&self, id: Uuid) -> Result<AssignmentDetail, AppError> {
        let summary = self
            .cleaning_repo
            .get_summary(id)
            .await?
            .ok_or(AppError::NotFound("Assignment"))?;
        let checklist = self.cleaning_repo.checklist_for(id).await?;
        let areas = area_progress(&checklist);
        let percent = completion_percent(
            checklist.iter().filter(|i| i.is_completed).count(),
            checklist.len(),
        );

        Ok(AssignmentDetail {
            assignment: summary,
            checklist,
            areas,
            percent,
        })
    }

    // ---
    // Manual assignment (create-or-override, single date)
    // ---

    pub async fn create_or_override(
        &self,
        caller: &User,
        facility_id: Uuid,
        assignee_id: Uuid,
        scheduled_date: NaiveDate,
    ) -> Result<AssignmentSummary, AppError> {
        if !caller.role.can_manage() {
            return Err(AppError::Forbidden(
                "only managers and administrators can create assignments",
            ));
        }
        self.facility_repo
            .get_by_id(facility_id)
            .await?
            .ok_or(AppError::NotFound("Facility"))?;
        if !self
            .facility_repo
            .is_eligible_cleaner(&self.pool, facility_id, assignee_id)
            .await?
        {
            return Err(AppError::IneligibleAssignee);
        }

        let assignment_id = match self
            .assign_date(facility_id, assignee_id, scheduled_date)
            .await
        {
            // Lost the check-then-create race: the row exists now, so take
            // the override path once before giving up.
            Err(AppError::Conflict) => {
                let existing = self
                    .cleaning_repo
                    .find_by_date(&self.pool, facility_id, scheduled_date)
                    .await?
                    .ok_or(AppError::Conflict)?;
                self.cleaning_repo
                    .update_assignee(&self.pool, existing.id, assignee_id)
                    .await?
                    .id
            }
            other => other?,
        };

        self.cleaning_repo
            .get_summary(assignment_id)
            .await?
            .ok_or(AppError::NotFound("Assignment"))
    }

    /// Create-or-override for one date. Creation and checklist seeding are
    /// one failure domain: an assignment row is never left without its
    /// full checklist.
    async fn assign_date(
        &self,
        facility_id: Uuid,
        assignee_id: Uuid,
        scheduled_date: NaiveDate,
    ) -> Result<Uuid, AppError> {
        let mut tx = self.pool.begin().await?;

        let assignment_id = if let Some(existing) = self
            .cleaning_repo
            .find_by_date(&mut *tx, facility_id, scheduled_date)
            .await?
        {
            // Override keeps status and checklist progress.
            self.cleaning_repo
                .update_assignee(&mut *tx, existing.id, assignee_id)
                .await?
                .id
        } else {
            let created = self
                .cleaning_repo
                .insert_assignment(&mut *tx, facility_id, assignee_id, scheduled_date)
                .await?;
            self.seed_checklist(&mut tx, created.id).await?;
            created.id
        };

        tx.commit().await?;
        Ok(assignment_id)
    }

    // ---
    // Auto-assignment over the 7-day window
    // ---

    pub async fn auto_assign(
        &self,
        caller: &User,
        facility_id: Uuid,
    ) -> Result<AutoAssignResult, AppError> {
        if !caller.role.can_manage() {
            return Err(AppError::Forbidden(
                "only managers and administrators can auto-assign",
            ));
        }
        self.facility_repo
            .get_by_id(facility_id)
            .await?
            .ok_or(AppError::NotFound("Facility"))?;

        let today = Local::now().date_naive();
        match self.auto_assign_window(facility_id, today).await {
            // A concurrent invocation won the race for some date. The
            // whole batch rolled back; one re-run sees that date as
            // occupied and skips it.
            Err(AppError::Conflict) => self.auto_assign_window(facility_id, today).await,
            other => other,
        }
    }

    /// One transaction for the whole window: either every newly planned
    /// date is created with its checklist, or none is.
    async fn auto_assign_window(
        &self,
        facility_id: Uuid,
        today: NaiveDate,
    ) -> Result<AutoAssignResult, AppError> {
        let window = rotation::window_from(today);
        let mut tx = self.pool.begin().await?;

        let staff = self
            .facility_repo
            .eligible_cleaners(&mut *tx, facility_id)
            .await?;
        let last_assignee = self
            .cleaning_repo
            .latest_for_facility(&mut *tx, facility_id)
            .await?
            .map(|a| a.assigned_user_id);
        let occupied: HashSet<NaiveDate> = self
            .cleaning_repo
            .occupied_dates(&mut *tx, facility_id, window[0], window[window.len() - 1])
            .await?
            .into_iter()
            .collect();

        let plan = rotation::plan_window(&window, &occupied, &staff, last_assignee)?;

        let mut created = Vec::with_capacity(plan.len());
        for planned in plan {
            let assignment = self
                .cleaning_repo
                .insert_assignment(
                    &mut *tx,
                    facility_id,
                    planned.assignee.id,
                    planned.scheduled_date,
                )
                .await?;
            self.seed_checklist(&mut tx, assignment.id).await?;
            created.push(CreatedAssignment {
                id: assignment.id,
                scheduled_date: assignment.scheduled_date,
                assigned_user_id: planned.assignee.id,
                cleaner_name: planned.assignee.username,
            });
        }

        tx.commit().await?;
        tracing::info!(
            facility_id = %facility_id,
            created = created.len(),
            "auto-assign window populated"
        );
        Ok(AutoAssignResult {
            created: created.len(),
            assignments: created,
        })
    }

    async fn seed_checklist(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        assignment_id: Uuid,
    ) -> Result<(), AppError> {
        for (area, task_name) in checklist::template() {
            self.cleaning_repo
                .insert_item(&mut **tx, assignment_id, area, task_name)
                .await?;
        }
        Ok(())
    }

    // ---
    // Status transitions and checklist mutation
    // ---

    pub async fn set_status(
        &self,
        caller: &User,
        id: Uuid,
        status: AssignmentStatus,
    ) -> Result<CleaningAssignment, AppError> {
        let assignment = self
            .cleaning_repo
            .get_assignment(&self.pool, id)
            .await?
            .ok_or(AppError::NotFound("Assignment"))?;
        ensure_assignee_or_admin(caller, assignment.assigned_user_id)?;

        // started_at is stamped by the first in_progress transition only;
        // completed_at on every transition to completed.
        let stamp_started =
            status == AssignmentStatus::InProgress && assignment.started_at.is_none();
        let stamp_completed = status == AssignmentStatus::Completed;

        self.cleaning_repo
            .set_status(&self.pool, id, status, stamp_started, stamp_completed)
            .await
    }

    pub async fn toggle_checklist_item(
        &self,
        caller: &User,
        item_id: Uuid,
    ) -> Result<ChecklistItem, AppError> {
        let item = self
            .cleaning_repo
            .get_item_with_assignee(item_id)
            .await?
            .ok_or(AppError::NotFound("Checklist item"))?;
        ensure_assignee_or_admin(caller, item.assigned_user_id)?;

        self.cleaning_repo
            .set_item_completed(&self.pool, item_id, !item.is_completed)
            .await
    }

    pub async fn attach_photo(
        &self,
        caller: &User,
        item_id: Uuid,
        photo_url: &str,
    ) -> Result<ChecklistItem, AppError> {
        let item = self
            .cleaning_repo
            .get_item_with_assignee(item_id)
            .await?
            .ok_or(AppError::NotFound("Checklist item"))?;
        ensure_assignee_or_admin(caller, item.assigned_user_id)?;

        self.cleaning_repo
            .attach_photo(&self.pool, item_id, photo_url)
            .await
    }
}

fn ensure_assignee_or_admin(caller: &User, assigned_user_id: Uuid) -> Result<(), AppError> {
    if caller.id != assigned_user_id && caller.role != UserRole::Administrator {
        return Err(AppError::Forbidden(
            "only the assigned cleaner or an administrator can update this assignment",
        ));
    }
    Ok(())
}

// ---
// Progress aggregation (read-only, pure)
// ---

pub(crate) fn completion_percent(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    ((completed * 100 + total / 2) / total) as u8
}

fn area_progress(items: &[ChecklistItem]) -> Vec<AreaProgress> {
    checklist::AREAS
        .into_iter()
        .map(|area| {
            let total = items.iter().filter(|i| i.area == area).count();
            let completed = items
                .iter()
                .filter(|i| i.area == area && i.is_completed)
                .count();
            AreaProgress {
                area,
                completed_items: completed as i64,
                total_items: total as i64,
                percent: completion_percent(completed, total),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use crate::models::cleaning::ChecklistArea;

    fn item(area: ChecklistArea, completed: bool) -> ChecklistItem {
        ChecklistItem {
            id: Uuid::new_v4(),
            assignment_id: Uuid::new_v4(),
            area,
            task_name: "task".to_string(),
            is_completed: completed,
            photo_url: None,
            completed_at: completed.then(Utc::now),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn percent_is_zero_for_empty_checklist() {
        assert_eq!(completion_percent(0, 0), 0);
    }

    #[test]
    fn percent_is_exact_for_half_done() {
        assert_eq!(completion_percent(10, 20), 50);
    }

    #[test]
    fn percent_rounds_to_nearest() {
        assert_eq!(completion_percent(5, 19), 26); // 26.3 rounds down
        assert_eq!(completion_percent(2, 3), 67); // 66.7 rounds up
        assert_eq!(completion_percent(19, 19), 100);
    }

    #[test]
    fn area_progress_scopes_counts_to_each_area() {
        let items = vec![
            item(ChecklistArea::LivingArea, true),
            item(ChecklistArea::LivingArea, false),
            item(ChecklistArea::Bathroom, true),
            item(ChecklistArea::Bathroom, true),
            item(ChecklistArea::Bedroom, false),
        ];

        let progress = area_progress(&items);
        assert_eq!(progress.len(), 3);

        let living = &progress[0];
        assert_eq!(living.area, ChecklistArea::LivingArea);
        assert_eq!((living.completed_items, living.total_items), (1, 2));
        assert_eq!(living.percent, 50);

        let bathroom = &progress[1];
        assert_eq!((bathroom.completed_items, bathroom.total_items), (2, 2));
        assert_eq!(bathroom.percent, 100);

        let bedroom = &progress[2];
        assert_eq!((bedroom.completed_items, bedroom.total_items), (0, 1));
        assert_eq!(bedroom.percent, 0);
    }

    #[test]
    fn area_progress_reports_empty_areas_as_zero() {
        let progress = area_progress(&[]);
        assert!(progress.iter().all(|p| p.percent == 0 && p.total_items == 0));
    }

    // ---
    // Database-backed tests (each gets a fresh database with the
    // migrations applied)
    // ---

    fn service(pool: &PgPool) -> CleaningService {
        CleaningService::new(
            CleaningRepository::new(pool.clone()),
            FacilityRepository::new(pool.clone()),
            pool.clone(),
        )
    }

    fn admin_caller() -> User {
        User {
            id: Uuid::new_v4(),
            emp_id: None,
            username: "admin".to_string(),
            email: "admin@example.com".to_string(),
            full_name: None,
            role: UserRole::Administrator,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    async fn seed_user(pool: &PgPool, name: &str, role: UserRole) -> Uuid {
        sqlx::query_scalar::<_, Uuid>(
            "INSERT INTO users (username, email, role) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(name)
        .bind(format!("{name}@example.com"))
        .bind(role)
        .fetch_one(pool)
        .await
        .unwrap()
    }

    async fn seed_facility(pool: &PgPool) -> Uuid {
        sqlx::query_scalar::<_, Uuid>(
            "INSERT INTO facilities (name, location) VALUES ('Northside Clinic', 'North Ave 12')
             RETURNING id",
        )
        .fetch_one(pool)
        .await
        .unwrap()
    }

    async fn link_staff(pool: &PgPool, facility_id: Uuid, user_id: Uuid) {
        sqlx::query("INSERT INTO user_facilities (user_id, facility_id) VALUES ($1, $2)")
            .bind(user_id)
            .bind(facility_id)
            .execute(pool)
            .await
            .unwrap();
    }

    async fn assignment_rows_for_date(
        pool: &PgPool,
        facility_id: Uuid,
        date: NaiveDate,
    ) -> i64 {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM cleaning_assignments
             WHERE facility_id = $1 AND scheduled_date = $2",
        )
        .bind(facility_id)
        .bind(date)
        .fetch_one(pool)
        .await
        .unwrap()
    }

    #[sqlx::test]
    async fn manual_override_preserves_checklist_progress(pool: PgPool) {
        let svc = service(&pool);
        let caller = admin_caller();
        let facility = seed_facility(&pool).await;
        let first = seed_user(&pool, "alice", UserRole::User).await;
        let second = seed_user(&pool, "bob", UserRole::User).await;
        link_staff(&pool, facility, first).await;
        link_staff(&pool, facility, second).await;

        let date = NaiveDate::from_ymd_opt(2026, 9, 1).unwrap();
        let created = svc
            .create_or_override(&caller, facility, first, date)
            .await
            .unwrap();
        assert_eq!(created.assigned_user_id, first);
        assert_eq!(created.total_items, 19);

        // Complete 5 of the 19 items before handing the duty over.
        let repo = CleaningRepository::new(pool.clone());
        let items = repo.checklist_for(created.id).await.unwrap();
        for item in items.iter().take(5) {
            repo.set_item_completed(&pool, item.id, true).await.unwrap();
        }

        let overridden = svc
            .create_or_override(&caller, facility, second, date)
            .await
            .unwrap();

        // Same row, new assignee, progress and status untouched.
        assert_eq!(overridden.id, created.id);
        assert_eq!(overridden.assigned_user_id, second);
        assert_eq!(overridden.completed_items, 5);
        assert_eq!(overridden.total_items, 19);
        assert_eq!(overridden.status, AssignmentStatus::Pending);
        assert!(overridden.started_at.is_none());
        assert_eq!(assignment_rows_for_date(&pool, facility, date).await, 1);
    }

    #[sqlx::test]
    async fn ineligible_assignee_is_rejected_without_a_row(pool: PgPool) {
        let svc = service(&pool);
        let caller = admin_caller();
        let facility = seed_facility(&pool).await;
        // Exists, but never linked to the facility.
        let unlinked = seed_user(&pool, "carol", UserRole::User).await;

        let date = NaiveDate::from_ymd_opt(2026, 9, 1).unwrap();
        let result = svc.create_or_override(&caller, facility, unlinked, date).await;

        assert!(matches!(result, Err(AppError::IneligibleAssignee)));
        assert_eq!(assignment_rows_for_date(&pool, facility, date).await, 0);
    }

    #[sqlx::test]
    async fn linked_user_without_cleaner_role_is_rejected(pool: PgPool) {
        let svc = service(&pool);
        let caller = admin_caller();
        let facility = seed_facility(&pool).await;
        // Linked as staff, but a manager is not in the cleaner pool.
        let manager = seed_user(&pool, "dave", UserRole::Manager).await;
        link_staff(&pool, facility, manager).await;

        let date = NaiveDate::from_ymd_opt(2026, 9, 1).unwrap();
        let result = svc.create_or_override(&caller, facility, manager, date).await;

        assert!(matches!(result, Err(AppError::IneligibleAssignee)));
        assert_eq!(assignment_rows_for_date(&pool, facility, date).await, 0);
    }

    #[sqlx::test]
    async fn racing_creates_for_one_date_leave_a_single_row(pool: PgPool) {
        let svc = service(&pool);
        let caller = admin_caller();
        let facility = seed_facility(&pool).await;
        let first = seed_user(&pool, "alice", UserRole::User).await;
        let second = seed_user(&pool, "bob", UserRole::User).await;
        link_staff(&pool, facility, first).await;
        link_staff(&pool, facility, second).await;

        let date = NaiveDate::from_ymd_opt(2026, 9, 1).unwrap();
        let (left, right) = tokio::join!(
            svc.create_or_override(&caller, facility, first, date),
            svc.create_or_override(&caller, facility, second, date),
        );

        // Whoever loses the unique-constraint race falls back to the
        // override path, so both calls succeed against one row.
        let left = left.unwrap();
        let right = right.unwrap();
        assert_eq!(left.id, right.id);
        assert_eq!(assignment_rows_for_date(&pool, facility, date).await, 1);

        let winner = sqlx::query_scalar::<_, Uuid>(
            "SELECT assigned_user_id FROM cleaning_assignments
             WHERE facility_id = $1 AND scheduled_date = $2",
        )
        .bind(facility)
        .bind(date)
        .fetch_one(&pool)
        .await
        .unwrap();
        assert!(winner == first || winner == second);

        // Exactly one checklist was seeded.
        let items = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM cleaning_checklist_items WHERE assignment_id = $1",
        )
        .bind(left.id)
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(items, 19);
    }
}
