// src/models/cleaning.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// --- Assignment status ---
// started_at/completed_at are stamped on the corresponding transition only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "assignment_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AssignmentStatus {
    Pending,
    InProgress,
    Completed,
}

// --- Checklist areas ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "checklist_area", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ChecklistArea {
    LivingArea,
    Bathroom,
    Bedroom,
}

// A cleaning_assignments row.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CleaningAssignment {
    pub id: Uuid,
    pub facility_id: Uuid,
    pub assigned_user_id: Uuid,
    pub scheduled_date: NaiveDate,
    pub status: AssignmentStatus,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

// An assignment joined with its cleaner and checklist completion counts.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentSummary {
    pub id: Uuid,
    pub facility_id: Uuid,
    pub assigned_user_id: Uuid,
    pub scheduled_date: NaiveDate,
    pub status: AssignmentStatus,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub cleaner_name: Option<String>,
    pub cleaner_email: Option<String>,
    pub completed_items: i64,
    pub total_items: i64,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistItem {
    pub id: Uuid,
    pub assignment_id: Uuid,
    pub area: ChecklistArea,
    pub task_name: String,
    pub is_completed: bool,
    pub photo_url: Option<String>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

// A checklist item joined with the assignee of its assignment, so the
// ownership check needs a single query.
#[derive(Debug, Clone, FromRow)]
pub struct ChecklistItemWithAssignee {
    pub id: Uuid,
    pub assignment_id: Uuid,
    pub area: ChecklistArea,
    pub task_name: String,
    pub is_completed: bool,
    pub photo_url: Option<String>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub assigned_user_id: Uuid,
}

// Completion metrics for one area of one assignment.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AreaProgress {
    pub area: ChecklistArea,
    pub completed_items: i64,
    pub total_items: i64,
    pub percent: u8,
}

// Full read model for a single assignment.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentDetail {
    pub assignment: AssignmentSummary,
    pub checklist: Vec<ChecklistItem>,
    pub areas: Vec<AreaProgress>,
    pub percent: u8,
}

// What auto-assign reports back: only the rows it created this invocation.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatedAssignment {
    pub id: Uuid,
    pub scheduled_date: NaiveDate,
    pub assigned_user_id: Uuid,
    pub cleaner_name: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AutoAssignResult {
    pub created: usize,
    pub assignments: Vec<CreatedAssignment>,
}
