// src/handlers/cleaning.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::cleaning::AssignmentStatus,
};

// ---
// Query: date range filter for listing assignments
// ---
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct AssignmentRangeQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// Assignments of one facility, newest scheduled date first, with
/// checklist completion counts.
#[utoipa::path(
    get,
    path = "/api/cleaning/facility/{facility_id}",
    params(
        ("facility_id" = Uuid, Path, description = "Facility id"),
        AssignmentRangeQuery,
    ),
    responses(
        (status = 200, description = "Assignment summaries", body = [crate::models::cleaning::AssignmentSummary]),
        (status = 400, description = "Invalid date range"),
    ),
    security(("api_jwt" = [])),
    tag = "Cleaning"
)]
pub async fn get_assignments(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Path(facility_id): Path<Uuid>,
    Query(range): Query<AssignmentRangeQuery>,
) -> Result<impl IntoResponse, AppError> {
    let summaries = app_state
        .cleaning_service
        .get_assignments(facility_id, range.start_date, range.end_date)
        .await?;
    Ok((StatusCode::OK, Json(summaries)))
}

/// One assignment with its full checklist and per-area progress.
#[utoipa::path(
    get,
    path = "/api/cleaning/{id}",
    params(("id" = Uuid, Path, description = "Assignment id")),
    responses(
        (status = 200, description = "Assignment detail", body = crate::models::cleaning::AssignmentDetail),
        (status = 404, description = "Assignment not found"),
    ),
    security(("api_jwt" = [])),
    tag = "Cleaning"
)]
pub async fn get_assignment(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let detail = app_state.cleaning_service.get_assignment(id).await?;
    Ok((StatusCode::OK, Json(detail)))
}

// ---
// Payload: manual assignment (create-or-override for one date)
// ---
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAssignmentPayload {
    pub facility_id: Uuid,
    pub assigned_user_id: Uuid,
    pub scheduled_date: NaiveDate,
}

/// Create the assignment for one (facility, date), or override the
/// assignee in place when the date is already taken. Checklist progress
/// survives an override.
#[utoipa::path(
    post,
    path = "/api/cleaning",
    request_body = CreateAssignmentPayload,
    responses(
        (status = 201, description = "Assignment created or overridden", body = crate::models::cleaning::AssignmentSummary),
        (status = 400, description = "Assignee not eligible for this facility"),
        (status = 403, description = "Caller is not a manager or administrator"),
    ),
    security(("api_jwt" = [])),
    tag = "Cleaning"
)]
pub async fn create_assignment(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<CreateAssignmentPayload>,
) -> Result<impl IntoResponse, AppError> {
    let summary = app_state
        .cleaning_service
        .create_or_override(
            &user.0,
            payload.facility_id,
            payload.assigned_user_id,
            payload.scheduled_date,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(summary)))
}

/// Round-robin auto-assignment over the next 7 days. Dates that already
/// have an assignment are left alone; the response lists only the rows
/// this call created.
#[utoipa::path(
    post,
    path = "/api/cleaning/auto-assign/{facility_id}",
    params(("facility_id" = Uuid, Path, description = "Facility id")),
    responses(
        (status = 200, description = "Newly created assignments", body = crate::models::cleaning::AutoAssignResult),
        (status = 400, description = "No eligible staff for this facility"),
        (status = 403, description = "Caller is not a manager or administrator"),
    ),
    security(("api_jwt" = [])),
    tag = "Cleaning"
)]
pub async fn auto_assign(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(facility_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let result = app_state
        .cleaning_service
        .auto_assign(&user.0, facility_id)
        .await?;
    Ok((StatusCode::OK, Json(result)))
}

// ---
// Payload: status transition
// ---
// The typed enum rejects unknown status strings at deserialization.
#[derive(Debug, Deserialize, ToSchema)]
pub struct StatusPayload {
    pub status: AssignmentStatus,
}

#[utoipa::path(
    patch,
    path = "/api/cleaning/{id}/status",
    params(("id" = Uuid, Path, description = "Assignment id")),
    request_body = StatusPayload,
    responses(
        (status = 200, description = "Updated assignment", body = crate::models::cleaning::CleaningAssignment),
        (status = 403, description = "Caller is neither the assignee nor an administrator"),
        (status = 404, description = "Assignment not found"),
    ),
    security(("api_jwt" = [])),
    tag = "Cleaning"
)]
pub async fn set_status(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<StatusPayload>,
) -> Result<impl IntoResponse, AppError> {
    let assignment = app_state
        .cleaning_service
        .set_status(&user.0, id, payload.status)
        .await?;
    Ok((StatusCode::OK, Json(assignment)))
}

#[utoipa::path(
    patch,
    path = "/api/cleaning/checklist/{item_id}/toggle",
    params(("item_id" = Uuid, Path, description = "Checklist item id")),
    responses(
        (status = 200, description = "Updated checklist item", body = crate::models::cleaning::ChecklistItem),
        (status = 403, description = "Caller is neither the assignee nor an administrator"),
        (status = 404, description = "Checklist item not found"),
    ),
    security(("api_jwt" = [])),
    tag = "Cleaning"
)]
pub async fn toggle_checklist_item(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(item_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let item = app_state
        .cleaning_service
        .toggle_checklist_item(&user.0, item_id)
        .await?;
    Ok((StatusCode::OK, Json(item)))
}

// ---
// Payload: photo evidence (already uploaded to blob storage; only the URL
// reference is persisted here)
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttachPhotoPayload {
    #[validate(url(message = "photoUrl must be a valid URL."))]
    pub photo_url: String,
}

#[utoipa::path(
    post,
    path = "/api/cleaning/checklist/{item_id}/photo",
    params(("item_id" = Uuid, Path, description = "Checklist item id")),
    request_body = AttachPhotoPayload,
    responses(
        (status = 200, description = "Item completed with photo evidence", body = crate::models::cleaning::ChecklistItem),
        (status = 403, description = "Caller is neither the assignee nor an administrator"),
        (status = 404, description = "Checklist item not found"),
    ),
    security(("api_jwt" = [])),
    tag = "Cleaning"
)]
pub async fn attach_photo(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(item_id): Path<Uuid>,
    Json(payload): Json<AttachPhotoPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let item = app_state
        .cleaning_service
        .attach_photo(&user.0, item_id, &payload.photo_url)
        .await?;
    Ok((StatusCode::OK, Json(item)))
}
