// src/handlers/facilities.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError, config::AppState, middleware::auth::AuthenticatedUser,
};

// ---
// Payload: CreateFacility
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateFacilityPayload {
    #[validate(length(min = 1, message = "Name is required."))]
    pub name: String,

    #[validate(length(min = 1, message = "Location is required."))]
    pub location: String,

    pub description: Option<String>,
}

#[utoipa::path(
    post,
    path = "/api/facilities",
    request_body = CreateFacilityPayload,
    responses(
        (status = 201, description = "Facility created", body = crate::models::facility::Facility),
        (status = 403, description = "Caller is not a manager or administrator"),
    ),
    security(("api_jwt" = [])),
    tag = "Facilities"
)]
pub async fn create_facility(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<CreateFacilityPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let facility = app_state
        .facility_service
        .create_facility(
            &user.0,
            &payload.name,
            &payload.location,
            payload.description.as_deref(),
        )
        .await?;
    Ok((StatusCode::CREATED, Json(facility)))
}

#[utoipa::path(
    get,
    path = "/api/facilities",
    responses(
        (status = 200, description = "Facilities visible to the caller", body = [crate::models::facility::Facility]),
    ),
    security(("api_jwt" = [])),
    tag = "Facilities"
)]
pub async fn list_facilities(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let facilities = app_state.facility_service.list_facilities(&user.0).await?;
    Ok((StatusCode::OK, Json(facilities)))
}

#[utoipa::path(
    get,
    path = "/api/facilities/{id}",
    params(("id" = Uuid, Path, description = "Facility id")),
    responses(
        (status = 200, description = "Facility", body = crate::models::facility::Facility),
        (status = 404, description = "Facility not found"),
    ),
    security(("api_jwt" = [])),
    tag = "Facilities"
)]
pub async fn get_facility(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let facility = app_state.facility_service.get_facility(id).await?;
    Ok((StatusCode::OK, Json(facility)))
}

#[utoipa::path(
    delete,
    path = "/api/facilities/{id}",
    params(("id" = Uuid, Path, description = "Facility id")),
    responses(
        (status = 204, description = "Facility deleted, assignments cascade"),
        (status = 403, description = "Caller is not an administrator"),
        (status = 404, description = "Facility not found"),
    ),
    security(("api_jwt" = [])),
    tag = "Facilities"
)]
pub async fn delete_facility(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.facility_service.delete_facility(&user.0, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---
// Staff links (eligibility pool of the rotation)
// ---

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddStaffPayload {
    pub user_id: Uuid,
}

#[utoipa::path(
    post,
    path = "/api/facilities/{id}/staff",
    params(("id" = Uuid, Path, description = "Facility id")),
    request_body = AddStaffPayload,
    responses(
        (status = 204, description = "User linked to the facility (idempotent)"),
        (status = 403, description = "Caller is not a manager or administrator"),
        (status = 404, description = "Facility or user not found"),
    ),
    security(("api_jwt" = [])),
    tag = "Facilities"
)]
pub async fn add_staff(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<AddStaffPayload>,
) -> Result<impl IntoResponse, AppError> {
    app_state
        .facility_service
        .add_staff(&user.0, id, payload.user_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    delete,
    path = "/api/facilities/{id}/staff/{user_id}",
    params(
        ("id" = Uuid, Path, description = "Facility id"),
        ("user_id" = Uuid, Path, description = "User id"),
    ),
    responses(
        (status = 204, description = "Staff link removed"),
        (status = 403, description = "Caller is not a manager or administrator"),
        (status = 404, description = "Staff link not found"),
    ),
    security(("api_jwt" = [])),
    tag = "Facilities"
)]
pub async fn remove_staff(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path((id, user_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, AppError> {
    app_state
        .facility_service
        .remove_staff(&user.0, id, user_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/facilities/{id}/staff",
    params(("id" = Uuid, Path, description = "Facility id")),
    responses(
        (status = 200, description = "Eligible cleaners in rotation order", body = [crate::models::facility::StaffMember]),
        (status = 404, description = "Facility not found"),
    ),
    security(("api_jwt" = [])),
    tag = "Facilities"
)]
pub async fn list_staff(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let staff = app_state.facility_service.list_staff(id).await?;
    Ok((StatusCode::OK, Json(staff)))
}
