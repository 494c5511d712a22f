// src/services/facility_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{FacilityRepository, UserRepository},
    models::{
        auth::{User, UserRole},
        facility::{Facility, StaffMember},
    },
};

#[derive(Clone)]
pub struct FacilityService {
    facility_repo: FacilityRepository,
    user_repo: UserRepository,
    pool: PgPool,
}

impl FacilityService {
    pub fn new(facility_repo: FacilityRepository, user_repo: UserRepository, pool: PgPool) -> Self {
        Self {
            facility_repo,
            user_repo,
            pool,
        }
    }

    pub async fn create_facility(
        &self,
        caller: &User,
        name: &str,
        location: &str,
        description: Option<&str>,
    ) -> Result<Facility, AppError> {
        if !caller.role.can_manage() {
            return Err(AppError::Forbidden(
                "only managers and administrators can create facilities",
            ));
        }
        self.facility_repo.create(name, location, description).await
    }

    /// Cleaners see only the facilities they are staffed at; managers and
    /// administrators see everything.
    pub async fn list_facilities(&self, caller: &User) -> Result<Vec<Facility>, AppError> {
        match caller.role {
            UserRole::User => self.facility_repo.list_for_user(caller.id).await,
            _ => self.facility_repo.list_all().await,
        }
    }

    pub async fn get_facility(&self, id: Uuid) -> Result<Facility, AppError> {
        self.facility_repo
            .get_by_id(id)
            .await?
            .ok_or(AppError::NotFound("Facility"))
    }

    pub async fn delete_facility(&self, caller: &User, id: Uuid) -> Result<(), AppError> {
        if caller.role != UserRole::Administrator {
            return Err(AppError::Forbidden(
                "only administrators can delete facilities",
            ));
        }
        if !self.facility_repo.delete(id).await? {
            return Err(AppError::NotFound("Facility"));
        }
        Ok(())
    }

    pub async fn add_staff(
        &self,
        caller: &User,
        facility_id: Uuid,
        user_id: Uuid,
    ) -> Result<(), AppError> {
        if !caller.role.can_manage() {
            return Err(AppError::Forbidden(
                "only managers and administrators can manage facility staff",
            ));
        }
        self.facility_repo
            .get_by_id(facility_id)
            .await?
            .ok_or(AppError::NotFound("Facility"))?;
        self.user_repo
            .find_by_id(user_id)
            .await?
            .ok_or(AppError::NotFound("User"))?;

        self.facility_repo.add_staff(facility_id, user_id).await
    }

    pub async fn remove_staff(
        &self,
        caller: &User,
        facility_id: Uuid,
        user_id: Uuid,
    ) -> Result<(), AppError> {
        if !caller.role.can_manage() {
            return Err(AppError::Forbidden(
                "only managers and administrators can manage facility staff",
            ));
        }
        if !self.facility_repo.remove_staff(facility_id, user_id).await? {
            return Err(AppError::NotFound("Staff link"));
        }
        Ok(())
    }

    pub async fn list_staff(&self, facility_id: Uuid) -> Result<Vec<StaffMember>, AppError> {
        self.facility_repo
            .get_by_id(facility_id)
            .await?
            .ok_or(AppError::NotFound("Facility"))?;
        self.facility_repo
            .eligible_cleaners(&self.pool, facility_id)
            .await
    }
}
