// src/models/auth.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

// Operational roles. Accounts are created and managed by the external
// identity system; this service only reads them for authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "user_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Administrator,
    Manager,
    User,
}

impl UserRole {
    /// Managers and administrators may create facilities and assignments.
    pub fn can_manage(self) -> bool {
        matches!(self, UserRole::Administrator | UserRole::Manager)
    }
}

// A user row as it comes from the database.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub emp_id: Option<String>,
    pub username: String,
    pub email: String,
    pub full_name: Option<String>,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Claims inside the JWT issued by the identity provider.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,  // user id
    pub exp: usize, // expiration time
    pub iat: usize, // issued at
}
