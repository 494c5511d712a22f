// src/middleware/auth.rs

use axum::{
    extract::{FromRequestParts, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{DecodingKey, Validation, decode};

use crate::{
    common::error::AppError,
    config::AppState,
    models::auth::{Claims, User},
};

// Validates the Bearer token issued by the external identity provider and
// loads the caller's user row. This service never issues tokens itself.
pub async fn auth_guard(
    State(app_state): State<AppState>,
    mut request: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, AppError> {
    let token = request
        .headers()
        .get("Authorization")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or(AppError::InvalidToken)?;

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(app_state.jwt_secret.as_ref()),
        &Validation::default(),
    )
    .map_err(|_| AppError::InvalidToken)?;

    let user = app_state
        .user_repo
        .find_by_id(token_data.claims.sub)
        .await?
        .ok_or(AppError::InvalidToken)?;

    // Make the caller available to handlers via the extractor below.
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

pub struct AuthenticatedUser(pub User);

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<User>()
            .cloned()
            .map(AuthenticatedUser)
            .ok_or(AppError::InvalidToken)
    }
}
