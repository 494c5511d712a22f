// src/config.rs

use sqlx::{PgPool, postgres::PgPoolOptions};
use std::{env, time::Duration};

use crate::{
    db::{CleaningRepository, FacilityRepository, UserRepository},
    services::{CleaningService, FacilityService},
};

// Shared state accessible from every handler.
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub jwt_secret: String,
    pub bind_addr: String,
    pub user_repo: UserRepository,
    pub facility_service: FacilityService,
    pub cleaning_service: CleaningService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET must be set");
        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("database connection established");

        // --- Wire the dependency graph ---
        let user_repo = UserRepository::new(db_pool.clone());
        let facility_repo = FacilityRepository::new(db_pool.clone());
        let cleaning_repo = CleaningRepository::new(db_pool.clone());

        let facility_service = FacilityService::new(
            facility_repo.clone(),
            user_repo.clone(),
            db_pool.clone(),
        );
        let cleaning_service =
            CleaningService::new(cleaning_repo, facility_repo, db_pool.clone());

        Ok(Self {
            db_pool,
            jwt_secret,
            bind_addr,
            user_repo,
            facility_service,
            cleaning_service,
        })
    }
}
