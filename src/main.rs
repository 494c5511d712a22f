// src/main.rs

use axum::{
    Router,
    middleware as axum_middleware,
    routing::{delete, get, patch, post},
};
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::AppState;
use crate::middleware::auth::auth_guard;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_target(false).compact().init();

    // .expect() is right here: without configuration the service must not start.
    let app_state = AppState::new()
        .await
        .expect("failed to initialize application state");

    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("failed to run database migrations");
    tracing::info!("database migrations applied");

    let facility_routes = Router::new()
        .route(
            "/",
            post(handlers::facilities::create_facility).get(handlers::facilities::list_facilities),
        )
        .route(
            "/{id}",
            get(handlers::facilities::get_facility).delete(handlers::facilities::delete_facility),
        )
        .route(
            "/{id}/staff",
            get(handlers::facilities::list_staff).post(handlers::facilities::add_staff),
        )
        .route(
            "/{id}/staff/{user_id}",
            delete(handlers::facilities::remove_staff),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let cleaning_routes = Router::new()
        .route("/", post(handlers::cleaning::create_assignment))
        .route(
            "/facility/{facility_id}",
            get(handlers::cleaning::get_assignments),
        )
        .route(
            "/auto-assign/{facility_id}",
            post(handlers::cleaning::auto_assign),
        )
        .route("/{id}", get(handlers::cleaning::get_assignment))
        .route("/{id}/status", patch(handlers::cleaning::set_status))
        .route(
            "/checklist/{item_id}/toggle",
            patch(handlers::cleaning::toggle_checklist_item),
        )
        .route(
            "/checklist/{item_id}/photo",
            post(handlers::cleaning::attach_photo),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let addr = app_state.bind_addr.clone();
    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/facilities", facility_routes)
        .nest("/api/cleaning", cleaning_routes)
        .merge(
            SwaggerUi::new("/swagger-ui")
                .url("/api-docs/openapi.json", docs::ApiDoc::openapi()),
        )
        .with_state(app_state);

    let listener = TcpListener::bind(&addr)
        .await
        .expect("failed to bind TCP listener");
    tracing::info!("server listening on {}", listener.local_addr().unwrap());
    axum::serve(listener, app).await.expect("axum server error");
}
