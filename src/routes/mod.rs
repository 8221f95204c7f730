//! Composición del router
//!
//! Todas las rutas viven bajo `/api` salvo el health check. El login es
//! la única operación pública de la API; el resto pasa por el middleware
//! de autenticación JWT.

pub mod journey_routes;
pub mod novedad_routes;

use axum::{
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

use crate::api;
use crate::middleware::auth::auth_middleware;
use crate::middleware::cors::cors_layer;
use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    // Rutas protegidas: requieren token Bearer válido
    let protected = Router::new()
        .route("/auth/me", get(api::auth::me))
        .nest("/usuarios", api::users::create_users_router())
        .nest("/vehiculos", api::vehicles::create_vehicles_router())
        .nest("/rutas", api::routes::create_routes_router())
        .nest("/trayectos", journey_routes::create_journey_router())
        .nest("/novedades", novedad_routes::create_novedad_router())
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    let api_router = Router::new()
        .route("/auth/login", post(api::auth::login))
        .merge(protected);

    Router::new()
        .route("/health", get(health))
        .nest("/api", api_router)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors_layer(&state.config))
        .with_state(state)
}

/// Health check simple, sin tocar el almacenamiento
async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "service": "fleet-monitoring",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
