//! Rutas de novedades
//!
//! Endpoints para reportar incidencias sobre trayectos en curso y
//! consultarlas. `/stats` va antes que cualquier segmento dinámico.

use axum::{
    extract::{Extension, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

use crate::controllers::NovedadController;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::novedad::{CreateNovedadRequest, Novedad, NovedadResponse, NovedadStats};
use crate::state::AppState;
use crate::utils::errors::AppResult;

pub fn create_novedad_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_novedades))
        .route("/", post(report_novedad))
        .route("/stats", get(novedad_stats))
}

async fn report_novedad(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Json(request): Json<CreateNovedadRequest>,
) -> AppResult<(StatusCode, Json<Novedad>)> {
    let controller = NovedadController::new(state.pool.clone());
    let response = controller.report(user.user_id, user.role, request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn list_novedades(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<NovedadResponse>>> {
    let controller = NovedadController::new(state.pool.clone());
    let response = controller.list(user.user_id, user.role).await?;
    Ok(Json(response))
}

async fn novedad_stats(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
) -> AppResult<Json<NovedadStats>> {
    let controller = NovedadController::new(state.pool.clone());
    let response = controller.stats(user.role).await?;
    Ok(Json(response))
}
