//! Rutas de trayectos y telemetría
//!
//! Endpoints del ciclo de vida del trayecto (crear, iniciar, detener,
//! finalizar, editar, eliminar) y de la posición de los conductores.
//! Las rutas estáticas `/ubicacion` y `/ubicaciones` conviven con
//! `/:id` porque el router prioriza los segmentos literales.

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::{JourneyController, LocationController};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::journey::{
    CompleteJourneyRequest, CreateJourneyRequest, JourneyResponse, UpdateJourneyRequest,
};
use crate::models::location::{ActiveLocationView, DriverLocation, ReportLocationRequest};
use crate::state::AppState;
use crate::utils::errors::AppResult;

pub fn create_journey_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_journeys))
        .route("/", post(create_journey))
        .route("/ubicacion", post(report_location))
        .route("/ubicaciones", get(list_locations))
        .route("/:id", get(get_journey))
        .route("/:id", put(update_journey))
        .route("/:id", delete(delete_journey))
        .route("/:id/iniciar", post(start_journey))
        .route("/:id/detener", post(stop_journey))
        .route("/:id/finalizar", post(complete_journey))
}

async fn create_journey(
    Extension(_user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Json(request): Json<CreateJourneyRequest>,
) -> AppResult<(StatusCode, Json<JourneyResponse>)> {
    let controller = JourneyController::new(state.pool.clone());
    let response = controller.create(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn list_journeys(
    Extension(_user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<JourneyResponse>>> {
    let controller = JourneyController::new(state.pool.clone());
    let response = controller.list().await?;
    Ok(Json(response))
}

async fn get_journey(
    Extension(_user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<JourneyResponse>> {
    let controller = JourneyController::new(state.pool.clone());
    let response = controller.get(id).await?;
    Ok(Json(response))
}

async fn update_journey(
    Extension(_user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateJourneyRequest>,
) -> AppResult<Json<JourneyResponse>> {
    let controller = JourneyController::new(state.pool.clone());
    let response = controller.update(id, request).await?;
    Ok(Json(response))
}

async fn delete_journey(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let controller = JourneyController::new(state.pool.clone());
    controller.delete(id, user.role).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn start_journey(
    Extension(_user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<JourneyResponse>> {
    let controller = JourneyController::new(state.pool.clone());
    let response = controller.start(id).await?;
    Ok(Json(response))
}

async fn stop_journey(
    Extension(_user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<JourneyResponse>> {
    let controller = JourneyController::new(state.pool.clone());
    let response = controller.cancel(id).await?;
    Ok(Json(response))
}

async fn complete_journey(
    Extension(_user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<CompleteJourneyRequest>,
) -> AppResult<Json<JourneyResponse>> {
    let controller = JourneyController::new(state.pool.clone());
    let response = controller.complete(id, request.passenger_count).await?;
    Ok(Json(response))
}

/// La posición reportada es siempre la del conductor autenticado
async fn report_location(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Json(request): Json<ReportLocationRequest>,
) -> AppResult<Json<DriverLocation>> {
    let controller = LocationController::new(state.pool.clone());
    let response = controller.report(user.user_id, request).await?;
    Ok(Json(response))
}

async fn list_locations(
    Extension(_user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<ActiveLocationView>>> {
    let controller = LocationController::new(state.pool.clone());
    let response = controller.list_active().await?;
    Ok(Json(response))
}
