//! Handlers de rutas
//!
//! Este módulo maneja las operaciones CRUD para rutas de la flota.
//! La distancia se valida como no negativa; la duración estimada es la
//! referencia contra la que se mide el cumplimiento de horario de los
//! trayectos.

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    middleware::auth::AuthenticatedUser,
    models::route::{CreateRouteRequest, CreateRoutesBulkRequest, RouteResponse, UpdateRouteRequest},
    repositories::RouteRepository,
    services::AuthorizationService,
    state::AppState,
    utils::errors::{forbidden_error, invalid_input_error, AppError, AppResult},
    utils::validation::validate_non_negative,
};

/// Crear el router de rutas
pub fn create_routes_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_routes))
        .route("/", post(create_route))
        .route("/bulk", post(create_routes_bulk))
        .route("/:id", get(get_route))
        .route("/:id", put(update_route))
        .route("/:id", delete(delete_route))
}

/// Handler para listar rutas
pub async fn get_routes(
    Extension(_user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<RouteResponse>>> {
    let repository = RouteRepository::new(state.pool.clone());

    let routes = repository.list().await?;

    Ok(Json(routes.into_iter().map(RouteResponse::from).collect()))
}

/// Handler para crear ruta
pub async fn create_route(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Json(route_data): Json<CreateRouteRequest>,
) -> AppResult<(StatusCode, Json<RouteResponse>)> {
    let authz = AuthorizationService::new();
    if !authz.can_manage_fleet(user.role) {
        return Err(forbidden_error("Solo el administrador puede crear rutas"));
    }

    route_data.validate()?;
    if let Some(distance) = route_data.distance_km {
        validate_non_negative(distance)
            .map_err(|_| invalid_input_error("La distancia no puede ser negativa"))?;
    }

    let repository = RouteRepository::new(state.pool.clone());
    let route = repository
        .create(
            route_data.name,
            route_data.origin,
            route_data.destination,
            route_data.distance_km,
            route_data.estimated_duration_minutes,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(RouteResponse::from(route))))
}

/// Handler de carga masiva de rutas.
/// Todas las rutas del lote se validan antes de insertar; el lote entra
/// completo en una sola transacción o no entra.
pub async fn create_routes_bulk(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Json(request): Json<CreateRoutesBulkRequest>,
) -> AppResult<(StatusCode, Json<Vec<RouteResponse>>)> {
    let authz = AuthorizationService::new();
    if !authz.can_manage_fleet(user.role) {
        return Err(forbidden_error("Solo el administrador puede crear rutas"));
    }

    for ruta in &request.rutas {
        ruta.validate()?;
        if let Some(distance) = ruta.distance_km {
            validate_non_negative(distance)
                .map_err(|_| invalid_input_error("La distancia no puede ser negativa"))?;
        }
    }

    let repository = RouteRepository::new(state.pool.clone());
    let created = repository.create_bulk(request.rutas).await?;

    Ok((
        StatusCode::CREATED,
        Json(created.into_iter().map(RouteResponse::from).collect()),
    ))
}

/// Handler para obtener ruta por ID
pub async fn get_route(
    Extension(_user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(route_id): Path<Uuid>,
) -> AppResult<Json<RouteResponse>> {
    let repository = RouteRepository::new(state.pool.clone());

    let route = repository
        .find_by_id(route_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Ruta no encontrada".to_string()))?;

    Ok(Json(RouteResponse::from(route)))
}

/// Handler para actualizar ruta
pub async fn update_route(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(route_id): Path<Uuid>,
    Json(route_data): Json<UpdateRouteRequest>,
) -> AppResult<Json<RouteResponse>> {
    let authz = AuthorizationService::new();
    if !authz.can_edit_fleet(user.role) {
        return Err(forbidden_error("No tiene permisos para editar la flota"));
    }

    route_data.validate()?;
    if let Some(distance) = route_data.distance_km {
        validate_non_negative(distance)
            .map_err(|_| invalid_input_error("La distancia no puede ser negativa"))?;
    }

    let repository = RouteRepository::new(state.pool.clone());
    let route = repository
        .update(
            route_id,
            route_data.name,
            route_data.origin,
            route_data.destination,
            route_data.distance_km,
            route_data.estimated_duration_minutes,
        )
        .await?;

    Ok(Json(RouteResponse::from(route)))
}

/// Handler para eliminar ruta
pub async fn delete_route(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(route_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let authz = AuthorizationService::new();
    if !authz.can_manage_fleet(user.role) {
        return Err(forbidden_error("Solo el administrador puede eliminar rutas"));
    }

    let repository = RouteRepository::new(state.pool.clone());
    repository.delete(route_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
