//! Handlers de vehículos
//!
//! Este módulo maneja las operaciones CRUD para vehículos. Las placas
//! se almacenan normalizadas (sin separadores, en mayúsculas) para que
//! el índice único no deje pasar duplicados con formato distinto.

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
    models::vehicle::{
        CreateVehicleRequest, CreateVehiclesBulkRequest, UpdateVehicleRequest, VehicleResponse,
    },
    repositories::VehicleRepository,
    services::AuthorizationService,
    state::AppState,
    utils::errors::{conflict_error, forbidden_error, invalid_input_error, AppError, AppResult},
    utils::validation::{normalize_plate, validate_plate},
};

/// Crear el router de vehículos
pub fn create_vehicles_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_vehicles))
        .route("/", post(create_vehicle))
        .route("/bulk", post(create_vehicles_bulk))
        .route("/:id", get(get_vehicle))
        .route("/:id", put(update_vehicle))
        .route("/:id", delete(delete_vehicle))
}

/// Handler para listar vehículos
pub async fn get_vehicles(
    Extension(_user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<VehicleResponse>>> {
    let repository = VehicleRepository::new(state.pool.clone());

    let vehicles = repository.list().await?;

    Ok(Json(vehicles.into_iter().map(VehicleResponse::from).collect()))
}

/// Handler para registrar un vehículo
pub async fn create_vehicle(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Json(vehicle_data): Json<CreateVehicleRequest>,
) -> AppResult<(StatusCode, Json<VehicleResponse>)> {
    let authz = AuthorizationService::new();
    if !authz.can_manage_fleet(user.role) {
        return Err(forbidden_error("Solo el administrador puede registrar vehículos"));
    }

    vehicle_data.validate()?;
    validate_plate(&vehicle_data.plate)
        .map_err(|_| invalid_input_error("Formato de placa inválido, se espera ABC123 o ABC12D"))?;

    let plate = normalize_plate(&vehicle_data.plate);

    let repository = VehicleRepository::new(state.pool.clone());

    if repository.plate_exists(&plate).await? {
        return Err(conflict_error("Vehículo", "placa", &plate));
    }

    let vehicle = repository
        .create(plate, vehicle_data.model, vehicle_data.capacity)
        .await?;

    Ok((StatusCode::CREATED, Json(VehicleResponse::from(vehicle))))
}

/// Handler de carga masiva de vehículos.
/// Cada placa se valida y normaliza antes de tocar el almacenamiento;
/// una placa mal formada rechaza el lote completo. Las placas ya
/// registradas se saltan y la respuesta contiene solo los creados.
pub async fn create_vehicles_bulk(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Json(request): Json<CreateVehiclesBulkRequest>,
) -> AppResult<(StatusCode, Json<Vec<VehicleResponse>>)> {
    let authz = AuthorizationService::new();
    if !authz.can_manage_fleet(user.role) {
        return Err(forbidden_error("Solo el administrador puede registrar vehículos"));
    }

    let mut rows = Vec::with_capacity(request.vehiculos.len());
    for vehiculo in request.vehiculos {
        vehiculo.validate()?;
        validate_plate(&vehiculo.plate).map_err(|_| {
            invalid_input_error(&format!(
                "Formato de placa inválido: '{}', se espera ABC123 o ABC12D",
                vehiculo.plate
            ))
        })?;

        rows.push(CreateVehicleRequest {
            plate: normalize_plate(&vehiculo.plate),
            model: vehiculo.model,
            capacity: vehiculo.capacity,
        });
    }

    let repository = VehicleRepository::new(state.pool.clone());
    let created = repository.create_bulk(rows).await?;

    Ok((
        StatusCode::CREATED,
        Json(created.into_iter().map(VehicleResponse::from).collect()),
    ))
}

/// Handler para obtener vehículo por ID
pub async fn get_vehicle(
    Extension(_user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(vehicle_id): Path<Uuid>,
) -> AppResult<Json<VehicleResponse>> {
    let repository = VehicleRepository::new(state.pool.clone());

    let vehicle = repository
        .find_by_id(vehicle_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Vehículo no encontrado".to_string()))?;

    Ok(Json(VehicleResponse::from(vehicle)))
}

/// Handler para actualizar vehículo
pub async fn update_vehicle(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(vehicle_id): Path<Uuid>,
    Json(vehicle_data): Json<UpdateVehicleRequest>,
) -> AppResult<Json<VehicleResponse>> {
    let authz = AuthorizationService::new();
    if !authz.can_edit_fleet(user.role) {
        return Err(forbidden_error("No tiene permisos para editar la flota"));
    }

    vehicle_data.validate()?;

    let plate = match vehicle_data.plate {
        Some(raw) => {
            validate_plate(&raw).map_err(|_| {
                invalid_input_error("Formato de placa inválido, se espera ABC123 o ABC12D")
            })?;
            Some(normalize_plate(&raw))
        }
        None => None,
    };

    let repository = VehicleRepository::new(state.pool.clone());
    let vehicle = repository
        .update(vehicle_id, plate, vehicle_data.model, vehicle_data.capacity)
        .await?;

    Ok(Json(VehicleResponse::from(vehicle)))
}

/// Handler para eliminar vehículo
pub async fn delete_vehicle(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(vehicle_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let authz = AuthorizationService::new();
    if !authz.can_manage_fleet(user.role) {
        return Err(forbidden_error("Solo el administrador puede eliminar vehículos"));
    }

    let repository = VehicleRepository::new(state.pool.clone());
    repository.delete(vehicle_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
