//! Modelo de Vehicle
//!
//! Este módulo contiene el struct Vehicle y sus variantes para CRUD operations.
//! Mapea exactamente al schema PostgreSQL con primary key 'id'.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Vehicle principal - mapea exactamente a la tabla vehiculos
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Vehicle {
    pub id: Uuid,
    pub plate: String,
    pub model: Option<String>,
    pub capacity: Option<i32>,
    pub created_at: DateTime<Utc>,
}

/// Request para registrar un nuevo vehículo
#[derive(Debug, Deserialize, Validate)]
pub struct CreateVehicleRequest {
    #[validate(length(min = 5, max = 10))]
    pub plate: String,

    #[validate(length(min = 2, max = 100))]
    pub model: Option<String>,

    #[validate(range(min = 1, max = 200))]
    pub capacity: Option<i32>,
}

/// Request para actualizar un vehículo existente
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateVehicleRequest {
    #[validate(length(min = 5, max = 10))]
    pub plate: Option<String>,

    #[validate(length(min = 2, max = 100))]
    pub model: Option<String>,

    #[validate(range(min = 1, max = 200))]
    pub capacity: Option<i32>,
}

/// Request de carga masiva de vehículos.
/// Conserva la envoltura `{ "vehiculos": [...] }` que envían los clientes
/// de importación por archivo.
#[derive(Debug, Deserialize)]
pub struct CreateVehiclesBulkRequest {
    pub vehiculos: Vec<CreateVehicleRequest>,
}

/// Response de vehículo para la API
#[derive(Debug, Serialize)]
pub struct VehicleResponse {
    pub id: Uuid,
    pub plate: String,
    pub model: Option<String>,
    pub capacity: Option<i32>,
    pub created_at: DateTime<Utc>,
}

impl From<Vehicle> for VehicleResponse {
    fn from(vehicle: Vehicle) -> Self {
        Self {
            id: vehicle.id,
            plate: vehicle.plate,
            model: vehicle.model,
            capacity: vehicle.capacity,
            created_at: vehicle.created_at,
        }
    }
}
