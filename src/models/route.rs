//! Modelo de Route
//!
//! Este módulo contiene el struct Route y sus variantes para CRUD operations.
//! Mapea exactamente al schema PostgreSQL con primary key 'id'.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;
use chrono::{DateTime, Utc};
use uuid::Uuid;
use rust_decimal::Decimal;

/// Route principal - mapea exactamente a la tabla rutas
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Route {
    pub id: Uuid,
    pub name: String,
    pub origin: String,
    pub destination: String,
    pub distance_km: Option<Decimal>,
    pub estimated_duration_minutes: Option<i32>,
    pub created_at: DateTime<Utc>,
}

/// Request para crear una nueva ruta
#[derive(Debug, Deserialize, Validate)]
pub struct CreateRouteRequest {
    #[validate(length(min = 2, max = 100))]
    pub name: String,

    #[validate(length(min = 2, max = 200))]
    pub origin: String,

    #[validate(length(min = 2, max = 200))]
    pub destination: String,

    pub distance_km: Option<Decimal>,

    #[validate(range(min = 1))]
    pub estimated_duration_minutes: Option<i32>,
}

/// Request para actualizar una ruta existente
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateRouteRequest {
    #[validate(length(min = 2, max = 100))]
    pub name: Option<String>,

    #[validate(length(min = 2, max = 200))]
    pub origin: Option<String>,

    #[validate(length(min = 2, max = 200))]
    pub destination: Option<String>,

    pub distance_km: Option<Decimal>,

    #[validate(range(min = 1))]
    pub estimated_duration_minutes: Option<i32>,
}

/// Request de carga masiva de rutas.
/// Conserva la envoltura `{ "rutas": [...] }` que envían los clientes
/// de importación por archivo.
#[derive(Debug, Deserialize)]
pub struct CreateRoutesBulkRequest {
    pub rutas: Vec<CreateRouteRequest>,
}

/// Response de ruta para la API
#[derive(Debug, Serialize)]
pub struct RouteResponse {
    pub id: Uuid,
    pub name: String,
    pub origin: String,
    pub destination: String,
    pub distance_km: Option<Decimal>,
    pub estimated_duration_minutes: Option<i32>,
    pub created_at: DateTime<Utc>,
}

impl From<Route> for RouteResponse {
    fn from(route: Route) -> Self {
        Self {
            id: route.id,
            name: route.name,
            origin: route.origin,
            destination: route.destination,
            distance_km: route.distance_km,
            estimated_duration_minutes: route.estimated_duration_minutes,
            created_at: route.created_at,
        }
    }
}
