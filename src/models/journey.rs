//! Modelo de Journey (trayecto)
//!
//! Este módulo contiene el struct Journey, su máquina de estados y sus
//! variantes para CRUD operations. Mapea exactamente al schema PostgreSQL
//! con primary key 'id'.

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use validator::Validate;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::novedad::NovedadSummary;

/// Estado del trayecto - mapea al ENUM journey_status
///
/// `Pendiente` existe en el schema por compatibilidad pero ninguna
/// transición lo produce ni lo acepta como origen.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "journey_status", rename_all = "snake_case")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JourneyStatus {
    Pendiente,
    Programado,
    EnCurso,
    Completado,
    Cancelado,
}

impl JourneyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JourneyStatus::Pendiente => "PENDIENTE",
            JourneyStatus::Programado => "PROGRAMADO",
            JourneyStatus::EnCurso => "EN_CURSO",
            JourneyStatus::Completado => "COMPLETADO",
            JourneyStatus::Cancelado => "CANCELADO",
        }
    }

    /// Los estados terminales no admiten ninguna transición posterior
    pub fn is_terminal(&self) -> bool {
        matches!(self, JourneyStatus::Completado | JourneyStatus::Cancelado)
    }
}

impl std::fmt::Display for JourneyStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Journey principal - mapea exactamente a la tabla trayectos
///
/// Las referencias a ruta/conductor/vehículo son nullables: el schema las
/// pone en NULL cuando el referente se elimina, para conservar el historial.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Journey {
    pub id: Uuid,
    pub route_id: Option<Uuid>,
    pub driver_id: Option<Uuid>,
    pub vehicle_id: Option<Uuid>,
    pub status: JourneyStatus,
    pub created_at: DateTime<Utc>,
    pub departed_at: Option<DateTime<Utc>>,
    pub arrived_at: Option<DateTime<Utc>>,
    pub passenger_count: Option<i32>,
    pub duration_minutes: Option<i32>,
}

/// Request para programar un nuevo trayecto
#[derive(Debug, Deserialize, Validate)]
pub struct CreateJourneyRequest {
    pub route_id: Uuid,
    pub driver_id: Uuid,
    pub vehicle_id: Uuid,
}

/// Request para editar un trayecto aún programado.
/// Los campos ausentes se conservan.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateJourneyRequest {
    pub route_id: Option<Uuid>,
    pub driver_id: Option<Uuid>,
    pub vehicle_id: Option<Uuid>,
}

/// Request para finalizar un trayecto en curso
#[derive(Debug, Deserialize, Validate)]
pub struct CompleteJourneyRequest {
    pub passenger_count: i32,
}

/// Response de trayecto para la API, enriquecido con los campos de
/// presentación resueltos en el momento de la lectura
#[derive(Debug, Serialize)]
pub struct JourneyResponse {
    pub id: Uuid,
    pub route_id: Option<Uuid>,
    pub driver_id: Option<Uuid>,
    pub vehicle_id: Option<Uuid>,
    pub status: JourneyStatus,
    pub created_at: DateTime<Utc>,
    pub departed_at: Option<DateTime<Utc>>,
    pub arrived_at: Option<DateTime<Utc>>,
    pub passenger_count: Option<i32>,
    pub duration_minutes: Option<i32>,
    pub route_name: String,
    pub driver_name: String,
    pub vehicle_plate: String,
    /// Minutos transcurridos desde la salida; solo para EN_CURSO
    pub duration_actual: Option<i64>,
    /// Si la duración real quedó dentro del ±10% de la estimada;
    /// solo para COMPLETADO con ruta estimada
    pub schedule_compliance: Option<bool>,
    pub novedades: Vec<NovedadSummary>,
}
