//! Modelo de ubicación de conductor
//!
//! La tabla ubicaciones guarda una única fila por conductor con su última
//! posición reportada; cada reporte sobrescribe el anterior. No es un
//! registro histórico de recorrido.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Última posición conocida de un conductor - mapea a la tabla ubicaciones
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DriverLocation {
    pub driver_id: Uuid,
    pub latitude: f64,
    pub longitude: f64,
    pub recorded_at: DateTime<Utc>,
}

/// Request para reportar posición.
/// lat/lng son opcionales en el wire para poder rechazar su ausencia con
/// un error de entrada inválida antes de cualquier consulta.
#[derive(Debug, Deserialize)]
pub struct ReportLocationRequest {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

/// Posición activa enriquecida para el monitoreo de flota.
/// Solo existe para conductores con un trayecto EN_CURSO.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ActiveLocationView {
    pub driver_id: Uuid,
    pub driver_name: String,
    pub journey_id: Uuid,
    pub route_id: Uuid,
    pub route_name: String,
    pub vehicle_id: Uuid,
    pub vehicle_plate: String,
    pub latitude: f64,
    pub longitude: f64,
    pub recorded_at: DateTime<Utc>,
}
