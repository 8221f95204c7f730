//! Modelo de Novedad
//!
//! Una novedad es un evento operativo (accidente, avería, tráfico, etc.)
//! reportado contra un trayecto en curso. El registro es append-only:
//! nunca se modifica ni se elimina desde la API.

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use validator::Validate;
use chrono::{DateTime, Utc};
use uuid::Uuid;
use std::collections::HashMap;

/// Tipo de novedad - mapea al ENUM novedad_type.
/// Los valores del wire conservan la forma en español que usan los
/// clientes existentes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq, Hash)]
#[sqlx(type_name = "novedad_type")]
pub enum NovedadType {
    #[sqlx(rename = "Accidente")]
    #[serde(rename = "Accidente")]
    Accidente,
    #[sqlx(rename = "Avería Mecánica")]
    #[serde(rename = "Avería Mecánica")]
    AveriaMecanica,
    #[sqlx(rename = "Tráfico")]
    #[serde(rename = "Tráfico")]
    Trafico,
    #[sqlx(rename = "Problema de Ruta")]
    #[serde(rename = "Problema de Ruta")]
    ProblemaDeRuta,
    #[sqlx(rename = "Otro")]
    #[serde(rename = "Otro")]
    Otro,
}

impl NovedadType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NovedadType::Accidente => "Accidente",
            NovedadType::AveriaMecanica => "Avería Mecánica",
            NovedadType::Trafico => "Tráfico",
            NovedadType::ProblemaDeRuta => "Problema de Ruta",
            NovedadType::Otro => "Otro",
        }
    }
}

impl std::fmt::Display for NovedadType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Novedad principal - mapea exactamente a la tabla novedades
///
/// `driver_id` es nullable en el schema: si el usuario que reportó se
/// elimina, la novedad conserva su historia con la referencia en NULL.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Novedad {
    pub id: Uuid,
    pub journey_id: Uuid,
    pub driver_id: Option<Uuid>,
    #[serde(rename = "type")]
    pub novedad_type: NovedadType,
    pub notes: Option<String>,
    pub reported_at: DateTime<Utc>,
}

/// Request para reportar una novedad.
/// El conductor que reporta se toma del actor autenticado, no del body.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateNovedadRequest {
    pub journey_id: Uuid,

    #[serde(rename = "type")]
    pub novedad_type: NovedadType,

    #[validate(length(max = 500))]
    pub notes: Option<String>,
}

/// Response de novedad enriquecida con nombre del reportante y de la ruta
#[derive(Debug, Serialize, FromRow)]
pub struct NovedadResponse {
    pub id: Uuid,
    pub journey_id: Uuid,
    pub driver_id: Option<Uuid>,
    #[serde(rename = "type")]
    pub novedad_type: NovedadType,
    pub notes: Option<String>,
    pub reported_at: DateTime<Utc>,
    pub driver_name: String,
    pub route_name: String,
}

/// Resumen de novedad embebido en las lecturas de trayecto
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct NovedadSummary {
    #[serde(rename = "type")]
    pub novedad_type: NovedadType,
    pub notes: Option<String>,
}

/// Estadísticas de novedades para roles elevados
#[derive(Debug, Serialize)]
pub struct NovedadStats {
    pub total: i64,
    pub by_type: HashMap<String, i64>,
    pub today: i64,
}
