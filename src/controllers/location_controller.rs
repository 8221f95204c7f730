//! Controller de ubicaciones
//!
//! El reporte de posición está condicionado a que el conductor tenga un
//! trayecto EN_CURSO. Las coordenadas se validan antes de cualquier
//! consulta al almacenamiento.

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::location::{ActiveLocationView, DriverLocation, ReportLocationRequest};
use crate::repositories::{JourneyRepository, LocationRepository};
use crate::utils::errors::{invalid_input_error, AppError, AppResult};
use crate::utils::validation::validate_coordinates;

pub struct LocationController {
    locations: LocationRepository,
    journeys: JourneyRepository,
}

impl LocationController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            locations: LocationRepository::new(pool.clone()),
            journeys: JourneyRepository::new(pool),
        }
    }

    /// Registra la posición actual del conductor autenticado
    pub async fn report(
        &self,
        driver_id: Uuid,
        request: ReportLocationRequest,
    ) -> AppResult<DriverLocation> {
        let (lat, lng) = match (request.lat, request.lng) {
            (Some(lat), Some(lng)) => (lat, lng),
            _ => {
                return Err(invalid_input_error(
                    "Se requieren los campos 'lat' y 'lng'",
                ))
            }
        };

        validate_coordinates(lat, lng).map_err(|_| {
            invalid_input_error("Coordenadas fuera de rango: lat en [-90, 90], lng en [-180, 180]")
        })?;

        let active = self.journeys.find_active_by_driver(driver_id).await?;
        if active.is_none() {
            return Err(AppError::Forbidden(
                "El conductor no tiene un trayecto en curso".to_string(),
            ));
        }

        self.locations.upsert(driver_id, lat, lng).await
    }

    /// Posiciones de todos los conductores con trayecto activo
    pub async fn list_active(&self) -> AppResult<Vec<ActiveLocationView>> {
        self.locations.list_active().await
    }
}
