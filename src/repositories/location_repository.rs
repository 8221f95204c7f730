//! Repositorio de ubicaciones
//!
//! La tabla ubicaciones tiene exactamente una fila por conductor. El
//! reporte es un upsert last-writer-wins: reportes concurrentes del mismo
//! conductor terminan con las coordenadas del último commit.

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::journey::JourneyStatus;
use crate::models::location::{ActiveLocationView, DriverLocation};
use crate::utils::errors::AppResult;

pub struct LocationRepository {
    pool: PgPool,
}

impl LocationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Crea o sobrescribe la posición actual del conductor con timestamp
    /// asignado por el servidor
    pub async fn upsert(&self, driver_id: Uuid, lat: f64, lng: f64) -> AppResult<DriverLocation> {
        let location = sqlx::query_as::<_, DriverLocation>(
            r#"
            INSERT INTO ubicaciones (driver_id, latitude, longitude, recorded_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (driver_id) DO UPDATE
            SET latitude = EXCLUDED.latitude,
                longitude = EXCLUDED.longitude,
                recorded_at = EXCLUDED.recorded_at
            RETURNING *
            "#,
        )
        .bind(driver_id)
        .bind(lat)
        .bind(lng)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(location)
    }

    /// Posiciones de los conductores con trayecto EN_CURSO, enriquecidas
    /// para el panel de monitoreo. El inner join descarta las filas
    /// obsoletas de conductores que ya no tienen trayecto activo.
    pub async fn list_active(&self) -> AppResult<Vec<ActiveLocationView>> {
        let locations = sqlx::query_as::<_, ActiveLocationView>(
            r#"
            SELECT u.driver_id,
                   us.full_name AS driver_name,
                   t.id AS journey_id,
                   r.id AS route_id,
                   r.name AS route_name,
                   v.id AS vehicle_id,
                   v.plate AS vehicle_plate,
                   u.latitude,
                   u.longitude,
                   u.recorded_at
            FROM ubicaciones u
            JOIN trayectos t ON t.driver_id = u.driver_id AND t.status = $1
            JOIN usuarios us ON us.id = u.driver_id
            JOIN rutas r ON r.id = t.route_id
            JOIN vehiculos v ON v.id = t.vehicle_id
            ORDER BY u.recorded_at DESC
            "#,
        )
        .bind(JourneyStatus::EnCurso)
        .fetch_all(&self.pool)
        .await?;

        Ok(locations)
    }
}
