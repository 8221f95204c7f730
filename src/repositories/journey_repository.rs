//! Repositorio de trayectos
//!
//! Todas las transiciones de estado se ejecutan dentro de una transacción
//! con `SELECT ... FOR UPDATE` sobre la fila del trayecto: dos transiciones
//! concurrentes sobre el mismo id se serializan y la perdedora observa el
//! estado ya cambiado. La validación de la transición y la escritura del
//! timestamp forman una sola unidad atómica.

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::journey::{Journey, JourneyStatus};
use crate::services::schedule_service;
use crate::utils::errors::{invalid_state_error, not_found_error, AppError, AppResult};

pub struct JourneyRepository {
    pool: PgPool,
}

impl JourneyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        route_id: Uuid,
        driver_id: Uuid,
        vehicle_id: Uuid,
    ) -> AppResult<Journey> {
        let journey = sqlx::query_as::<_, Journey>(
            r#"
            INSERT INTO trayectos (id, route_id, driver_id, vehicle_id, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(route_id)
        .bind(driver_id)
        .bind(vehicle_id)
        .bind(JourneyStatus::Programado)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(journey)
    }

    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Journey>> {
        let journey = sqlx::query_as::<_, Journey>("SELECT * FROM trayectos WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(journey)
    }

    /// Listado general. Excluye los trayectos cuyo vehículo fue eliminado
    /// (referencia en NULL): se consideran registros huérfanos. Los
    /// trayectos sin conductor sí se listan.
    pub async fn list(&self) -> AppResult<Vec<Journey>> {
        let journeys = sqlx::query_as::<_, Journey>(
            "SELECT * FROM trayectos WHERE vehicle_id IS NOT NULL ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(journeys)
    }

    /// Trayecto EN_CURSO asignado a un conductor, si existe
    pub async fn find_active_by_driver(&self, driver_id: Uuid) -> AppResult<Option<Journey>> {
        let journey = sqlx::query_as::<_, Journey>(
            "SELECT * FROM trayectos WHERE driver_id = $1 AND status = $2 LIMIT 1",
        )
        .bind(driver_id)
        .bind(JourneyStatus::EnCurso)
        .fetch_optional(&self.pool)
        .await?;

        Ok(journey)
    }

    /// PROGRAMADO -> EN_CURSO, registrando la salida
    pub async fn start(&self, id: Uuid) -> AppResult<Journey> {
        let mut tx = self.pool.begin().await?;

        let current = Self::lock_row(&mut tx, id).await?;
        if current.status != JourneyStatus::Programado {
            return Err(invalid_state_error(
                "iniciar el trayecto",
                current.status.as_str(),
                JourneyStatus::Programado.as_str(),
            ));
        }

        let journey = sqlx::query_as::<_, Journey>(
            "UPDATE trayectos SET status = $2, departed_at = $3 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(JourneyStatus::EnCurso)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(journey)
    }

    /// EN_CURSO -> CANCELADO. Registra la llegada pero nunca calcula
    /// duración para un trayecto cancelado.
    pub async fn cancel(&self, id: Uuid) -> AppResult<Journey> {
        let mut tx = self.pool.begin().await?;

        let current = Self::lock_row(&mut tx, id).await?;
        if current.status != JourneyStatus::EnCurso {
            return Err(invalid_state_error(
                "detener el trayecto",
                current.status.as_str(),
                JourneyStatus::EnCurso.as_str(),
            ));
        }

        let journey = sqlx::query_as::<_, Journey>(
            "UPDATE trayectos SET status = $2, arrived_at = $3 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(JourneyStatus::Cancelado)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(journey)
    }

    /// EN_CURSO -> COMPLETADO. Registra la llegada, la cantidad de
    /// pasajeros y la duración definitiva en minutos redondeados.
    pub async fn complete(&self, id: Uuid, passenger_count: i32) -> AppResult<Journey> {
        let mut tx = self.pool.begin().await?;

        let current = Self::lock_row(&mut tx, id).await?;
        if current.status != JourneyStatus::EnCurso {
            return Err(invalid_state_error(
                "finalizar el trayecto",
                current.status.as_str(),
                JourneyStatus::EnCurso.as_str(),
            ));
        }

        let departed_at = current.departed_at.ok_or_else(|| {
            AppError::Internal(format!("Trayecto {} en curso sin fecha de salida", id))
        })?;
        let arrived_at = Utc::now();
        let duration = schedule_service::duration_on_completion(departed_at, arrived_at);

        let journey = sqlx::query_as::<_, Journey>(
            r#"
            UPDATE trayectos
            SET status = $2, arrived_at = $3, passenger_count = $4, duration_minutes = $5
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(JourneyStatus::Completado)
        .bind(arrived_at)
        .bind(passenger_count)
        .bind(duration)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(journey)
    }

    /// Sobrescribe las referencias de un trayecto aún programado.
    /// Los parámetros en None conservan el valor actual.
    pub async fn update_references(
        &self,
        id: Uuid,
        route_id: Option<Uuid>,
        driver_id: Option<Uuid>,
        vehicle_id: Option<Uuid>,
    ) -> AppResult<Journey> {
        let mut tx = self.pool.begin().await?;

        let current = Self::lock_row(&mut tx, id).await?;
        if current.status != JourneyStatus::Programado {
            return Err(invalid_state_error(
                "editar el trayecto",
                current.status.as_str(),
                JourneyStatus::Programado.as_str(),
            ));
        }

        let journey = sqlx::query_as::<_, Journey>(
            r#"
            UPDATE trayectos
            SET route_id = COALESCE($2, route_id),
                driver_id = COALESCE($3, driver_id),
                vehicle_id = COALESCE($4, vehicle_id)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(route_id)
        .bind(driver_id)
        .bind(vehicle_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(journey)
    }

    /// Elimina un trayecto que nunca se inició. Los trayectos que ya
    /// salieron conservan su historia.
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        let current = Self::lock_row(&mut tx, id).await?;
        if current.status != JourneyStatus::Programado {
            return Err(invalid_state_error(
                "eliminar el trayecto",
                current.status.as_str(),
                JourneyStatus::Programado.as_str(),
            ));
        }

        sqlx::query("DELETE FROM trayectos WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Bloquea la fila del trayecto dentro de la transacción en curso.
    /// Si la transacción se abandona sin commit, el lock y cualquier
    /// escritura pendiente se revierten.
    async fn lock_row(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        id: Uuid,
    ) -> AppResult<Journey> {
        sqlx::query_as::<_, Journey>("SELECT * FROM trayectos WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut **tx)
            .await?
            .ok_or_else(|| not_found_error("Trayecto", &id.to_string()))
    }
}
