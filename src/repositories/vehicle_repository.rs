//! Repositorio de vehículos

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::vehicle::{CreateVehicleRequest, Vehicle};
use crate::utils::errors::{conflict_error, not_found_error, AppError, AppResult};

pub struct VehicleRepository {
    pool: PgPool,
}

impl VehicleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        plate: String,
        model: Option<String>,
        capacity: Option<i32>,
    ) -> AppResult<Vehicle> {
        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            INSERT INTO vehiculos (id, plate, model, capacity, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&plate)
        .bind(model)
        .bind(capacity)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, &plate))?;

        Ok(vehicle)
    }

    /// Inserta un lote de vehículos en una sola transacción. Las placas
    /// ya registradas se saltan, incluidas las repetidas dentro del mismo
    /// lote; el resultado contiene solo los insertados. Las placas llegan
    /// ya validadas y normalizadas.
    pub async fn create_bulk(
        &self,
        vehicles: Vec<CreateVehicleRequest>,
    ) -> AppResult<Vec<Vehicle>> {
        let mut tx = self.pool.begin().await?;
        let mut created = Vec::with_capacity(vehicles.len());

        for vehicle in vehicles {
            let CreateVehicleRequest { plate, model, capacity } = vehicle;

            let exists: (bool,) =
                sqlx::query_as("SELECT EXISTS(SELECT 1 FROM vehiculos WHERE plate = $1)")
                    .bind(&plate)
                    .fetch_one(&mut *tx)
                    .await?;
            if exists.0 {
                continue;
            }

            let inserted = sqlx::query_as::<_, Vehicle>(
                r#"
                INSERT INTO vehiculos (id, plate, model, capacity, created_at)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING *
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(&plate)
            .bind(model)
            .bind(capacity)
            .bind(Utc::now())
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| map_unique_violation(e, &plate))?;

            created.push(inserted);
        }

        tx.commit().await?;
        Ok(created)
    }

    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Vehicle>> {
        let vehicle = sqlx::query_as::<_, Vehicle>("SELECT * FROM vehiculos WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(vehicle)
    }

    pub async fn list(&self) -> AppResult<Vec<Vehicle>> {
        let vehicles = sqlx::query_as::<_, Vehicle>("SELECT * FROM vehiculos ORDER BY plate")
            .fetch_all(&self.pool)
            .await?;

        Ok(vehicles)
    }

    pub async fn plate_exists(&self, plate: &str) -> AppResult<bool> {
        let result: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM vehiculos WHERE plate = $1)")
                .bind(plate)
                .fetch_one(&self.pool)
                .await?;

        Ok(result.0)
    }

    pub async fn update(
        &self,
        id: Uuid,
        plate: Option<String>,
        model: Option<String>,
        capacity: Option<i32>,
    ) -> AppResult<Vehicle> {
        let plate_for_error = plate.clone().unwrap_or_default();

        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            UPDATE vehiculos
            SET plate = COALESCE($2, plate),
                model = COALESCE($3, model),
                capacity = COALESCE($4, capacity)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(plate)
        .bind(model)
        .bind(capacity)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, &plate_for_error))?
        .ok_or_else(|| not_found_error("Vehículo", &id.to_string()))?;

        Ok(vehicle)
    }

    /// El schema pone en NULL las referencias de los trayectos que
    /// apuntaban al vehículo eliminado
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM vehiculos WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(not_found_error("Vehículo", &id.to_string()));
        }

        Ok(())
    }
}

/// Traduce la violación del índice único de placa a un conflicto con
/// mensaje legible; cualquier otro error del almacenamiento se propaga
/// sin interpretar.
fn map_unique_violation(e: sqlx::Error, plate: &str) -> AppError {
    match &e {
        sqlx::Error::Database(dbe) if dbe.code().as_deref() == Some("23505") => {
            conflict_error("Vehículo", "placa", plate)
        }
        _ => AppError::StoreUnavailable(e),
    }
}
