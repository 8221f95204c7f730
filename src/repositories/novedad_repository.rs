//! Repositorio de novedades
//!
//! El registro de novedades es append-only: no existen operaciones de
//! actualización ni borrado. Los listados se enriquecen con el nombre del
//! reportante y de la ruta; las referencias eliminadas se presentan con
//! un placeholder en lugar de romper la lectura.

use chrono::Utc;
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

use crate::models::novedad::{Novedad, NovedadResponse, NovedadStats, NovedadSummary, NovedadType};
use crate::utils::errors::AppResult;

pub struct NovedadRepository {
    pool: PgPool,
}

impl NovedadRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        journey_id: Uuid,
        driver_id: Uuid,
        novedad_type: NovedadType,
        notes: Option<String>,
    ) -> AppResult<Novedad> {
        let novedad = sqlx::query_as::<_, Novedad>(
            r#"
            INSERT INTO novedades (id, journey_id, driver_id, novedad_type, notes, reported_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(journey_id)
        .bind(driver_id)
        .bind(novedad_type)
        .bind(notes)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(novedad)
    }

    pub async fn list_all(&self) -> AppResult<Vec<NovedadResponse>> {
        let query = format!("{} ORDER BY n.reported_at DESC", LIST_BASE);
        let novedades = sqlx::query_as::<_, NovedadResponse>(&query)
            .fetch_all(&self.pool)
            .await?;

        Ok(novedades)
    }

    pub async fn list_by_driver(&self, driver_id: Uuid) -> AppResult<Vec<NovedadResponse>> {
        let query = format!("{} WHERE n.driver_id = $1 ORDER BY n.reported_at DESC", LIST_BASE);
        let novedades = sqlx::query_as::<_, NovedadResponse>(&query)
            .bind(driver_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(novedades)
    }

    /// Resúmenes {tipo, notas} embebidos en las lecturas de trayecto
    pub async fn summaries_for_journey(&self, journey_id: Uuid) -> AppResult<Vec<NovedadSummary>> {
        let summaries = sqlx::query_as::<_, NovedadSummary>(
            "SELECT novedad_type, notes FROM novedades WHERE journey_id = $1 ORDER BY reported_at",
        )
        .bind(journey_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(summaries)
    }

    /// Total, conteo por tipo y conteo del día calendario actual del
    /// servidor
    pub async fn stats(&self) -> AppResult<NovedadStats> {
        let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM novedades")
            .fetch_one(&self.pool)
            .await?;

        let rows: Vec<(NovedadType, i64)> = sqlx::query_as(
            "SELECT novedad_type, COUNT(*) FROM novedades GROUP BY novedad_type",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut by_type = HashMap::new();
        for (novedad_type, count) in rows {
            by_type.insert(novedad_type.as_str().to_string(), count);
        }

        let (today,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM novedades WHERE reported_at::date = CURRENT_DATE",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(NovedadStats { total, by_type, today })
    }
}

const LIST_BASE: &str = r#"
SELECT n.id, n.journey_id, n.driver_id, n.novedad_type, n.notes, n.reported_at,
       COALESCE(us.full_name, 'Sin conductor') AS driver_name,
       COALESCE(r.name, 'Sin ruta') AS route_name
FROM novedades n
LEFT JOIN usuarios us ON us.id = n.driver_id
LEFT JOIN trayectos t ON t.id = n.journey_id
LEFT JOIN rutas r ON r.id = t.route_id
"#;
