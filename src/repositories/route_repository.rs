//! Repositorio de rutas

use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::route::{CreateRouteRequest, Route};
use crate::utils::errors::{not_found_error, AppResult};

pub struct RouteRepository {
    pool: PgPool,
}

impl RouteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        name: String,
        origin: String,
        destination: String,
        distance_km: Option<Decimal>,
        estimated_duration_minutes: Option<i32>,
    ) -> AppResult<Route> {
        let route = sqlx::query_as::<_, Route>(
            r#"
            INSERT INTO rutas (id, name, origin, destination, distance_km, estimated_duration_minutes, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(origin)
        .bind(destination)
        .bind(distance_km)
        .bind(estimated_duration_minutes)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(route)
    }

    /// Inserta un lote de rutas en una sola transacción. Las rutas no
    /// tienen restricción de unicidad, así que el lote entra completo o
    /// no entra.
    pub async fn create_bulk(&self, routes: Vec<CreateRouteRequest>) -> AppResult<Vec<Route>> {
        let mut tx = self.pool.begin().await?;
        let mut created = Vec::with_capacity(routes.len());

        for route in routes {
            let inserted = sqlx::query_as::<_, Route>(
                r#"
                INSERT INTO rutas (id, name, origin, destination, distance_km, estimated_duration_minutes, created_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                RETURNING *
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(route.name)
            .bind(route.origin)
            .bind(route.destination)
            .bind(route.distance_km)
            .bind(route.estimated_duration_minutes)
            .bind(Utc::now())
            .fetch_one(&mut *tx)
            .await?;

            created.push(inserted);
        }

        tx.commit().await?;
        Ok(created)
    }

    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Route>> {
        let route = sqlx::query_as::<_, Route>("SELECT * FROM rutas WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(route)
    }

    pub async fn list(&self) -> AppResult<Vec<Route>> {
        let routes = sqlx::query_as::<_, Route>("SELECT * FROM rutas ORDER BY name")
            .fetch_all(&self.pool)
            .await?;

        Ok(routes)
    }

    pub async fn update(
        &self,
        id: Uuid,
        name: Option<String>,
        origin: Option<String>,
        destination: Option<String>,
        distance_km: Option<Decimal>,
        estimated_duration_minutes: Option<i32>,
    ) -> AppResult<Route> {
        let route = sqlx::query_as::<_, Route>(
            r#"
            UPDATE rutas
            SET name = COALESCE($2, name),
                origin = COALESCE($3, origin),
                destination = COALESCE($4, destination),
                distance_km = COALESCE($5, distance_km),
                estimated_duration_minutes = COALESCE($6, estimated_duration_minutes)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(origin)
        .bind(destination)
        .bind(distance_km)
        .bind(estimated_duration_minutes)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| not_found_error("Ruta", &id.to_string()))?;

        Ok(route)
    }

    /// El schema pone en NULL las referencias de los trayectos que
    /// apuntaban a la ruta eliminada
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM rutas WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(not_found_error("Ruta", &id.to_string()));
        }

        Ok(())
    }
}
