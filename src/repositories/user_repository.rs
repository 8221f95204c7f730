//! Repositorio de usuarios

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::user::{NewUser, User, UserFilters, UserRole};
use crate::utils::errors::{not_found_error, AppError, AppResult};

pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        username: String,
        email: String,
        full_name: String,
        password_hash: String,
        role: UserRole,
    ) -> AppResult<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO usuarios (id, username, email, full_name, password_hash, role, active, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, TRUE, $7)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(username)
        .bind(email)
        .bind(full_name)
        .bind(password_hash)
        .bind(role)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(map_unique_violation)?;

        Ok(user)
    }

    /// Inserta un lote de usuarios en una sola transacción. Los que ya
    /// existen por username o email se saltan; el resultado contiene solo
    /// los insertados. El chequeo de presencia corre dentro de la misma
    /// transacción, así que también ve las filas del propio lote.
    pub async fn create_bulk(&self, users: Vec<NewUser>) -> AppResult<Vec<User>> {
        let mut tx = self.pool.begin().await?;
        let mut created = Vec::with_capacity(users.len());

        for user in users {
            let exists: (bool,) = sqlx::query_as(
                "SELECT EXISTS(SELECT 1 FROM usuarios WHERE username = $1 OR email = $2)",
            )
            .bind(&user.username)
            .bind(&user.email)
            .fetch_one(&mut *tx)
            .await?;
            if exists.0 {
                continue;
            }

            let inserted = sqlx::query_as::<_, User>(
                r#"
                INSERT INTO usuarios (id, username, email, full_name, password_hash, role, active, created_at)
                VALUES ($1, $2, $3, $4, $5, $6, TRUE, $7)
                RETURNING *
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(user.username)
            .bind(user.email)
            .bind(user.full_name)
            .bind(user.password_hash)
            .bind(user.role)
            .bind(Utc::now())
            .fetch_one(&mut *tx)
            .await
            .map_err(map_unique_violation)?;

            created.push(inserted);
        }

        tx.commit().await?;
        Ok(created)
    }

    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM usuarios WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    /// Búsqueda para login: acepta el nombre de usuario o el email
    pub async fn find_by_username_or_email(&self, identifier: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT * FROM usuarios WHERE username = $1 OR email = $1",
        )
        .bind(identifier)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn username_or_email_exists(&self, username: &str, email: &str) -> AppResult<bool> {
        let result: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM usuarios WHERE username = $1 OR email = $2)",
        )
        .bind(username)
        .bind(email)
        .fetch_one(&self.pool)
        .await?;

        Ok(result.0)
    }

    pub async fn list(&self, filters: &UserFilters) -> AppResult<Vec<User>> {
        let mut query = String::from("SELECT * FROM usuarios WHERE 1=1");
        if filters.solo_activos.unwrap_or(false) {
            query.push_str(" AND active = TRUE");
        }
        if filters.solo_conductores.unwrap_or(false) {
            query.push_str(" AND role = 'conductor'");
        }
        query.push_str(" ORDER BY full_name");

        let users = sqlx::query_as::<_, User>(&query)
            .fetch_all(&self.pool)
            .await?;

        Ok(users)
    }

    pub async fn update(
        &self,
        id: Uuid,
        email: Option<String>,
        full_name: Option<String>,
        password_hash: Option<String>,
        role: Option<UserRole>,
        active: Option<bool>,
    ) -> AppResult<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE usuarios
            SET email = COALESCE($2, email),
                full_name = COALESCE($3, full_name),
                password_hash = COALESCE($4, password_hash),
                role = COALESCE($5, role),
                active = COALESCE($6, active)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(email)
        .bind(full_name)
        .bind(password_hash)
        .bind(role)
        .bind(active)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_unique_violation)?
        .ok_or_else(|| not_found_error("Usuario", &id.to_string()))?;

        Ok(user)
    }

    /// El schema pone en NULL las referencias de trayectos y novedades
    /// que apuntaban al usuario eliminado
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM usuarios WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(not_found_error("Usuario", &id.to_string()));
        }

        Ok(())
    }
}

/// Violación de unicidad de username o email
fn map_unique_violation(e: sqlx::Error) -> AppError {
    match &e {
        sqlx::Error::Database(dbe) if dbe.code().as_deref() == Some("23505") => {
            AppError::Conflict("El usuario ya existe".to_string())
        }
        _ => AppError::StoreUnavailable(e),
    }
}
