//! Modelo de User
//!
//! Este módulo contiene el struct User y sus variantes para CRUD operations.
//! Los conductores son usuarios con rol `conductor`; no existe una tabla
//! separada de conductores.

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use validator::Validate;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Rol del usuario - mapea al ENUM user_role
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Administrador,
    Operador,
    Supervisor,
    Conductor,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Administrador => "administrador",
            UserRole::Operador => "operador",
            UserRole::Supervisor => "supervisor",
            UserRole::Conductor => "conductor",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "administrador" => Some(UserRole::Administrador),
            "operador" => Some(UserRole::Operador),
            "supervisor" => Some(UserRole::Supervisor),
            "conductor" => Some(UserRole::Conductor),
            _ => None,
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// User principal - mapea exactamente a la tabla usuarios
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub full_name: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: UserRole,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

/// Request para crear un nuevo usuario
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 3, max = 50))]
    pub username: String,

    #[validate(email)]
    pub email: String,

    #[validate(length(min = 2, max = 100))]
    pub full_name: String,

    #[validate(length(min = 6, max = 100))]
    pub password: String,

    pub role: UserRole,
}

/// Request para actualizar un usuario existente
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(email)]
    pub email: Option<String>,

    #[validate(length(min = 2, max = 100))]
    pub full_name: Option<String>,

    #[validate(length(min = 6, max = 100))]
    pub password: Option<String>,

    pub role: Option<UserRole>,

    pub active: Option<bool>,
}

/// Request de carga masiva de usuarios.
/// Conserva la envoltura `{ "usuarios": [...] }` que envían los clientes
/// de importación por archivo.
#[derive(Debug, Deserialize)]
pub struct CreateUsersBulkRequest {
    pub usuarios: Vec<CreateUserRequest>,
}

/// Fila lista para insertar en una carga masiva, con la contraseña ya
/// hasheada
#[derive(Debug)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub password_hash: String,
    pub role: UserRole,
}

/// Response de usuario para la API (sin hash de contraseña)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub role: UserRole,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

/// Filtros para listado de usuarios
#[derive(Debug, Clone, Deserialize)]
pub struct UserFilters {
    pub solo_activos: Option<bool>,
    pub solo_conductores: Option<bool>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            full_name: user.full_name,
            role: user.role,
            active: user.active,
            created_at: user.created_at,
        }
    }
}
