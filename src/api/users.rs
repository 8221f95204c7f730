//! Handlers de usuarios
//!
//! Este módulo maneja las operaciones CRUD para usuarios, incluida la
//! carga masiva por lote. La creación, actualización y eliminación están
//! reservadas al administrador; el listado queda abierto a cualquier
//! usuario autenticado porque los operadores lo necesitan para programar
//! trayectos.

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use bcrypt::{hash, DEFAULT_COST};
use uuid::Uuid;
use validator::Validate;

use crate::{
    middleware::auth::AuthenticatedUser,
    models::user::{
        CreateUserRequest, CreateUsersBulkRequest, NewUser, UpdateUserRequest, UserFilters,
        UserResponse,
    },
    repositories::UserRepository,
    services::AuthorizationService,
    state::AppState,
    utils::errors::{forbidden_error, AppError, AppResult},
};

/// Crear el router de usuarios
pub fn create_users_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_users))
        .route("/", post(create_user))
        .route("/bulk", post(create_users_bulk))
        .route("/:id", get(get_user))
        .route("/:id", put(update_user))
        .route("/:id", delete(delete_user))
}

/// Handler para listar usuarios.
/// `solo_activos` y `solo_conductores` filtran el resultado.
pub async fn get_users(
    Extension(_user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Query(filters): Query<UserFilters>,
) -> AppResult<Json<Vec<UserResponse>>> {
    let repository = UserRepository::new(state.pool.clone());

    let users = repository.list(&filters).await?;

    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// Handler para crear usuario
pub async fn create_user(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Json(user_data): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    let authz = AuthorizationService::new();
    if !authz.can_manage_users(user.role) {
        return Err(forbidden_error("Solo el administrador puede gestionar usuarios"));
    }

    user_data.validate()?;

    let repository = UserRepository::new(state.pool.clone());

    if repository
        .username_or_email_exists(&user_data.username, &user_data.email)
        .await?
    {
        return Err(AppError::Conflict("El usuario ya existe".to_string()));
    }

    let password_hash = hash(&user_data.password, DEFAULT_COST)
        .map_err(|e| AppError::Hash(format!("Error hasheando password: {}", e)))?;

    let new_user = repository
        .create(
            user_data.username,
            user_data.email,
            user_data.full_name,
            password_hash,
            user_data.role,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(new_user))))
}

/// Handler de carga masiva de usuarios.
/// Los usuarios que ya existen se saltan y la respuesta contiene solo
/// los creados; el lote se inserta en una sola transacción.
pub async fn create_users_bulk(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Json(request): Json<CreateUsersBulkRequest>,
) -> AppResult<(StatusCode, Json<Vec<UserResponse>>)> {
    let authz = AuthorizationService::new();
    if !authz.can_manage_users(user.role) {
        return Err(forbidden_error("Solo el administrador puede gestionar usuarios"));
    }

    for usuario in &request.usuarios {
        usuario.validate()?;
    }

    let repository = UserRepository::new(state.pool.clone());

    // Filtro previo al hasheo; el chequeo definitivo corre dentro de la
    // transacción del repositorio
    let mut rows = Vec::with_capacity(request.usuarios.len());
    for usuario in request.usuarios {
        if repository
            .username_or_email_exists(&usuario.username, &usuario.email)
            .await?
        {
            continue;
        }

        let password_hash = hash(&usuario.password, DEFAULT_COST)
            .map_err(|e| AppError::Hash(format!("Error hasheando password: {}", e)))?;

        rows.push(NewUser {
            username: usuario.username,
            email: usuario.email,
            full_name: usuario.full_name,
            password_hash,
            role: usuario.role,
        });
    }

    let created = repository.create_bulk(rows).await?;

    Ok((
        StatusCode::CREATED,
        Json(created.into_iter().map(UserResponse::from).collect()),
    ))
}

/// Handler para obtener usuario por ID
pub async fn get_user(
    Extension(_user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> AppResult<Json<UserResponse>> {
    let repository = UserRepository::new(state.pool.clone());

    let user_data = repository
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Usuario no encontrado".to_string()))?;

    Ok(Json(UserResponse::from(user_data)))
}

/// Handler para actualizar usuario
pub async fn update_user(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(user_data): Json<UpdateUserRequest>,
) -> AppResult<Json<UserResponse>> {
    let authz = AuthorizationService::new();
    if !authz.can_manage_users(user.role) {
        return Err(forbidden_error("Solo el administrador puede gestionar usuarios"));
    }

    user_data.validate()?;

    let password_hash = match user_data.password {
        Some(password) => Some(
            hash(&password, DEFAULT_COST)
                .map_err(|e| AppError::Hash(format!("Error hasheando password: {}", e)))?,
        ),
        None => None,
    };

    let repository = UserRepository::new(state.pool.clone());
    let updated = repository
        .update(
            user_id,
            user_data.email,
            user_data.full_name,
            password_hash,
            user_data.role,
            user_data.active,
        )
        .await?;

    Ok(Json(UserResponse::from(updated)))
}

/// Handler para eliminar usuario
pub async fn delete_user(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let authz = AuthorizationService::new();
    if !authz.can_manage_users(user.role) {
        return Err(forbidden_error("Solo el administrador puede gestionar usuarios"));
    }

    let repository = UserRepository::new(state.pool.clone());
    repository.delete(user_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
