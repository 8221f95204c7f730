//! Handlers de autenticación
//!
//! Este módulo maneja el login y la consulta del usuario autenticado.

use axum::{
    extract::{Extension, State},
    Json,
};
use bcrypt::verify;
use validator::Validate;

use crate::{
    middleware::auth::AuthenticatedUser,
    models::auth::{LoginRequest, LoginResponse},
    models::user::UserResponse,
    repositories::UserRepository,
    state::AppState,
    utils::errors::{AppError, AppResult},
    utils::jwt::{generate_token, JwtConfig},
};

/// Handler de login. Acepta el nombre de usuario o el email.
pub async fn login(
    State(state): State<AppState>,
    Json(login_data): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    login_data.validate()?;

    let repository = UserRepository::new(state.pool.clone());

    // La misma respuesta para usuario inexistente y contraseña errónea
    let user = repository
        .find_by_username_or_email(&login_data.username)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Credenciales incorrectas".to_string()))?;

    if !user.active {
        return Err(AppError::Unauthorized("Usuario inactivo".to_string()));
    }

    let password_valid = verify(&login_data.password, &user.password_hash)
        .map_err(|e| AppError::Hash(format!("Error verificando password: {}", e)))?;

    if !password_valid {
        return Err(AppError::Unauthorized("Credenciales incorrectas".to_string()));
    }

    let jwt_config = JwtConfig::from(&state.config);
    let access_token = generate_token(user.id, &user.username, user.role, &jwt_config)?;

    Ok(Json(LoginResponse {
        access_token,
        token_type: "Bearer".to_string(),
        user: UserResponse::from(user),
    }))
}

/// Handler para obtener información del usuario autenticado
pub async fn me(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
) -> AppResult<Json<UserResponse>> {
    let repository = UserRepository::new(state.pool.clone());

    let user_data = repository
        .find_by_id(user.user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("El usuario ya no existe".to_string()))?;

    Ok(Json(UserResponse::from(user_data)))
}
