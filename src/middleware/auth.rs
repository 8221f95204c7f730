//! Middleware de autenticación JWT
//!
//! Valida el token Bearer y expone un `AuthenticatedUser` en las
//! extensions de la request. La validación es puramente de claims: el
//! token firmado ya lleva el id, el username y el rol, así que no hay
//! consulta al almacenamiento en cada request.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::{
    models::user::UserRole,
    state::AppState,
    utils::errors::AppError,
    utils::jwt::{extract_token_from_header, verify_token, JwtConfig},
};

/// Usuario autenticado que se inyecta en las requests
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub username: String,
    pub role: UserRole,
}

/// Middleware de autenticación JWT
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|auth_str| auth_str.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Token de autorización requerido".to_string()))?;

    let token = extract_token_from_header(auth_header)
        .map_err(|_| AppError::Unauthorized("Token de autorización requerido".to_string()))?;

    let jwt_config = JwtConfig::from(&state.config);
    let claims = verify_token(token, &jwt_config)
        .map_err(|_| AppError::Unauthorized("Token inválido o expirado".to_string()))?;

    let authenticated_user = AuthenticatedUser {
        user_id: claims.sub,
        username: claims.username,
        role: claims.role,
    };

    request.extensions_mut().insert(authenticated_user);

    Ok(next.run(request).await)
}
