//! Modelos de autenticación

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::user::UserResponse;

/// Request de login. `username` acepta el nombre de usuario o el email.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1))]
    pub username: String,

    #[validate(length(min = 1))]
    pub password: String,
}

/// Response de login con el token emitido
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    pub user: UserResponse,
}
