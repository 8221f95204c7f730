//! Motor de monitoreo de flota: ciclo de vida de trayectos, telemetría
//! de conductores y registro de novedades.

pub mod api;
pub mod config;
pub mod controllers;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

pub use routes::create_router;
pub use state::AppState;
pub use utils::errors::{AppError, AppResult};
