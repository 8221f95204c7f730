//! Modelos del sistema
//!
//! Este módulo contiene todos los modelos de datos que mapean exactamente
//! al schema PostgreSQL con las convenciones estándar.

pub mod auth;
pub mod journey;
pub mod location;
pub mod novedad;
pub mod route;
pub mod user;
pub mod vehicle;
