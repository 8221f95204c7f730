//! API endpoints
//!
//! Este módulo contiene los handlers CRUD de datos maestros (usuarios,
//! vehículos, rutas) y la autenticación. Los trayectos, la telemetría y
//! las novedades viven en `routes/` con sus controllers.

pub mod auth;
pub mod routes;
pub mod users;
pub mod vehicles;
