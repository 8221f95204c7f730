//! Controllers del sistema
//!
//! Capa de negocio entre los handlers HTTP y los repositorios. Aquí viven
//! las reglas del dominio: validación de referencias, precondiciones de
//! estado y autorización por rol.

pub mod journey_controller;
pub mod location_controller;
pub mod novedad_controller;

pub use journey_controller::JourneyController;
pub use location_controller::LocationController;
pub use novedad_controller::NovedadController;
