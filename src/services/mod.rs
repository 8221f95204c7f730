//! Services module
//! 
//! Este módulo contiene la lógica de negocio y servicios de la aplicación.
//! Los servicios encapsulan cálculos puros del dominio que no dependen
//! del almacenamiento.

pub mod authorization_service;
pub mod schedule_service;

pub use authorization_service::AuthorizationService;
