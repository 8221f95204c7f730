//! Repositorios de acceso a datos
//!
//! Cada repositorio encapsula el SQL de una tabla y devuelve modelos
//! tipados. Las consultas son runtime (`query_as` con binds); los errores
//! del almacenamiento se propagan como `StoreUnavailable` sin interpretar,
//! salvo las violaciones de unicidad que se traducen a conflictos.

pub mod journey_repository;
pub mod location_repository;
pub mod novedad_repository;
pub mod route_repository;
pub mod user_repository;
pub mod vehicle_repository;

pub use journey_repository::JourneyRepository;
pub use location_repository::LocationRepository;
pub use novedad_repository::NovedadRepository;
pub use route_repository::RouteRepository;
pub use user_repository::UserRepository;
pub use vehicle_repository::VehicleRepository;
