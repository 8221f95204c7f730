//! Controller de trayectos
//!
//! Orquesta el ciclo de vida del trayecto: validación de referencias al
//! crear, transiciones de estado y enriquecimiento de lecturas con los
//! campos de presentación. Los nombres se resuelven en cada lectura; un
//! referente eliminado se muestra con su placeholder en lugar de romper
//! el historial.

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::journey::{
    CreateJourneyRequest, Journey, JourneyResponse, UpdateJourneyRequest,
};
use crate::models::user::UserRole;
use crate::repositories::{
    JourneyRepository, NovedadRepository, RouteRepository, UserRepository, VehicleRepository,
};
use crate::services::{schedule_service, AuthorizationService};
use crate::utils::errors::{invalid_input_error, not_found_error, AppError, AppResult};

const NO_ROUTE: &str = "Sin ruta";
const NO_DRIVER: &str = "Sin conductor";
const NO_VEHICLE: &str = "Sin vehículo";

pub struct JourneyController {
    journeys: JourneyRepository,
    routes: RouteRepository,
    users: UserRepository,
    vehicles: VehicleRepository,
    novedades: NovedadRepository,
    authz: AuthorizationService,
}

impl JourneyController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            journeys: JourneyRepository::new(pool.clone()),
            routes: RouteRepository::new(pool.clone()),
            users: UserRepository::new(pool.clone()),
            vehicles: VehicleRepository::new(pool.clone()),
            novedades: NovedadRepository::new(pool),
            authz: AuthorizationService::new(),
        }
    }

    /// Programa un nuevo trayecto. Las tres referencias deben existir y
    /// el usuario referenciado debe tener rol de conductor.
    pub async fn create(&self, request: CreateJourneyRequest) -> AppResult<JourneyResponse> {
        self.ensure_route_exists(request.route_id).await?;
        self.ensure_driver_exists(request.driver_id).await?;
        self.ensure_vehicle_exists(request.vehicle_id).await?;

        let journey = self
            .journeys
            .create(request.route_id, request.driver_id, request.vehicle_id)
            .await?;

        self.build_response(journey).await
    }

    pub async fn get(&self, id: Uuid) -> AppResult<JourneyResponse> {
        let journey = self
            .journeys
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Trayecto", &id.to_string()))?;

        self.build_response(journey).await
    }

    pub async fn list(&self) -> AppResult<Vec<JourneyResponse>> {
        let journeys = self.journeys.list().await?;

        let mut responses = Vec::with_capacity(journeys.len());
        for journey in journeys {
            responses.push(self.build_response(journey).await?);
        }

        Ok(responses)
    }

    pub async fn start(&self, id: Uuid) -> AppResult<JourneyResponse> {
        let journey = self.journeys.start(id).await?;
        self.build_response(journey).await
    }

    pub async fn cancel(&self, id: Uuid) -> AppResult<JourneyResponse> {
        let journey = self.journeys.cancel(id).await?;
        self.build_response(journey).await
    }

    pub async fn complete(&self, id: Uuid, passenger_count: i32) -> AppResult<JourneyResponse> {
        if passenger_count < 0 {
            return Err(invalid_input_error(
                "La cantidad de pasajeros no puede ser negativa",
            ));
        }

        let journey = self.journeys.complete(id, passenger_count).await?;
        self.build_response(journey).await
    }

    /// Edita las referencias de un trayecto aún programado. Cada
    /// referencia nueva debe existir.
    pub async fn update(&self, id: Uuid, request: UpdateJourneyRequest) -> AppResult<JourneyResponse> {
        if let Some(route_id) = request.route_id {
            self.ensure_route_exists(route_id).await?;
        }
        if let Some(driver_id) = request.driver_id {
            self.ensure_driver_exists(driver_id).await?;
        }
        if let Some(vehicle_id) = request.vehicle_id {
            self.ensure_vehicle_exists(vehicle_id).await?;
        }

        let journey = self
            .journeys
            .update_references(id, request.route_id, request.driver_id, request.vehicle_id)
            .await?;

        self.build_response(journey).await
    }

    pub async fn delete(&self, id: Uuid, actor_role: UserRole) -> AppResult<()> {
        if !self.authz.can_delete_journey(actor_role) {
            return Err(AppError::Forbidden(
                "No tienes permiso para eliminar trayectos".to_string(),
            ));
        }

        self.journeys.delete(id).await
    }

    async fn ensure_route_exists(&self, route_id: Uuid) -> AppResult<()> {
        self.routes
            .find_by_id(route_id)
            .await?
            .ok_or_else(|| not_found_error("Ruta", &route_id.to_string()))?;
        Ok(())
    }

    async fn ensure_driver_exists(&self, driver_id: Uuid) -> AppResult<()> {
        let user = self
            .users
            .find_by_id(driver_id)
            .await?
            .ok_or_else(|| not_found_error("Conductor", &driver_id.to_string()))?;

        if user.role != UserRole::Conductor {
            return Err(invalid_input_error(&format!(
                "El usuario '{}' no tiene rol de conductor",
                user.username
            )));
        }

        Ok(())
    }

    async fn ensure_vehicle_exists(&self, vehicle_id: Uuid) -> AppResult<()> {
        self.vehicles
            .find_by_id(vehicle_id)
            .await?
            .ok_or_else(|| not_found_error("Vehículo", &vehicle_id.to_string()))?;
        Ok(())
    }

    /// Enriquecimiento de lectura: nombres de presentación, derivados de
    /// duración y resumen de novedades. Nada de esto se persiste.
    async fn build_response(&self, journey: Journey) -> AppResult<JourneyResponse> {
        let route = match journey.route_id {
            Some(route_id) => self.routes.find_by_id(route_id).await?,
            None => None,
        };
        let driver = match journey.driver_id {
            Some(driver_id) => self.users.find_by_id(driver_id).await?,
            None => None,
        };
        let vehicle = match journey.vehicle_id {
            Some(vehicle_id) => self.vehicles.find_by_id(vehicle_id).await?,
            None => None,
        };
        let novedades = self.novedades.summaries_for_journey(journey.id).await?;

        let duration_actual = schedule_service::duration_actual(&journey, Utc::now());
        let schedule_compliance = schedule_service::schedule_compliance(
            &journey,
            route.as_ref().and_then(|r| r.estimated_duration_minutes),
        );

        Ok(JourneyResponse {
            id: journey.id,
            route_id: journey.route_id,
            driver_id: journey.driver_id,
            vehicle_id: journey.vehicle_id,
            status: journey.status,
            created_at: journey.created_at,
            departed_at: journey.departed_at,
            arrived_at: journey.arrived_at,
            passenger_count: journey.passenger_count,
            duration_minutes: journey.duration_minutes,
            route_name: route.map(|r| r.name).unwrap_or_else(|| NO_ROUTE.to_string()),
            driver_name: driver
                .map(|u| u.full_name)
                .unwrap_or_else(|| NO_DRIVER.to_string()),
            vehicle_plate: vehicle
                .map(|v| v.plate)
                .unwrap_or_else(|| NO_VEHICLE.to_string()),
            duration_actual,
            schedule_compliance,
            novedades,
        })
    }
}
