//! Controller de novedades
//!
//! Reglas de negocio del registro de novedades: solo sobre trayectos
//! EN_CURSO, con el conductor restringido a sus propios trayectos y las
//! estadísticas reservadas a roles elevados.

use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::models::journey::JourneyStatus;
use crate::models::novedad::{CreateNovedadRequest, Novedad, NovedadResponse, NovedadStats};
use crate::models::user::UserRole;
use crate::repositories::{JourneyRepository, NovedadRepository};
use crate::services::AuthorizationService;
use crate::utils::errors::{invalid_state_error, not_found_error, AppError, AppResult};

pub struct NovedadController {
    novedades: NovedadRepository,
    journeys: JourneyRepository,
    authz: AuthorizationService,
}

impl NovedadController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            novedades: NovedadRepository::new(pool.clone()),
            journeys: JourneyRepository::new(pool),
            authz: AuthorizationService::new(),
        }
    }

    /// Reporta una novedad contra un trayecto en curso. El reportante es
    /// siempre el actor autenticado.
    pub async fn report(
        &self,
        actor_id: Uuid,
        actor_role: UserRole,
        request: CreateNovedadRequest,
    ) -> AppResult<Novedad> {
        request.validate()?;

        let journey = self
            .journeys
            .find_by_id(request.journey_id)
            .await?
            .ok_or_else(|| not_found_error("Trayecto", &request.journey_id.to_string()))?;

        if journey.status != JourneyStatus::EnCurso {
            return Err(invalid_state_error(
                "reportar una novedad",
                journey.status.as_str(),
                JourneyStatus::EnCurso.as_str(),
            ));
        }

        if !self
            .authz
            .can_report_novedad(actor_role, actor_id, journey.driver_id)
        {
            return Err(AppError::Forbidden(
                "Solo puedes reportar novedades de tus propios trayectos".to_string(),
            ));
        }

        self.novedades
            .create(request.journey_id, actor_id, request.novedad_type, request.notes)
            .await
    }

    /// Los conductores ven solo sus novedades; los demás roles ven todas
    pub async fn list(
        &self,
        actor_id: Uuid,
        actor_role: UserRole,
    ) -> AppResult<Vec<NovedadResponse>> {
        if self.authz.can_view_all_novedades(actor_role) {
            self.novedades.list_all().await
        } else {
            self.novedades.list_by_driver(actor_id).await
        }
    }

    pub async fn stats(&self, actor_role: UserRole) -> AppResult<NovedadStats> {
        if !self.authz.can_view_novedad_stats(actor_role) {
            return Err(AppError::Forbidden(
                "No tienes permisos para ver estadísticas".to_string(),
            ));
        }

        self.novedades.stats().await
    }
}
