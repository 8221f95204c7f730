//! Servicio de autorización
//!
//! Política centralizada de roles: cada operación sensible consulta aquí
//! en lugar de mantener listas de roles permitidos repartidas por los
//! handlers. La decisión solo depende del rol del actor (y, para las
//! novedades, de si el trayecto le pertenece).

use uuid::Uuid;

use crate::models::user::UserRole;

/// Política de autorización del sistema
pub struct AuthorizationService;

impl AuthorizationService {
    pub fn new() -> Self {
        Self
    }

    /// Verifica si el actor tiene alguno de los roles indicados
    pub fn has_any_role(&self, role: UserRole, required_roles: &[UserRole]) -> bool {
        required_roles.contains(&role)
    }

    /// Gestionar usuarios (crear, actualizar, eliminar)
    pub fn can_manage_users(&self, role: UserRole) -> bool {
        matches!(role, UserRole::Administrador)
    }

    /// Crear o eliminar rutas y vehículos
    pub fn can_manage_fleet(&self, role: UserRole) -> bool {
        matches!(role, UserRole::Administrador)
    }

    /// Editar rutas y vehículos existentes
    pub fn can_edit_fleet(&self, role: UserRole) -> bool {
        matches!(role, UserRole::Administrador | UserRole::Supervisor)
    }

    /// Eliminar trayectos programados
    pub fn can_delete_journey(&self, role: UserRole) -> bool {
        matches!(role, UserRole::Administrador)
    }

    /// Ver estadísticas de novedades
    pub fn can_view_novedad_stats(&self, role: UserRole) -> bool {
        matches!(role, UserRole::Administrador | UserRole::Supervisor)
    }

    /// Ver las novedades de toda la flota; los conductores solo ven
    /// las propias
    pub fn can_view_all_novedades(&self, role: UserRole) -> bool {
        !matches!(role, UserRole::Conductor)
    }

    /// Reportar una novedad sobre el trayecto indicado.
    /// Un conductor solo puede reportar sobre su propio trayecto; los
    /// demás roles no tienen esa restricción.
    pub fn can_report_novedad(
        &self,
        role: UserRole,
        actor_id: Uuid,
        journey_driver_id: Option<Uuid>,
    ) -> bool {
        match role {
            UserRole::Conductor => journey_driver_id == Some(actor_id),
            _ => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gestion_de_usuarios_solo_administrador() {
        let authz = AuthorizationService::new();

        assert!(authz.can_manage_users(UserRole::Administrador));
        assert!(!authz.can_manage_users(UserRole::Supervisor));
        assert!(!authz.can_manage_users(UserRole::Operador));
        assert!(!authz.can_manage_users(UserRole::Conductor));
    }

    #[test]
    fn test_edicion_de_flota() {
        let authz = AuthorizationService::new();

        assert!(authz.can_edit_fleet(UserRole::Administrador));
        assert!(authz.can_edit_fleet(UserRole::Supervisor));
        assert!(!authz.can_edit_fleet(UserRole::Operador));
        assert!(!authz.can_edit_fleet(UserRole::Conductor));

        assert!(authz.can_manage_fleet(UserRole::Administrador));
        assert!(!authz.can_manage_fleet(UserRole::Supervisor));
    }

    #[test]
    fn test_estadisticas_de_novedades() {
        let authz = AuthorizationService::new();

        assert!(authz.can_view_novedad_stats(UserRole::Administrador));
        assert!(authz.can_view_novedad_stats(UserRole::Supervisor));
        assert!(!authz.can_view_novedad_stats(UserRole::Operador));
        assert!(!authz.can_view_novedad_stats(UserRole::Conductor));
    }

    #[test]
    fn test_conductor_solo_reporta_su_trayecto() {
        let authz = AuthorizationService::new();
        let conductor = Uuid::new_v4();
        let otro = Uuid::new_v4();

        assert!(authz.can_report_novedad(UserRole::Conductor, conductor, Some(conductor)));
        assert!(!authz.can_report_novedad(UserRole::Conductor, conductor, Some(otro)));
        assert!(!authz.can_report_novedad(UserRole::Conductor, conductor, None));

        // Los roles elevados no tienen la restricción
        assert!(authz.can_report_novedad(UserRole::Supervisor, conductor, Some(otro)));
        assert!(authz.can_report_novedad(UserRole::Administrador, conductor, None));
    }

    #[test]
    fn test_visibilidad_de_novedades() {
        let authz = AuthorizationService::new();

        assert!(authz.can_view_all_novedades(UserRole::Administrador));
        assert!(authz.can_view_all_novedades(UserRole::Supervisor));
        assert!(authz.can_view_all_novedades(UserRole::Operador));
        assert!(!authz.can_view_all_novedades(UserRole::Conductor));
    }

    #[test]
    fn test_has_any_role() {
        let authz = AuthorizationService::new();
        let elevados = [UserRole::Administrador, UserRole::Supervisor];

        assert!(authz.has_any_role(UserRole::Supervisor, &elevados));
        assert!(!authz.has_any_role(UserRole::Conductor, &elevados));
    }
}
