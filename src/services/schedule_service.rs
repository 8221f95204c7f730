//! Servicio de duración y cumplimiento de horario
//!
//! Cálculos derivados sobre los timestamps de un trayecto. Nada de esto se
//! persiste, con la única excepción de `duration_minutes`, que se calcula
//! una sola vez al completar y nunca se recalcula.
//!
//! Toda la aritmética opera sobre `DateTime<Utc>`; no hay timestamps naive
//! en el sistema.

use chrono::{DateTime, Utc};

use crate::models::journey::{Journey, JourneyStatus};

/// Margen de tolerancia sobre la duración estimada de la ruta
const COMPLIANCE_MARGIN: f64 = 0.10;

/// Minutos transcurridos desde la salida para un trayecto EN_CURSO.
/// Devuelve None para cualquier otro estado.
pub fn duration_actual(journey: &Journey, now: DateTime<Utc>) -> Option<i64> {
    if journey.status != JourneyStatus::EnCurso {
        return None;
    }
    let departed_at = journey.departed_at?;
    Some((now - departed_at).num_minutes())
}

/// Duración definitiva de un trayecto al completarse, en minutos enteros
/// redondeados al más cercano.
pub fn duration_on_completion(departed_at: DateTime<Utc>, arrived_at: DateTime<Utc>) -> i32 {
    let minutes = (arrived_at - departed_at).num_seconds() as f64 / 60.0;
    minutes.round() as i32
}

/// Cumplimiento de horario de un trayecto completado.
///
/// Solo aplica cuando el trayecto está COMPLETADO, su ruta tiene duración
/// estimada y ambos timestamps existen; en cualquier otro caso devuelve
/// None. Cumple si la duración real quedó dentro del ±10% de la estimada,
/// extremos incluidos.
pub fn schedule_compliance(
    journey: &Journey,
    estimated_duration_minutes: Option<i32>,
) -> Option<bool> {
    if journey.status != JourneyStatus::Completado {
        return None;
    }
    let departed_at = journey.departed_at?;
    let arrived_at = journey.arrived_at?;
    let estimated = estimated_duration_minutes? as f64;

    let actual = (arrived_at - departed_at).num_seconds() as f64 / 60.0;
    let margin = COMPLIANCE_MARGIN * estimated;

    Some(actual >= estimated - margin && actual <= estimated + margin)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use uuid::Uuid;

    fn journey_with(
        status: JourneyStatus,
        departed_at: Option<DateTime<Utc>>,
        arrived_at: Option<DateTime<Utc>>,
    ) -> Journey {
        Journey {
            id: Uuid::new_v4(),
            route_id: Some(Uuid::new_v4()),
            driver_id: Some(Uuid::new_v4()),
            vehicle_id: Some(Uuid::new_v4()),
            status,
            created_at: Utc::now(),
            departed_at,
            arrived_at,
            passenger_count: None,
            duration_minutes: None,
        }
    }

    #[test]
    fn test_duration_actual_solo_en_curso() {
        let departed = Utc::now() - Duration::minutes(45);
        let journey = journey_with(JourneyStatus::EnCurso, Some(departed), None);

        assert_eq!(duration_actual(&journey, departed + Duration::minutes(45)), Some(45));

        let programado = journey_with(JourneyStatus::Programado, None, None);
        assert_eq!(duration_actual(&programado, Utc::now()), None);

        let completado = journey_with(
            JourneyStatus::Completado,
            Some(departed),
            Some(departed + Duration::minutes(50)),
        );
        assert_eq!(duration_actual(&completado, Utc::now()), None);
    }

    #[test]
    fn test_duration_on_completion_redondea() {
        let departed = Utc::now();

        // 63 minutos exactos
        assert_eq!(duration_on_completion(departed, departed + Duration::minutes(63)), 63);
        // 62 minutos 40 segundos -> 63
        assert_eq!(
            duration_on_completion(departed, departed + Duration::seconds(62 * 60 + 40)),
            63
        );
        // 62 minutos 20 segundos -> 62
        assert_eq!(
            duration_on_completion(departed, departed + Duration::seconds(62 * 60 + 20)),
            62
        );
    }

    #[test]
    fn test_schedule_compliance_margen_10_por_ciento() {
        let departed = Utc::now() - Duration::hours(2);

        // Estimado 60 min: margen de 6, acepta [54, 66]
        let dentro = journey_with(
            JourneyStatus::Completado,
            Some(departed),
            Some(departed + Duration::minutes(63)),
        );
        assert_eq!(schedule_compliance(&dentro, Some(60)), Some(true));

        let fuera = journey_with(
            JourneyStatus::Completado,
            Some(departed),
            Some(departed + Duration::minutes(70)),
        );
        assert_eq!(schedule_compliance(&fuera, Some(60)), Some(false));

        // Extremos inclusivos
        let limite_superior = journey_with(
            JourneyStatus::Completado,
            Some(departed),
            Some(departed + Duration::minutes(66)),
        );
        assert_eq!(schedule_compliance(&limite_superior, Some(60)), Some(true));

        let limite_inferior = journey_with(
            JourneyStatus::Completado,
            Some(departed),
            Some(departed + Duration::minutes(54)),
        );
        assert_eq!(schedule_compliance(&limite_inferior, Some(60)), Some(true));

        let demasiado_rapido = journey_with(
            JourneyStatus::Completado,
            Some(departed),
            Some(departed + Duration::minutes(53)),
        );
        assert_eq!(schedule_compliance(&demasiado_rapido, Some(60)), Some(false));
    }

    #[test]
    fn test_schedule_compliance_no_aplica() {
        let departed = Utc::now() - Duration::hours(1);

        // Sin duración estimada en la ruta
        let sin_estimado = journey_with(
            JourneyStatus::Completado,
            Some(departed),
            Some(departed + Duration::minutes(60)),
        );
        assert_eq!(schedule_compliance(&sin_estimado, None), None);

        // Trayecto aún en curso
        let en_curso = journey_with(JourneyStatus::EnCurso, Some(departed), None);
        assert_eq!(schedule_compliance(&en_curso, Some(60)), None);

        // Cancelado: tiene arrived_at pero el cumplimiento no aplica
        let cancelado = journey_with(
            JourneyStatus::Cancelado,
            Some(departed),
            Some(departed + Duration::minutes(60)),
        );
        assert_eq!(schedule_compliance(&cancelado, Some(60)), None);
    }
}
