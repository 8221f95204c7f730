//! Tests de flujo contra una base de datos real.
//!
//! Se saltan silenciosamente si `TEST_DATABASE_URL` no está definida.
//! Cada test siembra sus propios datos maestros con identificadores
//! aleatorios, así que la suite tolera ejecuciones repetidas y paralelas
//! sobre la misma base.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

use fleet_monitoring::config::environment::EnvironmentConfig;
use fleet_monitoring::controllers::{JourneyController, LocationController, NovedadController};
use fleet_monitoring::models::journey::{CreateJourneyRequest, JourneyStatus, UpdateJourneyRequest};
use fleet_monitoring::models::location::ReportLocationRequest;
use fleet_monitoring::models::novedad::{CreateNovedadRequest, NovedadType};
use fleet_monitoring::models::route::Route;
use fleet_monitoring::models::user::{User, UserRole};
use fleet_monitoring::models::vehicle::Vehicle;
use fleet_monitoring::repositories::{RouteRepository, UserRepository, VehicleRepository};
use fleet_monitoring::routes::create_router;
use fleet_monitoring::state::AppState;
use fleet_monitoring::utils::errors::AppError;
use fleet_monitoring::utils::jwt::{generate_token, JwtConfig};

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

macro_rules! skip_if_no_db {
    () => {
        if std::env::var("TEST_DATABASE_URL").is_err() {
            eprintln!("Saltando test: TEST_DATABASE_URL no está definida");
            return;
        }
    };
}

async fn test_pool() -> PgPool {
    let url = std::env::var("TEST_DATABASE_URL").unwrap();
    let pool = PgPool::connect(&url).await.unwrap();
    MIGRATOR.run(&pool).await.unwrap();
    pool
}

fn test_config() -> EnvironmentConfig {
    EnvironmentConfig {
        environment: "development".to_string(),
        port: 3000,
        host: "127.0.0.1".to_string(),
        jwt_secret: "secreto-de-pruebas".to_string(),
        jwt_expiration: 3600,
        cors_origins: vec![],
    }
}

fn random_plate() -> String {
    let bytes = *Uuid::new_v4().as_bytes();
    let letter = |b: u8| (b'A' + (b % 26)) as char;
    let digit = |b: u8| (b'0' + (b % 10)) as char;
    format!(
        "{}{}{}{}{}{}",
        letter(bytes[0]),
        letter(bytes[1]),
        letter(bytes[2]),
        digit(bytes[3]),
        digit(bytes[4]),
        digit(bytes[5]),
    )
}

async fn seed_driver(pool: &PgPool) -> User {
    let suffix = Uuid::new_v4().simple().to_string();
    UserRepository::new(pool.clone())
        .create(
            format!("conductor_{}", &suffix[..12]),
            format!("conductor_{}@flota.com", &suffix[..12]),
            "Conductor de Prueba".to_string(),
            "$2b$12$hash-que-no-se-verifica".to_string(),
            UserRole::Conductor,
        )
        .await
        .unwrap()
}

async fn seed_route(pool: &PgPool, estimated_duration_minutes: Option<i32>) -> Route {
    let suffix = Uuid::new_v4().simple().to_string();
    RouteRepository::new(pool.clone())
        .create(
            format!("Ruta {}", &suffix[..8]),
            "Manizales".to_string(),
            "Pereira".to_string(),
            None,
            estimated_duration_minutes,
        )
        .await
        .unwrap()
}

async fn seed_vehicle(pool: &PgPool) -> Vehicle {
    VehicleRepository::new(pool.clone())
        .create(random_plate(), Some("Chevrolet NPR".to_string()), Some(30))
        .await
        .unwrap()
}

/// Trayecto programado con sus tres referencias recién sembradas.
/// Devuelve (journey_id, driver, route, vehicle).
async fn seed_journey(pool: &PgPool) -> (Uuid, User, Route, Vehicle) {
    let driver = seed_driver(pool).await;
    let route = seed_route(pool, Some(60)).await;
    let vehicle = seed_vehicle(pool).await;

    let controller = JourneyController::new(pool.clone());
    let journey = controller
        .create(CreateJourneyRequest {
            route_id: route.id,
            driver_id: driver.id,
            vehicle_id: vehicle.id,
        })
        .await
        .unwrap();

    (journey.id, driver, route, vehicle)
}

#[tokio::test]
async fn test_ciclo_de_vida_completo() {
    skip_if_no_db!();
    let pool = test_pool().await;
    let controller = JourneyController::new(pool.clone());

    let (journey_id, driver, route, vehicle) = seed_journey(&pool).await;

    let created = controller.get(journey_id).await.unwrap();
    assert_eq!(created.status, JourneyStatus::Programado);
    assert!(created.departed_at.is_none());
    assert_eq!(created.route_name, route.name);
    assert_eq!(created.driver_name, driver.full_name);
    assert_eq!(created.vehicle_plate, vehicle.plate);
    assert_eq!(created.duration_actual, None);
    assert_eq!(created.schedule_compliance, None);

    let started = controller.start(journey_id).await.unwrap();
    assert_eq!(started.status, JourneyStatus::EnCurso);
    assert!(started.departed_at.is_some());
    // Recién iniciado: cero minutos transcurridos
    assert_eq!(started.duration_actual, Some(0));

    let completed = controller.complete(journey_id, 12).await.unwrap();
    assert_eq!(completed.status, JourneyStatus::Completado);
    assert!(completed.arrived_at.is_some());
    assert_eq!(completed.passenger_count, Some(12));
    // Subsegundos entre salida y llegada: redondea a 0
    assert_eq!(completed.duration_minutes, Some(0));
    assert_eq!(completed.duration_actual, None);
    // 0 minutos reales contra 60 estimados: fuera del margen
    assert_eq!(completed.schedule_compliance, Some(false));
}

#[tokio::test]
async fn test_iniciar_dos_veces_falla() {
    skip_if_no_db!();
    let pool = test_pool().await;
    let controller = JourneyController::new(pool.clone());

    let (journey_id, _, _, _) = seed_journey(&pool).await;

    controller.start(journey_id).await.unwrap();
    let second = controller.start(journey_id).await;
    assert!(matches!(second, Err(AppError::InvalidState(_))));

    // El estado no cambió por el intento fallido
    let journey = controller.get(journey_id).await.unwrap();
    assert_eq!(journey.status, JourneyStatus::EnCurso);
}

#[tokio::test]
async fn test_detener_registra_llegada_sin_duracion() {
    skip_if_no_db!();
    let pool = test_pool().await;
    let controller = JourneyController::new(pool.clone());

    let (journey_id, _, _, _) = seed_journey(&pool).await;
    controller.start(journey_id).await.unwrap();

    let cancelled = controller.cancel(journey_id).await.unwrap();
    assert_eq!(cancelled.status, JourneyStatus::Cancelado);
    assert!(cancelled.arrived_at.is_some());
    assert_eq!(cancelled.duration_minutes, None);
    assert_eq!(cancelled.schedule_compliance, None);

    // Estado terminal: ninguna transición ni borrado posterior
    assert!(matches!(
        controller.cancel(journey_id).await,
        Err(AppError::InvalidState(_))
    ));
    assert!(matches!(
        controller.complete(journey_id, 5).await,
        Err(AppError::InvalidState(_))
    ));
    assert!(matches!(
        controller.delete(journey_id, UserRole::Administrador).await,
        Err(AppError::InvalidState(_))
    ));
}

#[tokio::test]
async fn test_editar_y_eliminar_solo_programado() {
    skip_if_no_db!();
    let pool = test_pool().await;
    let controller = JourneyController::new(pool.clone());

    let (journey_id, _, _, _) = seed_journey(&pool).await;
    let other_driver = seed_driver(&pool).await;

    let updated = controller
        .update(
            journey_id,
            UpdateJourneyRequest {
                route_id: None,
                driver_id: Some(other_driver.id),
                vehicle_id: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.driver_id, Some(other_driver.id));

    controller
        .delete(journey_id, UserRole::Administrador)
        .await
        .unwrap();
    assert!(matches!(
        controller.get(journey_id).await,
        Err(AppError::NotFound(_))
    ));

    // Una vez iniciado, ni edición ni borrado
    let (started_id, _, _, _) = seed_journey(&pool).await;
    controller.start(started_id).await.unwrap();

    assert!(matches!(
        controller
            .update(
                started_id,
                UpdateJourneyRequest {
                    route_id: None,
                    driver_id: Some(other_driver.id),
                    vehicle_id: None,
                },
            )
            .await,
        Err(AppError::InvalidState(_))
    ));
    assert!(matches!(
        controller.delete(started_id, UserRole::Administrador).await,
        Err(AppError::InvalidState(_))
    ));
}

#[tokio::test]
async fn test_pasajeros_negativos_no_cambia_estado() {
    skip_if_no_db!();
    let pool = test_pool().await;
    let controller = JourneyController::new(pool.clone());

    let (journey_id, _, _, _) = seed_journey(&pool).await;
    controller.start(journey_id).await.unwrap();

    let result = controller.complete(journey_id, -1).await;
    assert!(matches!(result, Err(AppError::InvalidInput(_))));

    let journey = controller.get(journey_id).await.unwrap();
    assert_eq!(journey.status, JourneyStatus::EnCurso);
}

#[tokio::test]
async fn test_ubicacion_condicionada_al_trayecto_activo() {
    skip_if_no_db!();
    let pool = test_pool().await;
    let journeys = JourneyController::new(pool.clone());
    let locations = LocationController::new(pool.clone());

    // Conductor sin trayecto: el reporte se rechaza
    let idle_driver = seed_driver(&pool).await;
    let rejected = locations
        .report(
            idle_driver.id,
            ReportLocationRequest {
                lat: Some(5.06),
                lng: Some(-75.51),
            },
        )
        .await;
    assert!(matches!(rejected, Err(AppError::Forbidden(_))));

    // Con trayecto en curso, el reporte pasa y el segundo sobrescribe
    let (journey_id, driver, _, _) = seed_journey(&pool).await;
    journeys.start(journey_id).await.unwrap();

    locations
        .report(
            driver.id,
            ReportLocationRequest {
                lat: Some(5.06),
                lng: Some(-75.51),
            },
        )
        .await
        .unwrap();
    locations
        .report(
            driver.id,
            ReportLocationRequest {
                lat: Some(5.10),
                lng: Some(-75.60),
            },
        )
        .await
        .unwrap();

    let mine: Vec<_> = locations
        .list_active()
        .await
        .unwrap()
        .into_iter()
        .filter(|l| l.driver_id == driver.id)
        .collect();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].latitude, 5.10);
    assert_eq!(mine[0].longitude, -75.60);
    assert_eq!(mine[0].journey_id, journey_id);

    // Al completar el trayecto, el conductor desaparece del listado
    journeys.complete(journey_id, 8).await.unwrap();
    let gone = locations
        .list_active()
        .await
        .unwrap()
        .into_iter()
        .any(|l| l.driver_id == driver.id);
    assert!(!gone);
}

#[tokio::test]
async fn test_flujo_de_novedades() {
    skip_if_no_db!();
    let pool = test_pool().await;
    let journeys = JourneyController::new(pool.clone());
    let novedades = NovedadController::new(pool.clone());

    let (journey_id, driver, _, _) = seed_journey(&pool).await;

    // Sobre un trayecto aún programado no se reporta
    let premature = novedades
        .report(
            driver.id,
            UserRole::Conductor,
            CreateNovedadRequest {
                journey_id,
                novedad_type: NovedadType::AveriaMecanica,
                notes: Some("Se recalentó el motor".to_string()),
            },
        )
        .await;
    assert!(matches!(premature, Err(AppError::InvalidState(_))));

    journeys.start(journey_id).await.unwrap();

    let novedad = novedades
        .report(
            driver.id,
            UserRole::Conductor,
            CreateNovedadRequest {
                journey_id,
                novedad_type: NovedadType::AveriaMecanica,
                notes: Some("Se recalentó el motor".to_string()),
            },
        )
        .await
        .unwrap();
    assert_eq!(novedad.journey_id, journey_id);
    assert_eq!(novedad.driver_id, Some(driver.id));
    assert_eq!(novedad.novedad_type, NovedadType::AveriaMecanica);

    // Otro conductor no puede reportar sobre un trayecto ajeno
    let intruder = seed_driver(&pool).await;
    let foreign = novedades
        .report(
            intruder.id,
            UserRole::Conductor,
            CreateNovedadRequest {
                journey_id,
                novedad_type: NovedadType::Otro,
                notes: None,
            },
        )
        .await;
    assert!(matches!(foreign, Err(AppError::Forbidden(_))));

    // La lectura del trayecto embebe el resumen de la novedad
    let journey = journeys.get(journey_id).await.unwrap();
    assert!(journey
        .novedades
        .iter()
        .any(|n| n.novedad_type == NovedadType::AveriaMecanica));

    // El conductor ajeno no la ve; los roles elevados sí
    let intruder_view = novedades
        .list(intruder.id, UserRole::Conductor)
        .await
        .unwrap();
    assert!(!intruder_view.iter().any(|n| n.id == novedad.id));

    let admin_view = novedades
        .list(Uuid::new_v4(), UserRole::Administrador)
        .await
        .unwrap();
    assert!(admin_view.iter().any(|n| n.id == novedad.id));

    // Estadísticas para roles elevados
    let stats = novedades.stats(UserRole::Supervisor).await.unwrap();
    assert!(stats.total >= 1);
    assert!(stats.today >= 1);
    assert!(*stats.by_type.get("Avería Mecánica").unwrap_or(&0) >= 1);
}

#[tokio::test]
async fn test_carga_masiva_de_usuarios_salta_existentes() {
    skip_if_no_db!();
    let pool = test_pool().await;

    let existing = seed_driver(&pool).await;
    let app = create_router(AppState::new(pool, test_config()));

    let suffix = Uuid::new_v4().simple().to_string();
    let nuevo = format!("conductor_{}", &suffix[..12]);
    let nuevo_email = format!("{}@flota.com", nuevo);

    // El primero ya existe y el tercero repite el username del segundo
    // dentro del mismo lote
    let response = app
        .oneshot(post_with_token(
            "/api/usuarios/bulk",
            &admin_token(),
            serde_json::json!({
                "usuarios": [
                    {
                        "username": existing.username,
                        "email": existing.email,
                        "full_name": "Conductor Repetido",
                        "password": "secreta123",
                        "role": "conductor"
                    },
                    {
                        "username": nuevo,
                        "email": nuevo_email,
                        "full_name": "Conductor Nuevo",
                        "password": "secreta123",
                        "role": "conductor"
                    },
                    {
                        "username": nuevo,
                        "email": format!("{}_otro@flota.com", nuevo),
                        "full_name": "Conductor Nuevo Otra Vez",
                        "password": "secreta123",
                        "role": "conductor"
                    }
                ]
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    let created = body.as_array().unwrap();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0]["username"], nuevo.as_str());
    assert!(created[0].get("password_hash").is_none());
}

#[tokio::test]
async fn test_carga_masiva_de_vehiculos_normaliza_y_salta_placas() {
    skip_if_no_db!();
    let pool = test_pool().await;

    let existing = seed_vehicle(&pool).await;
    let app = create_router(AppState::new(pool, test_config()));

    // La placa ya registrada llega con separador y en minúsculas
    let repetida = format!("{}-{}", &existing.plate[..3], &existing.plate[3..]).to_lowercase();
    let fresca = random_plate();

    let response = app
        .oneshot(post_with_token(
            "/api/vehiculos/bulk",
            &admin_token(),
            serde_json::json!({
                "vehiculos": [
                    { "plate": repetida, "model": "Chevrolet NPR" },
                    { "plate": fresca, "model": "Hino 300", "capacity": 20 }
                ]
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    let created = body.as_array().unwrap();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0]["plate"], fresca.as_str());
    assert_eq!(created[0]["capacity"], 20);
}

#[tokio::test]
async fn test_carga_masiva_de_rutas_inserta_el_lote() {
    skip_if_no_db!();
    let pool = test_pool().await;

    let app = create_router(AppState::new(pool, test_config()));

    let suffix = Uuid::new_v4().simple().to_string();
    let primera = format!("Ruta {}", &suffix[..8]);
    let segunda = format!("Ruta {}", &suffix[8..16]);

    let response = app
        .oneshot(post_with_token(
            "/api/rutas/bulk",
            &admin_token(),
            serde_json::json!({
                "rutas": [
                    {
                        "name": primera,
                        "origin": "Manizales",
                        "destination": "Pereira",
                        "estimated_duration_minutes": 55
                    },
                    {
                        "name": segunda,
                        "origin": "Pereira",
                        "destination": "Armenia",
                        "distance_km": 44.0
                    }
                ]
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    let created = body.as_array().unwrap();
    assert_eq!(created.len(), 2);
    assert_eq!(created[0]["name"], primera.as_str());
    assert_eq!(created[0]["estimated_duration_minutes"], 55);
    assert_eq!(created[1]["name"], segunda.as_str());
}

#[tokio::test]
async fn test_login_contra_el_almacen() {
    skip_if_no_db!();
    let pool = test_pool().await;

    let suffix = Uuid::new_v4().simple().to_string();
    let username = format!("operador_{}", &suffix[..12]);
    let email = format!("operador_{}@flota.com", &suffix[..12]);
    let password_hash = bcrypt::hash("clave-segura-123", bcrypt::DEFAULT_COST).unwrap();

    UserRepository::new(pool.clone())
        .create(
            username.clone(),
            email.clone(),
            "Operador de Prueba".to_string(),
            password_hash,
            UserRole::Operador,
        )
        .await
        .unwrap();

    let app = create_router(AppState::new(pool, test_config()));

    // Login por username
    let response = app
        .clone()
        .oneshot(login_request(&username, "clave-segura-123"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["token_type"], "Bearer");
    assert_eq!(body["user"]["username"], username.as_str());
    let token = body["access_token"].as_str().unwrap().to_string();

    // Login por email
    let response = app
        .clone()
        .oneshot(login_request(&email, "clave-segura-123"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Contraseña incorrecta
    let response = app
        .clone()
        .oneshot(login_request(&username, "clave-equivocada"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // El token emitido sirve para /me
    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/auth/me")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["username"], username.as_str());
}

fn admin_token() -> String {
    let jwt = JwtConfig {
        secret: "secreto-de-pruebas".to_string(),
        expiration: 3600,
    };
    generate_token(Uuid::new_v4(), "admin-de-prueba", UserRole::Administrador, &jwt).unwrap()
}

fn post_with_token(uri: &str, token: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn login_request(username: &str, password: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            serde_json::json!({ "username": username, "password": password }).to_string(),
        ))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
