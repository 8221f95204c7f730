use anyhow::Result;
use dotenvy::dotenv;
use tokio::signal;
use tracing::{error, info};

use fleet_monitoring::config::database::DatabaseConfig;
use fleet_monitoring::config::environment::EnvironmentConfig;
use fleet_monitoring::routes::create_router;
use fleet_monitoring::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    info!("🚌 Fleet Monitoring - Trayectos, Telemetría y Novedades");
    info!("=======================================================");

    let config = EnvironmentConfig::default();

    // Inicializar base de datos
    let pool = match DatabaseConfig::default().create_pool().await {
        Ok(pool) => {
            info!("✅ Base de datos conectada");
            pool
        }
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {}", e);
            return Err(anyhow::anyhow!("Error de base de datos: {}", e));
        }
    };

    // Aplicar migraciones pendientes
    if let Err(e) = sqlx::migrate!("./migrations").run(&pool).await {
        error!("❌ Error aplicando migraciones: {}", e);
        return Err(anyhow::anyhow!("Error de migraciones: {}", e));
    }
    info!("✅ Migraciones aplicadas");

    let addr = config.server_url();
    let app = create_router(AppState::new(pool, config));

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Health check");
    info!("🔑 Autenticación:");
    info!("   POST /api/auth/login - Login");
    info!("   GET  /api/auth/me - Usuario autenticado");
    info!("🚌 Trayectos:");
    info!("   POST /api/trayectos - Programar trayecto");
    info!("   GET  /api/trayectos - Listar trayectos");
    info!("   GET  /api/trayectos/:id - Obtener trayecto");
    info!("   PUT  /api/trayectos/:id - Editar trayecto programado");
    info!("   DELETE /api/trayectos/:id - Eliminar trayecto programado");
    info!("   POST /api/trayectos/:id/iniciar - Iniciar trayecto");
    info!("   POST /api/trayectos/:id/detener - Cancelar trayecto en curso");
    info!("   POST /api/trayectos/:id/finalizar - Finalizar trayecto");
    info!("📍 Telemetría:");
    info!("   POST /api/trayectos/ubicacion - Reportar posición del conductor");
    info!("   GET  /api/trayectos/ubicaciones - Posiciones de trayectos activos");
    info!("⚠️ Novedades:");
    info!("   POST /api/novedades - Reportar novedad");
    info!("   GET  /api/novedades - Listar novedades");
    info!("   GET  /api/novedades/stats - Estadísticas de novedades");
    info!("🗂️ Datos maestros:");
    info!("   /api/usuarios, /api/vehiculos, /api/rutas - CRUD");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
