//! Probe server construction.
//!
//! The listener serves only the health probes; the snapshot lifecycle runs
//! around it in `main`.

mod config;

pub use config::ServerConfig;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use tracing::info;

use cocktails::inbound::http::health::{HealthState, live, ready};

fn build_app(
    health_state: web::Data<HealthState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(health_state)
        .service(ready)
        .service(live)
}

/// Construct an Actix HTTP server serving the probes.
///
/// Readiness is marked once the socket is bound; callers run the startup
/// hooks before calling this.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let ServerConfig { bind_addr, workers } = config;

    let server = HttpServer::new(move || build_app(server_health_state.clone()))
        // Shutdown is driven from `main` so the final snapshot can be joined.
        .disable_signals()
        .bind(bind_addr)?;
    let server = match workers {
        Some(workers) => server.workers(workers),
        None => server,
    };

    info!(%bind_addr, "probe listener bound");
    health_state.mark_ready();
    Ok(server.run())
}
