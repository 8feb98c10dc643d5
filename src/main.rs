//! Service entry point: config, logging, store, gateway and sweeper.

use std::sync::Arc;

use curbside::admission::AdmissionService;
use curbside::config::AppConfig;
use curbside::gateway::{self, state::AppState};
use curbside::geocode::{GeocodeClient, Geocoder};
use curbside::geofence::ServiceArea;
use curbside::notify::{Mailer, SmtpMailer};
use curbside::status::StatusService;
use curbside::store::Database;
use curbside::sweeper::ExpirySweeper;

fn get_env() -> String {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if (args[i] == "--env" || args[i] == "-e") && i + 1 < args.len() {
            return args[i + 1].clone();
        }
    }
    "dev".to_string()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env = get_env();
    let config = AppConfig::load(&env);
    let _log_guard = curbside::logging::init_logging(&config);

    tracing::info!("Starting curbside in {} mode", env);

    let db = Arc::new(Database::connect(&config.database_url).await?);

    let geocoder: Arc<dyn Geocoder> = Arc::new(GeocodeClient::new(&config.geocoding)?);
    let mailer: Arc<dyn Mailer> = Arc::new(SmtpMailer::new(&config.email)?);
    let service_area = ServiceArea::from_config(&config.service_area);

    let admission = Arc::new(AdmissionService::new(
        db.pool().clone(),
        geocoder,
        service_area,
        config.sweeper.expiry_secs,
    ));
    let status = Arc::new(StatusService::new(db.pool().clone(), mailer));

    // Background expiry sweep, decoupled from request handling
    let sweeper = ExpirySweeper::new(db.pool().clone(), &config.sweeper).spawn();

    let state = Arc::new(AppState::new(db, admission, status));
    let result = gateway::run_server(&config.gateway.host, config.gateway.port, state).await;

    sweeper.shutdown().await;
    result
}
