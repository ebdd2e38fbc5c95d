//! Gateway entry point: loads settings, wires adapters, serves HTTP and runs
//! the favourite forecast refresher until the server stops.

mod server;

use std::path::Path;

use actix_web::cookie::{Key, SameSite};
use actix_web::web;
use color_eyre::eyre::{Result, WrapErr, eyre};
use ortho_config::OrthoConfig;
use tokio::sync::oneshot;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use weather_gateway::domain::run_refresh_schedule;
use weather_gateway::inbound::http::health::HealthState;
use weather_gateway::settings::GatewaySettings;

use server::{ServerConfig, build_adapters, build_services, create_server};

const DEFAULT_SESSION_KEY_FILE: &str = "/var/run/secrets/session_key";
/// `Key::derive_from` panics below this length.
const MIN_SESSION_KEY_BYTES: usize = 32;

fn load_session_key(path: &Path) -> Result<Key> {
    match std::fs::read(path) {
        Ok(bytes) if bytes.len() >= MIN_SESSION_KEY_BYTES => Ok(Key::derive_from(&bytes)),
        Ok(bytes) => Err(eyre!(
            "session key at {} is {} bytes; at least {MIN_SESSION_KEY_BYTES} are required",
            path.display(),
            bytes.len()
        )),
        Err(error) if cfg!(debug_assertions) => {
            warn!(path = %path.display(), %error, "using temporary session key (dev only)");
            Ok(Key::generate())
        }
        Err(error) => Err(error)
            .wrap_err_with(|| format!("failed to read session key at {}", path.display())),
    }
}

#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = GatewaySettings::load_from_iter(std::env::args_os())
        .map_err(|err| eyre!("failed to load settings: {err}"))?;
    info!(settings = ?settings, "settings loaded");

    let policy = settings.cache_policy()?;
    let schedule = settings.refresh_schedule()?;
    let key_path = settings
        .session_key_file
        .clone()
        .unwrap_or_else(|| DEFAULT_SESSION_KEY_FILE.into());
    let config = ServerConfig::new(
        load_session_key(&key_path)?,
        settings.cookie_secure,
        SameSite::Lax,
        settings.bind_addr()?,
    )
    .with_throttle(settings.throttle_policy()?);

    let adapters = build_adapters(&settings).await?;
    let (http_state, refresher) = build_services(adapters, policy);

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let refresh_task = tokio::spawn(run_refresh_schedule(refresher, schedule, async move {
        let _ = shutdown_rx.await;
    }));

    let health_state = web::Data::new(HealthState::new());
    info!(addr = %config.bind_addr(), "starting HTTP server");
    let server = create_server(health_state.clone(), http_state, config)?;
    let served = server.await;

    health_state.mark_unhealthy();
    let _ = shutdown_tx.send(());
    if let Err(error) = refresh_task.await {
        warn!(%error, "refresher task ended abnormally");
    }
    served.wrap_err("HTTP server failed")
}
