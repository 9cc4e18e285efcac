// Weighbridge monitor server: status API, dashboard hosting and video
// plumbing. Run with: cargo run -p monitor_server

mod api;
mod config;
mod go2rtc;
mod stabilizer;
mod state;
mod video_relay;

use std::path::Path;

use config::{MonitorConfig, ServerSettings, CONFIG_PATHS};
use go2rtc::{Go2rtcProcess, GO2RTC_CONFIG_FILE};
use state::new_state_handle;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use video_relay::RelaySource;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let settings = ServerSettings::from_env();
    let config = match MonitorConfig::load(&CONFIG_PATHS) {
        Ok(config) => config,
        Err(e) => {
            error!("✗ {}", e);
            return;
        }
    };

    // 1. Keep go2rtc in sync with config.json, then start it
    match go2rtc::write_config(&config, Path::new(GO2RTC_CONFIG_FILE)) {
        Ok(()) => info!("✓ {} synchronised with config.json", GO2RTC_CONFIG_FILE),
        Err(e) => warn!("Could not write {}: {}", GO2RTC_CONFIG_FILE, e),
    }
    let go2rtc = Go2rtcProcess::spawn(&settings.go2rtc_bin);

    // 2. Socket player relay
    let relay_addr = format!("0.0.0.0:{}", settings.relay_port);
    match TcpListener::bind(&relay_addr).await {
        Ok(listener) => {
            info!("🚀 Video relay listening on ws://{}", relay_addr);
            tokio::spawn(video_relay::run(listener, RelaySource::from_config(&config)));
        }
        Err(e) => error!("✗ Failed to bind video relay on {}: {}", relay_addr, e),
    }

    // 3. HTTP API and dashboard
    let app = api::build_router(new_state_handle(), &settings.static_dir);
    let http_addr = format!("0.0.0.0:{}", settings.http_port);
    let listener = match TcpListener::bind(&http_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("✗ Failed to bind HTTP server on {}: {}", http_addr, e);
            return;
        }
    };
    info!("🚀 HTTP server listening on http://{}", http_addr);
    info!("   Dashboard served from {}", settings.static_dir.display());
    info!("   Environment: MONITOR_HTTP_PORT={} MONITOR_RELAY_PORT={}", settings.http_port, settings.relay_port);

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("HTTP server error: {}", e);
    }

    if let Some(go2rtc) = go2rtc {
        go2rtc.shutdown().await;
    }
    info!("Server stopped");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for ctrl-c: {}", e);
    }
    info!("🛑 Shutting down...");
}
