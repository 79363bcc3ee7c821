use anyhow::Context;
use weather_api::routes::VERSION;
use weather_api::shutdown::listen_for_shutdown_signals;

use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::prelude::*;

fn main() {
    let version = VERSION.unwrap_or("unknown").to_string();
    let config = weather_api::Config::load().expect("Failed to load config");

    // Must outlive the runtime so buffered events are flushed on exit
    let _sentry = config.sentry_dsn.as_deref().map(|dsn| {
        sentry::init((
            dsn,
            sentry::ClientOptions {
                release: Some(version.clone().into()),
                ..Default::default()
            },
        ))
    });

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("Failed to build tokio runtime")
        .block_on(async {
            if let Err(e) = setup(config, version).await {
                tracing::error!("Fatal error during setup: {e:#}");
                std::process::exit(1);
            }
        });
}

async fn setup(config: weather_api::Config, version: String) -> anyhow::Result<()> {
    let filter_layer = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.rust_log))
        .map_err(|e| anyhow::anyhow!(e))
        .context("Failed to initialize tracing filter")?;

    let use_json = config.log_format != "pretty";

    if use_json {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_timer(UtcTime::rfc_3339())
            .with_target(true)
            .with_level(true)
            .json();
        tracing_subscriber::registry()
            .with(filter_layer)
            .with(fmt_layer)
            .init();
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_level(true)
            .with_ansi(true)
            .pretty();
        tracing_subscriber::registry()
            .with(filter_layer)
            .with(fmt_layer)
            .init();
    };

    let addr: String = format!("0.0.0.0:{}", config.api_service_port);
    tracing::info!(version = %version, "Starting weather-api service at: {addr}");

    let app_state = weather_api::AppState::new(config)
        .context("Failed to initialize application state")?;
    tracing::info!(
        geocoding = %app_state.config.geocoding_base_url,
        forecast = %app_state.config.forecast_base_url,
        timeout_secs = app_state.config.upstream_timeout_secs,
        "Initialized Open-Meteo client"
    );

    let shutdown = app_state.shutdown.clone();
    let app = weather_api::routes::app(app_state);

    // Spawn shutdown signal handler
    let shutdown_handle = shutdown.clone();
    tokio::spawn(async move {
        listen_for_shutdown_signals().await;
        shutdown_handle.shutdown().await;
    });

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.wait_for_shutdown().await })
        .await
        .context("Server exited with error")?;

    Ok(())
}
