mod config;
mod db;
mod models;
mod responses;
mod routes;
mod services;
mod state;
pub mod utils;

#[cfg(test)]
mod test_support;

use anyhow::Context;
use axum::http::{HeaderValue, Method};
use axum::{
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use config::Config;
use db::postgres_training_repository::PostgresTrainingRepository;
use reqwest::Client;
use responses::JsonResponse;
use routes::{billing::pricing_table, train_webhook::handle_train_webhook};
use services::identity::SupabaseIdentityClient;
use services::leap::{ImageGenerator, LeapClient};
use services::mailer::Mailer;
use services::pluggable_mailer::PluggableMailer;
use sqlx::PgPool;
use std::{net::SocketAddr, sync::Arc};
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::state::AppState;

#[cfg(feature = "tls")]
use axum_server::tls_rustls::RustlsConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = Arc::new(Config::from_env().context("failed to load configuration")?);

    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_millisecond(config.rate_limit_ms)
            .burst_size(config.rate_limit_burst)
            .use_headers()
            .error_handler(|_err| {
                JsonResponse::too_many_requests("Too many requests").into_response()
            })
            .finish()
            .context("invalid rate limiter configuration")?,
    );

    // Background task to cleanup old IPs
    let governor_limiter = governor_conf.limiter().clone();
    std::thread::spawn(move || {
        let interval = std::time::Duration::from_secs(60);
        loop {
            std::thread::sleep(interval);
            governor_limiter.retain_recent();
        }
    });

    let pg_pool = establish_connection(&config.database_url).await?;
    if config.run_migrations {
        sqlx::migrate!("./migrations")
            .run(&pg_pool)
            .await
            .context("failed to run database migrations")?;
        info!("database migrations applied");
    }

    let http_client = Client::new();

    let image_generator = match config.leap_api_key.as_deref() {
        Some(api_key) => Some(Arc::new(LeapClient::new(
            http_client.clone(),
            &config.leap_api_base_url,
            api_key,
        )) as Arc<dyn ImageGenerator>),
        None => {
            warn!("LEAP_API_KEY is not set; training webhooks will be rejected until it is configured");
            None
        }
    };

    let mailer = PluggableMailer::from_config(&config, &http_client)
        .context("failed to initialize mailer")?
        .map(|mailer| {
            info!(provider = mailer.provider_name(), "email notifications enabled");
            Arc::new(mailer) as Arc<dyn Mailer>
        });

    let state = AppState {
        identity: Arc::new(SupabaseIdentityClient::new(
            http_client.clone(),
            &config.supabase_url,
            &config.supabase_service_role_key,
        )),
        training_repo: Arc::new(PostgresTrainingRepository {
            pool: pg_pool.clone(),
        }),
        mailer,
        image_generator,
        config: config.clone(),
    };

    let mut app = Router::new()
        .route("/", get(root))
        .route("/leap/train-webhook", post(handle_train_webhook))
        .route("/billing/pricing-table", get(pricing_table))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(GovernorLayer {
            config: governor_conf,
        });

    if let Some(origin) = config.frontend_origin.as_deref() {
        let cors = CorsLayer::new()
            .allow_origin(
                origin
                    .parse::<HeaderValue>()
                    .context("FRONTEND_ORIGIN is not a valid header value")?,
            )
            .allow_methods([Method::GET]);
        app = app.layer(cors);
    }

    let make_service = app.into_make_service_with_connect_info::<SocketAddr>();
    let addr = config.bind_addr;

    #[cfg(feature = "tls")]
    {
        // TLS: Only run this block when `--features tls` is used
        let cert = std::env::var("DEV_CERT_LOCATION").context("DEV_CERT_LOCATION must be set")?;
        let key = std::env::var("DEV_KEY_LOCATION").context("DEV_KEY_LOCATION must be set")?;
        let tls_config = RustlsConfig::from_pem_file(cert, key)
            .await
            .context("Failed to load TLS certs")?;

        info!(%addr, "running with TLS");
        axum_server::bind_rustls(addr, tls_config)
            .serve(make_service)
            .await?;
    }

    #[cfg(not(feature = "tls"))]
    {
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .with_context(|| format!("failed to bind {}", addr))?;
        info!(%addr, "running without TLS");
        axum::serve(listener, make_service)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
    }

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[cfg(not(feature = "tls"))]
async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(%err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}

/// A simple root route.
async fn root() -> Response {
    JsonResponse::success("Hello, Klone!").into_response()
}

/// Establish a connection to the database and verify it.
async fn establish_connection(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = PgPool::connect(database_url)
        .await
        .context("Failed to connect to the database")?;

    sqlx::query("SELECT 1")
        .execute(&pool)
        .await
        .context("Failed to verify database connection")?;

    info!("✅ Successfully connected to the database");
    Ok(pool)
}
