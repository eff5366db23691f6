//! PTV Open API Server
//!
//! Serves the versioned Open API (`/api/v{N}/...`) and the `/Ping` and
//! `/Pong` probes.
//!
//! ## Configuration
//!
//! Read from `PTV_CONFIG`, `config.toml`, `ptv.toml`, `./config/config.toml`
//! or `/etc/ptv/config.toml`, then overridden from the environment:
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `PTV_HTTP_HOST` | `0.0.0.0` | Bind address |
//! | `PTV_HTTP_PORT` | `8080` | HTTP port |
//! | `PTV_CORS_ORIGINS` | any | Comma separated allowed origins |
//! | `PTV_JWT_SECRET` | - | HS256 secret of bearer tokens |
//! | `PTV_JWT_ISSUER` | `ptv-token-service` | Expected token issuer |
//! | `PTV_JWT_AUDIENCE` | `ptv-open-api` | Expected token audience |
//! | `PTV_PAGE_SIZE` | `1000` | List page size |
//! | `PTV_DOCUMENTATION_URL` | public docs | Link in "not supported" replies |
//! | `PTV_DEV_MODE` | `false` | Seed sample organization data |
//! | `RUST_LOG` | `info` | Log level |

use std::sync::Arc;

use anyhow::Result;
use axum::http::HeaderValue;
use tokio::{net::TcpListener, signal};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use ptv_config::ConfigLoader;
use ptv_open_api::{build_router, seed, ApiState, HealthAggregator, InMemoryRegistry, TokenValidator};

#[tokio::main]
async fn main() -> Result<()> {
    ptv_common::logging::init_logging("ptv-open-api-server");

    info!("Starting PTV Open API Server");

    let config = ConfigLoader::new().load()?;
    config.validate()?;

    let registry = Arc::new(InMemoryRegistry::new());
    seed::seed_reference_data(&registry);
    if config.dev_mode {
        seed::seed_development_data(&registry);
    }
    if config.auth.jwt_secret.is_empty() {
        warn!("No JWT secret configured; bearer tokens are verified against an empty key");
    }

    let state = ApiState {
        services: registry.domain_services(),
        tokens: Arc::new(TokenValidator::new(&config.auth)),
        page_size: config.paging.effective_page_size(),
        documentation_url: Arc::from(config.api.documentation_url.as_str()),
    };
    let health = HealthAggregator::new().register(registry.clone());

    let app = build_router(state, health)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.http.cors_origins));

    let addr = format!("{}:{}", config.http.host, config.http.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("API server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("PTV Open API Server shutdown complete");
    Ok(())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        return layer.allow_origin(Any);
    }
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(origins)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
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
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received...");
}
