use std::{error::Error, net::SocketAddr, path::PathBuf};

use axum::{
    Router,
    extract::{MatchedPath, Request},
    http::{HeaderValue, Method, header},
    middleware,
};
use axum_server::{Handle, tls_rustls::RustlsConfig};
use clap::Parser;
use rusqlite::Connection;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use budget_buddy::{AppState, Config, build_router, graceful_shutdown, logging_middleware};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    setup_logging();

    let config = Config::parse();
    let addr = SocketAddr::from((config.host, config.port));

    let connection = Connection::open(&config.db_path)?;
    let state = AppState::new(connection, config.auth_config())?;

    let router = build_router(state).layer(middleware::from_fn(logging_middleware));
    let router = add_cors_layer(router, &config.cors_origins)?;
    let router = add_tracing_layer(router);

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    match &config.cert_path {
        Some(cert_path) => {
            let tls_config = RustlsConfig::from_pem_file(
                PathBuf::from(cert_path).join("cert.pem"),
                PathBuf::from(cert_path).join("key.pem"),
            )
            .await?;

            tracing::info!("HTTPS server listening on {}", addr);
            axum_server::bind_rustls(addr, tls_config)
                .handle(handle)
                .serve(router.into_make_service())
                .await?;
        }
        None => {
            tracing::info!("HTTP server listening on {}", addr);
            axum_server::bind(addr)
                .handle(handle)
                .serve(router.into_make_service())
                .await?;
        }
    }

    Ok(())
}

fn setup_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn add_cors_layer(router: Router, origins: &[String]) -> Result<Router, Box<dyn Error>> {
    let allow_origin = if origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        let origins = origins
            .iter()
            .map(|origin| origin.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()?;
        AllowOrigin::list(origins)
    };

    let cors_layer = CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .expose_headers([header::CONTENT_DISPOSITION]);

    Ok(router.layer(cors_layer))
}

fn add_tracing_layer(router: Router) -> Router {
    let tracing_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request| {
            let method = req.method();
            let uri = req.uri();

            let matched_path = req
                .extensions()
                .get::<MatchedPath>()
                .map(|matched_path| matched_path.as_str());

            tracing::debug_span!("request", %method, %uri, matched_path)
        })
        // Errors are logged where they are converted into responses.
        .on_failure(());

    router.layer(tracing_layer)
}
