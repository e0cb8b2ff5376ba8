use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::http::{header, Method};
use sqlx::postgres::PgPoolOptions;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pulse_api::routes::{api_router, GraphQLState, HealthState};
use pulse_api::{Config, PgStore, SchemaBuilder, Store};

/// Build the CORS layer based on configuration.
///
/// In production mode:
/// - If `CORS_ORIGINS` is set, only those origins are allowed
/// - If `CORS_ORIGINS` is not set, CORS requests are rejected (no origins allowed)
///
/// In development mode:
/// - If `CORS_ORIGINS` is set, those origins are used
/// - If `CORS_ORIGINS` is not set, permissive CORS is used for convenience
fn build_cors_layer(config: &Config) -> CorsLayer {
    match &config.cors_allowed_origins {
        Some(origins) if !origins.is_empty() => {
            let allowed_origins: Vec<_> = origins
                .iter()
                .filter_map(|origin| {
                    origin.parse().ok().or_else(|| {
                        tracing::warn!("Invalid CORS origin '{}', skipping", origin);
                        None
                    })
                })
                .collect();

            if allowed_origins.is_empty() {
                tracing::error!("No valid CORS origins configured, CORS requests will be rejected");
                CorsLayer::new()
            } else {
                tracing::info!(
                    "CORS configured with {} allowed origin(s): {:?}",
                    allowed_origins.len(),
                    origins
                );
                CorsLayer::new()
                    .allow_origin(allowed_origins)
                    .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                    .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::ORIGIN])
                    .max_age(Duration::from_secs(3600))
            }
        }
        _ if config.is_production() => {
            tracing::warn!(
                "CORS_ORIGINS not configured in production mode. \
                 CORS requests will be rejected. Set CORS_ORIGINS to allow cross-origin requests."
            );
            CorsLayer::new()
        }
        _ => {
            tracing::warn!(
                "Using permissive CORS in development mode. \
                 Set CORS_ORIGINS for production-like behavior."
            );
            CorsLayer::permissive()
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pulse_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;

    tracing::info!(
        environment = %config.environment(),
        "Starting Pulse API server on port {}",
        config.port
    );

    // Initialize database pool
    let database = config.database();
    tracing::info!(url = %database.redacted_url(), "Connecting to database...");

    let pool = PgPoolOptions::new()
        .max_connections(database.max_connections)
        .min_connections(database.min_connections)
        .acquire_timeout(Duration::from_secs(database.connect_timeout_secs))
        .idle_timeout(Duration::from_secs(database.idle_timeout_secs))
        .connect(&database.url)
        .await?;

    tracing::info!("Database connection established");

    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("Migrations completed successfully");

    let store: Arc<dyn Store> = Arc::new(PgStore::new(pool));

    let schema = SchemaBuilder::new(store.clone())
        .max_depth(config.graphql_max_depth)
        .build();
    tracing::info!(
        max_depth = config.graphql_max_depth,
        batch_delay = ?config.loader_batch_delay,
        "GraphQL schema built"
    );

    let enable_graphiql = !config.is_production();
    let graphql_state = GraphQLState {
        schema,
        store: store.clone(),
        loader_options: config.loader_options(),
        enable_graphiql,
    };
    let health_state = HealthState::new(store);

    let app = api_router(graphql_state, health_state)
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer(&config));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("Listening on {}", addr);
    if enable_graphiql {
        tracing::info!(
            "GraphiQL available at http://{}:{}/graphql",
            addr.ip(),
            addr.port()
        );
    }

    axum::serve(listener, app).await?;

    Ok(())
}
