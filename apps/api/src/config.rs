//! API server configuration

use std::env;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use pulse_shared_config::{
    get_required_env, parse_env, CommonConfig, DatabaseConfig, Environment,
};

use crate::graphql::schema::DEFAULT_MAX_DEPTH;
use crate::graphql::loaders::DEFAULT_BATCH_DELAY_MS;
use crate::graphql::LoaderOptions;

/// API server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Common configuration shared with other services
    pub common: CommonConfig,

    /// Server port (default: 8080)
    pub port: u16,

    /// Maximum GraphQL query depth (default: 5)
    pub graphql_max_depth: usize,

    /// Extra time a loader batch stays open after its tick (default: 1ms)
    pub loader_batch_delay: Option<Duration>,

    /// CORS allowed origins (optional)
    pub cors_allowed_origins: Option<Vec<String>>,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// In production mode `DATABASE_URL` must be set explicitly. In
    /// development/staging mode, sensible defaults are used for convenience.
    pub fn from_env() -> Result<Self> {
        // Determine environment first to know if we need strict validation
        let environment = Environment::from_str(
            &env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
        )
        .unwrap_or_default();

        if environment.is_production() {
            get_required_env("DATABASE_URL").context(
                "DATABASE_URL environment variable is required in production. \
                 Please set your PostgreSQL connection string.",
            )?;
        }

        let common = CommonConfig::from_env()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

        let graphql_max_depth = parse_env("GRAPHQL_MAX_DEPTH", DEFAULT_MAX_DEPTH)?;
        if graphql_max_depth == 0 {
            bail!("GRAPHQL_MAX_DEPTH must be greater than zero");
        }

        // 0 closes batches at the end of the tick with no extra wait
        let delay_ms: u64 = parse_env("LOADER_BATCH_DELAY_MS", DEFAULT_BATCH_DELAY_MS)?;

        Ok(Self {
            common,

            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("Invalid PORT value")?,

            graphql_max_depth,

            loader_batch_delay: (delay_ms > 0).then(|| Duration::from_millis(delay_ms)),

            cors_allowed_origins: env::var("CORS_ORIGINS").ok().map(|s| {
                s.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            }),
        })
    }

    /// Options applied to every request's loaders
    pub fn loader_options(&self) -> LoaderOptions {
        LoaderOptions {
            delay: self.loader_batch_delay,
        }
    }

    /// Get database configuration
    pub fn database(&self) -> &DatabaseConfig {
        &self.common.database
    }

    /// Get environment mode
    pub fn environment(&self) -> Environment {
        self.common.environment
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.common.environment.is_production()
    }
}
