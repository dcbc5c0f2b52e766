//! The application context: everything a handler needs, built once.

use std::fmt::Display;
use std::sync::Arc;

use brisk_response::{Environment, Response};
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;
use tracing::info;

use crate::cache::Cache;
use crate::config::Config;
use crate::error::Result;
use crate::logging::Logger;

/// Configuration, logger, database pool and cache, shared read-only.
///
/// ```ignore
/// let ctx = AppContext::init(Config::load(None)?).await?;
/// ctx.logger().install_global()?;
/// let users: Vec<User> = brisk_orm::crud::get_multi(ctx.db(), &QueryParam::new()).await?;
/// ```
#[derive(Debug)]
pub struct AppContext {
    config: Config,
    env: Environment,
    logger: Logger,
    db: SqlitePool,
    cache: Cache,
}

impl AppContext {
    /// Builds every resource from `config` and connects to the database.
    ///
    /// The logger is built but not installed; see [`Logger::install_global`].
    pub async fn init(config: Config) -> Result<Arc<Self>> {
        config.validate()?;
        let logger = Logger::new(&config.log)?;
        let env = config.environment();

        let db = SqlitePoolOptions::new()
            .max_connections(config.database.max_connections)
            .connect(&config.database.url)
            .await?;

        let cache = Cache::from_config(&config.cache);

        logger.in_scope(|| {
            info!(
                app = %config.app.name,
                %env,
                max_connections = config.database.max_connections,
                "application context ready"
            );
        });

        Ok(Arc::new(Self {
            config,
            env,
            logger,
            db,
            cache,
        }))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn env(&self) -> Environment {
        self.env
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    pub fn db(&self) -> &SqlitePool {
        &self.db
    }

    pub fn cache(&self) -> &Cache {
        &self.cache
    }

    /// Round-trips `SELECT 1` through the pool.
    pub async fn ping(&self) -> Result<()> {
        sqlx::query_scalar::<_, i64>("SELECT 1")
            .fetch_one(&self.db)
            .await?;
        Ok(())
    }

    /// A 500 envelope whose disclosure follows this context's environment.
    pub fn server_error<E: Display + ?Sized>(&self, err: &E) -> Response {
        brisk_response::server_error(err, self.env)
    }
}
