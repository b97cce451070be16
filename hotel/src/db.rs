use abi::{DbConfig, Error};
use sqlx::{pool::PoolConnection, postgres::PgPoolOptions, PgPool, Postgres};
use tracing::info;

/// Owns the pool; every request borrows one connection and hands it back on drop.
#[derive(Debug, Clone)]
pub struct HotelDb {
    pool: PgPool,
}

impl HotelDb {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn from_config(config: &DbConfig) -> Result<Self, Error> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.url())
            .await?;
        info!(max_connections = config.max_connections, "connected to database");
        Ok(Self::new(pool))
    }

    /// no connection is opened until the first query
    pub fn connect_lazy(config: &DbConfig) -> Result<Self, Error> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect_lazy(&config.url())?;
        Ok(Self::new(pool))
    }

    pub async fn acquire(&self) -> Result<PoolConnection<Postgres>, Error> {
        Ok(self.pool.acquire().await?)
    }

    pub async fn migrate(&self) -> Result<(), Error> {
        sqlx::migrate!("../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::DbError(sqlx::Error::Migrate(Box::new(e))))?;
        info!("migrations applied");
        Ok(())
    }
}
