//! PostgreSQL store

use super::StoreError;
use sqlx::postgres::{PgPool, PgPoolOptions};

pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Builds the pool without opening a connection. Fails only on a
    /// malformed connection string.
    pub fn connect_lazy(url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect_lazy(url)
            .map_err(StoreError::Connect)?;

        Ok(Self { pool })
    }
}

impl_todo_store!(PostgresStore);
