//! Storage layer
//!
//! PostgreSQL is the production store. SQLite (embedded) is accepted for
//! local runs and tests. Both sit behind [`TodoStore`] and share one
//! implementation: the statements below use `$n` placeholders, which both
//! drivers accept.

const SELECT_ITEMS: &str = "SELECT id, title, completed FROM todos";
const INSERT_ITEM: &str = "INSERT INTO todos (title, completed) VALUES ($1, $2) RETURNING id";
const UPDATE_ITEM: &str = "UPDATE todos SET title = $1, completed = $2 WHERE id = $3";
const DELETE_ITEM: &str = "DELETE FROM todos WHERE id = $1";

/// Implements [`TodoStore`] for a store holding a sqlx pool in `pool`.
macro_rules! impl_todo_store {
    ($store:ty) => {
        #[async_trait::async_trait]
        impl $crate::storage::TodoStore for $store {
            async fn list(&self) -> Result<Vec<todo_types::Item>, $crate::storage::StoreError> {
                use $crate::storage::StoreError;

                let rows = sqlx::query($crate::storage::SELECT_ITEMS)
                    .fetch_all(&self.pool)
                    .await
                    .map_err(StoreError::Query)?;

                rows.iter()
                    .map(|row| $crate::storage::decode_item(row).map_err(StoreError::Row))
                    .collect()
            }

            async fn create(
                &self,
                item: &todo_types::Item,
            ) -> Result<todo_types::Item, $crate::storage::StoreError> {
                let id = sqlx::query_scalar::<_, i32>($crate::storage::INSERT_ITEM)
                    .bind(&item.title)
                    .bind(item.completed)
                    .fetch_one(&self.pool)
                    .await
                    .map_err($crate::storage::StoreError::Query)?;

                Ok(item.clone().with_id(id))
            }

            async fn update(
                &self,
                id: i64,
                item: &todo_types::Item,
            ) -> Result<(), $crate::storage::StoreError> {
                sqlx::query($crate::storage::UPDATE_ITEM)
                    .bind(&item.title)
                    .bind(item.completed)
                    .bind(id)
                    .execute(&self.pool)
                    .await
                    .map_err($crate::storage::StoreError::Query)?;

                Ok(())
            }

            async fn delete(&self, id: i64) -> Result<(), $crate::storage::StoreError> {
                sqlx::query($crate::storage::DELETE_ITEM)
                    .bind(id)
                    .execute(&self.pool)
                    .await
                    .map_err($crate::storage::StoreError::Query)?;

                Ok(())
            }

            async fn ping(&self) -> Result<(), $crate::storage::StoreError> {
                let mut conn = self
                    .pool
                    .acquire()
                    .await
                    .map_err($crate::storage::StoreError::Connect)?;
                sqlx::Connection::ping(&mut *conn)
                    .await
                    .map_err($crate::storage::StoreError::Connect)
            }

            async fn close(&self) {
                self.pool.close().await;
            }
        }
    };
}

pub mod postgres;
pub mod sqlite;

pub use postgres::PostgresStore;
pub use sqlite::SqliteStore;

use async_trait::async_trait;
use sqlx::{ColumnIndex, Decode, Row, Type};
use std::sync::Arc;
use thiserror::Error;
use todo_types::Item;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to open database: {0}")]
    Connect(#[source] sqlx::Error),

    #[error("Query failed: {0}")]
    Query(#[source] sqlx::Error),

    #[error("Failed to decode row: {0}")]
    Row(#[source] sqlx::Error),

    #[error("Unsupported database URL scheme: {0}")]
    UnsupportedUrl(String),
}

/// Persistence operations for todo items.
///
/// Update and delete never inspect affected-row counts: addressing an id
/// that matches nothing succeeds.
#[async_trait]
pub trait TodoStore: Send + Sync {
    /// All items, in whatever order the store returns them.
    async fn list(&self) -> Result<Vec<Item>, StoreError>;

    /// Inserts `item.title` and `item.completed`; `item.id` is ignored.
    async fn create(&self, item: &Item) -> Result<Item, StoreError>;

    /// `id` is passed through as given; it need not name an existing row.
    async fn update(&self, id: i64, item: &Item) -> Result<(), StoreError>;

    async fn delete(&self, id: i64) -> Result<(), StoreError>;

    /// Round-trips to the store to verify it is reachable.
    async fn ping(&self) -> Result<(), StoreError>;

    async fn close(&self);
}

/// Opens a store for `url`, picking the backend from the URL scheme.
///
/// Connections are established lazily; call [`TodoStore::ping`] to check
/// reachability.
pub fn connect(url: &str, max_connections: u32) -> Result<Arc<dyn TodoStore>, StoreError> {
    let scheme = url.split(':').next().unwrap_or_default();
    match scheme {
        "postgres" | "postgresql" => Ok(Arc::new(PostgresStore::connect_lazy(
            url,
            max_connections,
        )?)),
        "sqlite" => Ok(Arc::new(SqliteStore::connect_lazy(url, max_connections)?)),
        other => Err(StoreError::UnsupportedUrl(other.to_string())),
    }
}

/// Decodes a `SELECT id, title, completed` row.
pub(crate) fn decode_item<'r, R>(row: &'r R) -> Result<Item, sqlx::Error>
where
    R: Row,
    usize: ColumnIndex<R>,
    i32: Decode<'r, R::Database> + Type<R::Database>,
    String: Decode<'r, R::Database> + Type<R::Database>,
    bool: Decode<'r, R::Database> + Type<R::Database>,
{
    Ok(Item {
        id: row.try_get(0)?,
        title: row.try_get(1)?,
        completed: row.try_get(2)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_scheme() {
        assert!(matches!(
            connect("mysql://localhost/todos", 1),
            Err(StoreError::UnsupportedUrl(scheme)) if scheme == "mysql"
        ));
        assert!(matches!(
            connect("not a url", 1),
            Err(StoreError::UnsupportedUrl(_))
        ));
    }

    #[tokio::test]
    async fn test_scheme_selects_backend() {
        assert!(connect("postgres://todo@localhost:5432/todos", 1).is_ok());
        assert!(connect("postgresql://todo@localhost/todos", 1).is_ok());
        assert!(connect("sqlite::memory:", 1).is_ok());
    }
}
