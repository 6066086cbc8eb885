use async_trait::async_trait;
use sqlx::FromRow;
use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::info;

use super::{Store, StoreError};
use crate::config::Config;
use crate::todo::{NewTodo, Todo};

const CREATE_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS todos (
        id        BIGSERIAL PRIMARY KEY,
        title     TEXT      NOT NULL DEFAULT '',
        completed BOOLEAN   NOT NULL DEFAULT FALSE,
        "order"   BIGINT    NOT NULL DEFAULT 0
    )
"#;

const COLUMNS: &str = r#"id, title, completed, "order""#;

#[derive(FromRow)]
struct TodoRow {
    id: i64,
    title: String,
    completed: bool,
    order: i64,
}

impl From<TodoRow> for Todo {
    fn from(row: TodoRow) -> Self {
        Todo {
            id: Some(row.id),
            title: Some(row.title),
            completed: Some(row.completed),
            order: Some(row.order),
            url: String::new(),
        }
    }
}

/// [`Store`] backed by a Postgres `todos` table.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Opens a connection pool from `config` and makes sure the table exists.
    pub async fn connect(config: &Config) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .connect(&config.database_url())
            .await?;
        info!(
            host = %config.database_host,
            port = config.database_port,
            database = %config.database_name,
            "connected to postgres"
        );
        let store = Self::new(pool);
        store.ensure_schema().await?;
        Ok(store)
    }

    /// Wraps an existing pool. Does not touch the schema.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(CREATE_TABLE).execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl Store for PgStore {
    async fn get_all(&self) -> Result<Vec<Todo>, StoreError> {
        let sql = format!(r#"SELECT {COLUMNS} FROM todos ORDER BY "order" ASC, id ASC"#);
        let rows = sqlx::query_as::<_, TodoRow>(&sql).fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(Todo::from).collect())
    }

    async fn get(&self, id: i64) -> Result<Todo, StoreError> {
        let sql = format!("SELECT {COLUMNS} FROM todos WHERE id = $1");
        let row = sqlx::query_as::<_, TodoRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Todo::from).ok_or(StoreError::NotFound)
    }

    async fn save(&self, todo: NewTodo) -> Result<Todo, StoreError> {
        let sql = format!(
            r#"INSERT INTO todos (title, completed, "order") VALUES ($1, $2, $3) RETURNING {COLUMNS}"#
        );
        let row = sqlx::query_as::<_, TodoRow>(&sql)
            .bind(todo.title)
            .bind(todo.completed)
            .bind(todo.order)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.into())
    }

    async fn update(&self, id: i64, patch: Todo) -> Result<Todo, StoreError> {
        // NULL parameters leave the column as stored.
        let sql = format!(
            r#"UPDATE todos SET
                 title     = COALESCE($1, title),
                 completed = COALESCE($2, completed),
                 "order"   = COALESCE($3, "order")
               WHERE id = $4
               RETURNING {COLUMNS}"#
        );
        let row = sqlx::query_as::<_, TodoRow>(&sql)
            .bind(patch.title)
            .bind(patch.completed)
            .bind(patch.order)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Todo::from).ok_or(StoreError::NotFound)
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let done = sqlx::query("DELETE FROM todos WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if done.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn delete_all(&self) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM todos").execute(&self.pool).await?;
        Ok(())
    }

    async fn destroy(&self) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DROP TABLE IF EXISTS todos").execute(&mut *tx).await?;
        sqlx::query(CREATE_TABLE).execute(&mut *tx).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
