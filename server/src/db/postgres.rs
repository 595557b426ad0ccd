// src/db/postgres.rs

use super::{ProductRepository, RepositoryError};
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, QueryBuilder};
use stockroom_core::{Product, ProductInsert};
use tracing::{info, instrument};

/// Rows per INSERT statement; keeps bind parameters (5 per row) well under
/// PostgreSQL's limit of 65535.
const INSERT_CHUNK_ROWS: usize = 1000;

const PRODUCT_COLUMNS: &str = "id, user_id, created_at, sku, quantity, description, store";

const CREATE_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS products (
  id BIGSERIAL PRIMARY KEY,
  user_id TEXT NOT NULL,
  created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
  sku TEXT NOT NULL,
  quantity BIGINT NOT NULL CHECK (quantity >= 0),
  description TEXT NULL,
  store TEXT NOT NULL
)"#;

const CREATE_USER_INDEX: &str = "CREATE INDEX IF NOT EXISTS products_user_id_idx ON products (user_id)";

#[derive(Clone)]
pub struct PgProductRepository {
  pool: PgPool,
}

impl PgProductRepository {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }

  pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, RepositoryError> {
    let pool = PgPoolOptions::new()
      .max_connections(max_connections)
      .connect(database_url)
      .await?;
    info!("Successfully connected to the database.");
    Ok(Self::new(pool))
  }

  /// Creates the products table when it is missing. Existing tables are left as they are.
  pub async fn ensure_schema(&self) -> Result<(), RepositoryError> {
    sqlx::query(CREATE_TABLE).execute(&self.pool).await?;
    sqlx::query(CREATE_USER_INDEX).execute(&self.pool).await?;
    Ok(())
  }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
  #[instrument(name = "db::create_many", skip_all, fields(rows = products.len()), err(Display))]
  async fn create_many(&self, products: &[ProductInsert]) -> Result<u64, RepositoryError> {
    let mut tx = self.pool.begin().await?;
    let mut written = 0;
    for chunk in products.chunks(INSERT_CHUNK_ROWS) {
      let mut builder: QueryBuilder<Postgres> =
        QueryBuilder::new("INSERT INTO products (user_id, sku, quantity, description, store) ");
      builder.push_values(chunk, |mut row, product| {
        row
          .push_bind(product.user_id.clone())
          .push_bind(product.input.sku.clone())
          .push_bind(product.input.quantity)
          .push_bind(product.input.description.clone())
          .push_bind(product.input.store.clone());
      });
      written += builder.build().execute(&mut *tx).await?.rows_affected();
    }
    tx.commit().await?;
    Ok(written)
  }

  #[instrument(name = "db::find_many", skip(self), err(Display))]
  async fn find_many(&self, user_id: &str) -> Result<Vec<Product>, RepositoryError> {
    let query = format!("SELECT {} FROM products WHERE user_id = $1 ORDER BY id ASC", PRODUCT_COLUMNS);
    let products = sqlx::query_as::<_, Product>(&query)
      .bind(user_id)
      .fetch_all(&self.pool)
      .await?;
    Ok(products)
  }

  #[instrument(name = "db::find_unique", skip(self), err(Display))]
  async fn find_unique(&self, id: i64) -> Result<Option<Product>, RepositoryError> {
    let query = format!("SELECT {} FROM products WHERE id = $1", PRODUCT_COLUMNS);
    let product = sqlx::query_as::<_, Product>(&query)
      .bind(id)
      .fetch_optional(&self.pool)
      .await?;
    Ok(product)
  }

  #[instrument(name = "db::delete", skip(self), err(Display))]
  async fn delete(&self, id: i64) -> Result<Option<Product>, RepositoryError> {
    let query = format!("DELETE FROM products WHERE id = $1 RETURNING {}", PRODUCT_COLUMNS);
    let product = sqlx::query_as::<_, Product>(&query)
      .bind(id)
      .fetch_optional(&self.pool)
      .await?;
    Ok(product)
  }
}
