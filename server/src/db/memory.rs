// src/db/memory.rs

use super::{ProductRepository, RepositoryError};
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use stockroom_core::{Product, ProductInsert};

/// Process-local product store. Ids start at 1 and are never reused.
#[derive(Debug, Default)]
pub struct MemoryProductRepository {
  inner: RwLock<MemoryTable>,
}

#[derive(Debug, Default)]
struct MemoryTable {
  last_id: i64,
  rows: BTreeMap<i64, Product>,
}

impl MemoryProductRepository {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn len(&self) -> usize {
    self.inner.read().rows.len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}

#[async_trait]
impl ProductRepository for MemoryProductRepository {
  async fn create_many(&self, products: &[ProductInsert]) -> Result<u64, RepositoryError> {
    let now = Utc::now();
    let mut table = self.inner.write();
    for insert in products {
      table.last_id += 1;
      let id = table.last_id;
      table.rows.insert(
        id,
        Product {
          id,
          user_id: insert.user_id.clone(),
          created_at: now,
          sku: insert.input.sku.clone(),
          quantity: insert.input.quantity,
          description: insert.input.description.clone(),
          store: insert.input.store.clone(),
        },
      );
    }
    Ok(products.len() as u64)
  }

  async fn find_many(&self, user_id: &str) -> Result<Vec<Product>, RepositoryError> {
    let table = self.inner.read();
    Ok(table.rows.values().filter(|p| p.user_id == user_id).cloned().collect())
  }

  async fn find_unique(&self, id: i64) -> Result<Option<Product>, RepositoryError> {
    Ok(self.inner.read().rows.get(&id).cloned())
  }

  async fn delete(&self, id: i64) -> Result<Option<Product>, RepositoryError> {
    Ok(self.inner.write().rows.remove(&id))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use stockroom_core::ProductInput;

  fn insert(user: &str, sku: &str) -> ProductInsert {
    ProductInput {
      sku: sku.into(),
      quantity: 1,
      description: None,
      store: "BAT".into(),
    }
    .into_insert(user)
  }

  #[tokio::test]
  async fn assigns_increasing_ids_and_scopes_by_user() {
    let repo = MemoryProductRepository::new();
    let count = repo
      .create_many(&[insert("u1", "a"), insert("u2", "b"), insert("u1", "c")])
      .await
      .unwrap();
    assert_eq!(count, 3);

    let mine = repo.find_many("u1").await.unwrap();
    assert_eq!(mine.iter().map(|p| (p.id, p.sku.as_str())).collect::<Vec<_>>(), vec![(1, "a"), (3, "c")]);
    assert!(repo.find_many("nobody").await.unwrap().is_empty());
  }

  #[tokio::test]
  async fn delete_returns_removed_row_once() {
    let repo = MemoryProductRepository::new();
    repo.create_many(&[insert("u1", "a")]).await.unwrap();
    assert_eq!(repo.delete(1).await.unwrap().map(|p| p.sku), Some("a".to_string()));
    assert_eq!(repo.delete(1).await.unwrap(), None);
    assert!(repo.is_empty());
  }
}
