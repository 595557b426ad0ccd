// tests/store_tests.rs

mod common;

use common::input;
use stockroom_client::{EntryForm, IdentityStore, ProductStoreClient, StoreError};

#[actix_web::test]
async fn first_list_creates_an_identity_and_is_empty() {
  let (client, _repo) = common::spawn_client().await;

  let products = client.list().await.unwrap();

  assert!(products.is_empty());
  assert!(uuid::Uuid::parse_str(client.user_id().unwrap()).is_ok());
}

#[actix_web::test]
async fn create_returns_the_refetched_server_list() {
  let (client, repo) = common::spawn_client().await;

  let products = client
    .create(vec![input("A-1", 5, "LON"), input("B-2", 0, "PAR")])
    .await
    .unwrap();

  assert_eq!(repo.len(), 2);
  assert_eq!(products.len(), 2);
  assert!(products[0].id < products[1].id);
  assert_eq!(products[0].sku, "A-1");
  assert_eq!(client.snapshot(), products);
}

#[actix_web::test]
async fn identity_survives_a_new_client() {
  let (base_url, _repo) = common::spawn_api().await;
  let identity = common::scratch_identity();

  let first = ProductStoreClient::new(base_url.clone(), identity.clone());
  first.create(vec![input("A-1", 1, "LON")]).await.unwrap();

  let second = ProductStoreClient::new(base_url, IdentityStore::new(identity.path()));
  assert_eq!(second.list().await.unwrap().len(), 1);
}

#[actix_web::test]
async fn remove_deletes_and_refetches() {
  let (client, repo) = common::spawn_client().await;
  let created = client.create(vec![input("A-1", 1, "LON"), input("B-2", 2, "LON")]).await.unwrap();

  let remaining = client.remove(created[0].id).await.unwrap();

  assert_eq!(remaining.len(), 1);
  assert_eq!(remaining[0].sku, "B-2");
  assert_eq!(repo.len(), 1);
}

#[actix_web::test]
async fn removing_someone_elses_product_surfaces_the_server_message() {
  let (base_url, repo) = common::spawn_api().await;
  let owner = ProductStoreClient::new(base_url.clone(), common::scratch_identity());
  let stranger = ProductStoreClient::new(base_url, common::scratch_identity());
  let created = owner.create(vec![input("A-1", 1, "LON")]).await.unwrap();

  let err = stranger.remove(created[0].id).await.unwrap_err();

  assert!(matches!(&err, StoreError::Api(msg) if msg == "Not authorized to delete this product"));
  assert_eq!(repo.len(), 1);
  assert_eq!(owner.list().await.unwrap().len(), 1);
}

#[actix_web::test]
async fn removing_a_missing_product_is_not_found() {
  let (client, _repo) = common::spawn_client().await;

  let err = client.remove(4242).await.unwrap_err();

  assert_eq!(err.to_string(), "Selected product not found in database");
}

#[actix_web::test]
async fn overlapping_submissions_are_refused() {
  let (client, repo) = common::spawn_client().await;

  let (first, second) = tokio::join!(
    client.create(vec![input("A-1", 1, "LON")]),
    client.create(vec![input("B-2", 1, "LON")]),
  );

  assert!(first.is_ok());
  assert!(matches!(second, Err(StoreError::Busy)));
  assert_eq!(repo.len(), 1);
}

#[actix_web::test]
async fn unreachable_server_is_a_transport_failure() {
  common::setup_tracing();
  let client = ProductStoreClient::new("http://127.0.0.1:9/api/v1", common::scratch_identity());

  let err = client.list().await.unwrap_err();

  assert!(matches!(err, StoreError::Transport { .. }));
  assert_eq!(err.to_string(), "Failed to fetch products");
}

#[actix_web::test]
async fn entry_form_clears_after_a_successful_submit() {
  let (client, repo) = common::spawn_client().await;
  let mut form = EntryForm {
    sku: " A-1 ".into(),
    quantity: "3".into(),
    description: "".into(),
    store: "LON".into(),
  };

  let added = form.submit(&client).await.unwrap();

  assert_eq!(added.sku, "A-1");
  assert_eq!(form, EntryForm::default());
  assert_eq!(repo.len(), 1);
  assert_eq!(client.snapshot()[0].description, None);
}

#[actix_web::test]
async fn entry_form_keeps_its_fields_when_invalid() {
  let (client, repo) = common::spawn_client().await;
  let mut form = EntryForm {
    sku: "A-1".into(),
    quantity: "many".into(),
    ..EntryForm::default()
  };
  let before = form.clone();

  let err = form.submit(&client).await.unwrap_err();

  assert_eq!(err.to_string(), "'quantity' must be a number, 'store' must not be empty");
  assert_eq!(form, before);
  assert_eq!(repo.len(), 0);
}
