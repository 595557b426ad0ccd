// src/web/handlers/product_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use stockroom_core::{ApiResponse, ContextData, CreatedCount, DeletedId, PipelineResult};
use tracing::{error, info, instrument, warn};

use crate::errors::AppError;
use crate::pipelines::contexts::{CreateProductsCtxData, DeleteProductCtxData};
use crate::state::AppState;

#[derive(Deserialize, Debug)]
pub struct UserQuery {
  #[serde(rename = "userId")]
  pub user_id: Option<String>,
}

impl UserQuery {
  fn user_id(&self) -> Option<&str> {
    self.user_id.as_deref().filter(|id| !id.is_empty())
  }
}

#[instrument(name = "handler::list_products", skip(app_state, query), fields(user_id = ?query.user_id))]
pub async fn list_products_handler(
  app_state: web::Data<AppState>,
  query: web::Query<UserQuery>,
) -> Result<HttpResponse, AppError> {
  let Some(user_id) = query.user_id() else {
    warn!("Product list requested without userId.");
    return Err(AppError::Validation("Parameter 'userId' is missing".to_string()));
  };

  let products = app_state
    .repo
    .find_many(user_id)
    .await
    .map_err(AppError::store("Server error"))?;

  info!("Successfully fetched {} products.", products.len());
  Ok(HttpResponse::Ok().json(ApiResponse::success(products)))
}

#[instrument(name = "handler::create_products", skip_all)]
pub async fn create_products_handler(
  app_state: web::Data<AppState>,
  body: web::Json<serde_json::Value>,
) -> Result<HttpResponse, AppError> {
  let ctx_data = ContextData::new(CreateProductsCtxData::new(app_state.repo.clone(), body.into_inner()));

  match app_state.workflows.run(ctx_data.clone()).await? {
    PipelineResult::Completed => {
      let count = ctx_data.read().created_count;
      Ok(HttpResponse::Created().json(ApiResponse::success(CreatedCount { count })))
    }
    PipelineResult::Stopped { step } => {
      error!(%step, "Create products pipeline halted unexpectedly.");
      Err(AppError::Internal(format!("create pipeline stopped at '{}'", step)))
    }
  }
}

#[instrument(name = "handler::delete_product", skip(app_state, path, query), fields(product_id = %path.as_ref()))]
pub async fn delete_product_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
  query: web::Query<UserQuery>,
) -> Result<HttpResponse, AppError> {
  let requested_by = query.into_inner().user_id;
  info!(?requested_by, "Product remove request.");
  let ctx_data = ContextData::new(DeleteProductCtxData::new(
    app_state.repo.clone(),
    path.into_inner(),
    requested_by,
  ));

  let outcome = app_state.workflows.run(ctx_data.clone()).await?;
  let deleted_id = ctx_data.read().deleted_id;
  match (outcome, deleted_id) {
    (PipelineResult::Completed, Some(id)) => Ok(HttpResponse::Ok().json(ApiResponse::success(DeletedId { id }))),
    (outcome, _) => {
      error!(?outcome, "Delete product pipeline finished without a deleted id.");
      Err(AppError::Internal("delete pipeline produced no result".to_string()))
    }
  }
}
