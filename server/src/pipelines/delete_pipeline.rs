// src/pipelines/delete_pipeline.rs

use crate::errors::AppError;
use crate::pipelines::contexts::DeleteProductCtxData;
use stockroom_core::{ContextData, Pipeline, PipelineControl, Registry};
use tracing::{info, warn};

const DELETE_FAILED: &str = "Failed to delete product";

pub fn register_delete_product_pipeline(registry: &Registry<AppError>) {
  let mut p = Pipeline::<DeleteProductCtxData, AppError>::new(&[
    ("parse_params", false, None),
    ("load_product", false, None),
    ("check_owner", false, None),
    ("remove_product", false, None),
  ]);

  // Step 1: id must be a positive integer and userId must be present.
  p.on_step("parse_params", |ctx_data: ContextData<DeleteProductCtxData>| {
    Box::pin(async move {
      let mut guard = ctx_data.write();
      let product_id = guard.raw_id.trim().parse::<i64>().ok().filter(|id| *id > 0);
      let Some(product_id) = product_id else {
        warn!(raw_id = %guard.raw_id, "Delete request with invalid product id.");
        return Err(AppError::Validation(
          "Parameter 'id' must be a positive integer".to_string(),
        ));
      };
      if guard.requested_by.as_deref().map_or(true, str::is_empty) {
        warn!(product_id, "Delete request without userId.");
        return Err(AppError::Validation("Parameter 'userId' is missing".to_string()));
      }
      guard.product_id = Some(product_id);
      Ok(PipelineControl::Continue)
    })
  });

  // Step 2: the product has to exist.
  p.on_step("load_product", |ctx_data: ContextData<DeleteProductCtxData>| {
    Box::pin(async move {
      let (repo, product_id) = {
        let guard = ctx_data.read();
        (guard.repo.clone(), guard.product_id)
      };
      let product_id = parsed_id(product_id, "load_product")?;

      match repo.find_unique(product_id).await.map_err(AppError::store(DELETE_FAILED))? {
        Some(product) => {
          ctx_data.write().found = Some(product);
          Ok(PipelineControl::Continue)
        }
        None => {
          info!(product_id, "Removal requested for a product that is not in the store.");
          Err(AppError::NotFound("Selected product not found in database".to_string()))
        }
      }
    })
  });

  // Step 3: only the owning userId may delete. Not a security boundary.
  p.on_step("check_owner", |ctx_data: ContextData<DeleteProductCtxData>| {
    Box::pin(async move {
      let guard = ctx_data.read();
      let owner = guard.found.as_ref().map(|p| p.user_id.as_str());
      if owner.is_some() && owner == guard.requested_by.as_deref() {
        return Ok(PipelineControl::Continue);
      }
      warn!(
        product_id = ?guard.product_id,
        requested_by = ?guard.requested_by,
        "Removal requested for a product owned by someone else."
      );
      Err(AppError::Forbidden("Not authorized to delete this product".to_string()))
    })
  });

  // Step 4: delete. A row that vanished since step 2 is reported as not found.
  p.on_step("remove_product", |ctx_data: ContextData<DeleteProductCtxData>| {
    Box::pin(async move {
      let (repo, product_id) = {
        let guard = ctx_data.read();
        (guard.repo.clone(), guard.product_id)
      };
      let product_id = parsed_id(product_id, "remove_product")?;

      match repo.delete(product_id).await.map_err(AppError::store(DELETE_FAILED))? {
        Some(removed) => {
          info!(product_id = removed.id, "Product deleted successfully.");
          ctx_data.write().deleted_id = Some(removed.id);
          Ok(PipelineControl::Continue)
        }
        None => Err(AppError::NotFound("Selected product not found in database".to_string())),
      }
    })
  });

  registry.register_pipeline(p);
  info!("Delete product pipeline registered.");
}

/// The id set by `parse_params`; any later step that finds it unset ran out of order.
fn parsed_id(product_id: Option<i64>, step: &str) -> Result<i64, AppError> {
  product_id.ok_or_else(|| AppError::Internal(format!("{} ran before parse_params", step)))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn later_steps_refuse_an_unparsed_id() {
    let err = parsed_id(None, "remove_product").unwrap_err();
    assert!(matches!(&err, AppError::Internal(msg) if msg == "remove_product ran before parse_params"));
    assert_eq!(parsed_id(Some(7), "remove_product").unwrap(), 7);
  }
}
