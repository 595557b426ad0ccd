// src/web/routes.rs

use actix_web::{error, web, HttpResponse};
use stockroom_core::API_BASE_PATH;

use crate::errors::AppError;
use crate::web::handlers::product_handlers;

async fn health_check_handler() -> HttpResponse {
  HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

async fn root_handler() -> HttpResponse {
  HttpResponse::Ok().content_type("text/plain").body("Backend up and running")
}

/// Mounts every route. Malformed JSON bodies and query strings are answered
/// with the failure envelope instead of actix's default plain-text errors.
pub fn configure_app_routes(cfg: &mut web::ServiceConfig, max_body_bytes: usize) {
  let json_config = web::JsonConfig::default()
    .limit(max_body_bytes)
    .error_handler(|err, _req| {
      let reason = match &err {
        error::JsonPayloadError::Overflow { .. } | error::JsonPayloadError::OverflowKnownLength { .. } => {
          "Request body is too large".to_string()
        }
        other => format!("Invalid JSON body: {}", other),
      };
      AppError::Validation(reason).into()
    });
  let query_config = web::QueryConfig::default()
    .error_handler(|err, _req| AppError::Validation(format!("Invalid query string: {}", err)).into());

  cfg
    .app_data(json_config)
    .app_data(query_config)
    .route("/", web::get().to(root_handler))
    .service(
      web::scope(API_BASE_PATH)
        .route("/health", web::get().to(health_check_handler))
        .service(
          web::scope("/products")
            .route("", web::get().to(product_handlers::list_products_handler))
            .route("", web::post().to(product_handlers::create_products_handler))
            .route("/{id}", web::delete().to(product_handlers::delete_product_handler)),
        ),
    );
}
