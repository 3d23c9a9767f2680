// conference-export-service/src/api/routes.rs

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::handlers;
use crate::pipeline::ExportPipeline;

/// Admin export routes. Callers must already be authenticated administrators;
/// that check lives in front of this service.
pub fn router(pipeline: Arc<ExportPipeline>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/api/admin/users/{id}/conference/pdf",
            get(handlers::export_user_pdf),
        )
        .route("/api/admin/conference/pdf", get(handlers::export_all_pdf))
        .route(
            "/api/admin/users/{id}/fee-payment",
            get(handlers::get_fee_payment),
        )
        .route("/api/admin/users/{id}/abstract", get(handlers::get_abstract))
        .layer(TraceLayer::new_for_http())
        .with_state(pipeline)
}
