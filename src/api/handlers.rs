// conference-export-service/src/api/handlers.rs

use axum::{
    extract::{Path, State},
    http::{header, HeaderName, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::error::{ExportError, Result};
use crate::models::{AbstractView, ExportedDocument, FeePaymentView};
use crate::pipeline::ExportPipeline;

const CHECKSUM_HEADER: HeaderName = HeaderName::from_static("x-content-sha256");

pub async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

pub async fn export_user_pdf(
    State(pipeline): State<Arc<ExportPipeline>>,
    Path(raw_id): Path<String>,
) -> Result<Response> {
    let user_id = parse_user_id(&raw_id)?;
    let request_id = Uuid::new_v4();
    info!(request_id = %request_id, user_id, "Single-user conference export requested");

    let document = pipeline.export_user(user_id).await?;
    Ok(pdf_response(document))
}

pub async fn export_all_pdf(State(pipeline): State<Arc<ExportPipeline>>) -> Result<Response> {
    let request_id = Uuid::new_v4();
    info!(request_id = %request_id, "Batch conference export requested");

    let document = pipeline.export_all().await?;
    Ok(pdf_response(document))
}

pub async fn get_fee_payment(
    State(pipeline): State<Arc<ExportPipeline>>,
    Path(raw_id): Path<String>,
) -> Result<Json<FeePaymentView>> {
    let user_id = parse_user_id(&raw_id)?;
    let payment = pipeline.db().get_fee_payment(user_id).await?;
    Ok(Json(FeePaymentView {
        success: true,
        payment,
    }))
}

pub async fn get_abstract(
    State(pipeline): State<Arc<ExportPipeline>>,
    Path(raw_id): Path<String>,
) -> Result<Json<AbstractView>> {
    let user_id = parse_user_id(&raw_id)?;
    let submission = pipeline.db().get_abstract_submission(user_id).await?;
    Ok(Json(AbstractView {
        success: true,
        submission,
    }))
}

fn parse_user_id(raw: &str) -> Result<i64> {
    raw.trim()
        .parse()
        .map_err(|_| ExportError::InvalidUserId(raw.to_string()))
}

fn pdf_response(document: ExportedDocument) -> Response {
    let disposition = format!("attachment; filename=\"{}\"", document.filename);

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, document.content_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
            (CHECKSUM_HEADER, document.sha256_checksum),
        ],
        document.data,
    )
        .into_response()
}
