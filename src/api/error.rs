// conference-export-service/src/api/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{error, warn};

use crate::error::ExportError;

impl ExportError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ExportError::NotFound(_) => StatusCode::NOT_FOUND,
            ExportError::InvalidUserId(_) | ExportError::EmptyResult => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ExportError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            error!(error = %self, error_type = self.error_type(), "Export request failed");
        } else {
            warn!(error = %self, error_type = self.error_type(), "Export request rejected");
        }

        (status, Json(self.to_error_response())).into_response()
    }
}
