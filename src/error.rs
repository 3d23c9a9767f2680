// conference-export-service/src/error.rs

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ExportError>;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Invalid user ID: {0:?}")]
    InvalidUserId(String),

    #[error("User not found: {0}")]
    NotFound(i64),

    #[error("No regular users to export")]
    EmptyResult,

    #[error("Render error: {0}")]
    Render(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Template error: {0}")]
    Template(#[from] handlebars::TemplateError),

    #[error("Template rendering error: {0}")]
    TemplateRender(#[from] handlebars::RenderError),
}

impl ExportError {
    pub fn error_type(&self) -> &'static str {
        match self {
            ExportError::InvalidUserId(_) => "invalid_user_id",
            ExportError::NotFound(_) => "not_found",
            ExportError::EmptyResult => "empty_result",
            ExportError::Render(_) => "render_error",
            ExportError::Io(_) => "io_error",
            ExportError::Database(_) => "database_error",
            ExportError::Template(_) => "template_error",
            ExportError::TemplateRender(_) => "template_render_error",
        }
    }

    /// Message safe to hand back to a client. Internal failures are reported
    /// generically; the detail only goes to the log.
    pub fn public_message(&self) -> String {
        match self {
            ExportError::InvalidUserId(_) => "Invalid user ID".to_string(),
            ExportError::NotFound(_) => "User not found".to_string(),
            ExportError::EmptyResult => "No regular users available for export".to_string(),
            ExportError::Render(_) => "Failed to generate PDF".to_string(),
            _ => "Failed to export conference data".to_string(),
        }
    }

    pub fn to_error_response(&self) -> ErrorResponse {
        ErrorResponse {
            success: false,
            message: self.public_message(),
            error_type: self.error_type().to_string(),
        }
    }
}

#[derive(Debug, serde::Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
    pub error_type: String,
}
