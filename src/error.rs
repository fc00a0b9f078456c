use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

pub type AppResult<T> = Result<T, AppError>;

#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("spreadsheet error: {0}")]
    Spreadsheet(String),

    #[error("no participants to generate")]
    EmptyParticipants,

    #[error("event name is required")]
    MissingEventName,

    #[error("font error: {0}")]
    Font(String),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("pdf error: {0}")]
    Pdf(String),

    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("layout error: {0}")]
    Layout(String),

    #[error("template error: {0}")]
    Template(#[from] tera::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("worker task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("batch aborted after {completed} certificate(s): {source}")]
    Batch {
        completed: usize,
        #[source]
        source: Box<AppError>,
    },
}

impl AppError {
    pub fn spreadsheet(msg: impl Into<String>) -> Self {
        Self::Spreadsheet(msg.into())
    }

    pub fn font(msg: impl Into<String>) -> Self {
        Self::Font(msg.into())
    }

    pub fn pdf(msg: impl Into<String>) -> Self {
        Self::Pdf(msg.into())
    }

    pub fn layout(msg: impl Into<String>) -> Self {
        Self::Layout(msg.into())
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Spreadsheet(_)
            | Self::EmptyParticipants
            | Self::MissingEventName
            | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message shown to the person using the form.
    pub fn user_message(&self) -> String {
        match self {
            Self::Spreadsheet(_) => "Failed to parse Excel file. Please check the file format or ensure it's a valid .xlsx/.xls file.".to_string(),
            Self::EmptyParticipants => {
                "Please upload an Excel file with participant data first.".to_string()
            }
            Self::MissingEventName => "Please enter an Event Name.".to_string(),
            Self::BadRequest(msg) => msg.clone(),
            Self::Batch { completed, source } => format!(
                "Error: Failed to generate certificates. {} ({} completed before the failure)",
                source, completed
            ),
            other => format!("Error: Failed to generate certificates. {}", other),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{}", self);
        } else {
            tracing::warn!("{}", self);
        }

        let body = axum::Json(serde_json::json!({
            "status": "error",
            "message": self.user_message(),
        }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_errors_are_client_errors() {
        assert_eq!(AppError::EmptyParticipants.status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::MissingEventName.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::spreadsheet("zip header").status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::pdf("boom").status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn batch_error_reports_completed_count() {
        let err = AppError::Batch {
            completed: 3,
            source: Box::new(AppError::pdf("page overflow")),
        };
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.to_string().contains("after 3 certificate(s)"));
        assert!(err.user_message().contains("3 completed"));
    }

    #[test]
    fn template_failures_are_their_own_kind() {
        let err: AppError = tera::Error::msg("missing variable").into();
        assert!(matches!(err, AppError::Template(_)));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.to_string().starts_with("template error:"));
    }

    #[test]
    fn spreadsheet_message_matches_form_wording() {
        assert!(AppError::spreadsheet("x")
            .user_message()
            .starts_with("Failed to parse Excel file."));
    }
}
