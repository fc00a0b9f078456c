use axum::{
    extract::{Multipart, State},
    http::HeaderName,
    response::Response,
    Json,
};
use std::sync::Arc;

use crate::batch::{self, PdfCertificates};
use crate::certificate::CertificateRecord;
use crate::error::{AppError, AppResult};
use crate::export::Artifact;
use crate::participants;
use crate::state::AppState;

const PREVIEW_ROWS: usize = 5;

/// Fields of the bulk upload form.
#[derive(Debug, Default)]
pub struct BulkUpload {
    pub spreadsheet: Option<Vec<u8>>,
    pub filename: String,
    pub event_name: Option<String>,
    pub course_name: Option<String>,
    pub college_name: Option<String>,
}

impl BulkUpload {
    pub async fn read(mut multipart: Multipart) -> AppResult<Self> {
        let mut upload = Self::default();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::bad_request(e.to_string()))?
        {
            let name = field.name().unwrap_or("").to_string();
            match name.as_str() {
                "spreadsheet" => {
                    upload.filename = field.file_name().unwrap_or("participants.xlsx").to_string();
                    let data = field
                        .bytes()
                        .await
                        .map_err(|e| AppError::bad_request(e.to_string()))?;
                    if !data.is_empty() {
                        upload.spreadsheet = Some(data.to_vec());
                    }
                }
                "event_name" | "course_name" | "college_name" => {
                    let text = field
                        .text()
                        .await
                        .map_err(|e| AppError::bad_request(e.to_string()))?;
                    let slot = match name.as_str() {
                        "event_name" => &mut upload.event_name,
                        "course_name" => &mut upload.course_name,
                        _ => &mut upload.college_name,
                    };
                    *slot = Some(text);
                }
                other => tracing::debug!("Ignoring form field {}", other),
            }
        }
        Ok(upload)
    }

    /// Form values used wherever a row has no value of its own.
    pub fn form_record(&self) -> CertificateRecord {
        let defaults = CertificateRecord::default();
        CertificateRecord {
            name: defaults.name,
            course_name: self.course_name.clone().unwrap_or(defaults.course_name),
            college_name: self.college_name.clone().unwrap_or(defaults.college_name),
            event_name: self.event_name.clone().unwrap_or(defaults.event_name),
        }
    }
}

pub async fn parse_participants(multipart: Multipart) -> AppResult<Json<serde_json::Value>> {
    let upload = BulkUpload::read(multipart).await?;
    let event_name = upload.form_record().event_name;

    let Some(bytes) = upload.spreadsheet else {
        return Ok(Json(serde_json::json!({
            "status": "ok",
            "count": 0,
            "preview": [],
            "more": 0,
            "message": "No file selected.",
        })));
    };

    tracing::info!("Parsing spreadsheet {} ({} bytes)", upload.filename, bytes.len());
    let rows = tokio::task::spawn_blocking(move || participants::parse_workbook(&bytes)).await??;

    let preview: Vec<String> = rows
        .iter()
        .take(PREVIEW_ROWS)
        .enumerate()
        .map(|(i, row)| row.preview_name(i))
        .collect();
    let message = if rows.is_empty() {
        "Upload an Excel file to get started.".to_string()
    } else {
        format!("Found {} participants. Ready to generate.", rows.len())
    };

    Ok(Json(serde_json::json!({
        "status": "ok",
        "count": rows.len(),
        "preview": preview,
        "more": rows.len().saturating_sub(PREVIEW_ROWS),
        "first": rows.first().map(|row| row.preview_record(&event_name)),
        "message": message,
    })))
}

pub async fn bulk_download(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> AppResult<Response> {
    let upload = BulkUpload::read(multipart).await?;
    let form = upload.form_record();
    let bytes = upload.spreadsheet.ok_or(AppError::EmptyParticipants)?;

    tracing::info!(
        "Bulk generation requested from {} for event {}",
        upload.filename,
        form.event_name
    );

    let renderer = state.renderer.clone();
    let archive = tokio::task::spawn_blocking(move || {
        let rows = participants::parse_workbook(&bytes)?;
        batch::generate_archive(&PdfCertificates::new(&renderer), &rows, &form)
    })
    .await??;

    tracing::info!(
        "Successfully generated {} certificates into {}",
        archive.generated,
        archive.file_name
    );

    let generated = archive.generated.to_string();
    Ok(super::attachment(
        Artifact {
            file_name: archive.file_name,
            bytes: archive.bytes,
        },
        Some((HeaderName::from_static(super::GENERATED_HEADER), generated)),
    ))
}

pub async fn health() -> &'static str {
    "ok"
}
