use axum::{
    extract::{Query, State},
    http::header,
    response::{Html, IntoResponse, Response},
    Form,
};
use serde::Deserialize;
use std::sync::Arc;
use tera::Context;

use crate::certificate::CertificateRecord;
use crate::error::AppResult;
use crate::export::{self, ExportFormat};
use crate::state::AppState;

pub async fn index() -> AppResult<Html<String>> {
    let mut ctx = Context::new();
    ctx.insert("record", &CertificateRecord::default());
    render_template("index.html", ctx)
}

/// Certificate fields from a form or query string; absent fields take the
/// default record's text.
#[derive(Debug, Default, Deserialize)]
pub struct CertificateForm {
    name: Option<String>,
    course_name: Option<String>,
    college_name: Option<String>,
    event_name: Option<String>,
    #[serde(default)]
    format: ExportFormat,
}

impl CertificateForm {
    pub fn into_record(self) -> CertificateRecord {
        let defaults = CertificateRecord::default();
        CertificateRecord {
            name: self.name.unwrap_or(defaults.name),
            course_name: self.course_name.unwrap_or(defaults.course_name),
            college_name: self.college_name.unwrap_or(defaults.college_name),
            event_name: self.event_name.unwrap_or(defaults.event_name),
        }
    }
}

pub async fn preview(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CertificateForm>,
) -> AppResult<Response> {
    let record = query.into_record();
    let renderer = state.renderer.clone();
    let png = tokio::task::spawn_blocking(move || export::encode_png(&renderer.render(&record)))
        .await??;

    Ok((
        [
            (header::CONTENT_TYPE, "image/png"),
            (header::CACHE_CONTROL, "no-store"),
        ],
        png,
    )
        .into_response())
}

pub async fn download_certificate(
    State(state): State<Arc<AppState>>,
    Form(form): Form<CertificateForm>,
) -> AppResult<Response> {
    let format = form.format;
    let record = form.into_record();
    tracing::info!("Generating single {:?} certificate for {}", format, record.name);

    let renderer = state.renderer.clone();
    let artifact =
        tokio::task::spawn_blocking(move || export::export_single(&renderer, &record, format))
            .await??;

    Ok(super::attachment(artifact, None))
}

fn render_template(name: &str, ctx: Context) -> AppResult<Html<String>> {
    let tera = crate::templates::get_tera();
    Ok(Html(tera.render(name, &ctx)?))
}
