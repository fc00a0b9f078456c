mod api;
mod pages;

pub use api::*;
pub use pages::*;

use axum::http::{header, HeaderName};
use axum::response::{IntoResponse, Response};

use crate::export::Artifact;

pub const GENERATED_HEADER: &str = "x-certificates-generated";

fn attachment(artifact: Artifact, extra: Option<(HeaderName, String)>) -> Response {
    let content_type = artifact.content_type().to_string();
    let disposition = format!("attachment; filename=\"{}\"", artifact.file_name);
    let headers = [
        (header::CONTENT_TYPE, content_type),
        (header::CONTENT_DISPOSITION, disposition),
    ];
    match extra {
        Some(extra) => (headers, [extra], artifact.bytes).into_response(),
        None => (headers, artifact.bytes).into_response(),
    }
}
