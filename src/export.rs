use image::{ImageFormat, RgbImage};
use serde::Deserialize;
use std::io::Cursor;

use crate::certificate::CertificateRecord;
use crate::error::AppResult;
use crate::naming;
use crate::render::Renderer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Png,
    Pdf,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Pdf => "pdf",
        }
    }
}

/// A finished file ready to be sent as a download.
#[derive(Debug)]
pub struct Artifact {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl Artifact {
    pub fn content_type(&self) -> &'static str {
        mime_guess::from_path(&self.file_name)
            .first_raw()
            .unwrap_or("application/octet-stream")
    }
}

pub fn encode_png(image: &RgbImage) -> AppResult<Vec<u8>> {
    let mut buf = Cursor::new(Vec::new());
    image.write_to(&mut buf, ImageFormat::Png)?;
    Ok(buf.into_inner())
}

/// Renders one certificate and encodes it in `format`.
pub fn export_single(
    renderer: &Renderer,
    record: &CertificateRecord,
    format: ExportFormat,
) -> AppResult<Artifact> {
    let image = renderer.render(record);
    let bytes = match format {
        ExportFormat::Png => encode_png(&image)?,
        ExportFormat::Pdf => {
            crate::pdf::image_to_pdf(&image, &format!("Certificate - {}", record.name))?
        }
    };

    let file_name =
        naming::certificate_file_name(&record.name, &record.event_name, format.extension());
    tracing::info!("Exported {} ({} bytes)", file_name, bytes.len());
    Ok(Artifact { file_name, bytes })
}
