// Bulk export: one PDF per participant row, bundled into a ZIP archive.
// Rows are processed strictly in order. Each record is built right before
// its render and dropped once its archive entry is written. The first
// failure aborts the whole batch; no partial archive is returned.

use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::certificate::CertificateRecord;
use crate::error::{AppError, AppResult};
use crate::naming::{self, EntryNames};
use crate::participants::ParticipantRow;
use crate::render::Renderer;

#[derive(Debug)]
pub struct BatchArchive {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub generated: usize,
}

/// Produces one certificate artifact per record. The renderer-backed
/// implementation is [`PdfCertificates`].
pub trait CertificateSink {
    fn certificate_pdf(&self, record: &CertificateRecord) -> AppResult<Vec<u8>>;
}

pub struct PdfCertificates<'a> {
    renderer: &'a Renderer,
}

impl<'a> PdfCertificates<'a> {
    pub fn new(renderer: &'a Renderer) -> Self {
        Self { renderer }
    }
}

impl CertificateSink for PdfCertificates<'_> {
    fn certificate_pdf(&self, record: &CertificateRecord) -> AppResult<Vec<u8>> {
        let image = self.renderer.render(record);
        crate::pdf::image_to_pdf(&image, &format!("Certificate - {}", record.name))
    }
}

/// Checks the preconditions of a batch before any work is done.
pub fn validate(rows: &[ParticipantRow], form: &CertificateRecord) -> AppResult<()> {
    if rows.is_empty() {
        return Err(AppError::EmptyParticipants);
    }
    if form.event_name.trim().is_empty() {
        return Err(AppError::MissingEventName);
    }
    Ok(())
}

pub fn generate_archive(
    sink: &impl CertificateSink,
    rows: &[ParticipantRow],
    form: &CertificateRecord,
) -> AppResult<BatchArchive> {
    validate(rows, form)?;

    let batch_id = naming::generate_batch_id();
    let span = tracing::info_span!("batch", id = %batch_id, rows = rows.len());
    let _guard = span.enter();

    let mut generated = 0;
    let result = write_entries(sink, rows, form, &mut generated);
    let bytes = result.map_err(|source| AppError::Batch {
        completed: generated,
        source: Box::new(source),
    })?;

    tracing::info!("Compressed {} certificate(s) into archive", generated);
    Ok(BatchArchive {
        file_name: naming::archive_file_name(&form.event_name),
        bytes,
        generated,
    })
}

fn write_entries(
    sink: &impl CertificateSink,
    rows: &[ParticipantRow],
    form: &CertificateRecord,
    generated: &mut usize,
) -> AppResult<Vec<u8>> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .unix_permissions(0o644);
    let mut names = EntryNames::new();
    let total = rows.len();

    for (index, row) in rows.iter().enumerate() {
        let record = row.to_record(index, form);
        tracing::info!(
            "Generating certificate for {}... ({}/{})",
            record.name,
            index + 1,
            total
        );

        let pdf = sink.certificate_pdf(&record)?;
        let entry = names.claim(naming::certificate_file_name(
            &record.name,
            &record.event_name,
            "pdf",
        ));
        zip.start_file(entry, options)?;
        zip.write_all(&pdf)?;
        *generated += 1;
    }

    Ok(zip.finish()?.into_inner())
}
