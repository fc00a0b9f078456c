// Spreadsheet rows and how they map onto certificate records.

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use serde::Serialize;
use std::collections::HashSet;
use std::io::Cursor;

use crate::certificate::CertificateRecord;
use crate::error::{AppError, AppResult};

/// Column headers tried, in order, for the participant's name.
pub const NAME_COLUMNS: [&str; 3] = ["Student Name", "Name", "Candidate's Name"];
pub const COURSE_COLUMN: &str = "Course";
pub const COLLEGE_COLUMN: &str = "College";

const EMPTY_HEADER: &str = "__EMPTY";

/// One data row keyed by header. Every header of the sheet is present;
/// missing cells hold `""`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParticipantRow {
    cells: Vec<(String, String)>,
}

impl ParticipantRow {
    pub fn new(cells: Vec<(String, String)>) -> Self {
        Self { cells }
    }

    /// Value of `column` as written in the sheet. Blank cells count as absent.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|(k, _)| k == column)
            .map(|(_, v)| v.as_str())
            .filter(|v| !v.trim().is_empty())
    }

    pub fn name(&self) -> Option<&str> {
        NAME_COLUMNS.iter().find_map(|col| self.get(col))
    }

    /// Name for certificates; `index` is 0-based.
    pub fn display_name(&self, index: usize) -> String {
        self.name()
            .map(str::to_string)
            .unwrap_or_else(|| format!("Participant {}", index + 1))
    }

    /// Name for the upload preview list; `index` is 0-based.
    pub fn preview_name(&self, index: usize) -> String {
        self.name()
            .map(str::to_string)
            .unwrap_or_else(|| format!("Row {}", index + 1))
    }

    /// Record shown in the preview after an upload, with placeholder text for
    /// whatever the row does not provide.
    pub fn preview_record(&self, event_name: &str) -> CertificateRecord {
        CertificateRecord {
            name: self.name().unwrap_or("Participant Name").to_string(),
            course_name: self.get(COURSE_COLUMN).unwrap_or("Achievement Title").to_string(),
            college_name: self
                .get(COLLEGE_COLUMN)
                .unwrap_or("Organization Name")
                .to_string(),
            event_name: event_name.to_string(),
        }
    }

    /// Builds the record for this row. Course and college fall back to the
    /// form values; the event always comes from the form.
    pub fn to_record(&self, index: usize, form: &CertificateRecord) -> CertificateRecord {
        CertificateRecord {
            name: self.display_name(index),
            course_name: self
                .get(COURSE_COLUMN)
                .map(str::to_string)
                .unwrap_or_else(|| form.course_name.clone()),
            college_name: self
                .get(COLLEGE_COLUMN)
                .map(str::to_string)
                .unwrap_or_else(|| form.college_name.clone()),
            event_name: form.event_name.clone(),
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ParticipantRow {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::new(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Reads the first worksheet of an Excel/ODS workbook into rows.
pub fn parse_workbook(bytes: &[u8]) -> AppResult<Vec<ParticipantRow>> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|e| AppError::spreadsheet(e.to_string()))?;

    let sheet = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| AppError::spreadsheet("workbook has no sheets"))?;
    let range = workbook
        .worksheet_range(&sheet)
        .map_err(|e| AppError::spreadsheet(e.to_string()))?;

    let grid: Vec<Vec<String>> = range
        .rows()
        .map(|row| row.iter().map(cell_to_string).collect())
        .collect();
    let rows = rows_from_grid(grid);
    tracing::debug!("Parsed {} participant row(s) from sheet '{}'", rows.len(), sheet);
    Ok(rows)
}

/// Turns a grid whose first row is the header into keyed rows, skipping
/// rows with no content.
pub fn rows_from_grid(grid: Vec<Vec<String>>) -> Vec<ParticipantRow> {
    let mut rows = grid.into_iter();
    let Some(header) = rows.next() else {
        return Vec::new();
    };
    let headers = unique_headers(&header);

    rows.filter(|cells| cells.iter().any(|c| !c.trim().is_empty()))
        .map(|cells| {
            let mut cells = cells.into_iter();
            headers
                .iter()
                .map(|h| (h.clone(), cells.next().unwrap_or_default()))
                .collect::<ParticipantRow>()
        })
        .collect()
}

/// Blank headers become `__EMPTY`, repeats get `_1`, `_2`, ... suffixes.
fn unique_headers(header: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    header
        .iter()
        .map(|h| {
            let base = match h.trim() {
                "" => EMPTY_HEADER,
                trimmed => trimmed,
            };
            let mut key = base.to_string();
            let mut n = 1;
            while seen.contains(&key) {
                key = format!("{}_{}", base, n);
                n += 1;
            }
            seen.insert(key.clone());
            key
        })
        .collect()
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(true) => "TRUE".to_string(),
        Data::Bool(false) => "FALSE".to_string(),
        other => other.to_string(),
    }
}
