//! CSV loading into an untyped [`RawTable`].

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, Trim};

use crate::error::IngestError;

/// Header names plus every record as raw strings, in file order.
///
/// Short records are padded with empty strings so every record has exactly
/// `headers.len()` cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub records: Vec<Vec<String>>,
}

impl RawTable {
    /// Position of the first header named exactly `name`.
    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }
}

/// Read a CSV file from disk.
///
/// # Errors
///
/// Returns [`IngestError::NotFound`] when `path` does not exist, and
/// [`IngestError::Io`] / [`IngestError::Csv`] for read or parse failures.
pub fn load_csv(path: &Path) -> Result<RawTable, IngestError> {
    let file = File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            IngestError::NotFound {
                path: path.display().to_string(),
            }
        } else {
            IngestError::Io {
                path: path.display().to_string(),
                source: e,
            }
        }
    })?;

    let table = read_csv(file)?;
    tracing::debug!(
        path = %path.display(),
        columns = table.headers.len(),
        rows = table.records.len(),
        "csv loaded"
    );
    Ok(table)
}

/// Parse CSV content from any reader. The first row is the header row.
///
/// Invalid UTF-8 is replaced rather than rejected.
///
/// # Errors
///
/// Returns [`IngestError::MissingHeader`] for empty input and
/// [`IngestError::Csv`] for malformed CSV.
pub fn read_csv<R: Read>(reader: R) -> Result<RawTable, IngestError> {
    let mut reader = ReaderBuilder::new()
        .trim(Trim::Headers)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .byte_headers()?
        .iter()
        .enumerate()
        .map(|(idx, h)| {
            let name = String::from_utf8_lossy(h);
            if idx == 0 {
                name.trim_start_matches('\u{feff}').to_string()
            } else {
                name.into_owned()
            }
        })
        .collect();

    if headers.is_empty() || headers.iter().all(String::is_empty) {
        return Err(IngestError::MissingHeader);
    }

    let width = headers.len();
    let mut records = Vec::new();
    for result in reader.byte_records() {
        let record = result?;
        let mut cells: Vec<String> = record
            .iter()
            .take(width)
            .map(|cell| String::from_utf8_lossy(cell).into_owned())
            .collect();
        cells.resize(width, String::new());
        records.push(cells);
    }

    Ok(RawTable { headers, records })
}
