// qualis-core/src/infrastructure/loader/delimited.rs

use encoding_rs::WINDOWS_1252;
use std::borrow::Cow;
use std::path::Path;

use crate::domain::dataset::{RawCell, TabularDataset};
use crate::domain::error::DatasetLoadError;
use crate::infrastructure::loader::{build_dataset, normalize_headers};

const DELIMITERS: [u8; 4] = [b',', b';', b'\t', b'|'];
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

pub fn read_csv(path: &Path) -> Result<TabularDataset, DatasetLoadError> {
    let read_err = |reason: String| DatasetLoadError::DatasetReadError {
        path: path.to_path_buf(),
        reason,
    };

    let bytes = std::fs::read(path).map_err(|e| read_err(e.to_string()))?;
    let text = decode(&bytes);
    let delimiter = sniff_delimiter(&text);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| read_err(e.to_string()))?
        .iter()
        .map(String::from)
        .collect::<Vec<_>>();
    if headers.is_empty() || (headers.len() == 1 && headers[0].trim().is_empty()) {
        return Err(read_err("no columns to parse from file".to_string()));
    }
    let headers = normalize_headers(headers);

    let mut rows = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record.map_err(|e| read_err(e.to_string()))?;
        if record.len() > headers.len() {
            return Err(read_err(format!(
                "expected {} fields in line {}, saw {}",
                headers.len(),
                record.position().map_or(i as u64 + 2, |p| p.line()),
                record.len()
            )));
        }
        rows.push(record.iter().map(RawCell::parse).collect());
    }

    build_dataset(path, headers, rows)
}

/// UTF-8 (BOM stripped), falling back to Windows-1252 for legacy exports.
fn decode(bytes: &[u8]) -> Cow<'_, str> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(text) => Cow::Borrowed(text),
        Err(_) => WINDOWS_1252.decode_without_bom_handling(bytes).0,
    }
}

/// Most frequent candidate on the header line, outside quotes. Defaults to `,`.
fn sniff_delimiter(text: &str) -> u8 {
    let Some(header) = text.lines().find(|l| !l.trim().is_empty()) else {
        return b',';
    };

    let mut counts = [0usize; DELIMITERS.len()];
    let mut quoted = false;
    for byte in header.bytes() {
        if byte == b'"' {
            quoted = !quoted;
        } else if !quoted && let Some(i) = DELIMITERS.iter().position(|d| *d == byte) {
            counts[i] += 1;
        }
    }

    // first candidate wins ties
    let mut best = 0;
    for i in 1..DELIMITERS.len() {
        if counts[i] > counts[best] {
            best = i;
        }
    }
    if counts[best] == 0 { b',' } else { DELIMITERS[best] }
}
