use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tri_core::errors::{ErrorInfo, TriError};
use tri_graph::{GraphInfo, Traces};

use crate::catalog::{Catalog, CatalogEntry};
use crate::selector::Selector;

/// One exported row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportRecord {
    /// Caller supplied label.
    pub label: String,
    /// One-based position within the export.
    pub index: usize,
    /// Canonical identity.
    pub uid: String,
    /// Graph in text notation.
    pub graph: String,
    /// Census.
    pub info: GraphInfo,
    /// Traces, all rows the same length.
    pub traces: Traces,
    /// Prime flag of the trace entry.
    pub is_prime: bool,
}

fn csv_error(err: impl ToString) -> TriError {
    TriError::Serde(ErrorInfo::new("export.csv", err.to_string()))
}

fn json_error(err: impl ToString) -> TriError {
    TriError::Serde(ErrorInfo::new("export.json", err.to_string()))
}

/// Selected entries as export rows.
///
/// Rows carry the target trace length when the selector has one, otherwise
/// the largest vertex count among the rows.
pub fn export_records(
    catalog: &Catalog,
    selector: &Selector,
    label: &str,
) -> Result<Vec<ExportRecord>, TriError> {
    let entries = catalog.select_entries(selector)?;
    let trace_len = match &selector.traces {
        Some(target) => target.len(),
        None => entries.iter().map(CatalogEntry::verts).max().unwrap_or(0),
    };
    entries
        .iter()
        .enumerate()
        .map(|(idx, entry)| {
            Ok(ExportRecord {
                label: label.to_string(),
                index: idx + 1,
                uid: entry.uid.to_hex(),
                graph: entry.graph()?.to_string(),
                info: entry.info,
                traces: entry.traces_to(trace_len)?,
                is_prime: entry.is_prime,
            })
        })
        .collect()
}

/// Writes selected entries as CSV with a header row; returns the row count.
pub fn export_csv<W: Write>(
    catalog: &Catalog,
    selector: &Selector,
    label: &str,
    out: W,
) -> Result<usize, TriError> {
    let records = export_records(catalog, selector, label)?;
    let trace_len = records.first().map_or(0, |record| record.traces.len());
    let mut wtr = csv::Writer::from_writer(out);

    let mut header: Vec<String> = ["label", "index", "verts", "parts", "uid", "graph"]
        .iter()
        .map(|name| name.to_string())
        .collect();
    header.extend((1..=trace_len).map(|k| format!("T{k}")));
    wtr.write_record(&header).map_err(csv_error)?;

    for record in &records {
        let mut row = vec![
            record.label.clone(),
            record.index.to_string(),
            record.info.verts.to_string(),
            record.info.parts.to_string(),
            record.uid.clone(),
            record.graph.clone(),
        ];
        row.extend(record.traces.as_slice().iter().map(|value| value.to_string()));
        wtr.write_record(&row).map_err(csv_error)?;
    }
    wtr.flush().map_err(csv_error)?;
    Ok(records.len())
}

/// [`export_csv`] into a file.
pub fn export_csv_path(
    catalog: &Catalog,
    selector: &Selector,
    label: &str,
    path: &Path,
) -> Result<usize, TriError> {
    let file = File::create(path).map_err(|err| {
        TriError::Serde(
            ErrorInfo::new("export.csv", err.to_string()).with_context("path", path.display().to_string()),
        )
    })?;
    export_csv(catalog, selector, label, file)
}

/// Writes selected entries as a pretty JSON array; returns the row count.
pub fn export_json<W: Write>(
    catalog: &Catalog,
    selector: &Selector,
    label: &str,
    mut out: W,
) -> Result<usize, TriError> {
    let records = export_records(catalog, selector, label)?;
    serde_json::to_writer_pretty(&mut out, &records).map_err(json_error)?;
    out.write_all(b"\n").map_err(json_error)?;
    Ok(records.len())
}
