//! Serialization of the export artifacts.
//!
//! Each artifact is a header row followed by one fully quoted CSV row per
//! record. Artifacts are replaced wholesale: the previous file is removed
//! before the run writes a new one.

use csv::{QuoteStyle, Terminator, WriterBuilder};
use std::fs::{self, File};
use std::io;
use std::path::Path;
use tracing::debug;

use crate::error::{ExportError, ExportResult};
use crate::export::records::ExportRow;

/// Removes a previous artifact at `path`.
///
/// Returns `true` if a file was removed and `false` if none existed.
pub fn clear_artifact(path: &Path) -> ExportResult<bool> {
    if path.is_dir() {
        return Err(ExportError::ArtifactIsDirectory {
            path: path.to_path_buf(),
        });
    }

    match fs::remove_file(path) {
        Ok(()) => {
            debug!(path = %path.display(), "Removed previous artifact");
            Ok(true)
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(source) => Err(ExportError::ClearArtifact {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Writes `rows` to a new file at `path` and returns the row count.
pub fn write_artifact<R: ExportRow>(path: &Path, rows: &[R]) -> ExportResult<usize> {
    let open_error = |source| ExportError::OpenArtifact {
        path: path.to_path_buf(),
        source,
    };
    let write_error = |source: csv::Error| ExportError::WriteArtifact {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(open_error)?;
    }
    let file = File::create(path).map_err(open_error)?;

    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(file);

    writer.write_record(R::COLUMNS).map_err(write_error)?;
    for row in rows {
        writer.serialize(row).map_err(write_error)?;
    }
    writer.flush().map_err(|e| write_error(e.into()))?;

    debug!(path = %path.display(), rows = rows.len(), "Artifact written");
    Ok(rows.len())
}
