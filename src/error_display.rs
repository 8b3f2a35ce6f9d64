//! User-facing error message formatting.
//!
//! Matches on typed errors (IngestError, PolarsError variants, io::ErrorKind)
//! to produce one-line messages for the status bar and upload prompt.

use polars::prelude::PolarsError;
use std::io;
use std::path::Path;

use crate::ingest::IngestError;

/// Format a PolarsError raised by the CSV reader.
pub fn user_message_from_polars(err: &PolarsError) -> String {
    use polars::prelude::PolarsError as PE;

    match err {
        PE::ColumnNotFound(msg) => format!("Column not found: {}", msg),
        PE::Duplicate(msg) => format!("Duplicate column name: {}", msg),
        PE::IO { error, msg } => {
            user_message_from_io(error.as_ref(), msg.as_ref().map(|m| m.as_ref()))
        }
        PE::NoData(msg) => format!("No data: {}", msg),
        PE::SchemaMismatch(msg) => format!("Schema mismatch: {}", msg),
        PE::ShapeMismatch(msg) => format!("Row shape mismatch: {}", msg),
        PE::OutOfBounds(msg) => format!("Row out of bounds: {}", msg),
        PE::ComputeError(msg) => simplify_compute_message(msg),
        PE::Context { error, msg } => {
            let inner = user_message_from_polars(error);
            format!("{}: {}", msg, inner)
        }
        #[allow(unreachable_patterns)]
        _ => err.to_string(),
    }
}

/// Format an io::Error by its ErrorKind.
pub fn user_message_from_io(err: &io::Error, context: Option<&str>) -> String {
    use std::io::ErrorKind;

    let base: String = match err.kind() {
        ErrorKind::NotFound => "File or directory not found.".to_string(),
        ErrorKind::PermissionDenied => "Permission denied. Check read access.".to_string(),
        ErrorKind::InvalidData | ErrorKind::InvalidInput => {
            "Invalid or corrupted data.".to_string()
        }
        ErrorKind::UnexpectedEof => "Unexpected end of file.".to_string(),
        ErrorKind::Interrupted => "Operation interrupted.".to_string(),
        ErrorKind::OutOfMemory => "Out of memory.".to_string(),
        ErrorKind::Other => {
            let msg = err.to_string();
            if msg.contains("No space left") {
                return "No space left on device. Free up disk space and try again.".to_string();
            }
            if msg.contains("Is a directory") {
                return "Path is a directory, not a file.".to_string();
            }
            return if context.is_some() {
                format!("I/O error: {}", msg)
            } else {
                msg
            };
        }
        _ => err.to_string(),
    };

    match context {
        Some(ctx) if !ctx.is_empty() => format!("{} {}", base, ctx),
        _ => base,
    }
}

/// Format a color_eyre Report by walking its cause chain for known error
/// types. Ingestion errors keep their own wording.
pub fn user_message_from_report(report: &color_eyre::eyre::Report, path: Option<&Path>) -> String {
    let with_path = |msg: String| match path {
        Some(p) => format!("Failed to load {}: {}", p.display(), msg),
        None => msg,
    };

    for cause in report.chain() {
        if let Some(ie) = cause.downcast_ref::<IngestError>() {
            return ie.to_string();
        }
        if let Some(pe) = cause.downcast_ref::<PolarsError>() {
            return with_path(user_message_from_polars(pe));
        }
        if let Some(io_err) = cause.downcast_ref::<io::Error>() {
            return with_path(user_message_from_io(io_err, None));
        }
    }

    // First line only; reports can carry long backtraces
    let display = report.to_string();
    let first_line = display.lines().next().unwrap_or("An error occurred");
    with_path(first_line.trim().to_string())
}

/// Strip reader-internal hints from ComputeError text.
fn simplify_compute_message(msg: &str) -> String {
    let first = msg.lines().next().unwrap_or(msg).trim();
    let cleaned = match first.find("You might want to try") {
        Some(pos) => first[..pos].trim_end(),
        None => first,
    };
    cleaned.trim_end_matches(['.', ',', ';']).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use color_eyre::eyre::eyre;

    #[test]
    fn test_user_message_from_io_not_found() {
        let err = io::Error::new(io::ErrorKind::NotFound, "No such file");
        let msg = user_message_from_io(&err, None);
        assert!(msg.contains("not found"), "expected 'not found', got: {}", msg);
    }

    #[test]
    fn test_user_message_from_io_permission_denied() {
        let err = io::Error::new(io::ErrorKind::PermissionDenied, "Permission denied");
        let msg = user_message_from_io(&err, None);
        assert!(msg.to_lowercase().contains("permission"), "got: {}", msg);
    }

    #[test]
    fn test_user_message_from_polars_duplicate() {
        let err = PolarsError::Duplicate("bar".into());
        let msg = user_message_from_polars(&err);
        assert!(msg.contains("Duplicate"), "got: {}", msg);
        assert!(msg.contains("bar"), "got: {}", msg);
    }

    #[test]
    fn test_simplify_compute_message_strips_hints() {
        let raw = "found more fields than defined in 'Schema'\n\nConsider setting 'truncate_ragged_lines=true'.";
        assert_eq!(
            simplify_compute_message(raw),
            "found more fields than defined in 'Schema'"
        );
        let hinted = "could not parse `x`. You might want to try increasing infer_schema_length";
        assert_eq!(simplify_compute_message(hinted), "could not parse `x`");
    }

    #[test]
    fn test_report_with_ingest_error_keeps_wording() {
        let report = color_eyre::eyre::Report::new(IngestError::EmptyData);
        assert_eq!(
            user_message_from_report(&report, Some(Path::new("x.csv"))),
            "The CSV file appears to be empty."
        );
    }

    #[test]
    fn test_report_fallback_uses_first_line() {
        let report = eyre!("first line\nsecond line");
        assert_eq!(user_message_from_report(&report, None), "first line");
        let with_path = user_message_from_report(&report, Some(Path::new("a.csv")));
        assert_eq!(with_path, "Failed to load a.csv: first line");
    }
}
