//! Stream records into a CSV file.
use std::{
    fs,
    path::{Path, PathBuf},
};

use tempfile::NamedTempFile;
use tracing::warn;

use super::{report_file_name, ReportRow};
use crate::{
    config::ReportTimezone,
    lib::{
        errors::{ApiError, CliError},
        telemetry::ReportSpan,
    },
};

/// Location and size of a finished report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSummary {
    pub path: PathBuf,
    pub rows: usize,
}

/// Write `records` to `<dir>/<kind>-<key>-report.csv`, one row per item as it arrives.
///
/// Rows go to a staged file in `dir` that replaces the report only once the
/// stream is exhausted. `on_row` sees each record after it was written. If the
/// stream yields an error the staged file is discarded, any earlier report of
/// the same name is left as it was, and the error is returned.
pub fn write_report<T, I>(
    dir: &Path,
    key: &str,
    records: I,
    timezone: &ReportTimezone,
    mut on_row: impl FnMut(&T),
) -> Result<ReportSummary, CliError>
where
    T: ReportRow,
    I: IntoIterator<Item = Result<T, ApiError>>,
{
    let kind = T::KIND;
    let path = dir.join(report_file_name(kind, key));
    let span = ReportSpan::start(kind.tag(), key);
    let staging_dir = if dir.as_os_str().is_empty() {
        Path::new(".")
    } else {
        dir
    };

    fs::create_dir_all(staging_dir).map_err(|err| CliError::report(path.clone(), err))?;
    let staged = NamedTempFile::new_in(staging_dir).map_err(|err| CliError::report(path.clone(), err))?;

    match write_rows(&path, staged, records, timezone, &mut on_row) {
        Ok((staged, rows)) => {
            staged
                .persist(&path)
                .map_err(|err| CliError::report(path.clone(), err.error))?;
            span.finish("written", rows);
            Ok(ReportSummary { path, rows })
        }
        Err(err) => {
            warn!(
                target: "flex_support_cli::report",
                path = %path.display(),
                reason = %err,
                "Discarded partial report"
            );
            span.finish("failed", 0);
            Err(err)
        }
    }
}

fn write_rows<T, I>(
    path: &Path,
    staged: NamedTempFile,
    records: I,
    timezone: &ReportTimezone,
    on_row: &mut impl FnMut(&T),
) -> Result<(NamedTempFile, usize), CliError>
where
    T: ReportRow,
    I: IntoIterator<Item = Result<T, ApiError>>,
{
    let report_error = |err: csv::Error| CliError::report(path.to_path_buf(), err);
    let mut writer = csv::Writer::from_writer(staged);
    writer.write_record(T::KIND.header()).map_err(report_error)?;

    let mut rows = 0;
    for record in records {
        let record = record?;
        writer
            .write_record(record.cells(timezone))
            .map_err(report_error)?;
        rows += 1;
        on_row(&record);
    }

    let staged = writer
        .into_inner()
        .map_err(|err| CliError::report(path.to_path_buf(), err.error()))?;
    Ok((staged, rows))
}
