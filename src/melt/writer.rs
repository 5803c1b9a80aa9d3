use crate::error::ExportError;
use crate::melt::registry::TableRegistry;
use crate::melt::types::{TableData, TableSummary};
use rayon::prelude::*;
use std::borrow::Cow;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Process exit status when every table was written
pub const EXIT_SUCCESS: u8 = 0;
/// Process exit status for errors that stop the run before export
pub const EXIT_FATAL: u8 = 1;
/// Process exit status when at least one table could not be written
pub const EXIT_PARTIAL_EXPORT: u8 = 2;

const DELIMITER: char = ',';
const QUOTE: char = '"';

/// Options for writing tables to disk
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Extension appended to each table name
    pub extension: String,

    /// Write tables concurrently, one task per table
    pub parallel: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        ExportOptions {
            extension: String::from("csv"),
            parallel: false,
        }
    }
}

/// Outcome of an export: what was written and what failed
#[derive(Debug, Default)]
pub struct ExportReport {
    pub written: Vec<TableSummary>,
    pub failures: Vec<ExportError>,
}

impl ExportReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Exit status for a run that got as far as exporting
    pub fn exit_code(&self) -> u8 {
        if self.is_complete() {
            EXIT_SUCCESS
        } else {
            EXIT_PARTIAL_EXPORT
        }
    }
}

/// Quote a field if it contains a delimiter, a quote or a newline.
/// Embedded quotes are doubled; nothing else is escaped.
pub fn escape_field(value: &str) -> Cow<'_, str> {
    let needs_quoting = value.contains(DELIMITER) || value.contains(QUOTE) || value.contains('\n');
    if !needs_quoting {
        return Cow::Borrowed(value);
    }

    let mut escaped = String::with_capacity(value.len() + 2);
    escaped.push(QUOTE);
    for c in value.chars() {
        if c == QUOTE {
            escaped.push(QUOTE);
        }
        escaped.push(c);
    }
    escaped.push(QUOTE);
    Cow::Owned(escaped)
}

/// Write one table as CSV: a header of sorted column names, then one
/// record per row in insertion order.
pub fn write_table<W: Write>(table: &TableData, writer: &mut W) -> io::Result<()> {
    write_record(writer, table.schema.columns.iter().map(String::as_str))?;
    for row in &table.rows {
        write_record(writer, table.cells(row))?;
    }
    Ok(())
}

fn write_record<'a, W, I>(writer: &mut W, fields: I) -> io::Result<()>
where
    W: Write,
    I: Iterator<Item = &'a str>,
{
    for (i, field) in fields.enumerate() {
        if i > 0 {
            write!(writer, "{}", DELIMITER)?;
        }
        writer.write_all(escape_field(field).as_bytes())?;
    }
    writeln!(writer)
}

/// Writes every table of a registry into its own file in a directory
pub struct CsvExporter {
    output_dir: PathBuf,
    options: ExportOptions,
}

impl CsvExporter {
    /// Create an exporter, creating `output_dir` if it doesn't exist.
    /// Only the last path component is created.
    pub fn new<P: AsRef<Path>>(output_dir: P, options: ExportOptions) -> Result<Self, ExportError> {
        let output_dir = output_dir.as_ref().to_path_buf();
        prepare_output_dir(&output_dir)?;
        Ok(CsvExporter { output_dir, options })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// File path a table is written to
    pub fn table_path(&self, table: &str) -> PathBuf {
        self.output_dir
            .join(format!("{}.{}", table, self.options.extension))
    }

    /// Write every table. A table that can't be written is logged, recorded
    /// in the report and skipped; the others are still written.
    pub fn export(&self, registry: &TableRegistry) -> ExportReport {
        let tables: Vec<&TableData> = registry.iter().collect();

        let results: Vec<Result<TableSummary, ExportError>> = if self.options.parallel {
            tables.par_iter().map(|table| self.export_table(table)).collect()
        } else {
            tables.iter().map(|table| self.export_table(table)).collect()
        };

        let mut report = ExportReport::default();
        for result in results {
            match result {
                Ok(summary) => report.written.push(summary),
                Err(err) => {
                    warn!(error = ?err, "skipping table");
                    report.failures.push(err);
                }
            }
        }

        info!(
            written = report.written.len(),
            failed = report.failures.len(),
            dir = %self.output_dir.display(),
            "export finished"
        );
        report
    }

    fn export_table(&self, table: &TableData) -> Result<TableSummary, ExportError> {
        let path = self.table_path(table.name());
        let wrap = |source: io::Error| ExportError::Table {
            table: table.name().to_string(),
            path: path.clone(),
            source,
        };

        let file = File::create(&path).map_err(wrap)?;
        let mut writer = BufWriter::new(file);
        write_table(table, &mut writer).map_err(wrap)?;
        writer.flush().map_err(wrap)?;

        info!(table = table.name(), rows = table.row_count(), "wrote table");
        Ok(TableSummary::from(table))
    }
}

fn prepare_output_dir(dir: &Path) -> Result<(), ExportError> {
    let wrap = |source: io::Error| ExportError::OutputDir {
        path: dir.to_path_buf(),
        source,
    };

    match std::fs::create_dir(dir) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::AlreadyExists => {
            if dir.is_dir() {
                Ok(())
            } else {
                Err(wrap(io::Error::new(
                    io::ErrorKind::AlreadyExists,
                    "path exists and is not a directory",
                )))
            }
        }
        Err(err) => Err(wrap(err)),
    }
}
