//! # json2relcsv - JSON to relational CSV
//!
//! Normalizes one nested JSON document into a set of relational tables and
//! writes each table to its own CSV file.
//!
//! ## Modules
//!
//! - **melt**: normalization engine, table registry, id allocation and CSV export
//! - **document**: input decoding and a debug dump of the document tree
//!
//! ## Quick Start
//!
//! ```rust
//! use json2relcsv::melt::{MeltConfig, RelationalMelter};
//! use serde_json::json;
//!
//! # fn main() -> anyhow::Result<()> {
//! let data = json!({
//!     "name": "Ann",
//!     "tags": ["x", "y"],
//!     "posts": [
//!         {"title": "First Post"},
//!         {"title": "Second Post"}
//!     ]
//! });
//!
//! let melter = RelationalMelter::new(MeltConfig::default());
//! let tables = melter.melt(&data)?;
//!
//! // root      (id, name)
//! // posts     (id, root_id, title)
//! // root_tags (id, index, parent_id, value)
//! assert_eq!(tables.len(), 3);
//! # Ok(())
//! # }
//! ```

use anyhow::{Context, Result};
use std::io::Read;
use std::path::Path;

pub mod document;
pub mod error;
pub mod melt;

// Re-export commonly used types for convenience
pub use document::{parse_document, parse_str, read_document, render_tree};
pub use error::{ExportError, MeltError};
pub use melt::{
    CsvExporter, ExportOptions, ExportReport, MeltConfig, RelationalMelter, TableRegistry,
    TableSummary,
};

/// Main entry point: read one JSON document and write its tables as CSV files
pub fn json_to_csv<R: Read, P: AsRef<Path>>(
    reader: R,
    output_dir: P,
    config: MeltConfig,
    options: ExportOptions,
) -> Result<(TableRegistry, ExportReport)> {
    let document =
        read_document(reader, config.max_depth).context("Failed to read JSON document")?;

    let melter = RelationalMelter::new(config);
    let tables = melter.melt(&document).context("Failed to normalize document")?;

    let exporter = CsvExporter::new(output_dir, options).context("Failed to prepare output")?;
    let report = exporter.export(&tables);

    Ok((tables, report))
}
