//! JSON melting - normalize nested JSON into relational tables
//!
//! Objects become rows of a table named after the field they were reached
//! through, arrays of objects become sibling rows linked to their owner by a
//! `<parent>_id` column, and arrays of scalars become junction tables with
//! `parent_id`, `index` and `value` columns. The finished registry is written
//! out as one CSV file per table.

pub mod types;
pub mod ids;
pub mod naming;
pub mod render;
pub mod registry;
pub mod extractor;
pub mod writer;

pub use types::{DEPTH_CEILING, MeltConfig, NumberFormat, Row, TableData, TableNaming, TableSchema, TableSummary};
pub use ids::IdAllocator;
pub use naming::{create_table_name, object_signature};
pub use registry::TableRegistry;
pub use extractor::{MeltSession, ParentRef, RelationalMelter};
pub use writer::{
    escape_field, write_table, CsvExporter, ExportOptions, ExportReport, EXIT_FATAL,
    EXIT_PARTIAL_EXPORT, EXIT_SUCCESS,
};
