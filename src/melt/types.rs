use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// One output row: column name to rendered value
pub type Row = BTreeMap<String, String>;

/// How object-derived tables are identified
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableNaming {
    /// The table name depends only on the field name. Later objects with
    /// extra keys lose those columns.
    #[default]
    FieldName,
    /// Objects reached through the same field but with different key sets
    /// get separate tables (`posts`, `posts_2`, ...).
    Shape,
}

/// How JSON numbers are rendered into cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumberFormat {
    /// Integers exactly, floats as the shortest round-trippable decimal
    #[default]
    Shortest,
    /// `%g` with 6 significant digits, e.g. `3.14159`, `1e+06`
    General,
}

/// Largest nesting depth the decoder will accept. Decoding, dumping and
/// dropping a document recurse once per level.
pub const DEPTH_CEILING: usize = 4096;

/// Configuration for the melting process
#[derive(Debug, Clone)]
pub struct MeltConfig {
    /// Strategy for mapping objects onto tables
    pub naming: TableNaming,

    /// Rendering of numeric cells
    pub number_format: NumberFormat,

    /// Maximum nesting depth before the walk is aborted, at most [`DEPTH_CEILING`]
    pub max_depth: usize,

    /// Cell text used for objects and arrays inside scalar arrays
    pub complex_placeholder: String,
}

impl Default for MeltConfig {
    fn default() -> Self {
        MeltConfig {
            naming: TableNaming::default(),
            number_format: NumberFormat::default(),
            max_depth: 512,
            complex_placeholder: String::from("<complex>"),
        }
    }
}

/// Identity of one output table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    pub name: String,

    /// Fixed at creation, never enlarged. Iterates in byte order, which is
    /// also the export column order.
    pub columns: BTreeSet<String>,

    /// Whether a foreign key column to a parent table exists
    pub has_parent_id: bool,

    /// Whether rows hold scalar array elements
    pub is_junction: bool,
}

impl TableSchema {
    pub fn new(name: impl Into<String>) -> Self {
        TableSchema {
            name: name.into(),
            columns: BTreeSet::new(),
            has_parent_id: false,
            is_junction: false,
        }
    }

    /// Schema shared by every junction table
    pub fn junction(name: impl Into<String>) -> Self {
        let mut schema = TableSchema::new(name);
        for column in ["id", "parent_id", "index", "value"] {
            schema.columns.insert(column.to_string());
        }
        schema.has_parent_id = true;
        schema.is_junction = true;
        schema
    }

    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.columns.insert(column.into());
        self
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }
}

/// A schema with its rows in insertion order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableData {
    pub schema: TableSchema,
    pub rows: Vec<Row>,
}

impl TableData {
    pub fn new(schema: TableSchema) -> Self {
        TableData {
            schema,
            rows: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.schema.name
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Cells of a row in schema order; absent columns are empty
    pub fn cells<'a>(&'a self, row: &'a Row) -> impl Iterator<Item = &'a str> + 'a {
        self.schema
            .columns
            .iter()
            .map(move |column| row.get(column).map(String::as_str).unwrap_or(""))
    }
}

/// Per-table summary reported after a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSummary {
    pub table: String,
    pub rows: usize,
    pub columns: usize,
}

impl From<&TableData> for TableSummary {
    fn from(table: &TableData) -> Self {
        TableSummary {
            table: table.name().to_string(),
            rows: table.row_count(),
            columns: table.schema.column_count(),
        }
    }
}
