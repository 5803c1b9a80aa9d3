//! Registry of the tables produced by one melt run

use crate::melt::naming::create_table_name;
use crate::melt::types::{Row, TableData, TableNaming, TableSchema, TableSummary};
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::debug;

/// Mapping from table name to table data.
///
/// Tables are created on first sight and never removed. Iteration is in
/// ascending table name order so exports are reproducible.
#[derive(Debug, Default)]
pub struct TableRegistry {
    tables: BTreeMap<String, TableData>,
    /// (base name, object signature) -> resolved table name, shape naming only
    shapes: HashMap<(String, String), String>,
    /// Number of distinct shapes seen per base name, shape naming only
    shape_counts: HashMap<String, usize>,
    /// Every name handed out by shape naming
    claimed: HashSet<String>,
}

impl TableRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&TableData> {
        self.tables.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    /// Look up a table, creating it from `schema` if it doesn't exist yet.
    ///
    /// The schema closure only runs for new tables; an existing table keeps
    /// the columns it was created with.
    pub fn get_or_create<F>(&mut self, name: &str, schema: F) -> &mut TableData
    where
        F: FnOnce() -> TableSchema,
    {
        self.tables.entry(name.to_string()).or_insert_with(|| {
            let schema = schema();
            debug!(
                table = %schema.name,
                columns = schema.columns.len(),
                junction = schema.is_junction,
                "created table"
            );
            TableData::new(schema)
        })
    }

    /// Append a row to an existing table. Returns false if the table is unknown.
    pub fn append(&mut self, name: &str, row: Row) -> bool {
        match self.tables.get_mut(name) {
            Some(table) => {
                table.rows.push(row);
                true
            }
            None => false,
        }
    }

    /// Resolve the table for an object reached through `field_name`.
    pub fn resolve_object_table(
        &mut self,
        field_name: &str,
        signature: &str,
        naming: TableNaming,
    ) -> String {
        let base = create_table_name(field_name);
        match naming {
            TableNaming::FieldName => base,
            TableNaming::Shape => self.resolve_shape(base, signature),
        }
    }

    fn resolve_shape(&mut self, base: String, signature: &str) -> String {
        let key = (base.clone(), signature.to_string());
        if let Some(name) = self.shapes.get(&key) {
            return name.clone();
        }

        let mut count = self.shape_counts.get(&base).copied().unwrap_or(0) + 1;
        let mut name = if count == 1 {
            base.clone()
        } else {
            format!("{}_{}", base, count)
        };
        // Skip names already claimed by another field or shape
        while self.tables.contains_key(&name) || self.claimed.contains(&name) {
            count += 1;
            name = format!("{}_{}", base, count);
        }

        self.shape_counts.insert(base, count);
        self.shapes.insert(key, name.clone());
        self.claimed.insert(name.clone());
        name
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TableData> {
        self.tables.values()
    }

    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    /// Row and column counts for every table, in registry order
    pub fn summaries(&self) -> Vec<TableSummary> {
        self.iter().map(TableSummary::from).collect()
    }

    pub fn total_rows(&self) -> usize {
        self.iter().map(TableData::row_count).sum()
    }
}
