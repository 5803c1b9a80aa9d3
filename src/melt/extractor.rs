use crate::error::MeltError;
use crate::melt::ids::IdAllocator;
use crate::melt::naming::{junction_table_name, object_signature, ROOT_TABLE};
use crate::melt::registry::TableRegistry;
use crate::melt::render::render_value;
use crate::melt::types::{MeltConfig, Row, TableNaming, TableSchema};
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// Reference to the row that owns a nested value (for foreign keys)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentRef {
    pub table: String,
    pub id: u64,
}

impl ParentRef {
    pub fn new(table: impl Into<String>, id: u64) -> Self {
        ParentRef {
            table: table.into(),
            id,
        }
    }

    /// Foreign key column added to child object rows
    pub fn fk_column(&self) -> String {
        format!("{}_id", self.table)
    }
}

/// Normalizes JSON documents into relational tables
pub struct RelationalMelter {
    config: MeltConfig,
}

impl RelationalMelter {
    pub fn new(config: MeltConfig) -> Self {
        RelationalMelter { config }
    }

    pub fn config(&self) -> &MeltConfig {
        &self.config
    }

    /// Melt a whole document into a fresh registry.
    ///
    /// A root object becomes the `root` table. For a root array only its
    /// object elements are melted, each as a `root` row at depth 0; other
    /// elements are skipped. Any other root yields an empty registry.
    pub fn melt(&self, root: &Value) -> Result<TableRegistry, MeltError> {
        let mut session = self.session();

        match root {
            Value::Object(_) => session.normalize(root, None, ROOT_TABLE)?,
            Value::Array(items) => {
                for (idx, item) in items.iter().enumerate() {
                    if item.is_object() {
                        session.normalize(item, None, ROOT_TABLE)?;
                    } else {
                        debug!(index = idx, "skipping non-object element in top-level array");
                    }
                }
            }
            _ => warn!("root is neither an object nor an array, nothing to normalize"),
        }

        debug!(
            tables = session.registry.len(),
            entity_ids = session.ids.entities_issued(),
            junction_ids = session.ids.junctions_issued(),
            "melt complete"
        );
        Ok(session.finish())
    }

    /// Start a session that accumulates tables across several `normalize` calls
    pub fn session(&self) -> MeltSession<'_> {
        MeltSession {
            config: &self.config,
            registry: TableRegistry::new(),
            ids: IdAllocator::new(),
        }
    }
}

/// Mutable state of one melt run: the registry and both id counters
pub struct MeltSession<'c> {
    config: &'c MeltConfig,
    registry: TableRegistry,
    ids: IdAllocator,
}

/// Pending work for the depth-first walk
enum Frame<'v> {
    Visit {
        value: &'v Value,
        parent: Option<ParentRef>,
        field_name: &'v str,
        depth: usize,
    },
    /// Append a finished object row once all of its children are done
    Emit { table: String, row: Row },
}

impl<'c> MeltSession<'c> {
    /// Normalize `value` as if reached through `field_name` under `parent`.
    ///
    /// Scalars are ignored; they only ever appear as cells of their
    /// enclosing object or scalar array.
    pub fn normalize(
        &mut self,
        value: &Value,
        parent: Option<ParentRef>,
        field_name: &str,
    ) -> Result<(), MeltError> {
        self.walk(value, parent, field_name, 0)
    }

    pub fn registry(&self) -> &TableRegistry {
        &self.registry
    }

    pub fn ids(&self) -> &IdAllocator {
        &self.ids
    }

    pub fn finish(self) -> TableRegistry {
        self.registry
    }

    /// Walk with an explicit stack so nesting depth can't overflow the call
    /// stack. Frames are pushed in reverse so siblings are visited in order
    /// and an object's row is appended after all of its descendants.
    fn walk<'v>(
        &mut self,
        value: &'v Value,
        parent: Option<ParentRef>,
        field_name: &'v str,
        depth: usize,
    ) -> Result<(), MeltError> {
        let mut stack = vec![Frame::Visit {
            value,
            parent,
            field_name,
            depth,
        }];

        while let Some(frame) = stack.pop() {
            match frame {
                Frame::Emit { table, row } => {
                    self.registry.append(&table, row);
                }
                Frame::Visit {
                    value,
                    parent,
                    field_name,
                    depth,
                } => {
                    if depth > self.config.max_depth {
                        return Err(MeltError::DepthLimitExceeded {
                            limit: self.config.max_depth,
                        });
                    }
                    match value {
                        Value::Object(obj) => {
                            self.visit_object(obj, parent, field_name, depth, &mut stack)
                        }
                        Value::Array(items) => {
                            self.visit_array(items, parent, field_name, depth, &mut stack)
                        }
                        _ => {}
                    }
                }
            }
        }

        Ok(())
    }

    fn visit_object<'v>(
        &mut self,
        obj: &'v Map<String, Value>,
        parent: Option<ParentRef>,
        field_name: &'v str,
        depth: usize,
        stack: &mut Vec<Frame<'v>>,
    ) {
        let signature = match self.config.naming {
            TableNaming::Shape => object_signature(obj),
            TableNaming::FieldName => String::new(),
        };
        let table = self
            .registry
            .resolve_object_table(field_name, &signature, self.config.naming);
        let this_id = self.ids.next_entity_id();

        let mut row = Row::new();
        row.insert("id".to_string(), this_id.to_string());
        if let Some(p) = &parent {
            row.insert(p.fk_column(), p.id.to_string());
        }

        self.registry.get_or_create(&table, || {
            let mut schema = TableSchema::new(table.as_str()).with_column("id");
            if let Some(p) = &parent {
                schema.columns.insert(p.fk_column());
                schema.has_parent_id = true;
            }
            for (key, value) in obj {
                if !is_container(value) {
                    schema.columns.insert(key.clone());
                }
            }
            schema
        });

        let mut children = Vec::new();
        for (key, value) in obj {
            if is_container(value) {
                children.push(Frame::Visit {
                    value,
                    parent: Some(ParentRef::new(table.as_str(), this_id)),
                    field_name: key.as_str(),
                    depth: depth + 1,
                });
            } else {
                row.insert(key.clone(), render_value(value, self.config));
            }
        }

        stack.push(Frame::Emit { table, row });
        stack.extend(children.into_iter().rev());
    }

    fn visit_array<'v>(
        &mut self,
        items: &'v [Value],
        parent: Option<ParentRef>,
        field_name: &'v str,
        depth: usize,
        stack: &mut Vec<Frame<'v>>,
    ) {
        if items.is_empty() {
            return;
        }

        if items.iter().all(Value::is_object) {
            // Elements share the owning object's child table
            for item in items.iter().rev() {
                stack.push(Frame::Visit {
                    value: item,
                    parent: parent.clone(),
                    field_name,
                    depth: depth + 1,
                });
            }
            return;
        }

        let parent_table = parent.as_ref().map(|p| p.table.as_str()).unwrap_or("");
        let parent_id = parent.as_ref().map(|p| p.id.to_string()).unwrap_or_default();
        let table = junction_table_name(parent_table, field_name);
        self.registry
            .get_or_create(&table, || TableSchema::junction(table.as_str()));

        for (index, item) in items.iter().enumerate() {
            let mut row = Row::new();
            row.insert("id".to_string(), self.ids.next_junction_id().to_string());
            row.insert("parent_id".to_string(), parent_id.clone());
            row.insert("index".to_string(), index.to_string());
            row.insert("value".to_string(), render_value(item, self.config));
            self.registry.append(&table, row);
        }
    }
}

fn is_container(value: &Value) -> bool {
    matches!(value, Value::Object(_) | Value::Array(_))
}
