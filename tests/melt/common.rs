//! Helpers shared by the melt integration tests.

use json2relcsv::melt::{MeltConfig, RelationalMelter, TableData, TableRegistry};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

pub fn melt(input: &Value) -> TableRegistry {
    RelationalMelter::new(MeltConfig::default()).melt(input).unwrap()
}

/// Parse CSV text written by the exporter into records of fields.
pub fn parse_csv(text: &str) -> Vec<Vec<String>> {
    let mut records = Vec::new();
    let mut record = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            } else {
                field.push(c);
            }
            continue;
        }
        match c {
            '"' => in_quotes = true,
            ',' => record.push(std::mem::take(&mut field)),
            '\n' => {
                record.push(std::mem::take(&mut field));
                records.push(std::mem::take(&mut record));
            }
            _ => field.push(c),
        }
    }
    records
}

/// Read an exported table back as a header plus column -> value maps.
pub fn read_table(path: &Path) -> (Vec<String>, Vec<BTreeMap<String, String>>) {
    let text = std::fs::read_to_string(path).unwrap();
    let mut records = parse_csv(&text).into_iter();
    let header = records.next().unwrap_or_default();
    let rows = records
        .map(|record| header.iter().cloned().zip(record).collect())
        .collect();
    (header, rows)
}

/// A table's rows restricted to its schema columns, absent cells empty.
pub fn expected_rows(table: &TableData) -> Vec<BTreeMap<String, String>> {
    table
        .rows
        .iter()
        .map(|row| {
            table
                .schema
                .columns
                .iter()
                .cloned()
                .zip(table.cells(row).map(str::to_string))
                .collect()
        })
        .collect()
}
