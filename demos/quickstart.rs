/// Quickstart example - melt a document and write its tables
use json2relcsv::melt::{CsvExporter, ExportOptions, MeltConfig, RelationalMelter};
use serde_json::json;

fn main() -> anyhow::Result<()> {
    println!("=== json2relcsv Quick Start ===\n");

    // Step 1: Your JSON data
    let my_data = json!({
        "username": "alice",
        "email": "alice@example.com",
        "posts": [
            {
                "title": "My First Post",
                "content": "Hello, world!",
                "tags": ["intro", "welcome"]
            },
            {
                "title": "Second Post",
                "content": "More content here",
                "tags": ["update", "news"]
            }
        ]
    });

    println!("Original JSON:");
    println!("{}\n", serde_json::to_string_pretty(&my_data)?);

    // Step 2: Melt the JSON into tables
    let melter = RelationalMelter::new(MeltConfig::default());
    let tables = melter.melt(&my_data)?;

    // Step 3: Look at what we got
    for table in tables.iter() {
        println!("Table {} ({} rows)", table.name(), table.row_count());
        for row in &table.rows {
            println!("  {:?}", row);
        }
        println!();
    }

    // Step 4: Write to files
    let output_dir = std::env::temp_dir().join("json2relcsv-quickstart");
    let exporter = CsvExporter::new(&output_dir, ExportOptions::default())?;
    let report = exporter.export(&tables);

    println!("✓ Done! Created files in {}:", output_dir.display());
    for summary in &report.written {
        println!("  • {}.csv - {} rows, {} columns", summary.table, summary.rows, summary.columns);
    }

    Ok(())
}
