//! json2relcsv: Normalize a JSON document into relational CSV tables
//!
//! Usage:
//!   # Read from stdin, write CSV files to the current directory
//!   json2relcsv < data.json
//!
//!   # Read from a file, write into ./tables and dump the parsed tree
//!   json2relcsv data.json --out-dir tables --print-ast
//!
//!   # One table per object shape instead of per field name
//!   json2relcsv data.json --naming shape
//!
//! Exit status is 0 on success, 1 on fatal errors (unreadable or malformed
//! input, unusable output directory) and 2 when some tables failed to write.
//! Set RUST_LOG (e.g. RUST_LOG=debug) for diagnostics on stderr.

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use json2relcsv::melt::{
    CsvExporter, ExportOptions, MeltConfig, NumberFormat, RelationalMelter, TableNaming,
    DEPTH_CEILING, EXIT_FATAL,
};
use json2relcsv::{read_document, render_tree};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "json2relcsv")]
#[command(about = "Normalize nested JSON into relational CSV tables", long_about = None)]
struct Args {
    /// Input file (use stdin if omitted)
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Directory for the CSV files (created if missing, one level only)
    #[arg(long, value_name = "DIR", default_value = ".")]
    out_dir: PathBuf,

    /// Print the parsed document tree before normalizing
    #[arg(long)]
    print_ast: bool,

    /// How object tables are identified
    #[arg(long, value_enum, default_value_t = NamingArg::Field)]
    naming: NamingArg,

    /// How numbers are rendered into cells
    #[arg(long, value_enum, default_value_t = NumberArg::Shortest)]
    number_format: NumberArg,

    /// Maximum nesting depth (default: 512)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..=DEPTH_CEILING as u64))]
    max_depth: Option<u64>,

    /// Write tables concurrently
    #[arg(long)]
    parallel: bool,

    /// Print the table summary as JSON instead of text
    #[arg(long)]
    summary_json: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum NamingArg {
    /// One table per field name
    Field,
    /// One table per field name and object shape
    Shape,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum NumberArg {
    /// Exact integers, shortest round-trip decimals
    Shortest,
    /// Six significant digits, like printf's %g
    General,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(Args::parse()) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {:?}", err);
            ExitCode::from(EXIT_FATAL)
        }
    }
}

fn run(args: Args) -> Result<ExitCode> {
    // Build config
    let mut config = MeltConfig {
        naming: match args.naming {
            NamingArg::Field => TableNaming::FieldName,
            NamingArg::Shape => TableNaming::Shape,
        },
        number_format: match args.number_format {
            NumberArg::Shortest => NumberFormat::Shortest,
            NumberArg::General => NumberFormat::General,
        },
        ..MeltConfig::default()
    };
    if let Some(depth) = args.max_depth {
        config.max_depth = depth as usize;
    }
    let options = ExportOptions {
        parallel: args.parallel,
        ..ExportOptions::default()
    };

    let reader = if let Some(path) = &args.input {
        let file = File::open(path)
            .with_context(|| format!("Failed to open {}", path.display()))?;
        Box::new(BufReader::new(file)) as Box<dyn Read>
    } else {
        Box::new(std::io::stdin()) as Box<dyn Read>
    };

    let document = read_document(reader, config.max_depth)?;

    if args.print_ast {
        println!("Abstract Syntax Tree:");
        println!("{}", render_tree(&document));
    }

    let melter = RelationalMelter::new(config);
    let tables = melter.melt(&document)?;

    let exporter = CsvExporter::new(&args.out_dir, options)?;
    let report = exporter.export(&tables);

    if args.summary_json {
        println!("{}", serde_json::to_string_pretty(&report.written)?);
    } else {
        println!("Created {} CSV files:", report.written.len());
        for summary in &report.written {
            println!(
                "  {}.csv: {} rows, {} columns",
                summary.table, summary.rows, summary.columns
            );
        }
    }

    let code = report.exit_code();
    for failure in report.failures {
        eprintln!("Error: {:#}", anyhow::Error::new(failure));
    }
    Ok(ExitCode::from(code))
}
