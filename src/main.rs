//! Sheetforge CLI - spreadsheet operations from the command line
//!
//! # Main Commands
//!
//! ```bash
//! sheetforge compare a.csv b.csv --first-key id --second-key id
//! sheetforge merge one.xlsx two.xlsx three.csv
//! sheetforge split data.xlsx --by Region --then Year
//! sheetforge dataset sales.csv && sheetforge pivot --index Region --values Amount
//! sheetforge convert report.xlsx --to csv
//! ```
//!
//! Operations that store a result (`compare`, `merge`, `dataset`) keep it
//! under `--scope` so a later `export-*` command can download it without
//! recomputing.

use clap::{Parser, Subcommand};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use sheetforge::error::ExportError;
use sheetforge::{Config, Engine, EngineError, EngineResult, ExportPayload, Upload};

#[derive(Parser)]
#[command(name = "sheetforge")]
#[command(about = "Compare, merge, split, pivot and convert tabular files", long_about = None)]
struct Cli {
    /// Caller scope for stored results
    #[arg(long, global = true, default_value = "cli")]
    scope: String,

    /// Directory for stored results
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Suppress progress output
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a file and print its rows as JSON
    Load {
        /// Input file (csv, xlsx, xls, html, xml)
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Compare two files on one key column each
    Compare {
        /// First file
        first: PathBuf,
        /// Second file
        second: PathBuf,

        /// Key column in the first file
        #[arg(long)]
        first_key: String,

        /// Key column in the second file (default: same as --first-key)
        #[arg(long)]
        second_key: Option<String>,
    },

    /// Export the stored comparison as a workbook
    ExportComparison {
        /// Output file (default: comparison_results.xlsx)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Merge two or more files on their common columns
    Merge {
        /// Input files
        files: Vec<PathBuf>,
    },

    /// Export the stored merge result as a workbook
    ExportMerged {
        /// Output file (default: merged_data.xlsx)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Split a file into one workbook per group, zipped
    Split {
        /// Input file
        input: PathBuf,

        /// Primary grouping column
        #[arg(long)]
        by: String,

        /// Optional secondary grouping column
        #[arg(long)]
        then: Option<String>,

        /// Output file (default: split_files.zip)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Load a dataset for the analysis commands
    Dataset {
        /// Input file
        input: PathBuf,
    },

    /// Pivot the stored dataset
    Pivot {
        /// Index column
        #[arg(long)]
        index: String,

        /// Optional pivot column
        #[arg(long)]
        pivot: Option<String>,

        /// Values column
        #[arg(long)]
        values: String,

        /// Aggregation function: sum, mean, count, min, max
        #[arg(long)]
        agg: Option<String>,

        /// Write the pivot as a workbook instead of printing JSON
        #[arg(short, long)]
        export: Option<PathBuf>,
    },

    /// Find duplicate rows in the stored dataset by column
    Duplicates {
        /// Column to check
        #[arg(long)]
        column: String,

        /// Write the duplicates as a workbook instead of printing JSON
        #[arg(short, long)]
        export: Option<PathBuf>,
    },

    /// Look up rows in the stored dataset by exact value
    Lookup {
        /// Column to match against
        #[arg(long)]
        column: String,

        /// Value to find
        #[arg(long)]
        value: String,

        /// Column to return values from (default: whole rows)
        #[arg(long)]
        return_col: Option<String>,
    },

    /// Search all columns of the stored dataset
    Search {
        /// Text to search for (case-insensitive)
        needle: String,

        /// Write the matches as a workbook instead of printing JSON
        #[arg(short, long)]
        export: Option<PathBuf>,
    },

    /// Filter the stored dataset on one column
    Filter {
        /// Column to filter
        #[arg(long)]
        column: String,

        /// Value to match
        #[arg(long)]
        value: String,

        /// Substring match instead of exact equality
        #[arg(long)]
        contains: bool,

        /// Write the matches as a workbook instead of printing JSON
        #[arg(short, long)]
        export: Option<PathBuf>,
    },

    /// Convert a file to csv or xlsx
    Convert {
        /// Input file
        input: PathBuf,

        /// Target format: csv or xlsx
        #[arg(long)]
        to: String,

        /// Output file (default: converted_file.<ext>)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    sheetforge::logs::LOG_SINK.set_quiet(cli.quiet);

    let mut config = Config::from_env();
    if let Some(dir) = cli.data_dir.clone() {
        config.data_dir = dir;
    }
    let engine = Engine::new(config);
    let scope = cli.scope.clone();

    if let Err(e) = run(&engine, &scope, cli.command) {
        let report = e.report();
        eprintln!("❌ Error [{}]: {}", report.kind, report.message);
        std::process::exit(1);
    }
}

fn run(engine: &Engine, scope: &str, command: Commands) -> EngineResult<()> {
    match command {
        Commands::Load { input, output } => {
            let table = sheetforge::load_path(&input)?;
            eprintln!("✅ Parsed {} rows, {} columns", table.len(), table.width());
            print_json(&table.to_json_rows(), output.as_deref())
        }

        Commands::Compare {
            first,
            second,
            first_key,
            second_key,
        } => {
            let second_key = second_key.unwrap_or_else(|| first_key.clone());
            let summary = engine.compare(
                scope,
                &Upload::from_path(&first)?,
                &first_key,
                &Upload::from_path(&second)?,
                &second_key,
            )?;
            print_json(&summary, None)
        }

        Commands::ExportComparison { output } => {
            let payload = engine.export_comparison(scope)?;
            write_payload(payload, output.as_deref())
        }

        Commands::Merge { files } => {
            let mut uploads = Vec::with_capacity(files.len());
            for file in &files {
                uploads.push(Upload::from_path(file)?);
            }
            let summary = engine.merge(scope, &uploads)?;
            print_json(&summary, None)
        }

        Commands::ExportMerged { output } => {
            let payload = engine.export_merged(scope)?;
            write_payload(payload, output.as_deref())
        }

        Commands::Split {
            input,
            by,
            then,
            output,
        } => {
            let payload = engine.split(&Upload::from_path(&input)?, &by, then.as_deref())?;
            write_payload(payload, output.as_deref())
        }

        Commands::Dataset { input } => {
            let summary = engine.upload_dataset(scope, &Upload::from_path(&input)?)?;
            print_json(&summary, None)
        }

        Commands::Pivot {
            index,
            pivot,
            values,
            agg,
            export,
        } => match export {
            Some(path) => {
                let payload =
                    engine.export_pivot(scope, &index, pivot.as_deref(), &values, agg.as_deref())?;
                write_payload(payload, Some(&path))
            }
            None => {
                let summary =
                    engine.pivot(scope, &index, pivot.as_deref(), &values, agg.as_deref())?;
                print_json(&summary, None)
            }
        },

        Commands::Duplicates { column, export } => match export {
            Some(path) => {
                let payload = engine.export_duplicates(scope, &column)?;
                write_payload(payload, Some(&path))
            }
            None => {
                let summary = engine.find_duplicates(scope, &column)?;
                print_json(&summary, None)
            }
        },

        Commands::Lookup {
            column,
            value,
            return_col,
        } => {
            let summary = engine.lookup(scope, &column, &value, return_col.as_deref())?;
            print_json(&summary, None)
        }

        Commands::Search { needle, export } => match export {
            Some(path) => {
                let payload = engine.export_search(scope, &needle)?;
                write_payload(payload, Some(&path))
            }
            None => {
                let summary = engine.search(scope, &needle)?;
                print_json(&summary, None)
            }
        },

        Commands::Filter {
            column,
            value,
            contains,
            export,
        } => match export {
            Some(path) => {
                let payload = engine.export_filtered(scope, &column, &value, !contains)?;
                write_payload(payload, Some(&path))
            }
            None => {
                let summary = engine.filter(scope, &column, &value, !contains)?;
                print_json(&summary, None)
            }
        },

        Commands::Convert { input, to, output } => {
            let payload = engine.convert(&Upload::from_path(&input)?, &to)?;
            write_payload(payload, output.as_deref())
        }
    }
}

fn print_json<T: Serialize>(value: &T, output: Option<&Path>) -> EngineResult<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| EngineError::Store(e.into()))?;
    match output {
        Some(path) => {
            fs::write(path, &json).map_err(|e| EngineError::Export(ExportError::Io(e)))?;
            eprintln!("💾 Output written to: {}", path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

fn write_payload(payload: ExportPayload, output: Option<&Path>) -> EngineResult<()> {
    let path = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(&payload.filename));
    fs::write(&path, &payload.bytes).map_err(|e| EngineError::Export(ExportError::Io(e)))?;
    eprintln!(
        "💾 {} written to: {} ({} bytes)",
        payload.content_type,
        path.display(),
        payload.bytes.len()
    );
    Ok(())
}
