//! pagefit CLI - apply print areas and page layout to XLSX files

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use pagefit::prelude::*;
use pagefit::{process_document, process_print_areas, uniform_specs};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Output file name used when `--output` is not given
const DEFAULT_OUTPUT_NAME: &str = "updated_file.xlsx";

#[derive(Parser)]
#[command(name = "pagefit")]
#[command(
    author,
    version,
    about = "Apply print areas, page setup and page breaks to spreadsheets"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply print-area specifications and write the updated spreadsheet
    Apply {
        /// Input spreadsheet file (xlsx)
        input: PathBuf,

        /// JSON file with a list of {"sheet_name", "print_area"} records
        #[arg(short, long, conflicts_with_all = ["rows", "cols"])]
        specs: Option<PathBuf>,

        /// Print A1:<cols><rows> on every sheet: number of rows
        #[arg(long, required_unless_present = "specs")]
        rows: Option<u32>,

        /// Print A1:<cols><rows> on every sheet: number of columns (default: 1)
        #[arg(long)]
        cols: Option<u32>,

        /// With --rows: also set page setup and row breaks, not just the print area
        #[arg(long, requires = "rows")]
        full_layout: bool,

        /// Output file (default: updated_file.xlsx next to the input)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// JSON file with layout options
        #[arg(long)]
        options: Option<PathBuf>,

        /// Page orientation: portrait or landscape
        #[arg(long)]
        orientation: Option<PageOrientation>,

        /// Paper size: a name (a4, letter, legal, a3, a5, tabloid) or a numeric code
        #[arg(long)]
        paper_size: Option<PaperSize>,
    },

    /// Show the page layout of every sheet
    Inspect {
        /// Input spreadsheet file
        input: PathBuf,
    },

    /// List all sheets in a workbook
    Sheets {
        /// Input spreadsheet file
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Apply {
            input,
            specs,
            rows,
            cols,
            full_layout,
            output,
            options,
            orientation,
            paper_size,
        } => {
            let mut layout = load_options(options.as_deref())?;
            if let Some(orientation) = orientation {
                layout.orientation = orientation;
            }
            if let Some(paper_size) = paper_size {
                layout.paper_size = paper_size;
            }

            // Specs are validated before the spreadsheet is opened
            let source = match (specs, rows) {
                (Some(path), _) => SpecSource::Specs(read_specs(&path)?),
                (None, Some(rows)) => SpecSource::Uniform {
                    rows,
                    cols: cols.unwrap_or(1),
                    full_layout,
                },
                (None, None) => bail!("Either --specs or --rows is required"),
            };

            let output = output.unwrap_or_else(|| default_output(&input));
            apply_specs(&input, source, &layout, &output)
        }
        Commands::Inspect { input } => inspect(&input),
        Commands::Sheets { input } => list_sheets(&input),
    }
}

enum SpecSource {
    Specs(Vec<PrintAreaSpec>),
    Uniform {
        rows: u32,
        cols: u32,
        full_layout: bool,
    },
}

fn read_specs(path: &Path) -> Result<Vec<PrintAreaSpec>> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read '{}'", path.display()))?;
    parse_specs(&json).with_context(|| format!("Invalid specifications in '{}'", path.display()))
}

fn load_options(path: Option<&Path>) -> Result<LayoutOptions> {
    let Some(path) = path else {
        return Ok(LayoutOptions::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read '{}'", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("Invalid layout options in '{}'", path.display()))
}

fn default_output(input: &Path) -> PathBuf {
    input
        .parent()
        .map(|dir| dir.join(DEFAULT_OUTPUT_NAME))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_NAME))
}

fn open(input: &Path) -> Result<XlsxDocument> {
    XlsxReader::read_file(input).with_context(|| format!("Failed to open '{}'", input.display()))
}

fn apply_specs(
    input: &Path,
    source: SpecSource,
    options: &LayoutOptions,
    output: &Path,
) -> Result<()> {
    let mut doc = open(input)?;
    let processed = match source {
        SpecSource::Specs(specs) => process_document(&mut doc, &specs, options),
        SpecSource::Uniform {
            rows,
            cols,
            full_layout,
        } => {
            let specs = uniform_specs(doc.workbook(), rows, cols);
            if full_layout {
                process_document(&mut doc, &specs, options)
            } else {
                process_print_areas(&mut doc, &specs)
            }
        }
    }
    .with_context(|| format!("Failed to update '{}'", input.display()))?;

    std::fs::write(output, &processed.bytes)
        .with_context(|| format!("Failed to write '{}'", output.display()))?;
    info!("Wrote '{}'", output.display());
    eprintln!(
        "Applied {} print area(s) to '{}' ({} warning(s))",
        processed.application.report.len(),
        output.display(),
        processed.application.warnings.len()
    );

    println!(
        "{}",
        serde_json::to_string_pretty(&processed.application.report)?
    );
    Ok(())
}

fn inspect(input: &Path) -> Result<()> {
    let doc = open(input)?;
    let workbook = doc.workbook();

    println!("File: {}", input.display());
    println!("Sheets: {}", workbook.sheet_count());

    for (i, sheet) in workbook.worksheets().enumerate() {
        let setup = sheet.page_setup();

        println!();
        println!("  Sheet {}: \"{}\"", i, sheet.name());
        println!("    Print area: {}", sheet.print_area().unwrap_or("(none)"));
        println!("    Orientation: {}", setup.orientation);
        println!("    Paper size: {}", setup.paper_size);
        if setup.fit_to_page {
            println!(
                "    Fit to page: {} wide x {} tall",
                pages(setup.fit_to_width),
                pages(setup.fit_to_height)
            );
        } else {
            println!("    Scale: {}%", setup.scale);
        }

        let breaks: Vec<String> = sheet.row_breaks().iter().map(|r| r.to_string()).collect();
        if breaks.is_empty() {
            println!("    Row breaks: none");
        } else {
            println!("    Row breaks after rows: {}", breaks.join(", "));
        }
    }

    Ok(())
}

fn pages(count: u32) -> String {
    if count == 0 {
        "unbounded".to_string()
    } else {
        count.to_string()
    }
}

fn list_sheets(input: &Path) -> Result<()> {
    let doc = open(input)?;

    for (i, name) in doc.workbook().sheet_names().enumerate() {
        println!("{}\t{}", i, name);
    }

    Ok(())
}
