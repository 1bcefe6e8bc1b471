//! Salescheck CLI - validate sales invoice sheets
//!
//! # Commands
//!
//! ```bash
//! salescheck validate penjualan.csv         # Report as JSON
//! salescheck export penjualan.csv -o out.csv # Valid rows with warning labels
//! salescheck context penjualan.csv -q "..."  # Prompt for a question about the data
//! salescheck serve                           # Start HTTP server (port 3000)
//! ```
//!
//! # Debug Commands
//!
//! ```bash
//! salescheck parse penjualan.csv            # Just tokenize to a JSON grid
//! ```

use clap::{Parser, Subcommand};
use salescheck::{
    build_prompt, check_file, context_sample, decode_bytes, parse_csv,
    CheckOptions,
};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "salescheck")]
#[command(about = "Validate sales invoice CSV sheets", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Tokenize a CSV file and output the raw grid as JSON
    Parse {
        /// Input CSV file
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate a CSV file and output the report as JSON
    Validate {
        /// Input CSV file
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Input encoding (auto-detect if not specified)
        #[arg(short, long)]
        encoding: Option<String>,

        /// Exit with status 1 when any diagnostic is reported
        #[arg(long)]
        strict: bool,
    },

    /// Export the valid rows as CSV with a warning column
    Export {
        /// Input CSV file
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Input encoding (auto-detect if not specified)
        #[arg(short, long)]
        encoding: Option<String>,
    },

    /// Print the data context (or full prompt) for question answering
    Context {
        /// Input CSV file
        input: PathBuf,

        /// Question to embed; without it only the context sample is printed
        #[arg(short, long)]
        question: Option<String>,

        /// Records in the sample (default: from environment or 50)
        #[arg(long)]
        sample_size: Option<usize>,
    },

    /// Start HTTP server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,
    },
}

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Parse { input, output } => cmd_parse(&input, output.as_deref()),

        Commands::Validate {
            input,
            output,
            encoding,
            strict,
        } => cmd_validate(&input, output.as_deref(), encoding.as_deref(), strict),

        Commands::Export {
            input,
            output,
            encoding,
        } => cmd_export(&input, output.as_deref(), encoding.as_deref()),

        Commands::Context {
            input,
            question,
            sample_size,
        } => cmd_context(&input, question.as_deref(), sample_size),

        Commands::Serve { port } => cmd_serve(port).await,
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn cmd_parse(input: &Path, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📄 Parsing CSV: {}", input.display());

    let bytes = fs::read(input)?;
    let decoded = decode_bytes(&bytes)?;
    let grid = parse_csv(&decoded.text);

    eprintln!("   Encoding: {}", decoded.encoding);
    if let Some(header) = grid.first() {
        eprintln!("   Columns: {}", header.join(", "));
    }
    eprintln!("✅ Parsed {} lines", grid.len());

    let json = serde_json::to_string_pretty(&grid)?;
    write_output(&json, output)?;

    Ok(())
}

fn cmd_validate(
    input: &Path,
    output: Option<&Path>,
    encoding: Option<&str>,
    strict: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let options = CheckOptions::from_env()?;
    let result = check_file(input, encoding, &options)?;

    let summary = result.summary();
    eprintln!(
        "\n📊 Results: {} records, {} warnings ({} flagged, {} significant)",
        summary.records, summary.warnings, summary.flagged_records, summary.significant_records
    );

    let json = serde_json::to_string_pretty(&result)?;
    write_output(&json, output)?;

    if strict && !result.report.is_clean() {
        std::process::exit(1);
    }

    Ok(())
}

fn cmd_export(
    input: &Path,
    output: Option<&Path>,
    encoding: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let options = CheckOptions::from_env()?;
    let result = check_file(input, encoding, &options)?;

    let csv = result.to_csv(&options)?;
    match output {
        Some(p) => {
            fs::write(p, &csv)?;
            eprintln!("💾 Output written to: {}", p.display());
        }
        None => println!("{}", csv),
    }

    Ok(())
}

fn cmd_context(
    input: &Path,
    question: Option<&str>,
    sample_size: Option<usize>,
) -> Result<(), Box<dyn std::error::Error>> {
    let options = CheckOptions::from_env()?;
    let sample_size = sample_size.unwrap_or(options.sample_size);
    let result = check_file(input, None, &options)?;
    let invoices = &result.report.invoices;

    let text = match question {
        Some(q) => build_prompt(invoices, q, sample_size)
            .ok_or("No valid rows to build a question context from")?,
        None => context_sample(invoices, sample_size),
    };
    println!("{}", text);

    Ok(())
}

async fn cmd_serve(port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let options = CheckOptions::from_env()?;
    salescheck::server::start_server(port, options).await?;
    Ok(())
}

fn write_output(content: &str, path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            eprintln!("💾 Output written to: {}", p.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
