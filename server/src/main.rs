//! csv2json CLI - Convert CSV files to JSON
//!
//! # Commands
//!
//! ```bash
//! csv2json convert input.csv        # Convert a CSV file to JSON
//! csv2json detect input.csv         # Show detected encoding and delimiter
//! csv2json serve                    # Start the HTTP form server (port 3000)
//! ```

use clap::{Parser, Subcommand};
use csv2json::{convert_file, ConversionOptions, DelimiterChoice};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "csv2json")]
#[command(about = "Convert CSV files or pasted CSV text to structured JSON", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a CSV file and output JSON
    Convert {
        /// Input CSV file
        input: PathBuf,

        /// Field delimiter (auto-detected if not specified)
        #[arg(short, long, value_enum, default_value_t = DelimiterChoice::Auto)]
        delimiter: DelimiterChoice,

        /// Treat the first row as data instead of column names
        #[arg(long)]
        no_headers: bool,

        /// Keep every cell as a raw string (no null/bool/number casting)
        #[arg(long)]
        no_cast: bool,

        /// Keep rows consisting of a single empty field
        #[arg(long)]
        keep_empty: bool,

        /// Pretty-print the JSON output
        #[arg(short, long)]
        pretty: bool,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show the detected encoding and delimiter of a CSV file
    Detect {
        /// Input CSV file
        input: PathBuf,
    },

    /// Start the HTTP form server
    Serve {
        /// Port to listen on (default: $CSV2JSON_PORT or 3000)
        #[arg(short, long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Convert {
            input,
            delimiter,
            no_headers,
            no_cast,
            keep_empty,
            pretty,
            output,
        } => cmd_convert(
            &input,
            delimiter,
            no_headers,
            no_cast,
            keep_empty,
            pretty,
            output.as_deref(),
        ),

        Commands::Detect { input } => cmd_detect(&input),

        Commands::Serve { port } => cmd_serve(port).await,
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn cmd_convert(
    input: &Path,
    delimiter: DelimiterChoice,
    no_headers: bool,
    no_cast: bool,
    keep_empty: bool,
    pretty: bool,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📄 Converting: {}", input.display());

    let options = ConversionOptions {
        delimiter: delimiter.resolve(),
        headers: !no_headers,
        cast: !no_cast,
        skip_empty: !keep_empty,
        pretty,
        ..Default::default()
    };

    let result = convert_file(input, &options)?;

    eprintln!("   Encoding: {}", result.encoding);
    eprintln!(
        "   Delimiter: '{}'{}",
        format_delimiter(result.delimiter),
        if options.delimiter.is_none() {
            " (auto-detected)"
        } else {
            ""
        }
    );
    eprintln!("   Columns: {}", result.headers.join(", "));
    eprintln!("✅ Converted {} records", result.record_count);

    write_output(&result.json, output)?;

    Ok(())
}

fn cmd_detect(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let bytes = fs::read(input)?;
    let encoding = csv2json::detect_encoding(&bytes);
    let content = csv2json::decode_content(&bytes, &encoding);
    let delimiter = csv2json::detect_delimiter(&content);

    println!("Encoding:  {}", encoding);
    println!("Delimiter: '{}'", format_delimiter(delimiter));

    Ok(())
}

async fn cmd_serve(port: Option<u16>) -> Result<(), Box<dyn std::error::Error>> {
    let port = port
        .or_else(|| {
            std::env::var("CSV2JSON_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
        })
        .unwrap_or(3000);

    csv2json::server::start_server(port).await
}

fn format_delimiter(d: char) -> String {
    match d {
        '\t' => "\\t".to_string(),
        c => c.to_string(),
    }
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
