mod config;
mod dates;
mod error;
mod invoice;
mod pdf;
mod render;

use chrono::Utc;
use clap::{CommandFactory, Parser};
use std::path::{Path, PathBuf};

use crate::config::load_settings;
use crate::error::{InvoiceError, Result};
use crate::invoice::Invoice;
use crate::pdf::{ChromeExporter, PdfExporter};
use crate::render::{load_template, render_invoice, TEMPLATE_PATH};

#[derive(Parser)]
#[command(name = "invoice-gen")]
#[command(version, about = "Monthly freelance invoice PDF generator", long_about = None)]
struct Cli {
    /// Number of days worked in the invoice period
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    days: i64,

    /// Purchase Order reference number
    #[arg(long, default_value = "")]
    po: String,

    /// Output directory for invoice files
    #[arg(long, default_value = ".")]
    outdir: PathBuf,

    /// Path to config file (default: config.yaml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override invoice date (DD-MM-YY format)
    #[arg(long)]
    date: Option<String>,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Required inputs are checked before any config or filesystem work.
    if cli.days == 0 || cli.po.is_empty() {
        println!("{}", Cli::command().render_help());
        std::process::exit(1);
    }
    if cli.days < 0 {
        return Err(InvoiceError::NegativeDays(cli.days));
    }

    let settings = load_settings(cli.config.as_deref())?;

    let date = match cli.date.as_deref() {
        Some(override_str) => {
            let date = dates::parse_override_date(override_str)?;
            println!("Using override date: {}", date.format("%B %Y"));
            date
        }
        None => {
            let now = Utc::now();
            let date = dates::automatic_invoice_date(now);
            if dates::is_last_week_of_month(now) {
                println!("Using end of current month ({}) for invoice", date.format("%B %Y"));
            } else {
                println!("Using end of previous month ({}) for invoice", date.format("%B %Y"));
            }
            date
        }
    };

    let invoice = Invoice::assemble(&settings, cli.days, &cli.po, date);

    ensure_output_dir(&cli.outdir)?;
    let output_path = output_path(&cli.outdir, &invoice);

    let template = load_template(Path::new(TEMPLATE_PATH))?;
    let html = render_invoice(&template, &invoice)?;

    let exporter = ChromeExporter::new();
    exporter.export(&html, &output_path)?;

    println!("Invoice PDF generated successfully: {}", output_path.display());
    Ok(())
}

/// Create the output directory when it is anything other than the current
/// directory.
fn ensure_output_dir(dir: &Path) -> Result<()> {
    if dir == Path::new(".") {
        return Ok(());
    }
    std::fs::create_dir_all(dir).map_err(|e| InvoiceError::OutputDir {
        path: dir.to_path_buf(),
        source: e,
    })
}

/// A bare filename when writing to the current directory, otherwise joined
/// under the output directory.
fn output_path(outdir: &Path, invoice: &Invoice) -> PathBuf {
    let file_name = invoice.file_name();
    if outdir == Path::new(".") {
        PathBuf::from(file_name)
    } else {
        outdir.join(file_name)
    }
}
