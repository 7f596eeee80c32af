use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InvoiceError {
    #[error("Config file not found: {0}")]
    ConfigFileNotFound(PathBuf),

    #[error("Failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Days worked must be a positive number, got {0}")]
    NegativeDays(i64),

    #[error("Invalid date '{input}': expected DD-MM-YY")]
    DateParse {
        input: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("Failed to create output directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Template file not found: {0}")]
    TemplateNotFound(PathBuf),

    #[error("Failed to render template: {0}")]
    Template(#[from] tera::Error),

    #[error("Failed to generate PDF: {0}")]
    PdfExport(String),

    #[error("PDF export did not finish within {0} seconds")]
    ExportTimeout(u64),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, InvoiceError>;
