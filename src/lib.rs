pub mod config;
pub mod dates;
pub mod error;
pub mod invoice;
pub mod pdf;
pub mod render;

pub use config::{load_settings, Settings};
pub use error::{InvoiceError, Result};
pub use invoice::{Invoice, Totals};
pub use pdf::{ChromeExporter, PdfExporter};
