use std::fs;
use std::path::Path;
use tera::{Context, Tera};

use crate::error::{InvoiceError, Result};
use crate::invoice::Invoice;

/// The template is an external collaborator: its absence is fatal.
pub const TEMPLATE_PATH: &str = "invoice.tpl";

/// Read the template source from disk.
pub fn load_template(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(InvoiceError::TemplateNotFound(path.to_path_buf()));
    }
    Ok(fs::read_to_string(path)?)
}

/// Expand the template with the invoice record into an HTML string.
/// Malformed template syntax or a reference to a field the invoice does not
/// have surfaces as a template error.
pub fn render_invoice(template_source: &str, invoice: &Invoice) -> Result<String> {
    let mut tera = Tera::default();
    tera.add_raw_template("invoice", template_source)?;

    let context = Context::from_serialize(invoice)?;
    Ok(tera.render("invoice", &context)?)
}
