use std::ffi::OsStr;
use std::fs;
use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use headless_chrome::types::PrintToPdfOptions;
use headless_chrome::{Browser, LaunchOptions};

use crate::error::{InvoiceError, Result};

/// Bound on the whole export: launch + navigate + render + print + write.
const EXPORT_TIMEOUT_SECS: u64 = 30;

/// A4 paper in inches, 0.2in margins on all sides.
const PAPER_WIDTH_IN: f64 = 8.27;
const PAPER_HEIGHT_IN: f64 = 11.7;
const MARGIN_IN: f64 = 0.2;

/// Narrow seam over the PDF rendering backend so the external browser can be
/// substituted in tests.
pub trait PdfExporter {
    fn export(&self, html: &str, output_path: &Path) -> Result<()>;
}

/// Exports HTML to PDF by driving a headless Chrome/Chromium instance over
/// the DevTools protocol. The browser is launched per export and torn down
/// when the handles drop, success or failure.
pub struct ChromeExporter {
    timeout: Duration,
}

impl ChromeExporter {
    pub fn new() -> Self {
        ChromeExporter {
            timeout: Duration::from_secs(EXPORT_TIMEOUT_SECS),
        }
    }

    fn launch(&self) -> Result<Browser> {
        // Flags chosen for constrained/containerized environments.
        let options = LaunchOptions::default_builder()
            .headless(true)
            .sandbox(false)
            .args(vec![
                OsStr::new("--disable-gpu"),
                OsStr::new("--disable-software-rasterizer"),
            ])
            .idle_browser_timeout(self.timeout)
            .build()
            .map_err(|e| InvoiceError::PdfExport(e.to_string()))?;

        Browser::new(options).map_err(|e| InvoiceError::PdfExport(e.to_string()))
    }
}

impl Default for ChromeExporter {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfExporter for ChromeExporter {
    fn export(&self, html: &str, output_path: &Path) -> Result<()> {
        let deadline = Instant::now() + self.timeout;

        let browser = self.launch()?;
        let tab = browser
            .new_tab()
            .map_err(|e| InvoiceError::PdfExport(e.to_string()))?;
        tab.set_default_timeout(remaining(deadline)?);

        // Inline document: no temp file or local server needed.
        tab.navigate_to(&data_url(html))
            .and_then(|tab| tab.wait_until_navigated())
            .map_err(|e| InvoiceError::PdfExport(e.to_string()))?;

        tab.set_default_timeout(remaining(deadline)?);
        tab.wait_for_element("body")
            .map_err(|e| InvoiceError::PdfExport(e.to_string()))?;

        // Wait for an explicit readiness signal rather than a fixed settle
        // delay, so capture cannot race template/CSS application.
        wait_for_ready_state(&tab, deadline)?;

        let pdf = tab
            .print_to_pdf(Some(PrintToPdfOptions {
                print_background: Some(true),
                margin_top: Some(MARGIN_IN),
                margin_bottom: Some(MARGIN_IN),
                margin_left: Some(MARGIN_IN),
                margin_right: Some(MARGIN_IN),
                paper_width: Some(PAPER_WIDTH_IN),
                paper_height: Some(PAPER_HEIGHT_IN),
                prefer_css_page_size: Some(true),
                ..PrintToPdfOptions::default()
            }))
            .map_err(|e| InvoiceError::PdfExport(e.to_string()))?;

        // Only written once the full byte stream is in hand; no partial file.
        fs::write(output_path, pdf)?;
        Ok(())
    }
}

fn data_url(html: &str) -> String {
    format!("data:text/html;base64,{}", BASE64.encode(html))
}

fn remaining(deadline: Instant) -> Result<Duration> {
    deadline
        .checked_duration_since(Instant::now())
        .ok_or(InvoiceError::ExportTimeout(EXPORT_TIMEOUT_SECS))
}

fn wait_for_ready_state(tab: &headless_chrome::Tab, deadline: Instant) -> Result<()> {
    loop {
        let ready = tab
            .evaluate("document.readyState", false)
            .map_err(|e| InvoiceError::PdfExport(e.to_string()))?;

        if ready.value.as_ref().and_then(|v| v.as_str()) == Some("complete") {
            return Ok(());
        }

        remaining(deadline)?;
        thread::sleep(Duration::from_millis(50));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_url_encodes_html_as_base64() {
        let url = data_url("<html><body>hi</body></html>");
        assert!(url.starts_with("data:text/html;base64,"));
        let encoded = url.trim_start_matches("data:text/html;base64,");
        let decoded = BASE64.decode(encoded).unwrap();
        assert_eq!(decoded, b"<html><body>hi</body></html>");
    }

    #[test]
    fn elapsed_deadline_is_a_timeout() {
        let past = Instant::now() - Duration::from_secs(1);
        assert!(matches!(
            remaining(past).unwrap_err(),
            InvoiceError::ExportTimeout(_)
        ));
    }

    // The exporter seam: anything implementing PdfExporter can stand in for
    // the real browser.
    struct FakeExporter;

    impl PdfExporter for FakeExporter {
        fn export(&self, html: &str, output_path: &Path) -> Result<()> {
            fs::write(output_path, format!("%PDF-fake {}", html.len()))?;
            Ok(())
        }
    }

    #[test]
    fn fake_exporter_substitutes_for_the_browser() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.pdf");

        let exporter: &dyn PdfExporter = &FakeExporter;
        exporter.export("<html></html>", &path).unwrap();

        assert!(fs::read_to_string(&path).unwrap().starts_with("%PDF-fake"));
    }
}
