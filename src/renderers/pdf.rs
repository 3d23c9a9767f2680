// conference-export-service/src/renderers/pdf.rs

use crate::error::{ExportError, Result};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tracing::{info, instrument, warn};

/// What a browser session is asked to print.
pub struct PrintJob<'a> {
    pub html: &'a str,
}

/// Starts headless browser sessions. One session serves one export.
#[async_trait]
pub trait HeadlessBrowser: Send + Sync {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>>;
}

#[async_trait]
pub trait BrowserSession: Send {
    /// Loads the document, waits for it (fonts included) and prints it.
    async fn print_to_pdf(&mut self, job: &PrintJob<'_>) -> Result<Vec<u8>>;

    /// Releases the browser process and any scratch files.
    async fn close(&mut self) -> Result<()>;
}

pub struct PdfRenderer {
    browser: Arc<dyn HeadlessBrowser>,
    permits: Arc<Semaphore>,
    navigation_timeout: Duration,
}

impl PdfRenderer {
    pub fn new(
        browser: Arc<dyn HeadlessBrowser>,
        max_concurrent: usize,
        navigation_timeout: Duration,
    ) -> Self {
        Self {
            browser,
            permits: Arc::new(Semaphore::new(max_concurrent.max(1))),
            navigation_timeout,
        }
    }

    /// Prints `html` to PDF. The session is closed on every path out of
    /// here, including print failures and timeouts.
    #[instrument(skip(self, html), fields(html_bytes = html.len()))]
    pub async fn render(&self, html: &str) -> Result<Vec<u8>> {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| ExportError::Render("renderer pool closed".to_string()))?;

        let mut session = self.browser.launch().await.map_err(into_render_error)?;

        let job = PrintJob { html };
        let outcome = match tokio::time::timeout(self.navigation_timeout, session.print_to_pdf(&job)).await {
            Ok(result) => result.map_err(into_render_error),
            Err(_) => Err(ExportError::Render(format!(
                "document did not finish loading within {}s",
                self.navigation_timeout.as_secs_f32()
            ))),
        };

        if let Err(e) = session.close().await {
            warn!(error = %e, "Failed to close browser session cleanly");
        }

        let pdf = outcome?;
        if pdf.is_empty() {
            return Err(ExportError::Render("browser produced an empty PDF".to_string()));
        }

        info!(size_kb = pdf.len() / 1024, "PDF generated successfully");

        Ok(pdf)
    }
}

fn into_render_error(e: ExportError) -> ExportError {
    match e {
        ExportError::Render(_) => e,
        other => ExportError::Render(other.to_string()),
    }
}
