// conference-export-service/src/renderers/chrome.rs

use crate::error::{ExportError, Result};
use crate::renderers::pdf::{BrowserSession, HeadlessBrowser, PrintJob};
use async_trait::async_trait;
use std::process::Stdio;
use tempfile::TempDir;
use tokio::fs;
use tokio::io::AsyncReadExt;
use tokio::process::{Child, Command};
use tracing::{debug, info};

/// Headless Chromium driven through its `--print-to-pdf` mode. Page size and
/// margins come from the document's `@page` rule.
pub struct ChromeBrowser {
    binary: String,
    virtual_time_budget_ms: u64,
}

impl ChromeBrowser {
    pub fn new(binary: impl Into<String>, virtual_time_budget_ms: u64) -> Self {
        Self {
            binary: binary.into(),
            virtual_time_budget_ms,
        }
    }
}

#[async_trait]
impl HeadlessBrowser for ChromeBrowser {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>> {
        let workdir = TempDir::new()
            .map_err(|e| ExportError::Render(format!("failed to create browser workspace: {}", e)))?;

        debug!(workdir = ?workdir.path(), "Browser workspace created");

        Ok(Box::new(ChromeSession {
            binary: self.binary.clone(),
            virtual_time_budget_ms: self.virtual_time_budget_ms,
            workdir: Some(workdir),
            child: None,
        }))
    }
}

struct ChromeSession {
    binary: String,
    virtual_time_budget_ms: u64,
    workdir: Option<TempDir>,
    // kill_on_drop covers sessions dropped without close()
    child: Option<Child>,
}

#[async_trait]
impl BrowserSession for ChromeSession {
    async fn print_to_pdf(&mut self, job: &PrintJob<'_>) -> Result<Vec<u8>> {
        let workdir = self
            .workdir
            .as_ref()
            .ok_or_else(|| ExportError::Render("browser session already closed".to_string()))?;

        let html_path = workdir.path().join("document.html");
        let pdf_path = workdir.path().join("document.pdf");
        let profile_dir = workdir.path().join("profile");

        fs::write(&html_path, job.html)
            .await
            .map_err(|e| ExportError::Render(format!("failed to stage document: {}", e)))?;

        let mut cmd = Command::new(&self.binary);
        cmd.arg("--headless=new")
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--hide-scrollbars")
            .arg("--no-first-run")
            .arg("--no-pdf-header-footer")
            .arg("--print-to-pdf-no-header")
            .arg("--run-all-compositor-stages-before-draw")
            .arg(format!("--virtual-time-budget={}", self.virtual_time_budget_ms))
            .arg(format!("--user-data-dir={}", profile_dir.display()))
            .arg(format!("--print-to-pdf={}", pdf_path.display()))
            .arg(format!("file://{}", html_path.display()))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        debug!("Running Chromium: {:?}", cmd);

        let child = cmd.spawn().map_err(|e| {
            ExportError::Render(format!("failed to launch {}: {}", self.binary, e))
        })?;
        let child = self.child.insert(child);

        let mut stderr = child.stderr.take();
        let read_stderr = async {
            let mut buf = Vec::new();
            if let Some(pipe) = stderr.as_mut() {
                let _ = pipe.read_to_end(&mut buf).await;
            }
            buf
        };
        let (status, stderr_bytes) = tokio::join!(child.wait(), read_stderr);
        self.child = None;

        let status = status
            .map_err(|e| ExportError::Render(format!("failed to wait for browser: {}", e)))?;

        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr_bytes);
            return Err(ExportError::Render(format!(
                "browser exited with {}: {}",
                status,
                stderr.trim()
            )));
        }

        let pdf_bytes = fs::read(&pdf_path)
            .await
            .map_err(|e| ExportError::Render(format!("browser produced no PDF: {}", e)))?;

        info!(size_kb = pdf_bytes.len() / 1024, "Browser printed document");

        Ok(pdf_bytes)
    }

    async fn close(&mut self) -> Result<()> {
        if let Some(mut child) = self.child.take() {
            let _ = child.start_kill();
            let _ = child.wait().await;
        }
        if let Some(workdir) = self.workdir.take() {
            workdir.close()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_binary_is_a_render_error() {
        let browser = ChromeBrowser::new("/nonexistent/chromium-for-tests", 100);
        let mut session = browser.launch().await.unwrap();

        let err = session
            .print_to_pdf(&PrintJob { html: "<p>x</p>" })
            .await
            .unwrap_err();
        assert!(matches!(err, ExportError::Render(ref msg) if msg.contains("failed to launch")));

        session.close().await.unwrap();
        // closing twice is harmless
        session.close().await.unwrap();
    }

    #[tokio::test]
    async fn closed_session_refuses_to_print() {
        let browser = ChromeBrowser::new("chromium", 100);
        let mut session = browser.launch().await.unwrap();
        session.close().await.unwrap();

        let err = session
            .print_to_pdf(&PrintJob { html: "<p>x</p>" })
            .await
            .unwrap_err();
        assert!(matches!(err, ExportError::Render(ref msg) if msg.contains("already closed")));
    }
}
