// conference-export-service/src/pipeline.rs

use sha2::{Digest, Sha256};
use std::sync::Arc;
use tracing::{info, instrument};

use crate::composer::{build_section, DocumentComposer, ExportSection};
use crate::countries::CountryLookup;
use crate::error::{ExportError, Result};
use crate::formatter::{single_export_filename, BATCH_EXPORT_FILENAME};
use crate::models::{ExportEntry, ExportedDocument, UserAccount};
use crate::persistence::ConferenceDb;
use crate::renderers::PdfRenderer;

const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Orchestrates: collect records → format sections → compose HTML → render PDF.
pub struct ExportPipeline {
    db: ConferenceDb,
    countries: Arc<CountryLookup>,
    composer: DocumentComposer,
    renderer: PdfRenderer,
    excluded_username: String,
}

impl ExportPipeline {
    pub fn new(
        db: ConferenceDb,
        countries: Arc<CountryLookup>,
        composer: DocumentComposer,
        renderer: PdfRenderer,
        excluded_username: impl Into<String>,
    ) -> Self {
        Self {
            db,
            countries,
            composer,
            renderer,
            excluded_username: excluded_username.into(),
        }
    }

    pub fn db(&self) -> &ConferenceDb {
        &self.db
    }

    // --------------------------------------------------------
    // Record aggregation
    // --------------------------------------------------------

    pub async fn collect_entry(&self, user_id: i64) -> Result<ExportEntry> {
        let account = self
            .db
            .get_user(user_id)
            .await?
            .ok_or(ExportError::NotFound(user_id))?;

        self.complete_entry(account).await
    }

    /// Entries for every regular account, oldest registration first.
    pub async fn collect_all(&self) -> Result<Vec<ExportEntry>> {
        let accounts = self.db.list_regular_users(&self.excluded_username).await?;

        let mut entries = Vec::with_capacity(accounts.len());
        for account in accounts {
            entries.push(self.complete_entry(account).await?);
        }
        Ok(entries)
    }

    async fn complete_entry(&self, account: UserAccount) -> Result<ExportEntry> {
        let (payment, submission) = futures::try_join!(
            self.db.get_fee_payment(account.id),
            self.db.get_abstract_submission(account.id),
        )?;

        Ok(ExportEntry {
            account,
            payment,
            submission,
        })
    }

    // --------------------------------------------------------
    // Exports
    // --------------------------------------------------------

    /// Main entry point for the single-user download.
    #[instrument(skip(self))]
    pub async fn export_user(&self, user_id: i64) -> Result<ExportedDocument> {
        let entry = self.collect_entry(user_id).await?;
        let filename = single_export_filename(&entry.account.name, entry.account.id);
        let title = format!("Conference Management: {}", entry.account.name.trim());

        self.render_entries(&title, &[entry], filename).await
    }

    /// Main entry point for the all-users download.
    #[instrument(skip(self))]
    pub async fn export_all(&self) -> Result<ExportedDocument> {
        let entries = self.collect_all().await?;
        if entries.is_empty() {
            return Err(ExportError::EmptyResult);
        }

        self.render_entries(
            "Conference Management: All Regular Users",
            &entries,
            BATCH_EXPORT_FILENAME.to_string(),
        )
        .await
    }

    async fn render_entries(
        &self,
        title: &str,
        entries: &[ExportEntry],
        filename: String,
    ) -> Result<ExportedDocument> {
        let countries = self.countries.table().await;
        let sections: Vec<ExportSection> = entries
            .iter()
            .map(|entry| build_section(entry, &countries))
            .collect();

        let html = self.composer.compose(title, &sections)?;
        let data = self.renderer.render(&html).await?;

        let mut hasher = Sha256::new();
        hasher.update(&data);
        let sha256_checksum = hex::encode(hasher.finalize());

        info!(
            filename = %filename,
            entries = entries.len(),
            size_kb = data.len() / 1024,
            sha256 = %sha256_checksum,
            "Conference export completed"
        );

        Ok(ExportedDocument {
            filename,
            content_type: PDF_CONTENT_TYPE,
            data,
            sha256_checksum,
            entries: entries.len(),
        })
    }
}
