// conference-export-service/src/composer.rs

use crate::config::{RendererConfig, TemplateConfig};
use crate::countries::CountryTable;
use crate::error::Result;
use crate::formatter::{escape_html, format_authors, format_topic, non_empty, or_placeholder};
use crate::models::{AbstractSubmission, ExportEntry, FeePayment};
use chrono::Utc;
use handlebars::Handlebars;
use serde::Serialize;
use tracing::{debug, info};

const TEMPLATE_NAME: &str = "conference_export";
const EMBEDDED_TEMPLATE: &str = include_str!("../templates/conference_export.html.hbs");

#[derive(Debug, Clone, Serialize)]
pub struct Field {
    pub label: &'static str,
    pub value: String,
    pub wide: bool,
}

impl Field {
    fn new(label: &'static str, value: String) -> Self {
        Self { label, value, wide: false }
    }

    fn wide(label: &'static str, value: String) -> Self {
        Self { label, value, wide: true }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FieldBlock {
    pub title: &'static str,
    pub fields: Vec<Field>,
}

/// One user's part of the document. Values are plain text; escaping happens
/// when the template is rendered.
#[derive(Debug, Clone, Serialize)]
pub struct ExportSection {
    pub heading: String,
    pub meta: Vec<Field>,
    pub blocks: Vec<FieldBlock>,
}

impl ExportSection {
    pub fn field(&self, label: &str) -> Option<&Field> {
        self.blocks
            .iter()
            .flat_map(|b| b.fields.iter())
            .find(|f| f.label == label)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PageLayout {
    pub format: String,
    pub margin_mm: u32,
}

impl From<&RendererConfig> for PageLayout {
    fn from(config: &RendererConfig) -> Self {
        Self {
            format: config.page_format.clone(),
            margin_mm: config.margin_mm,
        }
    }
}

impl Default for PageLayout {
    fn default() -> Self {
        Self {
            format: "A4".to_string(),
            margin_mm: 12,
        }
    }
}

#[derive(Serialize)]
struct DocumentContext<'a> {
    title: &'a str,
    generated_at: String,
    page: &'a PageLayout,
    sections: &'a [ExportSection],
}

pub fn build_section(entry: &ExportEntry, countries: &CountryTable) -> ExportSection {
    let account = &entry.account;

    ExportSection {
        heading: or_placeholder(Some(account.name.as_str())),
        meta: vec![
            Field::new("Username", or_placeholder(Some(account.username.as_str()))),
            Field::new("Organization", or_placeholder(Some(account.organization.as_str()))),
            Field::new("Receipt No.", or_placeholder(account.receipt_number.as_deref())),
            Field::new("ID Number", or_placeholder(account.id_number.as_deref())),
        ],
        blocks: vec![
            payment_block(entry.payment.as_ref(), countries),
            submission_block(entry.submission.as_ref()),
        ],
    }
}

fn payment_block(payment: Option<&FeePayment>, countries: &CountryTable) -> FieldBlock {
    let text = |get: fn(&FeePayment) -> Option<&str>| or_placeholder(payment.and_then(get));
    let country = non_empty(payment.and_then(|p| p.country.as_deref()))
        .map(|raw| countries.resolve(raw).to_string())
        .unwrap_or_else(|| or_placeholder(None));

    FieldBlock {
        title: "Fee Payment",
        fields: vec![
            Field::new("Paper Number", text(|p| p.paper_number.as_deref())),
            Field::new("Name", text(|p| p.name.as_deref())),
            Field::new("Gender", text(|p| p.gender.as_deref())),
            Field::new("Email", text(|p| p.email.as_deref())),
            Field::new("Participant Category", text(|p| p.participant_category.as_deref())),
            Field::new("IWA Member Info", text(|p| p.iwa_member_info.as_deref())),
            Field::new("Country/Region", country),
            Field::new("Income Level", text(|p| p.income_level.as_deref())),
            Field::new("Institution", text(|p| p.institution.as_deref())),
            Field::new("Affiliation", text(|p| p.affiliation.as_deref())),
            Field::new("State/Province", text(|p| p.state_province.as_deref())),
            Field::new("City", text(|p| p.city.as_deref())),
            Field::wide("Address", text(|p| p.address.as_deref())),
            Field::new("Zip Code", text(|p| p.zip_code.as_deref())),
            Field::new("Work Phone", text(|p| p.work_phone.as_deref())),
            Field::new("Mobile Phone", text(|p| p.mobile_phone.as_deref())),
            Field::new("Payment Status", text(|p| p.payment_status.as_deref())),
            Field::wide("Remarks", text(|p| p.remarks.as_deref())),
        ],
    }
}

fn submission_block(submission: Option<&AbstractSubmission>) -> FieldBlock {
    let text = |get: fn(&AbstractSubmission) -> Option<&str>| or_placeholder(submission.and_then(get));
    let file_name = submission
        .and_then(|s| non_empty(s.original_filename.as_deref()).or(non_empty(s.file_path.as_deref())))
        .map(str::to_string)
        .unwrap_or_else(|| or_placeholder(None));

    FieldBlock {
        title: "Abstract Submission",
        fields: vec![
            Field::wide("Title", text(|s| s.title.as_deref())),
            Field::wide("Authors", format_authors(submission.and_then(|s| s.authors.as_deref()))),
            Field::new("Affiliation", text(|s| s.affiliation.as_deref())),
            Field::new("Topic", format_topic(submission.and_then(|s| s.topic))),
            Field::new("Presentation Type", text(|s| s.presentation_type.as_deref())),
            Field::new("Status", text(|s| s.status.as_deref())),
            Field::wide("Abstract", text(|s| s.abstract_text.as_deref())),
            Field::wide("Keywords", text(|s| s.keywords.as_deref())),
            Field::wide("File Name", file_name),
        ],
    }
}

pub struct DocumentComposer {
    handlebars: Handlebars<'static>,
    layout: PageLayout,
}

impl DocumentComposer {
    pub fn new(layout: PageLayout) -> Result<Self> {
        Self::with_template(layout, &TemplateConfig::default())
    }

    pub fn with_template(layout: PageLayout, templates: &TemplateConfig) -> Result<Self> {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(false);
        handlebars.register_escape_fn(escape_html);

        match &templates.path {
            Some(path) => {
                info!(path = %path, "Loading export template from file");
                handlebars.register_template_file(TEMPLATE_NAME, path)?;
            }
            None => handlebars.register_template_string(TEMPLATE_NAME, EMBEDDED_TEMPLATE)?,
        }

        Ok(Self { handlebars, layout })
    }

    pub fn compose(&self, title: &str, sections: &[ExportSection]) -> Result<String> {
        let context = DocumentContext {
            title,
            generated_at: Utc::now().format("%Y-%m-%d %H:%M UTC").to_string(),
            page: &self.layout,
            sections,
        };

        let html = self.handlebars.render(TEMPLATE_NAME, &context)?;

        debug!(sections = sections.len(), size_bytes = html.len(), "Export document composed");

        Ok(html)
    }
}
