// conference-export-service/src/models.rs

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserAccount {
    pub id: i64,
    pub username: String,
    pub name: String,
    pub id_number: Option<String>,
    pub organization: String,
    pub receipt_number: Option<String>,
    pub is_admin: bool,
    /// `None` when the stored value is missing or not a datetime.
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, FromRow)]
pub struct FeePayment {
    pub user_id: i64,
    pub paper_number: Option<String>,
    pub name: Option<String>,
    pub gender: Option<String>,
    pub email: Option<String>,
    pub participant_category: Option<String>,
    pub iwa_member_info: Option<String>,
    pub country: Option<String>,
    pub income_level: Option<String>,
    pub institution: Option<String>,
    pub state_province: Option<String>,
    pub city: Option<String>,
    pub address: Option<String>,
    pub zip_code: Option<String>,
    pub affiliation: Option<String>,
    pub work_phone: Option<String>,
    pub mobile_phone: Option<String>,
    pub remarks: Option<String>,
    pub receipt_number: Option<String>,
    pub payment_status: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AbstractSubmission {
    pub user_id: i64,
    pub title: Option<String>,
    pub authors: Option<String>,
    pub affiliation: Option<String>,
    /// Session number; legacy rows may hold values outside 1..=7.
    pub topic: Option<i64>,
    pub presentation_type: Option<String>,
    #[serde(rename = "abstract")]
    pub abstract_text: Option<String>,
    pub keywords: Option<String>,
    pub file_path: Option<String>,
    pub original_filename: Option<String>,
    pub status: Option<String>,
}

/// Everything exported for one account. Rows the user never submitted stay
/// `None` and render as placeholders.
#[derive(Debug, Clone)]
pub struct ExportEntry {
    pub account: UserAccount,
    pub payment: Option<FeePayment>,
    pub submission: Option<AbstractSubmission>,
}

#[derive(Debug, Clone)]
pub struct ExportedDocument {
    pub filename: String,
    pub content_type: &'static str,
    pub data: Vec<u8>,
    pub sha256_checksum: String,
    pub entries: usize,
}

#[derive(Debug, Serialize)]
pub struct FeePaymentView {
    pub success: bool,
    pub payment: Option<FeePayment>,
}

#[derive(Debug, Serialize)]
pub struct AbstractView {
    pub success: bool,
    pub submission: Option<AbstractSubmission>,
}
