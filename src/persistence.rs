// conference-export-service/src/persistence.rs

use crate::error::Result;
use crate::models::{AbstractSubmission, FeePayment, UserAccount};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

const USER_COLUMNS: &str = r#"
    id, username, name, id_number, organization, receipt_number,
    COALESCE(is_admin, 0) AS is_admin, datetime(created_at) AS created_at
"#;

// ============================================================
// Database client
// ============================================================

/// Read-only access to the portal's registration tables.
#[derive(Clone)]
pub struct ConferenceDb {
    pool: SqlitePool,
}

impl ConferenceDb {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    // --------------------------------------------------------
    // users
    // --------------------------------------------------------

    pub async fn get_user(&self, user_id: i64) -> Result<Option<UserAccount>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?");

        let user = sqlx::query_as::<_, UserAccount>(&sql)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    /// Every non-admin account except `excluded_username`, oldest first.
    pub async fn list_regular_users(&self, excluded_username: &str) -> Result<Vec<UserAccount>> {
        let sql = format!(
            r#"
            SELECT {USER_COLUMNS} FROM users
            WHERE COALESCE(is_admin, 0) = 0
              AND username != ?
            ORDER BY datetime(created_at) ASC, id ASC
            "#
        );

        let users = sqlx::query_as::<_, UserAccount>(&sql)
            .bind(excluded_username)
            .fetch_all(&self.pool)
            .await?;

        Ok(users)
    }

    // --------------------------------------------------------
    // fee_payments
    // --------------------------------------------------------

    pub async fn get_fee_payment(&self, user_id: i64) -> Result<Option<FeePayment>> {
        let payment = sqlx::query_as::<_, FeePayment>(
            r#"
            SELECT user_id, paper_number, name, gender, email,
                   participant_category, iwa_member_info, country, income_level,
                   institution, state_province, city, address, zip_code,
                   affiliation, work_phone, mobile_phone, remarks,
                   receipt_number, payment_status
            FROM fee_payments
            WHERE user_id = ?
            ORDER BY id DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(payment)
    }

    // --------------------------------------------------------
    // abstract_submissions
    // --------------------------------------------------------

    pub async fn get_abstract_submission(&self, user_id: i64) -> Result<Option<AbstractSubmission>> {
        let row = sqlx::query(
            r#"
            SELECT user_id, title, authors, affiliation,
                   CAST(topic AS TEXT) AS topic,
                   presentation_type, abstract, keywords,
                   file_path, original_filename, status
            FROM abstract_submissions
            WHERE user_id = ?
            ORDER BY id DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(submission_from_row).transpose().map_err(Into::into)
    }
}

fn submission_from_row(row: &SqliteRow) -> std::result::Result<AbstractSubmission, sqlx::Error> {
    let topic: Option<String> = row.try_get("topic")?;

    Ok(AbstractSubmission {
        user_id: row.try_get("user_id")?,
        title: row.try_get("title")?,
        authors: row.try_get("authors")?,
        affiliation: row.try_get("affiliation")?,
        topic: topic.as_deref().and_then(parse_topic),
        presentation_type: row.try_get("presentation_type")?,
        abstract_text: row.try_get("abstract")?,
        keywords: row.try_get("keywords")?,
        file_path: row.try_get("file_path")?,
        original_filename: row.try_get("original_filename")?,
        status: row.try_get("status")?,
    })
}

/// Session number from whatever the column holds. Only values that read fully
/// as a finite number count; `"3.7"` floors to 3, `"3abc"` is no topic at all.
fn parse_topic(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    raw.parse::<f64>()
        .ok()
        .filter(|t| t.is_finite())
        .map(|t| t.floor() as i64)
}
