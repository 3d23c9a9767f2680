// Shared fixtures for unit tests.

use crate::error::{ExportError, Result};
use crate::renderers::{BrowserSession, HeadlessBrowser, PrintJob};
use async_trait::async_trait;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use sqlx::Executor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

const SCHEMA: &str = include_str!("../tests/fixtures/schema.sql");

pub async fn memory_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite");
    pool.execute(SCHEMA).await.expect("schema");
    pool
}

pub async fn insert_user(
    pool: &SqlitePool,
    username: &str,
    name: &str,
    is_admin: bool,
    created_at: &str,
) -> i64 {
    sqlx::query(
        "INSERT INTO users (username, password_hash, name, organization, is_admin, created_at)
         VALUES (?, 'x', ?, 'IWA', ?, ?)",
    )
    .bind(username)
    .bind(name)
    .bind(is_admin)
    .bind(created_at)
    .execute(pool)
    .await
    .expect("insert user")
    .last_insert_rowid()
}

pub async fn insert_payment(pool: &SqlitePool, user_id: i64, country: &str, remarks: &str) {
    sqlx::query(
        "INSERT INTO fee_payments (user_id, name, email, country, remarks)
         VALUES (?, 'Registrant', 'registrant@example.org', ?, ?)",
    )
    .bind(user_id)
    .bind(country)
    .bind(remarks)
    .execute(pool)
    .await
    .expect("insert payment");
}

pub async fn insert_submission(pool: &SqlitePool, user_id: i64, authors: &str, topic: &str) {
    sqlx::query(
        "INSERT INTO abstract_submissions
            (user_id, title, authors, affiliation, topic, abstract, keywords)
         VALUES (?, 'Membrane fouling', ?, 'Tsinghua University', ?, 'Abstract body', 'water')",
    )
    .bind(user_id)
    .bind(authors)
    .bind(topic)
    .execute(pool)
    .await
    .expect("insert submission");
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehaviour {
    Succeed,
    FailLaunch,
    FailPrint,
    Hang,
}

/// Browser double that records launches, closes and the last printed HTML.
#[derive(Clone)]
pub struct MockBrowser {
    behaviour: MockBehaviour,
    launches: Arc<AtomicUsize>,
    closes: Arc<AtomicUsize>,
    active: Arc<AtomicUsize>,
    peak_active: Arc<AtomicUsize>,
    last_html: Arc<Mutex<Option<String>>>,
}

impl MockBrowser {
    pub fn new(behaviour: MockBehaviour) -> Self {
        Self {
            behaviour,
            launches: Arc::new(AtomicUsize::new(0)),
            closes: Arc::new(AtomicUsize::new(0)),
            active: Arc::new(AtomicUsize::new(0)),
            peak_active: Arc::new(AtomicUsize::new(0)),
            last_html: Arc::new(Mutex::new(None)),
        }
    }

    pub fn launches(&self) -> usize {
        self.launches.load(Ordering::SeqCst)
    }

    pub fn open_sessions(&self) -> usize {
        self.launches() - self.closes.load(Ordering::SeqCst)
    }

    /// Highest number of sessions printing at the same time.
    pub fn peak_active(&self) -> usize {
        self.peak_active.load(Ordering::SeqCst)
    }

    pub fn last_html(&self) -> Option<String> {
        self.last_html.lock().unwrap().clone()
    }
}

#[async_trait]
impl HeadlessBrowser for MockBrowser {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>> {
        if self.behaviour == MockBehaviour::FailLaunch {
            return Err(ExportError::Render("failed to launch mock browser".to_string()));
        }
        self.launches.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MockSession {
            browser: self.clone(),
        }))
    }
}

struct MockSession {
    browser: MockBrowser,
}

#[async_trait]
impl BrowserSession for MockSession {
    async fn print_to_pdf(&mut self, job: &PrintJob<'_>) -> Result<Vec<u8>> {
        *self.browser.last_html.lock().unwrap() = Some(job.html.to_string());
        match self.browser.behaviour {
            MockBehaviour::FailPrint => Err(ExportError::Render("mock print failure".to_string())),
            MockBehaviour::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(Vec::new())
            }
            _ => {
                let now = self.browser.active.fetch_add(1, Ordering::SeqCst) + 1;
                self.browser.peak_active.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(10)).await;
                self.browser.active.fetch_sub(1, Ordering::SeqCst);
                Ok(b"%PDF-1.7 mock".to_vec())
            }
        }
    }

    async fn close(&mut self) -> Result<()> {
        self.browser.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
