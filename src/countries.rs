// conference-export-service/src/countries.rs

use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{info, warn};

#[derive(Debug, Deserialize)]
struct CountryRecord {
    code: String,
    name: String,
}

/// Two-letter code to display name, plus the set of known names so rows that
/// already hold a name pass through untouched.
#[derive(Debug, Default)]
pub struct CountryTable {
    by_code: HashMap<String, String>,
    names: HashSet<String>,
}

impl CountryTable {
    pub fn from_entries<I, C, N>(entries: I) -> Self
    where
        I: IntoIterator<Item = (C, N)>,
        C: Into<String>,
        N: Into<String>,
    {
        let mut table = Self::default();
        for (code, name) in entries {
            let code = code.into().trim().to_ascii_uppercase();
            let name = name.into();
            if code.is_empty() || table.by_code.contains_key(&code) {
                continue;
            }
            table.names.insert(name.clone());
            table.by_code.insert(code, name);
        }
        table
    }

    pub fn parse(json: &str) -> serde_json::Result<Self> {
        let records: Vec<CountryRecord> = serde_json::from_str(json)?;
        Ok(Self::from_entries(
            records.into_iter().map(|r| (r.code, r.name)),
        ))
    }

    pub fn len(&self) -> usize {
        self.by_code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty()
    }

    pub fn name_for_code(&self, code: &str) -> Option<&str> {
        self.by_code
            .get(&code.trim().to_ascii_uppercase())
            .map(String::as_str)
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Code → display name; a known name or anything unrecognised comes back
    /// as given.
    pub fn resolve<'a>(&'a self, raw: &'a str) -> &'a str {
        if self.contains_name(raw) {
            return raw;
        }
        self.name_for_code(raw).unwrap_or(raw)
    }
}

/// Lazily loaded, read-only country table shared by every export.
pub struct CountryLookup {
    path: Option<PathBuf>,
    table: OnceCell<Arc<CountryTable>>,
}

impl CountryLookup {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            table: OnceCell::new(),
        }
    }

    pub fn fixed(table: CountryTable) -> Self {
        Self {
            path: None,
            table: OnceCell::new_with(Some(Arc::new(table))),
        }
    }

    pub async fn table(&self) -> Arc<CountryTable> {
        self.table
            .get_or_init(|| async {
                match &self.path {
                    Some(path) => Arc::new(load_table(path).await),
                    None => Arc::new(CountryTable::default()),
                }
            })
            .await
            .clone()
    }
}

/// Unreadable or malformed files yield an empty table: country values then
/// render exactly as stored.
async fn load_table(path: &Path) -> CountryTable {
    let raw = match tokio::fs::read_to_string(path).await {
        Ok(raw) => raw,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to read country file, codes will not be resolved");
            return CountryTable::default();
        }
    };

    match CountryTable::parse(&raw) {
        Ok(table) => {
            info!(path = %path.display(), countries = table.len(), "Country table loaded");
            table
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to parse country file, codes will not be resolved");
            CountryTable::default()
        }
    }
}
