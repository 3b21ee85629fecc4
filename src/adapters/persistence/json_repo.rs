//! Implements LeadRepoPort using a single JSON file.
//!
//! The file holds the whole collection as a pretty-printed array of records.
//! Every mutation loads the full array, changes it in memory and rewrites the file.

use crate::adapters::persistence::csv_export::leads_to_csv;
use crate::domain::{DomainError, Lead, LeadRecord};
use crate::ports::LeadRepoPort;
use serde_json::Value;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

/// Default storage file name inside the data directory.
pub const DEFAULT_DB_FILE: &str = "leads.json";
/// Default CSV export file name inside the data directory.
pub const DEFAULT_CSV_FILE: &str = "leads.csv";

/// JSON file-based lead storage.
pub struct JsonLeadRepo {
    data_dir: PathBuf,
    db_path: PathBuf,
    csv_path: PathBuf,
}

impl JsonLeadRepo {
    /// Storage at `<data_dir>/leads.json`, export at `<data_dir>/leads.csv`.
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        let data_dir = data_dir.as_ref().to_path_buf();
        Self {
            db_path: data_dir.join(DEFAULT_DB_FILE),
            csv_path: data_dir.join(DEFAULT_CSV_FILE),
            data_dir,
        }
    }

    /// Override the storage file (the data directory still hosts the default export).
    pub fn with_db_path(mut self, db_path: impl AsRef<Path>) -> Self {
        self.db_path = db_path.as_ref().to_path_buf();
        self
    }

    /// Override the default CSV export path.
    pub fn with_csv_path(mut self, csv_path: impl AsRef<Path>) -> Self {
        self.csv_path = csv_path.as_ref().to_path_buf();
        self
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    pub fn csv_path(&self) -> &Path {
        &self.csv_path
    }

    /// Create the data directory if absent.
    pub async fn ensure_data_dir(&self) -> Result<(), DomainError> {
        fs::create_dir_all(&self.data_dir)
            .await
            .map_err(|e| DomainError::Repo(format!("create data dir: {}", e)))
    }

    /// Read the storage file. Absent file or invalid JSON counts as no data.
    async fn load_stored(&self) -> Result<StoredLeads, DomainError> {
        let raw = match fs::read_to_string(&self.db_path).await {
            Ok(s) => s,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(StoredLeads::default()),
            Err(e) => return Err(DomainError::Repo(e.to_string())),
        };
        let stored = decode_stored(&raw, &self.db_path);
        debug!(
            path = %self.db_path.display(),
            count = stored.leads.len(),
            unreadable = stored.unreadable.len(),
            "loaded leads"
        );
        Ok(stored)
    }

    async fn load(&self) -> Result<Vec<Lead>, DomainError> {
        Ok(self.load_stored().await?.leads)
    }

    /// Rewrite the whole file: temp file, sync_all, then rename over the target.
    /// Records currently on disk that could not be read as leads are written back unchanged.
    async fn save(&self, leads: &[Lead]) -> Result<(), DomainError> {
        let unreadable = self.load_stored().await?.unreadable;
        ensure_parent_dir(&self.db_path).await?;

        let mut values = leads
            .iter()
            .map(|lead| serde_json::to_value(LeadRecord::from(lead)))
            .collect::<Result<Vec<Value>, _>>()
            .map_err(|e| DomainError::Repo(e.to_string()))?;
        values.extend(unreadable.iter().cloned());
        let json =
            serde_json::to_string_pretty(&values).map_err(|e| DomainError::Repo(e.to_string()))?;

        let temp_path = self.db_path.with_extension("json.tmp");
        let mut f = fs::File::create(&temp_path)
            .await
            .map_err(|e| DomainError::Repo(format!("create temp file: {}", e)))?;
        f.write_all(json.as_bytes())
            .await
            .map_err(|e| DomainError::Repo(format!("write temp file: {}", e)))?;
        f.sync_all()
            .await
            .map_err(|e| DomainError::Repo(format!("sync temp file: {}", e)))?;
        drop(f);

        fs::rename(&temp_path, &self.db_path)
            .await
            .map_err(|e| DomainError::Repo(format!("replace storage file: {}", e)))?;

        info!(
            path = %self.db_path.display(),
            count = leads.len(),
            kept_unreadable = unreadable.len(),
            "saved leads"
        );
        Ok(())
    }
}

/// Contents of the storage file: readable leads plus raw records kept for rewrite.
#[derive(Debug, Default)]
struct StoredLeads {
    leads: Vec<Lead>,
    unreadable: Vec<Value>,
}

/// Decode the array one record at a time. Only text that is not a JSON array
/// counts as no data; a single odd record never hides the others.
fn decode_stored(raw: &str, path: &Path) -> StoredLeads {
    let values: Vec<Value> = match serde_json::from_str(raw) {
        Ok(values) => values,
        Err(e) => {
            warn!(
                path = %path.display(),
                error = %e,
                "storage file is not a JSON array, treating as empty"
            );
            return StoredLeads::default();
        }
    };

    let mut stored = StoredLeads::default();
    for (index, value) in values.into_iter().enumerate() {
        let lead = serde_json::from_value::<LeadRecord>(value.clone())
            .map_err(|e| DomainError::Repo(e.to_string()))
            .and_then(|record| Lead::try_from(&record));
        match lead {
            Ok(lead) => stored.leads.push(lead),
            Err(e) => {
                warn!(index, error = %e, "keeping unreadable record as-is");
                stored.unreadable.push(value);
            }
        }
    }
    stored
}

async fn ensure_parent_dir(path: &Path) -> Result<(), DomainError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent)
            .await
            .map_err(|e| DomainError::Repo(format!("create {}: {}", parent.display(), e))),
        _ => Ok(()),
    }
}

/// Map the CSV write result: denied (permission or lock) is a soft `None`, other errors propagate.
fn csv_write_outcome(
    result: std::io::Result<()>,
    target: PathBuf,
) -> Result<Option<PathBuf>, DomainError> {
    match result {
        Ok(()) => Ok(Some(target)),
        Err(e) if e.kind() == ErrorKind::PermissionDenied => {
            warn!(path = %target.display(), error = %e, "CSV target not writable");
            Ok(None)
        }
        Err(e) => Err(DomainError::Repo(format!("write CSV: {}", e))),
    }
}

#[async_trait::async_trait]
impl LeadRepoPort for JsonLeadRepo {
    async fn list_all(&self) -> Result<Vec<Lead>, DomainError> {
        self.load().await
    }

    async fn add(&self, lead: &Lead) -> Result<(), DomainError> {
        let mut leads = self.load().await?;
        leads.push(lead.clone());
        self.save(&leads).await
    }

    async fn save_all(&self, leads: &[Lead]) -> Result<(), DomainError> {
        self.save(leads).await
    }

    async fn search(&self, query: &str) -> Result<Vec<Lead>, DomainError> {
        if query.is_empty() {
            return Ok(vec![]);
        }
        let leads = self.load().await?;
        Ok(leads.into_iter().filter(|l| l.matches(query)).collect())
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<Lead>, DomainError> {
        let leads = self.load().await?;
        Ok(leads.into_iter().find(|l| l.has_email(email)))
    }

    async fn export_csv(&self, path: Option<&Path>) -> Result<Option<PathBuf>, DomainError> {
        let target = path.map(Path::to_path_buf).unwrap_or_else(|| self.csv_path.clone());
        if path.is_none() {
            ensure_parent_dir(&target).await?;
        }

        let leads = self.load().await?;
        let csv = leads_to_csv(&leads).map_err(|e| DomainError::Repo(e.to_string()))?;

        let outcome = csv_write_outcome(fs::write(&target, csv).await, target)?;
        if let Some(path) = &outcome {
            info!(path = %path.display(), count = leads.len(), "exported leads to CSV");
        }
        Ok(outcome)
    }

    async fn count(&self) -> Result<usize, DomainError> {
        Ok(self.load().await?.len())
    }
}
