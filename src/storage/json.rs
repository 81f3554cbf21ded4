use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{LedgerError, Result};
use crate::goals::Goal;
use crate::payments::AllocatedPayment;
use crate::purchase::{Payment, Purchase};
use crate::types::{GoalId, PurchaseId, Store, StoreId};

use super::{MemoryStore, PurchaseStore};

const TMP_SUFFIX: &str = "tmp";
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct Document {
    schema_version: u32,
    data: MemoryStore,
}

/// purchase store persisted as a single json document.
/// every mutation rewrites the whole file through a temp file and rename.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    data: MemoryStore,
}

impl JsonFileStore {
    /// open an existing document, or start empty if the file does not exist
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let data = if path.exists() {
            let raw = fs::read_to_string(&path)?;
            let document: Document = serde_json::from_str(&raw)?;
            if document.schema_version > SCHEMA_VERSION {
                return Err(LedgerError::storage(format!(
                    "unsupported schema version {} in {}",
                    document.schema_version,
                    path.display()
                )));
            }
            for purchase in document.data.list_purchases()? {
                purchase.check_invariants()?;
            }
            document.data
        } else {
            MemoryStore::new()
        };

        tracing::debug!(path = %path.display(), "opened purchase store");
        Ok(Self { path, data })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// apply `mutate` to a copy, persist it, then swap it in
    fn persist_with<F>(&mut self, mutate: F) -> Result<()>
    where
        F: FnOnce(&mut MemoryStore) -> Result<()>,
    {
        let mut next = self.data.clone();
        mutate(&mut next)?;

        let document = Document {
            schema_version: SCHEMA_VERSION,
            data: next,
        };
        let json = serde_json::to_string_pretty(&document)?;
        let tmp = tmp_path(&self.path);
        write_file(&tmp, &json)?;
        if let Err(err) = fs::rename(&tmp, &self.path) {
            tracing::warn!(path = %self.path.display(), error = %err, "failed to replace store file");
            let _ = fs::remove_file(&tmp);
            return Err(err.into());
        }

        self.data = document.data;
        Ok(())
    }
}

impl PurchaseStore for JsonFileStore {
    fn read_purchase(&self, id: PurchaseId) -> Result<Purchase> {
        self.data.read_purchase(id)
    }

    fn write_purchase(&mut self, purchase: &Purchase) -> Result<()> {
        self.persist_with(|data| data.write_purchase(purchase))
    }

    fn append_payment(&mut self, payment: &Payment) -> Result<()> {
        self.persist_with(|data| data.append_payment(payment))
    }

    fn commit(&mut self, changes: &[AllocatedPayment]) -> Result<()> {
        self.data.validate_changes(changes)?;
        self.persist_with(|data| {
            data.apply_changes(changes);
            Ok(())
        })
    }

    fn list_purchases(&self) -> Result<Vec<Purchase>> {
        self.data.list_purchases()
    }

    fn read_store(&self, id: StoreId) -> Result<Store> {
        self.data.read_store(id)
    }

    fn write_store(&mut self, store: &Store) -> Result<()> {
        self.persist_with(|data| data.write_store(store))
    }

    fn list_stores(&self) -> Result<Vec<Store>> {
        self.data.list_stores()
    }

    fn read_goal(&self, id: GoalId) -> Result<Goal> {
        self.data.read_goal(id)
    }

    fn write_goal(&mut self, goal: &Goal) -> Result<()> {
        self.persist_with(|data| data.write_goal(goal))
    }

    fn list_goals(&self) -> Result<Vec<Goal>> {
        self.data.list_goals()
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|e| e.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_file(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.sync_all()?;
    Ok(())
}
