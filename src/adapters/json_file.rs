use crate::domain::model::{MatchQuery, NewSubscription, Subscription, SubscriptionId};
use crate::domain::ports::SubscriptionStore;
use crate::utils::error::StoreError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct TableFile {
    next_id: u64,
    subscriptions: Vec<Subscription>,
}

/// Durable single-file table. The whole table is rewritten on every
/// mutation through a sibling temp file and a rename, so a crash leaves
/// either the old or the new contents on disk.
///
/// Calls are serialized by an internal lock, which makes each call atomic
/// within one process. Separate processes sharing the file are not
/// coordinated.
///
/// Mutations stage a copy of the table, persist the copy and only then
/// install it, so a call that fails or is dropped mid-write leaves the
/// in-memory table untouched. Ids are reserved before the first await and
/// are never handed out twice.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    table: Mutex<TableFile>,
}

impl JsonFileStore {
    /// Open the table at `path`, starting empty if the file does not exist.
    pub async fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let table = match tokio::fs::read(&path).await {
            Ok(bytes) if bytes.is_empty() => TableFile::default(),
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => TableFile::default(),
            Err(e) => return Err(e.into()),
        };

        tracing::debug!(
            "Opened subscription table {} ({} records)",
            path.display(),
            table.subscriptions.len()
        );

        Ok(Self {
            path,
            table: Mutex::new(table),
        })
    }

    async fn persist(&self, table: &TableFile) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let data = serde_json::to_vec_pretty(table)?;
        let tmp_path = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, &data).await?;
        tokio::fs::rename(&tmp_path, &self.path).await?;

        tracing::debug!("Wrote {} bytes to {}", data.len(), self.path.display());
        Ok(())
    }
}

#[async_trait]
impl SubscriptionStore for JsonFileStore {
    async fn create(&self, record: &NewSubscription) -> Result<SubscriptionId, StoreError> {
        let mut table = self.table.lock().await;
        table.next_id += 1;
        let id = SubscriptionId(table.next_id);

        let mut staged = table.clone();
        staged.subscriptions.push(record.clone().into_stored(id));
        self.persist(&staged).await?;

        *table = staged;
        Ok(id)
    }

    async fn fetch_by_id(&self, id: SubscriptionId) -> Result<Option<Subscription>, StoreError> {
        let table = self.table.lock().await;
        Ok(table.subscriptions.iter().find(|s| s.id == id).cloned())
    }

    async fn fetch_all(&self) -> Result<Vec<Subscription>, StoreError> {
        let table = self.table.lock().await;
        let mut all = table.subscriptions.clone();
        all.sort_by_key(|s| s.id);
        Ok(all)
    }

    async fn save(&self, record: &Subscription) -> Result<(), StoreError> {
        let mut table = self.table.lock().await;
        let position = table
            .subscriptions
            .iter()
            .position(|s| s.id == record.id)
            .ok_or(StoreError::MissingRecord { id: record.id.0 })?;

        let mut staged = table.clone();
        staged.subscriptions[position] = record.clone();
        self.persist(&staged).await?;

        *table = staged;
        Ok(())
    }

    async fn delete_by_id(&self, id: SubscriptionId) -> Result<u64, StoreError> {
        let mut table = self.table.lock().await;
        let Some(position) = table.subscriptions.iter().position(|s| s.id == id) else {
            return Ok(0);
        };

        let mut staged = table.clone();
        staged.subscriptions.remove(position);
        self.persist(&staged).await?;

        *table = staged;
        Ok(1)
    }

    async fn fetch_matching(&self, query: &MatchQuery) -> Result<Vec<Subscription>, StoreError> {
        let table = self.table.lock().await;
        let mut matching: Vec<Subscription> = table
            .subscriptions
            .iter()
            .filter(|s| query.matches(s))
            .cloned()
            .collect();
        matching.sort_by_key(|s| s.id);
        Ok(matching)
    }

    async fn count_matching(&self, query: &MatchQuery) -> Result<u64, StoreError> {
        let table = self.table.lock().await;
        Ok(table.subscriptions.iter().filter(|s| query.matches(s)).count() as u64)
    }
}
