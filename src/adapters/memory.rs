use crate::domain::model::{NewSubscription, Subscription, SubscriptionId};
use crate::domain::ports::SubscriptionStore;
use crate::utils::error::StoreError;
use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct Table {
    next_id: u64,
    rows: BTreeMap<SubscriptionId, Subscription>,
}

/// Process-local store. Ids start at 1 and are never reused.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    table: RwLock<Table>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.table.read().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl SubscriptionStore for InMemoryStore {
    async fn create(&self, record: &NewSubscription) -> Result<SubscriptionId, StoreError> {
        let mut table = self.table.write().await;
        table.next_id += 1;
        let id = SubscriptionId(table.next_id);
        table.rows.insert(id, record.clone().into_stored(id));
        Ok(id)
    }

    async fn fetch_by_id(&self, id: SubscriptionId) -> Result<Option<Subscription>, StoreError> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn fetch_all(&self) -> Result<Vec<Subscription>, StoreError> {
        Ok(self.table.read().await.rows.values().cloned().collect())
    }

    async fn save(&self, record: &Subscription) -> Result<(), StoreError> {
        let mut table = self.table.write().await;
        match table.rows.get_mut(&record.id) {
            Some(row) => {
                *row = record.clone();
                Ok(())
            }
            None => Err(StoreError::MissingRecord { id: record.id.0 }),
        }
    }

    async fn delete_by_id(&self, id: SubscriptionId) -> Result<u64, StoreError> {
        let removed = self.table.write().await.rows.remove(&id);
        Ok(u64::from(removed.is_some()))
    }
}
