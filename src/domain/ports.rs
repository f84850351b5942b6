use crate::domain::model::{MatchQuery, NewSubscription, Subscription, SubscriptionId};
use crate::utils::error::StoreError;
use async_trait::async_trait;
use std::time::Duration;

/// Durable table of subscription records.
///
/// The core never holds locks across calls; any atomicity beyond a single
/// call is the implementation's business. `count_matching` followed by
/// `create` is check-then-act and may race under concurrent writers.
#[async_trait]
pub trait SubscriptionStore: Send + Sync {
    /// Persist a new record and return the id assigned to it.
    async fn create(&self, record: &NewSubscription) -> Result<SubscriptionId, StoreError>;

    async fn fetch_by_id(&self, id: SubscriptionId) -> Result<Option<Subscription>, StoreError>;

    /// All records, ordered by id.
    async fn fetch_all(&self) -> Result<Vec<Subscription>, StoreError>;

    /// Full overwrite of an existing record.
    async fn save(&self, record: &Subscription) -> Result<(), StoreError>;

    /// Returns the number of rows removed.
    async fn delete_by_id(&self, id: SubscriptionId) -> Result<u64, StoreError>;

    async fn fetch_matching(&self, query: &MatchQuery) -> Result<Vec<Subscription>, StoreError> {
        let all = self.fetch_all().await?;
        Ok(all.into_iter().filter(|record| query.matches(record)).collect())
    }

    async fn count_matching(&self, query: &MatchQuery) -> Result<u64, StoreError> {
        Ok(self.fetch_matching(query).await?.len() as u64)
    }
}

pub trait ConfigProvider: Send + Sync {
    fn store_path(&self) -> &str;
    fn store_timeout(&self) -> Option<Duration>;
}
