use crate::core::conflict::{ConflictCheck, ConflictChecker};
use crate::core::convert::{raw_to_new, subscription_to_raw, SubscriptionPatch};
use crate::core::deadline::with_deadline;
use crate::domain::model::{RawSubscription, SubscriptionId};
use crate::domain::ports::SubscriptionStore;
use crate::utils::error::{LedgerError, Result};
use std::sync::Arc;
use std::time::Duration;

/// Create, update, fetch and delete subscriptions on top of an injected store.
///
/// All validation and normalization happens before the first write, so
/// rejected input never mutates stored state. Store failures are logged with
/// the operation name and request data, then returned as `StorageFailure`
/// without retrying.
pub struct SubscriptionService<S: SubscriptionStore + ?Sized> {
    store: Arc<S>,
    timeout: Option<Duration>,
}

impl<S: SubscriptionStore + ?Sized> Clone for SubscriptionService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            timeout: self.timeout,
        }
    }
}

impl<S: SubscriptionStore + ?Sized> SubscriptionService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            timeout: None,
        }
    }

    /// Bound every store call by `timeout`.
    pub fn with_store_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Validate and persist a new subscription. Returns the input with the
    /// assigned id filled in.
    pub async fn create(&self, mut raw: RawSubscription) -> Result<RawSubscription> {
        let candidate = raw_to_new(&raw)?;

        let checker = ConflictChecker::new(&*self.store, self.timeout);
        match checker.exists(&candidate).await {
            Ok(ConflictCheck::NotFound) => {}
            Ok(ConflictCheck::Conflict { overlapping }) => {
                tracing::warn!(
                    "Rejected subscription for user={} provider={}: overlaps {} existing record(s)",
                    candidate.user_id,
                    candidate.provider,
                    overlapping
                );
                return Err(LedgerError::AlreadyExists {
                    message: format!(
                        "user {} already has an active {} subscription in this period",
                        candidate.user_id, candidate.provider
                    ),
                });
            }
            Err(e) => {
                tracing::error!("❌ Store failure during conflict check: {} (input: {:?})", e, raw);
                return Err(LedgerError::storage("conflict_check", e));
            }
        }

        let id = with_deadline(self.timeout, self.store.create(&candidate))
            .await
            .map_err(|e| {
                tracing::error!("❌ Store failure during create: {} (input: {:?})", e, raw);
                LedgerError::storage("create", e)
            })?;

        tracing::info!(
            "Created subscription {} for user={} provider={}",
            id,
            candidate.user_id,
            candidate.provider
        );
        raw.id = Some(id);
        Ok(raw)
    }

    /// Merge the supplied fields of `raw` into the record identified by `id`.
    ///
    /// Empty or absent fields keep their stored value; there is no way to
    /// clear a field through this call. Returns the merged record.
    pub async fn update_by_id(&self, raw: RawSubscription, id: &str) -> Result<RawSubscription> {
        let id_token = id.trim();
        if id_token.is_empty() {
            return Err(LedgerError::missing("subscription_id"));
        }

        let patch = SubscriptionPatch::from_raw(&raw)?;
        if patch.is_empty() {
            return Err(LedgerError::missing(
                "at least one of user_id, service_name, price, start_date, end_date",
            ));
        }

        let id: SubscriptionId = id_token.parse().map_err(|e: std::num::ParseIntError| {
            LedgerError::invalid("subscription_id", id_token, e.to_string())
        })?;

        let mut record = with_deadline(self.timeout, self.store.fetch_by_id(id))
            .await
            .map_err(|e| {
                tracing::error!("❌ Store failure during fetch_by_id: {} (id: {})", e, id);
                LedgerError::storage("fetch_by_id", e)
            })?
            .ok_or_else(|| LedgerError::NotFound {
                message: format!("no subscription with id {}", id),
            })?;

        patch.apply(&mut record)?;

        with_deadline(self.timeout, self.store.save(&record))
            .await
            .map_err(|e| {
                tracing::error!("❌ Store failure during save: {} (input: {:?})", e, raw);
                LedgerError::storage("save", e)
            })?;

        tracing::info!("Updated subscription {}", id);
        Ok(subscription_to_raw(&record))
    }

    pub async fn get_by_id(&self, id: SubscriptionId) -> Result<RawSubscription> {
        let record = with_deadline(self.timeout, self.store.fetch_by_id(id))
            .await
            .map_err(|e| {
                tracing::error!("❌ Store failure during fetch_by_id: {} (id: {})", e, id);
                LedgerError::storage("fetch_by_id", e)
            })?;

        match record {
            Some(record) => Ok(subscription_to_raw(&record)),
            None => Err(LedgerError::NotFound {
                message: format!("no subscription with id {}", id),
            }),
        }
    }

    /// Every stored subscription; an empty store yields an empty list.
    pub async fn get_all(&self) -> Result<Vec<RawSubscription>> {
        let records = with_deadline(self.timeout, self.store.fetch_all())
            .await
            .map_err(|e| {
                tracing::error!("❌ Store failure during fetch_all: {}", e);
                LedgerError::storage("fetch_all", e)
            })?;

        tracing::debug!("Listed {} subscriptions", records.len());
        Ok(records.iter().map(subscription_to_raw).collect())
    }

    pub async fn delete_by_id(&self, id: SubscriptionId) -> Result<()> {
        let affected = with_deadline(self.timeout, self.store.delete_by_id(id))
            .await
            .map_err(|e| {
                tracing::error!("❌ Store failure during delete_by_id: {} (id: {})", e, id);
                LedgerError::storage("delete_by_id", e)
            })?;

        if affected == 0 {
            return Err(LedgerError::NotFound {
                message: format!("no subscription with id {}", id),
            });
        }

        tracing::info!("Deleted subscription {}", id);
        Ok(())
    }
}
