use crate::core::deadline::with_deadline;
use crate::domain::model::{MatchQuery, NewSubscription};
use crate::domain::ports::SubscriptionStore;
use crate::utils::error::StoreError;
use std::time::Duration;

/// Outcome of looking for an overlapping record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictCheck {
    /// Another record for the same user and provider overlaps the candidate.
    Conflict { overlapping: u64 },
    NotFound,
}

/// Looks for stored records with the candidate's user and provider whose
/// active window intersects the candidate's.
pub struct ConflictChecker<'a, S: SubscriptionStore + ?Sized> {
    store: &'a S,
    timeout: Option<Duration>,
}

impl<'a, S: SubscriptionStore + ?Sized> ConflictChecker<'a, S> {
    pub fn new(store: &'a S, timeout: Option<Duration>) -> Self {
        Self { store, timeout }
    }

    pub fn query_for(candidate: &NewSubscription) -> MatchQuery {
        MatchQuery {
            user_id: Some(candidate.user_id.clone()),
            provider: Some(candidate.provider.clone()),
            window: candidate.window(),
        }
    }

    pub async fn exists(&self, candidate: &NewSubscription) -> Result<ConflictCheck, StoreError> {
        let query = Self::query_for(candidate);
        let overlapping = with_deadline(self.timeout, self.store.count_matching(&query)).await?;

        tracing::debug!(
            "Conflict check for user={} provider={}: {} overlapping",
            candidate.user_id,
            candidate.provider,
            overlapping
        );

        if overlapping > 0 {
            Ok(ConflictCheck::Conflict { overlapping })
        } else {
            Ok(ConflictCheck::NotFound)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::core::month::parse_month;

    fn candidate(user: &str, provider: &str, start: &str, end: Option<&str>) -> NewSubscription {
        NewSubscription {
            user_id: user.to_string(),
            provider: provider.to_string(),
            price: 100,
            start: parse_month("start_date", start).unwrap(),
            end: end.map(|e| parse_month("end_date", e).unwrap()),
        }
    }

    #[tokio::test]
    async fn test_empty_store_has_no_conflict() {
        let store = InMemoryStore::new();
        let checker = ConflictChecker::new(&store, None);
        let result = checker
            .exists(&candidate("u1", "Netflix", "06-2025", None))
            .await
            .unwrap();
        assert_eq!(result, ConflictCheck::NotFound);
    }

    #[tokio::test]
    async fn test_overlap_same_user_and_provider() {
        let store = InMemoryStore::new();
        store
            .create(&candidate("u1", "Netflix", "06-2025", None))
            .await
            .unwrap();

        let checker = ConflictChecker::new(&store, None);
        let result = checker
            .exists(&candidate("u1", "Netflix", "07-2025", None))
            .await
            .unwrap();
        assert_eq!(result, ConflictCheck::Conflict { overlapping: 1 });
    }

    #[tokio::test]
    async fn test_no_conflict_across_users_providers_or_windows() {
        let store = InMemoryStore::new();
        store
            .create(&candidate("u1", "Netflix", "01-2025", Some("06-2025")))
            .await
            .unwrap();
        let checker = ConflictChecker::new(&store, None);

        for other in [
            candidate("u2", "Netflix", "03-2025", None),
            candidate("u1", "Spotify", "03-2025", None),
            candidate("u1", "Netflix", "07-2025", None),
            candidate("u1", "Netflix", "01-2024", Some("12-2024")),
        ] {
            assert_eq!(checker.exists(&other).await.unwrap(), ConflictCheck::NotFound);
        }
    }

    #[tokio::test]
    async fn test_candidate_ending_inside_existing_window() {
        let store = InMemoryStore::new();
        store
            .create(&candidate("u1", "Netflix", "06-2025", None))
            .await
            .unwrap();
        let checker = ConflictChecker::new(&store, None);

        let before = candidate("u1", "Netflix", "01-2025", Some("05-2025"));
        assert_eq!(checker.exists(&before).await.unwrap(), ConflictCheck::NotFound);

        let touching = candidate("u1", "Netflix", "01-2025", Some("06-2025"));
        assert!(matches!(
            checker.exists(&touching).await.unwrap(),
            ConflictCheck::Conflict { .. }
        ));
    }
}
