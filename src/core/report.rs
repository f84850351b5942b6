use crate::core::convert::filter_from_raw;
use crate::core::deadline::with_deadline;
use crate::core::month::month_window;
use crate::domain::model::{ActiveWindow, MatchQuery, RawReportFilter, Report, ReportFilter};
use crate::domain::ports::SubscriptionStore;
use crate::utils::error::{LedgerError, Result};
use std::sync::Arc;
use std::time::Duration;

/// Sums the price of every subscription active during a target month.
pub struct ReportEngine<S: SubscriptionStore + ?Sized> {
    store: Arc<S>,
    timeout: Option<Duration>,
}

impl<S: SubscriptionStore + ?Sized> Clone for ReportEngine<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            timeout: self.timeout,
        }
    }
}

impl<S: SubscriptionStore + ?Sized> ReportEngine<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            timeout: None,
        }
    }

    pub fn with_store_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Expand the target month to its first and last day. A record counts
    /// when `start <= last` and its end is absent or `>= first`.
    pub fn query_for(filter: &ReportFilter) -> MatchQuery {
        let (first, last) = month_window(filter.target_month);
        MatchQuery {
            user_id: filter.user_id.clone(),
            provider: filter.provider.clone(),
            window: ActiveWindow::new(first, Some(last)),
        }
    }

    pub async fn report(&self, raw: RawReportFilter) -> Result<Report> {
        let filter = filter_from_raw(&raw)?;
        self.report_for(&filter).await
    }

    pub async fn report_for(&self, filter: &ReportFilter) -> Result<Report> {
        let query = Self::query_for(filter);

        let matching = with_deadline(self.timeout, self.store.fetch_matching(&query))
            .await
            .map_err(|e| {
                tracing::error!("❌ Store failure during report: {} (filter: {:?})", e, filter);
                LedgerError::storage("report", e)
            })?;

        let total = matching
            .iter()
            .fold(0u64, |acc, record| acc.saturating_add(record.price));

        tracing::debug!(
            "Report for {}: {} matching subscription(s), total {}",
            filter.target_month.format(crate::core::month::MONTH_FORMAT),
            matching.len(),
            total
        );

        Ok(Report { total })
    }
}
