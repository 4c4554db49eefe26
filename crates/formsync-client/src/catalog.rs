//! Form listing and lookup with the local cache as the offline fallback.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, warn};

use formsync_core::errors::{FormSyncError, FormSyncResult, TransportError};
use formsync_core::models::{FormDefinition, FormId, FormSummary, StoredSubmissionRecord};
use formsync_core::traits::SubmissionTransport;
use formsync_observability::tracing_setup::events;
use formsync_storage::LocalStore;

use crate::connectivity::ConnectivityMonitor;
use crate::fill::FormFill;

/// Where a listing came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Server,
    Cache,
}

pub struct FormCatalog<T: SubmissionTransport> {
    store: Arc<LocalStore>,
    transport: Arc<T>,
    monitor: ConnectivityMonitor,
}

impl<T: SubmissionTransport> FormCatalog<T> {
    pub fn new(store: Arc<LocalStore>, transport: Arc<T>, monitor: ConnectivityMonitor) -> Self {
        Self {
            store,
            transport,
            monitor,
        }
    }

    /// Forms available to the user, ordered by title.
    ///
    /// Online, the list comes from the server, every listed form is
    /// re-fetched into the cache and cached forms the server no longer lists
    /// are evicted. Offline, or when the server cannot be
    /// reached, every cached form is listed.
    pub async fn list_forms(&self) -> FormSyncResult<(Source, Vec<FormSummary>)> {
        if self.monitor.is_online() {
            match self.transport.fetch_forms().await {
                Ok(summaries) => {
                    self.refresh_cache(&summaries).await?;
                    return Ok((Source::Server, summaries));
                }
                Err(e) => warn!(error = %e, "form list fetch failed, using cache"),
            }
        }
        let cached = self.store.list_forms().await?;
        Ok((Source::Cache, cached.iter().map(FormDefinition::summary).collect()))
    }

    /// One form's full structure.
    ///
    /// Online fetches replace the cached copy. Falls back to the cache when
    /// offline or unreachable; a form in neither place is `FormNotFound`.
    pub async fn get_form(&self, form_id: FormId) -> FormSyncResult<FormDefinition> {
        if self.monitor.is_online() {
            match self.transport.fetch_form(form_id).await {
                Ok(form) => {
                    self.store.put_form(&form).await?;
                    return Ok(form);
                }
                Err(FormSyncError::FormNotFound { .. }) => {
                    return Err(FormSyncError::FormNotFound { form_id })
                }
                Err(e) => warn!(error = %e, %form_id, "form fetch failed, using cache"),
            }
        }
        self.store
            .get_form(form_id)
            .await?
            .ok_or(FormSyncError::FormNotFound { form_id })
    }

    /// Start filling a form.
    pub async fn start_fill(&self, form_id: FormId) -> FormSyncResult<FormFill> {
        Ok(FormFill::new(self.get_form(form_id).await?))
    }

    /// The user's stored submissions, newest first. Online only.
    pub async fn my_submissions(&self) -> FormSyncResult<Vec<StoredSubmissionRecord>> {
        if !self.monitor.is_online() {
            return Err(TransportError::Unreachable {
                reason: "offline".to_string(),
            }
            .into());
        }
        self.transport.fetch_submissions().await
    }

    async fn refresh_cache(&self, summaries: &[FormSummary]) -> FormSyncResult<()> {
        let mut refreshed = 0;
        for summary in summaries {
            match self.transport.fetch_form(summary.id).await {
                Ok(form) => {
                    self.store.put_form(&form).await?;
                    refreshed += 1;
                }
                Err(e) => warn!(error = %e, form_id = %summary.id, "keeping cached copy"),
            }
        }
        events::form_cache_refreshed(refreshed);

        let listed: HashSet<FormId> = summaries.iter().map(|s| s.id).collect();
        for cached in self.store.list_forms().await? {
            if !listed.contains(&cached.id) {
                self.store.remove_form(cached.id).await?;
                debug!(form_id = %cached.id, "evicted unlisted form");
            }
        }
        Ok(())
    }
}
