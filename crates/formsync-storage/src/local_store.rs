//! LocalStore: the client's durable store.
//!
//! Every operation takes the connection inside a scoped closure, so the
//! handle is released on every path including errors.

use std::path::Path;

use chrono::Utc;
use tracing::{debug, instrument};

use formsync_core::config::StorageConfig;
use formsync_core::errors::FormSyncResult;
use formsync_core::models::{FormDefinition, FormId, QueuedSubmission, RejectedSubmission, SubmissionPayload};

use crate::migrations;
use crate::pool::{ConnectionPool, PragmaOptions};
use crate::queries::{form_cache, pending_queue, rejected};

/// Client-side store: cached form definitions, the pending-submission queue
/// and the dead-letter list.
pub struct LocalStore {
    pool: ConnectionPool,
}

impl LocalStore {
    /// Open a store backed by a file, with default pragmas.
    pub fn open(path: &Path) -> FormSyncResult<Self> {
        Self::open_with(path, StorageConfig::default().read_pool_size, &PragmaOptions::default())
    }

    /// Open the file named by `config.client_db_path`.
    pub fn open_with_config(config: &StorageConfig) -> FormSyncResult<Self> {
        Self::open_with(
            Path::new(&config.client_db_path),
            config.read_pool_size,
            &PragmaOptions::from(config),
        )
    }

    fn open_with(path: &Path, read_pool_size: usize, options: &PragmaOptions) -> FormSyncResult<Self> {
        let pool = ConnectionPool::open(path, read_pool_size, options)?;
        let store = Self { pool };
        store.initialize()?;
        Ok(store)
    }

    /// In-memory store (for testing). Reads go through the writer.
    pub fn open_in_memory() -> FormSyncResult<Self> {
        let pool = ConnectionPool::open_in_memory(&PragmaOptions::default())?;
        let store = Self { pool };
        store.initialize()?;
        Ok(store)
    }

    fn initialize(&self) -> FormSyncResult<()> {
        self.pool
            .writer
            .with_conn_sync(migrations::run_client_migrations)
    }

    pub fn pool(&self) -> &ConnectionPool {
        &self.pool
    }

    async fn with_reader<F, T>(&self, f: F) -> FormSyncResult<T>
    where
        F: FnOnce(&rusqlite::Connection) -> FormSyncResult<T>,
    {
        self.pool.read(f).await
    }

    // --- form cache ---

    /// Insert or replace the cached copy of a form.
    #[instrument(skip(self, form), fields(form_id = %form.id))]
    pub async fn put_form(&self, form: &FormDefinition) -> FormSyncResult<()> {
        let now = Utc::now();
        self.pool
            .writer
            .with_conn(|conn| form_cache::put_form(conn, form, now))
            .await
    }

    /// Replace several cached forms in one pass.
    pub async fn put_forms(&self, forms: &[FormDefinition]) -> FormSyncResult<()> {
        let now = Utc::now();
        self.pool
            .writer
            .with_conn(|conn| {
                for form in forms {
                    form_cache::put_form(conn, form, now)?;
                }
                Ok(())
            })
            .await?;
        debug!(count = forms.len(), "cached forms");
        Ok(())
    }

    pub async fn get_form(&self, form_id: FormId) -> FormSyncResult<Option<FormDefinition>> {
        self.with_reader(|conn| form_cache::get_form(conn, form_id)).await
    }

    /// Every cached form, ordered by title.
    pub async fn list_forms(&self) -> FormSyncResult<Vec<FormDefinition>> {
        self.with_reader(form_cache::list_forms).await
    }

    pub async fn remove_form(&self, form_id: FormId) -> FormSyncResult<bool> {
        self.pool
            .writer
            .with_conn(|conn| form_cache::remove_form(conn, form_id))
            .await
    }

    // --- pending queue ---

    /// Append a payload to the pending queue.
    ///
    /// Returns `false` when a payload with the same submission id is already
    /// queued. A storage fault is returned as an error, never swallowed.
    #[instrument(skip(self, payload), fields(form_id = %payload.form_id, submission_id = %payload.submission_id))]
    pub async fn enqueue(&self, payload: &SubmissionPayload) -> FormSyncResult<bool> {
        let now = Utc::now();
        let inserted = self
            .pool
            .writer
            .with_conn(|conn| pending_queue::enqueue(conn, payload, now))
            .await?;
        debug!(inserted, "enqueue");
        Ok(inserted)
    }

    /// Every pending entry in insertion order. Entries stay queued until
    /// cleared.
    pub async fn drain_all(&self) -> FormSyncResult<Vec<QueuedSubmission>> {
        self.with_reader(pending_queue::list_all).await
    }

    pub async fn pending_count(&self) -> FormSyncResult<usize> {
        self.with_reader(pending_queue::count).await
    }

    #[instrument(skip(self))]
    pub async fn clear_all(&self) -> FormSyncResult<usize> {
        self.pool.writer.with_conn(pending_queue::clear_all).await
    }

    /// Remove entries up to and including `seq`; later entries survive.
    #[instrument(skip(self))]
    pub async fn clear_through(&self, seq: i64) -> FormSyncResult<usize> {
        self.pool
            .writer
            .with_conn(|conn| pending_queue::clear_through(conn, seq))
            .await
    }

    /// Commit a flushed batch: dead-letter refused items and clear through
    /// `seq` in one transaction.
    #[instrument(skip(self, rejections), fields(rejected = rejections.len()))]
    pub async fn acknowledge(
        &self,
        seq: i64,
        rejections: &[(SubmissionPayload, String)],
    ) -> FormSyncResult<usize> {
        let now = Utc::now();
        self.pool
            .writer
            .with_conn(|conn| pending_queue::acknowledge(conn, seq, rejections, now))
            .await
    }

    // --- dead letters ---

    pub async fn rejected(&self) -> FormSyncResult<Vec<RejectedSubmission>> {
        self.with_reader(rejected::list_all).await
    }
}
