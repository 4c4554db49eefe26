//! ServerStore: published forms and per-(user, form) submission records.

use std::path::Path;

use chrono::Utc;
use tracing::{debug, instrument};

use formsync_core::config::StorageConfig;
use formsync_core::errors::FormSyncResult;
use formsync_core::models::{
    FormDefinition, FormId, FormSummary, StoredSubmissionRecord, SubmissionPayload,
    SubmissionStatus, TenantId, UserId, UserIdentity,
};

use crate::migrations;
use crate::pool::{ConnectionPool, PragmaOptions};
use crate::queries::{server_forms, server_submissions};

/// Server-side store. All writes go through the single writer connection, so
/// concurrent upserts for one key are serialized and the `UNIQUE(user_id,
/// form_id)` constraint holds.
pub struct ServerStore {
    pool: ConnectionPool,
}

impl ServerStore {
    pub fn open(path: &Path) -> FormSyncResult<Self> {
        Self::open_with(path, StorageConfig::default().read_pool_size, &PragmaOptions::default())
    }

    /// Open the file named by `config.server_db_path`.
    pub fn open_with_config(config: &StorageConfig) -> FormSyncResult<Self> {
        Self::open_with(
            Path::new(&config.server_db_path),
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
            .with_conn_sync(migrations::run_server_migrations)
    }

    async fn with_reader<F, T>(&self, f: F) -> FormSyncResult<T>
    where
        F: FnOnce(&rusqlite::Connection) -> FormSyncResult<T>,
    {
        self.pool.read(f).await
    }

    // --- forms ---

    #[instrument(skip(self, form), fields(form_id = %form.id))]
    pub async fn publish_form(&self, tenant_id: TenantId, form: &FormDefinition) -> FormSyncResult<()> {
        let now = Utc::now();
        self.pool
            .writer
            .with_conn(|conn| server_forms::publish(conn, tenant_id, form, now))
            .await
    }

    pub async fn get_form(&self, form_id: FormId) -> FormSyncResult<Option<(TenantId, FormDefinition)>> {
        self.with_reader(|conn| server_forms::get(conn, form_id)).await
    }

    /// A tenant's forms, ordered by title.
    pub async fn list_forms(&self, tenant_id: TenantId) -> FormSyncResult<Vec<FormSummary>> {
        self.with_reader(|conn| server_forms::list_for_tenant(conn, tenant_id))
            .await
    }

    // --- submissions ---

    /// Create-or-update the record for `(identity.user_id, payload.form_id)`.
    ///
    /// Returns `None` when the form does not exist or belongs to another
    /// tenant. The lookup and the upsert share the writer lock.
    #[instrument(skip(self, payload), fields(user_id = %identity.user_id, form_id = %payload.form_id))]
    pub async fn upsert_submission(
        &self,
        identity: &UserIdentity,
        payload: &SubmissionPayload,
    ) -> FormSyncResult<Option<StoredSubmissionRecord>> {
        let now = Utc::now();
        let record = self
            .pool
            .writer
            .with_conn(|conn| match server_forms::get(conn, payload.form_id)? {
                Some((tenant, _)) if tenant == identity.tenant_id => {
                    server_submissions::upsert(conn, identity.user_id, payload, now).map(Some)
                }
                _ => Ok(None),
            })
            .await?;
        debug!(found = record.is_some(), "upsert");
        Ok(record)
    }

    pub async fn get_submission(
        &self,
        identity: &UserIdentity,
        form_id: FormId,
    ) -> FormSyncResult<Option<StoredSubmissionRecord>> {
        let user_id = identity.user_id;
        self.with_reader(|conn| server_submissions::get(conn, user_id, form_id))
            .await
    }

    /// A user's records, most recently updated first.
    pub async fn list_submissions(&self, identity: &UserIdentity) -> FormSyncResult<Vec<StoredSubmissionRecord>> {
        let user_id = identity.user_id;
        self.with_reader(|conn| server_submissions::list_for_user(conn, user_id))
            .await
    }

    #[instrument(skip(self))]
    pub async fn set_status(
        &self,
        user_id: UserId,
        form_id: FormId,
        status: SubmissionStatus,
    ) -> FormSyncResult<Option<StoredSubmissionRecord>> {
        let now = Utc::now();
        self.pool
            .writer
            .with_conn(|conn| server_submissions::set_status(conn, user_id, form_id, status, now))
            .await
    }

    /// Rows stored for one key; the uniqueness constraint keeps this at 0 or 1.
    pub async fn record_count(
        &self,
        user_id: UserId,
        form_id: FormId,
    ) -> FormSyncResult<usize> {
        self.with_reader(|conn| server_submissions::count_for_key(conn, user_id, form_id))
            .await
    }
}
