//! Shared harness: a transport wired straight into an in-process server.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use formsync_client::{ConnectivityMonitor, SyncCoordinator};
use formsync_core::errors::{FormSyncResult, TransportError};
use formsync_core::models::{
    FormDefinition, FormId, FormSummary, StoredSubmissionRecord, SubmitRequest, SubmitResponse,
    TenantId, UserId, UserIdentity,
};
use formsync_core::traits::SubmissionTransport;
use formsync_server::{FormRegistry, SessionRegistry, SubmissionEndpoint};
use formsync_storage::{LocalStore, ServerStore};

/// Calls a [`SubmissionEndpoint`] directly with a fixed session token.
/// `set_down(true)` makes every call fail as unreachable.
pub struct LoopbackTransport {
    endpoint: Arc<SubmissionEndpoint>,
    token: String,
    down: AtomicBool,
}

impl LoopbackTransport {
    pub fn set_down(&self, down: bool) {
        self.down.store(down, Ordering::SeqCst);
    }

    fn reachable(&self) -> FormSyncResult<()> {
        if self.down.load(Ordering::SeqCst) {
            return Err(TransportError::Unreachable {
                reason: "loopback down".to_string(),
            }
            .into());
        }
        Ok(())
    }
}

impl SubmissionTransport for LoopbackTransport {
    async fn submit(&self, request: SubmitRequest) -> FormSyncResult<SubmitResponse> {
        self.reachable()?;
        self.endpoint.submit(&self.token, request).await
    }

    async fn fetch_forms(&self) -> FormSyncResult<Vec<FormSummary>> {
        self.reachable()?;
        self.endpoint.list_forms(&self.token).await
    }

    async fn fetch_form(&self, form_id: FormId) -> FormSyncResult<FormDefinition> {
        self.reachable()?;
        self.endpoint.get_form(&self.token, form_id).await
    }

    async fn fetch_submissions(&self) -> FormSyncResult<Vec<StoredSubmissionRecord>> {
        self.reachable()?;
        self.endpoint.list_submissions(&self.token).await
    }
}

pub struct Loopback {
    pub server: Arc<ServerStore>,
    pub transport: Arc<LoopbackTransport>,
    pub local: Arc<LocalStore>,
    pub monitor: ConnectivityMonitor,
    pub identity: UserIdentity,
}

impl Loopback {
    pub fn coordinator(&self) -> SyncCoordinator<LoopbackTransport> {
        SyncCoordinator::new(
            Arc::clone(&self.local),
            Arc::clone(&self.transport),
            self.monitor.clone(),
        )
    }
}

/// Server with `forms` published for tenant 1, and a client signed in as user 7.
pub async fn loopback(forms: &[FormDefinition], online: bool) -> Loopback {
    let server = Arc::new(ServerStore::open_in_memory().unwrap());
    let registry = FormRegistry::new(Arc::clone(&server));
    for form in forms {
        registry.publish(TenantId(1), form).await.unwrap();
    }

    let identity = UserIdentity::new(UserId(7), TenantId(1));
    let sessions = SessionRegistry::new();
    let token = sessions.open_session(identity);
    let endpoint = Arc::new(SubmissionEndpoint::new(Arc::clone(&server), Arc::new(sessions)));

    Loopback {
        server,
        transport: Arc::new(LoopbackTransport {
            endpoint,
            token,
            down: AtomicBool::new(false),
        }),
        local: Arc::new(LocalStore::open_in_memory().unwrap()),
        monitor: ConnectivityMonitor::new(online),
        identity,
    }
}
