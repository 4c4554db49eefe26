//! HTTP transport with retry, exponential backoff, timeout, and gzip.
//!
//! Network calls need the `remote` feature. Without it every call fails as
//! unreachable, which the coordinator treats like any other outage.

use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};

use formsync_core::config::SyncConfig;
use formsync_core::constants::paths;
use formsync_core::errors::{FormSyncError, FormSyncResult, TransportError};
use formsync_core::models::{
    FormDefinition, FormId, FormSummary, StoredSubmissionRecord, SubmitRequest, SubmitResponse,
};
use formsync_core::traits::SubmissionTransport;

#[cfg(feature = "remote")]
use super::protocol::ApiRequest;
#[cfg(feature = "remote")]
use super::protocol::ApiResponse;

/// Configuration for the HTTP transport.
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Base URL of the form server.
    pub base_url: String,
    pub timeout: Duration,
    /// Retries after the first attempt, for network errors and 5xx only.
    pub max_retries: u32,
    /// Initial backoff (doubles each retry).
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self::from(&SyncConfig::default())
    }
}

impl From<&SyncConfig> for HttpClientConfig {
    fn from(config: &SyncConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout: config.timeout(),
            max_retries: config.max_retries,
            initial_backoff: config.initial_backoff(),
            max_backoff: config.max_backoff(),
        }
    }
}

fn net_err(reason: String) -> FormSyncError {
    TransportError::Unreachable { reason }.into()
}

/// [`SubmissionTransport`] over HTTP. The session token goes out as a
/// bearer token; the server derives the user from it.
#[derive(Debug)]
pub struct HttpTransport {
    config: HttpClientConfig,
    bearer_token: Option<String>,
    #[cfg(feature = "remote")]
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(config: HttpClientConfig) -> FormSyncResult<Self> {
        #[cfg(feature = "remote")]
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .gzip(true)
            .build()
            .map_err(|e| net_err(e.to_string()))?;

        Ok(Self {
            config,
            bearer_token: None,
            #[cfg(feature = "remote")]
            client,
        })
    }

    pub fn set_bearer_token(&mut self, token: String) {
        self.bearer_token = Some(token);
    }

    pub fn clear_bearer_token(&mut self) {
        self.bearer_token = None;
    }

    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    async fn post<Req: Serialize + Sync, Resp: DeserializeOwned>(
        &self,
        path: &str,
        payload: &Req,
    ) -> FormSyncResult<Resp> {
        let _url = self.url(path);

        #[cfg(feature = "remote")]
        {
            let request = ApiRequest::new(payload);
            self.do_request(reqwest::Method::POST, &_url, Some(&request)).await
        }

        #[cfg(not(feature = "remote"))]
        {
            let _ = payload;
            Err(net_err("remote feature not enabled".into()))
        }
    }

    async fn get<Resp: DeserializeOwned>(&self, path: &str) -> FormSyncResult<Resp> {
        let _url = self.url(path);

        #[cfg(feature = "remote")]
        {
            self.do_request(reqwest::Method::GET, &_url, None::<&()>).await
        }

        #[cfg(not(feature = "remote"))]
        {
            Err(net_err("remote feature not enabled".into()))
        }
    }

    /// Unified retry loop for any HTTP method.
    #[cfg(feature = "remote")]
    async fn do_request<Resp: DeserializeOwned>(
        &self,
        method: reqwest::Method,
        url: &str,
        body: Option<&(impl Serialize + Sync)>,
    ) -> FormSyncResult<Resp> {
        let mut backoff = self.config.initial_backoff;
        let mut last_err = String::new();

        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                tracing::debug!(
                    attempt,
                    max_retries = self.config.max_retries,
                    ?backoff,
                    "transport: retrying"
                );
                tokio::time::sleep(backoff).await;
                backoff = (backoff * 2).min(self.config.max_backoff);
            }

            let mut req = self.client.request(method.clone(), url);
            if let Some(b) = body {
                req = req.json(b);
            }
            if let Some(ref token) = self.bearer_token {
                req = req.bearer_auth(token);
            }

            match req.send().await {
                Ok(resp) => {
                    let status = resp.status();
                    if status.is_success() {
                        let envelope = resp.json::<ApiResponse<Resp>>().await.map_err(|e| {
                            FormSyncError::from(TransportError::Decode {
                                reason: e.to_string(),
                            })
                        })?;
                        return envelope.into_data(status.as_u16());
                    }
                    if status.is_client_error() {
                        let body = resp.text().await.unwrap_or_default();
                        return Err(TransportError::Status {
                            status: status.as_u16(),
                            body,
                        }
                        .into());
                    }
                    last_err = format!("HTTP {status}");
                }
                Err(e) if e.is_timeout() => {
                    last_err = format!("timed out after {}ms", self.config.timeout.as_millis());
                }
                Err(e) => {
                    last_err = e.to_string();
                }
            }
        }

        Err(net_err(format!(
            "all {} retries exhausted: {last_err}",
            self.config.max_retries
        )))
    }
}

impl SubmissionTransport for HttpTransport {
    async fn submit(&self, request: SubmitRequest) -> FormSyncResult<SubmitResponse> {
        self.post(paths::SUBMISSIONS, &request).await
    }

    async fn fetch_forms(&self) -> FormSyncResult<Vec<FormSummary>> {
        self.get(paths::FORMS).await
    }

    async fn fetch_form(&self, form_id: FormId) -> FormSyncResult<FormDefinition> {
        match self.get(&format!("{}/{}", paths::FORMS, form_id)).await {
            Err(FormSyncError::TransportError(TransportError::Status { status: 404, .. })) => {
                Err(FormSyncError::FormNotFound { form_id })
            }
            other => other,
        }
    }

    async fn fetch_submissions(&self) -> FormSyncResult<Vec<StoredSubmissionRecord>> {
        self.get(paths::SUBMISSIONS).await
    }
}
