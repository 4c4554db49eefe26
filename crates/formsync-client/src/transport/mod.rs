//! Transport layer: HTTP transport with retry/backoff and the versioned
//! envelope it speaks.

pub mod http_client;
pub mod protocol;

pub use http_client::{HttpClientConfig, HttpTransport};
pub use protocol::{ApiRequest, ApiResponse};
