/// Network-side failures. All of them are absorbed by the offline queue.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("server unreachable: {reason}")]
    Unreachable { reason: String },

    #[error("request timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("server responded with HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed response: {reason}")]
    Decode { reason: String },

    #[error("protocol version mismatch: expected {expected}, got {actual}")]
    VersionMismatch { expected: String, actual: String },
}
