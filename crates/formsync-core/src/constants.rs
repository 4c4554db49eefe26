/// formsync system version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Wire protocol version carried in every API envelope.
pub const PROTOCOL_VERSION: &str = "1.0";

/// Upper bound on payloads accepted in one batch request.
pub const MAX_BATCH_SIZE: usize = 500;

/// API paths shared by the HTTP transport and any server binding.
pub mod paths {
    pub const FORMS: &str = "/api/v1/forms";
    pub const SUBMISSIONS: &str = "/api/v1/submissions";
}
