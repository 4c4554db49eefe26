//! Span definitions per operation: flush, upsert, fill.

/// Create a flush span.
#[macro_export]
macro_rules! flush_span {
    ($pending:expr) => {
        tracing::info_span!("formsync.flush", pending = $pending)
    };
}

/// Create a server upsert span.
#[macro_export]
macro_rules! upsert_span {
    ($user_id:expr, $items:expr) => {
        tracing::info_span!("formsync.upsert", user_id = %$user_id, items = $items)
    };
}

/// Create a form fill span.
#[macro_export]
macro_rules! fill_span {
    ($form_id:expr) => {
        tracing::debug_span!("formsync.fill", form_id = %$form_id)
    };
}

/// Span names as constants for programmatic use.
pub mod names {
    pub const FLUSH: &str = "formsync.flush";
    pub const UPSERT: &str = "formsync.upsert";
    pub const FILL: &str = "formsync.fill";
}
