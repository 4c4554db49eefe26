//! v002: append-only queue of submissions awaiting server acknowledgment.
//!
//! AUTOINCREMENT keeps `seq` monotonic across clears, so a high-water mark
//! taken at drain time never covers a later enqueue.

pub const MIGRATION_SQL: &str = "
CREATE TABLE IF NOT EXISTS pending_submissions (
    seq               INTEGER PRIMARY KEY AUTOINCREMENT,
    submission_id     TEXT NOT NULL UNIQUE,
    form_id           INTEGER NOT NULL,
    field_values      TEXT NOT NULL,
    client_timestamp  TEXT NOT NULL,
    enqueued_at       TEXT NOT NULL
);
";
