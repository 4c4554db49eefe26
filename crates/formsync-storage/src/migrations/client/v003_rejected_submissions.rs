//! v003: submissions the server processed and refused.

pub const MIGRATION_SQL: &str = "
CREATE TABLE IF NOT EXISTS rejected_submissions (
    id                INTEGER PRIMARY KEY AUTOINCREMENT,
    submission_id     TEXT NOT NULL,
    form_id           INTEGER NOT NULL,
    field_values      TEXT NOT NULL,
    client_timestamp  TEXT NOT NULL,
    reason            TEXT NOT NULL,
    rejected_at       TEXT NOT NULL
);
";
