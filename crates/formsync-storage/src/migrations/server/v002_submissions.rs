//! v002: submission records.
//!
//! UNIQUE(user_id, form_id) is the reconciliation key: replays upsert into
//! the existing row instead of creating a second one.

pub const MIGRATION_SQL: &str = "
CREATE TABLE IF NOT EXISTS submissions (
    id                INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id           INTEGER NOT NULL,
    form_id           INTEGER NOT NULL REFERENCES forms(form_id),
    field_values      TEXT NOT NULL,
    status            TEXT NOT NULL DEFAULT 'submitted',
    submitted_at      TEXT NOT NULL,
    updated_at        TEXT NOT NULL,
    client_timestamp  TEXT NOT NULL,
    UNIQUE (user_id, form_id)
);

CREATE INDEX IF NOT EXISTS idx_submissions_user_updated
    ON submissions(user_id, updated_at DESC);
";
