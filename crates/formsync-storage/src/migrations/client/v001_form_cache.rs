//! v001: cached form definitions, keyed by form id and overwritten on refresh.

pub const MIGRATION_SQL: &str = "
CREATE TABLE IF NOT EXISTS form_cache (
    form_id     INTEGER PRIMARY KEY,
    title       TEXT NOT NULL,
    definition  TEXT NOT NULL,
    fetched_at  TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_form_cache_title ON form_cache(title);
";
