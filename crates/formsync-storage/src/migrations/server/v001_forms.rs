//! v001: published forms, owned by a tenant.

pub const MIGRATION_SQL: &str = "
CREATE TABLE IF NOT EXISTS forms (
    form_id       INTEGER PRIMARY KEY,
    tenant_id     INTEGER NOT NULL,
    title         TEXT NOT NULL,
    definition    TEXT NOT NULL,
    published_at  TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_forms_tenant_title ON forms(tenant_id, title);
";
