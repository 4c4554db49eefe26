//! Client database: form cache, pending queue, rejected submissions.

pub mod v001_form_cache;
pub mod v002_pending_queue;
pub mod v003_rejected_submissions;

use super::Migration;

pub const MIGRATIONS: &[Migration] = &[
    (v001_form_cache::MIGRATION_SQL, 1),
    (v002_pending_queue::MIGRATION_SQL, 2),
    (v003_rejected_submissions::MIGRATION_SQL, 3),
];
