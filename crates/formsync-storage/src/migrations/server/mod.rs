//! Server database: published forms and submission records.

pub mod v001_forms;
pub mod v002_submissions;

use super::Migration;

pub const MIGRATIONS: &[Migration] = &[
    (v001_forms::MIGRATION_SQL, 1),
    (v002_submissions::MIGRATION_SQL, 2),
];
