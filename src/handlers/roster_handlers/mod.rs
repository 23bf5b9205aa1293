pub mod admin;
pub mod api;
pub mod import;
pub mod public;

use sqlx::PgPool;

use crate::models::roster::{PgRosterStore, RosterImporter};

fn importer(pool: &PgPool) -> RosterImporter<PgRosterStore> {
    RosterImporter::new(PgRosterStore::new(pool.clone()))
}
