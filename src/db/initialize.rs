use crate::db::migrate::run_pending_migrations;
use crate::errors::AppResult;
use rusqlite::Connection;

/// Initialize the database.
/// Delegates all schema creation / upgrades to the migration engine and
/// returns its report of applied steps.
pub fn init_db(conn: &Connection) -> AppResult<Vec<String>> {
    Ok(run_pending_migrations(conn)?)
}
