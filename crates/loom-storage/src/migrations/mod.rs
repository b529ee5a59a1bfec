//! Schema migrations, applied in order against the write connection.

mod v001_core_schema;

use rusqlite::Connection;

use loom_core::errors::LoomResult;

use crate::to_storage_err;

const MIGRATIONS: &[(u32, fn(&Connection) -> LoomResult<()>)] = &[(1, v001_core_schema::migrate)];

/// Apply every migration newer than the schema's current `user_version`.
pub fn run_migrations(conn: &Connection) -> LoomResult<()> {
    let current: u32 = conn
        .pragma_query_value(None, "user_version", |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))?;

    for (version, migrate) in MIGRATIONS {
        if *version > current {
            migrate(conn).map_err(|e| {
                to_storage_err(format!("migration v{version} failed: {e}"))
            })?;
            conn.pragma_update(None, "user_version", version)
                .map_err(|e| to_storage_err(e.to_string()))?;
        }
    }
    Ok(())
}
