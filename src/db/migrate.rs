use rusqlite::{Connection, OptionalExtension, Result};

/// Ensure that the `log` table exists with the modern schema.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

fn table_exists(conn: &Connection, name: &str) -> Result<bool> {
    let mut stmt = conn.prepare("SELECT name FROM sqlite_master WHERE type='table' AND name=?1")?;
    let exists: Option<String> = stmt.query_row([name], |row| row.get(0)).optional()?;
    Ok(exists.is_some())
}

fn migration_applied(conn: &Connection, version: &str) -> Result<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

fn mark_applied(conn: &Connection, version: &str, message: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (strftime('%Y-%m-%dT%H:%M:%SZ', 'now'), 'migration_applied', ?1, ?2)",
        [version, message],
    )?;
    Ok(())
}

/// Create the `members` table.
fn create_members_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS members (
            id                INTEGER PRIMARY KEY AUTOINCREMENT,
            full_name         TEXT NOT NULL,
            community_number  TEXT,
            qr_code           TEXT NOT NULL UNIQUE,
            created_at        TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_members_full_name ON members(full_name);
        "#,
    )?;
    Ok(())
}

/// Create the `attendance` table. Events die with their member.
fn create_attendance_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS attendance (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            member_id     INTEGER NOT NULL REFERENCES members(id) ON DELETE CASCADE,
            timestamp     TEXT NOT NULL,
            business_day  TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_attendance_member_ts ON attendance(member_id, timestamp);
        CREATE INDEX IF NOT EXISTS idx_attendance_ts ON attendance(timestamp);
        "#,
    )?;
    Ok(())
}

/// One event per member per business day, enforced by the store.
///
/// Older databases may hold same-day duplicates written before the index
/// existed; the most recent scan of each day is kept.
fn migrate_unique_member_day(conn: &Connection, applied: &mut Vec<String>) -> Result<()> {
    let version = "20260112_0003_unique_member_business_day";

    if migration_applied(conn, version)? {
        return Ok(());
    }

    let removed = conn.execute(
        "DELETE FROM attendance
         WHERE EXISTS (
             SELECT 1 FROM attendance b
             WHERE b.member_id = attendance.member_id
               AND b.business_day = attendance.business_day
               AND (b.timestamp > attendance.timestamp
                    OR (b.timestamp = attendance.timestamp AND b.id > attendance.id))
         )",
        [],
    )?;

    if removed > 0 {
        applied.push(format!(
            "Removed {removed} duplicate same-day attendance event(s) before adding the unique index."
        ));
    }

    conn.execute_batch(
        "CREATE UNIQUE INDEX IF NOT EXISTS uq_attendance_member_day
         ON attendance(member_id, business_day);",
    )?;

    mark_applied(
        conn,
        version,
        "Added unique (member_id, business_day) index to attendance",
    )?;

    applied.push(format!("Migration applied: {version}"));
    Ok(())
}

/// Public entry point: run all pending migrations.
///
/// Invoked by db::init_db(). Nothing is printed; the returned lines
/// describe what was applied, in order, and are left to the caller.
pub fn run_pending_migrations(conn: &Connection) -> Result<Vec<String>> {
    let mut applied = Vec::new();
    ensure_log_table(conn)?;

    if !table_exists(conn, "members")? {
        create_members_table(conn)?;
        mark_applied(conn, "20260105_0001_create_members", "Created members table")?;
        applied.push("Created members table.".to_string());
    }

    if !table_exists(conn, "attendance")? {
        create_attendance_table(conn)?;
        mark_applied(
            conn,
            "20260105_0002_create_attendance",
            "Created attendance table",
        )?;
        applied.push("Created attendance table.".to_string());
    }

    migrate_unique_member_day(conn, &mut applied)?;

    Ok(applied)
}
