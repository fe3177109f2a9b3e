//! Boolean app flags.

use rusqlite::{params, OptionalExtension};

use super::{Database, DbError, DbResult, FLAG_HAS_LAUNCHED, FLAG_LOGGED_IN};

/// Flags read at startup to pick the first screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartupFlags {
    pub first_launch: bool,
    pub logged_in: bool,
}

fn parse_flag(key: &str, value: &str) -> DbResult<bool> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        other => Err(DbError::Constraint(format!(
            "flag {} has non-boolean value {:?}",
            key, other
        ))),
    }
}

impl Database {
    /// Read a flag, or `None` when it was never written.
    pub fn get_flag(&self, key: &str) -> DbResult<Option<bool>> {
        let value: Option<String> = self
            .conn
            .query_row("SELECT value FROM app_flags WHERE key = ?", [key], |row| {
                row.get(0)
            })
            .optional()?;
        value.map(|v| parse_flag(key, &v)).transpose()
    }

    /// Read a flag, storing `default` on first read.
    pub fn read_flag_or_init(&self, key: &str, default: bool) -> DbResult<bool> {
        if let Some(value) = self.get_flag(key)? {
            return Ok(value);
        }
        self.conn.execute(
            "INSERT OR IGNORE INTO app_flags (key, value) VALUES (?1, ?2)",
            params![key, default.to_string()],
        )?;
        Ok(default)
    }

    pub fn set_flag(&self, key: &str, value: bool) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO app_flags (key, value) VALUES (?1, ?2)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = datetime('now')
            "#,
            params![key, value.to_string()],
        )?;
        Ok(())
    }

    /// Startup flags. Both default to `false` and are stored on first read.
    pub fn startup_flags(&self) -> DbResult<StartupFlags> {
        let launched = self.read_flag_or_init(FLAG_HAS_LAUNCHED, false)?;
        let logged_in = self.read_flag_or_init(FLAG_LOGGED_IN, false)?;
        Ok(StartupFlags {
            first_launch: !launched,
            logged_in,
        })
    }

    pub fn mark_launched(&self) -> DbResult<()> {
        self.set_flag(FLAG_HAS_LAUNCHED, true)
    }

    pub fn set_logged_in(&self, logged_in: bool) -> DbResult<()> {
        self.set_flag(FLAG_LOGGED_IN, logged_in)
    }
}
