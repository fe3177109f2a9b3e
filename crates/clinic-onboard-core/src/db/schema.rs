//! SQLite schema definition.

/// Local storage schema for the clinic client.
///
/// Only small device-level flags live here; registration drafts are never
/// persisted.
pub const SCHEMA: &str = r#"
-- ============================================================================
-- App flags (first launch, login state)
-- ============================================================================

CREATE TABLE IF NOT EXISTS app_flags (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,                          -- 'true' / 'false'
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);
"#;

/// Flag keys.
pub const FLAG_HAS_LAUNCHED: &str = "has_launched_before";
pub const FLAG_LOGGED_IN: &str = "is_logged_in";
