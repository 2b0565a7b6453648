use crate::config::AdminCredentials;
use base64::Engine;
use rusqlite::{Connection, OptionalExtension, params};
use sha2::{Digest, Sha256};
use std::sync::{Mutex, MutexGuard};

pub struct Db {
    conn: Mutex<Connection>,
}

/// Permissions seeded on first start, with the roles that hold them.
pub const DEFAULT_PERMISSIONS: &[(&str, &[&str])] = &[
    (
        crate::permissions::MANAGE_PRIORITIES,
        &["admin", "livechat-manager"],
    ),
    (
        crate::permissions::VIEW_ROOM,
        &["admin", "livechat-manager", "livechat-agent"],
    ),
    (crate::permissions::ACCESS_PERMISSIONS, &["admin"]),
];

/// Generate an auth token: `lc_<32 hex chars>`
pub fn generate_token() -> String {
    format!("lc_{:032x}", uuid::Uuid::new_v4().as_u128())
}

/// Tokens are stored as base64(sha256(token)); the raw token never touches disk.
pub fn hash_token(token: &str) -> String {
    base64::engine::general_purpose::STANDARD.encode(Sha256::digest(token.as_bytes()))
}

impl Db {
    pub fn open(path: &str) -> rusqlite::Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
        let db = Db {
            conn: Mutex::new(conn),
        };
        db.migrate()?;
        Ok(db)
    }

    /// Lock the connection. A panic while holding the lock leaves SQLite itself
    /// consistent, so a poisoned mutex is recovered rather than propagated.
    pub fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|e| {
            tracing::warn!("database mutex poisoned, recovering");
            e.into_inner()
        })
    }

    fn migrate(&self) -> rusqlite::Result<()> {
        let conn = self.conn();
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                username TEXT NOT NULL UNIQUE,
                roles TEXT NOT NULL DEFAULT '[]',
                hashed_token TEXT,
                created_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS permissions (
                id TEXT PRIMARY KEY,
                roles TEXT NOT NULL DEFAULT '[]',
                updated_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS visitors (
                id TEXT PRIMARY KEY,
                token TEXT NOT NULL UNIQUE,
                username TEXT NOT NULL,
                name TEXT,
                email TEXT,
                created_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS rooms (
                id TEXT PRIMARY KEY,
                visitor_id TEXT NOT NULL REFERENCES visitors(id) ON DELETE CASCADE,
                fname TEXT NOT NULL,
                open INTEGER NOT NULL DEFAULT 1,
                served_by TEXT,
                created_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS priorities (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                level TEXT NOT NULL,
                created_at TEXT NOT NULL,
                UNIQUE(name, level)
            );

            CREATE TABLE IF NOT EXISTS sla (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                due_time_in_minutes INTEGER NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS inquiries (
                id TEXT PRIMARY KEY,
                room_id TEXT NOT NULL UNIQUE REFERENCES rooms(id) ON DELETE CASCADE,
                name TEXT NOT NULL,
                status TEXT NOT NULL DEFAULT 'queued',
                sla_id TEXT REFERENCES sla(id) ON DELETE SET NULL,
                priority_id TEXT REFERENCES priorities(id) ON DELETE SET NULL,
                estimated_waiting_time_queue INTEGER,
                queued_at TEXT NOT NULL,
                taken_at TEXT,
                agent_id TEXT
            );

            CREATE INDEX IF NOT EXISTS idx_rooms_visitor_open ON rooms(visitor_id, open);
            CREATE INDEX IF NOT EXISTS idx_inquiries_status ON inquiries(status, estimated_waiting_time_queue, queued_at);
            CREATE INDEX IF NOT EXISTS idx_inquiries_sla ON inquiries(sla_id);",
        )?;

        let now = chrono::Utc::now().to_rfc3339();
        for (permission, roles) in DEFAULT_PERMISSIONS {
            let roles = serde_json::to_string(roles).unwrap_or_else(|_| "[]".to_string());
            conn.execute(
                "INSERT OR IGNORE INTO permissions (id, roles, updated_at) VALUES (?1, ?2, ?3)",
                params![permission, roles, &now],
            )?;
        }
        Ok(())
    }

    /// Create or refresh the administrator account. Returns the raw token when one
    /// had to be generated, so the caller can print it once.
    pub fn seed_admin(&self, admin: &AdminCredentials) -> rusqlite::Result<Option<String>> {
        let conn = self.conn();
        let existing: Option<Option<String>> = conn
            .query_row(
                "SELECT hashed_token FROM users WHERE id = ?1",
                params![&admin.user_id],
                |r| r.get(0),
            )
            .optional()?;

        let (hashed, generated) = match (&admin.token, existing) {
            (Some(token), _) => (hash_token(token), None),
            // Keep the token from a previous run
            (None, Some(Some(hashed))) => (hashed, None),
            (None, _) => {
                let token = generate_token();
                (hash_token(&token), Some(token))
            }
        };

        let now = chrono::Utc::now().to_rfc3339();
        conn.execute(
            "INSERT INTO users (id, username, roles, hashed_token, created_at) VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(id) DO UPDATE SET username = excluded.username, hashed_token = excluded.hashed_token",
            params![&admin.user_id, &admin.username, r#"["admin"]"#, &hashed, &now],
        )?;
        Ok(generated)
    }
}
