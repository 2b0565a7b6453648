//! Role-based permission gate.
//!
//! A principal holds a permission iff one of its roles is listed on that
//! permission. Role lists live in the `permissions` table and can be changed at
//! runtime through `permissions.update`, so every check reads the current state.

use crate::db::hash_token;
use crate::error::ApiError;
use crate::models::{Permission, ServedBy};
use rusqlite::{Connection, OptionalExtension, params};

pub const MANAGE_PRIORITIES: &str = "manage-livechat-priorities";
pub const VIEW_ROOM: &str = "view-l-room";
pub const ACCESS_PERMISSIONS: &str = "access-permissions";

/// The authenticated caller of a request.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: String,
    pub username: String,
    pub roles: Vec<String>,
}

fn parse_roles(raw: &str) -> Vec<String> {
    serde_json::from_str(raw).unwrap_or_default()
}

/// Resolve `X-User-Id` / `X-Auth-Token` to a user.
pub fn authenticate(conn: &Connection, user_id: &str, token: &str) -> Result<AuthUser, ApiError> {
    let row: Option<(String, String, Option<String>)> = conn
        .query_row(
            "SELECT username, roles, hashed_token FROM users WHERE id = ?1",
            params![user_id],
            |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
        )
        .optional()?;

    match row {
        Some((username, roles, Some(hashed))) if hashed == hash_token(token) => Ok(AuthUser {
            id: user_id.to_string(),
            username,
            roles: parse_roles(&roles),
        }),
        _ => Err(ApiError::Unauthenticated),
    }
}

pub fn find_user(conn: &Connection, user_id: &str) -> Result<Option<ServedBy>, ApiError> {
    Ok(conn
        .query_row(
            "SELECT id, username FROM users WHERE id = ?1",
            params![user_id],
            |r| {
                Ok(ServedBy {
                    id: r.get(0)?,
                    username: r.get(1)?,
                })
            },
        )
        .optional()?)
}

pub fn has_permission(
    conn: &Connection,
    user: &AuthUser,
    permission: &str,
) -> Result<bool, ApiError> {
    let roles: Option<String> = conn
        .query_row(
            "SELECT roles FROM permissions WHERE id = ?1",
            params![permission],
            |r| r.get(0),
        )
        .optional()?;
    let granted = roles.map(|r| parse_roles(&r)).unwrap_or_default();
    Ok(user.roles.iter().any(|role| granted.contains(role)))
}

/// Fail with 403 unless the user holds every listed permission.
pub fn require_all(
    conn: &Connection,
    user: &AuthUser,
    permissions: &[&str],
) -> Result<(), ApiError> {
    for permission in permissions {
        if !has_permission(conn, user, permission)? {
            tracing::debug!(user = %user.username, permission, "permission denied");
            return Err(ApiError::Forbidden(permissions.join(", ")));
        }
    }
    Ok(())
}

pub fn list_all(conn: &Connection) -> Result<Vec<Permission>, ApiError> {
    let mut stmt = conn.prepare("SELECT id, roles, updated_at FROM permissions ORDER BY id")?;
    let permissions = stmt
        .query_map([], |row| {
            let roles: String = row.get(1)?;
            Ok(Permission {
                id: row.get(0)?,
                roles: parse_roles(&roles),
                updated_at: row.get(2)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(permissions)
}

/// Replace the role lists of existing permissions. All-or-nothing: an unknown
/// permission id rejects the whole batch.
pub fn update(conn: &Connection, updates: &[Permission]) -> Result<(), ApiError> {
    for update in updates {
        let exists: bool = conn
            .query_row(
                "SELECT COUNT(*) FROM permissions WHERE id = ?1",
                params![&update.id],
                |r| r.get::<_, i64>(0),
            )?
            > 0;
        if !exists {
            return Err(ApiError::bad_request(format!(
                "Invalid permission: {}",
                update.id
            )));
        }
        if update.roles.iter().any(|r| r.trim().is_empty()) {
            return Err(ApiError::bad_request("Role names must not be empty"));
        }
    }

    let now = chrono::Utc::now().to_rfc3339();
    let tx = conn.unchecked_transaction()?;
    for update in updates {
        let roles = serde_json::to_string(&update.roles).unwrap_or_else(|_| "[]".to_string());
        tx.execute(
            "UPDATE permissions SET roles = ?1, updated_at = ?2 WHERE id = ?3",
            params![roles, &now, &update.id],
        )?;
        tracing::info!(permission = %update.id, roles = ?update.roles, "permission updated");
    }
    tx.commit()?;
    Ok(())
}
