//! Priority registry: named urgency levels. `(name, level)` pairs are unique.

use crate::error::ApiError;
use crate::models::{Page, Priority};
use rusqlite::{Connection, OptionalExtension, Row, params};

const MAX_NAME_LEN: usize = 100;

fn from_row(row: &Row<'_>) -> rusqlite::Result<Priority> {
    Ok(Priority {
        id: row.get(0)?,
        name: row.get(1)?,
        level: row.get(2)?,
        created_at: row.get(3)?,
    })
}

pub fn create(
    conn: &Connection,
    name: Option<&str>,
    level: Option<&str>,
) -> Result<Priority, ApiError> {
    let name = name.map(str::trim).unwrap_or_default();
    let level = level.map(str::trim).unwrap_or_default();
    if name.is_empty() || name.chars().count() > MAX_NAME_LEN {
        return Err(ApiError::bad_request("Priority name must be 1-100 characters"));
    }
    if level.is_empty() {
        return Err(ApiError::bad_request("Priority level is required"));
    }

    let priority = Priority {
        id: uuid::Uuid::new_v4().to_string(),
        name: name.to_string(),
        level: level.to_string(),
        created_at: chrono::Utc::now().to_rfc3339(),
    };

    match conn.execute(
        "INSERT INTO priorities (id, name, level, created_at) VALUES (?1, ?2, ?3, ?4)",
        params![&priority.id, &priority.name, &priority.level, &priority.created_at],
    ) {
        Ok(_) => {
            tracing::info!(
                id = %priority.id,
                name = %priority.name,
                level = %priority.level,
                "priority created"
            );
            Ok(priority)
        }
        Err(e) if e.to_string().contains("UNIQUE") => Err(ApiError::Conflict(format!(
            "Priority '{}' with level '{}' already exists",
            priority.name, priority.level
        ))),
        Err(e) => Err(e.into()),
    }
}

/// Priorities with the unpaged total. Numeric levels come first in numeric order
/// ("2" before "10"), then any other levels lexically; ties break on name.
pub fn list(
    conn: &Connection,
    text: Option<&str>,
    page: Page,
) -> Result<(Vec<Priority>, i64), ApiError> {
    let pattern = format!("%{}%", text.map(str::trim).unwrap_or_default().to_lowercase());
    let total: i64 = conn.query_row(
        "SELECT COUNT(*) FROM priorities WHERE LOWER(name) LIKE ?1",
        params![&pattern],
        |r| r.get(0),
    )?;
    let mut stmt = conn.prepare(
        "SELECT id, name, level, created_at FROM priorities WHERE LOWER(name) LIKE ?1
         ORDER BY (level = '' OR level GLOB '*[^0-9]*'), CAST(level AS INTEGER), level, name
         LIMIT ?2 OFFSET ?3",
    )?;
    let priorities = stmt
        .query_map(params![&pattern, page.count, page.offset], from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok((priorities, total))
}

pub fn find(conn: &Connection, id: &str) -> Result<Option<Priority>, ApiError> {
    Ok(conn
        .query_row(
            "SELECT id, name, level, created_at FROM priorities WHERE id = ?1",
            params![id],
            from_row,
        )
        .optional()?)
}

/// Delete a priority and detach it from every inquiry.
pub fn delete(conn: &Connection, id: &str) -> Result<(), ApiError> {
    let tx = conn.unchecked_transaction()?;
    tx.execute(
        "UPDATE inquiries SET priority_id = NULL WHERE priority_id = ?1",
        params![id],
    )?;
    let removed = tx.execute("DELETE FROM priorities WHERE id = ?1", params![id])?;
    if removed == 0 {
        return Err(ApiError::not_found("Priority not found"));
    }
    tx.commit()?;
    tracing::info!(%id, "priority deleted");
    Ok(())
}
