//! SLA registry: named due-time policies attachable to queued inquiries.

use crate::error::ApiError;
use crate::models::{Page, Sla, SlaBody};
use rusqlite::{Connection, OptionalExtension, Row, params};

const MAX_NAME_LEN: usize = 100;

const COLUMNS: &str = "id, name, description, due_time_in_minutes, created_at, updated_at";

fn from_row(row: &Row<'_>) -> rusqlite::Result<Sla> {
    Ok(Sla {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        due_time_in_minutes: row.get(3)?,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
    })
}

/// Validated fields of a create/update body.
struct SlaFields {
    name: String,
    description: String,
    due_time_in_minutes: i64,
}

fn validate(body: &SlaBody) -> Result<SlaFields, ApiError> {
    let name = body.name.as_deref().map(str::trim).unwrap_or_default();
    if name.is_empty() || name.chars().count() > MAX_NAME_LEN {
        return Err(ApiError::bad_request("SLA name must be 1-100 characters"));
    }
    // Any JSON number with an integral value: 30 and 30.0 are both accepted
    let due = body
        .due_time_in_minutes
        .as_ref()
        .and_then(|v| {
            v.as_i64().or_else(|| {
                v.as_f64()
                    .filter(|f| f.fract() == 0.0 && *f <= i64::MAX as f64)
                    .map(|f| f as i64)
            })
        })
        .filter(|m| *m > 0)
        .ok_or_else(|| ApiError::bad_request("dueTimeInMinutes must be a positive integer"))?;
    Ok(SlaFields {
        name: name.to_string(),
        description: body.description.clone().unwrap_or_default(),
        due_time_in_minutes: due,
    })
}

pub fn create(conn: &Connection, body: &SlaBody) -> Result<Sla, ApiError> {
    let fields = validate(body)?;
    let now = chrono::Utc::now().to_rfc3339();
    let sla = Sla {
        id: uuid::Uuid::new_v4().to_string(),
        name: fields.name,
        description: fields.description,
        due_time_in_minutes: fields.due_time_in_minutes,
        created_at: now.clone(),
        updated_at: now,
    };
    conn.execute(
        "INSERT INTO sla (id, name, description, due_time_in_minutes, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            &sla.id,
            &sla.name,
            &sla.description,
            sla.due_time_in_minutes,
            &sla.created_at,
            &sla.updated_at
        ],
    )?;
    tracing::info!(
        id = %sla.id,
        name = %sla.name,
        due = sla.due_time_in_minutes,
        "sla created"
    );
    Ok(sla)
}

pub fn list(
    conn: &Connection,
    text: Option<&str>,
    page: Page,
) -> Result<(Vec<Sla>, i64), ApiError> {
    let pattern = format!("%{}%", text.map(str::trim).unwrap_or_default().to_lowercase());
    let total: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sla WHERE LOWER(name) LIKE ?1",
        params![&pattern],
        |r| r.get(0),
    )?;
    let sql = format!(
        "SELECT {COLUMNS} FROM sla WHERE LOWER(name) LIKE ?1 ORDER BY name, created_at LIMIT ?2 OFFSET ?3"
    );
    let mut stmt = conn.prepare(&sql)?;
    let slas = stmt
        .query_map(params![&pattern, page.count, page.offset], from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok((slas, total))
}

pub fn find(conn: &Connection, id: &str) -> Result<Option<Sla>, ApiError> {
    let sql = format!("SELECT {COLUMNS} FROM sla WHERE id = ?1");
    Ok(conn.query_row(&sql, params![id], from_row).optional()?)
}

/// Look up by id first, then by exact name (oldest wins when names repeat).
pub fn find_by_id_or_name(conn: &Connection, key: &str) -> Result<Option<Sla>, ApiError> {
    if let Some(sla) = find(conn, key)? {
        return Ok(Some(sla));
    }
    let sql = format!("SELECT {COLUMNS} FROM sla WHERE name = ?1 ORDER BY created_at LIMIT 1");
    Ok(conn.query_row(&sql, params![key], from_row).optional()?)
}

/// Update an SLA and re-apply its due time to the inquiries still queued under it.
pub fn update(conn: &Connection, id: &str, body: &SlaBody) -> Result<Sla, ApiError> {
    let fields = validate(body)?;
    let now = chrono::Utc::now().to_rfc3339();
    let tx = conn.unchecked_transaction()?;
    let changed = tx.execute(
        "UPDATE sla SET name = ?1, description = ?2, due_time_in_minutes = ?3, updated_at = ?4 WHERE id = ?5",
        params![
            &fields.name,
            &fields.description,
            fields.due_time_in_minutes,
            &now,
            id
        ],
    )?;
    if changed == 0 {
        return Err(ApiError::not_found("SLA not found"));
    }
    let requeued = tx.execute(
        "UPDATE inquiries SET estimated_waiting_time_queue = ?1 WHERE sla_id = ?2 AND status = 'queued'",
        params![fields.due_time_in_minutes, id],
    )?;
    tx.commit()?;
    tracing::info!(%id, requeued, "sla updated");

    find(conn, id)?.ok_or_else(|| ApiError::not_found("SLA not found"))
}

/// Delete an SLA and detach it from every inquiry.
pub fn delete(conn: &Connection, id: &str) -> Result<(), ApiError> {
    let tx = conn.unchecked_transaction()?;
    tx.execute(
        "UPDATE inquiries SET sla_id = NULL, estimated_waiting_time_queue = NULL WHERE sla_id = ?1",
        params![id],
    )?;
    let removed = tx.execute("DELETE FROM sla WHERE id = ?1", params![id])?;
    if removed == 0 {
        return Err(ApiError::not_found("SLA not found"));
    }
    tx.commit()?;
    tracing::info!(%id, "sla deleted");
    Ok(())
}
