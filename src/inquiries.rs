//! Inquiry queue and the prioritization rule.
//!
//! An inquiry is created `queued` when a visitor opens a room and becomes
//! `taken` once an agent claims it. SLA and priority can only be attached
//! while it is still queued.

use crate::error::ApiError;
use crate::models::{Inquiry, InquiryStatus, Page, PrioritizeInquiry, ServedBy};
use crate::{priorities, sla};
use rusqlite::{Connection, OptionalExtension, Row, params};

const COLUMNS: &str = "id, room_id, name, status, sla_id, priority_id, estimated_waiting_time_queue, queued_at, taken_at, agent_id";

fn from_row(row: &Row<'_>) -> rusqlite::Result<Inquiry> {
    let status: String = row.get(3)?;
    Ok(Inquiry {
        id: row.get(0)?,
        rid: row.get(1)?,
        name: row.get(2)?,
        status: InquiryStatus::parse(&status),
        sla_id: row.get(4)?,
        priority_id: row.get(5)?,
        estimated_waiting_time_queue: row.get(6)?,
        ts: row.get(7)?,
        taken_at: row.get(8)?,
        agent_id: row.get(9)?,
    })
}

pub fn find(conn: &Connection, id: &str) -> Result<Option<Inquiry>, ApiError> {
    let sql = format!("SELECT {COLUMNS} FROM inquiries WHERE id = ?1");
    Ok(conn.query_row(&sql, params![id], from_row).optional()?)
}

pub fn find_by_room(conn: &Connection, room_id: &str) -> Result<Option<Inquiry>, ApiError> {
    let sql = format!("SELECT {COLUMNS} FROM inquiries WHERE room_id = ?1");
    Ok(conn.query_row(&sql, params![room_id], from_row).optional()?)
}

/// Put a freshly opened room in the queue.
pub fn enqueue(conn: &Connection, room_id: &str, name: &str) -> Result<Inquiry, ApiError> {
    let inquiry = Inquiry {
        id: uuid::Uuid::new_v4().to_string(),
        rid: room_id.to_string(),
        name: name.to_string(),
        status: InquiryStatus::Queued,
        sla_id: None,
        priority_id: None,
        estimated_waiting_time_queue: None,
        ts: chrono::Utc::now().to_rfc3339(),
        taken_at: None,
        agent_id: None,
    };
    conn.execute(
        "INSERT INTO inquiries (id, room_id, name, status, queued_at) VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            &inquiry.id,
            &inquiry.rid,
            &inquiry.name,
            inquiry.status.as_str(),
            &inquiry.ts
        ],
    )?;
    tracing::info!(id = %inquiry.id, room = %inquiry.rid, "inquiry queued");
    Ok(inquiry)
}

/// Queued inquiries, most urgent first: SLA due time ascending (no SLA last), then arrival.
pub fn list_queued(conn: &Connection, page: Page) -> Result<(Vec<Inquiry>, i64), ApiError> {
    let total: i64 = conn.query_row(
        "SELECT COUNT(*) FROM inquiries WHERE status = 'queued'",
        [],
        |r| r.get(0),
    )?;
    let sql = format!(
        "SELECT {COLUMNS} FROM inquiries WHERE status = 'queued'
         ORDER BY estimated_waiting_time_queue IS NULL, estimated_waiting_time_queue, queued_at
         LIMIT ?1 OFFSET ?2"
    );
    let mut stmt = conn.prepare(&sql)?;
    let inquiries = stmt
        .query_map(params![page.count, page.offset], from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok((inquiries, total))
}

/// Claim a queued inquiry for `agent` and mark the agent as serving the room.
pub fn take(conn: &Connection, inquiry_id: &str, agent: &ServedBy) -> Result<Inquiry, ApiError> {
    let inquiry = find(conn, inquiry_id)?
        .ok_or_else(|| ApiError::bad_request("Inquiry not found"))?;
    if inquiry.status != InquiryStatus::Queued {
        return Err(ApiError::bad_request("Inquiry already taken"));
    }

    let now = chrono::Utc::now().to_rfc3339();
    let tx = conn.unchecked_transaction()?;
    tx.execute(
        "UPDATE inquiries SET status = ?1, taken_at = ?2, agent_id = ?3 WHERE id = ?4",
        params![InquiryStatus::Taken.as_str(), &now, &agent.id, inquiry_id],
    )?;
    tx.execute(
        "UPDATE rooms SET served_by = ?1 WHERE id = ?2",
        params![&agent.id, &inquiry.rid],
    )?;
    tx.commit()?;
    tracing::info!(id = %inquiry_id, agent = %agent.username, "inquiry taken");

    find(conn, inquiry_id)?.ok_or_else(|| ApiError::bad_request("Inquiry not found"))
}

/// Attach an SLA (and optionally a priority) to the queued inquiry of a room.
///
/// Every precondition failure is a 400 and leaves the inquiry untouched.
pub fn prioritize(conn: &Connection, req: &PrioritizeInquiry) -> Result<Inquiry, ApiError> {
    let room_id = req
        .room_id
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::bad_request("The 'roomId' param is required"))?;
    let sla_key = req
        .sla
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::bad_request("The 'sla' param is required"))?;

    let inquiry = find_by_room(conn, room_id)?
        .ok_or_else(|| ApiError::bad_request("error-invalid-inquiry"))?;
    if inquiry.status != InquiryStatus::Queued {
        return Err(ApiError::bad_request("error-invalid-inquiry"));
    }

    let sla = sla::find_by_id_or_name(conn, sla_key)?
        .ok_or_else(|| ApiError::bad_request("error-invalid-sla"))?;

    let priority_id = match req.priority.as_deref().map(str::trim) {
        Some(id) if !id.is_empty() => Some(
            priorities::find(conn, id)?
                .ok_or_else(|| ApiError::bad_request("error-invalid-priority"))?
                .id,
        ),
        _ => inquiry.priority_id.clone(),
    };

    conn.execute(
        "UPDATE inquiries SET sla_id = ?1, estimated_waiting_time_queue = ?2, priority_id = ?3
         WHERE id = ?4 AND status = 'queued'",
        params![&sla.id, sla.due_time_in_minutes, &priority_id, &inquiry.id],
    )?;
    tracing::info!(
        inquiry = %inquiry.id,
        room = %room_id,
        sla = %sla.name,
        due = sla.due_time_in_minutes,
        "inquiry prioritized"
    );

    find(conn, &inquiry.id)?.ok_or_else(|| ApiError::bad_request("error-invalid-inquiry"))
}
