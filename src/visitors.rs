//! Anonymous livechat visitors and their rooms.

use crate::error::ApiError;
use crate::inquiries;
use crate::models::{Inquiry, Room, RoomVisitor, ServedBy, Visitor, VisitorFields};
use rusqlite::{Connection, OptionalExtension, params};

const MAX_TOKEN_LEN: usize = 200;

pub fn find_by_token(conn: &Connection, token: &str) -> Result<Option<Visitor>, ApiError> {
    Ok(conn
        .query_row(
            "SELECT id, token, username, name, email FROM visitors WHERE token = ?1",
            params![token],
            |row| {
                Ok(Visitor {
                    id: row.get(0)?,
                    token: row.get(1)?,
                    username: row.get(2)?,
                    name: row.get(3)?,
                    email: row.get(4)?,
                })
            },
        )
        .optional()?)
}

/// Register a visitor, or refresh name/email of the one already holding `token`.
pub fn register(conn: &Connection, fields: &VisitorFields) -> Result<Visitor, ApiError> {
    let token = fields
        .token
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty() && t.len() <= MAX_TOKEN_LEN)
        .ok_or_else(|| ApiError::bad_request("Visitor token must be 1-200 characters"))?;
    let name = fields.name.as_deref().map(str::trim).filter(|s| !s.is_empty());
    let email = fields.email.as_deref().map(str::trim).filter(|s| !s.is_empty());

    if find_by_token(conn, token)?.is_some() {
        conn.execute(
            "UPDATE visitors SET name = COALESCE(?1, name), email = COALESCE(?2, email) WHERE token = ?3",
            params![name, email, token],
        )?;
    } else {
        let id = uuid::Uuid::new_v4().to_string();
        let username = format!("guest-{}", &id[..8]);
        conn.execute(
            "INSERT INTO visitors (id, token, username, name, email, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![&id, token, &username, name, email, chrono::Utc::now().to_rfc3339()],
        )?;
        tracing::info!(%id, %username, "visitor registered");
    }

    find_by_token(conn, token)?.ok_or_else(|| ApiError::bad_request("invalid-token"))
}

pub fn find_room(conn: &Connection, room_id: &str) -> Result<Option<Room>, ApiError> {
    Ok(conn
        .query_row(
            "SELECT r.id, r.fname, r.open, r.created_at, v.id, v.token, v.username, u.id, u.username
             FROM rooms r
             JOIN visitors v ON v.id = r.visitor_id
             LEFT JOIN users u ON u.id = r.served_by
             WHERE r.id = ?1",
            params![room_id],
            |row| {
                let served_id: Option<String> = row.get(7)?;
                let served_name: Option<String> = row.get(8)?;
                Ok(Room {
                    id: row.get(0)?,
                    t: "l",
                    fname: row.get(1)?,
                    open: row.get(2)?,
                    ts: row.get(3)?,
                    v: RoomVisitor {
                        id: row.get(4)?,
                        token: row.get(5)?,
                        username: row.get(6)?,
                    },
                    served_by: served_id
                        .zip(served_name)
                        .map(|(id, username)| ServedBy { id, username }),
                })
            },
        )
        .optional()?)
}

/// Return the visitor's open room, or open a new one and queue its inquiry.
///
/// The `bool` is true when a room was created by this call.
pub fn open_room(
    conn: &Connection,
    token: &str,
) -> Result<(Room, Option<Inquiry>, bool), ApiError> {
    let visitor = find_by_token(conn, token.trim())?
        .ok_or_else(|| ApiError::bad_request("invalid-token"))?;

    let existing: Option<String> = conn
        .query_row(
            "SELECT id FROM rooms WHERE visitor_id = ?1 AND open = 1 ORDER BY created_at DESC LIMIT 1",
            params![&visitor.id],
            |r| r.get(0),
        )
        .optional()?;
    if let Some(room_id) = existing {
        let room = find_room(conn, &room_id)?
            .ok_or_else(|| ApiError::bad_request("invalid-room"))?;
        return Ok((room, None, false));
    }

    let room_id = uuid::Uuid::new_v4().to_string();
    let fname = visitor.name.clone().unwrap_or_else(|| visitor.username.clone());
    let tx = conn.unchecked_transaction()?;
    tx.execute(
        "INSERT INTO rooms (id, visitor_id, fname, open, created_at) VALUES (?1, ?2, ?3, 1, ?4)",
        params![&room_id, &visitor.id, &fname, chrono::Utc::now().to_rfc3339()],
    )?;
    let inquiry = inquiries::enqueue(&tx, &room_id, &fname)?;
    tx.commit()?;
    tracing::info!(room = %room_id, visitor = %visitor.username, "livechat room opened");

    let room = find_room(conn, &room_id)?
        .ok_or_else(|| ApiError::bad_request("invalid-room"))?;
    Ok((room, Some(inquiry), true))
}
