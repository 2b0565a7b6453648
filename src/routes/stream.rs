use crate::db::Db;
use crate::events::EventBus;
use crate::permissions::{self, AuthUser, VIEW_ROOM};
use rocket::http::Status;
use rocket::response::stream::{Event, EventStream};
use rocket::serde::json::Json;
use rocket::{State, get};
use serde_json::Value;
use tokio::sync::broadcast::error::RecvError;
use tokio::time::{Duration, interval};

/// Live feed of inquiry changes for agents watching the queue.
#[get("/api/v1/livechat/inquiries.stream")]
pub fn inquiry_stream(
    db: &State<Db>,
    events: &State<EventBus>,
    user: AuthUser,
) -> Result<EventStream![], (Status, Json<Value>)> {
    {
        let conn = db.conn();
        permissions::require_all(&conn, &user, &[VIEW_ROOM])?;
    }
    let mut rx = events.subscribe();
    tracing::debug!(user = %user.username, "inquiry stream opened");

    Ok(EventStream! {
        let mut heartbeat = interval(Duration::from_secs(15));

        loop {
            tokio::select! {
                event = rx.recv() => {
                    match event {
                        Ok(event) => {
                            yield Event::json(event.inquiry()).event(event.name());
                        }
                        Err(RecvError::Lagged(n)) => {
                            tracing::warn!(missed = n, "inquiry stream lagged");
                        }
                        Err(RecvError::Closed) => break,
                    }
                }
                _ = heartbeat.tick() => {
                    let now = chrono::Utc::now().to_rfc3339();
                    yield Event::json(&serde_json::json!({"time": now})).event("heartbeat");
                }
            }
        }
    })
}
