use crate::db::Db;
use crate::error::ApiError;
use crate::events::{EventBus, LivechatEvent};
use crate::models::RegisterVisitor;
use crate::rate_limit::{RateLimitConfig, RateLimited, RateLimiter};
use crate::visitors;
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::{State, get, post};
use serde_json::{Value, json};

use super::ClientIp;

type LimitedResult = Result<RateLimited<Value>, (Status, Json<Value>)>;

#[post("/api/v1/livechat/visitor", format = "json", data = "<body>")]
pub fn register_visitor(
    db: &State<Db>,
    rate_limiter: &State<RateLimiter>,
    rate_config: &State<RateLimitConfig>,
    ip: ClientIp,
    body: Json<RegisterVisitor>,
) -> LimitedResult {
    let rl = rate_limiter.check_with_info(
        &format!("register_visitor:{}", ip.0),
        rate_config.visitors_max,
        rate_config.visitors_window_secs,
    );
    if !rl.allowed {
        return Err(ApiError::RateLimited {
            limit: rl.limit,
            window_secs: rate_config.visitors_window_secs,
            retry_after_secs: rl.retry_after_secs,
        }
        .into());
    }

    let fields = body
        .visitor
        .as_ref()
        .ok_or_else(|| ApiError::bad_request("The 'visitor' param is required"))?;
    let conn = db.conn();
    let visitor = visitors::register(&conn, fields)?;
    Ok(RateLimited::new(
        Json(json!({"success": true, "visitor": visitor})),
        rl,
    ))
}

#[get("/api/v1/livechat/room?<token>")]
pub fn open_room(
    db: &State<Db>,
    events: &State<EventBus>,
    rate_limiter: &State<RateLimiter>,
    rate_config: &State<RateLimitConfig>,
    ip: ClientIp,
    token: Option<&str>,
) -> LimitedResult {
    let rl = rate_limiter.check_with_info(
        &format!("open_room:{}", ip.0),
        rate_config.rooms_max,
        rate_config.rooms_window_secs,
    );
    if !rl.allowed {
        return Err(ApiError::RateLimited {
            limit: rl.limit,
            window_secs: rate_config.rooms_window_secs,
            retry_after_secs: rl.retry_after_secs,
        }
        .into());
    }

    let token = token
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::bad_request("The 'token' param is required"))?;
    let conn = db.conn();
    let (room, inquiry, new_room) = visitors::open_room(&conn, token)?;
    if let Some(inquiry) = inquiry {
        events.publish(LivechatEvent::InquiryQueued(inquiry));
    }
    Ok(RateLimited::new(
        Json(json!({"success": true, "room": room, "newRoom": new_room})),
        rl,
    ))
}
