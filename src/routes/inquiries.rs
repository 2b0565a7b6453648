use crate::db::Db;
use crate::error::{ApiError, ApiResult};
use crate::events::{EventBus, LivechatEvent};
use crate::inquiries;
use crate::models::{Page, PrioritizeInquiry, ServedBy, TakeInquiry};
use crate::permissions::{self, AuthUser, MANAGE_PRIORITIES, VIEW_ROOM};
use rocket::serde::json::Json;
use rocket::{FromForm, State, get, post, put};
use serde_json::{Value, json};

#[put("/api/v1/livechat/inquiry.prioritize", format = "json", data = "<body>")]
pub fn prioritize_inquiry(
    db: &State<Db>,
    events: &State<EventBus>,
    user: AuthUser,
    body: Json<PrioritizeInquiry>,
) -> ApiResult<Value> {
    let conn = db.conn();
    permissions::require_all(&conn, &user, &[MANAGE_PRIORITIES])?;
    let inquiry = inquiries::prioritize(&conn, &body)?;
    events.publish(LivechatEvent::InquiryPrioritized(inquiry));
    Ok(Json(json!({"success": true})))
}

#[post("/api/v1/livechat/inquiries.take", format = "json", data = "<body>")]
pub fn take_inquiry(
    db: &State<Db>,
    events: &State<EventBus>,
    user: AuthUser,
    body: Json<TakeInquiry>,
) -> ApiResult<Value> {
    let conn = db.conn();
    permissions::require_all(&conn, &user, &[VIEW_ROOM])?;

    let inquiry_id = body
        .inquiry_id
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::bad_request("The 'inquiryId' param is required"))?;

    // Taking on behalf of another agent; defaults to the caller
    let agent = match body.user_id.as_deref().map(str::trim) {
        Some(id) if !id.is_empty() && id != user.id => permissions::find_user(&conn, id)?
            .ok_or_else(|| ApiError::bad_request("Invalid user"))?,
        _ => ServedBy {
            id: user.id.clone(),
            username: user.username.clone(),
        },
    };

    let inquiry = inquiries::take(&conn, inquiry_id, &agent)?;
    events.publish(LivechatEvent::InquiryTaken(inquiry.clone()));
    Ok(Json(json!({"success": true, "inquiry": inquiry})))
}

#[derive(FromForm)]
pub struct RoomQuery<'r> {
    #[field(name = "roomId")]
    room_id: Option<&'r str>,
}

#[get("/api/v1/livechat/inquiries.getOne?<query..>")]
pub fn get_inquiry(db: &State<Db>, user: AuthUser, query: RoomQuery<'_>) -> ApiResult<Value> {
    let conn = db.conn();
    permissions::require_all(&conn, &user, &[VIEW_ROOM])?;
    let room_id = query
        .room_id
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::bad_request("The 'roomId' param is required"))?;
    let inquiry = inquiries::find_by_room(&conn, room_id)?;
    Ok(Json(json!({"success": true, "inquiry": inquiry})))
}

#[get("/api/v1/livechat/inquiries.queued?<offset>&<count>")]
pub fn list_queued(
    db: &State<Db>,
    user: AuthUser,
    offset: Option<i64>,
    count: Option<i64>,
) -> ApiResult<Value> {
    let conn = db.conn();
    permissions::require_all(&conn, &user, &[VIEW_ROOM])?;
    let page = Page::new(offset, count);
    let (queued, total) = inquiries::list_queued(&conn, page)?;
    Ok(Json(json!({
        "success": true,
        "inquiries": queued,
        "count": queued.len(),
        "offset": page.offset,
        "total": total
    })))
}
