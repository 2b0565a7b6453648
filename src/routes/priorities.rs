use crate::db::Db;
use crate::error::{ApiError, ApiResult};
use crate::models::{CreatePriority, Page};
use crate::permissions::{self, AuthUser, MANAGE_PRIORITIES, VIEW_ROOM};
use crate::priorities;
use rocket::serde::json::Json;
use rocket::{State, delete, get, post};
use serde_json::{Value, json};

use super::success_flat;

#[post("/api/v1/livechat/priorities", format = "json", data = "<body>")]
pub fn create_priority(
    db: &State<Db>,
    user: AuthUser,
    body: Json<CreatePriority>,
) -> ApiResult<Value> {
    let conn = db.conn();
    permissions::require_all(&conn, &user, &[MANAGE_PRIORITIES, VIEW_ROOM])?;
    let priority = priorities::create(&conn, body.name.as_deref(), body.level.as_deref())?;
    Ok(Json(json!({"success": true, "priority": priority})))
}

#[get("/api/v1/livechat/priorities?<text>&<offset>&<count>")]
pub fn list_priorities(
    db: &State<Db>,
    user: AuthUser,
    text: Option<&str>,
    offset: Option<i64>,
    count: Option<i64>,
) -> ApiResult<Value> {
    let conn = db.conn();
    permissions::require_all(&conn, &user, &[MANAGE_PRIORITIES, VIEW_ROOM])?;
    let page = Page::new(offset, count);
    let (priorities, total) = priorities::list(&conn, text, page)?;
    Ok(Json(json!({
        "success": true,
        "priorities": priorities,
        "count": priorities.len(),
        "offset": page.offset,
        "total": total
    })))
}

#[get("/api/v1/livechat/priority/<id>")]
pub fn get_priority(db: &State<Db>, user: AuthUser, id: &str) -> ApiResult<Value> {
    let conn = db.conn();
    permissions::require_all(&conn, &user, &[MANAGE_PRIORITIES, VIEW_ROOM])?;
    let priority =
        priorities::find(&conn, id)?.ok_or_else(|| ApiError::not_found("Priority not found"))?;
    Ok(Json(success_flat(&priority)))
}

#[delete("/api/v1/livechat/priority/<id>")]
pub fn delete_priority(db: &State<Db>, user: AuthUser, id: &str) -> ApiResult<Value> {
    let conn = db.conn();
    permissions::require_all(&conn, &user, &[MANAGE_PRIORITIES])?;
    priorities::delete(&conn, id)?;
    Ok(Json(json!({"success": true})))
}
