use crate::db::Db;
use crate::error::{ApiError, ApiResult};
use crate::models::{Page, SlaBody};
use crate::permissions::{self, AuthUser, MANAGE_PRIORITIES, VIEW_ROOM};
use crate::sla;
use rocket::serde::json::Json;
use rocket::{State, delete, get, post, put};
use serde_json::{Value, json};

use super::success_flat;

#[get("/api/v1/livechat/sla?<text>&<offset>&<count>")]
pub fn list_sla(
    db: &State<Db>,
    user: AuthUser,
    text: Option<&str>,
    offset: Option<i64>,
    count: Option<i64>,
) -> ApiResult<Value> {
    let conn = db.conn();
    permissions::require_all(&conn, &user, &[MANAGE_PRIORITIES, VIEW_ROOM])?;
    let page = Page::new(offset, count);
    let (slas, total) = sla::list(&conn, text, page)?;
    Ok(Json(json!({
        "success": true,
        "sla": slas,
        "count": slas.len(),
        "offset": page.offset,
        "total": total
    })))
}

#[post("/api/v1/livechat/sla", format = "json", data = "<body>")]
pub fn create_sla(db: &State<Db>, user: AuthUser, body: Json<SlaBody>) -> ApiResult<Value> {
    let conn = db.conn();
    permissions::require_all(&conn, &user, &[MANAGE_PRIORITIES])?;
    let created = sla::create(&conn, &body)?;
    Ok(Json(json!({"success": true, "sla": created})))
}

#[get("/api/v1/livechat/sla/<id>")]
pub fn get_sla(db: &State<Db>, user: AuthUser, id: &str) -> ApiResult<Value> {
    let conn = db.conn();
    permissions::require_all(&conn, &user, &[MANAGE_PRIORITIES, VIEW_ROOM])?;
    let found = sla::find(&conn, id)?.ok_or_else(|| ApiError::not_found("SLA not found"))?;
    Ok(Json(success_flat(&found)))
}

#[put("/api/v1/livechat/sla/<id>", format = "json", data = "<body>")]
pub fn update_sla(
    db: &State<Db>,
    user: AuthUser,
    id: &str,
    body: Json<SlaBody>,
) -> ApiResult<Value> {
    let conn = db.conn();
    permissions::require_all(&conn, &user, &[MANAGE_PRIORITIES])?;
    let updated = sla::update(&conn, id, &body)?;
    Ok(Json(json!({"success": true, "sla": updated})))
}

#[delete("/api/v1/livechat/sla/<id>")]
pub fn delete_sla(db: &State<Db>, user: AuthUser, id: &str) -> ApiResult<Value> {
    let conn = db.conn();
    permissions::require_all(&conn, &user, &[MANAGE_PRIORITIES])?;
    sla::delete(&conn, id)?;
    Ok(Json(json!({"success": true})))
}
