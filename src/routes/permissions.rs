use crate::db::Db;
use crate::error::{ApiError, ApiResult};
use crate::models::UpdatePermissions;
use crate::permissions::{self, ACCESS_PERMISSIONS, AuthUser};
use rocket::serde::json::Json;
use rocket::{State, get, post};
use serde_json::{Value, json};

#[get("/api/v1/permissions.listAll")]
pub fn list_permissions(db: &State<Db>, _user: AuthUser) -> ApiResult<Value> {
    let conn = db.conn();
    let all = permissions::list_all(&conn)?;
    Ok(Json(json!({"success": true, "permissions": all})))
}

#[post("/api/v1/permissions.update", format = "json", data = "<body>")]
pub fn update_permissions(
    db: &State<Db>,
    user: AuthUser,
    body: Json<UpdatePermissions>,
) -> ApiResult<Value> {
    let conn = db.conn();
    permissions::require_all(&conn, &user, &[ACCESS_PERMISSIONS])?;
    let updates = body
        .permissions
        .as_deref()
        .filter(|p| !p.is_empty())
        .ok_or_else(|| ApiError::bad_request("The 'permissions' param is required"))?;
    permissions::update(&conn, updates)?;
    let all = permissions::list_all(&conn)?;
    Ok(Json(json!({"success": true, "permissions": all})))
}
