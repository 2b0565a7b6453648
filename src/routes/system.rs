use rocket::http::{ContentType, Status};
use rocket::serde::json::Json;
use rocket::{catch, get, post, put};
use serde_json::{Value, json};
use std::path::PathBuf;

#[get("/api/v1/health")]
pub fn health() -> Json<Value> {
    Json(json!({
        "success": true,
        "status": "ok",
        "service": "livechat-sla",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

// Every POST/PUT body route requires `format = "json"`. A body with another
// content type matches none of them and lands on these fallbacks.

fn unmatched_body(content_type: Option<&ContentType>) -> (Status, Json<Value>) {
    if content_type.is_some_and(|ct| ct.is_json()) {
        return (
            Status::NotFound,
            Json(json!({"success": false, "error": "Not found"})),
        );
    }
    (
        Status::UnsupportedMediaType,
        Json(json!({"success": false, "error": "Content-Type must be application/json"})),
    )
}

#[post("/api/v1/<_path..>", rank = 20)]
pub fn unmatched_post(
    _path: PathBuf,
    content_type: Option<&ContentType>,
) -> (Status, Json<Value>) {
    unmatched_body(content_type)
}

#[put("/api/v1/<_path..>", rank = 20)]
pub fn unmatched_put(
    _path: PathBuf,
    content_type: Option<&ContentType>,
) -> (Status, Json<Value>) {
    unmatched_body(content_type)
}

// Catchers keep router-level failures in the same `{success: false}` shape as handler errors.

#[catch(400)]
pub fn bad_request() -> Json<Value> {
    Json(json!({"success": false, "error": "Malformed request"}))
}

#[catch(401)]
pub fn unauthorized() -> Json<Value> {
    Json(json!({"success": false, "error": "You must be logged in to do this."}))
}

#[catch(403)]
pub fn forbidden() -> Json<Value> {
    Json(json!({"success": false, "error": "Forbidden"}))
}

#[catch(404)]
pub fn not_found() -> Json<Value> {
    Json(json!({"success": false, "error": "Not found"}))
}

#[catch(422)]
pub fn unprocessable() -> Json<Value> {
    Json(json!({"success": false, "error": "Request body has invalid field types"}))
}

#[catch(429)]
pub fn too_many_requests() -> Json<Value> {
    Json(json!({"success": false, "error": "Too many requests"}))
}

#[catch(500)]
pub fn internal_error() -> Json<Value> {
    Json(json!({"success": false, "error": "Internal server error"}))
}
