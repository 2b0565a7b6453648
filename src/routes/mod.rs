// Route module decomposition: one file per livechat area.
// Shared request guards live here; route functions in submodules.

mod inquiries;
mod permissions;
mod priorities;
mod sla;
mod stream;
mod system;
mod visitors;

// --- Re-exports (all route functions used by lib.rs mount) ---

pub use inquiries::{get_inquiry, list_queued, prioritize_inquiry, take_inquiry};
pub use permissions::{list_permissions, update_permissions};
pub use priorities::{create_priority, delete_priority, get_priority, list_priorities};
pub use sla::{create_sla, delete_sla, get_sla, list_sla, update_sla};
pub use stream::inquiry_stream;
pub use system::{
    bad_request, forbidden, health, internal_error, not_found, too_many_requests, unauthorized,
    unmatched_post, unmatched_put, unprocessable,
};
pub use visitors::{open_room, register_visitor};

// --- Shared request guards ---

use crate::db::Db;
use crate::error::ApiError;
use crate::permissions::{AuthUser, authenticate};
use crate::rate_limit::RateLimitConfig;
use rocket::State;
use rocket::http::Status;
use rocket::request::{FromRequest, Outcome, Request};

/// Rate limit key for the caller: the socket address, or the first
/// `X-Forwarded-For` hop when `trust_forwarded_for` is set.
pub struct ClientIp(pub String);

#[rocket::async_trait]
impl<'r> FromRequest<'r> for ClientIp {
    type Error = ();

    async fn from_request(req: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let trust_forwarded = req
            .rocket()
            .state::<RateLimitConfig>()
            .is_some_and(|c| c.trust_forwarded_for);
        let forwarded = trust_forwarded
            .then(|| req.headers().get_one("X-Forwarded-For"))
            .flatten()
            .and_then(|s| s.split(',').next())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        let ip = forwarded
            .or_else(|| req.remote().map(|r| r.ip().to_string()))
            .unwrap_or_else(|| "unknown".to_string());
        Outcome::Success(ClientIp(ip))
    }
}

/// Authenticated principal from `X-User-Id` + `X-Auth-Token`. Fails with 401,
/// which the `unauthorized` catcher renders as JSON.
#[rocket::async_trait]
impl<'r> FromRequest<'r> for AuthUser {
    type Error = ApiError;

    async fn from_request(req: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let headers = req.headers();
        let (Some(user_id), Some(token)) =
            (headers.get_one("X-User-Id"), headers.get_one("X-Auth-Token"))
        else {
            return Outcome::Error((Status::Unauthorized, ApiError::Unauthenticated));
        };

        let db = match req.guard::<&State<Db>>().await {
            Outcome::Success(db) => db,
            _ => {
                return Outcome::Error((Status::InternalServerError, ApiError::Unauthenticated));
            }
        };

        let result = {
            let conn = db.conn();
            authenticate(&conn, user_id, token)
        };
        match result {
            Ok(user) => Outcome::Success(user),
            Err(e) => Outcome::Error((e.status(), e)),
        }
    }
}

/// `{"success": true, ...record}`: a single record with its fields at top level.
pub(crate) fn success_flat<T: serde::Serialize>(record: &T) -> serde_json::Value {
    let mut value = serde_json::to_value(record).unwrap_or_else(|_| serde_json::json!({}));
    if let Some(obj) = value.as_object_mut() {
        obj.insert("success".to_string(), serde_json::Value::Bool(true));
    }
    value
}
