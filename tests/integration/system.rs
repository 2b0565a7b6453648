use rocket::http::{ContentType, Status};
use crate::common::{test_client, Authed};

// --- System & error shape ---

#[test]
fn test_health() {
    let client = test_client();
    let res = client.get("/api/v1/health").dispatch();
    assert_eq!(res.status(), Status::Ok);
    let body: serde_json::Value = res.into_json().unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "livechat-sla");
}

#[test]
fn test_unknown_route_is_json() {
    let client = test_client();
    let res = client.get("/api/v1/livechat/nothing-here").dispatch();
    assert_eq!(res.status(), Status::NotFound);
    assert_eq!(res.content_type(), Some(ContentType::JSON));
    let body: serde_json::Value = res.into_json().unwrap();
    assert_eq!(body["success"], false);
}

#[test]
fn test_malformed_json_is_bad_request() {
    let client = test_client();
    let res = client
        .put("/api/v1/livechat/inquiry.prioritize")
        .authed()
        .header(ContentType::JSON)
        .body("{not json")
        .dispatch();
    assert_eq!(res.status(), Status::BadRequest);
    let body: serde_json::Value = res.into_json().unwrap();
    assert_eq!(body["success"], false);
}

#[test]
fn test_responses_are_json() {
    let client = test_client();
    let res = client.get("/api/v1/livechat/sla").authed().dispatch();
    assert_eq!(res.content_type(), Some(ContentType::JSON));
}

#[test]
fn test_non_json_body_is_unsupported_media_type() {
    let client = test_client();
    let res = client
        .put("/api/v1/livechat/inquiry.prioritize")
        .authed()
        .header(ContentType::Plain)
        .body(r#"{"roomId": "r1", "sla": "gold"}"#)
        .dispatch();
    assert_eq!(res.status(), Status::UnsupportedMediaType);
    assert_eq!(res.content_type(), Some(ContentType::JSON));
    let body: serde_json::Value = res.into_json().unwrap();
    assert_eq!(body["success"], false);

    // No Content-Type at all
    let res = client
        .post("/api/v1/livechat/priorities")
        .authed()
        .body(r#"{"name": "urgent", "level": "1"}"#)
        .dispatch();
    assert_eq!(res.status(), Status::UnsupportedMediaType);
}

#[test]
fn test_unknown_json_route_is_not_found() {
    let client = test_client();
    let res = client
        .post("/api/v1/livechat/nothing-here")
        .authed()
        .header(ContentType::JSON)
        .body("{}")
        .dispatch();
    assert_eq!(res.status(), Status::NotFound);
    let body: serde_json::Value = res.into_json().unwrap();
    assert_eq!(body["success"], false);
}
