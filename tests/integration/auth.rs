use rocket::http::{ContentType, Header, Status};
use crate::common::{test_client, ADMIN_ID};

// --- Authentication ---

#[test]
fn test_missing_credentials() {
    let client = test_client();
    for path in [
        "/api/v1/livechat/sla",
        "/api/v1/livechat/priorities",
        "/api/v1/livechat/inquiries.queued",
        "/api/v1/permissions.listAll",
    ] {
        let res = client.get(path).dispatch();
        assert_eq!(res.status(), Status::Unauthorized, "{path}");
        let body: serde_json::Value = res.into_json().unwrap();
        assert_eq!(body["success"], false);
    }
}

#[test]
fn test_wrong_token() {
    let client = test_client();
    let res = client
        .get("/api/v1/livechat/sla")
        .header(Header::new("X-User-Id", ADMIN_ID))
        .header(Header::new("X-Auth-Token", "not-the-token"))
        .dispatch();
    assert_eq!(res.status(), Status::Unauthorized);
}

#[test]
fn test_unknown_user() {
    let client = test_client();
    let res = client
        .get("/api/v1/livechat/sla")
        .header(Header::new("X-User-Id", "nobody"))
        .header(Header::new("X-Auth-Token", crate::common::ADMIN_TOKEN))
        .dispatch();
    assert_eq!(res.status(), Status::Unauthorized);
}

#[test]
fn test_unauthenticated_mutation_has_no_effect() {
    let client = test_client();
    let res = client
        .post("/api/v1/livechat/priorities")
        .header(ContentType::JSON)
        .body(r#"{"name": "sneaky", "level": "1"}"#)
        .dispatch();
    assert_eq!(res.status(), Status::Unauthorized);

    assert!(crate::common::create_priority(&client, "sneaky", "1").is_some());
}
