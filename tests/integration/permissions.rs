use rocket::http::{ContentType, Status};
use crate::common::{test_client, update_permission, Authed, MANAGE, VIEW};

// --- Permission store ---

#[test]
fn test_list_default_permissions() {
    let client = test_client();
    let res = client.get("/api/v1/permissions.listAll").authed().dispatch();
    assert_eq!(res.status(), Status::Ok);
    let body: serde_json::Value = res.into_json().unwrap();
    let permissions = body["permissions"].as_array().unwrap();

    let roles_of = |id: &str| -> Vec<String> {
        let p = permissions.iter().find(|p| p["_id"] == id).unwrap();
        serde_json::from_value(p["roles"].clone()).unwrap()
    };
    assert_eq!(roles_of(MANAGE), vec!["admin", "livechat-manager"]);
    assert!(roles_of(VIEW).contains(&"livechat-agent".to_string()));
    assert_eq!(roles_of("access-permissions"), vec!["admin"]);
}

#[test]
fn test_update_permission_roles() {
    let client = test_client();
    update_permission(&client, VIEW, &["livechat-agent"]);

    let body: serde_json::Value = client
        .get("/api/v1/permissions.listAll")
        .authed()
        .dispatch()
        .into_json()
        .unwrap();
    let view = body["permissions"]
        .as_array()
        .unwrap()
        .iter()
        .find(|p| p["_id"] == VIEW)
        .unwrap()
        .clone();
    assert_eq!(view["roles"], serde_json::json!(["livechat-agent"]));

    // Admin no longer holds view-l-room
    let res = client.get("/api/v1/livechat/sla").authed().dispatch();
    assert_eq!(res.status(), Status::Forbidden);

    // Restoring the role restores access
    update_permission(&client, VIEW, &["admin"]);
    let res = client.get("/api/v1/livechat/sla").authed().dispatch();
    assert_eq!(res.status(), Status::Ok);
}

#[test]
fn test_update_unknown_permission() {
    let client = test_client();
    let res = client
        .post("/api/v1/permissions.update")
        .authed()
        .header(ContentType::JSON)
        .body(r#"{"permissions": [{"_id": "view-l-room", "roles": []}, {"_id": "made-up", "roles": ["admin"]}]}"#)
        .dispatch();
    assert_eq!(res.status(), Status::BadRequest);

    // Batch is all-or-nothing: view-l-room untouched
    let res = client.get("/api/v1/livechat/sla").authed().dispatch();
    assert_eq!(res.status(), Status::Ok);
}

#[test]
fn test_update_permissions_requires_access_permissions() {
    let client = test_client();
    update_permission(&client, "access-permissions", &["livechat-manager"]);

    let res = client
        .post("/api/v1/permissions.update")
        .authed()
        .header(ContentType::JSON)
        .body(r#"{"permissions": [{"_id": "access-permissions", "roles": ["admin"]}]}"#)
        .dispatch();
    assert_eq!(res.status(), Status::Forbidden);
}

#[test]
fn test_update_permissions_requires_body() {
    let client = test_client();
    let res = client
        .post("/api/v1/permissions.update")
        .authed()
        .header(ContentType::JSON)
        .body(r#"{"permissions": []}"#)
        .dispatch();
    assert_eq!(res.status(), Status::BadRequest);
}
