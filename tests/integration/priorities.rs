use rocket::http::{ContentType, Status};
use crate::common::{create_priority, test_client, update_permission, Authed, MANAGE, VIEW};

// --- Priority registry ---

#[test]
fn test_list_priorities_requires_view_permission() {
    let client = test_client();
    update_permission(&client, VIEW, &[]);

    let res = client.get("/api/v1/livechat/priorities").authed().dispatch();
    assert_eq!(res.status(), Status::Forbidden);
    let body: serde_json::Value = res.into_json().unwrap();
    assert_eq!(body["success"], false);
}

#[test]
fn test_list_priorities_requires_manage_permission() {
    let client = test_client();
    update_permission(&client, MANAGE, &[]);

    let res = client.get("/api/v1/livechat/priorities").authed().dispatch();
    assert_eq!(res.status(), Status::Forbidden);
}

#[test]
fn test_list_priorities() {
    let client = test_client();
    create_priority(&client, "urgent", "1").unwrap();
    create_priority(&client, "low", "5").unwrap();

    let res = client.get("/api/v1/livechat/priorities").authed().dispatch();
    assert_eq!(res.status(), Status::Ok);
    let body: serde_json::Value = res.into_json().unwrap();
    assert_eq!(body["success"], true);
    let priorities = body["priorities"].as_array().unwrap();
    assert_eq!(priorities.len(), 2);
    assert_eq!(body["total"], 2);
    // Ordered by level
    assert_eq!(priorities[0]["name"], "urgent");
    assert_eq!(priorities[1]["name"], "low");
}

#[test]
fn test_create_priority_returns_record() {
    let client = test_client();
    let priority = create_priority(&client, "high", "2").unwrap();
    assert!(priority["_id"].as_str().is_some());
    assert_eq!(priority["name"], "high");
    assert_eq!(priority["level"], "2");
}

#[test]
fn test_duplicate_priority_rejected() {
    let client = test_client();
    assert!(create_priority(&client, "urgent", "1").is_some());
    assert!(create_priority(&client, "urgent", "1").is_none());

    let res = client
        .post("/api/v1/livechat/priorities")
        .authed()
        .header(ContentType::JSON)
        .body(r#"{"name": "urgent", "level": "1"}"#)
        .dispatch();
    assert_eq!(res.status(), Status::Conflict);
    let body: serde_json::Value = res.into_json().unwrap();
    assert_eq!(body["success"], false);

    let res = client.get("/api/v1/livechat/priorities").authed().dispatch();
    let body: serde_json::Value = res.into_json().unwrap();
    assert_eq!(body["priorities"].as_array().unwrap().len(), 1);
}

#[test]
fn test_same_name_different_level_allowed() {
    let client = test_client();
    assert!(create_priority(&client, "urgent", "1").is_some());
    assert!(create_priority(&client, "urgent", "2").is_some());
}

#[test]
fn test_create_priority_without_permission() {
    let client = test_client();
    update_permission(&client, MANAGE, &[]);
    assert!(create_priority(&client, "urgent", "1").is_none());

    // Restore and confirm nothing was stored
    update_permission(&client, MANAGE, &["admin"]);
    let res = client.get("/api/v1/livechat/priorities").authed().dispatch();
    let body: serde_json::Value = res.into_json().unwrap();
    assert_eq!(body["priorities"].as_array().unwrap().len(), 0);
}

#[test]
fn test_create_priority_requires_view_permission() {
    let client = test_client();
    update_permission(&client, VIEW, &[]);
    assert!(create_priority(&client, "urgent", "1").is_none());

    let res = client
        .post("/api/v1/livechat/priorities")
        .authed()
        .header(ContentType::JSON)
        .body(r#"{"name": "urgent", "level": "1"}"#)
        .dispatch();
    assert_eq!(res.status(), Status::Forbidden);

    update_permission(&client, VIEW, &["admin", "livechat-manager", "livechat-agent"]);
    let res = client.get("/api/v1/livechat/priorities").authed().dispatch();
    let body: serde_json::Value = res.into_json().unwrap();
    assert_eq!(body["total"], 0);
}

#[test]
fn test_priority_name_length_counts_characters() {
    let client = test_client();
    let name = "優".repeat(40);
    let priority = create_priority(&client, &name, "1").unwrap();
    assert_eq!(priority["name"], name.as_str());

    assert!(create_priority(&client, &"é".repeat(100), "1").is_some());
    assert!(create_priority(&client, &"a".repeat(101), "1").is_none());
}

#[test]
fn test_numeric_levels_sort_numerically() {
    let client = test_client();
    create_priority(&client, "routine", "10").unwrap();
    create_priority(&client, "later", "custom").unwrap();
    create_priority(&client, "soon", "2").unwrap();

    let res = client.get("/api/v1/livechat/priorities").authed().dispatch();
    let body: serde_json::Value = res.into_json().unwrap();
    let levels: Vec<&str> = body["priorities"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["level"].as_str().unwrap())
        .collect();
    assert_eq!(levels, ["2", "10", "custom"]);
}

#[test]
fn test_create_priority_missing_fields() {
    let client = test_client();
    let res = client
        .post("/api/v1/livechat/priorities")
        .authed()
        .header(ContentType::JSON)
        .body(r#"{"name": "no-level"}"#)
        .dispatch();
    assert_eq!(res.status(), Status::BadRequest);

    let res = client
        .post("/api/v1/livechat/priorities")
        .authed()
        .header(ContentType::JSON)
        .body(r#"{"name": "   ", "level": "1"}"#)
        .dispatch();
    assert_eq!(res.status(), Status::BadRequest);
}

#[test]
fn test_get_priority_by_id() {
    let client = test_client();
    let priority = create_priority(&client, "medium", "3").unwrap();
    let id = priority["_id"].as_str().unwrap();

    let res = client
        .get(format!("/api/v1/livechat/priority/{id}"))
        .authed()
        .dispatch();
    assert_eq!(res.status(), Status::Ok);
    let body: serde_json::Value = res.into_json().unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["_id"], id);
    assert_eq!(body["name"], "medium");
    assert_eq!(body["level"], "3");
}

#[test]
fn test_get_priority_unknown_id() {
    let client = test_client();
    let res = client.get("/api/v1/livechat/priority/123").authed().dispatch();
    assert_eq!(res.status(), Status::NotFound);
    let body: serde_json::Value = res.into_json().unwrap();
    assert_eq!(body["success"], false);
}

#[test]
fn test_get_priority_without_permission() {
    let client = test_client();
    let priority = create_priority(&client, "medium", "3").unwrap();
    let id = priority["_id"].as_str().unwrap();
    update_permission(&client, VIEW, &[]);

    let res = client
        .get(format!("/api/v1/livechat/priority/{id}"))
        .authed()
        .dispatch();
    assert_eq!(res.status(), Status::Forbidden);
}

#[test]
fn test_list_priorities_text_filter_and_paging() {
    let client = test_client();
    create_priority(&client, "Urgent", "1").unwrap();
    create_priority(&client, "urgent-vip", "0").unwrap();
    create_priority(&client, "low", "9").unwrap();

    let res = client
        .get("/api/v1/livechat/priorities?text=URGENT")
        .authed()
        .dispatch();
    let body: serde_json::Value = res.into_json().unwrap();
    assert_eq!(body["total"], 2);

    let res = client
        .get("/api/v1/livechat/priorities?count=1&offset=1")
        .authed()
        .dispatch();
    let body: serde_json::Value = res.into_json().unwrap();
    assert_eq!(body["count"], 1);
    assert_eq!(body["offset"], 1);
    assert_eq!(body["total"], 3);
    assert_eq!(body["priorities"][0]["name"], "Urgent");
}

#[test]
fn test_delete_priority() {
    let client = test_client();
    let priority = create_priority(&client, "temp", "7").unwrap();
    let id = priority["_id"].as_str().unwrap();

    let res = client
        .delete(format!("/api/v1/livechat/priority/{id}"))
        .authed()
        .dispatch();
    assert_eq!(res.status(), Status::Ok);

    let res = client
        .get(format!("/api/v1/livechat/priority/{id}"))
        .authed()
        .dispatch();
    assert_eq!(res.status(), Status::NotFound);

    let res = client
        .delete(format!("/api/v1/livechat/priority/{id}"))
        .authed()
        .dispatch();
    assert_eq!(res.status(), Status::NotFound);
}
