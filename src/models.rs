use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Priority {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub level: String,
    #[serde(rename = "_createdAt")]
    pub created_at: String,
}

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Sla {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub description: String,
    pub due_time_in_minutes: i64,
    #[serde(rename = "_createdAt")]
    pub created_at: String,
    #[serde(rename = "_updatedAt")]
    pub updated_at: String,
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum InquiryStatus {
    Queued,
    Taken,
}

impl InquiryStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            InquiryStatus::Queued => "queued",
            InquiryStatus::Taken => "taken",
        }
    }

    /// Unknown values are treated as taken: anything not explicitly queued
    /// must not be picked up or re-prioritized.
    pub fn parse(s: &str) -> Self {
        match s {
            "queued" => InquiryStatus::Queued,
            _ => InquiryStatus::Taken,
        }
    }
}

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Inquiry {
    #[serde(rename = "_id")]
    pub id: String,
    pub rid: String,
    pub name: String,
    pub status: InquiryStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sla_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_waiting_time_queue: Option<i64>,
    pub ts: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub taken_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<String>,
}

#[derive(Debug, Serialize, Clone)]
pub struct Visitor {
    #[serde(rename = "_id")]
    pub id: String,
    pub token: String,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Serialize, Clone)]
pub struct RoomVisitor {
    #[serde(rename = "_id")]
    pub id: String,
    pub token: String,
    pub username: String,
}

#[derive(Debug, Serialize, Clone)]
pub struct ServedBy {
    #[serde(rename = "_id")]
    pub id: String,
    pub username: String,
}

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    #[serde(rename = "_id")]
    pub id: String,
    /// Room type; livechat rooms are always `"l"`.
    pub t: &'static str,
    pub fname: String,
    pub open: bool,
    pub v: RoomVisitor,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub served_by: Option<ServedBy>,
    pub ts: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Permission {
    #[serde(rename = "_id")]
    pub id: String,
    pub roles: Vec<String>,
    #[serde(rename = "_updatedAt", skip_deserializing, default)]
    pub updated_at: String,
}

// --- Request bodies ---
//
// Required fields are `Option` so that a missing field is reported as a 400
// with a message instead of Rocket's generic 422.

#[derive(Debug, Deserialize)]
pub struct CreatePriority {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub level: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlaBody {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub due_time_in_minutes: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrioritizeInquiry {
    #[serde(default)]
    pub room_id: Option<String>,
    #[serde(default)]
    pub sla: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TakeInquiry {
    #[serde(default)]
    pub inquiry_id: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct VisitorFields {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RegisterVisitor {
    #[serde(default)]
    pub visitor: Option<VisitorFields>,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePermissions {
    #[serde(default)]
    pub permissions: Option<Vec<Permission>>,
}

/// Paging window shared by the list endpoints.
#[derive(Debug, Clone, Copy)]
pub struct Page {
    pub offset: i64,
    pub count: i64,
}

impl Page {
    pub const DEFAULT_COUNT: i64 = 50;
    pub const MAX_COUNT: i64 = 100;

    pub fn new(offset: Option<i64>, count: Option<i64>) -> Self {
        Page {
            offset: offset.unwrap_or(0).max(0),
            count: count
                .unwrap_or(Self::DEFAULT_COUNT)
                .clamp(1, Self::MAX_COUNT),
        }
    }
}
