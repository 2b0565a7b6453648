// Integration test suite for the livechat SLA service.
//
// Organized into focused modules by feature area.
// All modules share the common::TestClient for DB lifecycle management.


mod auth;
mod permissions;
mod priorities;
mod system;
