//! Workspace integration tests driving the HTTP API over the in-memory store.

mod helpers;

mod booking_flow_test;
mod expiry_test;
mod quota_test;
