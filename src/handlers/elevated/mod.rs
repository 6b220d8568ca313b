// handlers/elevated/mod.rs - Administrative handlers
//
// Every handler here takes `AdminUser`, so a non-admin token is refused
// with 403 before the handler body runs.

pub mod admin;
