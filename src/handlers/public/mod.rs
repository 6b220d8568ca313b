// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Mobile clients call these anonymously: screen schemas, version info,
// content listings and the login endpoint that issues tokens.

pub mod auth;
pub mod content;
pub mod health;
pub mod ui;
