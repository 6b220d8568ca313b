// handlers/protected/mod.rs - Handlers for any authenticated user

pub mod auth;
