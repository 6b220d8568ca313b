// handlers/mod.rs - 3-Tier Handler Architecture
//
// Public (no auth) → Protected (bearer token with live session) → Elevated (admin role)
//
// The tier is enforced by the extractor each handler takes: nothing for public,
// `AuthUser` for protected, `AdminUser` for elevated.
pub mod public;    // Tier 1: /health, /api/v1/ui/*, /api/v1/content/*, /api/v1/auth/login
pub mod protected; // Tier 2: /api/v1/auth/{logout,me}
pub mod elevated;  // Tier 3: /api/v1/admin/*
