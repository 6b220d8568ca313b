// handlers/elevated/admin/mod.rs - /api/v1/admin/*

pub mod cache;   // POST /admin/cache/clear
pub mod content; // /admin/{categories|brands}[/:id]
mod form;        // multipart parsing shared by content create/update
pub mod upload;  // POST /admin/upload
