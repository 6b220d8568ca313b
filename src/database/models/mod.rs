pub mod content;
pub mod user;

pub use content::{ContentItem, ContentPatch, NewContent};
pub use user::{Session, User};
