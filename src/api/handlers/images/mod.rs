//! Image catalog surface.
//!
//! Generation pulls random photos from the photo provider, caches them on
//! the media host, and stores the hosted URI. CRUD is owner-scoped and
//! soft-deleting; admins operate on any row and see soft-deleted ones.

pub mod crud;
pub mod generate;
pub(crate) mod storage;
pub mod types;

/// Resource name used in policy grants and checks.
pub const IMAGE: &str = "image";
