//! # Photarium (Multi-Tenant Image Catalog API)
//!
//! `photarium` is a multi-tenant image-catalog REST backend. Users register
//! and log in with email + password, generate randomly-sourced images from a
//! third-party photo provider that are cached on a separate media host, and
//! manage their catalog through owner-scoped CRUD.
//!
//! ## Authentication
//!
//! Passwords are hashed with Argon2 using a per-user salt; sessions are
//! stateless HS256 bearer tokens carrying the email claim. The token is never
//! trusted as the source of the current id or role: every request re-resolves
//! the claim against the users table, since a role can change after issuance.
//!
//! ## Authorization & Ownership
//!
//! Access is controlled by a static grant table (`USER` may create/read/
//! update/delete its *own* images, `ADMIN` may act on *any*). Endpoints
//! declare a `(resource, action, possession)` triple checked against the
//! caller's role, and instance-level handlers additionally compare the image
//! owner with the caller. Authentication failures return `401`, authorization
//! denials return `403`, and missing resources (including soft-deleted images
//! seen by non-admins) return `404` — uniformly across every endpoint.
//!
//! ## Soft Deletes
//!
//! Deleting an image sets `deleted_at` rather than removing the row. Admins
//! still see soft-deleted images; everyone else gets `404`.

pub mod api;
pub mod cli;
pub mod media;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            // Acceptable in non-git build environments
            return;
        }
        // Should be a hex string (full SHA-1 is 40 chars, but could be short)
        assert!(
            GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()),
            "GIT_COMMIT_HASH should be a hex string, got: {GIT_COMMIT_HASH}"
        );
        assert!(
            GIT_COMMIT_HASH.len() >= 7,
            "GIT_COMMIT_HASH should be at least 7 characters long, got: {GIT_COMMIT_HASH}"
        );
    }

    #[test]
    fn test_app_user_agent_format() {
        assert!(APP_USER_AGENT.starts_with(env!("CARGO_PKG_NAME")));
        assert!(APP_USER_AGENT.contains(env!("CARGO_PKG_VERSION")));
    }
}
