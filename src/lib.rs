//! # Entrata (Partner Authentication Front Door)
//!
//! `entrata` is a thin HTTP front door for the partner user area. It turns
//! browser form requests (login, logout, change password, forgot password,
//! reset password) into calls against an upstream identity service and maps
//! the enumerated results back to redirects or re-rendered forms.
//!
//! Credential verification, password hashing, token issuance and session
//! persistence all live upstream; nothing durable is owned here.
//!
//! ## Layout
//!
//! - [`flow`] — the flow controller as pure decision logic, independently
//!   testable without an HTTP pipeline.
//! - [`entrata`] — the axum adapter: router, handlers, minimal HTML views.
//! - [`identity`] — reqwest client implementing the collaborator traits
//!   against the upstream identity API.
//! - [`cli`] — clap command, telemetry bootstrap and server action.

pub mod cli;
pub mod entrata;
pub mod flow;
pub mod identity;

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
