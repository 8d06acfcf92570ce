//! Command-line argument dispatch and server initialization.
//!
//! This module parses validated CLI arguments and maps them to the appropriate
//! action, such as starting the API server with its full configuration state.

use crate::cli::actions::{Action, server::Args};
use crate::cli::commands::{auth, email, media};
use anyhow::{Context, Result};

/// Map validated CLI matches to a server action.
///
/// # Errors
/// Returns an error if required arguments are missing or inconsistent.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>("port").copied().unwrap_or(8080);
    let dsn = matches
        .get_one::<String>("dsn")
        .cloned()
        .context("missing required argument: --dsn")?;

    let auth_opts = auth::Options::parse(matches)?;
    let media_opts = media::Options::parse(matches)?;
    let email_opts = email::Options::parse(matches);

    Ok(Action::Server(Args {
        port,
        dsn,
        token_secret: auth_opts.token_secret,
        token_ttl_seconds: auth_opts.token_ttl_seconds,
        token_issuer: auth_opts.token_issuer,
        pexels_api_key: media_opts.pexels_api_key,
        cloudinary_cloud_name: media_opts.cloudinary_cloud_name,
        cloudinary_api_key: media_opts.cloudinary_api_key,
        cloudinary_api_secret: media_opts.cloudinary_api_secret,
        email_outbox_poll_seconds: email_opts.poll_seconds,
        email_outbox_batch_size: email_opts.batch_size,
        email_outbox_max_attempts: email_opts.max_attempts,
        email_outbox_backoff_base_seconds: email_opts.backoff_base_seconds,
        email_outbox_backoff_max_seconds: email_opts.backoff_max_seconds,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn server_action_from_matches() {
        temp_env::with_vars([("PHOTARIUM_TOKEN_TTL_SECONDS", None::<&str>)], || {
            let command = crate::cli::commands::new();
            let matches = command.get_matches_from(vec![
                "photarium",
                "--dsn",
                "postgres://user@localhost:5432/photarium",
                "--token-secret",
                "super-secret",
                "--pexels-api-key",
                "pexels-key",
                "--cloudinary-cloud-name",
                "demo",
                "--cloudinary-api-key",
                "cloudinary-key",
                "--cloudinary-api-secret",
                "cloudinary-secret",
            ]);
            let result = handler(&matches);
            assert!(result.is_ok());
            if let Ok(Action::Server(args)) = result {
                assert_eq!(args.port, 8080);
                assert_eq!(args.dsn, "postgres://user@localhost:5432/photarium");
                assert_eq!(args.token_secret.expose_secret(), "super-secret");
                assert_eq!(args.token_ttl_seconds, 3600);
                assert_eq!(args.token_issuer, "photarium");
                assert_eq!(args.email_outbox_batch_size, 10);
            }
        });
    }
}
