use crate::{
    api,
    media::{self, cloudinary::Cloudinary, pexels::Pexels},
};
use anyhow::{Context, Result};
use secrecy::SecretString;
use std::sync::Arc;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub dsn: String,
    pub token_secret: SecretString,
    pub token_ttl_seconds: i64,
    pub token_issuer: String,
    pub pexels_api_key: SecretString,
    pub cloudinary_cloud_name: String,
    pub cloudinary_api_key: String,
    pub cloudinary_api_secret: SecretString,
    pub email_outbox_poll_seconds: u64,
    pub email_outbox_batch_size: usize,
    pub email_outbox_max_attempts: u32,
    pub email_outbox_backoff_base_seconds: u64,
    pub email_outbox_backoff_max_seconds: u64,
}

/// Execute the server action.
/// # Errors
/// Returns an error if the HTTP clients cannot be built or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    let auth_state = Arc::new(api::handlers::auth::AuthState::new(
        api::handlers::auth::TokenConfig::new(args.token_secret)
            .with_ttl_seconds(args.token_ttl_seconds)
            .with_issuer(args.token_issuer),
    ));

    let provider = Pexels::new(args.pexels_api_key).context("Failed to build photo provider")?;

    let host = Cloudinary::new(
        args.cloudinary_cloud_name,
        args.cloudinary_api_key,
        args.cloudinary_api_secret,
    )
    .context("Failed to build media host")?;

    let media_state = Arc::new(media::MediaState::new(Arc::new(provider), Arc::new(host)));

    let email_config = api::email::EmailWorkerConfig::new()
        .with_poll_interval_seconds(args.email_outbox_poll_seconds)
        .with_batch_size(args.email_outbox_batch_size)
        .with_max_attempts(args.email_outbox_max_attempts)
        .with_backoff_base_seconds(args.email_outbox_backoff_base_seconds)
        .with_backoff_max_seconds(args.email_outbox_backoff_max_seconds);

    api::new(args.port, args.dsn, auth_state, media_state, email_config).await
}
