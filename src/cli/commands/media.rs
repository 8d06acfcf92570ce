//! Media collaborator arguments: photo provider and media host credentials.

use anyhow::{Context, Result};
use clap::{Arg, ArgMatches, Command};
use secrecy::SecretString;

pub const ARG_PEXELS_API_KEY: &str = "pexels-api-key";
pub const ARG_CLOUDINARY_CLOUD_NAME: &str = "cloudinary-cloud-name";
pub const ARG_CLOUDINARY_API_KEY: &str = "cloudinary-api-key";
pub const ARG_CLOUDINARY_API_SECRET: &str = "cloudinary-api-secret";

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_PEXELS_API_KEY)
                .long(ARG_PEXELS_API_KEY)
                .help("API key for the photo provider")
                .env("PHOTARIUM_PEXELS_API_KEY")
                .required(true),
        )
        .arg(
            Arg::new(ARG_CLOUDINARY_CLOUD_NAME)
                .long(ARG_CLOUDINARY_CLOUD_NAME)
                .help("Cloud name of the media host account")
                .env("PHOTARIUM_CLOUDINARY_CLOUD_NAME")
                .required(true),
        )
        .arg(
            Arg::new(ARG_CLOUDINARY_API_KEY)
                .long(ARG_CLOUDINARY_API_KEY)
                .help("API key for the media host")
                .env("PHOTARIUM_CLOUDINARY_API_KEY")
                .required(true),
        )
        .arg(
            Arg::new(ARG_CLOUDINARY_API_SECRET)
                .long(ARG_CLOUDINARY_API_SECRET)
                .help("API secret used to sign media host uploads")
                .env("PHOTARIUM_CLOUDINARY_API_SECRET")
                .required(true),
        )
}

#[derive(Debug)]
pub struct Options {
    pub pexels_api_key: SecretString,
    pub cloudinary_cloud_name: String,
    pub cloudinary_api_key: String,
    pub cloudinary_api_secret: SecretString,
}

impl Options {
    /// Extract media options from parsed matches.
    ///
    /// # Errors
    /// Returns an error if a required credential is missing.
    pub fn parse(matches: &ArgMatches) -> Result<Self> {
        let pexels_api_key = matches
            .get_one::<String>(ARG_PEXELS_API_KEY)
            .cloned()
            .context("missing required argument: --pexels-api-key")?;

        let cloudinary_cloud_name = matches
            .get_one::<String>(ARG_CLOUDINARY_CLOUD_NAME)
            .cloned()
            .context("missing required argument: --cloudinary-cloud-name")?;

        let cloudinary_api_key = matches
            .get_one::<String>(ARG_CLOUDINARY_API_KEY)
            .cloned()
            .context("missing required argument: --cloudinary-api-key")?;

        let cloudinary_api_secret = matches
            .get_one::<String>(ARG_CLOUDINARY_API_SECRET)
            .cloned()
            .context("missing required argument: --cloudinary-api-secret")?;

        Ok(Self {
            pexels_api_key: SecretString::from(pexels_api_key),
            cloudinary_cloud_name,
            cloudinary_api_key,
            cloudinary_api_secret: SecretString::from(cloudinary_api_secret),
        })
    }
}
