//INFO: Error types for the auth session
//NOTE: Configuration problems are user-facing and recoverable, storage problems are not expected

use thiserror::Error;

pub const MISSING_CLIENT_ID_MESSAGE: &str = "Google Client ID not configured. \
Set GOOGLE_CLIENT_ID or run `parley configure --client-id <id>`";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{}", MISSING_CLIENT_ID_MESSAGE)]
    MissingClientId,

    #[error("Invalid authorization URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Navigation failed: {0}")]
    Navigation(String),

    #[error("Token storage failed")]
    Storage(#[from] anyhow::Error),
}
