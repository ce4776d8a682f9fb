//INFO: Commands module - the CLI front-end
//NOTE: Each subcommand wires configuration, the session controller and the gateway together

pub mod ask;
pub mod auth;
pub mod configure;
pub mod gateway_client;
pub mod serve;

use anyhow::Result;
use std::sync::Arc;

use crate::auth::{AuthSettings, Browser, DatabaseTokenStore, SessionController, SystemBrowser};
use crate::config::AppConfig;
use crate::crypto::TokenCipher;
use crate::database::Database;

//INFO: Opens the durable token store under the configured data directory
pub fn open_token_store(config: &AppConfig) -> Result<DatabaseTokenStore> {
    let database = Arc::new(Database::open(config.database_dir())?);
    let cipher = TokenCipher::load_or_create(&config.key_path())?;
    Ok(DatabaseTokenStore::new(database, cipher))
}

pub fn auth_settings(config: &AppConfig) -> AuthSettings {
    AuthSettings {
        client_id: config.client_id.clone(),
        app_origin: config.app_origin.clone(),
    }
}

//INFO: A fresh application load at the root route
pub fn load_session(
    config: &AppConfig,
) -> Result<SessionController<DatabaseTokenStore, SystemBrowser>> {
    load_session_with(config, SystemBrowser::new(config.app_origin.clone()))
}

pub fn load_session_with<B: Browser>(
    config: &AppConfig,
    browser: B,
) -> Result<SessionController<DatabaseTokenStore, B>> {
    let store = open_token_store(config)?;
    let settings = auth_settings(config);
    Ok(SessionController::new(settings, store, browser)?)
}
