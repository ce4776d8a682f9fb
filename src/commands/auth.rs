//INFO: Sign in, sign out and session status commands

use anyhow::{Context, Result};
use std::time::Duration;
use tracing::info;

use super::{auth_settings, load_session, load_session_with};
use crate::auth::{
    AuthError, Browser, CallbackListener, RedirectHandler, Session, SessionController,
    SystemBrowser,
};
use crate::config::AppConfig;

//INFO: Runs the whole implicit flow in the system browser
pub async fn login(config: &AppConfig, timeout: Duration) -> Result<Session> {
    let browser = SystemBrowser::new(config.app_origin.clone());
    login_with(config, browser, timeout).await
}

//INFO: Runs the whole implicit flow and returns the resulting session
//NOTE: The controller is torn down while the user is at Google; only the token store carries over
pub async fn login_with<B: Browser>(
    config: &AppConfig,
    browser: B,
    timeout: Duration,
) -> Result<Session> {
    let mut controller = load_session_with(config, browser)?;

    //INFO: Bind before navigating so the redirect can't beat the listener
    let listener = config
        .client_id
        .as_ref()
        .map(|_| CallbackListener::bind(&config.app_origin))
        .transpose()?;

    let auth_url = controller.sign_in()?;
    let listener = listener.ok_or(AuthError::MissingClientId)?;
    println!("Continue signing in with Google in your browser.");
    println!("If it did not open, visit:\n{}", auth_url);

    let (store, mut browser) = controller.teardown();

    let location = tokio::task::spawn_blocking(move || listener.wait_for_redirect(timeout))
        .await
        .context("Callback listener stopped unexpectedly")??;

    browser.arrive_at(location);
    RedirectHandler::new(&store).handle(&mut browser)?;

    let controller = SessionController::new(auth_settings(config), store, browser)?;
    info!("Signed in: {}", controller.session().is_signed_in);

    Ok(controller.session().clone())
}

pub fn logout(config: &AppConfig) -> Result<()> {
    let mut controller = load_session(config)?;
    controller.sign_out()?;
    println!("Signed out.");
    Ok(())
}

pub fn status(config: &AppConfig, as_json: bool) -> Result<Session> {
    let controller = load_session(config)?;
    let session = controller.session().clone();

    if as_json {
        println!("{}", serde_json::to_string_pretty(&session)?);
    } else if session.is_signed_in {
        println!("Signed in with Google.");
    } else {
        println!("Signed out. Run `parley login` to connect Google.");
    }

    Ok(session)
}
