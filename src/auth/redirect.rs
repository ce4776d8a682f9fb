//INFO: OAuth redirect handler for the callback route
//NOTE: Consumes the fragment, stores the token, then sends the app to its root

use tracing::{debug, info};

use super::browser::Browser;
use super::fragment::{access_token_from_url, without_fragment};
use super::token_store::TokenStore;
use super::AuthError;

//INFO: What a single run of the handler did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedirectOutcome {
    //INFO: A token was stored and the browser moved to root
    Stored(String),
    //INFO: No usable fragment, nothing was touched
    NoToken,
}

//INFO: Stores a fragment's access token and clears the fragment from history
//NOTE: Leaves the location alone when there is no token
pub(crate) fn capture_fragment_token<S, B>(
    store: &S,
    browser: &mut B,
) -> Result<Option<String>, AuthError>
where
    S: TokenStore + ?Sized,
    B: Browser + ?Sized,
{
    let location = browser.location();

    let Some(token) = access_token_from_url(&location) else {
        return Ok(None);
    };

    store.write(&token)?;
    browser.replace_location(without_fragment(&location));
    debug!("Access token captured from redirect fragment");

    Ok(Some(token))
}

pub struct RedirectHandler<'a, S: TokenStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: TokenStore + ?Sized> RedirectHandler<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    //INFO: Runs once on load of the callback route
    pub fn handle<B: Browser + ?Sized>(
        &self,
        browser: &mut B,
    ) -> Result<RedirectOutcome, AuthError> {
        let Some(token) = capture_fragment_token(self.store, browser)? else {
            debug!("Callback loaded without an access token, nothing to do");
            return Ok(RedirectOutcome::NoToken);
        };

        let root = browser.location().join("/")?;
        browser
            .navigate(&root)
            .map_err(|e| AuthError::Navigation(format!("{:#}", e)))?;
        info!("Sign in completed, returning to root");

        Ok(RedirectOutcome::Stored(token))
    }
}
