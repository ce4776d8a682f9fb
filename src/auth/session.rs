//INFO: Auth session controller
//NOTE: One controller per application instance, hydrated synchronously from the token store

use serde::Serialize;
use tracing::{debug, error, info};
use url::Url;

use super::browser::Browser;
use super::google::AuthorizationRequest;
use super::redirect::capture_fragment_token;
use super::token_store::TokenStore;
use super::{AuthError, MISSING_CLIENT_ID_MESSAGE};

//INFO: Derived session view handed to the presentation layer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub is_signed_in: bool,
    pub access_token: Option<String>,
    pub error: Option<String>,
}

impl Session {
    fn signed_in(access_token: String) -> Self {
        Self {
            is_signed_in: true,
            access_token: Some(access_token),
            error: None,
        }
    }

    pub fn state(&self) -> SessionState {
        if self.is_signed_in {
            SessionState::SignedIn
        } else {
            SessionState::SignedOut
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SessionState {
    SignedOut,
    SignedIn,
}

//INFO: Values the controller needs from configuration
#[derive(Debug, Clone)]
pub struct AuthSettings {
    pub client_id: Option<String>,
    pub app_origin: Url,
}

pub struct SessionController<S: TokenStore, B: Browser> {
    settings: AuthSettings,
    store: S,
    browser: B,
    session: Session,
}

impl<S: TokenStore, B: Browser> SessionController<S, B> {
    //INFO: Builds the controller and hydrates the session
    //NOTE: Stored token first, then a redirect fragment on the current location overrides it
    pub fn new(settings: AuthSettings, store: S, mut browser: B) -> Result<Self, AuthError> {
        let mut session = Session::default();

        if let Some(token) = store.read()? {
            debug!("Session hydrated from stored token");
            session = Session::signed_in(token);
        }

        if let Some(token) = capture_fragment_token(&store, &mut browser)? {
            info!("Session signed in from redirect fragment");
            session = Session::signed_in(token);
        }

        Ok(Self {
            settings,
            store,
            browser,
            session,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn state(&self) -> SessionState {
        self.session.state()
    }

    pub fn access_token(&self) -> Option<&str> {
        self.session.access_token.as_deref()
    }

    pub fn browser(&self) -> &B {
        &self.browser
    }

    //INFO: Sends the browser to Google's consent screen
    //NOTE: Without a client id this only records and alerts the error; nothing is stored or opened
    pub fn sign_in(&mut self) -> Result<Url, AuthError> {
        let Some(client_id) = self
            .settings
            .client_id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
        else {
            error!("{}", MISSING_CLIENT_ID_MESSAGE);
            self.browser.alert(MISSING_CLIENT_ID_MESSAGE);
            self.session.error = Some(MISSING_CLIENT_ID_MESSAGE.to_string());
            return Err(AuthError::MissingClientId);
        };

        let request = AuthorizationRequest::for_origin(client_id, &self.settings.app_origin)?;
        let url = request.url()?;

        info!("Redirecting to Google for sign in");
        self.browser
            .navigate(&url)
            .map_err(|e| AuthError::Navigation(format!("{:#}", e)))?;

        Ok(url)
    }

    //INFO: Clears the stored token and resets the session
    pub fn sign_out(&mut self) -> Result<(), AuthError> {
        self.store.clear()?;
        self.session = Session::default();
        info!("Signed out");
        Ok(())
    }

    //INFO: Drops the in-memory session and hands back what outlives it
    pub fn teardown(self) -> (S, B) {
        (self.store, self.browser)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::browser::testing::RecordingBrowser;
    use crate::auth::token_store::testing::MemoryTokenStore;

    const ROOT: &str = "http://127.0.0.1:18247/";

    fn settings(client_id: Option<&str>) -> AuthSettings {
        AuthSettings {
            client_id: client_id.map(str::to_string),
            app_origin: Url::parse("http://127.0.0.1:18247").unwrap(),
        }
    }

    #[test]
    fn test_fragment_on_load_signs_in() {
        let store = MemoryTokenStore::new();
        let location = format!("{ROOT}#access_token=abc123&token_type=Bearer");
        let browser = RecordingBrowser::at(&location);

        let controller = SessionController::new(settings(None), &store, browser).unwrap();

        assert_eq!(
            controller.session(),
            &Session {
                is_signed_in: true,
                access_token: Some("abc123".to_string()),
                error: None,
            }
        );
        assert_eq!(store.read().unwrap().as_deref(), Some("abc123"));
        assert_eq!(controller.browser().location.as_str(), ROOT);
        assert_eq!(controller.browser().location.fragment(), None);
        assert!(controller.browser().navigations.is_empty());
    }

    #[test]
    fn test_stored_token_hydrates_without_navigation() {
        let store = MemoryTokenStore::with_token("xyz");
        let browser = RecordingBrowser::at(ROOT);

        let controller = SessionController::new(settings(None), &store, browser).unwrap();

        assert_eq!(controller.state(), SessionState::SignedIn);
        assert_eq!(controller.access_token(), Some("xyz"));
        assert_eq!(controller.session().error, None);
        assert!(controller.browser().navigations.is_empty());
        assert!(controller.browser().replacements.is_empty());
    }

    #[test]
    fn test_empty_everything_stays_signed_out() {
        let store = MemoryTokenStore::new();
        let browser = RecordingBrowser::at(&format!("{ROOT}#"));

        let controller = SessionController::new(settings(None), &store, browser).unwrap();

        assert_eq!(controller.session(), &Session::default());
        assert_eq!(controller.state(), SessionState::SignedOut);
        assert_eq!(store.read().unwrap(), None);
    }

    #[test]
    fn test_fragment_wins_over_stored_token() {
        let store = MemoryTokenStore::with_token("stale");
        let browser = RecordingBrowser::at(&format!("{ROOT}#access_token=fresh"));

        let controller = SessionController::new(settings(None), &store, browser).unwrap();

        assert_eq!(controller.access_token(), Some("fresh"));
        assert_eq!(store.read().unwrap().as_deref(), Some("fresh"));
    }

    #[test]
    fn test_fragment_without_token_leaves_state_alone() {
        for fragment in ["token_type=Bearer", "error=access_denied", "state=abc"] {
            let store = MemoryTokenStore::with_token("kept");
            let browser = RecordingBrowser::at(&format!("{ROOT}#{fragment}"));

            let controller = SessionController::new(settings(None), &store, browser).unwrap();

            assert_eq!(controller.access_token(), Some("kept"));
            assert_eq!(store.read().unwrap().as_deref(), Some("kept"));
            assert!(controller.browser().replacements.is_empty());
        }
    }

    #[test]
    fn test_sign_in_without_client_id() {
        for client_id in [None, Some(""), Some("   ")] {
            let store = MemoryTokenStore::new();
            let auth = settings(client_id);
            let browser = RecordingBrowser::at(ROOT);
            let mut controller = SessionController::new(auth, &store, browser).unwrap();

            let result = controller.sign_in();

            assert!(matches!(result, Err(AuthError::MissingClientId)));
            assert_eq!(controller.state(), SessionState::SignedOut);
            assert_eq!(
                controller.session().error.as_deref(),
                Some(MISSING_CLIENT_ID_MESSAGE)
            );
            assert_eq!(controller.browser().alerts, vec![MISSING_CLIENT_ID_MESSAGE]);
            assert!(controller.browser().navigations.is_empty());
            assert_eq!(store.read().unwrap(), None);
        }
    }

    #[test]
    fn test_sign_in_without_client_id_keeps_signed_in_session() {
        let store = MemoryTokenStore::with_token("xyz");
        let browser = RecordingBrowser::at(ROOT);
        let mut controller = SessionController::new(settings(None), &store, browser).unwrap();

        assert!(controller.sign_in().is_err());
        assert_eq!(controller.state(), SessionState::SignedIn);
        assert_eq!(store.read().unwrap().as_deref(), Some("xyz"));
    }

    #[test]
    fn test_sign_in_navigates_to_google() {
        let store = MemoryTokenStore::new();
        let mut controller = SessionController::new(
            settings(Some("client-123")),
            &store,
            RecordingBrowser::at(ROOT),
        )
        .unwrap();

        let url = controller.sign_in().unwrap();

        assert_eq!(url.host_str(), Some("accounts.google.com"));
        assert_eq!(controller.browser().navigations, vec![url]);
        assert_eq!(controller.state(), SessionState::SignedOut);
        assert_eq!(controller.session().error, None);
        assert_eq!(store.read().unwrap(), None);
    }

    #[test]
    fn test_sign_out_resets_everything() {
        let store = MemoryTokenStore::new();
        let browser = RecordingBrowser::at(&format!("{ROOT}#access_token=abc123"));
        let mut controller = SessionController::new(settings(None), &store, browser).unwrap();
        let _ = controller.sign_in();
        assert!(controller.session().error.is_some());

        controller.sign_out().unwrap();

        assert_eq!(controller.session(), &Session::default());
        assert_eq!(store.read().unwrap(), None);
    }

    #[test]
    fn test_sign_out_when_already_signed_out() {
        let store = MemoryTokenStore::new();
        let browser = RecordingBrowser::at(ROOT);
        let mut controller = SessionController::new(settings(None), &store, browser).unwrap();

        controller.sign_out().unwrap();
        controller.sign_out().unwrap();

        assert_eq!(controller.session(), &Session::default());
    }

    #[test]
    fn test_teardown_keeps_only_the_store() {
        let store = MemoryTokenStore::new();
        let browser = RecordingBrowser::at(&format!("{ROOT}#access_token=persisted"));
        let controller = SessionController::new(settings(None), &store, browser).unwrap();

        let (store_ref, browser) = controller.teardown();
        let rebuilt = SessionController::new(settings(None), store_ref, browser).unwrap();

        assert_eq!(rebuilt.access_token(), Some("persisted"));
    }

    #[test]
    fn test_session_serializes_in_camel_case() {
        let json = serde_json::to_value(Session::signed_in("t".to_string())).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"isSignedIn": true, "accessToken": "t", "error": null})
        );
    }
}
