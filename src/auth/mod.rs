//INFO: Auth module - Google OAuth implicit flow and the client session
//NOTE: Token store, redirect handling and the session controller live here

pub mod browser;
pub mod callback;
pub mod error;
pub mod fragment;
pub mod google;
pub mod redirect;
pub mod session;
pub mod token_store;

pub use browser::{Browser, SystemBrowser};
pub use callback::CallbackListener;
pub use error::{AuthError, MISSING_CLIENT_ID_MESSAGE};
pub use google::AuthorizationRequest;
pub use redirect::{RedirectHandler, RedirectOutcome};
pub use session::{AuthSettings, Session, SessionController, SessionState};
pub use token_store::{DatabaseTokenStore, TokenStore};
