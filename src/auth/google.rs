//INFO: Google authorization request for the implicit flow
//NOTE: response_type is always `token`; no code exchange, no refresh token

use url::Url;

use super::AuthError;

pub const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";

//INFO: Application route that receives the OAuth redirect
pub const CALLBACK_PATH: &str = "/auth/google/callback";

pub const GOOGLE_SCOPES: [&str; 4] = [
    "https://www.googleapis.com/auth/gmail.readonly",
    "https://www.googleapis.com/auth/calendar.readonly",
    "https://www.googleapis.com/auth/userinfo.email",
    "https://www.googleapis.com/auth/userinfo.profile",
];

//INFO: Ephemeral authorization request, never persisted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationRequest {
    client_id: String,
    redirect_uri: Url,
}

impl AuthorizationRequest {
    pub fn new(client_id: impl Into<String>, redirect_uri: Url) -> Self {
        Self {
            client_id: client_id.into(),
            redirect_uri,
        }
    }

    //INFO: Builds the request for an app served from `app_origin`
    pub fn for_origin(client_id: impl Into<String>, app_origin: &Url) -> Result<Self, AuthError> {
        Ok(Self::new(client_id, callback_url(app_origin)?))
    }

    //INFO: The URL the browser is sent to
    //NOTE: Percent-encodes with %20 for spaces, the way encodeURIComponent does
    pub fn url(&self) -> Result<Url, AuthError> {
        let scope = GOOGLE_SCOPES.join(" ");
        let raw = format!(
            "{}?client_id={}&redirect_uri={}&response_type=token&scope={}",
            GOOGLE_AUTH_URL,
            urlencoding::encode(&self.client_id),
            urlencoding::encode(self.redirect_uri.as_str()),
            urlencoding::encode(&scope),
        );

        Ok(Url::parse(&raw)?)
    }
}

//INFO: `<origin>/auth/google/callback`
pub fn callback_url(app_origin: &Url) -> Result<Url, AuthError> {
    Ok(app_origin.join(CALLBACK_PATH)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn origin() -> Url {
        Url::parse("http://127.0.0.1:18247").unwrap()
    }

    #[test]
    fn test_callback_url() {
        assert_eq!(
            callback_url(&origin()).unwrap().as_str(),
            "http://127.0.0.1:18247/auth/google/callback"
        );
    }

    #[test]
    fn test_authorization_url_parameters() {
        let request = AuthorizationRequest::for_origin("client-123.apps", &origin()).unwrap();
        let url = request.url().unwrap();

        assert_eq!(url.scheme(), "https");
        assert_eq!(url.host_str(), Some("accounts.google.com"));
        assert_eq!(url.path(), "/o/oauth2/v2/auth");

        let params: HashMap<String, String> = url.query_pairs().into_owned().collect();
        assert_eq!(params.len(), 4);
        assert_eq!(params["client_id"], "client-123.apps");
        assert_eq!(
            params["redirect_uri"],
            "http://127.0.0.1:18247/auth/google/callback"
        );
        assert_eq!(params["response_type"], "token");
        assert_eq!(params["scope"], GOOGLE_SCOPES.join(" "));
    }

    #[test]
    fn test_authorization_url_encoding() {
        let request = AuthorizationRequest::for_origin("client", &origin()).unwrap();
        let query = request.url().unwrap().query().unwrap().to_string();

        let redirect = "redirect_uri=http%3A%2F%2F127.0.0.1%3A18247%2Fauth%2Fgoogle%2Fcallback";
        let calendar = "%20https%3A%2F%2Fwww.googleapis.com%2Fauth%2Fcalendar.readonly";

        assert!(query.contains(redirect));
        assert!(query.contains(calendar));
        assert!(!query.contains('+'));
    }
}
