//INFO: Loopback listener for the OAuth callback route
//NOTE: Browsers never send the fragment to a server, so the callback page forwards it back to us

use anyhow::{anyhow, Context, Result};
use std::time::{Duration, Instant};
use tiny_http::{Header, Request, Response, Server};
use tracing::{debug, info, warn};
use url::Url;

use super::fragment::access_token_from_fragment;
use super::google::CALLBACK_PATH;

//INFO: Path the callback page forwards the fragment to, as a query string
pub const COMPLETE_PATH: &str = "/auth/google/callback/complete";

pub const DEFAULT_CALLBACK_TIMEOUT: Duration = Duration::from_secs(300);

//INFO: Loading indicator shown while the redirect is processed
pub const CALLBACK_PAGE: &str = r#"<!DOCTYPE html>
<html>
  <head><meta charset="utf-8"><title>Parley</title></head>
  <body style="background:#000;color:#a1a1aa;font-family:sans-serif;display:flex;min-height:100vh;align-items:center;justify-content:center">
    <div style="text-align:center">
      <p>Completing sign in...</p>
    </div>
    <script>
      if (window.location.hash) {
        window.location.replace("/auth/google/callback/complete?" + window.location.hash.substring(1));
      }
    </script>
  </body>
</html>
"#;

const SIGNED_IN_PAGE: &str = "Signed in to Parley. You can close this window now.";
const MISSING_TOKEN_PAGE: &str = "Sign in did not return an access token. Please try again.";

pub struct CallbackListener {
    server: Server,
    origin: Url,
}

impl CallbackListener {
    //INFO: Binds the host and port of the app origin
    //NOTE: Bind before navigating away so the redirect can't arrive before we listen
    pub fn bind(app_origin: &Url) -> Result<Self> {
        let host = app_origin
            .host_str()
            .ok_or_else(|| anyhow!("App origin has no host: {}", app_origin))?;
        let port = app_origin
            .port_or_known_default()
            .ok_or_else(|| anyhow!("App origin has no port: {}", app_origin))?;

        let server = Server::http((host, port))
            .map_err(|e| anyhow!("Failed to start local server: {}", e))?;
        info!("Listening for the OAuth callback on {}:{}", host, port);

        Ok(Self {
            server,
            origin: app_origin.clone(),
        })
    }

    //INFO: Port actually bound, useful when the origin asked for port 0
    pub fn port(&self) -> Option<u16> {
        let address = self.server.server_addr().to_ip()?;
        Some(address.port())
    }

    //INFO: Serves the callback page until a fragment with an access token comes back
    //NOTE: Returns the location the browser landed on, fragment included
    pub fn wait_for_redirect(&self, timeout: Duration) -> Result<Url> {
        let deadline = Instant::now() + timeout;

        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(anyhow!("Timed out waiting for the OAuth redirect"));
            }

            let Some(request) = self
                .server
                .recv_timeout(remaining)
                .context("Failed to receive callback request")?
            else {
                continue;
            };

            if let Some(location) = self.handle_request(request)? {
                return Ok(location);
            }
        }
    }

    fn handle_request(&self, request: Request) -> Result<Option<Url>> {
        let requested = self
            .origin
            .join(request.url())
            .context("Malformed callback request URL")?;
        debug!("Callback listener got {}", requested.path());

        match requested.path() {
            CALLBACK_PATH => {
                request.respond(html(CALLBACK_PAGE))?;
                Ok(None)
            }
            COMPLETE_PATH => {
                let fragment = requested.query().unwrap_or_default().to_string();

                if access_token_from_fragment(&fragment).is_none() {
                    warn!("OAuth redirect arrived without an access token");
                    let page = Response::from_string(MISSING_TOKEN_PAGE).with_status_code(400);
                    request.respond(page)?;
                    return Ok(None);
                }

                request.respond(Response::from_string(SIGNED_IN_PAGE))?;

                let mut location = self.origin.join(CALLBACK_PATH)?;
                location.set_fragment(Some(&fragment));
                Ok(Some(location))
            }
            _ => {
                request.respond(Response::from_string("Not found").with_status_code(404))?;
                Ok(None)
            }
        }
    }
}

fn html(body: &str) -> Response<std::io::Cursor<Vec<u8>>> {
    let response = Response::from_string(body);
    match Header::from_bytes(&b"Content-Type"[..], &b"text/html; charset=utf-8"[..]) {
        Ok(header) => response.with_header(header),
        Err(_) => response,
    }
}
