//INFO: Browser context abstraction
//NOTE: The session code only sees a location, navigation, history replacement and alerts

use anyhow::Result;
use std::io;
use tracing::{debug, info, warn};
use url::Url;

pub trait Browser {
    //INFO: The current location, fragment included
    fn location(&self) -> Url;

    //INFO: Full navigation; leaving the app origin tears the app down
    fn navigate(&mut self, url: &Url) -> Result<()>;

    //INFO: Replaces the current history entry without navigating
    fn replace_location(&mut self, url: Url);

    //INFO: Blocking user-facing message
    fn alert(&mut self, message: &str);

    //INFO: The authorization server sent the user back to this location
    fn arrive_at(&mut self, url: Url);
}

type Opener = fn(&str) -> io::Result<()>;

fn open_system_browser(url: &str) -> io::Result<()> {
    open::that(url)
}

//INFO: The CLI's browser context
//NOTE: Same-origin navigation is a route change, anything else opens the system browser
#[derive(Clone)]
pub struct SystemBrowser {
    origin: Url,
    location: Url,
    opener: Opener,
}

impl SystemBrowser {
    //INFO: Starts at the application root
    pub fn new(origin: Url) -> Self {
        Self::with_opener(origin, open_system_browser)
    }

    fn with_opener(origin: Url, opener: Opener) -> Self {
        let location = origin.join("/").unwrap_or_else(|_| origin.clone());
        Self {
            origin,
            location,
            opener,
        }
    }

    fn is_same_origin(&self, url: &Url) -> bool {
        url.origin() == self.origin.origin()
    }
}

impl Browser for SystemBrowser {
    fn location(&self) -> Url {
        self.location.clone()
    }

    fn navigate(&mut self, url: &Url) -> Result<()> {
        if self.is_same_origin(url) {
            debug!("Navigating to {}", url.path());
            self.location = url.clone();
            return Ok(());
        }

        //NOTE: Headless machines have no browser; the caller still prints the URL to visit
        let host = url.host_str().unwrap_or("browser");
        info!("Opening {} in the system browser", host);
        if let Err(e) = (self.opener)(url.as_str()) {
            warn!("Could not open the system browser: {}", e);
        }
        Ok(())
    }

    fn replace_location(&mut self, url: Url) {
        self.location = url;
    }

    fn alert(&mut self, message: &str) {
        eprintln!("{}", message);
    }

    fn arrive_at(&mut self, url: Url) {
        debug!("Browser arrived at {}", url.path());
        self.location = url;
    }
}
