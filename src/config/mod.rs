//INFO: Configuration for Parley
//NOTE: Precedence is CLI flag, then environment, then config.json, then built-in defaults

use anyhow::{anyhow, Context, Result};
use clap::Args;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tracing::debug;
use url::Url;

pub const DEFAULT_APP_ORIGIN: &str = "http://127.0.0.1:18247";
pub const DEFAULT_GATEWAY_URL: &str = "http://127.0.0.1:3000";
pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:3000";

const CONFIG_FILE_NAME: &str = "config.json";

//INFO: Settings that can come from flags or environment variables
#[derive(Debug, Clone, Default, Args)]
pub struct ConfigOverrides {
    /// Directory holding config.json, the database and the key file
    #[arg(long, global = true, env = "PARLEY_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Google OAuth client id
    #[arg(long, global = true, env = "GOOGLE_CLIENT_ID", hide_env_values = true)]
    pub client_id: Option<String>,

    /// Origin the OAuth redirect comes back to
    #[arg(long, global = true, env = "PARLEY_APP_ORIGIN")]
    pub app_origin: Option<String>,

    /// Base URL of the data gateway
    #[arg(long, global = true, env = "PARLEY_GATEWAY_URL")]
    pub gateway_url: Option<String>,

    /// Address the gateway listens on
    #[arg(long, global = true, env = "PARLEY_BIND")]
    pub bind: Option<String>,
}

//INFO: Contents of config.json, every field optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_origin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gateway_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bind_address: Option<String>,
}

impl FileConfig {
    //INFO: Reads config.json from the data directory; a missing file is an empty config
    pub fn load(data_dir: &Path) -> Result<Self> {
        let path = data_dir.join(CONFIG_FILE_NAME);
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        serde_json::from_str(&contents).with_context(|| format!("Invalid {}", path.display()))
    }

    pub fn save(&self, data_dir: &Path) -> Result<PathBuf> {
        std::fs::create_dir_all(data_dir).context("Failed to create data directory")?;
        let path = data_dir.join(CONFIG_FILE_NAME);
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, contents)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }
}

//INFO: Fully resolved configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    //NOTE: Optional on purpose; sign in reports its absence to the user
    pub client_id: Option<String>,
    pub app_origin: Url,
    pub gateway_url: Url,
    pub bind_address: SocketAddr,
}

impl AppConfig {
    //INFO: Loads config.json from the data directory and applies overrides
    pub fn load(overrides: &ConfigOverrides) -> Result<Self> {
        let data_dir = match &overrides.data_dir {
            Some(directory) => directory.clone(),
            None => default_data_dir()?,
        };
        let file = FileConfig::load(&data_dir)?;
        Self::resolve(data_dir, file, overrides)
    }

    pub fn resolve(
        data_dir: PathBuf,
        file: FileConfig,
        overrides: &ConfigOverrides,
    ) -> Result<Self> {
        let client_id = pick(&overrides.client_id, &file.client_id)
            .filter(|id| !id.trim().is_empty());

        let app_origin = pick(&overrides.app_origin, &file.app_origin)
            .unwrap_or_else(|| DEFAULT_APP_ORIGIN.to_string());
        let gateway_url = pick(&overrides.gateway_url, &file.gateway_url)
            .unwrap_or_else(|| DEFAULT_GATEWAY_URL.to_string());
        let bind_address = pick(&overrides.bind, &file.bind_address)
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());

        let config = Self {
            data_dir,
            client_id,
            app_origin: parse_url("app origin", &app_origin)?,
            gateway_url: parse_url("gateway URL", &gateway_url)?,
            bind_address: bind_address
                .parse()
                .with_context(|| format!("Invalid bind address: {}", bind_address))?,
        };
        debug!(
            data_dir = %config.data_dir.display(),
            has_client_id = config.client_id.is_some(),
            app_origin = %config.app_origin,
            gateway_url = %config.gateway_url,
            "Resolved configuration"
        );

        Ok(config)
    }

    pub fn database_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn key_path(&self) -> PathBuf {
        self.data_dir.join(".key")
    }
}

fn pick(flag: &Option<String>, file: &Option<String>) -> Option<String> {
    flag.clone().or_else(|| file.clone())
}

fn parse_url(name: &str, value: &str) -> Result<Url> {
    let url = Url::parse(value).with_context(|| format!("Invalid {}: {}", name, value))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(anyhow!("Invalid {}: {} is not an http(s) URL", name, value));
    }
    Ok(url)
}

//INFO: Gets the platform-appropriate configuration directory for Parley
//NOTE: ~/.config/parley on Linux, ~/Library/Application Support/parley on macOS
pub fn default_data_dir() -> Result<PathBuf> {
    let config_dir =
        dirs::config_dir().context("Failed to determine config directory for this platform")?;

    Ok(config_dir.join("parley"))
}
