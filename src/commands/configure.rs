//INFO: Persists the Google client id into config.json
//NOTE: Other fields already in the file are kept as they are

use anyhow::{anyhow, Result};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::config::FileConfig;

pub fn configure(data_dir: &Path, client_id: &str) -> Result<PathBuf> {
    let client_id = client_id.trim();
    if client_id.is_empty() {
        return Err(anyhow!("Client ID must not be empty"));
    }

    let mut file = FileConfig::load(data_dir)?;
    file.client_id = Some(client_id.to_string());
    let path = file.save(data_dir)?;

    info!("Saved Google client id to {}", path.display());
    println!("Saved Google client id to {}", path.display());
    Ok(path)
}
