//INFO: Runs the data gateway

use anyhow::Result;

use crate::config::AppConfig;
use crate::integrations::GoogleApi;
use crate::server::{self, GatewayState};

pub async fn serve(config: &AppConfig) -> Result<()> {
    server::serve(config.bind_address, GatewayState::new(GoogleApi::new())).await
}
