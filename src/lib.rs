//INFO: Parley Library - ask Gmail and Google Calendar from the terminal
//NOTE: This file wires together all modules and dispatches CLI commands

pub mod agent;
pub mod auth;
pub mod commands;
pub mod config;
pub mod crypto;
pub mod database;
pub mod integrations;
pub mod server;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use commands::{ask, auth as auth_commands, configure, serve};
use config::{default_data_dir, AppConfig, ConfigOverrides};

const DEFAULT_LOGIN_TIMEOUT_SECS: u64 = auth::callback::DEFAULT_CALLBACK_TIMEOUT.as_secs();

/// Ask your Gmail inbox and Google Calendar
#[derive(Debug, Parser)]
#[command(name = "parley", version)]
pub struct Cli {
    #[command(flatten)]
    pub config: ConfigOverrides,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in with Google in the browser
    Login {
        /// Seconds to wait for the browser to come back
        #[arg(long, default_value_t = DEFAULT_LOGIN_TIMEOUT_SECS)]
        timeout: u64,
    },
    /// Forget the stored access token
    Logout,
    /// Show whether a session is active
    Status {
        #[arg(long)]
        json: bool,
    },
    /// Ask a question about your emails or calendar
    Ask {
        question: Vec<String>,
        #[arg(long)]
        max_results: Option<u32>,
    },
    /// List recent inbox messages
    Emails {
        #[arg(long)]
        max_results: Option<u32>,
    },
    /// List upcoming calendar events
    Events {
        #[arg(long)]
        max_results: Option<u32>,
    },
    /// Run the data gateway
    Serve,
    /// Save the Google OAuth client id given with --client-id
    Configure,
}

//INFO: Library, binary and HTTP trace targets
pub const DEFAULT_LOG_FILTER: &str = "parley_lib=info,parley=info,tower_http=info";

//INFO: Sets up logging; RUST_LOG overrides the default filter
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

//INFO: Main run function that executes one CLI command
pub async fn run(cli: Cli) -> Result<()> {
    //NOTE: Configure must work even when the existing config.json is unusable
    if let Command::Configure = cli.command {
        let client_id = cli
            .config
            .client_id
            .as_deref()
            .ok_or_else(|| anyhow!("Pass the client id with --client-id <id>"))?;
        let data_dir = match &cli.config.data_dir {
            Some(directory) => directory.clone(),
            None => default_data_dir()?,
        };
        configure::configure(&data_dir, client_id)?;
        return Ok(());
    }

    let config = AppConfig::load(&cli.config)?;

    match cli.command {
        Command::Login { timeout } => {
            let session = auth_commands::login(&config, Duration::from_secs(timeout)).await?;
            if session.is_signed_in {
                println!("Signed in with Google.");
            }
        }
        Command::Logout => auth_commands::logout(&config)?,
        Command::Status { json } => {
            auth_commands::status(&config, json)?;
        }
        Command::Ask {
            question,
            max_results,
        } => {
            ask::ask(&config, &question.join(" "), max_results).await?;
        }
        Command::Emails { max_results } => ask::show_emails(&config, max_results).await?,
        Command::Events { max_results } => ask::show_events(&config, max_results).await?,
        Command::Serve => serve::serve(&config).await?,
        Command::Configure => {}
    }

    Ok(())
}
