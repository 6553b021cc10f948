//! CLI for EasyTotal
//!
//! - `serve`: categorization HTTP API
//! - `list`: operate the persisted shopping list from the terminal

pub mod list;
pub mod serve;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::logging;

/// EasyTotal - shopping list calculator with product categorization
#[derive(Parser)]
#[command(name = "easytotal")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the categorization API server
    Serve,

    /// Manage the shopping list
    List(list::ListArgs),
}

/// Load `.env` and layered configuration, then start logging
pub(crate) fn bootstrap() -> anyhow::Result<AppConfig> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    logging::init_logging(&config.logging);

    Ok(config)
}
