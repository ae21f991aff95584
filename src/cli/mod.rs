pub mod client;
pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use client::ApiClient;

#[derive(Parser)]
#[command(name = "pos")]
#[command(about = "POS CLI - Command-line interface for the point-of-sale API")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[arg(long, global = true, env = "POS_API_URL", default_value = "http://localhost:8080", help = "API base URL")]
    pub url: String,

    #[arg(long, global = true, env = "POS_API_TOKEN", hide_env_values = true, help = "Bearer token for /api routes")]
    pub token: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Remote server status")]
    Server {
        #[command(subcommand)]
        cmd: commands::server::ServerCommands,
    },

    #[command(about = "Registration, login and token inspection")]
    Auth {
        #[command(subcommand)]
        cmd: commands::auth::AuthCommands,
    },

    #[command(about = "Catalog data operations")]
    Data {
        #[command(subcommand)]
        cmd: commands::data::DataCommands,
    },

    #[command(about = "Database maintenance")]
    Db {
        #[command(subcommand)]
        cmd: commands::db::DbCommands,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let client = ApiClient::new(&cli.url, cli.token)?;

    match cli.command {
        Commands::Server { cmd } => commands::server::handle(cmd, &client, output_format).await,
        Commands::Auth { cmd } => commands::auth::handle(cmd, &client, output_format).await,
        Commands::Data { cmd } => commands::data::handle(cmd, &client, output_format).await,
        Commands::Db { cmd } => commands::db::handle(cmd, output_format).await,
    }
}
