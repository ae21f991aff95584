use clap::Subcommand;

use crate::cli::client::ApiClient;
use crate::cli::utils::{output_error, output_success};
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum ServerCommands {
    #[command(about = "Check server health status from API /health endpoint")]
    Health,

    #[command(about = "Show server information from API root endpoint")]
    Info,
}

pub async fn handle(cmd: ServerCommands, client: &ApiClient, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        ServerCommands::Health => {
            let response = client.get_raw("/health").await?;
            if response.status.is_success() {
                output_success(&output_format, &format!("{} is healthy", client.url("")), Some(response.body))
            } else {
                output_error(
                    &output_format,
                    &format!("{} is unhealthy (HTTP {})", client.url(""), response.status.as_u16()),
                    response.body["error"]["code"].as_str(),
                )?;
                anyhow::bail!("health check failed")
            }
        }
        ServerCommands::Info => {
            let body = client.get("/", &[]).await?;
            output_success(&output_format, "Server information", Some(body["data"].clone()))
        }
    }
}
