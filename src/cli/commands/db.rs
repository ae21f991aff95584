use anyhow::Context;
use clap::Subcommand;
use sqlx::postgres::PgPoolOptions;

use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::database::DatabaseManager;

#[derive(Subcommand)]
pub enum DbCommands {
    #[command(about = "Apply pending schema migrations")]
    Migrate {
        #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
        database_url: String,
    },
}

pub async fn handle(cmd: DbCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        DbCommands::Migrate { database_url } => {
            let target = DatabaseManager::redacted_url(&database_url)?;
            let pool = PgPoolOptions::new()
                .max_connections(1)
                .connect(&database_url)
                .await
                .with_context(|| format!("failed to connect to {}", target))?;
            DatabaseManager::run_migrations(&pool).await?;
            DatabaseManager::close(pool).await;
            output_success(&output_format, &format!("Migrations applied to {}", target), None)
        }
    }
}
