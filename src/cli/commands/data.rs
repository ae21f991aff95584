use clap::{Subcommand, ValueEnum};

use crate::cli::client::ApiClient;
use crate::cli::utils::{output_page, output_success};
use crate::cli::OutputFormat;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Entity {
    Categories,
    AddOns,
    OrderTypes,
    Outlets,
}

impl Entity {
    pub fn path(&self) -> &'static str {
        match self {
            Entity::Categories => "/api/categories",
            Entity::AddOns => "/api/add-ons",
            Entity::OrderTypes => "/api/order-types",
            Entity::Outlets => "/api/outlets",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Entity::Categories => "categories",
            Entity::AddOns => "add-ons",
            Entity::OrderTypes => "order types",
            Entity::Outlets => "outlets",
        }
    }
}

#[derive(Subcommand)]
pub enum DataCommands {
    #[command(about = "List one page of an entity")]
    List {
        #[arg(value_enum)]
        entity: Entity,
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long, help = "Column to sort by (falls back to created_at)")]
        sort_by: Option<String>,
        #[arg(long, help = "ASC or DESC")]
        sort_order: Option<String>,
        #[arg(long, help = "Case-insensitive name filter")]
        search: Option<String>,
    },

    #[command(about = "Show a single record")]
    Get {
        #[arg(value_enum)]
        entity: Entity,
        id: String,
    },

    #[command(about = "Delete a single record")]
    Delete {
        #[arg(value_enum)]
        entity: Entity,
        id: String,
    },
}

pub async fn handle(cmd: DataCommands, client: &ApiClient, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        DataCommands::List { entity, page, limit, sort_by, sort_order, search } => {
            let mut query: Vec<(&str, String)> = Vec::new();
            if let Some(page) = page {
                query.push(("page", page.to_string()));
            }
            if let Some(limit) = limit {
                query.push(("limit", limit.to_string()));
            }
            if let Some(sort_by) = sort_by {
                query.push(("sort_by", sort_by));
            }
            if let Some(sort_order) = sort_order {
                query.push(("sort_order", sort_order));
            }
            if let Some(search) = search {
                query.push(("search", search));
            }
            let body = client.get(entity.path(), &query).await?;
            output_page(&output_format, entity.label(), &body)
        }
        DataCommands::Get { entity, id } => {
            let body = client.get(&format!("{}/{}", entity.path(), id), &[]).await?;
            output_success(&output_format, &format!("{} {}", entity.label(), id), Some(body["data"].clone()))
        }
        DataCommands::Delete { entity, id } => {
            client.delete(&format!("{}/{}", entity.path(), id)).await?;
            output_success(&output_format, &format!("Deleted {} {}", entity.label(), id), None)
        }
    }
}
