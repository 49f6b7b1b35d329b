use clap::Subcommand;
use serde_json::json;
use uuid::Uuid;

use crate::cli::config::{load_config, CliConfig};
use crate::cli::utils::{api_error_message, print_json, require_token};
use crate::cli::OutputFormat;
use crate::models::ResolvedItem;

#[derive(Subcommand)]
pub enum ItemCommands {
    #[command(about = "List your items, newest first")]
    List,

    #[command(about = "Add an item")]
    Add {
        #[arg(help = "Item name")]
        name: String,
        #[arg(long, help = "Category (server default: personal)")]
        category: Option<String>,
        #[arg(long, help = "Recurrence interval id")]
        interval: Option<Uuid>,
    },

    #[command(about = "Record one more completion for an item")]
    Done {
        #[arg(help = "Item id")]
        id: Uuid,
    },

    #[command(about = "Delete an item")]
    Remove {
        #[arg(help = "Item id")]
        id: Uuid,
    },
}

pub async fn handle(cmd: ItemCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let config = load_config()?;
    let token = require_token(&config)?;
    let client = reqwest::Client::new();

    match cmd {
        ItemCommands::List => {
            let items = fetch_items(&client, &config, &token).await?;

            match output_format {
                OutputFormat::Json => print_json(&items)?,
                OutputFormat::Text => {
                    if items.is_empty() {
                        println!("No items yet; add one with: routinely items add <name>");
                    }
                    for item in &items {
                        println!("{}", format_item(item));
                    }
                }
            }
            Ok(())
        }
        ItemCommands::Add {
            name,
            category,
            interval,
        } => {
            let mut body = json!({ "name": name });
            if let Some(category) = category {
                body["category"] = json!(category);
            }
            if let Some(interval) = interval {
                body["intervalRef"] = json!(interval);
            }

            let response = client
                .post(format!("{}/api/items", config.server_url))
                .bearer_auth(&token)
                .json(&body)
                .send()
                .await?;
            if !response.status().is_success() {
                anyhow::bail!(api_error_message(response).await);
            }
            let item: ResolvedItem = response.json().await?;

            match output_format {
                OutputFormat::Json => print_json(&item)?,
                OutputFormat::Text => println!("Added {}", format_item(&item)),
            }
            Ok(())
        }
        ItemCommands::Done { id } => {
            let items = fetch_items(&client, &config, &token).await?;
            let item = items
                .iter()
                .find(|item| item.id == id)
                .ok_or_else(|| anyhow::anyhow!("Item {id} not found"))?;

            // A counter that was never set cannot pass the increment route
            // (zero counts as absent), so the first completion goes through
            // a plain update instead.
            let response = match item.done_num {
                Some(n) if n > 0 => {
                    client
                        .put(format!("{}/api/items/increment/{id}", config.server_url))
                        .bearer_auth(&token)
                        .json(&json!({ "doneNum": n }))
                        .send()
                        .await?
                }
                _ => {
                    client
                        .put(format!("{}/api/items/{id}", config.server_url))
                        .bearer_auth(&token)
                        .json(&json!({ "doneNum": 1 }))
                        .send()
                        .await?
                }
            };
            if !response.status().is_success() {
                anyhow::bail!(api_error_message(response).await);
            }
            let item: ResolvedItem = response.json().await?;

            match output_format {
                OutputFormat::Json => print_json(&item)?,
                OutputFormat::Text => println!(
                    "Done: {} ({} so far)",
                    item.name,
                    item.done_num.unwrap_or(0)
                ),
            }
            Ok(())
        }
        ItemCommands::Remove { id } => {
            let response = client
                .delete(format!("{}/api/items/{id}", config.server_url))
                .bearer_auth(&token)
                .send()
                .await?;
            if !response.status().is_success() {
                anyhow::bail!(api_error_message(response).await);
            }

            match output_format {
                OutputFormat::Json => print_json(&json!({ "removed": id }))?,
                OutputFormat::Text => println!("Removed {id}"),
            }
            Ok(())
        }
    }
}

async fn fetch_items(
    client: &reqwest::Client,
    config: &CliConfig,
    token: &str,
) -> anyhow::Result<Vec<ResolvedItem>> {
    let response = client
        .get(format!("{}/api/items", config.server_url))
        .bearer_auth(token)
        .send()
        .await?;
    if !response.status().is_success() {
        anyhow::bail!(api_error_message(response).await);
    }
    Ok(response.json().await?)
}

fn format_item(item: &ResolvedItem) -> String {
    let done = item
        .done_num
        .map(|n| format!("{n}x"))
        .unwrap_or_else(|| "-".to_string());
    let recurrence = item
        .interval_ref
        .as_ref()
        .map(|interval| format!("  every {} day(s)", interval.days))
        .unwrap_or_default();

    format!(
        "{}  [{}] {:>4}  {}{}",
        item.id, item.category, done, item.name, recurrence
    )
}
