use clap::Subcommand;
use serde_json::json;
use uuid::Uuid;

use crate::cli::config::load_config;
use crate::cli::utils::{api_error_message, print_json, require_token};
use crate::cli::OutputFormat;
use crate::models::Interval;

#[derive(Subcommand)]
pub enum IntervalCommands {
    #[command(about = "List your recurrence intervals")]
    List,

    #[command(about = "Add a recurrence interval")]
    Add {
        #[arg(help = "Interval name")]
        name: String,
        #[arg(long, default_value_t = 1, help = "Recurrence period in days")]
        days: i32,
    },

    #[command(about = "Delete a recurrence interval")]
    Remove {
        #[arg(help = "Interval id")]
        id: Uuid,
    },
}

pub async fn handle(cmd: IntervalCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let config = load_config()?;
    let token = require_token(&config)?;
    let client = reqwest::Client::new();

    match cmd {
        IntervalCommands::List => {
            let response = client
                .get(format!("{}/api/intervals", config.server_url))
                .bearer_auth(&token)
                .send()
                .await?;
            if !response.status().is_success() {
                anyhow::bail!(api_error_message(response).await);
            }
            let intervals: Vec<Interval> = response.json().await?;

            match output_format {
                OutputFormat::Json => print_json(&intervals)?,
                OutputFormat::Text => {
                    if intervals.is_empty() {
                        println!("No intervals yet; add one with: routinely intervals add <name>");
                    }
                    for interval in &intervals {
                        println!(
                            "{}  every {:>3} day(s)  {}",
                            interval.id, interval.days, interval.name
                        );
                    }
                }
            }
            Ok(())
        }
        IntervalCommands::Add { name, days } => {
            let response = client
                .post(format!("{}/api/intervals", config.server_url))
                .bearer_auth(&token)
                .json(&json!({ "name": name, "days": days }))
                .send()
                .await?;
            if !response.status().is_success() {
                anyhow::bail!(api_error_message(response).await);
            }
            let interval: Interval = response.json().await?;

            match output_format {
                OutputFormat::Json => print_json(&interval)?,
                OutputFormat::Text => println!(
                    "Added interval {} (every {} day(s)): {}",
                    interval.name, interval.days, interval.id
                ),
            }
            Ok(())
        }
        IntervalCommands::Remove { id } => {
            let response = client
                .delete(format!("{}/api/intervals/{id}", config.server_url))
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
