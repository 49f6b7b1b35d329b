use clap::Subcommand;
use serde_json::json;

use crate::cli::config::{load_config, save_config};
use crate::cli::utils::{api_error_message, print_json, require_token};
use crate::cli::OutputFormat;
use crate::handlers::users::TokenBody;
use crate::models::UserProfile;

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Register a new account and store the token")]
    Register {
        #[arg(help = "Display name")]
        name: String,
        #[arg(help = "Email address")]
        email: String,
        #[arg(long, help = "Password (6 or more characters)")]
        password: String,
    },

    #[command(about = "Login and store the token")]
    Login {
        #[arg(help = "Email address")]
        email: String,
        #[arg(long, help = "Password")]
        password: String,
    },

    #[command(about = "Show the account behind the stored token")]
    Whoami,

    #[command(about = "Forget the stored token")]
    Logout,
}

pub async fn handle(cmd: AuthCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        AuthCommands::Register {
            name,
            email,
            password,
        } => {
            let body = json!({ "name": name, "email": email, "password": password });
            store_token_from("/api/users", &body, email, output_format).await
        }
        AuthCommands::Login { email, password } => {
            let body = json!({ "email": email, "password": password });
            store_token_from("/api/auth", &body, email, output_format).await
        }
        AuthCommands::Whoami => {
            let config = load_config()?;
            let token = require_token(&config)?;

            let response = reqwest::Client::new()
                .get(format!("{}/api/auth", config.server_url))
                .bearer_auth(&token)
                .send()
                .await?;
            if !response.status().is_success() {
                anyhow::bail!(api_error_message(response).await);
            }
            let profile: UserProfile = response.json().await?;

            match output_format {
                OutputFormat::Json => print_json(&profile)?,
                OutputFormat::Text => {
                    println!("{} <{}>", profile.name, profile.email);
                    println!("id: {}", profile.id);
                    println!("since: {}", profile.date.format("%Y-%m-%d"));
                }
            }
            Ok(())
        }
        AuthCommands::Logout => {
            let mut config = load_config()?;
            config.token = None;
            config.email = None;
            save_config(&config)?;

            match output_format {
                OutputFormat::Json => print_json(&json!({ "logged_out": true }))?,
                OutputFormat::Text => println!("Logged out"),
            }
            Ok(())
        }
    }
}

/// POST credentials to a token endpoint and persist the returned token.
async fn store_token_from(
    path: &str,
    body: &serde_json::Value,
    email: String,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    let mut config = load_config()?;

    let response = reqwest::Client::new()
        .post(format!("{}{}", config.server_url, path))
        .json(body)
        .send()
        .await?;
    if !response.status().is_success() {
        anyhow::bail!(api_error_message(response).await);
    }
    let token: TokenBody = response.json().await?;

    config.token = Some(token.token);
    config.email = Some(email.clone());
    save_config(&config)?;

    match output_format {
        OutputFormat::Json => print_json(&json!({ "logged_in": email }))?,
        OutputFormat::Text => println!("Logged in as {email}"),
    }
    Ok(())
}
