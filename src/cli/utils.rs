use serde::Serialize;

use crate::cli::config::CliConfig;

/// Pretty-print a value as JSON to stdout.
pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn require_token(config: &CliConfig) -> anyhow::Result<String> {
    config.token.clone().ok_or_else(|| {
        anyhow::anyhow!("Not logged in; run: routinely auth login <email> --password <password>")
    })
}

/// Turn an API error response into a readable message, preferring the
/// server's `msg` / `errors` bodies over the raw status.
pub async fn api_error_message(response: reqwest::Response) -> String {
    let status = response.status();
    let body: serde_json::Value = match response.json().await {
        Ok(body) => body,
        Err(_) => return format!("server returned {status}"),
    };

    if let Some(msg) = body.get("msg").and_then(|msg| msg.as_str()) {
        return msg.to_string();
    }
    if let Some(errors) = body.get("errors").and_then(|errors| errors.as_array()) {
        let msgs: Vec<&str> = errors
            .iter()
            .filter_map(|error| error.get("msg").and_then(|msg| msg.as_str()))
            .collect();
        if !msgs.is_empty() {
            return msgs.join("; ");
        }
    }

    format!("server returned {status}")
}
