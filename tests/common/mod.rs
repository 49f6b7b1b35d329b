use anyhow::Result;
use serde_json::json;

use routinely_api::auth::AuthKeys;
use routinely_api::{app, AppState};

/// Password used for every test account.
pub const TEST_PASSWORD: &str = "hunter2-plus";

pub struct TestServer {
    pub base_url: String,
}

/// Boot the real router against a fresh in-memory store on an ephemeral
/// port. Each call gets fully isolated state.
pub async fn spawn_app() -> Result<TestServer> {
    let state = AppState::in_memory(AuthKeys::new("test-secret", 1));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        axum::serve(listener, app(state)).await.expect("test server");
    });

    Ok(TestServer {
        base_url: format!("http://{addr}"),
    })
}

/// Register an account and return its bearer token.
pub async fn register(server: &TestServer, name: &str, email: &str) -> Result<String> {
    let res = reqwest::Client::new()
        .post(format!("{}/api/users", server.base_url))
        .json(&json!({ "name": name, "email": email, "password": TEST_PASSWORD }))
        .send()
        .await?;
    anyhow::ensure!(
        res.status().is_success(),
        "register failed with {}",
        res.status()
    );

    let body = res.json::<serde_json::Value>().await?;
    body.get("token")
        .and_then(|token| token.as_str())
        .map(|token| token.to_string())
        .ok_or_else(|| anyhow::anyhow!("token missing in register response"))
}
