mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

use common::TestServer;

async fn create_item(server: &TestServer, token: &str, body: Value) -> Result<reqwest::Response> {
    Ok(reqwest::Client::new()
        .post(format!("{}/api/items", server.base_url))
        .bearer_auth(token)
        .json(&body)
        .send()
        .await?)
}

async fn list_items(server: &TestServer, token: &str) -> Result<Vec<Value>> {
    let res = reqwest::Client::new()
        .get(format!("{}/api/items", server.base_url))
        .bearer_auth(token)
        .send()
        .await?;
    anyhow::ensure!(
        res.status() == StatusCode::OK,
        "list failed with {}",
        res.status()
    );
    Ok(res.json().await?)
}

#[tokio::test]
async fn create_applies_defaults() -> Result<()> {
    let server = common::spawn_app().await?;
    let token = common::register(&server, "Ida", "ida@example.com").await?;

    let res = create_item(&server, &token, json!({ "name": "water plants" })).await?;
    assert_eq!(res.status(), StatusCode::OK);

    let item = res.json::<Value>().await?;
    assert_eq!(item["name"], "water plants");
    assert_eq!(item["category"], "personal");
    assert_eq!(item["doneNum"], Value::Null);
    assert_eq!(item["intervalRef"], Value::Null);
    assert!(item["owner"].is_string(), "owner should be set: {item}");
    assert!(item["date"].is_string(), "date should default: {item}");

    let items = list_items(&server, &token).await?;
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"], item["id"]);
    Ok(())
}

#[tokio::test]
async fn create_requires_a_name() -> Result<()> {
    let server = common::spawn_app().await?;
    let token = common::register(&server, "Ida", "ida@example.com").await?;

    for body in [json!({ "name": "" }), json!({})] {
        let res = create_item(&server, &token, body).await?;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let errors = res.json::<Value>().await?;
        assert_eq!(errors["errors"][0]["msg"], "Name is required");
        assert_eq!(errors["errors"][0]["param"], "name");
    }

    let items = list_items(&server, &token).await?;
    assert!(items.is_empty(), "rejected items must not persist: {items:?}");
    Ok(())
}

#[tokio::test]
async fn create_keeps_submitted_values_verbatim() -> Result<()> {
    let server = common::spawn_app().await?;
    let token = common::register(&server, "Ida", "ida@example.com").await?;

    // Unlike updates, creation stores empty strings and zero counts as given.
    let res = create_item(
        &server,
        &token,
        json!({
            "name": "stretch",
            "category": "",
            "doneNum": 0,
            "date": "2026-01-05T00:00:00Z",
        }),
    )
    .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let item = res.json::<Value>().await?;
    assert_eq!(item["category"], "");
    assert_eq!(item["doneNum"], 0);
    assert_eq!(item["date"], "2026-01-05T00:00:00Z");
    Ok(())
}

#[tokio::test]
async fn update_patches_only_submitted_fields() -> Result<()> {
    let server = common::spawn_app().await?;
    let token = common::register(&server, "Ida", "ida@example.com").await?;

    let created = create_item(
        &server,
        &token,
        json!({ "name": "read", "category": "leisure", "doneNum": 3 }),
    )
    .await?
    .json::<Value>()
    .await?;
    let id = created["id"].as_str().unwrap().to_string();

    let res = reqwest::Client::new()
        .put(format!("{}/api/items/{id}", server.base_url))
        .bearer_auth(&token)
        .json(&json!({ "name": "read more" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let item = res.json::<Value>().await?;
    assert_eq!(item["name"], "read more");
    assert_eq!(item["category"], "leisure", "untouched field changed: {item}");
    assert_eq!(item["doneNum"], 3, "untouched field changed: {item}");
    Ok(())
}

#[tokio::test]
async fn update_skips_empty_and_zero_values() -> Result<()> {
    let server = common::spawn_app().await?;
    let token = common::register(&server, "Ida", "ida@example.com").await?;

    let created = create_item(
        &server,
        &token,
        json!({ "name": "read", "category": "leisure", "doneNum": 3 }),
    )
    .await?
    .json::<Value>()
    .await?;
    let id = created["id"].as_str().unwrap().to_string();

    // Empty strings and zero counts are treated as "not provided".
    let res = reqwest::Client::new()
        .put(format!("{}/api/items/{id}", server.base_url))
        .bearer_auth(&token)
        .json(&json!({ "name": "", "category": "", "doneNum": 0 }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let item = res.json::<Value>().await?;
    assert_eq!(item, created, "no field should have changed");
    Ok(())
}

#[tokio::test]
async fn update_rejects_other_owners() -> Result<()> {
    let server = common::spawn_app().await?;
    let owner = common::register(&server, "Owner", "owner@example.com").await?;
    let intruder = common::register(&server, "Intruder", "intruder@example.com").await?;
    let client = reqwest::Client::new();

    let created = create_item(&server, &owner, json!({ "name": "private" }))
        .await?
        .json::<Value>()
        .await?;
    let id = created["id"].as_str().unwrap().to_string();

    let attempts = [
        client
            .put(format!("{}/api/items/{id}", server.base_url))
            .json(&json!({ "name": "stolen" })),
        client
            .put(format!("{}/api/items/increment/{id}", server.base_url))
            .json(&json!({ "doneNum": 1 })),
        client.delete(format!("{}/api/items/{id}", server.base_url)),
    ];
    for attempt in attempts {
        let res = attempt.bearer_auth(&intruder).send().await?;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let body = res.json::<Value>().await?;
        assert_eq!(body["msg"], "Not authorized");
    }

    let items = list_items(&server, &owner).await?;
    assert_eq!(items[0]["name"], "private", "item must be untouched");
    Ok(())
}

#[tokio::test]
async fn unknown_item_is_not_found() -> Result<()> {
    let server = common::spawn_app().await?;
    let token = common::register(&server, "Ida", "ida@example.com").await?;
    let client = reqwest::Client::new();
    let id = uuid::Uuid::new_v4();

    let attempts = [
        client
            .put(format!("{}/api/items/{id}", server.base_url))
            .json(&json!({ "name": "ghost" })),
        client
            .put(format!("{}/api/items/increment/{id}", server.base_url))
            .json(&json!({ "doneNum": 1 })),
        client.delete(format!("{}/api/items/{id}", server.base_url)),
    ];
    for attempt in attempts {
        let res = attempt.bearer_auth(&token).send().await?;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let body = res.json::<Value>().await?;
        assert_eq!(body["msg"], "Item not found");
    }
    Ok(())
}

#[tokio::test]
async fn increment_adds_one_to_the_submitted_count() -> Result<()> {
    let server = common::spawn_app().await?;
    let token = common::register(&server, "Ida", "ida@example.com").await?;
    let client = reqwest::Client::new();

    let created = create_item(&server, &token, json!({ "name": "situps", "doneNum": 2 }))
        .await?
        .json::<Value>()
        .await?;
    let id = created["id"].as_str().unwrap().to_string();

    // The count comes from the request body, not the stored row.
    let res = client
        .put(format!("{}/api/items/increment/{id}", server.base_url))
        .bearer_auth(&token)
        .json(&json!({ "doneNum": 5 }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let item = res.json::<Value>().await?;
    assert_eq!(item["doneNum"], 6);

    // A zero or missing count leaves the stored value alone.
    for body in [json!({ "doneNum": 0 }), json!({})] {
        let res = client
            .put(format!("{}/api/items/increment/{id}", server.base_url))
            .bearer_auth(&token)
            .json(&body)
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::OK);
        let item = res.json::<Value>().await?;
        assert_eq!(item["doneNum"], 6, "count moved on a skipped increment");
    }
    Ok(())
}

#[tokio::test]
async fn list_is_owner_scoped_and_newest_first() -> Result<()> {
    let server = common::spawn_app().await?;
    let mine = common::register(&server, "Mine", "mine@example.com").await?;
    let theirs = common::register(&server, "Theirs", "theirs@example.com").await?;

    for (name, date) in [
        ("january", "2026-01-01T00:00:00Z"),
        ("march", "2026-03-01T00:00:00Z"),
        ("february", "2026-02-01T00:00:00Z"),
    ] {
        create_item(&server, &mine, json!({ "name": name, "date": date })).await?;
    }
    create_item(&server, &theirs, json!({ "name": "not mine" })).await?;

    let items = list_items(&server, &mine).await?;
    let names: Vec<&str> = items.iter().filter_map(|i| i["name"].as_str()).collect();
    assert_eq!(names, vec!["march", "february", "january"]);

    let items = list_items(&server, &theirs).await?;
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["name"], "not mine");
    Ok(())
}

#[tokio::test]
async fn delete_round_trip() -> Result<()> {
    let server = common::spawn_app().await?;
    let token = common::register(&server, "Ida", "ida@example.com").await?;
    let client = reqwest::Client::new();

    let created = create_item(&server, &token, json!({ "name": "temporary" }))
        .await?
        .json::<Value>()
        .await?;
    let id = created["id"].as_str().unwrap().to_string();

    let res = client
        .delete(format!("{}/api/items/{id}", server.base_url))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["msg"], "Item removed");

    let items = list_items(&server, &token).await?;
    assert!(items.is_empty(), "removed item still listed: {items:?}");

    let res = client
        .delete(format!("{}/api/items/{id}", server.base_url))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn interval_reference_expands_in_responses() -> Result<()> {
    let server = common::spawn_app().await?;
    let token = common::register(&server, "Ida", "ida@example.com").await?;
    let client = reqwest::Client::new();

    let interval = client
        .post(format!("{}/api/intervals", server.base_url))
        .bearer_auth(&token)
        .json(&json!({ "name": "daily", "days": 1 }))
        .send()
        .await?
        .json::<Value>()
        .await?;
    let interval_id = interval["id"].as_str().unwrap().to_string();

    let item = create_item(
        &server,
        &token,
        json!({ "name": "walk", "intervalRef": interval_id }),
    )
    .await?
    .json::<Value>()
    .await?;
    assert_eq!(item["intervalRef"]["name"], "daily");
    assert_eq!(item["intervalRef"]["days"], 1);

    // A reference to a removed interval resolves to null instead of failing.
    let res = client
        .delete(format!("{}/api/intervals/{interval_id}", server.base_url))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let items = list_items(&server, &token).await?;
    assert_eq!(items[0]["intervalRef"], Value::Null);
    Ok(())
}

#[tokio::test]
async fn owner_cannot_be_reassigned() -> Result<()> {
    let server = common::spawn_app().await?;
    let token = common::register(&server, "Ida", "ida@example.com").await?;

    let created = create_item(&server, &token, json!({ "name": "mine" }))
        .await?
        .json::<Value>()
        .await?;
    let id = created["id"].as_str().unwrap().to_string();

    // An owner field in the body is ignored rather than honored.
    let res = reqwest::Client::new()
        .put(format!("{}/api/items/{id}", server.base_url))
        .bearer_auth(&token)
        .json(&json!({ "owner": uuid::Uuid::new_v4(), "name": "renamed" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let item = res.json::<Value>().await?;
    assert_eq!(item["name"], "renamed");
    assert_eq!(item["owner"], created["owner"]);
    Ok(())
}
