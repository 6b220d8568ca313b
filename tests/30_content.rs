mod common;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use serde_json::Value;

use common::TestServer;

fn image_part(name: &str) -> Result<Part> {
    Ok(Part::bytes(common::png_bytes())
        .file_name(name.to_string())
        .mime_str("image/png")?)
}

async fn create(server: &TestServer, token: &str, kind: &str, name: &str, display_order: i32) -> Result<Value> {
    let form = Form::new()
        .text("name", name.to_string())
        .text("search_text", format!("{} search", name.to_lowercase()))
        .text("display_order", display_order.to_string())
        .part("image", image_part("picture.png")?);

    let res = reqwest::Client::new()
        .post(server.api(&format!("/admin/{}", kind)))
        .bearer_auth(token)
        .multipart(form)
        .send()
        .await?;
    anyhow::ensure!(res.status() == StatusCode::CREATED, "create failed: {}", res.status());

    let body: Value = res.json().await?;
    Ok(body["data"].clone())
}

async fn public_list(server: &TestServer, kind: &str) -> Result<Vec<Value>> {
    let body: Value = reqwest::get(server.api(&format!("/content/{}", kind)))
        .await?
        .json()
        .await?;
    body["data"].as_array().cloned().context("listing is not an array")
}

fn id_of(item: &Value) -> i64 {
    item["id"].as_i64().unwrap_or_default()
}

fn updated_at(item: &Value) -> Result<DateTime<Utc>> {
    let raw = item["updated_at"].as_str().context("no updated_at")?;
    Ok(raw.parse()?)
}

fn stored_files(server: &TestServer, bucket: &str) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in std::fs::read_dir(server.upload_dir.join(bucket))? {
        names.push(entry?.file_name().to_string_lossy().into_owned());
    }
    Ok(names)
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn listing_orders_by_display_order_then_id() -> Result<()> {
    let server = common::spawn_server_with_database().await?;
    let (_, token) = common::admin_token(&server).await?;

    let mut created = Vec::new();
    for (name, order) in [("Third", 3), ("FirstA", 1), ("FirstB", 1), ("Second", 2)] {
        created.push(create(&server, &token, "brands", name, order).await?);
    }
    let ours: Vec<i64> = created.iter().map(id_of).collect();

    let listed: Vec<i64> = public_list(&server, "brands")
        .await?
        .iter()
        .map(id_of)
        .filter(|id| ours.contains(id))
        .collect();

    // FirstA and FirstB tie on display_order; the lower id wins
    assert_eq!(listed, vec![ours[1], ours[2], ours[3], ours[0]]);
    Ok(())
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn partial_update_changes_only_supplied_fields() -> Result<()> {
    let server = common::spawn_server_with_database().await?;
    let (admin_id, token) = common::admin_token(&server).await?;
    let before = create(&server, &token, "categories", "Shoes", 10).await?;
    let id = id_of(&before);

    let res = reqwest::Client::new()
        .put(server.api(&format!("/admin/categories/{}", id)))
        .bearer_auth(&token)
        .multipart(Form::new().text("search_text", "sneakers trainers").text("name", ""))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let after: Value = res.json::<Value>().await?["data"].clone();

    assert_eq!(after["search_text"], "sneakers trainers");
    assert_eq!(after["name"], before["name"]);
    assert_eq!(after["display_order"], 10);
    assert_eq!(after["image_url"], before["image_url"]);
    assert_eq!(after["is_active"], true);
    assert_eq!(after["updated_by"], admin_id);
    assert!(updated_at(&after)? > updated_at(&before)?);
    Ok(())
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn empty_update_only_touches_audit_columns() -> Result<()> {
    let server = common::spawn_server_with_database().await?;
    let (admin_id, token) = common::admin_token(&server).await?;
    let before = create(&server, &token, "brands", "Steady", 4).await?;

    let res = reqwest::Client::new()
        .put(server.api(&format!("/admin/brands/{}", id_of(&before))))
        .bearer_auth(&token)
        .multipart(Form::new())
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let after: Value = res.json::<Value>().await?["data"].clone();

    for column in ["name", "search_text", "image_url", "display_order", "is_active", "created_at"] {
        assert_eq!(after[column], before[column], "{column} changed");
    }
    assert_eq!(after["updated_by"], admin_id);
    assert!(updated_at(&after)? > updated_at(&before)?);
    Ok(())
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn deactivated_rows_leave_listing_but_stay_readable() -> Result<()> {
    let server = common::spawn_server_with_database().await?;
    let (_, token) = common::admin_token(&server).await?;
    let item = create(&server, &token, "brands", "Hidden", 1).await?;
    let id = id_of(&item);
    let client = reqwest::Client::new();

    let res = client
        .put(server.api(&format!("/admin/brands/{}", id)))
        .bearer_auth(&token)
        .multipart(Form::new().text("is_active", "false"))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let listed = public_list(&server, "brands").await?;
    assert!(listed.iter().all(|row| id_of(row) != id));

    let shown: Value = client
        .get(server.api(&format!("/admin/brands/{}", id)))
        .bearer_auth(&token)
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(shown["data"]["is_active"], false);
    Ok(())
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn create_without_image_is_rejected_and_stores_nothing() -> Result<()> {
    let server = common::spawn_server_with_database().await?;
    let (_, token) = common::admin_token(&server).await?;
    let client = reqwest::Client::new();

    let res = client
        .post(server.api("/admin/categories"))
        .bearer_auth(&token)
        .multipart(Form::new().text("name", "No image").text("search_text", "none"))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await?;
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let res = client
        .post(server.api("/admin/categories"))
        .bearer_auth(&token)
        .multipart(Form::new().text("search_text", "no name").part("image", image_part("x.png")?))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let stored = std::fs::read_dir(server.upload_dir.join("categories"))?.count();
    assert_eq!(stored, 0, "rejected create must not leave an image behind");
    Ok(())
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn missing_rows_and_bad_ids() -> Result<()> {
    let server = common::spawn_server_with_database().await?;
    let (_, token) = common::admin_token(&server).await?;
    let client = reqwest::Client::new();

    let res = client
        .delete(server.api("/admin/brands/2147483647"))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client
        .put(server.api("/admin/brands/2147483647"))
        .bearer_auth(&token)
        .multipart(Form::new().text("name", "ghost"))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client
        .get(server.api("/admin/brands/abc"))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await?;
    assert_eq!(body["code"], "INVALID_PARAMETER");
    Ok(())
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn delete_removes_the_row() -> Result<()> {
    let server = common::spawn_server_with_database().await?;
    let (_, token) = common::admin_token(&server).await?;
    let item = create(&server, &token, "categories", "Doomed", 5).await?;
    let path = server.api(&format!("/admin/categories/{}", id_of(&item)));
    let client = reqwest::Client::new();

    let res = client.delete(&path).bearer_auth(&token).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["data"]["message"], "Category deleted");

    let res = client.get(&path).bearer_auth(&token).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn upload_stores_file_under_requested_bucket() -> Result<()> {
    let server = common::spawn_server_with_database().await?;
    let (_, token) = common::admin_token(&server).await?;
    let client = reqwest::Client::new();

    // `file` before `type`: the handler has to hold the bytes until it knows the bucket
    let form = Form::new()
        .part("file", image_part("Logo.PNG")?)
        .text("type", "brand");
    let res = client
        .post(server.api("/admin/upload"))
        .bearer_auth(&token)
        .multipart(form)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = res.json().await?;
    let filename = body["filename"].as_str().context("no filename")?;
    assert!(filename.ends_with(".png"));
    assert_eq!(body["size"], common::png_bytes().len());
    assert_eq!(
        body["url"],
        format!("{}/uploads/brands/{}", server.base_url, filename)
    );

    let served = reqwest::get(body["url"].as_str().context("no url")?).await?;
    assert_eq!(served.status(), StatusCode::OK);
    assert_eq!(served.bytes().await?.to_vec(), common::png_bytes());
    Ok(())
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn upload_rejects_other_file_types() -> Result<()> {
    let server = common::spawn_server_with_database().await?;
    let (_, token) = common::admin_token(&server).await?;

    let form = Form::new()
        .text("type", "banner")
        .part("file", Part::bytes(b"MZ".to_vec()).file_name("setup.exe"));
    let res = reqwest::Client::new()
        .post(server.api("/admin/upload"))
        .bearer_auth(&token)
        .multipart(form)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let stored = std::fs::read_dir(server.upload_dir.join("banners"))?.count();
    assert_eq!(stored, 0);
    Ok(())
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn upload_with_two_files_keeps_only_the_reported_one() -> Result<()> {
    let server = common::spawn_server_with_database().await?;
    let (_, token) = common::admin_token(&server).await?;

    let form = Form::new()
        .text("type", "banner")
        .part("file", image_part("first.png")?)
        .part("file", image_part("second.png")?);
    let res = reqwest::Client::new()
        .post(server.api("/admin/upload"))
        .bearer_auth(&token)
        .multipart(form)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = res.json().await?;
    let reported = body["filename"].as_str().context("no filename")?;
    assert_eq!(stored_files(&server, "banners")?, vec![reported.to_string()]);
    Ok(())
}
