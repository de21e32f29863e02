//! API integration tests against a running server and database

use reqwest::{multipart, Client, StatusCode};
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/v1/api";

/// Suffix keeping names unique across test runs
fn unique(prefix: &str) -> String {
    format!("{}{}", prefix, chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default())
}

/// Helper to register a fresh user and get a bearer token
async fn get_auth_token(client: &Client) -> String {
    let username = unique("user");

    let response = client
        .post(format!("{}/auth/register", BASE_URL))
        .json(&json!({ "username": username, "password": "secret" }))
        .send()
        .await
        .expect("Failed to send register request");
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = client
        .post(format!("{}/auth/token", BASE_URL))
        .form(&[("username", username.as_str()), ("password", "secret")])
        .send()
        .await
        .expect("Failed to send token request");

    let body: Value = response.json().await.expect("Failed to parse token response");
    body["access_token"].as_str().expect("No token in response").to_string()
}

async fn create_author(client: &Client, token: &str) -> Value {
    let response = client
        .post(format!("{}/authors/create", BASE_URL))
        .bearer_auth(token)
        .json(&json!({
            "name": unique("Ada Augusta "),
            "surname": "Lovelace",
            "birth_date": "1815-12-10",
            "biography": "Mathematician"
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CREATED);

    let body: Value = response.json().await.expect("Failed to parse response");
    body["data"].clone()
}

async fn create_book(client: &Client, token: &str, author_id: i64, title: &str) -> Value {
    let response = client
        .post(format!("{}/books/create", BASE_URL))
        .bearer_auth(token)
        .json(&json!({
            "title": title,
            "published_year": 1990,
            "genre": "Science",
            "author_id": author_id
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CREATED);

    let body: Value = response.json().await.expect("Failed to parse response");
    body["data"].clone()
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_register_twice_is_rejected() {
    let client = Client::new();
    let username = unique("dup");

    for expected in [StatusCode::CREATED, StatusCode::BAD_REQUEST] {
        let response = client
            .post(format!("{}/auth/register", BASE_URL))
            .json(&json!({ "username": username, "password": "secret" }))
            .send()
            .await
            .expect("Failed to send request");
        assert_eq!(response.status(), expected);
    }
}

#[tokio::test]
#[ignore]
async fn test_token_invalid_credentials() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/token", BASE_URL))
        .form(&[("username", "nobody"), ("password", "wrong")])
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore]
async fn test_unauthorized_access() {
    let client = Client::new();

    let response = client
        .get(format!("{}/authors/all", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore]
async fn test_author_crud() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let author = create_author(&client, &token).await;
    let id = author["id"].as_i64().expect("author id");
    assert_eq!(author["birth_date"], "1815-12-10");

    let response = client
        .put(format!("{}/authors/{}", BASE_URL, id))
        .bearer_auth(&token)
        .query(&[("author_biography", "Wrote the first program")])
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["biography"], "Wrote the first program");
    assert_eq!(body["data"]["full_name"], author["full_name"]);

    let response = client
        .put(format!("{}/authors/{}", BASE_URL, id))
        .bearer_auth(&token)
        .query(&[("author_surname", "King")])
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["name"], author["name"]);
    assert_eq!(body["data"]["surname"], "King");

    let response = client
        .delete(format!("{}/authors/{}", BASE_URL, id))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body.get("data").is_none());

    let response = client
        .get(format!("{}/authors/{}", BASE_URL, id))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore]
async fn test_book_crud_and_partial_update() {
    let client = Client::new();
    let token = get_auth_token(&client).await;
    let author_id = create_author(&client, &token).await["id"].as_i64().expect("author id");

    let book = create_book(&client, &token, author_id, &unique("Notes ")).await;
    let id = book["id"].as_i64().expect("book id");
    assert_eq!(book["author"]["id"], author_id);

    let new_title = unique("Sketch ");
    let response = client
        .put(format!("{}/books/{}", BASE_URL, id))
        .bearer_auth(&token)
        .query(&[("book_title", new_title.as_str())])
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["title"], new_title);
    assert_eq!(body["data"]["published_year"], 1990);
    assert_eq!(body["data"]["genre"], "Science");
    assert_eq!(body["data"]["author_id"], author_id);

    let response = client
        .get(format!("{}/books/search/", BASE_URL))
        .bearer_auth(&token)
        .query(&[("title", new_title.to_lowercase())])
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);

    let response = client
        .delete(format!("{}/books/{}", BASE_URL, id))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);

    let response = client
        .get(format!("{}/books/{}", BASE_URL, id))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore]
async fn test_book_year_out_of_range() {
    let client = Client::new();
    let token = get_auth_token(&client).await;
    let author_id = create_author(&client, &token).await["id"].as_i64().expect("author id");

    let response = client
        .post(format!("{}/books/create", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({
            "title": unique("Too old "),
            "published_year": 1700,
            "genre": "History",
            "author_id": author_id
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
#[ignore]
async fn test_csv_import_reports_skipped_rows() {
    let client = Client::new();
    let token = get_auth_token(&client).await;
    let author_id = create_author(&client, &token).await["id"].as_i64().expect("author id");

    let existing = unique("Existing ");
    create_book(&client, &token, author_id, &existing).await;

    let csv = format!(
        "title,published_year,genre,author_id\n{},2001,Fiction,{}\n{},2002,History,{}\n{},2003,Science,999999999\n",
        unique("Fresh "),
        author_id,
        existing,
        author_id,
        unique("Orphan ")
    );
    let form = multipart::Form::new().part(
        "file",
        multipart::Part::bytes(csv.into_bytes()).file_name("books.csv"),
    );

    let response = client
        .post(format!("{}/books/import", BASE_URL))
        .bearer_auth(&token)
        .multipart(form)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "1 books created successfully");
    assert_eq!(body["data"]["saved"], 1);
    assert_eq!(body["data"]["already_exist"], 1);
    assert_eq!(body["data"]["not_found"], 1);
    assert_eq!(body["data"]["already_exist_books"][0]["title"], existing);
}
