use std::collections::HashMap;

use reqwest::header::LOCATION;
use reqwest::StatusCode;
use serde_json::{json, Value};

use crate::helpers::spawn_app;

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn it_returns_a_dev_given_a_valid_body() {
    let app = spawn_app().await;

    let response = app
        .post_person(&json!({
            "apelido": "foo",
            "nome": "bye",
            "nascimento": "1992-11-23",
            "stack": ["Rust", "Ruby"]
        }))
        .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    assert!(response
        .headers()
        .get(LOCATION)
        .expect("header not found")
        .to_str()
        .expect("not ASCII value")
        .starts_with("/pessoas/"));
    let response_body = response.json::<HashMap<String, Value>>().await.unwrap();
    assert_eq!(response_body["apelido"], String::from("foo"));
    assert_eq!(response_body["nome"], String::from("bye"));
    assert_eq!(response_body["nascimento"], String::from("1992-11-23"));
    assert_eq!(response_body["stack"], json!(["Rust", "Ruby"]));
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn absent_stack_is_stored_empty() {
    let app = spawn_app().await;
    let id = app
        .create(json!({ "apelido": "ana", "nome": "Ana", "nascimento": "1985-09-23" }))
        .await;

    let response = app.get(&format!("/pessoas/{}", id)).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = response.json::<Value>().await.unwrap();
    assert_eq!(body["id"], id.as_str());
    assert_eq!(body["stack"], json!([]));
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn duplicate_nickname_is_unprocessable() {
    let app = spawn_app().await;
    let person = json!({ "apelido": "ana", "nome": "Ana", "nascimento": "1985-09-23" });
    app.create(person.clone()).await;

    let response = app.post_person(&person).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = response.json::<Value>().await.unwrap();
    assert_eq!(body["error"], "a person with this apelido already exists");
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn not_found_person() {
    let app = spawn_app().await;

    let response = app.get("/pessoas/e50408fa-e368-4ccd-9ade-851fdb553e0f").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = response.json::<Value>().await.unwrap();
    assert_eq!(body["message"], "person not found");
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn search_matches_every_field_case_insensitively() {
    let app = spawn_app().await;
    let by_name = app
        .create(json!({ "apelido": "xavi", "nome": "JAVAnês Souza", "nascimento": "1990-01-01" }))
        .await;
    let by_nickname = app
        .create(json!({ "apelido": "java_dev", "nome": "Maria", "nascimento": "1991-02-02" }))
        .await;
    let by_stack = app
        .create(json!({
            "apelido": "front",
            "nome": "Paulo",
            "nascimento": "1992-03-03",
            "stack": ["Go", "JavaScript"]
        }))
        .await;
    app.create(json!({
        "apelido": "rustacean",
        "nome": "Ferris",
        "nascimento": "2015-05-15",
        "stack": ["Rust"]
    }))
    .await;

    let response = app.get("/pessoas?t=java").await;

    assert_eq!(response.status(), StatusCode::OK);
    let found = response.json::<Vec<Value>>().await.unwrap();
    let mut ids: Vec<&str> = found.iter().map(|person| person["id"].as_str().unwrap()).collect();
    ids.sort_unstable();
    let mut expected = vec![by_name.as_str(), by_nickname.as_str(), by_stack.as_str()];
    expected.sort_unstable();
    assert_eq!(ids, expected);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn search_without_matches_is_empty() {
    let app = spawn_app().await;
    app.create(json!({ "apelido": "foo", "nome": "bar", "nascimento": "2020-12-03" }))
        .await;

    let response = app.get("/pessoas?t=python").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.json::<Vec<Value>>().await.unwrap(), Vec::<Value>::new());
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn search_treats_wildcards_literally() {
    let app = spawn_app().await;
    app.create(json!({ "apelido": "foo", "nome": "bar", "nascimento": "2020-12-03" }))
        .await;

    let response = app.get("/pessoas?t=%25").await;

    assert_eq!(response.json::<Vec<Value>>().await.unwrap(), Vec::<Value>::new());
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn update_changes_only_provided_fields() {
    let app = spawn_app().await;
    let id = app
        .create(json!({
            "apelido": "foo",
            "nome": "bar",
            "nascimento": "2020-12-03",
            "stack": ["Rust"]
        }))
        .await;

    let response = app.put_person(&id, &json!({ "nome": "baz" })).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = response.json::<Value>().await.unwrap();
    assert_eq!(body["nome"], "baz");
    assert_eq!(body["apelido"], "foo");
    assert_eq!(body["nascimento"], "2020-12-03");
    assert_eq!(body["stack"], json!(["Rust"]));
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn update_with_empty_stack_clears_it() {
    let app = spawn_app().await;
    let id = app
        .create(json!({
            "apelido": "foo",
            "nome": "bar",
            "nascimento": "2020-12-03",
            "stack": ["Rust", "Ruby"]
        }))
        .await;

    let response = app.put_person(&id, &json!({ "stack": [] })).await;

    assert_eq!(response.status(), StatusCode::OK);
    let stored = app.get(&format!("/pessoas/{}", id)).await;
    assert_eq!(stored.json::<Value>().await.unwrap()["stack"], json!([]));
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn update_unknown_person_is_not_found() {
    let app = spawn_app().await;

    let response = app
        .put_person("e50408fa-e368-4ccd-9ade-851fdb553e0f", &json!({ "nome": "baz" }))
        .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn concurrent_disjoint_updates_are_both_kept() {
    let app = spawn_app().await;
    let id = app
        .create(json!({ "apelido": "foo", "nome": "bar", "nascimento": "2020-12-03" }))
        .await;

    let rename_body = json!({ "nome": "renamed" });
    let restack_body = json!({ "stack": ["Elixir"] });

    let (rename, restack) = tokio::join!(
        app.put_person(&id, &rename_body),
        app.put_person(&id, &restack_body),
    );

    assert_eq!(rename.status(), StatusCode::OK);
    assert_eq!(restack.status(), StatusCode::OK);
    let stored = app.get(&format!("/pessoas/{}", id)).await;
    let body = stored.json::<Value>().await.unwrap();
    assert_eq!(body["nome"], "renamed");
    assert_eq!(body["stack"], json!(["Elixir"]));
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn count_persons_populated_db() {
    let app = spawn_app().await;
    app.create(json!({ "apelido": "foo", "nome": "bar", "nascimento": "2020-12-03" }))
        .await;

    let response = app.get("/contagem-pessoas").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await.unwrap(), "1");
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn calendar_invalid_date_is_unprocessable() {
    let app = spawn_app().await;
    let id = app
        .create(json!({ "apelido": "foo", "nome": "bar", "nascimento": "2020-12-03" }))
        .await;

    let created = app
        .post_person(&json!({ "apelido": "baz", "nome": "qux", "nascimento": "2023-02-31" }))
        .await;
    let updated = app.put_person(&id, &json!({ "nascimento": "2023-02-31" })).await;

    assert_eq!(created.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(updated.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let stored = app.get(&format!("/pessoas/{}", id)).await;
    assert_eq!(stored.json::<Value>().await.unwrap()["nascimento"], "2020-12-03");
}
