//! Integration tests for GraphQL mutations
//!
//! Writes bypass the loaders; every test reads the result back in a
//! separate request, the way a client would.

mod common;

use serde_json::json;
use uuid::Uuid;

use common::*;

#[tokio::test]
async fn test_create_and_change_user() {
    let seed = Seed::new();

    let data = execute_ok(
        &seed.store,
        r#"mutation { createUser(dto: { name: "dave", balance: 12.5 }) { id name balance } }"#,
    )
    .await;
    let id = data["createUser"]["id"].as_str().unwrap().to_string();
    assert_eq!(data["createUser"]["name"], "dave");

    let data = execute_ok(
        &seed.store,
        &format!(
            r#"mutation {{ changeUser(id: "{id}", dto: {{ balance: 99.0 }}) {{ name balance }} }}"#
        ),
    )
    .await;
    assert_eq!(
        data["changeUser"],
        json!({ "name": "dave", "balance": 99.0 })
    );
}

#[tokio::test]
async fn test_create_user_balance_defaults_to_zero() {
    let seed = Seed::new();

    let data = execute_ok(
        &seed.store,
        r#"mutation { createUser(dto: { name: "erin" }) { name balance } }"#,
    )
    .await;

    assert_eq!(data["createUser"], json!({ "name": "erin", "balance": 0.0 }));
}

#[tokio::test]
async fn test_create_user_rejects_blank_name() {
    let seed = Seed::new();

    let response = execute(
        &seed.store,
        r#"mutation { createUser(dto: { name: "  ", balance: 0 }) { id } }"#,
    )
    .await;

    assert_eq!(response.errors.len(), 1);
    assert_eq!(response.errors[0].message, "Name cannot be empty");
}

#[tokio::test]
async fn test_change_unknown_user_reports_not_found() {
    let seed = Seed::new();

    let response = execute(
        &seed.store,
        &format!(
            r#"mutation {{ changeUser(id: "{}", dto: {{ name: "x" }}) {{ id }} }}"#,
            Uuid::new_v4()
        ),
    )
    .await;

    assert_eq!(response.errors[0].message, "user not found");
}

#[tokio::test]
async fn test_delete_user_cascades() {
    let seed = Seed::new();

    let data = execute_ok(
        &seed.store,
        &format!(r#"mutation {{ deleteUser(id: "{}") }}"#, seed.alice.id),
    )
    .await;
    assert_eq!(data, json!({ "deleteUser": null }));

    let data = execute_ok(
        &seed.store,
        "{ users { name subscribedToUser { name } } posts { title } }",
    )
    .await;
    assert_eq!(sorted_field(&data["users"], "name"), vec!["bob", "carol"]);
    assert!(data["users"]
        .as_array()
        .unwrap()
        .iter()
        .all(|user| user["subscribedToUser"] == json!([])));
    assert_eq!(sorted_field(&data["posts"], "title"), vec!["Bob writes"]);
}

#[tokio::test]
async fn test_post_lifecycle() {
    let seed = Seed::new();

    let data = execute_ok(
        &seed.store,
        &format!(
            r#"mutation {{ createPost(dto: {{ title: "New", content: "Body", authorId: "{}" }}) {{ id author {{ name }} }} }}"#,
            seed.carol.id
        ),
    )
    .await;
    assert_eq!(data["createPost"]["author"]["name"], "carol");
    let id = data["createPost"]["id"].as_str().unwrap().to_string();

    let data = execute_ok(
        &seed.store,
        &format!(r#"mutation {{ changePost(id: "{id}", dto: {{ title: "Renamed" }}) {{ title content }} }}"#),
    )
    .await;
    assert_eq!(
        data["changePost"],
        json!({ "title": "Renamed", "content": "Body" })
    );

    execute_ok(
        &seed.store,
        &format!(r#"mutation {{ deletePost(id: "{id}") }}"#),
    )
    .await;
    let data = execute_ok(&seed.store, &format!(r#"{{ post(id: "{id}") {{ id }} }}"#)).await;
    assert_eq!(data, json!({ "post": null }));
}

#[tokio::test]
async fn test_post_for_missing_author_is_rejected() {
    let seed = Seed::new();

    let response = execute(
        &seed.store,
        &format!(
            r#"mutation {{ createPost(dto: {{ title: "t", content: "c", authorId: "{}" }}) {{ id }} }}"#,
            Uuid::new_v4()
        ),
    )
    .await;

    assert_eq!(response.errors.len(), 1);
    assert!(response.errors[0].message.contains("does not exist"));
}

#[tokio::test]
async fn test_profile_lifecycle() {
    let seed = Seed::new();

    let data = execute_ok(
        &seed.store,
        &format!(
            r#"mutation {{ createProfile(dto: {{ userId: "{}", memberTypeId: basic, isMale: true, yearOfBirth: 2000 }}) {{ id memberType {{ id }} }} }}"#,
            seed.carol.id
        ),
    )
    .await;
    assert_eq!(data["createProfile"]["memberType"]["id"], "basic");
    let id = data["createProfile"]["id"].as_str().unwrap().to_string();

    let data = execute_ok(
        &seed.store,
        &format!(
            r#"mutation {{ changeProfile(id: "{id}", dto: {{ memberTypeId: business }}) {{ memberTypeId yearOfBirth }} }}"#
        ),
    )
    .await;
    assert_eq!(
        data["changeProfile"],
        json!({ "memberTypeId": "business", "yearOfBirth": 2000 })
    );

    let data = execute_ok(
        &seed.store,
        &format!(r#"mutation {{ deleteProfile(id: "{id}") }}"#),
    )
    .await;
    assert_eq!(data, json!({ "deleteProfile": null }));
}

#[tokio::test]
async fn test_second_profile_for_user_is_rejected() {
    let seed = Seed::new();

    let response = execute(
        &seed.store,
        &format!(
            r#"mutation {{ createProfile(dto: {{ userId: "{}", memberTypeId: basic, isMale: false, yearOfBirth: 1970 }}) {{ id }} }}"#,
            seed.alice.id
        ),
    )
    .await;

    assert_eq!(response.errors.len(), 1);
    assert!(response.errors[0].message.contains("already has a profile"));
}

#[tokio::test]
async fn test_subscribe_and_unsubscribe() {
    let seed = Seed::new();

    let data = execute_ok(
        &seed.store,
        &format!(
            r#"mutation {{ subscribeTo(userId: "{}", authorId: "{}") {{ name userSubscribedTo {{ name }} }} }}"#,
            seed.bob.id, seed.carol.id
        ),
    )
    .await;
    assert_eq!(data["subscribeTo"]["name"], "bob");
    assert_eq!(
        sorted_field(&data["subscribeTo"]["userSubscribedTo"], "name"),
        vec!["alice", "carol"]
    );

    let data = execute_ok(
        &seed.store,
        &format!(
            r#"mutation {{ unsubscribeFrom(userId: "{}", authorId: "{}") }}"#,
            seed.bob.id, seed.alice.id
        ),
    )
    .await;
    assert_eq!(data, json!({ "unsubscribeFrom": null }));

    let data = execute_ok(
        &seed.store,
        &format!(
            r#"{{ user(id: "{}") {{ userSubscribedTo {{ name }} }} }}"#,
            seed.bob.id
        ),
    )
    .await;
    assert_eq!(
        sorted_field(&data["user"]["userSubscribedTo"], "name"),
        vec!["carol"]
    );
}

#[tokio::test]
async fn test_duplicate_subscription_is_rejected() {
    let seed = Seed::new();

    let response = execute(
        &seed.store,
        &format!(
            r#"mutation {{ subscribeTo(userId: "{}", authorId: "{}") {{ id }} }}"#,
            seed.bob.id, seed.alice.id
        ),
    )
    .await;

    assert_eq!(response.errors.len(), 1);
    assert!(response.errors[0].message.contains("already subscribes"));
}

#[tokio::test]
async fn test_unavailable_store_is_masked() {
    let seed = Seed::new();
    seed.store.fail_operation("delete_post");

    let response = execute(
        &seed.store,
        &format!(r#"mutation {{ deletePost(id: "{}") }}"#, seed.bob_post.id),
    )
    .await;

    assert_eq!(response.errors[0].message, "An unexpected error occurred");
}
