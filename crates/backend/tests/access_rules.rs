mod common;

use axum::http::StatusCode;
use backend::functions::create_entity_table::provision;
use backend::rest::service;
use contracts::shared::rest::SelectQuery;
use pretty_assertions::assert_eq;
use serde_json::json;

use common::{column, object, setup, table_request, user};

async fn deals_with_two_users() -> (sea_orm::DatabaseConnection, String, String) {
    let conn = setup().await;
    let alice = user(&conn, "alice@acme.com").await;
    let bob = user(&conn, "bob@acme.com").await;
    provision(
        &conn,
        &alice,
        table_request("deals", vec![column("title", "text", true)]),
    )
    .await
    .unwrap();
    (conn, alice, bob)
}

#[tokio::test]
async fn everyone_reads_every_row() {
    let (conn, alice, bob) = deals_with_two_users().await;

    service::create(&conn, &alice, "deals", object(json!({ "title": "Alpha" })))
        .await
        .unwrap();
    service::create(&conn, &bob, "deals", object(json!({ "title": "Beta" })))
        .await
        .unwrap();

    let rows = service::list(&conn, "deals", &SelectQuery::all().order_by("title", false))
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["created_by"], json!(alice));
    assert_eq!(rows[1]["created_by"], json!(bob));
}

#[tokio::test]
async fn insert_for_someone_else_is_forbidden() {
    let (conn, alice, bob) = deals_with_two_users().await;

    let err = service::create(
        &conn,
        &bob,
        "deals",
        object(json!({ "title": "Forged", "created_by": alice })),
    )
    .await
    .unwrap_err();
    assert_eq!(err.status(), StatusCode::FORBIDDEN);

    let own = service::create(
        &conn,
        &bob,
        "deals",
        object(json!({ "title": "Mine", "created_by": bob })),
    )
    .await
    .unwrap();
    assert_eq!(own["created_by"], json!(bob));
}

#[tokio::test]
async fn only_the_owner_updates_and_deletes() {
    let (conn, alice, bob) = deals_with_two_users().await;

    let row = service::create(&conn, &alice, "deals", object(json!({ "title": "Alpha" })))
        .await
        .unwrap();
    let id = row["id"].as_str().unwrap().to_string();

    let err = service::update(&conn, &bob, "deals", &id, object(json!({ "title": "Hijacked" })))
        .await
        .unwrap_err();
    assert_eq!(err.status(), StatusCode::FORBIDDEN);

    let err = service::delete(&conn, &bob, "deals", &id).await.unwrap_err();
    assert_eq!(err.status(), StatusCode::FORBIDDEN);

    let err = service::update(
        &conn,
        &alice,
        "deals",
        &id,
        object(json!({ "created_by": bob })),
    )
    .await
    .unwrap_err();
    assert_eq!(err.status(), StatusCode::FORBIDDEN);

    let updated = service::update(&conn, &alice, "deals", &id, object(json!({ "title": "Alpha 2" })))
        .await
        .unwrap();
    assert_eq!(updated["title"], json!("Alpha 2"));

    service::delete(&conn, &alice, "deals", &id).await.unwrap();
    let err = service::delete(&conn, &alice, "deals", &id).await.unwrap_err();
    assert_eq!(err.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn missing_required_column_is_a_client_error() {
    let (conn, alice, _bob) = deals_with_two_users().await;

    let err = service::create(&conn, &alice, "deals", object(json!({})))
        .await
        .unwrap_err();
    assert_eq!(err.status(), StatusCode::BAD_REQUEST);
}
