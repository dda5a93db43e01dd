mod common;

use axum::http::StatusCode;
use backend::functions::create_entity_table::provision;
use backend::rest::{repository, service};
use contracts::shared::provisioning::TABLE_CREATED_MESSAGE;
use contracts::shared::rest::SelectQuery;
use pretty_assertions::assert_eq;
use serde_json::json;

use common::{column, object, setup, table_request, user};

#[tokio::test]
async fn creates_table_with_system_columns() {
    let conn = setup().await;
    let admin = user(&conn, "admin@acme.com").await;

    let response = provision(
        &conn,
        &admin,
        table_request("deals", vec![column("title", "text", true), column("amount", "number", false)]),
    )
    .await
    .unwrap();
    assert_eq!(response.message, TABLE_CREATED_MESSAGE);

    let columns = repository::table_columns(&conn, "deals").await.unwrap();
    assert_eq!(columns, vec!["id", "created_at", "created_by", "title", "amount"]);
    assert!(repository::is_registered_entity_table(&conn, "deals").await.unwrap());
}

#[tokio::test]
async fn provisioning_is_idempotent() {
    let conn = setup().await;
    let admin = user(&conn, "admin@acme.com").await;

    provision(&conn, &admin, table_request("deals", vec![]))
        .await
        .unwrap();
    let again = provision(&conn, &admin, table_request("deals", vec![]))
        .await
        .unwrap();
    assert_eq!(again.message, TABLE_CREATED_MESSAGE);
}

#[tokio::test]
async fn invalid_names_create_nothing() {
    let conn = setup().await;
    let admin = user(&conn, "admin@acme.com").await;

    for name in ["Deals", "my deals", "deals;drop", ""] {
        let err = provision(&conn, &admin, table_request(name, vec![]))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST, "{}", name);
    }

    let err = provision(
        &conn,
        &admin,
        table_request("deals", vec![column("Bad Name", "text", false)]),
    )
    .await
    .unwrap_err();
    assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    assert!(!repository::is_registered_entity_table(&conn, "deals").await.unwrap());
    assert!(repository::table_columns(&conn, "deals").await.unwrap().is_empty());
}

#[tokio::test]
async fn field_definitions_keep_the_table_in_step() {
    let conn = setup().await;
    let admin = user(&conn, "admin@acme.com").await;

    let entity = service::create(
        &conn,
        &admin,
        "entity_definitions",
        object(json!({ "name": "deals", "label": "Deals" })),
    )
    .await
    .unwrap();
    provision(&conn, &admin, table_request("deals", vec![]))
        .await
        .unwrap();

    let field = service::create(
        &conn,
        &admin,
        "field_definitions",
        object(json!({
            "entity_id": entity["id"],
            "name": "stage",
            "label": "Stage",
            "type": "text",
            "display_order": 0
        })),
    )
    .await
    .unwrap();
    let field_id = field["id"].as_str().unwrap().to_string();
    assert!(repository::table_columns(&conn, "deals")
        .await
        .unwrap()
        .contains(&"stage".to_string()));

    service::update(
        &conn,
        &admin,
        "field_definitions",
        &field_id,
        object(json!({ "name": "phase", "label": "Phase" })),
    )
    .await
    .unwrap();
    let columns = repository::table_columns(&conn, "deals").await.unwrap();
    assert!(columns.contains(&"phase".to_string()));
    assert!(!columns.contains(&"stage".to_string()));

    service::delete(&conn, &admin, "field_definitions", &field_id)
        .await
        .unwrap();
    let columns = repository::table_columns(&conn, "deals").await.unwrap();
    assert_eq!(columns, vec!["id", "created_at", "created_by"]);
}

#[tokio::test]
async fn field_of_unprovisioned_entity_only_writes_metadata() {
    let conn = setup().await;
    let admin = user(&conn, "admin@acme.com").await;

    let entity = service::create(
        &conn,
        &admin,
        "entity_definitions",
        object(json!({ "name": "leads", "label": "Leads" })),
    )
    .await
    .unwrap();
    service::create(
        &conn,
        &admin,
        "field_definitions",
        object(json!({
            "entity_id": entity["id"],
            "name": "source",
            "label": "Source",
            "type": "text"
        })),
    )
    .await
    .unwrap();

    let fields = service::list(
        &conn,
        "field_definitions",
        &SelectQuery::all().eq("entity_id", entity["id"].as_str().unwrap()),
    )
    .await
    .unwrap();
    assert_eq!(fields.len(), 1);
}

/// Entity, field, record: the record lands in the provisioned table
#[tokio::test]
async fn deals_end_to_end() {
    let conn = setup().await;
    let admin = user(&conn, "admin@acme.com").await;

    let entity = service::create(
        &conn,
        &admin,
        "entity_definitions",
        object(json!({ "name": "deals", "label": "Deals" })),
    )
    .await
    .unwrap();
    provision(&conn, &admin, table_request("deals", vec![]))
        .await
        .unwrap();
    service::create(
        &conn,
        &admin,
        "field_definitions",
        object(json!({
            "entity_id": entity["id"],
            "name": "amount",
            "label": "Amount",
            "type": "number",
            "is_required": true
        })),
    )
    .await
    .unwrap();

    service::create(&conn, &admin, "deals", object(json!({ "amount": 500 })))
        .await
        .unwrap();

    let rows = service::list(&conn, "deals", &SelectQuery::all()).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["amount"], json!(500));
    assert_eq!(rows[0]["created_by"], json!(admin));
}
