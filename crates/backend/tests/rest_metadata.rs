mod common;

use axum::http::StatusCode;
use backend::rest::service;
use contracts::shared::rest::SelectQuery;
use pretty_assertions::assert_eq;
use serde_json::json;

use common::{object, setup, user};

#[tokio::test]
async fn entity_definitions_round_trip() {
    let conn = setup().await;
    let admin = user(&conn, "admin@acme.com").await;

    let created = service::create(
        &conn,
        &admin,
        "entity_definitions",
        object(json!({ "name": "deals", "label": "Deals", "is_system": false })),
    )
    .await
    .unwrap();

    let id = created["id"].as_str().unwrap().to_string();
    assert_eq!(created["name"], json!("deals"));
    assert_eq!(created["is_system"], json!(false));
    assert!(created["created_at"].is_string());

    let single = service::get_single(&conn, "entity_definitions", &id).await.unwrap();
    assert_eq!(single["label"], json!("Deals"));

    let updated = service::update(
        &conn,
        &admin,
        "entity_definitions",
        &id,
        object(json!({ "label": "Open deals", "id": "ignored" })),
    )
    .await
    .unwrap();
    assert_eq!(updated["label"], json!("Open deals"));
    assert_eq!(updated["id"], json!(id));

    service::delete(&conn, &admin, "entity_definitions", &id)
        .await
        .unwrap();
    let err = service::get_single(&conn, "entity_definitions", &id)
        .await
        .unwrap_err();
    assert_eq!(err.status(), StatusCode::NOT_ACCEPTABLE);
}

#[tokio::test]
async fn filters_and_order() {
    let conn = setup().await;
    let admin = user(&conn, "admin@acme.com").await;

    for (name, label) in [("deals", "Deals"), ("leads", "Leads"), ("accounts", "Accounts")] {
        service::create(
            &conn,
            &admin,
            "entity_definitions",
            object(json!({ "name": name, "label": label })),
        )
        .await
        .unwrap();
    }

    let rows = service::list(
        &conn,
        "entity_definitions",
        &SelectQuery::all().order_by("name", false),
    )
    .await
    .unwrap();
    let names: Vec<&str> = rows.iter().map(|r| r["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["accounts", "deals", "leads"]);

    let rows = service::list(&conn, "entity_definitions", &SelectQuery::all().eq("name", "leads"))
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["label"], json!("Leads"));

    let rows = service::list(
        &conn,
        "entity_definitions",
        &SelectQuery::all().eq("is_system", "false"),
    )
    .await
    .unwrap();
    assert_eq!(rows.len(), 3);
}

#[tokio::test]
async fn json_columns_are_decoded() {
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

    let field = service::create(
        &conn,
        &admin,
        "field_definitions",
        object(json!({
            "entity_id": entity["id"],
            "name": "stage",
            "label": "Stage",
            "type": "select",
            "is_required": true,
            "options": [{ "label": "Won", "value": "won" }, { "label": "Lost", "value": "lost" }],
            "default_value": "won",
            "display_order": 1
        })),
    )
    .await
    .unwrap();

    assert_eq!(field["is_required"], json!(true));
    assert_eq!(field["is_unique"], json!(false));
    assert_eq!(field["options"][1]["value"], json!("lost"));
    assert_eq!(field["default_value"], json!("won"));
    assert_eq!(field["display_order"], json!(1));
}

#[tokio::test]
async fn unknown_tables_and_columns_are_rejected() {
    let conn = setup().await;
    let admin = user(&conn, "admin@acme.com").await;

    let err = service::list(&conn, "sys_users", &SelectQuery::all())
        .await
        .unwrap_err();
    assert_eq!(err.status(), StatusCode::NOT_FOUND);

    let err = service::list(&conn, "Deals", &SelectQuery::all())
        .await
        .unwrap_err();
    assert_eq!(err.status(), StatusCode::NOT_FOUND);

    let err = service::create(
        &conn,
        &admin,
        "entity_definitions",
        object(json!({ "name": "deals", "label": "Deals", "colour": "red" })),
    )
    .await
    .unwrap_err();
    assert_eq!(err.status(), StatusCode::BAD_REQUEST);

    let err = service::list(
        &conn,
        "entity_definitions",
        &SelectQuery::all().eq("colour", "red"),
    )
    .await
    .unwrap_err();
    assert_eq!(err.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn duplicate_entity_name_is_a_conflict() {
    let conn = setup().await;
    let admin = user(&conn, "admin@acme.com").await;
    let body = json!({ "name": "deals", "label": "Deals" });

    service::create(&conn, &admin, "entity_definitions", object(body.clone()))
        .await
        .unwrap();
    let err = service::create(&conn, &admin, "entity_definitions", object(body))
        .await
        .unwrap_err();
    assert_eq!(err.status(), StatusCode::CONFLICT);
}
