//! End-to-end dispatch tests over SQLite.
//!
//! Exercises the full create -> insert -> read -> update -> delete ->
//! drop lifecycle through the dispatcher, verifying envelope shapes and
//! row data at every step.

use serde_json::json;
use sql_tool_gateway::db::{DbPool, ExecutionGateway};
use sql_tool_gateway::dispatch::ToolDispatcher;
use tempfile::NamedTempFile;

async fn memory_dispatcher() -> ToolDispatcher {
    let pool = DbPool::connect("sqlite::memory:").await.unwrap();
    ToolDispatcher::new(ExecutionGateway::new(pool))
}

#[tokio::test]
async fn test_full_crud_lifecycle() {
    let dispatcher = memory_dispatcher().await;

    let envelope = dispatcher
        .invoke(
            "create_sql_table",
            json!({"table": "t", "columns": {"id": "INT PRIMARY KEY"}}),
        )
        .await;
    assert!(envelope.ok, "create failed: {:?}", envelope.error);
    assert!(envelope.message.is_some());
    assert!(envelope.data.is_none());

    let envelope = dispatcher
        .invoke("insert_sql_entry", json!({"table": "t", "values": {"id": 1}}))
        .await;
    assert!(envelope.ok, "insert failed: {:?}", envelope.error);
    let data = envelope.data.unwrap();
    assert_eq!(data["inserted"], json!(1));
    assert_eq!(data["rows"], json!([{"id": 1}]));

    let envelope = dispatcher
        .invoke("read_sql_entry", json!({"table": "t", "where": {"id": 1}}))
        .await;
    assert!(envelope.ok);
    let data = envelope.data.unwrap();
    assert_eq!(data["count"], json!(1));
    assert_eq!(data["rows"], json!([{"id": 1}]));

    let envelope = dispatcher
        .invoke(
            "update_sql_entry",
            json!({"table": "t", "set": {"id": 2}, "where": {"id": 1}}),
        )
        .await;
    assert!(envelope.ok);
    let data = envelope.data.unwrap();
    assert_eq!(data["updated"], json!(1));
    assert_eq!(data["rows"], json!([{"id": 2}]));

    let envelope = dispatcher
        .invoke("delete_sql_entry", json!({"table": "t", "where": {"id": 2}}))
        .await;
    assert!(envelope.ok);
    let data = envelope.data.unwrap();
    assert_eq!(data["deleted"], json!(1));
    assert_eq!(data["rows"], json!([{"id": 2}]));

    let envelope = dispatcher
        .invoke("drop_sql_table", json!({"table": "t"}))
        .await;
    assert!(envelope.ok);
    assert!(envelope.data.is_none());
}

#[tokio::test]
async fn test_insert_round_trip_preserves_values() {
    let dispatcher = memory_dispatcher().await;
    dispatcher
        .invoke(
            "create_sql_table",
            json!({"table": "person", "columns": {
                "id": "INT PRIMARY KEY",
                "name": "VARCHAR(255)",
                "age": "INT",
                "gender": "CHAR(1)"
            }}),
        )
        .await;

    let envelope = dispatcher
        .invoke(
            "insert_sql_entry",
            json!({"table": "person", "values": {"id": 1, "name": "Mike", "age": 30}}),
        )
        .await;
    assert!(envelope.ok, "insert failed: {:?}", envelope.error);
    let data = envelope.data.unwrap();
    let row = &data["rows"][0];
    assert_eq!(row["id"], json!(1));
    assert_eq!(row["name"], json!("Mike"));
    assert_eq!(row["age"], json!(30));
    // Omitted column comes back with the database default
    assert_eq!(row["gender"], json!(null));
}

#[tokio::test]
async fn test_read_with_column_list_and_limit() {
    let dispatcher = memory_dispatcher().await;
    dispatcher
        .invoke(
            "create_sql_table",
            json!({"table": "person", "columns": {"id": "INT", "name": "TEXT"}}),
        )
        .await;
    for (id, name) in [(1, "Ada"), (2, "Bob"), (3, "Cem")] {
        let envelope = dispatcher
            .invoke(
                "insert_sql_entry",
                json!({"table": "person", "values": {"id": id, "name": name}}),
            )
            .await;
        assert!(envelope.ok);
    }

    let envelope = dispatcher
        .invoke(
            "read_sql_entry",
            json!({"table": "person", "columns": ["name"], "limit": 2}),
        )
        .await;
    assert!(envelope.ok);
    let data = envelope.data.unwrap();
    assert_eq!(data["count"], json!(2));
    // Only the requested column is present
    assert!(data["rows"][0].get("id").is_none());
    assert!(data["rows"][0].get("name").is_some());
}

#[tokio::test]
async fn test_read_with_in_list_and_is_null() {
    let dispatcher = memory_dispatcher().await;
    dispatcher
        .invoke(
            "create_sql_table",
            json!({"table": "person", "columns": {"id": "INT", "name": "TEXT"}}),
        )
        .await;
    for (id, name) in [(1, json!("Ada")), (2, json!("Bob")), (3, json!(null))] {
        dispatcher
            .invoke(
                "insert_sql_entry",
                json!({"table": "person", "values": {"id": id, "name": name}}),
            )
            .await;
    }

    let envelope = dispatcher
        .invoke(
            "read_sql_entry",
            json!({"table": "person", "where": {"id": [1, 3]}}),
        )
        .await;
    assert_eq!(envelope.data.unwrap()["count"], json!(2));

    let envelope = dispatcher
        .invoke(
            "read_sql_entry",
            json!({"table": "person", "where": {"name": null}}),
        )
        .await;
    let data = envelope.data.unwrap();
    assert_eq!(data["count"], json!(1));
    assert_eq!(data["rows"][0]["id"], json!(3));

    // Empty IN list matches no rows but is not an error
    let envelope = dispatcher
        .invoke(
            "read_sql_entry",
            json!({"table": "person", "where": {"id": []}}),
        )
        .await;
    assert!(envelope.ok);
    assert_eq!(envelope.data.unwrap()["count"], json!(0));
}

#[tokio::test]
async fn test_update_multi_row_and_delete_in_list() {
    let dispatcher = memory_dispatcher().await;
    dispatcher
        .invoke(
            "create_sql_table",
            json!({"table": "person", "columns": {"id": "INT", "age": "INT"}}),
        )
        .await;
    for id in 1..=3 {
        dispatcher
            .invoke(
                "insert_sql_entry",
                json!({"table": "person", "values": {"id": id, "age": 20}}),
            )
            .await;
    }

    let envelope = dispatcher
        .invoke(
            "update_sql_entry",
            json!({"table": "person", "set": {"age": 21}, "where": {"id": [1, 2]}}),
        )
        .await;
    assert!(envelope.ok);
    assert_eq!(envelope.data.unwrap()["updated"], json!(2));

    let envelope = dispatcher
        .invoke(
            "delete_sql_entry",
            json!({"table": "person", "where": {"age": 21}}),
        )
        .await;
    assert_eq!(envelope.data.unwrap()["deleted"], json!(2));

    let envelope = dispatcher
        .invoke("read_sql_entry", json!({"table": "person"}))
        .await;
    assert_eq!(envelope.data.unwrap()["count"], json!(1));
}

#[tokio::test]
async fn test_file_backed_database_persists_across_connections() {
    let db_path = NamedTempFile::new()
        .unwrap()
        .into_temp_path()
        .keep()
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    let url = format!("sqlite:{db_path}");

    {
        let pool = DbPool::connect(&url).await.unwrap();
        let dispatcher = ToolDispatcher::new(ExecutionGateway::new(pool));
        dispatcher
            .invoke(
                "create_sql_table",
                json!({"table": "t", "columns": {"id": "INT"}}),
            )
            .await;
        let envelope = dispatcher
            .invoke("insert_sql_entry", json!({"table": "t", "values": {"id": 7}}))
            .await;
        assert!(envelope.ok);
        dispatcher.gateway().close().await;
    }

    let pool = DbPool::connect(&url).await.unwrap();
    let dispatcher = ToolDispatcher::new(ExecutionGateway::new(pool));
    let envelope = dispatcher
        .invoke("read_sql_entry", json!({"table": "t"}))
        .await;
    assert!(envelope.ok);
    assert_eq!(envelope.data.unwrap()["rows"], json!([{"id": 7}]));
}

#[tokio::test]
async fn test_create_is_idempotent_with_guard_and_fails_without() {
    let dispatcher = memory_dispatcher().await;
    let content = json!({"table": "t", "columns": {"id": "INT"}});

    assert!(dispatcher.invoke("create_sql_table", content.clone()).await.ok);
    // Second create with the default IF NOT EXISTS guard succeeds
    assert!(dispatcher.invoke("create_sql_table", content.clone()).await.ok);

    // With the guard disabled the engine reports the duplicate
    let envelope = dispatcher
        .invoke(
            "create_sql_table",
            json!({"table": "t", "columns": {"id": "INT"}, "if_not_exists": false}),
        )
        .await;
    assert!(!envelope.ok);
    assert!(envelope.error.is_some());
}
