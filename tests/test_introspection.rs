//! Integration tests for catalog introspection against an in-memory catalog.

use std::collections::HashMap;
use std::time::Duration;

use futures::stream::TryStreamExt;
use futures::StreamExt;
use pg_column_rs::protocol::constants::*;
use pg_column_rs::{CatalogRow, CatalogSource, Error, IntrospectParams, Introspector, QualifiedName, Result};
use tokio_test::{assert_err, assert_ok};

/// Catalog keyed by "schema.table".
#[derive(Default)]
struct MemoryCatalog {
    tables: HashMap<String, Vec<CatalogRow>>,
    requested: Vec<QualifiedName>,
    delay: Option<Duration>,
}

impl MemoryCatalog {
    fn with_table(mut self, key: &str, rows: Vec<CatalogRow>) -> Self {
        self.tables.insert(key.to_string(), rows);
        self
    }
}

impl CatalogSource for MemoryCatalog {
    async fn column_rows(&mut self, table: &QualifiedName) -> Result<Vec<CatalogRow>> {
        self.requested.push(table.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let key = format!("{}.{}", table.schema_or("?"), table.identifier);
        Ok(self.tables.get(&key).cloned().unwrap_or_default())
    }
}

fn orders_rows() -> Vec<CatalogRow> {
    vec![
        CatalogRow::new("id", "bigint", PG_TYPE_INT8)
            .with_default("nextval('orders_id_seq'::regclass)")
            .with_not_null(true),
        CatalogRow::new("status", "character varying(20)", PG_TYPE_VARCHAR)
            .with_type_modifier(24)
            .with_default("'pending'::character varying")
            .with_not_null(true),
        CatalogRow::new("price", "numeric(10,2)", PG_TYPE_NUMERIC).with_type_modifier(655366),
        CatalogRow::new("quantity", "integer", PG_TYPE_INT4).with_default("1"),
        CatalogRow::new("total", "numeric", PG_TYPE_NUMERIC)
            .with_default("(price * (quantity)::numeric)")
            .with_generated("s"),
        CatalogRow::new("tags", "text[]", PG_TYPE_TEXT_ARRAY)
            .with_default("'{}'::text[]")
            .with_generated(""),
        CatalogRow::new("created_at", "timestamp(6) without time zone", PG_TYPE_TIMESTAMP)
            .with_type_modifier(6)
            .with_default("CURRENT_TIMESTAMP"),
    ]
}

fn catalog() -> MemoryCatalog {
    MemoryCatalog::default()
        .with_table("public.orders", orders_rows())
        .with_table(
            "audit.events",
            vec![CatalogRow::new("event_id", "integer", PG_TYPE_INT4)
                .with_default("nextval('events_event_id_seq'::regclass)")],
        )
}

#[tokio::test]
async fn test_introspect_orders() {
    let mut introspector = Introspector::new(catalog(), IntrospectParams::default());
    let orders = introspector.columns("orders").await.unwrap();

    assert_eq!(orders.table(), "orders");
    assert_eq!(
        orders.column_names(),
        vec!["id", "status", "price", "quantity", "total", "tags", "created_at"]
    );

    let id = orders.column("id").unwrap();
    assert!(id.is_serial());
    assert!(id.has_default());
    assert!(!id.null());
    assert_eq!(id.oid(), PG_TYPE_INT8);
    assert_eq!(orders.primary_serial().map(|c| c.name()), Some("id"));

    let status = orders.column("status").unwrap();
    assert_eq!(status.default(), Some("pending"));
    assert_eq!(status.limit(), Some(20));
    assert_eq!(status.fmod(), 24);

    let price = orders.column("price").unwrap();
    assert_eq!(price.precision(), Some(10));
    assert_eq!(price.scale(), Some(2));
    assert!(!price.has_default());

    assert_eq!(orders.column("quantity").unwrap().default(), Some("1"));

    let total = orders.column("total").unwrap();
    assert!(total.is_virtual());
    assert!(!total.has_default());
    assert!(!total.is_serial());

    let tags = orders.column("tags").unwrap();
    assert!(!tags.is_virtual());
    assert!(tags.is_array());
    assert_eq!(tags.sql_type(), "text");
    assert_eq!(tags.oid(), PG_TYPE_TEXT_ARRAY);

    let created_at = orders.column("created_at").unwrap();
    assert_eq!(created_at.default(), None);
    assert_eq!(created_at.default_function(), Some("CURRENT_TIMESTAMP"));
    assert_eq!(created_at.precision(), Some(6));
}

#[tokio::test]
async fn test_default_schema_applied() {
    let mut introspector = Introspector::new(catalog(), IntrospectParams::new("audit"));
    let events = introspector.columns("events").await.unwrap();
    assert!(events.get(0).unwrap().is_serial());

    let source = introspector.into_inner();
    assert_eq!(source.requested[0].schema.as_deref(), Some("audit"));
}

#[tokio::test]
async fn test_qualified_table_name() {
    let mut introspector = Introspector::new(catalog(), IntrospectParams::default());
    let events = introspector.columns("audit.events").await.unwrap();
    assert_eq!(events.table(), "audit.events");
    // Sequence name is rebuilt from the unqualified table name.
    assert!(events.column("event_id").unwrap().is_serial());
}

#[tokio::test]
async fn test_missing_table() {
    let mut introspector = Introspector::new(catalog(), IntrospectParams::default());
    match introspector.columns("nope").await {
        Err(Error::TableNotFound { table }) => assert_eq!(table, "nope"),
        other => panic!("Expected TableNotFound, got {:?}", other.map(|t| t.len())),
    }
}

#[tokio::test]
async fn test_invalid_table_name() {
    let mut introspector = Introspector::new(catalog(), IntrospectParams::default());
    let result = introspector.columns("a.b.c").await;
    assert!(matches!(result, Err(Error::InvalidTableName { .. })));
    assert!(introspector.into_inner().requested.is_empty());
}

#[tokio::test]
async fn test_query_timeout() {
    let mut source = catalog();
    source.delay = Some(Duration::from_millis(200));
    let params = IntrospectParams::default().with_query_timeout(Duration::from_millis(20));
    let mut introspector = Introspector::new(source, params);

    match introspector.columns("orders").await {
        Err(Error::IntrospectionTimeout { table, timeout }) => {
            assert_eq!(table, "orders");
            assert_eq!(timeout, Duration::from_millis(20));
        }
        other => panic!("Expected IntrospectionTimeout, got {:?}", other.map(|t| t.len())),
    }
}

#[tokio::test]
async fn test_columns_for() {
    let mut introspector = Introspector::new(catalog(), IntrospectParams::default());
    let tables = assert_ok!(introspector.columns_for(["orders", "audit.events"]).await);
    assert_eq!(tables.len(), 2);
    assert_eq!(tables[1].len(), 1);

    assert_err!(introspector.columns_for(["orders", "nope"]).await);
}

#[tokio::test]
async fn test_into_stream() {
    let introspector = Introspector::new(catalog(), IntrospectParams::default());
    let results: Vec<_> = introspector
        .into_stream(vec![
            "orders".to_string(),
            "nope".to_string(),
            "audit.events".to_string(),
        ])
        .collect()
        .await;

    assert_eq!(results.len(), 3);
    assert!(results[0].is_ok());
    assert!(matches!(results[1], Err(Error::TableNotFound { .. })));
    assert!(results[2].is_ok());
}

#[tokio::test]
async fn test_into_stream_try_collect() {
    let introspector = Introspector::new(catalog(), IntrospectParams::default());
    let names: Vec<String> = introspector
        .into_stream(vec!["orders".to_string(), "audit.events".to_string()])
        .map_ok(|t| t.table().to_string())
        .try_collect()
        .await
        .unwrap();
    assert_eq!(names, vec!["orders", "audit.events"]);
}

#[test]
fn test_blocking_introspection() {
    let mut introspector = Introspector::new(catalog(), IntrospectParams::default());
    let orders = tokio_test::block_on(introspector.columns("orders")).unwrap();
    assert_eq!(orders.len(), 7);
}
