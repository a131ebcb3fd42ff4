//! Schema introspection: turning catalog rows into columns.
//!
//! The catalog query itself is run by a [`CatalogSource`]; this module owns
//! everything that happens after the rows come back, in particular the
//! decisions the [`Column`] descriptor relies on being made for it: which
//! defaults are literals, which are functions, and whether a default draws
//! from the column's own sequence.
//!
//! # Example
//!
//! ```
//! use pg_column_rs::introspect::{CatalogRow, CatalogSource, Introspector, IntrospectParams, QualifiedName};
//! use pg_column_rs::Result;
//!
//! struct Fixed(Vec<CatalogRow>);
//!
//! impl CatalogSource for Fixed {
//!     async fn column_rows(&mut self, _table: &QualifiedName) -> Result<Vec<CatalogRow>> {
//!         Ok(self.0.clone())
//!     }
//! }
//!
//! # tokio_test::block_on(async {
//! let source = Fixed(vec![
//!     CatalogRow::new("id", "integer", 23)
//!         .with_default("nextval('users_id_seq'::regclass)")
//!         .with_not_null(true),
//! ]);
//! let mut introspector = Introspector::new(source, IntrospectParams::default());
//! let users = introspector.columns("users").await?;
//! assert!(users.get(0).unwrap().is_serial());
//! # Ok::<(), pg_column_rs::Error>(())
//! # }).unwrap();
//! ```

pub mod default;
mod name;

use std::future::Future;
use std::time::Duration;

use futures::Stream;

use crate::error::{Error, Result};
use crate::protocol::constants::{MAX_IDENTIFIER_LENGTH, TYPMOD_NONE};
use crate::types::{Column, SqlTypeMetadata, TableDefinition};

pub use name::QualifiedName;

use default::{extract_default_function, extract_value_from_default, is_serial_default};

/// Catalog query producing one [`CatalogRow`] per attribute, in attribute
/// order. `$1` is the quoted, qualified table name (see
/// [`QualifiedName`]'s `Display`).
pub const COLUMN_DEFINITIONS_QUERY: &str = "\
SELECT a.attname, format_type(a.atttypid, a.atttypmod),
       pg_get_expr(d.adbin, d.adrelid), a.attnotnull, a.atttypid, a.atttypmod,
       c.collname, col_description(a.attrelid, a.attnum) AS comment,
       a.attgenerated
  FROM pg_attribute a
  LEFT JOIN pg_attrdef d ON a.attrelid = d.adrelid AND a.attnum = d.adnum
  LEFT JOIN pg_type t ON a.atttypid = t.oid
  LEFT JOIN pg_collation c ON a.attcollation = c.oid AND a.attcollation <> t.typcollation
 WHERE a.attrelid = $1::regclass
   AND a.attnum > 0 AND NOT a.attisdropped
 ORDER BY a.attnum";

/// Introspection parameters.
#[derive(Debug, Clone)]
pub struct IntrospectParams {
    /// Schema for unqualified table names.
    pub schema: String,
    /// Identifier length limit used to rebuild sequence names.
    pub max_identifier_length: usize,
    /// Upper bound on one catalog query (default: 20 seconds).
    pub query_timeout: Duration,
}

impl IntrospectParams {
    /// Create parameters for the given default schema.
    pub fn new(schema: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            max_identifier_length: MAX_IDENTIFIER_LENGTH,
            query_timeout: Duration::from_secs(20),
        }
    }

    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = schema.into();
        self
    }

    /// Set the identifier length limit, for servers built with a
    /// non-default `NAMEDATALEN`.
    pub fn with_max_identifier_length(mut self, len: usize) -> Self {
        self.max_identifier_length = len;
        self
    }

    /// Set the catalog query timeout.
    ///
    /// # Example
    ///
    /// ```
    /// use pg_column_rs::introspect::IntrospectParams;
    /// use std::time::Duration;
    ///
    /// let params = IntrospectParams::new("app")
    ///     .with_query_timeout(Duration::from_secs(5));
    /// ```
    pub fn with_query_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout = timeout;
        self
    }
}

impl Default for IntrospectParams {
    fn default() -> Self {
        Self::new("public")
    }
}

/// One attribute as returned by [`COLUMN_DEFINITIONS_QUERY`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogRow {
    /// `attname`.
    pub name: String,
    /// `format_type(atttypid, atttypmod)`.
    pub sql_type: String,
    /// `pg_get_expr(adbin, adrelid)`.
    pub default: Option<String>,
    /// `attnotnull`.
    pub not_null: bool,
    /// `atttypid`.
    pub type_oid: u32,
    /// `atttypmod`.
    pub type_modifier: i32,
    /// Collation name, only when it differs from the type's.
    pub collation: Option<String>,
    pub comment: Option<String>,
    /// `attgenerated`: empty when not generated, `s` for stored.
    pub generated: Option<String>,
}

impl CatalogRow {
    /// Create a nullable row with no default and no type modifier.
    pub fn new(name: impl Into<String>, sql_type: impl Into<String>, type_oid: u32) -> Self {
        Self {
            name: name.into(),
            sql_type: sql_type.into(),
            default: None,
            not_null: false,
            type_oid,
            type_modifier: TYPMOD_NONE,
            collation: None,
            comment: None,
            generated: None,
        }
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn with_not_null(mut self, not_null: bool) -> Self {
        self.not_null = not_null;
        self
    }

    pub fn with_type_modifier(mut self, type_modifier: i32) -> Self {
        self.type_modifier = type_modifier;
        self
    }

    pub fn with_collation(mut self, collation: impl Into<String>) -> Self {
        self.collation = Some(collation.into());
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn with_generated(mut self, generated: impl Into<String>) -> Self {
        self.generated = Some(generated.into());
        self
    }

    fn is_generated(&self) -> bool {
        self.generated
            .as_deref()
            .is_some_and(|g| !g.trim().is_empty())
    }
}

/// Source of catalog rows, typically a live connection running
/// [`COLUMN_DEFINITIONS_QUERY`].
pub trait CatalogSource {
    /// Fetch the attributes of `table`, in attribute order.
    ///
    /// An empty result means the table has no visible columns; the
    /// introspector reports that as [`Error::TableNotFound`].
    fn column_rows(
        &mut self,
        table: &QualifiedName,
    ) -> impl Future<Output = Result<Vec<CatalogRow>>> + Send;
}

/// Build a column from a catalog row.
///
/// For generated columns the catalog's default expression is the generation
/// expression; it is kept verbatim as the default function.
pub fn column_from_catalog(
    table: &QualifiedName,
    row: CatalogRow,
    params: &IntrospectParams,
) -> Column {
    let default_value = extract_value_from_default(row.default.as_deref());
    let default_function = if row.is_generated() {
        row.default.clone()
    } else {
        extract_default_function(default_value.as_deref(), row.default.as_deref())
    };
    let serial = is_serial_default(
        &table.identifier,
        &row.name,
        default_function.as_deref(),
        params.max_identifier_length,
    );

    let metadata = SqlTypeMetadata::new(row.sql_type, row.type_oid, row.type_modifier);
    let column = Column::new(row.name, default_value, metadata, !row.not_null)
        .with_default_function(default_function)
        .with_collation(row.collation)
        .with_comment(row.comment.filter(|c| !c.trim().is_empty()))
        .with_serial(serial)
        .with_generated(row.generated);

    tracing::debug!(
        table = %table,
        column = column.name(),
        sql_type = column.sql_type(),
        serial = column.is_serial(),
        virtual_column = column.is_virtual(),
        "Built column from catalog"
    );
    column
}

/// Runs catalog queries through a [`CatalogSource`] and builds
/// [`TableDefinition`]s.
pub struct Introspector<S> {
    source: S,
    params: IntrospectParams,
}

impl<S: CatalogSource> Introspector<S> {
    /// Create an introspector over a catalog source.
    pub fn new(source: S, params: IntrospectParams) -> Self {
        Self { source, params }
    }

    pub fn params(&self) -> &IntrospectParams {
        &self.params
    }

    /// Give back the catalog source.
    pub fn into_inner(self) -> S {
        self.source
    }

    /// Introspect one table.
    ///
    /// `table` may be schema-qualified; otherwise the configured schema is
    /// used.
    pub async fn columns(&mut self, table: &str) -> Result<TableDefinition> {
        let name = QualifiedName::parse(table)?.with_default_schema(&self.params.schema);
        let timeout = self.params.query_timeout;

        tracing::debug!(table = %name, ?timeout, "Introspecting table");

        let rows = tokio::time::timeout(timeout, self.source.column_rows(&name))
            .await
            .map_err(|_| Error::IntrospectionTimeout {
                table: table.to_string(),
                timeout,
            })??;

        if rows.is_empty() {
            return Err(Error::TableNotFound {
                table: table.to_string(),
            });
        }

        let columns: Vec<Column> = rows
            .into_iter()
            .map(|row| column_from_catalog(&name, row, &self.params))
            .collect();

        tracing::debug!(table = %name, columns = columns.len(), "Introspected table");
        Ok(TableDefinition::new(table, columns))
    }

    /// Introspect several tables in order, stopping at the first error.
    pub async fn columns_for<I, T>(&mut self, tables: I) -> Result<Vec<TableDefinition>>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let mut definitions = Vec::new();
        for table in tables {
            definitions.push(self.columns(table.as_ref()).await?);
        }
        Ok(definitions)
    }

    /// Convert into a stream yielding one `Result<TableDefinition>` per
    /// table. Errors do not end the stream.
    pub fn into_stream(self, tables: Vec<String>) -> impl Stream<Item = Result<TableDefinition>> {
        use futures::stream;

        stream::unfold(
            (self, tables.into_iter()),
            |(mut introspector, mut tables)| async move {
                let table = tables.next()?;
                let result = introspector.columns(&table).await;
                Some((result, (introspector, tables)))
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::constants::*;

    fn users() -> QualifiedName {
        QualifiedName::new(Some("public".to_string()), "users")
    }

    #[test]
    fn test_serial_column() {
        let row = CatalogRow::new("id", "bigint", PG_TYPE_INT8)
            .with_default("nextval('users_id_seq'::regclass)")
            .with_not_null(true);
        let col = column_from_catalog(&users(), row, &IntrospectParams::default());

        assert!(col.is_serial());
        assert!(!col.null());
        assert_eq!(col.default(), None);
        assert_eq!(
            col.default_function(),
            Some("nextval('users_id_seq'::regclass)")
        );
        assert!(col.has_default());
    }

    #[test]
    fn test_foreign_sequence_is_not_serial() {
        let row = CatalogRow::new("id", "integer", PG_TYPE_INT4)
            .with_default("nextval('global_seq'::regclass)");
        let col = column_from_catalog(&users(), row, &IntrospectParams::default());
        assert!(!col.is_serial());
        assert!(col.has_default());
    }

    #[test]
    fn test_literal_default() {
        let row = CatalogRow::new("status", "character varying(20)", PG_TYPE_VARCHAR)
            .with_type_modifier(24)
            .with_default("'active'::character varying");
        let col = column_from_catalog(&users(), row, &IntrospectParams::default());
        assert_eq!(col.default(), Some("active"));
        assert_eq!(col.default_function(), None);
        assert_eq!(col.limit(), Some(20));
        assert!(col.has_default());
    }

    #[test]
    fn test_generated_column() {
        let row = CatalogRow::new("total", "numeric(10,2)", PG_TYPE_NUMERIC)
            .with_type_modifier(655366)
            .with_default("(price * (quantity)::numeric)")
            .with_generated("s");
        let col = column_from_catalog(&users(), row, &IntrospectParams::default());
        assert!(col.is_virtual());
        assert!(!col.has_default());
        assert_eq!(col.default_function(), Some("(price * (quantity)::numeric)"));
    }

    #[test]
    fn test_empty_generated_marker() {
        let row = CatalogRow::new("tags", "text[]", PG_TYPE_TEXT_ARRAY)
            .with_default("'{}'::text[]")
            .with_generated("");
        let col = column_from_catalog(&users(), row, &IntrospectParams::default());
        assert!(!col.is_virtual());
        assert!(col.is_array());
        assert_eq!(col.sql_type(), "text");
        assert_eq!(col.default(), Some("{}"));
    }

    #[test]
    fn test_collation_and_comment() {
        let row = CatalogRow::new("title", "text", PG_TYPE_TEXT)
            .with_collation("C")
            .with_comment("Display title");
        let col = column_from_catalog(&users(), row, &IntrospectParams::default());
        assert_eq!(col.collation(), Some("C"));
        assert_eq!(col.comment(), Some("Display title"));
        assert!(!col.has_default());
    }

    #[test]
    fn test_blank_comment_is_absent() {
        for blank in ["", "  "] {
            let row = CatalogRow::new("title", "text", PG_TYPE_TEXT).with_comment(blank);
            let col = column_from_catalog(&users(), row, &IntrospectParams::default());
            assert_eq!(col.comment(), None);
        }
    }

    #[test]
    fn test_params_builder() {
        let params = IntrospectParams::default()
            .with_schema("app")
            .with_max_identifier_length(31)
            .with_query_timeout(Duration::from_secs(3));
        assert_eq!(params.schema, "app");
        assert_eq!(params.max_identifier_length, 31);
        assert_eq!(params.query_timeout, Duration::from_secs(3));
        assert_eq!(IntrospectParams::default().query_timeout, Duration::from_secs(20));
    }
}
