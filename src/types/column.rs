//! Column and TableDefinition types.
//!
//! `Column` is an immutable view of one PostgreSQL column as seen by a single
//! introspection pass. It hides driver quirks from callers: array markers are
//! stripped from the reported type, and generated columns never report a
//! default.

use crate::error::{Error, Result};
use crate::protocol::constants::ARRAY_MARKER;
use crate::protocol::row_description::FieldDescription;

use super::metadata::SqlTypeMetadata;
use super::pg_type::PgType;

/// A PostgreSQL column.
///
/// `serial` and `generated` are decided by whoever builds the column (see
/// [`crate::introspect`]); the column only reports them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Column {
    name: String,
    default: Option<String>,
    default_function: Option<String>,
    sql_type_metadata: SqlTypeMetadata,
    null: bool,
    collation: Option<String>,
    comment: Option<String>,
    serial: bool,
    generated: Option<String>,
}

impl Column {
    /// Create a column with the base facts. Not serial, not generated.
    pub fn new(
        name: impl Into<String>,
        default: Option<String>,
        sql_type_metadata: SqlTypeMetadata,
        null: bool,
    ) -> Self {
        Self {
            name: name.into(),
            default,
            default_function: None,
            sql_type_metadata,
            null,
            collation: None,
            comment: None,
            serial: false,
            generated: None,
        }
    }

    /// Create a column from a RowDescription field.
    ///
    /// The wire carries no default or nullability, so the column is nullable
    /// with no default. Types without a built-in mapping are rendered by oid.
    pub fn from_field(field: &FieldDescription) -> Self {
        let sql_type_metadata = match PgType::from_oid(field.type_oid) {
            Ok(kind) => SqlTypeMetadata::from_type(kind, field.type_modifier),
            Err(_) => {
                tracing::warn!(
                    column = %field.name,
                    oid = field.type_oid,
                    "No built-in type for oid"
                );
                SqlTypeMetadata::new(
                    format!("oid:{}", field.type_oid),
                    field.type_oid,
                    field.type_modifier,
                )
            }
        };
        Self::new(field.name.clone(), None, sql_type_metadata, true)
    }

    pub fn with_default_function(mut self, default_function: Option<String>) -> Self {
        self.default_function = default_function;
        self
    }

    pub fn with_collation(mut self, collation: Option<String>) -> Self {
        self.collation = collation;
        self
    }

    pub fn with_comment(mut self, comment: Option<String>) -> Self {
        self.comment = comment;
        self
    }

    pub fn with_serial(mut self, serial: bool) -> Self {
        self.serial = serial;
        self
    }

    pub fn with_generated(mut self, generated: Option<String>) -> Self {
        self.generated = generated;
        self
    }

    /// Column name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Literal default value, as text.
    pub fn default(&self) -> Option<&str> {
        self.default.as_deref()
    }

    /// Non-literal default expression, e.g. `now()`.
    pub fn default_function(&self) -> Option<&str> {
        self.default_function.as_deref()
    }

    /// Whether NULL values are allowed.
    pub fn null(&self) -> bool {
        self.null
    }

    pub fn collation(&self) -> Option<&str> {
        self.collation.as_deref()
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// Raw generation marker as reported by the catalog.
    pub fn generated(&self) -> Option<&str> {
        self.generated.as_deref()
    }

    pub fn sql_type_metadata(&self) -> &SqlTypeMetadata {
        &self.sql_type_metadata
    }

    /// Type oid.
    pub fn oid(&self) -> u32 {
        self.sql_type_metadata.oid()
    }

    /// Type modifier.
    pub fn fmod(&self) -> i32 {
        self.sql_type_metadata.fmod()
    }

    pub fn kind(&self) -> Option<&PgType> {
        self.sql_type_metadata.kind()
    }

    pub fn limit(&self) -> Option<u32> {
        self.sql_type_metadata.limit()
    }

    pub fn precision(&self) -> Option<u32> {
        self.sql_type_metadata.precision()
    }

    pub fn scale(&self) -> Option<i32> {
        self.sql_type_metadata.scale()
    }

    /// Whether the default comes from the column's own sequence.
    pub fn is_serial(&self) -> bool {
        self.serial
    }

    /// Whether the column is generated.
    ///
    /// Stored generated columns count as virtual too: the catalog marker is
    /// not inspected beyond being present and non-blank.
    pub fn is_virtual(&self) -> bool {
        self.generated
            .as_deref()
            .is_some_and(|g| !g.trim().is_empty())
    }

    /// Whether the column has a usable default. Always false for generated
    /// columns.
    pub fn has_default(&self) -> bool {
        let base = self.default.is_some() || self.default_function.is_some();
        base && !self.is_virtual()
    }

    /// Whether the declared type is an array type.
    pub fn is_array(&self) -> bool {
        self.sql_type_metadata.sql_type().ends_with(ARRAY_MARKER)
    }

    /// Alias of [`Column::is_array`].
    pub fn array(&self) -> bool {
        self.is_array()
    }

    /// Declared type with one trailing array marker removed.
    pub fn sql_type(&self) -> &str {
        let raw = self.sql_type_metadata.sql_type();
        raw.strip_suffix(ARRAY_MARKER).unwrap_or(raw)
    }
}

/// Columns of one table, in attribute order.
#[derive(Debug, Clone)]
pub struct TableDefinition {
    table: String,
    columns: Vec<Column>,
}

impl TableDefinition {
    /// Create a table definition from its columns.
    pub fn new(table: impl Into<String>, columns: Vec<Column>) -> Self {
        Self {
            table: table.into(),
            columns,
        }
    }

    /// Table name as it was requested.
    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Get column names.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name()).collect()
    }

    /// Get the number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Check if there are no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Get column by index.
    pub fn get(&self, index: usize) -> Option<&Column> {
        self.columns.get(index)
    }

    /// Find column index by name. Case-sensitive, like quoted identifiers.
    pub fn find_by_name(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name() == name)
    }

    /// Get column by name.
    pub fn column(&self, name: &str) -> Result<&Column> {
        self.find_by_name(name)
            .map(|idx| &self.columns[idx])
            .ok_or_else(|| Error::ColumnNotFound {
                name: name.to_string(),
            })
    }

    /// First serial column, typically the primary key.
    pub fn primary_serial(&self) -> Option<&Column> {
        self.columns.iter().find(|c| c.is_serial())
    }
}

impl<'a> IntoIterator for &'a TableDefinition {
    type Item = &'a Column;
    type IntoIter = std::slice::Iter<'a, Column>;

    fn into_iter(self) -> Self::IntoIter {
        self.columns.iter()
    }
}
