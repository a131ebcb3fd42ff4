//! PostgreSQL column metadata for Rust
//!
//! A normalized, read-only view of PostgreSQL columns: type oid and modifier,
//! serial and generated detection, array handling, and default-value
//! semantics. Columns come either from catalog introspection
//! ([`introspect`]) or from a query's RowDescription message ([`protocol`]).
//!
//! # Example
//!
//! ```
//! use pg_column_rs::{Column, SqlTypeMetadata};
//!
//! let tags = Column::new(
//!     "tags",
//!     Some("{}".to_string()),
//!     SqlTypeMetadata::unmodified("integer[]", 1007),
//!     true,
//! );
//!
//! assert!(tags.is_array());
//! assert_eq!(tags.sql_type(), "integer");
//! assert!(tags.has_default());
//!
//! let total = tags.clone().with_generated(Some("s".to_string()));
//! assert!(total.is_virtual());
//! assert!(!total.has_default());
//! ```

pub mod error;
pub mod introspect;
pub mod protocol;
pub mod types;

// Re-export main types
pub use error::{Error, Result};
pub use introspect::{CatalogRow, CatalogSource, IntrospectParams, Introspector, QualifiedName};
pub use protocol::{parse_row_description, FieldDescription};
pub use types::{Column, PgType, SqlTypeMetadata, TableDefinition, TypeModifier};
