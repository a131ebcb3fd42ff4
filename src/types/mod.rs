//! PostgreSQL column and type metadata.

mod column;
mod metadata;
mod pg_type;

pub use column::{Column, TableDefinition};
pub use metadata::SqlTypeMetadata;
pub use pg_type::{PgType, TypeModifier};
