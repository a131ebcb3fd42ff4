//! Type metadata for one column.
//!
//! Keeps the raw declared type string exactly as the catalog reported it,
//! alongside the oid and type modifier. Array-suffix normalization happens
//! on `Column`, never here.

use super::pg_type::{PgType, TypeModifier};
use crate::protocol::constants::TYPMOD_NONE;

/// SQL type metadata: declared type plus PostgreSQL oid and modifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SqlTypeMetadata {
    sql_type: String,
    oid: u32,
    fmod: i32,
    kind: Option<PgType>,
    modifier: TypeModifier,
}

impl SqlTypeMetadata {
    /// Create metadata from a declared type string, oid and type modifier.
    ///
    /// The built-in kind is resolved from the oid first and the declared
    /// string second, so domain types over built-ins still carry a kind
    /// when the caller reports the base type's name.
    pub fn new(sql_type: impl Into<String>, oid: u32, fmod: i32) -> Self {
        let sql_type = sql_type.into();
        let kind = PgType::from_oid(oid)
            .ok()
            .or_else(|| PgType::from_sql_type(&sql_type));
        let modifier = kind
            .as_ref()
            .map(|k| k.decode_modifier(fmod))
            .unwrap_or_default();
        Self {
            sql_type,
            oid,
            fmod,
            kind,
            modifier,
        }
    }

    /// Create metadata for a built-in type, rendering the declared string.
    pub fn from_type(kind: PgType, fmod: i32) -> Self {
        Self::new(kind.format_type(fmod), kind.oid(), fmod)
    }

    /// Create metadata with no type modifier.
    pub fn unmodified(sql_type: impl Into<String>, oid: u32) -> Self {
        Self::new(sql_type, oid, TYPMOD_NONE)
    }

    /// Raw declared type, array marker included.
    pub fn sql_type(&self) -> &str {
        &self.sql_type
    }

    /// Type oid.
    pub fn oid(&self) -> u32 {
        self.oid
    }

    /// Type modifier, -1 if none.
    pub fn fmod(&self) -> i32 {
        self.fmod
    }

    /// Built-in type, if the type is one.
    pub fn kind(&self) -> Option<&PgType> {
        self.kind.as_ref()
    }

    pub fn limit(&self) -> Option<u32> {
        self.modifier.limit
    }

    pub fn precision(&self) -> Option<u32> {
        self.modifier.precision
    }

    pub fn scale(&self) -> Option<i32> {
        self.modifier.scale
    }
}
