//! PostgreSQL built-in type enum.
//!
//! Maps type oids and declared type names to the built-in types this crate
//! knows about, decodes type modifiers, and renders types the way the
//! server's `format_type()` does.
//!
//! User-defined types (enums, domains, composites) have no variant; callers
//! see them as `None` from [`PgType::from_sql_type`] or
//! `Err(Error::UnsupportedType)` from [`PgType::from_oid`].

use crate::error::{Error, Result};
use crate::protocol::constants::*;

/// PostgreSQL built-in data type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PgType {
    Boolean,
    SmallInt,
    Integer,
    BigInt,
    Real,
    DoublePrecision,
    /// NUMERIC(precision, scale).
    Numeric,
    Text,
    /// CHARACTER VARYING(limit).
    Varchar,
    /// CHARACTER(limit), blank-padded.
    Char,
    Bytea,
    Date,
    Time,
    Timestamp,
    TimestampTz,
    Interval,
    Uuid,
    Json,
    Jsonb,
    Oid,
    Inet,
    /// One-dimensional view of an array type; PostgreSQL does not track
    /// dimensions in the type.
    Array(Box<PgType>),
}

/// Decoded form of a type modifier (`atttypmod`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct TypeModifier {
    /// Maximum length for character types.
    pub limit: Option<u32>,
    /// Precision for numeric and temporal types.
    pub precision: Option<u32>,
    /// Scale for numeric. May be negative since PostgreSQL 15.
    pub scale: Option<i32>,
}

const INTERVAL_FULL_PRECISION: i32 = 0xFFFF;

impl PgType {
    /// Look up a built-in type by oid.
    ///
    /// Returns `Err(Error::UnsupportedType)` for oids with no mapping.
    pub fn from_oid(oid: u32) -> Result<Self> {
        let ty = match oid {
            PG_TYPE_BOOL => PgType::Boolean,
            PG_TYPE_BYTEA => PgType::Bytea,
            PG_TYPE_INT8 => PgType::BigInt,
            PG_TYPE_INT2 => PgType::SmallInt,
            PG_TYPE_INT4 => PgType::Integer,
            PG_TYPE_TEXT => PgType::Text,
            PG_TYPE_OID => PgType::Oid,
            PG_TYPE_JSON => PgType::Json,
            PG_TYPE_INET => PgType::Inet,
            PG_TYPE_FLOAT4 => PgType::Real,
            PG_TYPE_FLOAT8 => PgType::DoublePrecision,
            PG_TYPE_BPCHAR => PgType::Char,
            PG_TYPE_VARCHAR => PgType::Varchar,
            PG_TYPE_DATE => PgType::Date,
            PG_TYPE_TIME => PgType::Time,
            PG_TYPE_TIMESTAMP => PgType::Timestamp,
            PG_TYPE_TIMESTAMPTZ => PgType::TimestampTz,
            PG_TYPE_INTERVAL => PgType::Interval,
            PG_TYPE_NUMERIC => PgType::Numeric,
            PG_TYPE_UUID => PgType::Uuid,
            PG_TYPE_JSONB => PgType::Jsonb,
            _ => {
                let element = match oid {
                    PG_TYPE_JSON_ARRAY => PgType::Json,
                    PG_TYPE_BOOL_ARRAY => PgType::Boolean,
                    PG_TYPE_BYTEA_ARRAY => PgType::Bytea,
                    PG_TYPE_INT2_ARRAY => PgType::SmallInt,
                    PG_TYPE_INT4_ARRAY => PgType::Integer,
                    PG_TYPE_TEXT_ARRAY => PgType::Text,
                    PG_TYPE_BPCHAR_ARRAY => PgType::Char,
                    PG_TYPE_VARCHAR_ARRAY => PgType::Varchar,
                    PG_TYPE_INT8_ARRAY => PgType::BigInt,
                    PG_TYPE_FLOAT4_ARRAY => PgType::Real,
                    PG_TYPE_FLOAT8_ARRAY => PgType::DoublePrecision,
                    PG_TYPE_OID_ARRAY => PgType::Oid,
                    PG_TYPE_INET_ARRAY => PgType::Inet,
                    PG_TYPE_TIMESTAMP_ARRAY => PgType::Timestamp,
                    PG_TYPE_DATE_ARRAY => PgType::Date,
                    PG_TYPE_TIME_ARRAY => PgType::Time,
                    PG_TYPE_TIMESTAMPTZ_ARRAY => PgType::TimestampTz,
                    PG_TYPE_INTERVAL_ARRAY => PgType::Interval,
                    PG_TYPE_NUMERIC_ARRAY => PgType::Numeric,
                    PG_TYPE_UUID_ARRAY => PgType::Uuid,
                    PG_TYPE_JSONB_ARRAY => PgType::Jsonb,
                    _ => return Err(Error::UnsupportedType { oid }),
                };
                PgType::Array(Box::new(element))
            }
        };
        Ok(ty)
    }

    /// Get the type oid.
    pub fn oid(&self) -> u32 {
        match self {
            PgType::Boolean => PG_TYPE_BOOL,
            PgType::SmallInt => PG_TYPE_INT2,
            PgType::Integer => PG_TYPE_INT4,
            PgType::BigInt => PG_TYPE_INT8,
            PgType::Real => PG_TYPE_FLOAT4,
            PgType::DoublePrecision => PG_TYPE_FLOAT8,
            PgType::Numeric => PG_TYPE_NUMERIC,
            PgType::Text => PG_TYPE_TEXT,
            PgType::Varchar => PG_TYPE_VARCHAR,
            PgType::Char => PG_TYPE_BPCHAR,
            PgType::Bytea => PG_TYPE_BYTEA,
            PgType::Date => PG_TYPE_DATE,
            PgType::Time => PG_TYPE_TIME,
            PgType::Timestamp => PG_TYPE_TIMESTAMP,
            PgType::TimestampTz => PG_TYPE_TIMESTAMPTZ,
            PgType::Interval => PG_TYPE_INTERVAL,
            PgType::Uuid => PG_TYPE_UUID,
            PgType::Json => PG_TYPE_JSON,
            PgType::Jsonb => PG_TYPE_JSONB,
            PgType::Oid => PG_TYPE_OID,
            PgType::Inet => PG_TYPE_INET,
            PgType::Array(element) => match element.as_ref() {
                PgType::Boolean => PG_TYPE_BOOL_ARRAY,
                PgType::SmallInt => PG_TYPE_INT2_ARRAY,
                PgType::Integer => PG_TYPE_INT4_ARRAY,
                PgType::BigInt => PG_TYPE_INT8_ARRAY,
                PgType::Real => PG_TYPE_FLOAT4_ARRAY,
                PgType::DoublePrecision => PG_TYPE_FLOAT8_ARRAY,
                PgType::Numeric => PG_TYPE_NUMERIC_ARRAY,
                PgType::Text => PG_TYPE_TEXT_ARRAY,
                PgType::Varchar => PG_TYPE_VARCHAR_ARRAY,
                PgType::Char => PG_TYPE_BPCHAR_ARRAY,
                PgType::Bytea => PG_TYPE_BYTEA_ARRAY,
                PgType::Date => PG_TYPE_DATE_ARRAY,
                PgType::Time => PG_TYPE_TIME_ARRAY,
                PgType::Timestamp => PG_TYPE_TIMESTAMP_ARRAY,
                PgType::TimestampTz => PG_TYPE_TIMESTAMPTZ_ARRAY,
                PgType::Interval => PG_TYPE_INTERVAL_ARRAY,
                PgType::Uuid => PG_TYPE_UUID_ARRAY,
                PgType::Json => PG_TYPE_JSON_ARRAY,
                PgType::Jsonb => PG_TYPE_JSONB_ARRAY,
                PgType::Oid => PG_TYPE_OID_ARRAY,
                PgType::Inet => PG_TYPE_INET_ARRAY,
                // Nested arrays share the element array type.
                PgType::Array(_) => element.oid(),
            },
        }
    }

    /// Resolve a declared type string such as `character varying(255)` or
    /// `int4[]`.
    ///
    /// Returns `None` for types without a built-in variant.
    pub fn from_sql_type(sql_type: &str) -> Option<Self> {
        let trimmed = sql_type.trim();
        if let Some(element) = trimmed.strip_suffix(ARRAY_MARKER) {
            return Self::from_sql_type(element).map(|t| PgType::Array(Box::new(t)));
        }

        let name = strip_modifiers(trimmed).to_ascii_lowercase();
        let ty = match name.as_str() {
            "boolean" | "bool" => PgType::Boolean,
            "smallint" | "int2" => PgType::SmallInt,
            "integer" | "int" | "int4" => PgType::Integer,
            "bigint" | "int8" => PgType::BigInt,
            "real" | "float4" => PgType::Real,
            "double precision" | "float8" => PgType::DoublePrecision,
            "numeric" | "decimal" => PgType::Numeric,
            "text" => PgType::Text,
            "character varying" | "varchar" => PgType::Varchar,
            "character" | "char" | "bpchar" => PgType::Char,
            "bytea" => PgType::Bytea,
            "date" => PgType::Date,
            "time" | "time without time zone" => PgType::Time,
            "timestamp" | "timestamp without time zone" => PgType::Timestamp,
            "timestamptz" | "timestamp with time zone" => PgType::TimestampTz,
            "interval" => PgType::Interval,
            "uuid" => PgType::Uuid,
            "json" => PgType::Json,
            "jsonb" => PgType::Jsonb,
            "oid" => PgType::Oid,
            "inet" => PgType::Inet,
            _ => return None,
        };
        Some(ty)
    }

    /// Whether this is an array type.
    pub fn is_array(&self) -> bool {
        matches!(self, PgType::Array(_))
    }

    /// Element type for arrays, `self` otherwise.
    pub fn element(&self) -> &PgType {
        match self {
            PgType::Array(element) => element.element(),
            other => other,
        }
    }

    /// Decode a type modifier for this type.
    ///
    /// Array types use the modifier of their element type.
    pub fn decode_modifier(&self, fmod: i32) -> TypeModifier {
        let mut decoded = TypeModifier::default();
        if fmod == TYPMOD_NONE {
            return decoded;
        }
        match self.element() {
            PgType::Varchar | PgType::Char if fmod >= VARHDRSZ => {
                decoded.limit = Some((fmod - VARHDRSZ) as u32);
            }
            PgType::Numeric if fmod >= VARHDRSZ => {
                let packed = fmod - VARHDRSZ;
                decoded.precision = Some(((packed >> 16) & 0xFFFF) as u32);
                // 11-bit two's complement scale
                decoded.scale = Some(((packed & 0x7FF) ^ 1024) - 1024);
            }
            PgType::Time | PgType::Timestamp | PgType::TimestampTz if fmod >= 0 => {
                decoded.precision = Some(fmod as u32);
            }
            PgType::Interval if fmod >= 0 => {
                let precision = fmod & 0xFFFF;
                if precision != INTERVAL_FULL_PRECISION {
                    decoded.precision = Some(precision as u32);
                }
            }
            _ => {}
        }
        decoded
    }

    /// Render the type with its modifier, matching `format_type(oid, typmod)`.
    ///
    /// Interval field restrictions (`YEAR TO MONTH` and friends) are not
    /// rendered; only the seconds precision is.
    pub fn format_type(&self, fmod: i32) -> String {
        if let PgType::Array(element) = self {
            return format!("{}{}", element.format_type(fmod), ARRAY_MARKER);
        }

        let m = self.decode_modifier(fmod);
        match self {
            PgType::Varchar | PgType::Char => match m.limit {
                Some(limit) => format!("{}({})", self.base_name(), limit),
                // Bare `character` would read as character(1).
                None if *self == PgType::Char => "bpchar".to_string(),
                None => self.base_name().to_string(),
            },
            PgType::Numeric => match (m.precision, m.scale) {
                (Some(p), Some(s)) => format!("numeric({},{})", p, s),
                _ => "numeric".to_string(),
            },
            PgType::Time | PgType::Timestamp | PgType::TimestampTz => {
                let (head, zone) = match self {
                    PgType::Time => ("time", "without time zone"),
                    PgType::Timestamp => ("timestamp", "without time zone"),
                    _ => ("timestamp", "with time zone"),
                };
                match m.precision {
                    Some(p) => format!("{}({}) {}", head, p, zone),
                    None => format!("{} {}", head, zone),
                }
            }
            PgType::Interval => match m.precision {
                Some(p) => format!("interval({})", p),
                None => "interval".to_string(),
            },
            _ => self.base_name().to_string(),
        }
    }

    fn base_name(&self) -> &'static str {
        match self {
            PgType::Boolean => "boolean",
            PgType::SmallInt => "smallint",
            PgType::Integer => "integer",
            PgType::BigInt => "bigint",
            PgType::Real => "real",
            PgType::DoublePrecision => "double precision",
            PgType::Numeric => "numeric",
            PgType::Text => "text",
            PgType::Varchar => "character varying",
            PgType::Char => "character",
            PgType::Bytea => "bytea",
            PgType::Date => "date",
            PgType::Time => "time without time zone",
            PgType::Timestamp => "timestamp without time zone",
            PgType::TimestampTz => "timestamp with time zone",
            PgType::Interval => "interval",
            PgType::Uuid => "uuid",
            PgType::Json => "json",
            PgType::Jsonb => "jsonb",
            PgType::Oid => "oid",
            PgType::Inet => "inet",
            PgType::Array(_) => "array",
        }
    }
}

/// Remove parenthesized modifiers: `timestamp(6) with time zone` becomes
/// `timestamp with time zone`.
fn strip_modifiers(sql_type: &str) -> String {
    let mut out = String::with_capacity(sql_type.len());
    let mut depth = 0usize;
    for c in sql_type.chars() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            _ if depth == 0 => out.push(c),
            _ => {}
        }
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

impl std::fmt::Display for PgType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.format_type(TYPMOD_NONE))
    }
}
