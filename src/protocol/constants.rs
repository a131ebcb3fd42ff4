//! PostgreSQL protocol and catalog constants.

// Backend message tags
pub const MSG_ROW_DESCRIPTION: u8 = b'T';

// Field format codes
pub const FORMAT_TEXT: i16 = 0;
pub const FORMAT_BINARY: i16 = 1;

// Type modifier handling
pub const TYPMOD_NONE: i32 = -1;
pub const VARHDRSZ: i32 = 4;

// Identifier limits (NAMEDATALEN - 1)
pub const MAX_IDENTIFIER_LENGTH: usize = 63;

pub const ARRAY_MARKER: &str = "[]";

// Built-in type oids (pg_type.oid)
pub const PG_TYPE_BOOL: u32 = 16;
pub const PG_TYPE_BYTEA: u32 = 17;
pub const PG_TYPE_INT8: u32 = 20;
pub const PG_TYPE_INT2: u32 = 21;
pub const PG_TYPE_INT4: u32 = 23;
pub const PG_TYPE_TEXT: u32 = 25;
pub const PG_TYPE_OID: u32 = 26;
pub const PG_TYPE_JSON: u32 = 114;
pub const PG_TYPE_INET: u32 = 869;
pub const PG_TYPE_FLOAT4: u32 = 700;
pub const PG_TYPE_FLOAT8: u32 = 701;
pub const PG_TYPE_BPCHAR: u32 = 1042;
pub const PG_TYPE_VARCHAR: u32 = 1043;
pub const PG_TYPE_DATE: u32 = 1082;
pub const PG_TYPE_TIME: u32 = 1083;
pub const PG_TYPE_TIMESTAMP: u32 = 1114;
pub const PG_TYPE_TIMESTAMPTZ: u32 = 1184;
pub const PG_TYPE_INTERVAL: u32 = 1186;
pub const PG_TYPE_NUMERIC: u32 = 1700;
pub const PG_TYPE_UUID: u32 = 2950;
pub const PG_TYPE_JSONB: u32 = 3802;

// Array type oids (pg_type.typarray of the element type)
pub const PG_TYPE_JSON_ARRAY: u32 = 199;
pub const PG_TYPE_BOOL_ARRAY: u32 = 1000;
pub const PG_TYPE_BYTEA_ARRAY: u32 = 1001;
pub const PG_TYPE_INT2_ARRAY: u32 = 1005;
pub const PG_TYPE_INT4_ARRAY: u32 = 1007;
pub const PG_TYPE_TEXT_ARRAY: u32 = 1009;
pub const PG_TYPE_BPCHAR_ARRAY: u32 = 1014;
pub const PG_TYPE_VARCHAR_ARRAY: u32 = 1015;
pub const PG_TYPE_INT8_ARRAY: u32 = 1016;
pub const PG_TYPE_FLOAT4_ARRAY: u32 = 1021;
pub const PG_TYPE_FLOAT8_ARRAY: u32 = 1022;
pub const PG_TYPE_OID_ARRAY: u32 = 1028;
pub const PG_TYPE_INET_ARRAY: u32 = 1041;
pub const PG_TYPE_TIMESTAMP_ARRAY: u32 = 1115;
pub const PG_TYPE_DATE_ARRAY: u32 = 1182;
pub const PG_TYPE_TIME_ARRAY: u32 = 1183;
pub const PG_TYPE_TIMESTAMPTZ_ARRAY: u32 = 1185;
pub const PG_TYPE_INTERVAL_ARRAY: u32 = 1187;
pub const PG_TYPE_NUMERIC_ARRAY: u32 = 1231;
pub const PG_TYPE_UUID_ARRAY: u32 = 2951;
pub const PG_TYPE_JSONB_ARRAY: u32 = 3807;
