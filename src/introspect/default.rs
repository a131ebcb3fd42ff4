//! Default expression analysis.
//!
//! `pg_get_expr(adbin, adrelid)` returns the default as SQL text. Literal
//! defaults come back as casts (`'foo'::character varying`), numbers, or
//! booleans; everything else is an expression the client cannot evaluate
//! and is reported as a default function instead.

use std::sync::LazyLock;

use regex::Regex;

use super::QualifiedName;

static QUOTED_DEFAULT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)\A[(B]?'(.*)'.*::"?([\w. ]+)"?(?:\[\])?\z"#).expect("valid regex")
});

static NUMERIC_DEFAULT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\A\(?(-?\d+(\.\d*)?)\)?(::bigint)?\z").expect("valid regex"));

static DEFAULT_FUNCTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\w+\(.*\)|\(.*\)::\w+|CURRENT_DATE|CURRENT_TIMESTAMP").expect("valid regex")
});

static NEXTVAL_DEFAULT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\Anextval\('(?P<argument>.+)'::regclass\)\z").expect("valid regex")
});

static SEQUENCE_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\A.+_(?P<suffix>seq\d*)\z").expect("valid regex"));

/// Extract a literal value from a default expression.
///
/// Returns `None` when there is no default or it is not a literal.
pub fn extract_value_from_default(default: Option<&str>) -> Option<String> {
    let default = default?;

    if let Some(caps) = QUOTED_DEFAULT.captures(default) {
        let value = caps.get(1).map_or("", |m| m.as_str());
        let cast = caps.get(2).map_or("", |m| m.as_str());
        // 'now'::date is CURRENT_DATE, not a literal
        if value == "now" && cast == "date" {
            return None;
        }
        return Some(value.replace("''", "'"));
    }

    if default == "true" || default == "false" {
        return Some(default.to_string());
    }

    NUMERIC_DEFAULT
        .captures(default)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Return the default expression when it is a function rather than a literal.
pub fn extract_default_function(
    default_value: Option<&str>,
    default: Option<&str>,
) -> Option<String> {
    match (default_value, default) {
        (None, Some(expr)) if DEFAULT_FUNCTION.is_match(expr) => Some(expr.to_string()),
        _ => None,
    }
}

/// Build the name PostgreSQL gives the sequence behind a `serial` column.
///
/// Mirrors the server's `ChooseRelationName`: when `table_column_suffix`
/// exceeds `max_identifier_length` bytes, the column part is cut first (down
/// to half the room), then the table part. Cuts land on character
/// boundaries, so the result may come out shorter than the limit.
pub fn sequence_name_from_parts(
    table: &str,
    column: &str,
    suffix: &str,
    max_identifier_length: usize,
) -> String {
    let suffix_len = suffix.len() as isize;
    let max_len = max_identifier_length as isize;
    let table_len = table.len() as isize;
    let column_len = column.len() as isize;

    let mut over_length = table_len + column_len + suffix_len + 2 - max_len;
    let mut column_keep = column_len;
    let mut table_keep = table_len;

    if over_length > 0 {
        let half = (max_len - suffix_len - 2) / 2;
        let column_name_length = half.min(column_len);
        over_length -= column_len - column_name_length;
        column_keep = (column_name_length - over_length.min(0)).clamp(0, column_len);
    }

    if over_length > 0 {
        table_keep = (table_len - over_length).clamp(0, table_len);
    }

    format!(
        "{}_{}_{}",
        clip_to_bytes(table, table_keep as usize),
        clip_to_bytes(column, column_keep as usize),
        suffix
    )
}

/// Longest prefix of `s` that fits in `max_bytes` without splitting a
/// character.
fn clip_to_bytes(s: &str, max_bytes: usize) -> &str {
    if max_bytes >= s.len() {
        return s;
    }
    let end = s
        .char_indices()
        .map(|(idx, _)| idx)
        .take_while(|&idx| idx <= max_bytes)
        .last()
        .unwrap_or(0);
    &s[..end]
}

/// Whether a default function draws from the column's own sequence.
///
/// The `nextval` argument is read with identifier quoting rules; a schema
/// prefix is ignored and only the sequence identifier is compared.
pub fn is_serial_default(
    table: &str,
    column: &str,
    default_function: Option<&str>,
    max_identifier_length: usize,
) -> bool {
    let Some(argument) = default_function
        .and_then(|f| NEXTVAL_DEFAULT.captures(f))
        .and_then(|caps| caps.name("argument"))
    else {
        return false;
    };

    // Quotes inside the string literal are doubled.
    let argument = argument.as_str().replace("''", "'");
    let Ok(sequence) = QualifiedName::parse(&argument) else {
        return false;
    };
    let Some(suffix) = SEQUENCE_SUFFIX
        .captures(&sequence.identifier)
        .and_then(|caps| caps.name("suffix"))
    else {
        return false;
    };

    let expected = sequence_name_from_parts(table, column, suffix.as_str(), max_identifier_length);
    let serial = expected == sequence.identifier;
    tracing::trace!(
        table,
        column,
        sequence = %sequence.identifier,
        expected = %expected,
        serial,
        "Checked sequence default"
    );
    serial
}
