//! RowDescription ('T') message parsing.
//!
//! The backend sends a RowDescription ahead of the data rows of every query,
//! and in reply to Describe. It is the cheapest source of per-column type
//! metadata: the type oid and type modifier of each result column.
//!
//! Wire format:
//! ```text
//! tag: 'T'
//! length: Int32          (includes itself, excludes the tag)
//! field_count: Int16
//! field_count x {
//!     name: String       (NUL-terminated)
//!     table_oid: Int32   (0 if not a table column)
//!     column_attr: Int16 (0 if not a table column)
//!     type_oid: Int32
//!     type_len: Int16    (negative for variable width)
//!     type_modifier: Int32
//!     format: Int16      (0 text, 1 binary)
//! }
//! ```

use bytes::Bytes;

use crate::error::{Error, Result};
use crate::protocol::buffer::ReadBuffer;
use crate::protocol::constants::{FORMAT_BINARY, MSG_ROW_DESCRIPTION};

/// Metadata for one result column, as reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescription {
    /// Column name (or alias).
    pub name: String,
    /// Oid of the source table, 0 for computed columns.
    pub table_oid: u32,
    /// Attribute number within the source table, 0 for computed columns.
    pub column_attr: i16,
    /// Type oid.
    pub type_oid: u32,
    /// Type length (pg_type.typlen).
    pub type_len: i16,
    /// Type modifier (pg_attribute.atttypmod), -1 if none.
    pub type_modifier: i32,
    /// Format code.
    pub format: i16,
}

impl FieldDescription {
    /// Whether values for this field arrive in binary format.
    pub fn is_binary(&self) -> bool {
        self.format == FORMAT_BINARY
    }

    /// Whether this field maps back to a table column.
    pub fn is_table_column(&self) -> bool {
        self.table_oid != 0 && self.column_attr > 0
    }
}

/// Parse a complete RowDescription message, tag included.
pub fn parse_row_description(data: Bytes) -> Result<Vec<FieldDescription>> {
    let mut buf = ReadBuffer::new(data);

    let tag = buf.read_u8()?;
    if tag != MSG_ROW_DESCRIPTION {
        return Err(Error::UnexpectedMessage {
            expected: MSG_ROW_DESCRIPTION as char,
            actual: tag as char,
        });
    }

    let length = buf.read_i32_be()?;
    if length < 6 {
        return Err(Error::protocol(format!(
            "Invalid RowDescription length: {}",
            length
        )));
    }
    let body = buf.read_bytes(length as usize - 4)?;
    if buf.remaining() > 0 {
        return Err(Error::protocol(format!(
            "{} trailing bytes after RowDescription",
            buf.remaining()
        )));
    }

    let mut body = ReadBuffer::new(body);
    let field_count = body.read_i16_be()?;
    if field_count < 0 {
        return Err(Error::protocol(format!(
            "Negative field count: {}",
            field_count
        )));
    }

    let mut fields = Vec::with_capacity(field_count as usize);
    for _ in 0..field_count {
        fields.push(parse_field(&mut body)?);
    }

    if body.remaining() > 0 {
        return Err(Error::protocol(format!(
            "RowDescription length mismatch: {} unread bytes",
            body.remaining()
        )));
    }

    Ok(fields)
}

fn parse_field(buf: &mut ReadBuffer) -> Result<FieldDescription> {
    Ok(FieldDescription {
        name: buf.read_cstr()?,
        table_oid: buf.read_u32_be()?,
        column_attr: buf.read_i16_be()?,
        type_oid: buf.read_u32_be()?,
        type_len: buf.read_i16_be()?,
        type_modifier: buf.read_i32_be()?,
        format: buf.read_i16_be()?,
    })
}
