//! Integration tests for building columns from RowDescription messages.

use bytes::{BufMut, BytesMut};
use pg_column_rs::protocol::constants::*;
use pg_column_rs::{parse_row_description, Column, Error, PgType};

struct Field<'a> {
    name: &'a str,
    type_oid: u32,
    type_len: i16,
    type_modifier: i32,
    format: i16,
}

fn row_description(fields: &[Field<'_>]) -> BytesMut {
    let mut body = BytesMut::new();
    body.put_i16(fields.len() as i16);
    for (attnum, f) in fields.iter().enumerate() {
        body.put_slice(f.name.as_bytes());
        body.put_u8(0);
        body.put_u32(16384);
        body.put_i16(attnum as i16 + 1);
        body.put_u32(f.type_oid);
        body.put_i16(f.type_len);
        body.put_i32(f.type_modifier);
        body.put_i16(f.format);
    }

    let mut msg = BytesMut::new();
    msg.put_u8(MSG_ROW_DESCRIPTION);
    msg.put_i32(body.len() as i32 + 4);
    msg.put_slice(&body);
    msg
}

#[test]
fn test_columns_from_row_description() {
    let msg = row_description(&[
        Field { name: "id", type_oid: PG_TYPE_INT4, type_len: 4, type_modifier: -1, format: 1 },
        Field { name: "email", type_oid: PG_TYPE_VARCHAR, type_len: -1, type_modifier: 259, format: 0 },
        Field { name: "scores", type_oid: PG_TYPE_NUMERIC_ARRAY, type_len: -1, type_modifier: 524292, format: 0 },
        Field { name: "seen_at", type_oid: PG_TYPE_TIMESTAMPTZ, type_len: 8, type_modifier: 3, format: 0 },
    ]);

    let fields = parse_row_description(msg.freeze()).unwrap();
    assert!(fields[0].is_binary());
    let columns: Vec<Column> = fields.iter().map(Column::from_field).collect();

    assert_eq!(columns[0].sql_type(), "integer");
    assert_eq!(columns[0].kind(), Some(&PgType::Integer));
    assert!(!columns[0].is_array());

    assert_eq!(columns[1].sql_type(), "character varying(255)");
    assert_eq!(columns[1].limit(), Some(255));

    // numeric(8,0)[]
    assert!(columns[2].is_array());
    assert_eq!(columns[2].sql_type(), "numeric(8,0)");
    assert_eq!(columns[2].precision(), Some(8));
    assert_eq!(columns[2].scale(), Some(0));
    assert_eq!(columns[2].oid(), PG_TYPE_NUMERIC_ARRAY);

    assert_eq!(columns[3].sql_type(), "timestamp(3) with time zone");
    assert_eq!(columns[3].fmod(), 3);

    for col in &columns {
        assert!(col.null());
        assert!(!col.has_default());
        assert!(!col.is_serial());
        assert!(!col.is_virtual());
    }
}

#[test]
fn test_trailing_bytes_rejected() {
    let mut msg = row_description(&[Field {
        name: "id",
        type_oid: PG_TYPE_INT4,
        type_len: 4,
        type_modifier: -1,
        format: 0,
    }]);
    msg.put_u8(0);
    assert!(matches!(
        parse_row_description(msg.freeze()),
        Err(Error::Protocol { .. })
    ));
}

#[test]
fn test_short_length_rejected() {
    let mut msg = BytesMut::new();
    msg.put_u8(MSG_ROW_DESCRIPTION);
    msg.put_i32(3);
    assert!(matches!(
        parse_row_description(msg.freeze()),
        Err(Error::Protocol { .. })
    ));
}
