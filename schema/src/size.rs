//! Byte widths shared by the size computation of every generated message.
//!
//! A required field contributes `FIELD_HEADER_LEN` plus its fixed payload width
//! (or `ARRAY_HEADER_LEN` for strings and arrays) to the constant minimum size.
//! Optional fields contribute nothing until present, then `OPTIONAL_FIELD_LEN`
//! plus their payload.

pub const BYTE_LEN:   usize = 1;
pub const BOOL_LEN:   usize = 1;
pub const SHORT_LEN:  usize = 2;
pub const CHAR_LEN:   usize = 2;
pub const INT_LEN:    usize = 4;
pub const ENUM_LEN:   usize = 4;
pub const FLOAT_LEN:  usize = 4;
pub const LONG_LEN:   usize = 8;
pub const DOUBLE_LEN: usize = 8;

pub const FIELD_HEADER_LEN:    usize = SHORT_LEN;
pub const OPTIONAL_HEADER_LEN: usize = BOOL_LEN;
pub const OPTIONAL_FIELD_LEN:  usize = FIELD_HEADER_LEN + OPTIONAL_HEADER_LEN;
pub const ARRAY_HEADER_LEN:    usize = SHORT_LEN;

/// Field id that no schema may assign.
pub const RESERVED_FIELD_ID: u16 = u16::MAX;

/// Number of UTF-16 code units `value` occupies on the wire.
pub fn utf16_len(value: &str) -> usize {
    value.encode_utf16().count()
}

#[test]
fn optional_field_len_is_header_plus_presence() {
    assert_eq!(OPTIONAL_FIELD_LEN, 3);
}

#[test]
fn utf16_len_counts_code_units() {
    assert_eq!(utf16_len(""), 0);
    assert_eq!(utf16_len("abc"), 3);
    assert_eq!(utf16_len("é"), 1);
    assert_eq!(utf16_len("🍕"), 2);
}
