use thiserror::Error;

/// Failure while reading a message out of a byte range.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("Range {offset}..{offset}+{length} is outside of a {buffer_len} byte buffer")]
    OutOfBounds {
        offset:     usize,
        length:     usize,
        buffer_len: usize,
    },

    #[error("Unexpected end of data at byte {position}: needed {needed} more byte(s), {remaining} left")]
    UnexpectedEof {
        position:  usize,
        needed:    usize,
        remaining: usize,
    },

    #[error("Invalid UTF-16 string data at byte {position}")]
    InvalidUtf16 { position: usize },

    #[error("Value {value} is not a member of enum {type_name}")]
    UnknownEnumValue {
        type_name: &'static str,
        value:     i32,
    },

    #[error("Unknown field id {id} at byte {position}")]
    UnknownField { id: u16, position: usize },
}

/// Failure while writing a message into a byte range.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error("Buffer too small: {needed} byte(s) needed at offset {offset}, buffer holds {available}")]
    BufferTooSmall {
        offset:    usize,
        needed:    usize,
        available: usize,
    },

    #[error("Length {length} does not fit in a 16-bit length header")]
    LengthOverflow { length: usize },

    #[error("Computed size {expected} does not match the {written} byte(s) written")]
    SizeMismatch { expected: usize, written: usize },
}
