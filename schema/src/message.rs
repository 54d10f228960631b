use crate::{ByteBuffer, ByteBufferMut, DecodeError, EncodeError};

/// Glue between generated message types and the buffers.
///
/// Generated code implements this by delegating to its own `total_size`,
/// `write_fields` and `read_fields`; the buffers use it to frame nested
/// messages with their byte length.
pub trait Message: Default {
    /// Exact number of bytes `write_to` produces.
    fn wire_size(&self) -> usize;

    /// Writes every field record of `self`.
    fn write_to(&self, writer: &mut ByteBufferMut<'_>) -> Result<(), EncodeError>;

    /// Reads field records into `self`, leaving fields that never appear untouched.
    fn read_from(&mut self, reader: &mut ByteBuffer<'_>) -> Result<(), DecodeError>;
}
