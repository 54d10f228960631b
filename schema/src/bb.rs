use byteorder::{ByteOrder, LittleEndian};

use crate::{size, DecodeError, EncodeError, Message};

/// A bounded byte buffer meant for reading field records.
///
/// Example usage:
///
/// ```
/// let mut bb = brine_nsd_schema::ByteBuffer::new(&[1, 0, 2, 0, 0x3c, 0xd8, 0x55, 0xdf]);
/// assert_eq!(bb.read_field_id(), Ok(1));
/// assert_eq!(bb.read_string().as_deref(), Ok("🍕"));
/// assert_eq!(bb.remaining(), 0);
/// ```
///
pub struct ByteBuffer<'a> {
    data: &'a [u8],
    index: usize,
}

impl<'a> ByteBuffer<'a> {
    /// Create a new ByteBuffer that reads the whole of `data`.
    pub fn new(data: &'a [u8]) -> ByteBuffer<'a> {
        ByteBuffer { data, index: 0 }
    }

    /// Create a ByteBuffer over `length` bytes of `buffer` starting at `offset`.
    /// Fails if that range does not lie inside `buffer`.
    pub fn bounded(buffer: &'a [u8], offset: usize, length: usize) -> Result<ByteBuffer<'a>, DecodeError> {
        match offset.checked_add(length) {
            Some(end) if end <= buffer.len() => Ok(ByteBuffer::new(&buffer[offset..end])),
            _ => Err(DecodeError::OutOfBounds {
                offset,
                length,
                buffer_len: buffer.len(),
            }),
        }
    }

    /// Retrieves the underlying byte slice.
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Retrieves the current index into the underlying byte slice. This starts
    /// off as 0 and ends up as `self.data().len()` when everything has been
    /// read.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Number of bytes left to read.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.index
    }

    /// Try to read `len` raw bytes starting at the current index.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], DecodeError> {
        if len > self.remaining() {
            Err(DecodeError::UnexpectedEof {
                position:  self.index,
                needed:    len,
                remaining: self.remaining(),
            })
        } else {
            let value = &self.data[self.index..self.index + len];
            self.index += len;
            Ok(value)
        }
    }

    /// Try to read a byte starting at the current index.
    pub fn read_byte(&mut self) -> Result<u8, DecodeError> {
        Ok(self.read_bytes(size::BYTE_LEN)?[0])
    }

    /// Try to read a boolean. Any nonzero byte is `true`.
    pub fn read_bool(&mut self) -> Result<bool, DecodeError> {
        Ok(self.read_byte()? != 0)
    }

    pub fn read_sbyte(&mut self) -> Result<i8, DecodeError> {
        Ok(self.read_byte()? as i8)
    }

    pub fn read_u16(&mut self) -> Result<u16, DecodeError> {
        Ok(LittleEndian::read_u16(self.read_bytes(size::SHORT_LEN)?))
    }

    pub fn read_i16(&mut self) -> Result<i16, DecodeError> {
        Ok(LittleEndian::read_i16(self.read_bytes(size::SHORT_LEN)?))
    }

    pub fn read_u32(&mut self) -> Result<u32, DecodeError> {
        Ok(LittleEndian::read_u32(self.read_bytes(size::INT_LEN)?))
    }

    pub fn read_i32(&mut self) -> Result<i32, DecodeError> {
        Ok(LittleEndian::read_i32(self.read_bytes(size::INT_LEN)?))
    }

    pub fn read_u64(&mut self) -> Result<u64, DecodeError> {
        Ok(LittleEndian::read_u64(self.read_bytes(size::LONG_LEN)?))
    }

    pub fn read_i64(&mut self) -> Result<i64, DecodeError> {
        Ok(LittleEndian::read_i64(self.read_bytes(size::LONG_LEN)?))
    }

    /// Try to read a 32-bit float. The wire holds its bit pattern, which is
    /// reinterpreted rather than converted.
    pub fn read_f32(&mut self) -> Result<f32, DecodeError> {
        Ok(f32::from_bits(self.read_u32()?))
    }

    /// Try to read a 64-bit float from its bit pattern.
    pub fn read_f64(&mut self) -> Result<f64, DecodeError> {
        Ok(f64::from_bits(self.read_u64()?))
    }

    /// Try to read a single UTF-16 code unit.
    pub fn read_char(&mut self) -> Result<u16, DecodeError> {
        self.read_u16()
    }

    /// Try to read the `u16` id that opens a field record.
    pub fn read_field_id(&mut self) -> Result<u16, DecodeError> {
        self.read_u16()
    }

    /// Try to read the presence byte that follows an optional field's id.
    pub fn read_presence(&mut self) -> Result<bool, DecodeError> {
        self.read_bool()
    }

    /// Try to read a `u16` array count, string length or nested message length.
    pub fn read_length(&mut self) -> Result<usize, DecodeError> {
        Ok(self.read_u16()? as usize)
    }

    /// Try to read a string stored as a code unit count followed by UTF-16
    /// code units.
    pub fn read_string(&mut self) -> Result<String, DecodeError> {
        let position = self.index;
        let count = self.read_length()?;
        let bytes = self.read_bytes(count * size::CHAR_LEN)?;
        let units: Vec<u16> = bytes.chunks_exact(size::CHAR_LEN).map(LittleEndian::read_u16).collect();
        String::from_utf16(&units).map_err(|_| DecodeError::InvalidUtf16 { position })
    }

    /// Try to read an enum stored as its 32-bit underlying value.
    pub fn read_enum<E>(&mut self) -> Result<E, DecodeError>
    where
        E: TryFrom<i32, Error = DecodeError>,
    {
        E::try_from(self.read_i32()?)
    }

    /// Try to read a count-prefixed array, reading each element with `read`.
    pub fn read_array<T, F>(&mut self, mut read: F) -> Result<Vec<T>, DecodeError>
    where
        F: FnMut(&mut Self) -> Result<T, DecodeError>,
    {
        let count = self.read_length()?;
        // Every element takes at least one byte, so a larger count cannot be
        // satisfied and must not size the allocation.
        let mut items = Vec::with_capacity(count.min(self.remaining()));
        for _ in 0..count {
            items.push(read(self)?);
        }
        Ok(items)
    }

    /// Try to read a presence byte and, if it is set, a value with `read`.
    pub fn read_optional<T, F>(&mut self, read: F) -> Result<Option<T>, DecodeError>
    where
        F: FnOnce(&mut Self) -> Result<T, DecodeError>,
    {
        if self.read_presence()? {
            read(self).map(Some)
        } else {
            Ok(None)
        }
    }

    /// Try to read a length-prefixed nested message into a fresh value.
    pub fn read_message<M: Message>(&mut self) -> Result<M, DecodeError> {
        let mut message = M::default();
        self.read_message_into(&mut message)?;
        Ok(message)
    }

    /// Try to read a length-prefixed nested message into an existing value.
    /// The nested reader is bounded by the prefix, and the cursor always moves
    /// past the whole nested payload.
    pub fn read_message_into<M: Message>(&mut self, message: &mut M) -> Result<(), DecodeError> {
        let length = self.read_length()?;
        let bytes = self.read_bytes(length)?;
        message.read_from(&mut ByteBuffer::new(bytes))
    }

    /// Optional counterpart of `read_message_into`: a present message
    /// populates the existing value if there is one, an absent one clears it.
    pub fn read_optional_message_into<M: Message>(&mut self, message: &mut Option<M>) -> Result<(), DecodeError> {
        if !self.read_presence()? {
            *message = None;
            return Ok(());
        }
        if let Some(existing) = message.as_mut() {
            return self.read_message_into(existing);
        }
        *message = Some(self.read_message()?);
        Ok(())
    }

    /// Skip over a length-prefixed nested message without decoding it.
    pub fn skip_message(&mut self) -> Result<(), DecodeError> {
        let length = self.read_length()?;
        self.read_bytes(length)?;
        Ok(())
    }
}

#[cfg(test)]
#[derive(Debug, Default, PartialEq)]
struct Pair {
    a: u8,
    b: Option<u16>,
}

#[cfg(test)]
impl Message for Pair {
    fn wire_size(&self) -> usize {
        let mut length = size::FIELD_HEADER_LEN + size::BYTE_LEN;
        if self.b.is_some() {
            length += size::OPTIONAL_FIELD_LEN + size::SHORT_LEN;
        }
        length
    }

    fn write_to(&self, writer: &mut ByteBufferMut<'_>) -> Result<(), EncodeError> {
        writer.write_field_id(0)?;
        writer.write_byte(self.a)?;
        if let Some(value) = self.b {
            writer.write_field_id(1)?;
            writer.write_presence()?;
            writer.write_u16(value)?;
        }
        Ok(())
    }

    fn read_from(&mut self, reader: &mut ByteBuffer<'_>) -> Result<(), DecodeError> {
        while reader.remaining() > size::FIELD_HEADER_LEN {
            match reader.read_field_id()? {
                0 => self.a = reader.read_byte()?,
                1 => self.b = reader.read_optional(|r| r.read_u16())?,
                id => return Err(DecodeError::UnknownField { id, position: reader.index() - 2 }),
            }
        }
        Ok(())
    }
}

#[test]
fn bounded() {
    let data = [1, 2, 3, 4, 5];
    let bb = ByteBuffer::bounded(&data, 1, 3).unwrap();
    assert_eq!(bb.data(), &[2, 3, 4]);
    assert_eq!(
        ByteBuffer::bounded(&data, 3, 3).err(),
        Some(DecodeError::OutOfBounds { offset: 3, length: 3, buffer_len: 5 })
    );
    assert!(ByteBuffer::bounded(&data, usize::MAX, 2).is_err());
    assert_eq!(ByteBuffer::bounded(&data, 5, 0).unwrap().remaining(), 0);
}

#[test]
fn read_bool() {
    let read = |bytes| ByteBuffer::new(bytes).read_bool();
    assert!(read(&[]).is_err());
    assert_eq!(read(&[0]), Ok(false));
    assert_eq!(read(&[1]), Ok(true));
    assert_eq!(read(&[2]), Ok(true));
}

#[test]
fn read_bytes() {
    let read = |bytes, len| ByteBuffer::new(bytes).read_bytes(len);
    assert_eq!(read(&[], 0), Ok(vec![].as_slice()));
    assert!(read(&[], 1).is_err());
    assert_eq!(read(&[0], 1), Ok(vec![0].as_slice()));

    let mut bb = ByteBuffer::new(&[1, 2, 3, 4, 5]);
    assert_eq!(bb.read_bytes(3), Ok(vec![1, 2, 3].as_slice()));
    assert_eq!(bb.read_bytes(2), Ok(vec![4, 5].as_slice()));
    assert_eq!(
        bb.read_bytes(1),
        Err(DecodeError::UnexpectedEof { position: 5, needed: 1, remaining: 0 })
    );
}

#[test]
fn read_fixed_width_is_little_endian() {
    let mut bb = ByteBuffer::new(&[
        0x34, 0x12,
        0xfe, 0xff,
        0x78, 0x56, 0x34, 0x12,
        0xff, 0xff, 0xff, 0xff,
        0x08, 0x07, 0x06, 0x05, 0x04, 0x03, 0x02, 0x01,
        0x80,
    ]);
    assert_eq!(bb.read_u16(), Ok(0x1234));
    assert_eq!(bb.read_i16(), Ok(-2));
    assert_eq!(bb.read_u32(), Ok(0x1234_5678));
    assert_eq!(bb.read_i32(), Ok(-1));
    assert_eq!(bb.read_u64(), Ok(0x0102_0304_0506_0708));
    assert_eq!(bb.read_sbyte(), Ok(-128));
    assert_eq!(bb.remaining(), 0);
}

#[test]
fn read_string() {
    let read = |bytes| ByteBuffer::new(bytes).read_string();
    assert_eq!(read(&[0, 0]), Ok(String::new()));
    assert_eq!(read(&[2, 0, b'o', 0, b'k', 0]), Ok("ok".to_string()));
    assert_eq!(read(&[1, 0, 0xe9, 0]), Ok("é".to_string()));
    assert!(matches!(read(&[2, 0, b'o', 0]), Err(DecodeError::UnexpectedEof { .. })));
    // Lone high surrogate.
    assert_eq!(read(&[1, 0, 0x3d, 0xd8]), Err(DecodeError::InvalidUtf16 { position: 0 }));
}

#[test]
fn read_array_and_optional() {
    let mut bb = ByteBuffer::new(&[3, 0, 1, 2, 3, 0, 1, 9, 0]);
    assert_eq!(bb.read_array(|r| r.read_byte()), Ok(vec![1, 2, 3]));
    assert_eq!(bb.read_optional(|r| r.read_byte()), Ok(None));
    assert_eq!(bb.read_optional(|r| r.read_u16()), Ok(Some(9)));
}

#[test]
fn read_nested_message() {
    // [len=8][id 0][a=7][id 1][present][b=0x0102] then a trailing byte
    let data = [8, 0, 0, 0, 7, 1, 0, 1, 2, 1, 0xaa];
    let mut bb = ByteBuffer::new(&data);
    let pair: Pair = bb.read_message().unwrap();
    assert_eq!(pair, Pair { a: 7, b: Some(0x0102) });
    assert_eq!(bb.read_byte(), Ok(0xaa));
}

#[test]
fn read_message_into_populates() {
    // Only field 0 is present, so `b` keeps its previous value.
    let data = [3, 0, 0, 0, 42];
    let mut pair = Pair { a: 1, b: Some(5) };
    ByteBuffer::new(&data).read_message_into(&mut pair).unwrap();
    assert_eq!(pair, Pair { a: 42, b: Some(5) });

    let mut optional = Some(Pair { a: 1, b: Some(5) });
    ByteBuffer::new(&[1, 3, 0, 0, 0, 9]).read_optional_message_into(&mut optional).unwrap();
    assert_eq!(optional, Some(Pair { a: 9, b: Some(5) }));

    ByteBuffer::new(&[0]).read_optional_message_into(&mut optional).unwrap();
    assert_eq!(optional, None);

    ByteBuffer::new(&[1, 3, 0, 0, 0, 4]).read_optional_message_into(&mut optional).unwrap();
    assert_eq!(optional, Some(Pair { a: 4, b: None }));
}

#[test]
fn skip_message() {
    let mut bb = ByteBuffer::new(&[2, 0, 0xff, 0xff, 7]);
    bb.skip_message().unwrap();
    assert_eq!(bb.read_byte(), Ok(7));
}

/// A byte buffer meant for writing into a range of exactly the computed
/// message size.
///
/// Example usage:
///
/// ```
/// let mut data = [0u8; 6];
/// let mut bb = brine_nsd_schema::ByteBufferMut::new(&mut data, 0, 6).unwrap();
/// bb.write_field_id(2).unwrap();
/// bb.write_f32(1.0).unwrap();
/// assert_eq!(bb.finish(), Ok(6));
/// assert_eq!(data, [2, 0, 0, 0, 0x80, 0x3f]);
/// ```
///
pub struct ByteBufferMut<'a> {
    data: &'a mut [u8],
    index: usize,
}

impl<'a> ByteBufferMut<'a> {
    /// Creates a writer over `size` bytes of `buffer` starting at `offset`.
    /// Fails if the buffer cannot hold that many bytes past `offset`.
    pub fn new(buffer: &'a mut [u8], offset: usize, size: usize) -> Result<ByteBufferMut<'a>, EncodeError> {
        let available = buffer.len();
        match offset.checked_add(size) {
            Some(end) if end <= available => Ok(ByteBufferMut {
                data:  &mut buffer[offset..end],
                index: 0,
            }),
            _ => Err(EncodeError::BufferTooSmall {
                offset,
                needed: size,
                available,
            }),
        }
    }

    /// Returns the number of bytes written so far.
    pub fn len(&self) -> usize {
        self.index
    }

    /// Returns true if nothing has been written yet.
    pub fn is_empty(&self) -> bool {
        self.index == 0
    }

    /// Returns the size this writer was created for.
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Consumes the writer and returns the number of bytes written, which must
    /// be exactly the size it was created for.
    pub fn finish(self) -> Result<usize, EncodeError> {
        if self.index == self.data.len() {
            Ok(self.index)
        } else {
            Err(EncodeError::SizeMismatch {
                expected: self.data.len(),
                written:  self.index,
            })
        }
    }

    fn reserve(&mut self, len: usize) -> Result<&mut [u8], EncodeError> {
        let start = self.index;
        let end = start + len;
        if end > self.data.len() {
            return Err(EncodeError::SizeMismatch {
                expected: self.data.len(),
                written:  end,
            });
        }
        self.index = end;
        Ok(&mut self.data[start..end])
    }

    /// Write raw bytes.
    pub fn write_bytes(&mut self, value: &[u8]) -> Result<(), EncodeError> {
        self.reserve(value.len())?.copy_from_slice(value);
        Ok(())
    }

    pub fn write_byte(&mut self, value: u8) -> Result<(), EncodeError> {
        self.reserve(size::BYTE_LEN)?[0] = value;
        Ok(())
    }

    /// Write a boolean as a single `0` or `1` byte.
    pub fn write_bool(&mut self, value: bool) -> Result<(), EncodeError> {
        self.write_byte(if value { 1 } else { 0 })
    }

    pub fn write_sbyte(&mut self, value: i8) -> Result<(), EncodeError> {
        self.write_byte(value as u8)
    }

    pub fn write_u16(&mut self, value: u16) -> Result<(), EncodeError> {
        LittleEndian::write_u16(self.reserve(size::SHORT_LEN)?, value);
        Ok(())
    }

    pub fn write_i16(&mut self, value: i16) -> Result<(), EncodeError> {
        LittleEndian::write_i16(self.reserve(size::SHORT_LEN)?, value);
        Ok(())
    }

    pub fn write_u32(&mut self, value: u32) -> Result<(), EncodeError> {
        LittleEndian::write_u32(self.reserve(size::INT_LEN)?, value);
        Ok(())
    }

    pub fn write_i32(&mut self, value: i32) -> Result<(), EncodeError> {
        LittleEndian::write_i32(self.reserve(size::INT_LEN)?, value);
        Ok(())
    }

    pub fn write_u64(&mut self, value: u64) -> Result<(), EncodeError> {
        LittleEndian::write_u64(self.reserve(size::LONG_LEN)?, value);
        Ok(())
    }

    pub fn write_i64(&mut self, value: i64) -> Result<(), EncodeError> {
        LittleEndian::write_i64(self.reserve(size::LONG_LEN)?, value);
        Ok(())
    }

    /// Write the bit pattern of a 32-bit float.
    pub fn write_f32(&mut self, value: f32) -> Result<(), EncodeError> {
        self.write_u32(value.to_bits())
    }

    /// Write the bit pattern of a 64-bit float.
    pub fn write_f64(&mut self, value: f64) -> Result<(), EncodeError> {
        self.write_u64(value.to_bits())
    }

    /// Write a single UTF-16 code unit.
    pub fn write_char(&mut self, value: u16) -> Result<(), EncodeError> {
        self.write_u16(value)
    }

    pub fn write_field_id(&mut self, id: u16) -> Result<(), EncodeError> {
        self.write_u16(id)
    }

    /// Write the presence byte of an optional field that has a value.
    pub fn write_presence(&mut self) -> Result<(), EncodeError> {
        self.write_byte(1)
    }

    /// Write a `u16` count or length header.
    pub fn write_length(&mut self, length: usize) -> Result<(), EncodeError> {
        let header = u16::try_from(length).map_err(|_| EncodeError::LengthOverflow { length })?;
        self.write_u16(header)
    }

    /// Write a string as its UTF-16 code unit count followed by the units.
    pub fn write_string(&mut self, value: &str) -> Result<(), EncodeError> {
        self.write_length(size::utf16_len(value))?;
        for unit in value.encode_utf16() {
            self.write_u16(unit)?;
        }
        Ok(())
    }

    /// Write an enum as its 32-bit underlying value.
    pub fn write_enum<E: Into<i32>>(&mut self, value: E) -> Result<(), EncodeError> {
        self.write_i32(value.into())
    }

    /// Write a nested message prefixed with its byte length.
    pub fn write_message<M: Message>(&mut self, message: &M) -> Result<(), EncodeError> {
        let size = message.wire_size();
        self.write_length(size)?;
        let mut nested = ByteBufferMut {
            data:  self.reserve(size)?,
            index: 0,
        };
        message.write_to(&mut nested)?;
        nested.finish().map(|_| ())
    }
}

#[cfg(test)]
fn write_once(size: usize, cb: fn(&mut ByteBufferMut<'_>) -> Result<(), EncodeError>) -> Vec<u8> {
    let mut data = vec![0; size];
    let mut bb = ByteBufferMut::new(&mut data, 0, size).unwrap();
    cb(&mut bb).unwrap();
    bb.finish().unwrap();
    data
}

#[test]
fn new_checks_range() {
    let mut data = [0u8; 4];
    assert!(ByteBufferMut::new(&mut data, 1, 3).is_ok());
    assert_eq!(
        ByteBufferMut::new(&mut data, 2, 3).err(),
        Some(EncodeError::BufferTooSmall { offset: 2, needed: 3, available: 4 })
    );
}

#[test]
fn write_bool() {
    assert_eq!(write_once(1, |bb| bb.write_bool(false)), [0]);
    assert_eq!(write_once(1, |bb| bb.write_bool(true)), [1]);
}

#[test]
fn write_fixed_width_is_little_endian() {
    assert_eq!(write_once(2, |bb| bb.write_u16(0x1234)), [0x34, 0x12]);
    assert_eq!(write_once(2, |bb| bb.write_i16(-2)), [0xfe, 0xff]);
    assert_eq!(write_once(4, |bb| bb.write_u32(0x1234_5678)), [0x78, 0x56, 0x34, 0x12]);
    assert_eq!(write_once(4, |bb| bb.write_i32(-1)), [0xff; 4]);
    assert_eq!(
        write_once(8, |bb| bb.write_u64(0x0102_0304_0506_0708)),
        [8, 7, 6, 5, 4, 3, 2, 1]
    );
    assert_eq!(write_once(1, |bb| bb.write_sbyte(-128)), [0x80]);
    assert_eq!(write_once(8, |bb| bb.write_f64(1.0)), [0, 0, 0, 0, 0, 0, 0xf0, 0x3f]);
}

#[test]
fn write_string() {
    assert_eq!(write_once(2, |bb| bb.write_string("")), [0, 0]);
    assert_eq!(write_once(6, |bb| bb.write_string("ok")), [2, 0, b'o', 0, b'k', 0]);
    assert_eq!(write_once(6, |bb| bb.write_string("🍕")), [2, 0, 0x3c, 0xd8, 0x55, 0xdf]);
}

#[test]
fn write_length_overflow() {
    let mut data = [0u8; 2];
    let mut bb = ByteBufferMut::new(&mut data, 0, 2).unwrap();
    assert_eq!(bb.write_length(65_535), Ok(()));

    let mut data = [0u8; 2];
    let mut bb = ByteBufferMut::new(&mut data, 0, 2).unwrap();
    assert_eq!(bb.write_length(65_536), Err(EncodeError::LengthOverflow { length: 65_536 }));
}

#[test]
fn write_past_size_is_a_mismatch() {
    let mut data = [0u8; 3];
    let mut bb = ByteBufferMut::new(&mut data, 0, 3).unwrap();
    bb.write_u16(1).unwrap();
    assert_eq!(bb.write_u16(2), Err(EncodeError::SizeMismatch { expected: 3, written: 4 }));
}

#[test]
fn finish_requires_exact_size() {
    let mut data = [0u8; 4];
    let mut bb = ByteBufferMut::new(&mut data, 0, 4).unwrap();
    bb.write_u16(1).unwrap();
    assert_eq!(bb.finish(), Err(EncodeError::SizeMismatch { expected: 4, written: 2 }));
}

#[test]
fn write_nested_message() {
    let pair = Pair { a: 7, b: Some(0x0102) };
    assert_eq!(pair.wire_size(), 8);
    let data = write_once(10, |bb| bb.write_message(&Pair { a: 7, b: Some(0x0102) }));
    assert_eq!(data, [8, 0, 0, 0, 7, 1, 0, 1, 2, 1]);

    let mut bb = ByteBuffer::new(&data);
    assert_eq!(bb.read_message::<Pair>(), Ok(pair));
}

#[test]
fn read_array_does_not_trust_the_count() {
    let mut bb = ByteBuffer::new(&[0xff, 0xff, 7, 9]);
    assert!(matches!(
        bb.read_array(|r| r.read_byte().map(|b| [u64::from(b); 512])),
        Err(DecodeError::UnexpectedEof { .. })
    ));

    let mut bb = ByteBuffer::new(&[3, 0, 1, 2, 3]);
    let items = bb.read_array(|r| r.read_byte()).unwrap();
    assert_eq!(items, [1, 2, 3]);
}

#[test]
fn write_sequence() {
    let data = write_once(13, |bb| {
        bb.write_field_id(4)?;
        bb.write_length(2)?;
        bb.write_enum(3)?;
        bb.write_enum(-1)?;
        bb.write_bool(true)
    });
    assert_eq!(data, [4, 0, 2, 0, 3, 0, 0, 0, 0xff, 0xff, 0xff, 0xff, 1]);
}

#[test]
fn float_bits_survive_a_big_endian_host() {
    use byteorder::BigEndian;

    assert_eq!(write_once(4, |bb| bb.write_f32(1.5)), [0, 0, 0xc0, 0x3f]);

    for value in [0.0f32, -0.0, 1.5, f32::MIN_POSITIVE, f32::INFINITY, f32::from_bits(0x7fc0_0001)] {
        // A big-endian host holds the bits in reverse order and swaps them
        // before writing and after reading.
        let native = value.to_bits().to_be_bytes();
        let swapped = BigEndian::read_u32(&native).swap_bytes();
        let mut wire = [0u8; 4];
        BigEndian::write_u32(&mut wire, swapped);
        assert_eq!(wire, value.to_bits().to_le_bytes());

        let read_back = f32::from_bits(BigEndian::read_u32(&wire).swap_bytes());
        assert_eq!(read_back.to_bits(), value.to_bits());
        assert_eq!(ByteBuffer::new(&wire).read_f32().map(f32::to_bits), Ok(value.to_bits()));
    }

    for value in [0.0f64, -2.25, f64::MAX, f64::NEG_INFINITY, f64::from_bits(0x7ff8_0000_0000_0001)] {
        let native = value.to_bits().to_be_bytes();
        let swapped = BigEndian::read_u64(&native).swap_bytes();
        let mut wire = [0u8; 8];
        BigEndian::write_u64(&mut wire, swapped);
        assert_eq!(wire, value.to_bits().to_le_bytes());
        assert_eq!(ByteBuffer::new(&wire).read_f64().map(f64::to_bits), Ok(value.to_bits()));
    }
}
