//! Runtime support for code generated by `brine-nsd-compiler`.
//!
//! A message is a flat run of field records `[id: u16][payload]`. Numbers are
//! little-endian, strings are a `u16` count of UTF-16 code units followed by
//! the units, arrays are a `u16` element count followed by the elements, and
//! nested messages are prefixed with their `u16` byte length.
//!
//! ```
//! use brine_nsd_schema::*;
//!
//! let mut data = [0u8; 8];
//! let mut out = ByteBufferMut::new(&mut data, 0, 8).unwrap();
//! out.write_field_id(3).unwrap();
//! out.write_string("hi").unwrap();
//! assert_eq!(out.finish(), Ok(8));
//! assert_eq!(data, [3, 0, 2, 0, b'h', 0, b'i', 0]);
//!
//! let mut bb = ByteBuffer::new(&data);
//! assert_eq!(bb.read_field_id(), Ok(3));
//! assert_eq!(bb.read_string().as_deref(), Ok("hi"));
//! ```

pub mod bb;
pub mod error;
pub mod message;
pub mod size;

pub use bb::*;
pub use error::*;
pub use message::*;
pub use size::utf16_len;
