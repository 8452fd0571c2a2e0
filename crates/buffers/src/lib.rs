//! Binary buffer utilities for RFC field payloads.
//!
//! Fixed-width RFC fields are written and read through these two types:
//!
//! - [`Writer`] - Writes binary data to an auto-growing buffer
//! - [`Reader`] - Reads binary data from a byte slice with cursor tracking,
//!   reporting short input as [`BufferError::EndOfBuffer`] instead of panicking
//!
//! Multi-byte integers and floats are big-endian. Character payloads use
//! UTF-16 little-endian code units, see [`Writer::u16_le`].
//!
//! # Example
//!
//! ```
//! use rfc_marshal_buffers::{Reader, Writer};
//!
//! let mut writer = Writer::new();
//! writer.u8(0x01);
//! writer.i32(-2);
//! writer.f64(0.5);
//! let data = writer.flush();
//!
//! let mut reader = Reader::new(&data);
//! assert_eq!(reader.u8().unwrap(), 0x01);
//! assert_eq!(reader.i32().unwrap(), -2);
//! assert_eq!(reader.f64().unwrap(), 0.5);
//! assert!(reader.is_done());
//! ```

mod reader;
mod writer;

pub use reader::Reader;
pub use writer::Writer;

use thiserror::Error;

/// Error type for buffer operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BufferError {
    /// Attempted to read past the end of the buffer.
    #[error("end of buffer: needed {needed} bytes, {remaining} remaining")]
    EndOfBuffer { needed: usize, remaining: usize },
    /// Input left over after all expected values were read.
    #[error("trailing bytes: {0} left unread")]
    TrailingBytes(usize),
}
