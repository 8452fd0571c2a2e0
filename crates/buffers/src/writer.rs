//! Auto-growing binary buffer writer.

/// A binary writer that appends to an internal `Vec<u8>`.
///
/// # Example
///
/// ```
/// use rfc_marshal_buffers::Writer;
///
/// let mut writer = Writer::new();
/// writer.i16(-2);
/// writer.fill(0x20, 2);
/// assert_eq!(writer.flush(), vec![0xFF, 0xFE, 0x20, 0x20]);
/// ```
#[derive(Debug, Default, Clone)]
pub struct Writer {
    uint8: Vec<u8>,
}

impl Writer {
    /// Creates an empty writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty writer with room for `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            uint8: Vec::with_capacity(capacity),
        }
    }

    /// Number of bytes written so far.
    pub fn len(&self) -> usize {
        self.uint8.len()
    }

    pub fn is_empty(&self) -> bool {
        self.uint8.is_empty()
    }

    /// Returns the written bytes and resets the writer.
    pub fn flush(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.uint8)
    }

    #[inline]
    pub fn u8(&mut self, n: u8) {
        self.uint8.push(n);
    }

    #[inline]
    pub fn i16(&mut self, n: i16) {
        self.uint8.extend_from_slice(&n.to_be_bytes());
    }

    #[inline]
    pub fn i32(&mut self, n: i32) {
        self.uint8.extend_from_slice(&n.to_be_bytes());
    }

    #[inline]
    pub fn i64(&mut self, n: i64) {
        self.uint8.extend_from_slice(&n.to_be_bytes());
    }

    #[inline]
    pub fn f64(&mut self, f: f64) {
        self.uint8.extend_from_slice(&f.to_be_bytes());
    }

    /// Writes one UTF-16 code unit, little-endian.
    #[inline]
    pub fn u16_le(&mut self, unit: u16) {
        self.uint8.extend_from_slice(&unit.to_le_bytes());
    }

    /// Appends raw bytes.
    pub fn buf(&mut self, data: &[u8]) {
        self.uint8.extend_from_slice(data);
    }

    /// Appends `count` copies of `byte`.
    pub fn fill(&mut self, byte: u8, count: usize) {
        self.uint8.resize(self.uint8.len() + count, byte);
    }
}
