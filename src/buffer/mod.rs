//! Accumulated child output

use bytes::BytesMut;

const INITIAL_CAPACITY: usize = 4096;

/// Append-only-until-reset byte buffer shared between the output reader and
/// the wait loop.
///
/// Bytes land here in the exact order they were read from the pty master and
/// are never dropped once read from the OS — there is no capacity-based
/// eviction. The only way the buffer shrinks is an explicit reset via
/// `Session::flush`.
pub(crate) struct OutputBuffer {
    data: BytesMut,
}

impl OutputBuffer {
    pub(crate) fn new() -> Self {
        Self {
            data: BytesMut::with_capacity(INITIAL_CAPACITY),
        }
    }

    /// Append a chunk read from the pty master.
    pub(crate) fn append(&mut self, chunk: &[u8]) {
        self.data.extend_from_slice(chunk);
    }

    /// Current contents as raw bytes.
    pub(crate) fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Current contents as a string slice, or `""` if not valid UTF-8.
    pub(crate) fn as_str(&self) -> &str {
        std::str::from_utf8(&self.data).unwrap_or("")
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.data.len()
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Reset to empty. Idempotent.
    pub(crate) fn reset(&mut self) {
        self.data.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn new_buffer_is_empty() {
        let buffer = OutputBuffer::new();
        assert_eq!(buffer.len(), 0);
        assert!(buffer.is_empty());
    }

    #[test]
    fn append_accumulates_in_order() {
        let mut buffer = OutputBuffer::new();
        buffer.append(b"login: ");
        buffer.append(b"alice");
        assert_eq!(buffer.as_bytes(), b"login: alice");
        assert_eq!(buffer.len(), 12);
    }

    #[test]
    fn reset_empties_and_is_idempotent() {
        let mut buffer = OutputBuffer::new();
        buffer.append(b"some output");
        buffer.reset();
        assert!(buffer.is_empty());
        buffer.reset();
        assert!(buffer.is_empty());
    }

    #[test]
    fn append_after_reset_starts_fresh() {
        let mut buffer = OutputBuffer::new();
        buffer.append(b"first");
        buffer.reset();
        buffer.append(b"second");
        assert_eq!(buffer.as_bytes(), b"second");
    }

    #[test]
    fn empty_append_is_a_noop() {
        let mut buffer = OutputBuffer::new();
        buffer.append(b"");
        assert!(buffer.is_empty());
    }

    #[test]
    fn as_str_on_invalid_utf8_is_empty() {
        let mut buffer = OutputBuffer::new();
        buffer.append(&[0xFF, 0xFE, 0xFD]);
        assert_eq!(buffer.as_str(), "");
        assert_eq!(buffer.as_bytes(), &[0xFF, 0xFE, 0xFD]);
    }

    #[test]
    fn as_str_on_utf8() {
        let mut buffer = OutputBuffer::new();
        buffer.append("password: 🔑".as_bytes());
        assert_eq!(buffer.as_str(), "password: 🔑");
    }

    #[test]
    fn growth_beyond_initial_capacity_keeps_contents() {
        let mut buffer = OutputBuffer::new();
        let chunk = [b'x'; 1000];
        for _ in 0..10 {
            buffer.append(&chunk);
        }
        assert_eq!(buffer.len(), 10_000);
        assert!(buffer.as_bytes().iter().all(|&b| b == b'x'));
    }

    proptest! {
        // The buffer after N appends equals the concatenation, in order, of
        // every chunk appended — no bytes duplicated or dropped.
        #[test]
        fn appends_equal_ordered_concatenation(
            chunks in prop::collection::vec(prop::collection::vec(any::<u8>(), 0..64), 0..16)
        ) {
            let mut buffer = OutputBuffer::new();
            let mut expected = Vec::new();
            for chunk in &chunks {
                buffer.append(chunk);
                expected.extend_from_slice(chunk);
            }
            prop_assert_eq!(buffer.as_bytes(), &expected[..]);
        }
    }
}
