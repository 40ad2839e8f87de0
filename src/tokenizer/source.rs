//! # Byte Source
//!
//! A sequential byte reader over any [`Read`] implementation with exactly one
//! byte of pushback, which is all the lookahead the lexer needs.
use std::io::{self, BufRead, BufReader, ErrorKind, Read};

/// Buffered, forward-only byte reader with single-byte pushback.
pub struct ByteSource<R> {
    /// Underlying buffered reader
    reader: BufReader<R>,
    /// A byte handed back by [`ByteSource::unread`], served before the reader
    pushed_back: Option<u8>,
    /// Offset of the next byte to be returned
    offset: usize,
}

impl<R: Read> ByteSource<R> {
    /// Wraps `reader` in a buffered byte source positioned at offset 0.
    pub fn new(reader: R) -> Self {
        Self {
            reader: BufReader::new(reader),
            pushed_back: None,
            offset: 0,
        }
    }

    /// Reads and consumes the next byte, or `None` once the input is
    /// exhausted.
    ///
    /// # Errors
    ///
    /// Propagates any non-interrupt error from the underlying reader.
    pub fn next_byte(&mut self) -> io::Result<Option<u8>> {
        if let Some(byte) = self.pushed_back.take() {
            self.offset += 1;
            return Ok(Some(byte));
        }

        let byte = loop {
            match self.reader.fill_buf() {
                Ok([]) => return Ok(None),
                Ok(buf) => break buf[0],
                Err(err) if err.kind() == ErrorKind::Interrupted => {}
                Err(err) => return Err(err),
            }
        };
        self.reader.consume(1);
        self.offset += 1;
        Ok(Some(byte))
    }

    /// Hands `byte` back so the next [`ByteSource::next_byte`] returns it.
    ///
    /// Only one byte may be pending at a time.
    pub fn unread(&mut self, byte: u8) {
        debug_assert!(
            self.pushed_back.is_none(),
            "only one byte of pushback is supported"
        );
        self.pushed_back = Some(byte);
        self.offset -= 1;
    }

    /// Offset of the next byte that will be read.
    pub const fn offset(&self) -> usize {
        self.offset
    }
}
