//! Framing of received bytes into newline-terminated lines.

use crate::error::LineError;

/// Outcome of feeding one byte to a [`LineBuffer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LineStatus {
    /// No complete line yet.
    Pending,
    /// A non-empty line is ready in [`LineBuffer::line`].
    Ready,
    /// A line outgrew the buffer; its bytes up to the newline were dropped.
    Overflowed,
}

/// Fixed-capacity accumulator for one received line.
///
/// `\r` is ignored and blank lines are skipped. A line longer than `N`
/// bytes is discarded whole and reported once, when its newline arrives.
pub struct LineBuffer<const N: usize> {
    buf: [u8; N],
    len: usize,
    overflowed: bool,
    ready: bool,
}

impl<const N: usize> Default for LineBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> LineBuffer<N> {
    /// Create empty buffer
    pub const fn new() -> Self {
        Self {
            buf: [0u8; N],
            len: 0,
            overflowed: false,
            ready: false,
        }
    }

    /// Feed one received byte.
    ///
    /// After [`LineStatus::Ready`] the line stays available until the next
    /// call to `push` or [`clear`](Self::clear).
    pub fn push(&mut self, byte: u8) -> LineStatus {
        if self.ready {
            self.clear();
        }

        match byte {
            b'\r' => LineStatus::Pending,
            b'\n' => {
                if self.overflowed {
                    self.clear();
                    LineStatus::Overflowed
                } else if self.len == 0 {
                    LineStatus::Pending
                } else {
                    self.ready = true;
                    LineStatus::Ready
                }
            }
            _ if self.overflowed => LineStatus::Pending,
            _ if self.len == N => {
                self.overflowed = true;
                self.len = 0;
                LineStatus::Pending
            }
            _ => {
                self.buf[self.len] = byte;
                self.len += 1;
                LineStatus::Pending
            }
        }
    }

    /// The completed line, without its terminator.
    pub fn line(&self) -> Result<&str, LineError> {
        if self.overflowed {
            return Err(LineError::Overflow);
        }
        core::str::from_utf8(&self.buf[..self.len]).map_err(|_| LineError::InvalidUtf8)
    }

    /// Clear buffer
    pub fn clear(&mut self) {
        self.len = 0;
        self.overflowed = false;
        self.ready = false;
    }

    /// Bytes held for the line in progress.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed<const N: usize>(buffer: &mut LineBuffer<N>, bytes: &[u8]) -> LineStatus {
        let mut status = LineStatus::Pending;
        for &byte in bytes {
            status = buffer.push(byte);
        }
        status
    }

    #[test]
    fn completes_on_newline() {
        let mut buffer = LineBuffer::<32>::new();
        assert_eq!(feed(&mut buffer, b"{\"a\":1}"), LineStatus::Pending);
        assert_eq!(buffer.push(b'\n'), LineStatus::Ready);
        assert_eq!(buffer.line(), Ok("{\"a\":1}"));
    }

    #[test]
    fn carriage_return_is_ignored() {
        let mut buffer = LineBuffer::<32>::new();
        assert_eq!(feed(&mut buffer, b"abc\r\n"), LineStatus::Ready);
        assert_eq!(buffer.line(), Ok("abc"));
    }

    #[test]
    fn blank_lines_are_skipped() {
        let mut buffer = LineBuffer::<32>::new();
        assert_eq!(feed(&mut buffer, b"\n\r\n\n"), LineStatus::Pending);
        assert!(buffer.is_empty());
    }

    #[test]
    fn next_push_starts_a_new_line() {
        let mut buffer = LineBuffer::<32>::new();
        assert_eq!(feed(&mut buffer, b"one\n"), LineStatus::Ready);
        assert_eq!(feed(&mut buffer, b"two\n"), LineStatus::Ready);
        assert_eq!(buffer.line(), Ok("two"));
    }

    #[test]
    fn overflow_discards_until_newline() {
        let mut buffer = LineBuffer::<4>::new();
        assert_eq!(feed(&mut buffer, b"toolong"), LineStatus::Pending);
        assert_eq!(buffer.line(), Err(LineError::Overflow));
        assert_eq!(buffer.push(b'\n'), LineStatus::Overflowed);
        assert_eq!(feed(&mut buffer, b"ok\n"), LineStatus::Ready);
        assert_eq!(buffer.line(), Ok("ok"));
    }

    #[test]
    fn exactly_full_line_is_kept() {
        let mut buffer = LineBuffer::<4>::new();
        assert_eq!(feed(&mut buffer, b"abcd\n"), LineStatus::Ready);
        assert_eq!(buffer.line(), Ok("abcd"));
    }

    #[test]
    fn invalid_utf8_is_reported() {
        let mut buffer = LineBuffer::<8>::new();
        assert_eq!(feed(&mut buffer, &[0xff, 0xfe, b'\n']), LineStatus::Ready);
        assert_eq!(buffer.line(), Err(LineError::InvalidUtf8));
    }
}
