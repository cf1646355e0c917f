//! Byte stream abstraction the codec runs over
//!
//! The codec performs no buffering of its own: every primitive issues exactly
//! one write or one exact-length read against a [`ByteStream`].

use crate::codec::Mode;
use crate::error::{Error, Result};
use bytes::{Buf, BytesMut};
use std::io::{self, Cursor, Read, Seek, SeekFrom, Write};

/// Something that can take and give bytes on behalf of a [`Codec`](crate::Codec).
pub trait ByteStream {
    /// Write all of `bytes` or fail.
    fn write_all_bytes(&mut self, bytes: &[u8]) -> Result<()>;

    /// Fill `buf` completely or fail with [`Error::UnexpectedEndOfStream`].
    fn read_exact_bytes(&mut self, buf: &mut [u8]) -> Result<()>;

    /// Move back to the start of the stream.
    fn rewind(&mut self) -> Result<()> {
        Err(Error::NotRewindable)
    }
}

impl<S: ByteStream + ?Sized> ByteStream for &mut S {
    fn write_all_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        (**self).write_all_bytes(bytes)
    }

    fn read_exact_bytes(&mut self, buf: &mut [u8]) -> Result<()> {
        (**self).read_exact_bytes(buf)
    }

    fn rewind(&mut self) -> Result<()> {
        (**self).rewind()
    }
}

macro_rules! writable_cursor {
    ($($inner:ty),*) => {
        $(
            impl ByteStream for Cursor<$inner> {
                fn write_all_bytes(&mut self, bytes: &[u8]) -> Result<()> {
                    self.write_all(bytes)?;
                    Ok(())
                }

                fn read_exact_bytes(&mut self, buf: &mut [u8]) -> Result<()> {
                    read_exact_or_eof(self, buf)
                }

                fn rewind(&mut self) -> Result<()> {
                    self.seek(SeekFrom::Start(0))?;
                    Ok(())
                }
            }
        )*
    };
}

writable_cursor!(Vec<u8>, &mut Vec<u8>, &mut [u8], Box<[u8]>);

/// Rewindable read-only source.
impl ByteStream for Cursor<&[u8]> {
    fn write_all_bytes(&mut self, _bytes: &[u8]) -> Result<()> {
        Err(Error::WrongDirection(Mode::Serialize))
    }

    fn read_exact_bytes(&mut self, buf: &mut [u8]) -> Result<()> {
        read_exact_or_eof(self, buf)
    }

    fn rewind(&mut self) -> Result<()> {
        self.set_position(0);
        Ok(())
    }
}

/// Reading consumes from the front of the slice.
impl ByteStream for &[u8] {
    fn write_all_bytes(&mut self, _bytes: &[u8]) -> Result<()> {
        Err(Error::WrongDirection(Mode::Serialize))
    }

    fn read_exact_bytes(&mut self, buf: &mut [u8]) -> Result<()> {
        if self.len() < buf.len() {
            return Err(Error::UnexpectedEndOfStream { needed: buf.len() });
        }
        let (head, tail) = self.split_at(buf.len());
        buf.copy_from_slice(head);
        *self = tail;
        Ok(())
    }
}

/// Writes append, reads consume from the front.
impl ByteStream for BytesMut {
    fn write_all_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.extend_from_slice(bytes);
        Ok(())
    }

    fn read_exact_bytes(&mut self, buf: &mut [u8]) -> Result<()> {
        if self.remaining() < buf.len() {
            return Err(Error::UnexpectedEndOfStream { needed: buf.len() });
        }
        self.copy_to_slice(buf);
        Ok(())
    }
}

/// Write-only adapter over any [`Write`].
#[derive(Debug)]
pub struct Sink<W>(pub W);

impl<W: Write> Sink<W> {
    /// Wrap a writer
    pub fn new(inner: W) -> Self {
        Self(inner)
    }

    /// Unwrap the writer
    pub fn into_inner(self) -> W {
        self.0
    }
}

impl<W: Write> ByteStream for Sink<W> {
    fn write_all_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.0.write_all(bytes)?;
        Ok(())
    }

    fn read_exact_bytes(&mut self, _buf: &mut [u8]) -> Result<()> {
        Err(Error::WrongDirection(Mode::Deserialize))
    }
}

/// Read-only adapter over any [`Read`].
#[derive(Debug)]
pub struct Source<R>(pub R);

impl<R: Read> Source<R> {
    /// Wrap a reader
    pub fn new(inner: R) -> Self {
        Self(inner)
    }

    /// Unwrap the reader
    pub fn into_inner(self) -> R {
        self.0
    }
}

impl<R: Read> ByteStream for Source<R> {
    fn write_all_bytes(&mut self, _bytes: &[u8]) -> Result<()> {
        Err(Error::WrongDirection(Mode::Serialize))
    }

    fn read_exact_bytes(&mut self, buf: &mut [u8]) -> Result<()> {
        read_exact_or_eof(&mut self.0, buf)
    }
}

fn read_exact_or_eof<R: Read + ?Sized>(reader: &mut R, buf: &mut [u8]) -> Result<()> {
    match reader.read_exact(buf) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
            Err(Error::UnexpectedEndOfStream { needed: buf.len() })
        }
        Err(e) => Err(Error::Io(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_write_rewind_read() {
        let mut cursor = Cursor::new(Vec::new());
        cursor.write_all_bytes(&[1, 2, 3]).unwrap();
        ByteStream::rewind(&mut cursor).unwrap();

        let mut buf = [0u8; 3];
        cursor.read_exact_bytes(&mut buf).unwrap();
        assert_eq!(buf, [1, 2, 3]);
    }

    #[test]
    fn test_short_read_is_end_of_stream() {
        let mut cursor = Cursor::new(vec![1u8, 2]);
        let mut buf = [0u8; 4];
        let err = cursor.read_exact_bytes(&mut buf).unwrap_err();
        assert!(matches!(err, Error::UnexpectedEndOfStream { needed: 4 }));
    }

    #[test]
    fn test_read_only_cursor_rewinds() {
        let data = [0x12u8, 0x34];
        let mut cursor = Cursor::new(&data[..]);
        assert!(matches!(
            cursor.write_all_bytes(&[1]),
            Err(Error::WrongDirection(Mode::Serialize))
        ));

        let mut buf = [0u8; 2];
        cursor.read_exact_bytes(&mut buf).unwrap();
        assert_eq!(buf, [0x12, 0x34]);
        assert!(matches!(
            cursor.read_exact_bytes(&mut buf[..1]),
            Err(Error::UnexpectedEndOfStream { needed: 1 })
        ));

        ByteStream::rewind(&mut cursor).unwrap();
        let mut again = [0u8; 2];
        cursor.read_exact_bytes(&mut again).unwrap();
        assert_eq!(again, data);
    }

    #[test]
    fn test_slice_consumes_front() {
        let data = [9u8, 8, 7];
        let mut slice: &[u8] = &data;
        let mut buf = [0u8; 2];
        slice.read_exact_bytes(&mut buf).unwrap();
        assert_eq!(buf, [9, 8]);
        assert_eq!(slice, &[7]);
        assert!(slice.write_all_bytes(&[1]).is_err());
    }

    #[test]
    fn test_bytes_mut_fifo() {
        let mut buf = BytesMut::new();
        buf.write_all_bytes(&[0xAA, 0xBB]).unwrap();

        let mut out = [0u8; 1];
        buf.read_exact_bytes(&mut out).unwrap();
        assert_eq!(out, [0xAA]);
        assert_eq!(&buf[..], &[0xBB]);
        assert!(matches!(
            ByteStream::rewind(&mut buf),
            Err(Error::NotRewindable)
        ));
    }

    #[test]
    fn test_adapters_reject_wrong_direction() {
        let mut sink = Sink::new(Vec::new());
        sink.write_all_bytes(&[1]).unwrap();
        assert!(matches!(
            sink.read_exact_bytes(&mut [0u8; 1]),
            Err(Error::WrongDirection(Mode::Deserialize))
        ));
        assert_eq!(sink.into_inner(), vec![1]);

        let mut source = Source::new(&[5u8][..]);
        assert!(matches!(
            source.write_all_bytes(&[1]),
            Err(Error::WrongDirection(Mode::Serialize))
        ));
        let mut one = [0u8; 1];
        source.read_exact_bytes(&mut one).unwrap();
        assert_eq!(one, [5]);
        assert!(matches!(
            source.read_exact_bytes(&mut one),
            Err(Error::UnexpectedEndOfStream { needed: 1 })
        ));
    }
}
