//! Bounds-checked cursors over the caller's byte buffer.
//!
//! All wire-level reads and writes go through these two types so that a
//! truncated buffer surfaces as an error instead of a panic, and an
//! undersized output buffer surfaces as `BufferTooSmall`.

use solwire_keys::{Blockhash, Pubkey, PUBKEY_LENGTH};

use crate::error::MessageError;
use crate::shortvec;

/// Writing side: a mutable slice plus a position.
pub(crate) struct BufWriter<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> BufWriter<'a> {
    pub(crate) fn new(buf: &'a mut [u8]) -> Self {
        BufWriter { buf, pos: 0 }
    }

    pub(crate) fn position(&self) -> usize {
        self.pos
    }

    fn ensure(&self, count: usize) -> Result<(), MessageError> {
        if self.pos + count > self.buf.len() {
            return Err(MessageError::BufferTooSmall(format!(
                "need {} more bytes at offset {}, buffer holds {}",
                count,
                self.pos,
                self.buf.len()
            )));
        }
        Ok(())
    }

    pub(crate) fn put_u8(&mut self, value: u8) -> Result<(), MessageError> {
        self.ensure(1)?;
        self.buf[self.pos] = value;
        self.pos += 1;
        Ok(())
    }

    pub(crate) fn put_bytes(&mut self, bytes: &[u8]) -> Result<(), MessageError> {
        self.ensure(bytes.len())?;
        self.buf[self.pos..self.pos + bytes.len()].copy_from_slice(bytes);
        self.pos += bytes.len();
        Ok(())
    }

    pub(crate) fn put_compact(&mut self, value: u64) -> Result<(), MessageError> {
        self.put_bytes(&shortvec::encode(value))
    }

    pub(crate) fn put_pubkey(&mut self, key: &Pubkey) -> Result<(), MessageError> {
        self.put_bytes(key.as_bytes())
    }

    /// Advance without writing, leaving whatever bytes the caller's buffer
    /// already holds. Signature slots are reserved this way.
    pub(crate) fn skip(&mut self, count: usize) -> Result<(), MessageError> {
        self.ensure(count)?;
        self.pos += count;
        Ok(())
    }
}

/// Reading side: an immutable slice plus a position. Sliced payloads
/// borrow from the underlying buffer.
pub(crate) struct BufReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> BufReader<'a> {
    pub(crate) fn new(buf: &'a [u8]) -> Self {
        BufReader { buf, pos: 0 }
    }

    pub(crate) fn position(&self) -> usize {
        self.pos
    }

    pub(crate) fn read_u8(&mut self) -> Result<u8, MessageError> {
        let byte = *self.buf.get(self.pos).ok_or_else(|| {
            MessageError::Decode("unexpected end of buffer".into())
        })?;
        self.pos += 1;
        Ok(byte)
    }

    pub(crate) fn read_bytes(&mut self, count: usize) -> Result<&'a [u8], MessageError> {
        if self.pos + count > self.buf.len() {
            return Err(MessageError::Decode("unexpected end of buffer".into()));
        }
        let slice = &self.buf[self.pos..self.pos + count];
        self.pos += count;
        Ok(slice)
    }

    pub(crate) fn read_compact(&mut self) -> Result<u64, MessageError> {
        let (value, consumed) = shortvec::decode(&self.buf[self.pos.min(self.buf.len())..])?;
        self.pos += consumed;
        Ok(value)
    }

    /// A compact length immediately used to size an allocation or a slice;
    /// anything beyond the buffer length cannot be honest.
    pub(crate) fn read_compact_len(&mut self) -> Result<usize, MessageError> {
        let value = self.read_compact()?;
        if value > self.buf.len() as u64 {
            return Err(MessageError::Decode(format!(
                "declared length {value} exceeds buffer size"
            )));
        }
        Ok(value as usize)
    }

    pub(crate) fn read_pubkey(&mut self) -> Result<Pubkey, MessageError> {
        let mut bytes = [0u8; PUBKEY_LENGTH];
        bytes.copy_from_slice(self.read_bytes(PUBKEY_LENGTH)?);
        Ok(Pubkey::new(bytes))
    }

    pub(crate) fn read_blockhash(&mut self) -> Result<Blockhash, MessageError> {
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(self.read_bytes(32)?);
        Ok(Blockhash::new(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writer_tracks_position() {
        let mut buf = [0u8; 8];
        let mut w = BufWriter::new(&mut buf);
        w.put_u8(0xAB).unwrap();
        w.put_bytes(&[1, 2, 3]).unwrap();
        assert_eq!(w.position(), 4);
        assert_eq!(&buf[..4], &[0xAB, 1, 2, 3]);
    }

    #[test]
    fn writer_overflow_is_an_error() {
        let mut buf = [0u8; 2];
        let mut w = BufWriter::new(&mut buf);
        assert!(w.put_bytes(&[1, 2, 3]).is_err());
    }

    #[test]
    fn writer_skip_leaves_bytes_untouched() {
        let mut buf = [0x77u8; 4];
        let mut w = BufWriter::new(&mut buf);
        w.skip(2).unwrap();
        w.put_u8(0x01).unwrap();
        assert_eq!(buf, [0x77, 0x77, 0x01, 0x77]);
    }

    #[test]
    fn reader_roundtrips_writer() {
        let mut buf = [0u8; 64];
        let key = Pubkey::new([9u8; 32]);
        let mut w = BufWriter::new(&mut buf);
        w.put_compact(300).unwrap();
        w.put_pubkey(&key).unwrap();
        let len = w.position();

        let mut r = BufReader::new(&buf[..len]);
        assert_eq!(r.read_compact().unwrap(), 300);
        assert_eq!(r.read_pubkey().unwrap(), key);
        assert_eq!(r.position(), len);
    }

    #[test]
    fn reader_truncation_is_an_error() {
        let mut r = BufReader::new(&[1, 2]);
        assert!(r.read_bytes(3).is_err());
        let mut r = BufReader::new(&[]);
        assert!(r.read_u8().is_err());
    }

    #[test]
    fn dishonest_declared_length_is_an_error() {
        // Compact length 1000 on a 3-byte buffer.
        let mut r = BufReader::new(&[0xE8, 0x07, 0x00]);
        assert!(r.read_compact_len().is_err());
    }
}
