//! Minimal protobuf cursor used by the tile decoders.
//!
//! A `PbfReader` never owns data: it walks an immutable slice and every
//! length-delimited field is handed out as a sub-slice of the same buffer.
//! Decoders that need to come back to a field later store its byte offset and
//! open a fresh reader with [`PbfReader::at`].

use varint_rs::VarintReader;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireType {
    Varint,
    Fixed64,
    Bytes,
    Fixed32,
}

impl WireType {
    fn from_id(id: u64) -> Result<Self> {
        match id {
            0 => Ok(WireType::Varint),
            1 => Ok(WireType::Fixed64),
            2 => Ok(WireType::Bytes),
            5 => Ok(WireType::Fixed32),
            other => Err(Error::format(format!("unsupported wire type {other}"))),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PbfReader<'a> {
    buf: &'a [u8],
    rest: &'a [u8],
}

impl<'a> PbfReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, rest: buf }
    }

    /// Opens a reader positioned at `offset` within `buf`.
    pub fn at(buf: &'a [u8], offset: usize) -> Result<Self> {
        let rest = buf.get(offset..).ok_or_else(|| {
            Error::format(format!(
                "offset {offset} is outside a buffer of {} bytes",
                buf.len()
            ))
        })?;
        Ok(Self { buf, rest })
    }

    pub fn position(&self) -> usize {
        self.buf.len() - self.rest.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rest.is_empty()
    }

    pub fn read_tag(&mut self) -> Result<(u32, WireType)> {
        let key = self.read_varint()?;
        let field = u32::try_from(key >> 3)
            .map_err(|_| Error::format(format!("field number {} too large", key >> 3)))?;
        Ok((field, WireType::from_id(key & 0x7)?))
    }

    pub fn read_varint(&mut self) -> Result<u64> {
        Ok(self.rest.read_u64_varint()?)
    }

    /// Protobuf `uint32`; wider encodings keep their low 32 bits.
    pub fn read_uint32(&mut self) -> Result<u32> {
        Ok(self.read_varint()? as u32)
    }

    pub fn read_int64(&mut self) -> Result<i64> {
        Ok(self.read_varint()? as i64)
    }

    pub fn read_sint64(&mut self) -> Result<i64> {
        let raw = self.read_varint()?;
        Ok(((raw >> 1) as i64) ^ -((raw & 1) as i64))
    }

    pub fn read_sint32(&mut self) -> Result<i32> {
        let raw = self.read_uint32()?;
        Ok(((raw >> 1) as i32) ^ -((raw & 1) as i32))
    }

    pub fn read_bool(&mut self) -> Result<bool> {
        Ok(self.read_varint()? != 0)
    }

    pub fn read_float(&mut self) -> Result<f32> {
        let bytes = self.take(4)?;
        let mut raw = [0u8; 4];
        raw.copy_from_slice(bytes);
        Ok(f32::from_le_bytes(raw))
    }

    pub fn read_double(&mut self) -> Result<f64> {
        let bytes = self.take(8)?;
        let mut raw = [0u8; 8];
        raw.copy_from_slice(bytes);
        Ok(f64::from_le_bytes(raw))
    }

    /// Reads a length prefix and returns the delimited bytes.
    pub fn read_bytes(&mut self) -> Result<&'a [u8]> {
        let len = self.read_varint()?;
        let len = usize::try_from(len)
            .map_err(|_| Error::format(format!("length {len} does not fit in memory")))?;
        self.take(len)
    }

    pub fn read_string(&mut self) -> Result<&'a str> {
        let bytes = self.read_bytes()?;
        std::str::from_utf8(bytes).map_err(|err| Error::format(format!("invalid utf-8: {err}")))
    }

    pub fn skip(&mut self, wire: WireType) -> Result<()> {
        match wire {
            WireType::Varint => {
                self.read_varint()?;
            }
            WireType::Fixed64 => {
                self.take(8)?;
            }
            WireType::Bytes => {
                self.read_bytes()?;
            }
            WireType::Fixed32 => {
                self.take(4)?;
            }
        }
        Ok(())
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        if len > self.rest.len() {
            return Err(Error::format(format!(
                "length {len} at offset {} overruns buffer of {} bytes",
                self.position(),
                self.buf.len()
            )));
        }
        let (head, tail) = self.rest.split_at(len);
        self.rest = tail;
        Ok(head)
    }
}
