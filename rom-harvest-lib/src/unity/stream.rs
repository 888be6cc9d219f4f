//! Bounds-checked cursor over an in-memory Unity file.
//!
//! Bundle headers are always big-endian; serialized files switch to the
//! endianness recorded in their own header partway through, so the byte
//! order is mutable.

use super::UnityError;

pub(crate) struct Stream<'a> {
    data: &'a [u8],
    pos: usize,
    big_endian: bool,
}

impl<'a> Stream<'a> {
    pub(crate) fn new(data: &'a [u8], big_endian: bool) -> Self {
        Self {
            data,
            pos: 0,
            big_endian,
        }
    }

    pub(crate) fn pos(&self) -> usize {
        self.pos
    }

    pub(crate) fn set_big_endian(&mut self, big_endian: bool) {
        self.big_endian = big_endian;
    }

    pub(crate) fn seek(&mut self, pos: usize) -> Result<(), UnityError> {
        if pos > self.data.len() {
            return Err(UnityError::Truncated {
                offset: pos,
                wanted: 0,
            });
        }
        self.pos = pos;
        Ok(())
    }

    /// Advance to the next multiple of `n`, measured from the start of the
    /// underlying buffer.
    pub(crate) fn align(&mut self, n: usize) -> Result<(), UnityError> {
        self.seek(self.pos.next_multiple_of(n))
    }

    pub(crate) fn bytes(&mut self, len: usize) -> Result<&'a [u8], UnityError> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|&end| end <= self.data.len())
            .ok_or(UnityError::Truncated {
                offset: self.pos,
                wanted: len,
            })?;
        let out = &self.data[self.pos..end];
        self.pos = end;
        Ok(out)
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N], UnityError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.bytes(N)?);
        Ok(out)
    }

    pub(crate) fn u8(&mut self) -> Result<u8, UnityError> {
        Ok(self.bytes(1)?[0])
    }

    pub(crate) fn u16(&mut self) -> Result<u16, UnityError> {
        let b = self.array()?;
        Ok(if self.big_endian {
            u16::from_be_bytes(b)
        } else {
            u16::from_le_bytes(b)
        })
    }

    pub(crate) fn u32(&mut self) -> Result<u32, UnityError> {
        let b = self.array()?;
        Ok(if self.big_endian {
            u32::from_be_bytes(b)
        } else {
            u32::from_le_bytes(b)
        })
    }

    pub(crate) fn i32(&mut self) -> Result<i32, UnityError> {
        let b = self.array()?;
        Ok(if self.big_endian {
            i32::from_be_bytes(b)
        } else {
            i32::from_le_bytes(b)
        })
    }

    pub(crate) fn u64(&mut self) -> Result<u64, UnityError> {
        let b = self.array()?;
        Ok(if self.big_endian {
            u64::from_be_bytes(b)
        } else {
            u64::from_le_bytes(b)
        })
    }

    pub(crate) fn i64(&mut self) -> Result<i64, UnityError> {
        let b = self.array()?;
        Ok(if self.big_endian {
            i64::from_be_bytes(b)
        } else {
            i64::from_le_bytes(b)
        })
    }

    /// Element count stored as a signed 32-bit integer.
    pub(crate) fn count(&mut self) -> Result<usize, UnityError> {
        let n = self.i32()?;
        usize::try_from(n).map_err(|_| UnityError::BadCount(n))
    }

    /// Null-terminated string.
    pub(crate) fn cstr(&mut self) -> Result<String, UnityError> {
        let rest = &self.data[self.pos..];
        let len = rest
            .iter()
            .position(|&b| b == 0)
            .ok_or(UnityError::Truncated {
                offset: self.pos,
                wanted: rest.len() + 1,
            })?;
        let s = String::from_utf8_lossy(&rest[..len]).into_owned();
        self.pos += len + 1;
        Ok(s)
    }

    /// Length-prefixed byte array, padded to a 4-byte boundary.
    pub(crate) fn byte_array(&mut self) -> Result<&'a [u8], UnityError> {
        let len = self.count()?;
        let out = self.bytes(len)?;
        self.align(4)?;
        Ok(out)
    }

    /// Length-prefixed string, padded to a 4-byte boundary.
    pub(crate) fn aligned_string(&mut self) -> Result<String, UnityError> {
        Ok(String::from_utf8_lossy(self.byte_array()?).into_owned())
    }
}
