use crate::bcs::error::{DecodeError, Result};
use crate::bcs::Decode;

/// Longest sequence or string a BCS stream may declare.
pub const MAX_SEQUENCE_LENGTH: u64 = (1 << 31) - 1;

pub struct Deserializer<'de> {
    input: &'de [u8],
}

/// Decodes exactly one value from `input`, leftover bytes are an error.
pub fn from_bytes<T>(input: &[u8]) -> Result<T>
where
    T: Decode,
{
    let mut deserializer = Deserializer::new(input);
    let t = T::decode(&mut deserializer)?;
    deserializer.end()?;
    Ok(t)
}

impl<'de> Deserializer<'de> {
    pub fn new(input: &'de [u8]) -> Self {
        Deserializer { input }
    }

    pub fn remaining(&self) -> usize {
        self.input.len()
    }

    /// Fails unless every byte of the input was consumed.
    pub fn end(&self) -> Result<()> {
        if self.input.is_empty() {
            Ok(())
        } else {
            Err(DecodeError::TrailingBytes(self.input.len()))
        }
    }

    fn take(&mut self, len: usize) -> Result<&'de [u8]> {
        if len > self.input.len() {
            return Err(DecodeError::UnexpectedEof {
                needed: len,
                remaining: self.input.len(),
            });
        }
        let (head, tail) = self.input.split_at(len);
        self.input = tail;
        Ok(head)
    }

    pub fn u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    pub fn bool(&mut self) -> Result<bool> {
        match self.u8()? {
            0 => Ok(false),
            1 => Ok(true),
            b => Err(DecodeError::InvalidBool(b)),
        }
    }

    pub fn u64(&mut self) -> Result<u64> {
        let mut buf = [0u8; 8];
        buf.copy_from_slice(self.take(8)?);
        Ok(u64::from_le_bytes(buf))
    }

    pub fn u128(&mut self) -> Result<u128> {
        let mut buf = [0u8; 16];
        buf.copy_from_slice(self.take(16)?);
        Ok(u128::from_le_bytes(buf))
    }

    pub fn uleb128(&mut self) -> Result<u64> {
        let mut value: u64 = 0;
        for shift in (0..64).step_by(7) {
            let byte = self.u8()?;
            let digit = (byte & 0x7f) as u64;
            // the tenth byte may only carry the single remaining bit
            if shift == 63 && digit > 1 {
                return Err(DecodeError::UlebOverflow);
            }
            value |= digit << shift;
            if byte & 0x80 == 0 {
                // a zero final group after the first means padding was used
                if shift > 0 && digit == 0 {
                    return Err(DecodeError::NonCanonicalUleb);
                }
                return Ok(value);
            }
        }
        Err(DecodeError::UlebOverflow)
    }

    /// Reads a sequence or string length prefix.
    pub fn length_prefix(&mut self) -> Result<usize> {
        let len = self.uleb128()?;
        if len > MAX_SEQUENCE_LENGTH {
            return Err(DecodeError::LengthTooLarge(len));
        }
        Ok(len as usize)
    }

    pub fn fixed_bytes(&mut self, len: usize) -> Result<&'de [u8]> {
        self.take(len)
    }

    pub fn bytes(&mut self) -> Result<Vec<u8>> {
        let len = self.length_prefix()?;
        Ok(self.take(len)?.to_vec())
    }

    pub fn str(&mut self) -> Result<String> {
        let len = self.length_prefix()?;
        let raw = self.take(len)?;
        std::str::from_utf8(raw)
            .map(str::to_owned)
            .map_err(|_| DecodeError::InvalidUtf8)
    }

    /// Reads a length prefix and then exactly that many elements.
    pub fn sequence<T, F>(&mut self, mut element: F) -> Result<Vec<T>>
    where
        F: FnMut(&mut Self) -> Result<T>,
    {
        let len = self.length_prefix()?;
        // every element takes at least one byte, never trust the prefix beyond that
        let mut out = Vec::with_capacity(len.min(self.input.len()));
        for _ in 0..len {
            out.push(element(self)?);
        }
        Ok(out)
    }
}

////////////////////////////////////////////////////////////////////////////////

#[test]
fn decode_uleb128() {
    assert_eq!(Deserializer::new(&[0x00]).uleb128(), Ok(0));
    assert_eq!(Deserializer::new(&[0x80, 0x01]).uleb128(), Ok(128));
    assert_eq!(
        Deserializer::new(&[0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x01]).uleb128(),
        Ok(u64::MAX)
    );
}

#[test]
fn reject_bad_uleb128() {
    assert_eq!(
        Deserializer::new(&[0x80, 0x00]).uleb128(),
        Err(DecodeError::NonCanonicalUleb)
    );
    assert_eq!(
        Deserializer::new(&[0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x02]).uleb128(),
        Err(DecodeError::UlebOverflow)
    );
    assert_eq!(
        Deserializer::new(&[0x80]).uleb128(),
        Err(DecodeError::UnexpectedEof {
            needed: 1,
            remaining: 0
        })
    );
}

#[test]
fn reject_truncated_string() {
    let mut de = Deserializer::new(&[0x03, b'a', b'b']);
    assert_eq!(
        de.str(),
        Err(DecodeError::UnexpectedEof {
            needed: 3,
            remaining: 2
        })
    );
}

#[test]
fn reject_invalid_utf8() {
    let mut de = Deserializer::new(&[0x02, 0xc3, 0x28]);
    assert_eq!(de.str(), Err(DecodeError::InvalidUtf8));
}

#[test]
fn reject_invalid_bool() {
    assert_eq!(
        Deserializer::new(&[2]).bool(),
        Err(DecodeError::InvalidBool(2))
    );
}

#[test]
fn huge_sequence_prefix_does_not_allocate() {
    let mut de = Deserializer::new(&[0xff, 0xff, 0xff, 0xff, 0x07, 0x01]);
    let res = de.sequence(|de| de.u8());
    assert_eq!(
        res,
        Err(DecodeError::UnexpectedEof {
            needed: 1,
            remaining: 0
        })
    );
}
