//! Binary Canonical Serialization, the wire format of Move values,
//! transactions and the ABI files written by the compiler.
//!
//! * `bool` and `u8` are one byte, `u64` and `u128` fixed width little endian
//! * sequences, strings and byte strings carry a ULEB128 length prefix
//! * enums carry a ULEB128 variant index followed by the variant body
//! * structs are their fields back to back, fixed size arrays have no prefix
//!
//! Types opt in through [`Encode`] and [`Decode`]. Values whose layout
//! depends on an external type (such as a typed argument) expose their own
//! `encode`/`decode` taking that type instead.

pub mod de;
mod error;
pub mod ser;

pub use de::{from_bytes, Deserializer};
pub use error::{DecodeError, Result};
pub use ser::{to_bytes, Serializer};

pub trait Encode {
    fn encode(&self, serializer: &mut Serializer);
}

pub trait Decode: Sized {
    fn decode(deserializer: &mut Deserializer<'_>) -> Result<Self>;
}

impl Encode for String {
    fn encode(&self, serializer: &mut Serializer) {
        serializer.str(self)
    }
}

impl Decode for String {
    fn decode(deserializer: &mut Deserializer<'_>) -> Result<Self> {
        deserializer.str()
    }
}

impl Encode for Vec<u8> {
    fn encode(&self, serializer: &mut Serializer) {
        serializer.bytes(self)
    }
}

impl Decode for Vec<u8> {
    fn decode(deserializer: &mut Deserializer<'_>) -> Result<Self> {
        deserializer.bytes()
    }
}

#[test]
fn trailing_bytes_are_rejected() {
    let res: Result<String> = from_bytes(&[0x01, b'a', 0xff]);
    assert_eq!(res, Err(DecodeError::TrailingBytes(1)));
}

#[test]
fn nested_byte_strings() {
    let value = vec![vec![1u8, 2], vec![]];
    let mut ser = Serializer::new();
    ser.sequence(&value);
    let bytes = ser.into_bytes();
    assert_eq!(bytes, [2, 2, 1, 2, 0]);

    let mut de = Deserializer::new(&bytes);
    assert_eq!(de.sequence(Vec::<u8>::decode).unwrap(), value);
    assert!(de.end().is_ok());
}
