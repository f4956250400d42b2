use crate::address::AccountAddress;
use crate::error::Error;
use crate::utils::{bytes_to_hex_str, hex_str_to_bytes};
use ed25519_dalek::Verifier;
use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;
use std::fmt;
use std::str::FromStr;

/// Parses exactly `N` bytes of hex with an optional `0x` prefix.
fn parse_fixed_hex<const N: usize>(s: &str) -> Result<[u8; N], Error> {
    let digits = s.strip_prefix("0x").unwrap_or(s);
    if digits.len() != N * 2 {
        return Err(Error::InvalidHex(s.to_owned()));
    }
    let bytes = hex_str_to_bytes(digits)?;
    let mut out = [0u8; N];
    out.copy_from_slice(&bytes);
    Ok(out)
}

/// Implements hex `Display`, `FromStr` and string based serde for a
/// fixed size byte newtype.
macro_rules! hex_newtype {
    ($name:ident, $len:expr) => {
        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "0x{}", bytes_to_hex_str(&self.0))
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self)
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok($name(parse_fixed_hex::<$len>(s)?))
            }
        }

        impl From<[u8; $len]> for $name {
            fn from(val: [u8; $len]) -> $name {
                $name(val)
            }
        }

        impl Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: Serializer,
            {
                serializer.serialize_str(&self.to_string())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<$name, D::Error>
            where
                D: Deserializer<'de>,
            {
                let s = String::deserialize(deserializer)?;
                s.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

/// An ed25519 public key.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKey([u8; 32]);

hex_newtype!(PublicKey, 32);

impl PublicKey {
    pub const LENGTH: usize = 32;

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_address(&self) -> AccountAddress {
        AccountAddress::from_public_key(&self.0)
    }
}

/// An ed25519 signature, `R || s`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Signature([u8; 64]);

hex_newtype!(Signature, 64);

impl Signature {
    pub const LENGTH: usize = 64;

    pub fn as_bytes(&self) -> &[u8; 64] {
        &self.0
    }

    /// Checks this signature over `message` against `public_key`.
    pub fn verify(&self, message: &[u8], public_key: &PublicKey) -> Result<(), Error> {
        let key = ed25519_dalek::VerifyingKey::from_bytes(public_key.as_bytes())
            .map_err(|_| Error::InvalidPublicKey)?;
        let signature = ed25519_dalek::Signature::from_bytes(&self.0);
        key.verify(message, &signature)
            .map_err(|_| Error::InvalidSignature)
    }
}

#[test]
fn parse_and_display() {
    let hex = format!("0x{}", "ab".repeat(64));
    let sig: Signature = hex.parse().unwrap();
    assert_eq!(sig.to_string(), hex);
    assert!("0xabcd".parse::<Signature>().is_err());
    assert!(format!("0x{}", "zz".repeat(32)).parse::<PublicKey>().is_err());
}

#[test]
fn serde_as_string() {
    let key = PublicKey::from([7u8; 32]);
    let json = serde_json::to_string(&key).unwrap();
    assert_eq!(json, format!("\"0x{}\"", "07".repeat(32)));
    let back: PublicKey = serde_json::from_str(&json).unwrap();
    assert_eq!(back, key);
}
