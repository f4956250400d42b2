use crate::address::AccountAddress;
use crate::error::Error;
use crate::signature::{PublicKey, Signature};
use crate::utils::{bytes_to_hex_str, hex_str_to_bytes};
use ed25519_dalek::{Signer, SigningKey};
use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;
use std::fmt::{self, Debug, Display};
use std::str::FromStr;

/// Representation of an account's ed25519 private key.
///
/// Private key can be created using a textual representation,
/// a raw binary form using array of bytes. Any 32 bytes are a valid key.
///
/// The public key and the account address it controls are derived once
/// when the key is created.
#[derive(PartialEq, Eq, Copy, Clone, Hash)]
pub struct PrivateKey {
    key: [u8; 32],
    public_key: PublicKey,
    address: AccountAddress,
}

impl FromStr for PrivateKey {
    type Err = Error;

    /// Parse a textual representation of a private key back into PrivateKey type.
    ///
    /// It has to be a string that represents 64 characters that are hexadecimal
    /// representation of 32 bytes. Optionally this string can be prefixed with `0x`
    /// at the start.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let digits = s.strip_prefix("0x").unwrap_or(s);
        if digits.len() != 64 {
            return Err(Error::InvalidPrivKeyLength {
                got: digits.len(),
                expected: 64,
            });
        }
        let bytes = hex_str_to_bytes(digits)?;
        let mut res = [0u8; 32];
        res.copy_from_slice(&bytes);
        Ok(PrivateKey::from_bytes(res))
    }
}

impl From<[u8; 32]> for PrivateKey {
    fn from(val: [u8; 32]) -> PrivateKey {
        PrivateKey::from_bytes(val)
    }
}

impl TryFrom<&[u8]> for PrivateKey {
    type Error = Error;

    fn try_from(val: &[u8]) -> Result<PrivateKey, Error> {
        if val.len() != 32 {
            return Err(Error::InvalidPrivKeyLength {
                got: val.len(),
                expected: 32,
            });
        }
        let mut res = [0u8; 32];
        res.copy_from_slice(val);
        Ok(PrivateKey::from_bytes(res))
    }
}

impl PrivateKey {
    /// Creates a key from its 32 byte seed.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use brownie::PrivateKey;
    /// let private_key = PrivateKey::from_bytes([1u8; 32]);
    /// let address = private_key.to_address();
    /// ```
    pub fn from_bytes(bytes: [u8; 32]) -> PrivateKey {
        let public_key = PublicKey::from(SigningKey::from_bytes(&bytes).verifying_key().to_bytes());
        PrivateKey {
            key: bytes,
            public_key,
            address: public_key.to_address(),
        }
    }

    /// Get bytes back from a PrivateKey
    pub fn to_bytes(self) -> [u8; 32] {
        self.key
    }

    pub fn public_key(&self) -> PublicKey {
        self.public_key
    }

    /// The account this key controls.
    pub fn to_address(&self) -> AccountAddress {
        self.address
    }

    /// Signs an arbitrary message, ed25519 hashes internally so no digest is
    /// taken here.
    pub fn sign(&self, message: &[u8]) -> Signature {
        let signing_key = SigningKey::from_bytes(&self.key);
        Signature::from(signing_key.sign(message).to_bytes())
    }
}

impl Display for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "0x{}", bytes_to_hex_str(&self.key))
    }
}

impl Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "PrivateKey({})", self.address.short_string())
    }
}

impl fmt::LowerHex for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if f.alternate() {
            write!(f, "0x")?;
        }
        write!(f, "{}", bytes_to_hex_str(&self.key))
    }
}

impl Serialize for PrivateKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for PrivateKey {
    fn deserialize<D>(deserializer: D) -> Result<PrivateKey, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[test]
#[should_panic]
fn too_short() {
    PrivateKey::from_str("abcdef").unwrap();
}

#[test]
#[should_panic]
fn invalid_data() {
    let key = "\u{012345}c85ef7d79691fe79573b1a7064c19c1a9819ebdbd1faaab1a8ec92344438";
    assert_eq!(key.len(), 64);
    PrivateKey::from_str(key).unwrap();
}

#[test]
fn rfc8032_test_vector() {
    // RFC 8032 section 7.1, TEST 1
    let key: PrivateKey = "9d61b19deffd5a60ba844af492ec2cc44449c5697b326919703bac031cae7f60"
        .parse()
        .unwrap();
    assert_eq!(
        key.public_key().to_string(),
        "0xd75a980182b10ab7d54bfed3c964073a0ee172f3daa62325af021a68f707511a"
    );
    assert_eq!(
        key.sign(b"").to_string(),
        "0xe5564300c360ac729086e2cc806e828a84877f1eb8e5d974d873e065224901555fb8821590a33bacc61e39701cf9b46bd25bf5f0595bbe24655141438e7a100b"
    );
}

#[test]
fn address_is_derived_from_public_key() {
    let key = PrivateKey::from_bytes([9u8; 32]);
    assert_eq!(key.to_address(), key.public_key().to_address());
    let other = PrivateKey::from_bytes([10u8; 32]);
    assert_ne!(key.to_address(), other.to_address());
}

#[test]
fn sign_and_verify() {
    let key = PrivateKey::from_bytes([3u8; 32]);
    let signature = key.sign(b"Hello, world!");
    assert!(signature.verify(b"Hello, world!", &key.public_key()).is_ok());
    assert!(signature.verify(b"Hello, world?", &key.public_key()).is_err());
    let other = PrivateKey::from_bytes([4u8; 32]);
    assert!(signature
        .verify(b"Hello, world!", &other.public_key())
        .is_err());
}

#[test]
fn from_string_with_prefix() {
    let a: PrivateKey = "0x0102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f20"
        .parse()
        .unwrap();
    let b: PrivateKey = "0102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f20"
        .parse()
        .unwrap();
    assert_eq!(a, b);
    assert_eq!(
        a.to_string(),
        "0x0102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f20"
    );
}

#[test]
fn serialize_to_json() {
    let key = PrivateKey::from_bytes([5u8; 32]);
    let json = serde_json::to_string(&key).unwrap();
    let back: PrivateKey = serde_json::from_str(&json).unwrap();
    assert_eq!(key, back);
}
