use crate::bcs::{self, Decode, Deserializer, Encode, Serializer};
use crate::error::Error;
use crate::utils::{bytes_to_hex_str, hex_str_to_bytes, sha3_256, zpad};
use serde::Deserialize;
use serde::Deserializer as SerdeDeserializer;
use serde::Serialize;
use serde::Serializer as SerdeSerializer;
use std::fmt;
use std::str::FromStr;

/// Scheme byte appended to an ed25519 public key to derive its authentication key
const ED25519_SCHEME: u8 = 0x00;
/// Scheme byte appended when deriving a resource account address
const DERIVE_RESOURCE_ACCOUNT_SCHEME: u8 = 0xFF;

/// Representation of a Move account address.
///
/// Address is usually derived from a `PrivateKey`, or converted from its
/// textual representation.
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Default)]
pub struct AccountAddress([u8; 32]);

impl AccountAddress {
    pub const LENGTH: usize = 32;

    pub const ZERO: AccountAddress = AccountAddress([0u8; AccountAddress::LENGTH]);

    /// The address the Move and Aptos frameworks are published at.
    pub const ONE: AccountAddress = {
        let mut bytes = [0u8; AccountAddress::LENGTH];
        bytes[AccountAddress::LENGTH - 1] = 1;
        AccountAddress(bytes)
    };

    pub const fn new(bytes: [u8; AccountAddress::LENGTH]) -> AccountAddress {
        AccountAddress(bytes)
    }

    /// Get raw bytes of the address.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn to_bytes(self) -> [u8; AccountAddress::LENGTH] {
        self.0
    }

    /// The account controlled by a single ed25519 key, the address is the
    /// key's authentication key.
    pub fn from_public_key(public_key: &[u8; 32]) -> AccountAddress {
        AccountAddress(sha3_256(&[public_key, &[ED25519_SCHEME]]))
    }

    /// Address without leading zeros, `0x1` rather than `0x000..001`.
    pub fn short_string(&self) -> String {
        let hex = bytes_to_hex_str(&self.0);
        let trimmed = hex.trim_start_matches('0');
        if trimmed.is_empty() {
            "0x0".to_owned()
        } else {
            format!("0x{trimmed}")
        }
    }
}

/// Derives the address of a resource account created by `source` with `seed`.
///
/// ```rust
/// use brownie::address::{create_resource_address, AccountAddress};
/// let source: AccountAddress = "0x1".parse().unwrap();
/// let resource = create_resource_address(&source, b"seed");
/// assert_ne!(resource, source);
/// ```
pub fn create_resource_address(source: &AccountAddress, seed: &[u8]) -> AccountAddress {
    AccountAddress(sha3_256(&[
        &bcs::to_bytes(source),
        seed,
        &[DERIVE_RESOURCE_ACCOUNT_SCHEME],
    ]))
}

impl From<[u8; AccountAddress::LENGTH]> for AccountAddress {
    fn from(val: [u8; AccountAddress::LENGTH]) -> AccountAddress {
        AccountAddress(val)
    }
}

impl TryFrom<&[u8]> for AccountAddress {
    type Error = Error;

    fn try_from(val: &[u8]) -> Result<AccountAddress, Error> {
        if val.len() != AccountAddress::LENGTH {
            return Err(Error::InvalidAddressLength {
                got: val.len(),
                expected: AccountAddress::LENGTH,
            });
        }
        let mut data = [0u8; AccountAddress::LENGTH];
        data.copy_from_slice(val);
        Ok(AccountAddress(data))
    }
}

impl FromStr for AccountAddress {
    type Err = Error;

    /// Parses a string into a valid account address.
    ///
    /// # Supported formats
    ///
    /// * `0x` prefixed address
    /// * Raw bytes of an address represented as hexadecimal.
    ///
    /// Short forms are padded with zeros on the left, so `0x1` is the
    /// framework address.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use std::str::FromStr;
    /// use brownie::AccountAddress;
    /// // Method 1
    /// AccountAddress::from_str("0x1").unwrap();
    /// // Method 1 (without 0x prefix)
    /// AccountAddress::from_str("a550c18").unwrap();
    /// // Method 2
    /// let _address : AccountAddress = "0x000000000000000000000000000000000000000000000000000000000a550c18".parse().unwrap();
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        if digits.is_empty() || digits.len() > AccountAddress::LENGTH * 2 {
            return Err(Error::InvalidAddressLength {
                got: digits.len(),
                expected: AccountAddress::LENGTH * 2,
            });
        }
        let bytes = zpad(&hex_str_to_bytes(digits)?, AccountAddress::LENGTH);
        AccountAddress::try_from(bytes.as_slice())
    }
}

impl fmt::Display for AccountAddress {
    /// Long form, `0x` followed by 64 hex digits.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "0x{}", bytes_to_hex_str(&self.0))
    }
}

impl fmt::Debug for AccountAddress {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "AccountAddress({})", self.short_string())
    }
}

impl fmt::LowerHex for AccountAddress {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if f.alternate() {
            write!(f, "0x")?;
        }
        write!(f, "{}", bytes_to_hex_str(&self.0))
    }
}

impl fmt::UpperHex for AccountAddress {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if f.alternate() {
            write!(f, "0x")?;
        }
        write!(f, "{}", bytes_to_hex_str(&self.0).to_uppercase())
    }
}

impl Encode for AccountAddress {
    fn encode(&self, serializer: &mut Serializer) {
        serializer.fixed_bytes(&self.0)
    }
}

impl Decode for AccountAddress {
    fn decode(deserializer: &mut Deserializer<'_>) -> bcs::Result<Self> {
        let mut data = [0u8; AccountAddress::LENGTH];
        data.copy_from_slice(deserializer.fixed_bytes(AccountAddress::LENGTH)?);
        Ok(AccountAddress(data))
    }
}

impl Serialize for AccountAddress {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: SerdeSerializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for AccountAddress {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: SerdeDeserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[test]
#[should_panic]
fn decode_invalid_length() {
    "0x".parse::<AccountAddress>().unwrap();
}

#[test]
fn decode_too_long() {
    let long = "1".repeat(65);
    match long.parse::<AccountAddress>().unwrap_err() {
        Error::InvalidAddressLength { got, expected } => {
            assert_eq!(got, 65);
            assert_eq!(expected, 64);
        }
        e => panic!("unexpected error {e}"),
    }
}

#[test]
#[should_panic]
fn decode_invalid_character() {
    "\u{012345}123456789012345678901234567890123456"
        .parse::<AccountAddress>()
        .unwrap();
}

#[test]
fn decode_short_form() {
    let address: AccountAddress = "0x1".parse().unwrap();
    assert_eq!(address, AccountAddress::ONE);
    let address: AccountAddress = "a550c18".parse().unwrap();
    let mut expected = [0u8; 32];
    expected[28..].copy_from_slice(&[0x0a, 0x55, 0x0c, 0x18]);
    assert_eq!(address, AccountAddress::from(expected));
}

#[test]
fn decode_boundaries() {
    let zero: AccountAddress = "0x0".parse().unwrap();
    assert_eq!(zero, AccountAddress::ZERO);
    let ff: AccountAddress = format!("0x{}", "f".repeat(64)).parse().unwrap();
    assert_eq!(ff, AccountAddress::from([0xffu8; 32]));
}

#[test]
fn display_long_and_short() {
    assert_eq!(
        AccountAddress::ONE.to_string(),
        "0x0000000000000000000000000000000000000000000000000000000000000001"
    );
    assert_eq!(AccountAddress::ONE.short_string(), "0x1");
    assert_eq!(AccountAddress::ZERO.short_string(), "0x0");
}

#[test]
fn to_hex() {
    let address: AccountAddress = "0xABCDEF".parse().unwrap();
    assert_eq!(format!("{:x}", address), format!("{}abcdef", "0".repeat(58)));
    assert_eq!(format!("{:#X}", address), format!("0x{}ABCDEF", "0".repeat(58)));
}

#[test]
fn ordered_and_hashed() {
    use std::collections::HashMap;
    let a: AccountAddress = "0xa".parse().unwrap();
    let b: AccountAddress = "0xb".parse().unwrap();
    assert!(b > a);
    let mut map = HashMap::new();
    map.insert(a, "Foo");
    map.insert(b, "Bar");
    assert_eq!(map.get(&a).unwrap(), &"Foo");
    assert_eq!(map.get(&b).unwrap(), &"Bar");
}

#[test]
fn bcs_is_fixed_width() {
    let bytes = bcs::to_bytes(&AccountAddress::ONE);
    assert_eq!(bytes.len(), 32);
    assert_eq!(bcs::from_bytes::<AccountAddress>(&bytes).unwrap(), AccountAddress::ONE);
}

#[test]
fn serde_uses_long_hex() {
    let json = serde_json::to_string(&AccountAddress::ONE).unwrap();
    assert_eq!(json, format!("\"0x{}1\"", "0".repeat(63)));
    let back: AccountAddress = serde_json::from_str("\"0x1\"").unwrap();
    assert_eq!(back, AccountAddress::ONE);
}

#[test]
fn resource_address_is_deterministic() {
    let source: AccountAddress = "0xcafe".parse().unwrap();
    let a = create_resource_address(&source, b"pool");
    let b = create_resource_address(&source, b"pool");
    let c = create_resource_address(&source, b"other");
    assert_eq!(a, b);
    assert_ne!(a, c);
    let expected = sha3_256(&[source.as_bytes(), b"pool", &[0xff]]);
    assert_eq!(a.to_bytes(), expected);
}
