use crate::address::AccountAddress;
use crate::bcs::{self, Decode, DecodeError, Deserializer, Encode, Serializer};
use crate::constants::{
    DEFAULT_EXPIRATION_SECS, DEFAULT_GAS_UNIT_PRICE, DEFAULT_MAX_GAS_AMOUNT, RAW_TRANSACTION_SALT,
    TRANSACTION_SALT,
};
use crate::error::Error;
use crate::payload::EntryFunction;
use crate::private_key::PrivateKey;
use crate::signature::{PublicKey, Signature};
use crate::utils::{bytes_to_hex_str, sha3_256};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// Variant index of an entry function call, scripts and module bundles
/// take the lower indices and are never built here.
const PAYLOAD_ENTRY_FUNCTION: u64 = 2;
const AUTHENTICATOR_ED25519: u64 = 0;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransactionPayload {
    EntryFunction(EntryFunction),
}

impl Encode for TransactionPayload {
    fn encode(&self, serializer: &mut Serializer) {
        match self {
            TransactionPayload::EntryFunction(function) => {
                serializer.uleb128(PAYLOAD_ENTRY_FUNCTION);
                function.encode(serializer);
            }
        }
    }
}

impl Decode for TransactionPayload {
    fn decode(deserializer: &mut Deserializer<'_>) -> bcs::Result<Self> {
        match deserializer.uleb128()? {
            PAYLOAD_ENTRY_FUNCTION => Ok(TransactionPayload::EntryFunction(
                EntryFunction::decode(deserializer)?,
            )),
            index => Err(DecodeError::UnknownVariant {
                kind: "transaction payload",
                index,
            }),
        }
    }
}

impl From<EntryFunction> for TransactionPayload {
    fn from(function: EntryFunction) -> Self {
        TransactionPayload::EntryFunction(function)
    }
}

/// A transaction before it is signed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawTransaction {
    pub sender: AccountAddress,
    /// Must equal the sender's on chain sequence number
    pub sequence_number: u64,
    pub payload: TransactionPayload,
    pub max_gas_amount: u64,
    pub gas_unit_price: u64,
    /// The transaction is discarded if not committed by this unix time
    pub expiration_timestamp_secs: u64,
    pub chain_id: u8,
}

impl RawTransaction {
    /// A transaction with the default gas settings expiring ten minutes from
    /// now.
    pub fn new(
        sender: AccountAddress,
        sequence_number: u64,
        payload: TransactionPayload,
        chain_id: u8,
    ) -> Self {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();
        RawTransaction {
            sender,
            sequence_number,
            payload,
            max_gas_amount: DEFAULT_MAX_GAS_AMOUNT,
            gas_unit_price: DEFAULT_GAS_UNIT_PRICE,
            expiration_timestamp_secs: now + DEFAULT_EXPIRATION_SECS,
            chain_id,
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        bcs::to_bytes(self)
    }

    /// The bytes that get signed, a hashed domain separator followed by the
    /// transaction.
    pub fn signing_message(&self) -> Vec<u8> {
        let mut message = sha3_256(&[RAW_TRANSACTION_SALT.as_bytes()]).to_vec();
        message.extend_from_slice(&self.to_bytes());
        message
    }

    pub fn sign(self, key: &PrivateKey) -> SignedTransaction {
        let signature = key.sign(&self.signing_message());
        SignedTransaction {
            raw: self,
            authenticator: Authenticator::Ed25519 {
                public_key: key.public_key(),
                signature,
            },
        }
    }
}

impl Encode for RawTransaction {
    fn encode(&self, serializer: &mut Serializer) {
        self.sender.encode(serializer);
        serializer.u64(self.sequence_number);
        self.payload.encode(serializer);
        serializer.u64(self.max_gas_amount);
        serializer.u64(self.gas_unit_price);
        serializer.u64(self.expiration_timestamp_secs);
        serializer.u8(self.chain_id);
    }
}

impl Decode for RawTransaction {
    fn decode(deserializer: &mut Deserializer<'_>) -> bcs::Result<Self> {
        Ok(RawTransaction {
            sender: AccountAddress::decode(deserializer)?,
            sequence_number: deserializer.u64()?,
            payload: TransactionPayload::decode(deserializer)?,
            max_gas_amount: deserializer.u64()?,
            gas_unit_price: deserializer.u64()?,
            expiration_timestamp_secs: deserializer.u64()?,
            chain_id: deserializer.u8()?,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Authenticator {
    Ed25519 {
        public_key: PublicKey,
        signature: Signature,
    },
}

impl Encode for Authenticator {
    fn encode(&self, serializer: &mut Serializer) {
        match self {
            Authenticator::Ed25519 {
                public_key,
                signature,
            } => {
                serializer.uleb128(AUTHENTICATOR_ED25519);
                serializer.bytes(public_key.as_bytes());
                serializer.bytes(signature.as_bytes());
            }
        }
    }
}

impl Decode for Authenticator {
    fn decode(deserializer: &mut Deserializer<'_>) -> bcs::Result<Self> {
        match deserializer.uleb128()? {
            AUTHENTICATOR_ED25519 => {
                let key = deserializer.bytes()?;
                let sig = deserializer.bytes()?;
                if key.len() != PublicKey::LENGTH {
                    return Err(DecodeError::InvalidLength {
                        kind: "ed25519 public key",
                        expected: PublicKey::LENGTH,
                        got: key.len(),
                    });
                }
                if sig.len() != Signature::LENGTH {
                    return Err(DecodeError::InvalidLength {
                        kind: "ed25519 signature",
                        expected: Signature::LENGTH,
                        got: sig.len(),
                    });
                }
                let mut public_key = [0u8; PublicKey::LENGTH];
                let mut signature = [0u8; Signature::LENGTH];
                public_key.copy_from_slice(&key);
                signature.copy_from_slice(&sig);
                Ok(Authenticator::Ed25519 {
                    public_key: public_key.into(),
                    signature: signature.into(),
                })
            }
            index => Err(DecodeError::UnknownVariant {
                kind: "authenticator",
                index,
            }),
        }
    }
}

/// A transaction ready to be submitted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignedTransaction {
    pub raw: RawTransaction,
    pub authenticator: Authenticator,
}

impl SignedTransaction {
    /// Checks the signature against the raw transaction and that the key
    /// belongs to the sender.
    pub fn verify(&self) -> Result<(), Error> {
        match &self.authenticator {
            Authenticator::Ed25519 {
                public_key,
                signature,
            } => {
                if public_key.to_address() != self.raw.sender {
                    return Err(Error::InvalidSignature);
                }
                signature.verify(&self.raw.signing_message(), public_key)
            }
        }
    }

    /// The body of a BCS submission.
    pub fn to_bytes(&self) -> Vec<u8> {
        bcs::to_bytes(self)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        Ok(bcs::from_bytes(bytes)?)
    }

    /// The hash the node reports for this transaction once submitted.
    pub fn hash(&self) -> [u8; 32] {
        let prefix = sha3_256(&[TRANSACTION_SALT.as_bytes()]);
        // user transactions are variant 0 of the transaction enum
        sha3_256(&[&prefix, &[0u8], &self.to_bytes()])
    }

    pub fn hash_hex(&self) -> String {
        format!("0x{}", bytes_to_hex_str(&self.hash()))
    }
}

impl fmt::Display for SignedTransaction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "0x{}", bytes_to_hex_str(&self.to_bytes()))
    }
}

impl Encode for SignedTransaction {
    fn encode(&self, serializer: &mut Serializer) {
        self.raw.encode(serializer);
        self.authenticator.encode(serializer);
    }
}

impl Decode for SignedTransaction {
    fn decode(deserializer: &mut Deserializer<'_>) -> bcs::Result<Self> {
        Ok(SignedTransaction {
            raw: RawTransaction::decode(deserializer)?,
            authenticator: Authenticator::decode(deserializer)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TypedValue;

    fn transfer(sender: AccountAddress) -> RawTransaction {
        let payload = EntryFunction::natural(
            "0x1::aptos_account",
            "transfer",
            vec![],
            &[TypedValue::Address(AccountAddress::ONE), TypedValue::U64(1_000)],
        )
        .unwrap();
        RawTransaction {
            sender,
            sequence_number: 7,
            payload: payload.into(),
            max_gas_amount: DEFAULT_MAX_GAS_AMOUNT,
            gas_unit_price: DEFAULT_GAS_UNIT_PRICE,
            expiration_timestamp_secs: 1_700_000_000,
            chain_id: 2,
        }
    }

    #[test]
    fn raw_transaction_layout() {
        let raw = transfer(AccountAddress::ONE);
        let bytes = raw.to_bytes();
        assert_eq!(&bytes[..32], AccountAddress::ONE.as_bytes());
        assert_eq!(&bytes[32..40], &7u64.to_le_bytes());
        assert_eq!(bytes[40], PAYLOAD_ENTRY_FUNCTION as u8);
        assert_eq!(*bytes.last().unwrap(), 2);
        assert_eq!(bcs::from_bytes::<RawTransaction>(&bytes).unwrap(), raw);
    }

    #[test]
    fn signing_message_is_salted() {
        let raw = transfer(AccountAddress::ONE);
        let message = raw.signing_message();
        assert_eq!(&message[..32], &sha3_256(&[b"APTOS::RawTransaction"]));
        assert_eq!(&message[32..], raw.to_bytes().as_slice());
    }

    #[test]
    fn sign_verify_and_decode() {
        let key = PrivateKey::from_bytes([42u8; 32]);
        let signed = transfer(key.to_address()).sign(&key);
        assert!(signed.verify().is_ok());

        let bytes = signed.to_bytes();
        let decoded = SignedTransaction::from_bytes(&bytes).unwrap();
        assert_eq!(decoded, signed);
        assert_eq!(decoded.hash(), signed.hash());
        assert!(signed.hash_hex().starts_with("0x"));
        assert_eq!(signed.hash_hex().len(), 66);
    }

    #[test]
    fn tampered_transaction_fails_verification() {
        let key = PrivateKey::from_bytes([42u8; 32]);
        let mut signed = transfer(key.to_address()).sign(&key);
        signed.raw.sequence_number += 1;
        assert!(signed.verify().is_err());

        let mut wrong_sender = transfer(AccountAddress::ONE).sign(&key);
        wrong_sender.raw.sender = AccountAddress::ONE;
        assert!(wrong_sender.verify().is_err());
    }

    #[test]
    fn new_uses_defaults() {
        let raw = RawTransaction::new(
            AccountAddress::ONE,
            0,
            transfer(AccountAddress::ONE).payload,
            4,
        );
        assert_eq!(raw.max_gas_amount, 500_000);
        assert_eq!(raw.gas_unit_price, 100);
        assert!(raw.expiration_timestamp_secs > DEFAULT_EXPIRATION_SECS);
    }
}
