//! JSON shapes of the node's REST API. Integers wider than 32 bits travel as
//! decimal strings.

use brownie::utils::bytes_to_hex_str;
use brownie::{PublicKey, Signature};
use serde_json::{Map, Value};

/// Returned by `GET /`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LedgerInfo {
    pub chain_id: u8,
    #[serde(default)]
    pub epoch: String,
    #[serde(default)]
    pub ledger_version: String,
    #[serde(default)]
    pub block_height: String,
    #[serde(default)]
    pub ledger_timestamp: String,
}

/// Returned by `GET /accounts/{address}`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AccountInfo {
    pub sequence_number: String,
    pub authentication_key: String,
}

impl AccountInfo {
    pub fn sequence_number(&self) -> Result<u64, std::num::ParseIntError> {
        self.sequence_number.parse()
    }
}

/// A resource stored under an account, `data` depends on the resource type.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Resource<T> {
    #[serde(rename = "type")]
    pub type_: String,
    pub data: T,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Coin {
    pub value: String,
}

/// Data of `0x1::coin::CoinStore<T>`, only the balance is kept.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CoinStore {
    pub coin: Coin,
}

/// A transaction as the node reports it, pending or committed.
///
/// Fields that are not needed to follow the transaction are kept untouched
/// in `extra`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TransactionResponse {
    #[serde(rename = "type")]
    pub type_: String,
    pub hash: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vm_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TransactionResponse {
    pub const PENDING: &'static str = "pending_transaction";

    pub fn is_pending(&self) -> bool {
        self.type_ == Self::PENDING
    }

    pub fn is_success(&self) -> bool {
        self.success == Some(true)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct JsonSignature {
    #[serde(rename = "type")]
    pub type_: String,
    pub public_key: String,
    pub signature: String,
}

impl JsonSignature {
    pub fn ed25519(public_key: &PublicKey, signature: &Signature) -> Self {
        JsonSignature {
            type_: "ed25519_signature".to_string(),
            public_key: format!("0x{}", bytes_to_hex_str(public_key.as_bytes())),
            signature: format!("0x{}", bytes_to_hex_str(signature.as_bytes())),
        }
    }
}

/// Body of `POST /transactions/encode_submission` and, once signed, of a
/// JSON `POST /transactions`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TransactionRequest {
    pub sender: String,
    pub sequence_number: String,
    pub max_gas_amount: String,
    pub gas_unit_price: String,
    pub expiration_timestamp_secs: String,
    pub payload: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<JsonSignature>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn committed_transaction() {
        let response: TransactionResponse = serde_json::from_value(json!({
            "type": "user_transaction",
            "hash": "0xabc",
            "version": "42",
            "success": true,
            "vm_status": "Executed successfully",
            "gas_used": "9"
        }))
        .unwrap();
        assert!(!response.is_pending());
        assert!(response.is_success());
        assert_eq!(response.extra["gas_used"], "9");
    }

    #[test]
    fn pending_transaction() {
        let response: TransactionResponse = serde_json::from_value(json!({
            "type": "pending_transaction",
            "hash": "0xabc",
            "sender": "0x1"
        }))
        .unwrap();
        assert!(response.is_pending());
        assert!(!response.is_success());
    }

    #[test]
    fn coin_store_balance() {
        let store: Resource<CoinStore> = serde_json::from_value(json!({
            "type": "0x1::coin::CoinStore<0x1::aptos_coin::AptosCoin>",
            "data": {
                "coin": {"value": "12345"},
                "frozen": false
            }
        }))
        .unwrap();
        assert_eq!(store.data.coin.value, "12345");
    }

    #[test]
    fn unsigned_request_omits_signature() {
        let request = TransactionRequest {
            sender: "0x1".to_string(),
            sequence_number: "0".to_string(),
            max_gas_amount: "500000".to_string(),
            gas_unit_price: "100".to_string(),
            expiration_timestamp_secs: "1".to_string(),
            payload: json!({}),
            signature: None,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert!(value.get("signature").is_none());
    }
}
