/// Gas limit used when the caller does not choose one
pub const DEFAULT_MAX_GAS_AMOUNT: u64 = 500_000;
/// Octas paid per unit of gas
pub const DEFAULT_GAS_UNIT_PRICE: u64 = 100;
/// Seconds a transaction stays valid after it was built
pub const DEFAULT_EXPIRATION_SECS: u64 = 600;

/// Domain separator hashed in front of a raw transaction before signing
pub const RAW_TRANSACTION_SALT: &str = "APTOS::RawTransaction";
/// Domain separator for transaction hashes
pub const TRANSACTION_SALT: &str = "APTOS::Transaction";

/// Smallest units per whole coin, coins have 8 decimals
pub const OCTAS_PER_COIN: u64 = 100_000_000;

pub const APTOS_COIN: &str = "0x1::aptos_coin::AptosCoin";
pub const TRANSFER_MODULE: &str = "0x1::aptos_account";
pub const TRANSFER_FUNCTION: &str = "transfer";

/// Type of the resource holding an account's coin balance.
pub fn coin_store() -> String {
    format!("0x1::coin::CoinStore<{APTOS_COIN}>")
}
