//! Compares the hand written encoder with the reference `bcs` crate on
//! mirror types.

#[macro_use]
extern crate serde_derive;

use brownie::address::AccountAddress;
use brownie::bcs as codec;
use brownie::payload::EntryFunction;
use brownie::transaction::RawTransaction;
use brownie::types::{TypeTag, TypedValue};
use brownie::PrivateKey;

#[derive(Serialize)]
struct ModuleIdMirror {
    address: [u8; 32],
    name: String,
}

#[derive(Serialize)]
struct StructTagMirror {
    address: [u8; 32],
    module: String,
    name: String,
    type_args: Vec<TypeTagMirror>,
}

#[derive(Serialize)]
#[allow(dead_code)]
enum TypeTagMirror {
    Bool,
    U8,
    U64,
    U128,
    Address,
    Signer,
    Vector(Box<TypeTagMirror>),
    Struct(Box<StructTagMirror>),
}

#[derive(Serialize)]
struct EntryFunctionMirror {
    module: ModuleIdMirror,
    function: String,
    ty_args: Vec<TypeTagMirror>,
    args: Vec<Vec<u8>>,
}

#[derive(Serialize)]
#[allow(dead_code)]
enum PayloadMirror {
    Script(()),
    ModuleBundle(()),
    EntryFunction(EntryFunctionMirror),
}

#[derive(Serialize)]
struct RawTransactionMirror {
    sender: [u8; 32],
    sequence_number: u64,
    payload: PayloadMirror,
    max_gas_amount: u64,
    gas_unit_price: u64,
    expiration_timestamp_secs: u64,
    chain_id: u8,
}

#[derive(Serialize)]
enum AuthenticatorMirror {
    Ed25519 {
        public_key: Vec<u8>,
        signature: Vec<u8>,
    },
}

#[derive(Serialize)]
struct SignedTransactionMirror {
    raw: RawTransactionMirror,
    authenticator: AuthenticatorMirror,
}

fn coin_type() -> TypeTagMirror {
    TypeTagMirror::Struct(Box::new(StructTagMirror {
        address: AccountAddress::ONE.to_bytes(),
        module: "aptos_coin".to_owned(),
        name: "AptosCoin".to_owned(),
        type_args: vec![],
    }))
}

fn entry_function_pair() -> (EntryFunction, EntryFunctionMirror) {
    let memo: Vec<TypedValue> = (0..200u8).map(TypedValue::U8).collect();
    let memo = TypedValue::Vector(
        brownie::types::VectorValue::new(brownie::types::ScalarKind::U8, memo).unwrap(),
    );
    let args = [
        TypedValue::Address(AccountAddress::ONE),
        TypedValue::U64(1_000),
        memo,
    ];
    let ours = EntryFunction::natural(
        "0x1::coin",
        "transfer",
        vec!["0x1::aptos_coin::AptosCoin".parse().unwrap()],
        &args,
    )
    .unwrap();

    let mut memo_bytes = vec![];
    let mut serialized_memo = (0..200u8).collect::<Vec<u8>>();
    // uleb128(200) = [0xc8, 0x01]
    memo_bytes.extend_from_slice(&[0xc8, 0x01]);
    memo_bytes.append(&mut serialized_memo);
    let mirror = EntryFunctionMirror {
        module: ModuleIdMirror {
            address: AccountAddress::ONE.to_bytes(),
            name: "coin".to_owned(),
        },
        function: "transfer".to_owned(),
        ty_args: vec![coin_type()],
        args: vec![
            bcs::to_bytes(&AccountAddress::ONE.to_bytes()).unwrap(),
            bcs::to_bytes(&1_000u64).unwrap(),
            memo_bytes,
        ],
    };
    (ours, mirror)
}

#[test]
fn primitives_match() {
    assert_eq!(
        TypedValue::U128(u128::MAX - 7).to_bytes(),
        bcs::to_bytes(&(u128::MAX - 7)).unwrap()
    );
    assert_eq!(
        TypedValue::Bool(true).to_bytes(),
        bcs::to_bytes(&true).unwrap()
    );
    let long = "x".repeat(20_000);
    assert_eq!(codec::to_bytes(&long), bcs::to_bytes(&long).unwrap());
}

#[test]
fn type_tags_match() {
    let ours: TypeTag = "vector<0x1::coin::Coin<0x1::aptos_coin::AptosCoin>>"
        .parse()
        .unwrap();
    let mirror = TypeTagMirror::Vector(Box::new(TypeTagMirror::Struct(Box::new(
        StructTagMirror {
            address: AccountAddress::ONE.to_bytes(),
            module: "coin".to_owned(),
            name: "Coin".to_owned(),
            type_args: vec![coin_type()],
        },
    ))));
    assert_eq!(codec::to_bytes(&ours), bcs::to_bytes(&mirror).unwrap());

    let signer: TypeTag = "signer".parse().unwrap();
    assert_eq!(
        codec::to_bytes(&signer),
        bcs::to_bytes(&TypeTagMirror::Signer).unwrap()
    );
}

#[test]
fn entry_function_matches() {
    let (ours, mirror) = entry_function_pair();
    assert_eq!(codec::to_bytes(&ours), bcs::to_bytes(&mirror).unwrap());
}

#[test]
fn signed_transaction_matches() {
    let key = PrivateKey::from_bytes([11u8; 32]);
    let (payload, payload_mirror) = entry_function_pair();
    let raw = RawTransaction {
        sender: key.to_address(),
        sequence_number: 3,
        payload: payload.into(),
        max_gas_amount: 500_000,
        gas_unit_price: 100,
        expiration_timestamp_secs: 1_700_000_600,
        chain_id: 2,
    };
    let signed = raw.sign(&key);
    let brownie::transaction::Authenticator::Ed25519 {
        public_key,
        signature,
    } = &signed.authenticator;

    let mirror = SignedTransactionMirror {
        raw: RawTransactionMirror {
            sender: key.to_address().to_bytes(),
            sequence_number: 3,
            payload: PayloadMirror::EntryFunction(payload_mirror),
            max_gas_amount: 500_000,
            gas_unit_price: 100,
            expiration_timestamp_secs: 1_700_000_600,
            chain_id: 2,
        },
        authenticator: AuthenticatorMirror::Ed25519 {
            public_key: public_key.as_bytes().to_vec(),
            signature: signature.as_bytes().to_vec(),
        },
    };
    assert_eq!(signed.to_bytes(), bcs::to_bytes(&mirror).unwrap());
}
