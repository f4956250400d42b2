//! # Introduction
//! Brownie is the typed core of a Move package deployment helper written in
//! pure Rust. It reads the entry function ABIs the Move compiler emits,
//! checks and converts caller arguments against them, and builds signed
//! transactions ready to be submitted to a node.
//!
//! ## Features
//! * BCS encoding and decoding (see the `bcs` module)
//! * ABI descriptor decoding and a registry keyed by `module::function`
//! * Argument binding from loosely typed input to typed Move values
//! * Ed25519 keys, transaction signing and verification
//!
//! ## Getting started
//! ```rust
//! use brownie::abi::{ArgumentDescriptor, FunctionDescriptor};
//! use brownie::binder::{bind, CallArgs};
//! use brownie::payload::assemble;
//! use brownie::transaction::RawTransaction;
//! use brownie::types::TypeTag;
//! use brownie::PrivateKey;
//!
//! // Normally read from build/<package>/abis/aptos_account/transfer.abi
//! let transfer = FunctionDescriptor {
//!     name: "transfer".to_owned(),
//!     module: "0x1::aptos_account".parse().unwrap(),
//!     doc: String::new(),
//!     ty_args: vec![],
//!     args: vec![
//!         ArgumentDescriptor::new("to", TypeTag::Address).unwrap(),
//!         ArgumentDescriptor::new("amount", TypeTag::U64).unwrap(),
//!     ],
//! };
//!
//! let call = bind(
//!     &transfer,
//!     &[],
//!     &CallArgs::named([("to", "0x1"), ("amount", "100")]),
//! )
//! .unwrap();
//! let payload = assemble(&transfer, &call);
//! assert_eq!(payload.function_id(), "0x1::aptos_account::transfer");
//!
//! let key = PrivateKey::from_bytes([1u8; 32]);
//! let signed = RawTransaction::new(key.to_address(), 0, payload.into(), 4).sign(&key);
//! assert!(signed.verify().is_ok());
//! // signed.to_bytes() is the body of a BCS submission
//! ```

#![warn(clippy::all)]
#![allow(clippy::pedantic)]

#[macro_use]
extern crate log;

pub mod abi;
pub mod address;
pub mod bcs;
pub mod binder;
pub mod constants;
pub mod error;
pub mod payload;
pub mod private_key;
pub mod signature;
pub mod transaction;
pub mod types;
pub mod utils;

pub use abi::{DescriptorRegistry, FunctionDescriptor};
pub use address::AccountAddress;
pub use binder::{bind, BoundCall, CallArgs, RawArg};
pub use error::Error;
pub use num256::Uint256;
pub use payload::EntryFunction;
pub use private_key::PrivateKey;
pub use signature::{PublicKey, Signature};
pub use transaction::{RawTransaction, SignedTransaction};
pub use types::{StructTag, TypeTag, TypedValue};
