//! Network and tooling side of brownie.
//!
//! A REST client for an Aptos style node, a faucet client, project
//! configuration, a thin wrapper around the `aptos` command line for
//! compiling and publishing Move packages, and [`package::Package`] which
//! ties them together so that an entry function of a compiled package can be
//! called by its `module::function` key.

#![warn(clippy::all)]
#![allow(clippy::pedantic)]

#[macro_use]
extern crate serde_derive;
#[macro_use]
extern crate log;

pub mod artifacts;
pub mod client;
pub mod compiler;
pub mod config;
pub mod error;
pub mod faucet;
mod mem;
pub mod package;
pub mod types;

pub use client::{wait_for_transaction, Node, RestClient};
pub use error::NodeError;
pub use faucet::FaucetClient;
pub use package::{Execution, Package};
