//! A Move package bound to a network and a signer.
//!
//! ```no_run
//! use brownie::binder::CallArgs;
//! use brownie_node::Package;
//! use std::path::Path;
//!
//! actix_rt::System::new().block_on(async {
//!     let package = Package::load(Path::new("."), "aptos-testnet", true, None).unwrap();
//!     let done = package
//!         .execute("pool::deposit", &[], CallArgs::named([("amount", "100")]))
//!         .await
//!         .unwrap();
//!     println!("{}", done.hash);
//! });
//! ```

use crate::artifacts::BuildArtifacts;
use crate::client::{wait_for_transaction_with, Node, RestClient, DEFAULT_TIMEOUT, MAX_POLLS, POLL_INTERVAL};
use crate::compiler::MoveCli;
use crate::config::Project;
use crate::error::NodeError;
use crate::faucet::FaucetClient;
use crate::types::{JsonSignature, TransactionRequest, TransactionResponse};
use brownie::abi::DescriptorRegistry;
use brownie::binder::{bind, CallArgs};
use brownie::constants::{
    DEFAULT_EXPIRATION_SECS, DEFAULT_GAS_UNIT_PRICE, DEFAULT_MAX_GAS_AMOUNT, OCTAS_PER_COIN,
    TRANSFER_FUNCTION, TRANSFER_MODULE,
};
use brownie::payload::{assemble, json_payload};
use brownie::transaction::TransactionPayload;
use brownie::types::TypedValue;
use brownie::{AccountAddress, EntryFunction, FunctionDescriptor, PrivateKey, RawTransaction};
use rand::Rng;
use serde_json::Value;
use std::path::Path;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Networks where throwaway accounts may be created and funded
pub const TEST_NETWORKS: [&str; 2] = ["aptos-devnet", "aptos-testnet"];
/// Octas requested from the faucet for a new random account
pub const RANDOM_ACCOUNT_FUNDING: u64 = 100 * OCTAS_PER_COIN;

/// A committed, successful transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct Execution {
    pub hash: String,
    pub response: TransactionResponse,
}

pub struct Package<N = RestClient> {
    project: Project,
    node: N,
    faucet: Option<FaucetClient>,
    cli: MoveCli,
    artifacts: BuildArtifacts,
    max_polls: u32,
    poll_interval: Duration,
}

impl Package<RestClient> {
    /// Reads the project at `project_dir` for `network` and, when `compile`
    /// is set, builds the package found in `package_dir` (defaults to the
    /// project directory).
    pub fn load(
        project_dir: &Path,
        network: &str,
        compile: bool,
        package_dir: Option<&Path>,
    ) -> Result<Self, NodeError> {
        let project = Project::load(project_dir, network, package_dir)?;
        let node = RestClient::new(&project.network.node_url, DEFAULT_TIMEOUT);
        let faucet = project
            .network
            .faucet_url
            .as_deref()
            .map(|url| FaucetClient::new(url, DEFAULT_TIMEOUT));
        let mut package = Package::new(project, node, faucet);
        if compile {
            package.compile()?;
        }
        Ok(package)
    }
}

impl<N: Node> Package<N> {
    pub fn new(project: Project, node: N, faucet: Option<FaucetClient>) -> Self {
        Package {
            project,
            node,
            faucet,
            cli: MoveCli::default(),
            artifacts: BuildArtifacts::default(),
            max_polls: MAX_POLLS,
            poll_interval: POLL_INTERVAL,
        }
    }

    pub fn with_cli(mut self, cli: MoveCli) -> Self {
        self.cli = cli;
        self
    }

    pub fn with_polling(mut self, max_polls: u32, interval: Duration) -> Self {
        self.max_polls = max_polls;
        self.poll_interval = interval;
        self
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    pub fn node(&self) -> &N {
        &self.node
    }

    /// The signer's address.
    pub fn address(&self) -> AccountAddress {
        self.project.key.to_address()
    }

    pub fn artifacts(&self) -> &BuildArtifacts {
        &self.artifacts
    }

    pub fn registry(&self) -> &DescriptorRegistry {
        &self.artifacts.registry
    }

    /// Runs the compiler, then reloads the build output.
    pub fn compile(&mut self) -> Result<(), NodeError> {
        info!("Compile {}", self.project.package_name());
        self.cli
            .compile(&self.project.package_dir, &self.project.named_addresses)?;
        self.load_artifacts()
    }

    /// Reads an existing build without compiling.
    pub fn load_artifacts(&mut self) -> Result<(), NodeError> {
        self.artifacts = BuildArtifacts::load(&self.project.build_dir())?;
        Ok(())
    }

    pub fn publish(&self) -> Result<(), NodeError> {
        info!("Publish {}", self.project.package_name());
        self.cli.publish(
            &self.project.package_dir,
            &self.project.named_addresses,
            &self.project.network.node_url,
            &self.project.key,
        )
    }

    /// Looks up an entry function by `module::function`.
    pub fn function(&self, key: &str) -> Result<&FunctionDescriptor, NodeError> {
        Ok(self.artifacts.registry.get(key)?)
    }

    pub async fn wait(&self, hash: &str) -> Result<TransactionResponse, NodeError> {
        wait_for_transaction_with(&self.node, hash, self.max_polls, self.poll_interval).await
    }

    /// Signs `payload` with `signer` at its current sequence number and
    /// submits it, returning the hash without waiting.
    pub async fn submit(
        &self,
        signer: &PrivateKey,
        payload: TransactionPayload,
    ) -> Result<String, NodeError> {
        let sender = signer.to_address();
        let sequence_number = self.node.sequence_number(sender).await?;
        let chain_id = self.node.chain_id().await?;
        let signed = RawTransaction::new(sender, sequence_number, payload, chain_id).sign(signer);
        let hash = self.node.submit_bcs(&signed).await?;
        if hash != signed.hash_hex() {
            debug!("Node reported {} for local hash {}", hash, signed.hash_hex());
        }
        Ok(hash)
    }

    /// Calls the entry function `key` with BCS encoded arguments and waits
    /// for it to commit.
    pub async fn execute(
        &self,
        key: &str,
        type_args: &[&str],
        args: impl Into<CallArgs>,
    ) -> Result<Execution, NodeError> {
        let descriptor = self.function(key)?;
        let call = bind(descriptor, type_args, &args.into())?;
        let payload = assemble(descriptor, &call);
        let hash = self.submit(&self.project.key, payload.into()).await?;
        self.finish(key, hash).await
    }

    /// Same as [`Package::execute`] but submits through the node's JSON
    /// encoding endpoint.
    pub async fn execute_json(
        &self,
        key: &str,
        type_args: &[&str],
        args: impl Into<CallArgs>,
    ) -> Result<Execution, NodeError> {
        let descriptor = self.function(key)?;
        let call = bind(descriptor, type_args, &args.into())?;
        let signer = &self.project.key;
        let sender = signer.to_address();

        let mut request = TransactionRequest {
            sender: sender.to_string(),
            sequence_number: self.node.sequence_number(sender).await?.to_string(),
            max_gas_amount: DEFAULT_MAX_GAS_AMOUNT.to_string(),
            gas_unit_price: DEFAULT_GAS_UNIT_PRICE.to_string(),
            expiration_timestamp_secs: expiration_timestamp().to_string(),
            payload: json_payload(descriptor, &call),
            signature: None,
        };
        let to_sign = self.node.encode_submission(&request).await?;
        let signature = signer.sign(&to_sign);
        request.signature = Some(JsonSignature::ed25519(&signer.public_key(), &signature));
        let hash = self.node.submit_json(&request).await?;
        self.finish(key, hash).await
    }

    async fn finish(&self, key: &str, hash: String) -> Result<Execution, NodeError> {
        info!("Execute {}, transaction hash: {}, waiting...", key, hash);
        let response = self.wait(&hash).await?;
        info!("Execute {} Success", key);
        Ok(Execution { hash, response })
    }

    /// Sends `amount` octas from the signer to `to`, returning the hash
    /// without waiting.
    pub async fn transfer(&self, to: AccountAddress, amount: u64) -> Result<String, NodeError> {
        let payload = EntryFunction::natural(
            TRANSFER_MODULE,
            TRANSFER_FUNCTION,
            vec![],
            &[TypedValue::Address(to), TypedValue::U64(amount)],
        )?;
        self.submit(&self.project.key, payload.into()).await
    }

    /// Generates a key and funds its account, from the faucet when possible
    /// and otherwise with every whole coin of the signer but one.
    pub async fn create_random_account(&self) -> Result<PrivateKey, NodeError> {
        if !TEST_NETWORKS.contains(&self.project.network_name.as_str()) {
            return Err(NodeError::Config(format!(
                "Random accounts are only funded on {:?}, not {}",
                TEST_NETWORKS, self.project.network_name
            )));
        }
        let key = PrivateKey::from_bytes(rand::thread_rng().gen::<[u8; 32]>());
        let address = key.to_address();

        let funded = match &self.faucet {
            Some(faucet) => faucet
                .fund_account(&self.node, address, RANDOM_ACCOUNT_FUNDING)
                .await
                .map(|_| ()),
            None => Err(NodeError::Config("No faucet configured".to_string())),
        };
        if let Err(e) = funded {
            warn!("Faucet funding failed, transferring from the signer: {}", e);
            let balance = self.node.balance(self.address()).await?;
            let amount = whole_coins_but_one(balance);
            if amount > 0 {
                let hash = self.transfer(address, amount).await?;
                self.wait(&hash).await?;
            }
        }

        let balance = self.node.balance(address).await.unwrap_or(0);
        info!("Created account {} holding {} octas", address, balance);
        Ok(key)
    }

    pub async fn account_resource(
        &self,
        address: AccountAddress,
        resource_type: &str,
    ) -> Result<Value, NodeError> {
        self.node.account_resource(address, resource_type).await
    }
}

/// Rounds down to whole coins and keeps one back for gas.
pub fn whole_coins_but_one(balance: u64) -> u64 {
    (balance / OCTAS_PER_COIN * OCTAS_PER_COIN).saturating_sub(OCTAS_PER_COIN)
}

fn expiration_timestamp() -> u64 {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();
    now + DEFAULT_EXPIRATION_SECS
}

#[test]
fn keeps_one_coin_back() {
    assert_eq!(whole_coins_but_one(0), 0);
    assert_eq!(whole_coins_but_one(OCTAS_PER_COIN - 1), 0);
    assert_eq!(whole_coins_but_one(OCTAS_PER_COIN), 0);
    assert_eq!(whole_coins_but_one(5 * OCTAS_PER_COIN + 7), 4 * OCTAS_PER_COIN);
}
