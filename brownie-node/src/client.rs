//! Async client for the node's REST API.
//!
//! Everything a [`crate::package::Package`] needs from the chain goes through
//! the [`Node`] trait so the flow can be driven without a network.

use crate::error::NodeError;
use crate::mem::get_buffer_size;
use crate::types::{
    AccountInfo, CoinStore, LedgerInfo, Resource, TransactionRequest, TransactionResponse,
};
use async_trait::async_trait;
use awc::http::{header, StatusCode};
use awc::{Client, ClientRequest};
use brownie::constants::coin_store;
use brownie::utils::hex_str_to_bytes;
use brownie::{AccountAddress, SignedTransaction};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tokio::time::sleep as delay_for;

pub const BCS_SIGNED_TRANSACTION: &str = "application/x.aptos.signed_transaction+bcs";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
/// Pending checks after the first one before giving up on a transaction
pub const MAX_POLLS: u32 = 20;
pub const POLL_INTERVAL: Duration = Duration::from_secs(1);

#[async_trait(?Send)]
pub trait Node {
    async fn ledger_info(&self) -> Result<LedgerInfo, NodeError>;

    async fn account(&self, address: AccountAddress) -> Result<AccountInfo, NodeError>;

    /// The full resource JSON, `{"type": .., "data": ..}`.
    async fn account_resource(
        &self,
        address: AccountAddress,
        resource_type: &str,
    ) -> Result<Value, NodeError>;

    /// Submits BCS bytes and returns the transaction hash.
    async fn submit_bcs(&self, transaction: &SignedTransaction) -> Result<String, NodeError>;

    /// Asks the node for the bytes to sign for a JSON submission.
    async fn encode_submission(&self, request: &TransactionRequest) -> Result<Vec<u8>, NodeError>;

    /// Submits a signed JSON request and returns the transaction hash.
    async fn submit_json(&self, request: &TransactionRequest) -> Result<String, NodeError>;

    /// `None` while the node has not seen the transaction yet.
    async fn transaction_by_hash(
        &self,
        hash: &str,
    ) -> Result<Option<TransactionResponse>, NodeError>;

    async fn chain_id(&self) -> Result<u8, NodeError> {
        Ok(self.ledger_info().await?.chain_id)
    }

    async fn sequence_number(&self, address: AccountAddress) -> Result<u64, NodeError> {
        Ok(self.account(address).await?.sequence_number()?)
    }

    /// Balance in octas of the native coin.
    async fn balance(&self, address: AccountAddress) -> Result<u64, NodeError> {
        let resource = self.account_resource(address, &coin_store()).await?;
        let store: Resource<CoinStore> = serde_json::from_value(resource)?;
        Ok(store.data.coin.value.parse()?)
    }
}

/// Polls `hash` until it leaves the pending state, at most [`MAX_POLLS`]
/// times [`POLL_INTERVAL`] apart.
pub async fn wait_for_transaction<N: Node + ?Sized>(
    node: &N,
    hash: &str,
) -> Result<TransactionResponse, NodeError> {
    wait_for_transaction_with(node, hash, MAX_POLLS, POLL_INTERVAL).await
}

pub async fn wait_for_transaction_with<N: Node + ?Sized>(
    node: &N,
    hash: &str,
    max_polls: u32,
    interval: Duration,
) -> Result<TransactionResponse, NodeError> {
    let mut polls = 0;
    loop {
        if let Some(transaction) = node.transaction_by_hash(hash).await? {
            if !transaction.is_pending() {
                if transaction.is_success() {
                    return Ok(transaction);
                }
                return Err(NodeError::TransactionFailed {
                    hash: hash.to_string(),
                    vm_status: transaction.vm_status.unwrap_or_default(),
                });
            }
        }
        if polls >= max_polls {
            return Err(NodeError::TransactionTimeout {
                hash: hash.to_string(),
            });
        }
        trace!("Transaction {} still pending", hash);
        delay_for(interval).await;
        polls += 1;
    }
}

/// Sends a request and reads the whole body, whatever the status.
pub(crate) async fn fetch(
    request: ClientRequest,
    body: Option<Vec<u8>>,
) -> Result<(StatusCode, Vec<u8>), NodeError> {
    trace!("Making request {} {}", request.get_method(), request.get_uri());
    let res = match body {
        Some(body) => request.send_body(body).await,
        None => request.send().await,
    };
    let mut res = match res {
        Ok(val) => val,
        Err(e) => return Err(NodeError::FailedToSend(e)),
    };

    trace!("response headers {:?}", res.headers());

    let request_size_limit = get_buffer_size();
    let body_bytes = match res.body().limit(request_size_limit).await {
        Ok(val) => val,
        Err(e) => {
            return Err(NodeError::BadResponse(format!(
                "Size Limit {request_size_limit} error {e}"
            )))
        }
    };
    Ok((res.status(), body_bytes.to_vec()))
}

/// Turns a non success status into [`NodeError::ApiError`] and parses the
/// body otherwise.
pub(crate) fn decode<R: DeserializeOwned>(status: StatusCode, body: &[u8]) -> Result<R, NodeError> {
    if !status.is_success() {
        return Err(NodeError::ApiError {
            status: status.as_u16(),
            body: String::from_utf8_lossy(body).into_owned(),
        });
    }
    match serde_json::from_slice(body) {
        Ok(val) => Ok(val),
        Err(e) => Err(NodeError::BadResponse(format!(
            "Failed to parse response as JSON: {e}\nRaw response: {}",
            String::from_utf8_lossy(body)
        ))),
    }
}

/// Percent encodes a Move type for use as one URI path segment.
pub(crate) fn encode_path_segment(segment: &str) -> String {
    urlencoding::encode(segment).into_owned()
}

/// An instance of the REST client, `url` is the API root such as
/// `https://fullnode.testnet.aptoslabs.com/v1`.
#[derive(Clone)]
pub struct RestClient {
    url: String,
    client: Client,
    timeout: Duration,
}

impl RestClient {
    pub fn new(url: &str, timeout: Duration) -> Self {
        Self {
            url: url.trim_end_matches('/').to_string(),
            client: Client::default(),
            timeout,
        }
    }

    pub fn get_url(&self) -> String {
        self.url.clone()
    }

    pub fn get_timeout(&self) -> Duration {
        self.timeout
    }

    async fn get<R: DeserializeOwned>(&self, path: &str) -> Result<R, NodeError> {
        let request = self
            .client
            .get(format!("{}{}", self.url, path))
            .timeout(self.timeout);
        let (status, body) = fetch(request, None).await?;
        decode(status, &body)
    }

    async fn post<R: DeserializeOwned>(
        &self,
        path: &str,
        content_type: &str,
        body: Vec<u8>,
    ) -> Result<R, NodeError> {
        let request = self
            .client
            .post(format!("{}{}", self.url, path))
            .append_header((header::CONTENT_TYPE, content_type.to_string()))
            .timeout(self.timeout);
        let (status, body) = fetch(request, Some(body)).await?;
        decode(status, &body)
    }
}

#[async_trait(?Send)]
impl Node for RestClient {
    async fn ledger_info(&self) -> Result<LedgerInfo, NodeError> {
        self.get("/").await
    }

    async fn account(&self, address: AccountAddress) -> Result<AccountInfo, NodeError> {
        self.get(&format!("/accounts/{address}")).await
    }

    async fn account_resource(
        &self,
        address: AccountAddress,
        resource_type: &str,
    ) -> Result<Value, NodeError> {
        self.get(&format!(
            "/accounts/{address}/resource/{}",
            encode_path_segment(resource_type)
        ))
        .await
    }

    async fn submit_bcs(&self, transaction: &SignedTransaction) -> Result<String, NodeError> {
        let response: TransactionResponse = self
            .post("/transactions", BCS_SIGNED_TRANSACTION, transaction.to_bytes())
            .await?;
        debug!("Submitted transaction {}", response.hash);
        Ok(response.hash)
    }

    async fn encode_submission(&self, request: &TransactionRequest) -> Result<Vec<u8>, NodeError> {
        let encoded: String = self
            .post(
                "/transactions/encode_submission",
                "application/json",
                serde_json::to_vec(request)?,
            )
            .await?;
        Ok(hex_str_to_bytes(&encoded)?)
    }

    async fn submit_json(&self, request: &TransactionRequest) -> Result<String, NodeError> {
        let response: TransactionResponse = self
            .post("/transactions", "application/json", serde_json::to_vec(request)?)
            .await?;
        debug!("Submitted transaction {}", response.hash);
        Ok(response.hash)
    }

    async fn transaction_by_hash(
        &self,
        hash: &str,
    ) -> Result<Option<TransactionResponse>, NodeError> {
        let request = self
            .client
            .get(format!("{}/transactions/by_hash/{}", self.url, hash))
            .timeout(self.timeout);
        let (status, body) = fetch(request, None).await?;
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        decode(status, &body).map(Some)
    }
}
