use crate::client::{decode, fetch, wait_for_transaction, Node};
use crate::error::NodeError;
use awc::Client;
use brownie::AccountAddress;
use futures::future::try_join_all;
use std::time::Duration;

/// Mints test coins on networks that run a faucet.
#[derive(Clone)]
pub struct FaucetClient {
    url: String,
    client: Client,
    timeout: Duration,
}

impl FaucetClient {
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

    fn mint_url(&self, address: AccountAddress, amount: u64) -> String {
        format!("{}/mint?amount={amount}&address={address}", self.url)
    }

    /// Asks for `amount` octas to be minted to `address` and waits for every
    /// transaction the faucet reports.
    pub async fn fund_account<N: Node + ?Sized>(
        &self,
        node: &N,
        address: AccountAddress,
        amount: u64,
    ) -> Result<Vec<String>, NodeError> {
        let request = self
            .client
            .post(self.mint_url(address, amount))
            .timeout(self.timeout);
        let (status, body) = fetch(request, Some(Vec::new())).await?;
        let hashes: Vec<String> = decode(status, &body)?;
        debug!("Faucet minted {} to {} in {:?}", amount, address, hashes);
        try_join_all(hashes.iter().map(|hash| wait_for_transaction(node, hash))).await?;
        Ok(hashes)
    }
}

#[test]
fn mint_url() {
    let faucet = FaucetClient::new("https://faucet.testnet.aptoslabs.com/", Duration::from_secs(5));
    assert_eq!(
        faucet.mint_url(AccountAddress::ONE, 100),
        format!(
            "https://faucet.testnet.aptoslabs.com/mint?amount=100&address=0x{}1",
            "0".repeat(63)
        )
    );
}
