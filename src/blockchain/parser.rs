use crate::blockchain::{BlockTracker, RpcClient, TransactionFetcher};
use crate::config::RpcConfig;
use crate::error::Result;
use crate::logging::{ErrorLogger, LogContext, MetricsLogger};
use crate::models::{SubscriptionRegistry, Transaction};

/// Owns the subscription set, the block tracker and the fetcher.
pub struct EthParser {
    registry: SubscriptionRegistry,
    tracker: BlockTracker,
    fetcher: TransactionFetcher,
}

impl EthParser {
    pub fn new(config: &RpcConfig) -> Result<Self> {
        Ok(Self::with_client(RpcClient::new(config)?))
    }

    pub fn with_client(rpc_client: RpcClient) -> Self {
        Self {
            registry: SubscriptionRegistry::new(),
            tracker: BlockTracker::new(),
            fetcher: TransactionFetcher::new(rpc_client),
        }
    }

    /// Last parsed block number, 0 until a fetch succeeds
    pub fn get_current_block(&self) -> u64 {
        self.tracker.current_block()
    }

    /// Add address to the watch set; false if it was already there
    pub fn subscribe(&mut self, address: &str) -> bool {
        let added = self.registry.subscribe(address);
        LogContext::new("parser", "subscribe")
            .with_address(address)
            .debug(if added { "Subscribed" } else { "Already subscribed" });
        added
    }

    pub fn unsubscribe(&mut self, address: &str) -> bool {
        self.registry.unsubscribe(address)
    }

    pub fn subscriptions(&self) -> &SubscriptionRegistry {
        &self.registry
    }

    /// Inbound and outbound transactions for `address`.
    /// The block tracker is only touched when the whole call succeeds.
    pub async fn get_transactions(&mut self, address: &str) -> Result<Vec<Transaction>> {
        let fetched = match self.fetcher.fetch(address).await {
            Ok(fetched) => fetched,
            Err(e) => {
                let context = LogContext::new("parser", "get_transactions").with_address(address);
                ErrorLogger::log_error(&e, Some(context));
                return Err(e);
            }
        };

        if let Some(block_number) = fetched.block_number {
            self.tracker.set_block(block_number);
        }

        MetricsLogger::log_fetch_completed(address, fetched.transactions.len(), self.tracker.current_block());
        Ok(fetched.transactions)
    }

    /// Fetch every subscribed address in turn, stopping at the first failure
    pub async fn get_subscribed_transactions(&mut self) -> Result<Vec<(String, Vec<Transaction>)>> {
        let mut results = Vec::new();
        for address in self.registry.addresses() {
            let transactions = self.get_transactions(&address).await?;
            results.push((address, transactions));
        }
        Ok(results)
    }
}
