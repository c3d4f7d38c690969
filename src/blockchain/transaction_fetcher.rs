use serde_json::{json, Value};
use crate::blockchain::result_payload::{json_type_name, ResultPayload};
use crate::blockchain::RpcClient;
use crate::error::{DecodingError, Result};
use crate::logging::LogContext;
use crate::models::Transaction;

pub const GET_TRANSACTIONS_METHOD: &str = "eth_getTransactionsByAddress";

/// Outcome of one successful fetch
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedTransactions {
    pub transactions: Vec<Transaction>,
    /// Height to record, if the payload carried one
    pub block_number: Option<u64>,
    /// Which result schema matched
    pub payload_kind: &'static str,
}

/// Retrieves the transactions of one address per call
#[derive(Clone)]
pub struct TransactionFetcher {
    rpc_client: RpcClient,
}

impl TransactionFetcher {
    pub fn new(rpc_client: RpcClient) -> Self {
        Self { rpc_client }
    }

    /// Fetch transactions for `address`.
    ///
    /// A transaction list yields its transactions and the highest
    /// `blockNumber` among them; a bare block number yields no
    /// transactions. Anything else is a decoding error.
    pub async fn fetch(&self, address: &str) -> Result<FetchedTransactions> {
        let context = LogContext::new("transaction_fetcher", "fetch")
            .with_address(address);

        let result = self
            .rpc_client
            .call(GET_TRANSACTIONS_METHOD, vec![json!(address)])
            .await?;

        let fetched = interpret_result(&result)?;
        context
            .with_metadata("payload_kind", json!(fetched.payload_kind))
            .with_metadata("transaction_count", json!(fetched.transactions.len()))
            .debug(&format!("Decoded {} payload", fetched.payload_kind));

        Ok(fetched)
    }
}

/// Turn a raw `result` value into a fetch outcome
pub fn interpret_result(result: &Value) -> std::result::Result<FetchedTransactions, DecodingError> {
    let payload = ResultPayload::classify(result);
    let payload_kind = payload.kind();

    match payload {
        ResultPayload::TransactionList(transactions) => {
            let block_number = transactions.iter().map(|tx| tx.block_number).max();
            Ok(FetchedTransactions { transactions, block_number, payload_kind })
        }
        ResultPayload::BlockNumber(block_number) => Ok(FetchedTransactions {
            transactions: Vec::new(),
            block_number: Some(block_number),
            payload_kind,
        }),
        ResultPayload::Unrecognized(value) => Err(DecodingError::UnrecognizedResult(format!(
            "{} is neither a transaction list nor a block number",
            json_type_name(&value)
        ))),
    }
}
