pub mod rpc_client;
pub mod result_payload;
pub mod block_tracker;
pub mod transaction_fetcher;
pub mod parser;

pub use rpc_client::{RpcClient, RpcEnvelope, RequestId, JsonRpcError};
pub use result_payload::{ResultPayload, decode_transactions, decode_block_number};
pub use block_tracker::BlockTracker;
pub use transaction_fetcher::{TransactionFetcher, FetchedTransactions, GET_TRANSACTIONS_METHOD};
pub use parser::EthParser;
