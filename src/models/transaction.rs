use serde::{Deserialize, Serialize};
use std::fmt;

/// One on-chain transfer as reported by the node
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Transaction {
    pub hash: String,
    pub from: String,
    pub to: String,
    pub value: String,  // Decimal string representation for precision
    #[serde(rename = "blockNumber")]
    pub block_number: u64,
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} -> {} value={} block={}",
            self.hash, self.from, self.to, self.value, self.block_number
        )
    }
}
