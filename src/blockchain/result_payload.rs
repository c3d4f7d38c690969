use serde::Deserialize;
use serde_json::Value;
use crate::error::DecodingError;
use crate::models::Transaction;

/// Interpretation of an untyped `result` payload.
///
/// Candidate schemas are tried in declaration order: a transaction
/// list first, then a bare block number. A `null` result reads as
/// an empty transaction list.
#[derive(Debug, Clone, PartialEq)]
pub enum ResultPayload {
    TransactionList(Vec<Transaction>),
    BlockNumber(u64),
    Unrecognized(Value),
}

impl ResultPayload {
    pub fn classify(result: &Value) -> Self {
        if result.is_null() {
            return ResultPayload::TransactionList(Vec::new());
        }
        if let Ok(transactions) = decode_transactions(result) {
            return ResultPayload::TransactionList(transactions);
        }
        if let Ok(block_number) = decode_block_number(result) {
            return ResultPayload::BlockNumber(block_number);
        }
        ResultPayload::Unrecognized(result.clone())
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ResultPayload::TransactionList(_) => "transaction_list",
            ResultPayload::BlockNumber(_) => "block_number",
            ResultPayload::Unrecognized(_) => "unrecognized",
        }
    }
}

/// Decode the payload as a list of transactions
pub fn decode_transactions(result: &Value) -> Result<Vec<Transaction>, DecodingError> {
    Vec::<Transaction>::deserialize(result).map_err(DecodingError::TransactionList)
}

/// Decode the payload as a block number: either a bare non-negative
/// integer or an Ethereum `0x`-prefixed hex quantity
pub fn decode_block_number(result: &Value) -> Result<u64, DecodingError> {
    match result {
        Value::Number(n) => n.as_u64().ok_or_else(|| {
            DecodingError::BlockNumber(format!("{} is not a non-negative integer", n))
        }),
        Value::String(s) => parse_hex_quantity(s),
        other => Err(DecodingError::BlockNumber(format!(
            "expected integer, got {}",
            json_type_name(other)
        ))),
    }
}

fn parse_hex_quantity(hex_str: &str) -> Result<u64, DecodingError> {
    let digits = hex_str
        .strip_prefix("0x")
        .ok_or_else(|| DecodingError::BlockNumber(format!("'{}' is not a hex quantity", hex_str)))?;

    u64::from_str_radix(digits, 16)
        .map_err(|e| DecodingError::BlockNumber(format!("Failed to parse hex '{}' to u64: {}", hex_str, e)))
}

pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
