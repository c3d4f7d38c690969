use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use crate::config::RpcConfig;
use crate::error::{DecodingError, ParserError, Result};
use crate::logging::{LogContext, PerformanceMonitor, MetricsLogger};

pub const JSONRPC_VERSION: &str = "2.0";

/// Request correlation id. Nodes echo it back verbatim, so both
/// the numeric and the string form have to round-trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestId {
    Number(u64),
    Text(String),
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestId::Number(n) => write!(f, "{}", n),
            RequestId::Text(s) => write!(f, "{}", s),
        }
    }
}

#[derive(Debug, Serialize)]
struct JsonRpcRequest<'a> {
    jsonrpc: &'a str,
    method: &'a str,
    params: Vec<Value>,
    id: &'a RequestId,
}

/// Generic JSON-RPC response wrapper. `result` is kept as an
/// uninterpreted tree; its shape depends on the method called.
///
/// `id` must be present but may be `null` (parse-error replies).
/// `result` is `None` only when the member is absent; a present
/// `null` is kept as `Some(Value::Null)`.
#[derive(Debug, Deserialize)]
pub struct RpcEnvelope {
    #[serde(deserialize_with = "nullable")]
    pub id: Option<RequestId>,
    pub jsonrpc: String,
    #[serde(default, deserialize_with = "present")]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<JsonRpcError>,
}

#[derive(Debug, Deserialize)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
    #[serde(default)]
    pub data: Option<Value>,
}

fn nullable<'de, D>(deserializer: D) -> std::result::Result<Option<RequestId>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<RequestId>::deserialize(deserializer)
}

fn present<'de, D>(deserializer: D) -> std::result::Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl RpcEnvelope {
    /// Decode an envelope from an already buffered response body
    pub fn from_slice(body: &[u8]) -> std::result::Result<Self, DecodingError> {
        serde_json::from_slice(body).map_err(DecodingError::Envelope)
    }

    /// Unwrap the result payload, surfacing node-reported errors
    pub fn into_result(self) -> Result<Value> {
        if self.jsonrpc != JSONRPC_VERSION {
            return Err(DecodingError::ProtocolVersion(self.jsonrpc).into());
        }

        match (self.result, self.error) {
            (None | Some(Value::Null), Some(error)) => Err(ParserError::Node {
                code: error.code,
                message: error.message,
            }),
            (Some(result), _) => Ok(result),
            (None, None) => Err(DecodingError::MissingResult.into()),
        }
    }
}

/// Thin JSON-RPC client: one POST per call, no retries
#[derive(Clone)]
pub struct RpcClient {
    client: Client,
    endpoint: String,
    request_id: RequestId,
}

impl RpcClient {
    pub fn new(config: &RpcConfig) -> Result<Self> {
        let context = LogContext::new("rpc_client", "initialization")
            .with_metadata("endpoint", serde_json::json!(config.endpoint))
            .with_metadata("request_id", serde_json::json!(config.request_id.to_string()));
        context.info("Initializing RPC client");

        Ok(Self {
            client: Client::builder().build()?,
            endpoint: config.endpoint.clone(),
            request_id: config.request_id.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn request_id(&self) -> &RequestId {
        &self.request_id
    }

    /// Serialize a request body for `method`
    pub fn encode_request(&self, method: &str, params: Vec<Value>) -> Result<Vec<u8>> {
        let request = JsonRpcRequest {
            jsonrpc: JSONRPC_VERSION,
            method,
            params,
            id: &self.request_id,
        };

        serde_json::to_vec(&request).map_err(ParserError::Encoding)
    }

    /// Issue one JSON-RPC call and return the raw `result` payload
    pub async fn call(&self, method: &str, params: Vec<Value>) -> Result<Value> {
        let monitor = PerformanceMonitor::new("rpc_call")
            .with_metadata("method", serde_json::json!(method));

        let result = self.send(method, params).await;
        let duration = monitor.finish_with_result(&result);
        MetricsLogger::log_rpc_call(method, duration, result.is_ok());

        result
    }

    async fn send(&self, method: &str, params: Vec<Value>) -> Result<Value> {
        let context = LogContext::new("rpc_client", "call")
            .with_metadata("method", serde_json::json!(method))
            .with_metadata("endpoint", serde_json::json!(self.endpoint));

        let body = self.encode_request(method, params)?;
        context.trace(&format!("Sending RPC request: {}", method));

        let response = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(ParserError::Remote { status: status.as_u16() });
        }

        // Buffer once; diagnostics and decoding both read from these bytes
        let bytes = response.bytes().await?;
        if log::log_enabled!(log::Level::Debug) {
            context.debug(&format!("Response body: {}", String::from_utf8_lossy(&bytes)));
        }

        let envelope = RpcEnvelope::from_slice(&bytes)?;
        if let Some(id) = envelope.id.as_ref().filter(|id| **id != self.request_id) {
            context.warn(&format!(
                "Response id {} does not match request id {}",
                id, self.request_id
            ));
        }

        envelope.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn client_with_id(request_id: RequestId) -> RpcClient {
        let config = RpcConfig {
            endpoint: "http://localhost:8545".to_string(),
            request_id,
        };
        RpcClient::new(&config).unwrap()
    }

    #[test]
    fn test_rpc_client_creation() {
        let client = client_with_id(RequestId::Number(1));
        assert_eq!(client.endpoint(), "http://localhost:8545");
        assert_eq!(client.request_id(), &RequestId::Number(1));
    }

    #[test]
    fn test_json_rpc_request_serialization() {
        let client = client_with_id(RequestId::Text("1".to_string()));
        let body = client
            .encode_request("eth_getTransactionsByAddress", vec![json!("0x1234567890abcdef")])
            .unwrap();

        let expected = r#"{"jsonrpc":"2.0","method":"eth_getTransactionsByAddress","params":["0x1234567890abcdef"],"id":"1"}"#;
        assert_eq!(String::from_utf8(body).unwrap(), expected);
    }

    #[test]
    fn test_numeric_request_id_serialization() {
        let client = client_with_id(RequestId::Number(7));
        let body = client.encode_request("eth_blockNumber", vec![]).unwrap();
        assert_eq!(
            String::from_utf8(body).unwrap(),
            r#"{"jsonrpc":"2.0","method":"eth_blockNumber","params":[],"id":7}"#
        );
    }

    #[test]
    fn test_envelope_accepts_numeric_and_string_ids() {
        let numeric = RpcEnvelope::from_slice(br#"{"id":1,"jsonrpc":"2.0","result":"0x10"}"#).unwrap();
        assert_eq!(numeric.id, Some(RequestId::Number(1)));

        let text = RpcEnvelope::from_slice(br#"{"id":"1","jsonrpc":"2.0","result":"0x10"}"#).unwrap();
        assert_eq!(text.id, Some(RequestId::Text("1".to_string())));
        assert_eq!(text.into_result().unwrap(), json!("0x10"));
    }

    #[test]
    fn test_envelope_missing_fields() {
        let missing_id = RpcEnvelope::from_slice(br#"{"jsonrpc":"2.0","result":1}"#);
        assert!(matches!(missing_id, Err(DecodingError::Envelope(_))));

        let not_json = RpcEnvelope::from_slice(b"<html>bad gateway</html>");
        assert!(matches!(not_json, Err(DecodingError::Envelope(_))));
    }

    #[test]
    fn test_envelope_node_error() {
        let envelope = RpcEnvelope::from_slice(
            br#"{"jsonrpc":"2.0","id":1,"error":{"code":-32601,"message":"Method not found"}}"#,
        )
        .unwrap();

        match envelope.into_result() {
            Err(ParserError::Node { code, message }) => {
                assert_eq!(code, -32601);
                assert_eq!(message, "Method not found");
            }
            other => panic!("expected node error, got {:?}", other),
        }
    }

    #[test]
    fn test_envelope_null_id_keeps_node_error() {
        let envelope = RpcEnvelope::from_slice(
            br#"{"jsonrpc":"2.0","id":null,"error":{"code":-32700,"message":"Parse error"}}"#,
        )
        .unwrap();
        assert_eq!(envelope.id, None);

        match envelope.into_result() {
            Err(ParserError::Node { code, message }) => {
                assert_eq!(code, -32700);
                assert_eq!(message, "Parse error");
            }
            other => panic!("expected node error, got {:?}", other),
        }
    }

    #[test]
    fn test_envelope_null_result_is_present() {
        let envelope = RpcEnvelope::from_slice(br#"{"jsonrpc":"2.0","id":1,"result":null}"#).unwrap();
        assert_eq!(envelope.result, Some(Value::Null));
        assert_eq!(envelope.into_result().unwrap(), Value::Null);
    }

    #[test]
    fn test_envelope_without_result_or_error() {
        let envelope = RpcEnvelope::from_slice(br#"{"jsonrpc":"2.0","id":1}"#).unwrap();
        assert!(matches!(
            envelope.into_result(),
            Err(ParserError::Decoding(DecodingError::MissingResult))
        ));
    }

    #[test]
    fn test_envelope_wrong_protocol_version() {
        let envelope = RpcEnvelope::from_slice(br#"{"jsonrpc":"1.0","id":1,"result":1}"#).unwrap();
        assert!(matches!(
            envelope.into_result(),
            Err(ParserError::Decoding(DecodingError::ProtocolVersion(v))) if v == "1.0"
        ));
    }
}
