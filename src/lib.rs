pub mod blockchain;
pub mod models;
pub mod error;
pub mod logging;
pub mod config;

pub use blockchain::{EthParser, RpcClient, RequestId};
pub use error::{ParserError, DecodingError, Result};
pub use logging::{LogContext, PerformanceMonitor, ErrorLogger, MetricsLogger};
pub use config::{AppConfig, RpcConfig, WatchConfig, LoggingConfig};
