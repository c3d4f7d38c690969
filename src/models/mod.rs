pub mod transaction;
pub mod subscription_registry;

pub use transaction::Transaction;
pub use subscription_registry::{SubscriptionRegistry, normalize_address};
