use std::collections::HashSet;

/// Set of addresses the watcher is interested in.
///
/// Membership is case-insensitive: every address is stored in its
/// normalized form (see [`normalize_address`]).
#[derive(Debug, Default, Clone)]
pub struct SubscriptionRegistry {
    addresses: HashSet<String>,
}

impl SubscriptionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an address to the watch set.
    /// Returns false and leaves the set untouched if it was already present.
    pub fn subscribe(&mut self, address: &str) -> bool {
        self.addresses.insert(normalize_address(address))
    }

    /// Remove an address; returns whether it was subscribed
    pub fn unsubscribe(&mut self, address: &str) -> bool {
        self.addresses.remove(&normalize_address(address))
    }

    pub fn is_subscribed(&self, address: &str) -> bool {
        self.addresses.contains(&normalize_address(address))
    }

    /// Snapshot of subscribed addresses, sorted for stable iteration
    pub fn addresses(&self) -> Vec<String> {
        let mut addresses: Vec<String> = self.addresses.iter().cloned().collect();
        addresses.sort();
        addresses
    }

    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }
}

/// Normalize address for consistent comparison:
/// trimmed, lowercase, with a single `0x` prefix
pub fn normalize_address(address: &str) -> String {
    let trimmed = address.trim();
    let without_prefix = if trimmed.starts_with("0x") || trimmed.starts_with("0X") {
        &trimmed[2..]
    } else {
        trimmed
    };
    format!("0x{}", without_prefix.to_lowercase())
}
