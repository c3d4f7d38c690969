use log::debug;

/// Last block height derived from a successful fetch.
/// Writes overwrite unconditionally; the height may go backwards.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BlockTracker {
    current_block: u64,
}

impl BlockTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_block(&self) -> u64 {
        self.current_block
    }

    pub fn set_block(&mut self, block_number: u64) {
        if block_number < self.current_block {
            debug!("Block height moved backwards: {} -> {}", self.current_block, block_number);
        }
        self.current_block = block_number;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_zero() {
        assert_eq!(BlockTracker::new().current_block(), 0);
    }

    #[test]
    fn test_set_block_overwrites() {
        let mut tracker = BlockTracker::new();
        tracker.set_block(100);
        assert_eq!(tracker.current_block(), 100);

        // no monotonicity check
        tracker.set_block(7);
        assert_eq!(tracker.current_block(), 7);
    }
}
