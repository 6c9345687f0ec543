//! Configuration types for the batch driver

use std::time::Duration;

/// How hierarchical items are ordered before creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResolveStrategy {
    /// Roots first, then children; supports one level of nesting
    #[default]
    TwoPass,
    /// Parents before children at any depth; cycles are rejected
    Topological,
}

/// Tuning for pagination and throttling
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Items requested per list call
    pub page_size: u32,
    /// Minimum spacing between the starts of two scheduled operations
    pub min_time: Duration,
    pub strategy: ResolveStrategy,
}

impl BatchConfig {
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn with_min_time(mut self, min_time: Duration) -> Self {
        self.min_time = min_time;
        self
    }

    pub fn with_strategy(mut self, strategy: ResolveStrategy) -> Self {
        self.strategy = strategy;
        self
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            page_size: 200,
            min_time: Duration::from_millis(500),
            strategy: ResolveStrategy::TwoPass,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_platform_limits() {
        let config = BatchConfig::default();
        assert_eq!(config.page_size, 200);
        assert_eq!(config.min_time, Duration::from_millis(500));
        assert_eq!(config.strategy, ResolveStrategy::TwoPass);
    }

    #[test]
    fn zero_page_size_is_clamped() {
        assert_eq!(BatchConfig::default().with_page_size(0).page_size, 1);
    }
}
