pub const USER_AGENT: &str = concat!("streakkeeper/", env!("CARGO_PKG_VERSION"));

/// HTTP retry configuration
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retry attempts (default: 3)
    pub max_retries: u32,
    /// Initial backoff duration in milliseconds (default: 500ms)
    pub initial_backoff_ms: u64,
    /// Maximum backoff duration in milliseconds (default: 8000ms)
    pub max_backoff_ms: u64,
    /// Backoff multiplier (default: 2.0 for exponential backoff)
    pub backoff_multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff_ms: 500,
            max_backoff_ms: 8000,
            backoff_multiplier: 2.0,
        }
    }
}

impl RetryConfig {
    /// No retries, for callers that handle failures themselves
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Backoff to wait after `current_ms`, capped at `max_backoff_ms`
    pub fn next_backoff_ms(&self, current_ms: u64) -> u64 {
        ((current_ms as f64 * self.backoff_multiplier) as u64).min(self.max_backoff_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_grows_and_caps() {
        let config = RetryConfig::default();
        let mut backoff = config.initial_backoff_ms;
        let mut seen = vec![backoff];
        for _ in 0..6 {
            backoff = config.next_backoff_ms(backoff);
            seen.push(backoff);
        }
        assert_eq!(seen, vec![500, 1000, 2000, 4000, 8000, 8000, 8000]);
    }

    #[test]
    fn test_none_disables_retries() {
        assert_eq!(RetryConfig::none().max_retries, 0);
    }
}
