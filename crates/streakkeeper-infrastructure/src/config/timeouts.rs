use std::time::Duration;

/// Timeout durations used by the network clients
#[derive(Debug, Clone)]
pub struct TimeoutConfig {
    /// Whole-request timeout for ledger and story calls
    pub http_request: Duration,

    /// TCP/TLS connect timeout
    pub http_connect: Duration,

    /// Generative text calls can take noticeably longer than ledger reads
    pub story_generation: Duration,

    /// Alert delivery timeout
    pub notification: Duration,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        GLOBAL_TIMEOUT_CONFIG.clone()
    }
}

impl TimeoutConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the global timeout configuration
    pub fn global() -> &'static Self {
        &GLOBAL_TIMEOUT_CONFIG
    }
}

static GLOBAL_TIMEOUT_CONFIG: TimeoutConfig = TimeoutConfig {
    http_request: Duration::from_secs(30),
    http_connect: Duration::from_secs(10),
    story_generation: Duration::from_secs(60),
    notification: Duration::from_secs(10),
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_global() {
        let config = TimeoutConfig::new();
        assert_eq!(config.http_request, TimeoutConfig::global().http_request);
        assert_eq!(config.http_request, Duration::from_secs(30));
        assert!(config.http_connect < config.http_request);
    }
}
