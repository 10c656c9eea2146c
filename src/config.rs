use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://chess-api.com/v1";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Where and how long to ask the remote advisor for a move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdvisorConfig {
    pub endpoint: String,
    pub timeout: Duration,
}

impl AdvisorConfig {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        Self {
            endpoint: endpoint.into(),
            timeout,
        }
    }
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self::new(DEFAULT_ENDPOINT, DEFAULT_TIMEOUT)
    }
}
