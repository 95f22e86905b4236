use std::time::Duration;

/// Network timeouts applied to the service client, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientConfig {
    pub connect_timeout_ms: u64,
    pub read_timeout_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            connect_timeout_ms: 10_000,
            read_timeout_ms: 40_000,
        }
    }
}

impl ClientConfig {
    pub fn new(connect_timeout_ms: u64, read_timeout_ms: u64) -> Self {
        Self {
            connect_timeout_ms,
            read_timeout_ms,
        }
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }
}
