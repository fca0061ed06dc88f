//! Server configuration and environment overrides.

use noughts_session::SessionConfig;

/// Environment variable overriding [`ServerConfig::bind_addr`].
pub const ENV_BIND: &str = "NOUGHTS_BIND";
/// Environment variable overriding [`SessionConfig::max_name_len`].
pub const ENV_MAX_NAME_LEN: &str = "NOUGHTS_MAX_NAME_LEN";

/// Everything the server needs before it starts accepting connections.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address the WebSocket listener binds to.
    ///
    /// Default: `127.0.0.1:8080`.
    pub bind_addr: String,
    /// Participant handling.
    pub session: SessionConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            session: SessionConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Defaults, overridden from `NOUGHTS_BIND` and `NOUGHTS_MAX_NAME_LEN`.
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides from `lookup`, which maps a variable name to its
    /// value. Values that fail to parse are logged and ignored.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(addr) = lookup(ENV_BIND) {
            let addr = addr.trim();
            if addr.is_empty() {
                tracing::warn!(key = ENV_BIND, "empty value, keeping {}", self.bind_addr);
            } else {
                tracing::debug!(key = ENV_BIND, value = addr, "config override");
                self.bind_addr = addr.to_string();
            }
        }

        if let Some(raw) = lookup(ENV_MAX_NAME_LEN) {
            match raw.trim().parse::<usize>() {
                Ok(len) if len > 0 => {
                    tracing::debug!(key = ENV_MAX_NAME_LEN, value = len, "config override");
                    self.session.max_name_len = len;
                }
                _ => tracing::warn!(
                    key = ENV_MAX_NAME_LEN,
                    value = %raw,
                    "expected a positive integer, keeping {}",
                    self.session.max_name_len
                ),
            }
        }

        self
    }
}
