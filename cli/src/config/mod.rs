use std::env;

use seablock_client::ClientConfig;

/// Shell settings layered over the client configuration
#[derive(Debug, Clone)]
pub struct ShellConfig {
    pub client: ClientConfig,
    /// Skip every y/N prompt
    pub assume_yes: bool,
    /// Column width cap for rendered tables
    pub max_column_width: usize,
}

impl ShellConfig {
    /// Load shell configuration from environment variables
    pub fn from_env() -> Self {
        let max_column_width = env::var("SEABLOCK_MAX_COLUMN_WIDTH")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .filter(|w| *w >= 8)
            .unwrap_or(32);

        Self {
            client: ClientConfig::from_env(),
            assume_yes: false,
            max_column_width,
        }
    }

    pub fn assume_yes(mut self, yes: bool) -> Self {
        self.assume_yes = yes;
        self
    }
}
