// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;

/// Global configuration shared by every subcommand.
#[derive(Debug, Clone, clap::Args)]
pub struct Config {
    /// Directory holding the credential record files.
    #[arg(long, default_value = ".", env = "ROOST_DATA_DIR")]
    pub data_dir: PathBuf,

    /// Base URL of the hosting API.
    #[arg(long, default_value = "https://beds24.com/api/v2", env = "ROOST_API_BASE")]
    pub api_base: String,

    /// HTTP request timeout in seconds.
    #[arg(long, default_value_t = 10, env = "ROOST_HTTP_TIMEOUT_SECS")]
    pub http_timeout_secs: u64,

    /// Double-check a locally valid access token with the server before
    /// trusting it.
    #[arg(long, env = "ROOST_VALIDATE_REMOTE")]
    pub validate_remote: bool,

    /// Lifetime in days recorded for newly issued refresh tokens.
    #[arg(long, default_value_t = 30, env = "ROOST_REFRESH_TTL_DAYS")]
    pub refresh_ttl_days: i64,

    /// Log format (json or text).
    #[arg(long, env = "ROOST_LOG_FORMAT", default_value = "text")]
    pub log_format: String,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, env = "ROOST_LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Config {
    /// API base URL with any trailing slash removed.
    pub fn base_url(&self) -> String {
        self.api_base.trim_end_matches('/').to_owned()
    }

    pub fn http_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.http_timeout_secs)
    }

    pub fn refresh_ttl(&self) -> chrono::Duration {
        chrono::Duration::days(self.refresh_ttl_days)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.api_base.trim_end_matches('/').is_empty() {
            anyhow::bail!("--api-base must not be empty");
        }
        if self.http_timeout_secs == 0 {
            anyhow::bail!("--http-timeout-secs must be at least 1");
        }
        if !(1..=3650).contains(&self.refresh_ttl_days) {
            anyhow::bail!("--refresh-ttl-days must be between 1 and 3650");
        }
        match self.log_format.as_str() {
            "json" | "text" => {}
            other => anyhow::bail!("unknown log format: {other} (expected json or text)"),
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
