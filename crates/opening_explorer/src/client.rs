//! HTTP client for the lichess opening explorer
//!
//! Lookups are blocking and sequential. A 429 response pauses the caller for
//! the configured cool-down before trying again; transport failures and 5xx
//! responses are retried the same way. After `max_attempts` the last error is
//! returned to the caller.

use crate::error::{ExplorerError, ExplorerResult};
use crate::response::ExplorerResponse;
use crate::source::ExplorerSource;
use crate::StatisticsService;
use reqwest::blocking::Client;
use reqwest::{StatusCode, Url};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Connection and retry settings for [`LichessExplorer`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorerConfig {
    pub base_url: String,
    /// Continuations requested per position
    pub moves: u32,
    /// Pause after a rate-limited or failed attempt
    pub cooldown_secs: u64,
    pub max_attempts: u32,
    pub timeout_secs: u64,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            base_url: "https://explorer.lichess.ovh".to_string(),
            moves: 15,
            cooldown_secs: 60,
            max_attempts: 3,
            timeout_secs: 30,
        }
    }
}

/// Result of a single attempt inside [`with_retry`]
pub(crate) enum Attempt<T> {
    Done(T),
    Retry(ExplorerError),
    Fail(ExplorerError),
}

/// Run `op` up to `max_attempts` times, calling `pause` between attempts
pub(crate) fn with_retry<T>(
    max_attempts: u32,
    mut pause: impl FnMut(u32),
    mut op: impl FnMut(u32) -> Attempt<T>,
) -> ExplorerResult<T> {
    let attempts = max_attempts.max(1);
    let mut attempt = 1;
    loop {
        match op(attempt) {
            Attempt::Done(value) => return Ok(value),
            Attempt::Fail(err) => return Err(err),
            Attempt::Retry(err) if attempt >= attempts => return Err(err),
            Attempt::Retry(err) => {
                debug!("[EXPLORER] Attempt {}/{} failed: {}", attempt, attempts, err);
                pause(attempt);
                attempt += 1;
            }
        }
    }
}

/// Blocking client for `explorer.lichess.ovh`
pub struct LichessExplorer {
    client: Client,
    config: ExplorerConfig,
    token: Option<String>,
}

impl LichessExplorer {
    pub fn new(config: ExplorerConfig, token: Option<String>) -> ExplorerResult<Self> {
        let client = Client::builder()
            .user_agent(concat!("repertoire/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            config,
            token,
        })
    }

    fn url(&self, fen: &str, source: &ExplorerSource) -> ExplorerResult<Url> {
        let endpoint = format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            source.path()
        );
        Url::parse_with_params(&endpoint, source.query(fen, self.config.moves)).map_err(|e| {
            ExplorerError::InvalidUrl {
                message: format!("{}: {}", endpoint, e),
            }
        })
    }

    fn attempt(&self, url: &Url, attempt: u32) -> Attempt<ExplorerResponse> {
        let mut request = self.client.get(url.clone());
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = match request.send() {
            Ok(response) => response,
            Err(e) => return Attempt::Retry(ExplorerError::Http(e)),
        };

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            info!(
                "[EXPLORER] Rate limited, pausing for {}s...",
                self.config.cooldown_secs
            );
            return Attempt::Retry(ExplorerError::RateLimited { attempts: attempt });
        }
        if status.is_server_error() {
            return Attempt::Retry(ExplorerError::Status {
                status: status.as_u16(),
            });
        }
        if !status.is_success() {
            return Attempt::Fail(ExplorerError::Status {
                status: status.as_u16(),
            });
        }

        match response.json::<ExplorerResponse>() {
            Ok(body) => Attempt::Done(body),
            Err(e) => Attempt::Fail(ExplorerError::Http(e)),
        }
    }
}

impl StatisticsService for LichessExplorer {
    fn lookup(&self, fen: &str, source: &ExplorerSource) -> ExplorerResult<ExplorerResponse> {
        let url = self.url(fen, source)?;
        let cooldown = Duration::from_secs(self.config.cooldown_secs);

        let result = with_retry(
            self.config.max_attempts,
            |_| std::thread::sleep(cooldown),
            |attempt| self.attempt(&url, attempt),
        );

        if let Err(e) = &result {
            warn!("[EXPLORER] Lookup failed for {}: {}", fen, e);
        }
        result
    }
}
