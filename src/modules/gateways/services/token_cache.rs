use std::future::Future;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

use crate::core::Result;

/// Refresh this long before the advertised expiry
const REFRESH_MARGIN: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
struct CachedToken {
    token: String,
    expires_at: Instant,
}

/// Process-lifetime cache for the gateway access token.
///
/// Explicit, injectable state instead of a module global: the owning client
/// holds one instance and refreshes lazily on the first call after expiry.
/// The lock is held across a refresh so concurrent callers do not stampede
/// the token endpoint.
#[derive(Debug, Default)]
pub struct AccessTokenCache {
    slot: Mutex<Option<CachedToken>>,
}

impl AccessTokenCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached token, or run `refresh` to obtain a fresh one.
    ///
    /// `refresh` yields the token plus its advertised lifetime in seconds.
    pub async fn get_or_refresh<F, Fut>(&self, refresh: F) -> Result<String>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<(String, u64)>>,
    {
        let mut slot = self.slot.lock().await;

        if let Some(cached) = slot.as_ref() {
            if cached.expires_at > Instant::now() {
                return Ok(cached.token.clone());
            }
        }

        let (token, expires_in_secs) = refresh().await?;

        let lifetime = Duration::from_secs(expires_in_secs);
        let expires_at = Instant::now() + lifetime.saturating_sub(REFRESH_MARGIN);

        *slot = Some(CachedToken {
            token: token.clone(),
            expires_at,
        });

        Ok(token)
    }

    /// Drop the cached token, forcing a refresh on the next call
    pub async fn invalidate(&self) {
        *self.slot.lock().await = None;
    }
}
