use jsonwebtoken::{jwk::JwkSet, Header};
use std::{
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::error::{AuthError, RefreshError};

use super::{KeyData, KeySet};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RefreshStrategy {
    /// when kid not found in the store
    KeyNotFound,

    /// load once triggered by the first use
    NoRefresh,
}

/// JWKS Refresh configuration
#[derive(Clone, Copy, Debug)]
pub struct Refresh {
    pub strategy: RefreshStrategy,
    // don't refresh before (counting from the last refresh, when the kid not found)
    pub minimal_refresh_interval: Duration,
    // don't refresh before (after an error or jwks unavailable)
    pub retry_interval: Duration,
}

impl Default for Refresh {
    fn default() -> Self {
        Self {
            strategy: RefreshStrategy::KeyNotFound,
            minimal_refresh_interval: Duration::ZERO,
            retry_interval: Duration::ZERO,
        }
    }
}

/// Key-set client: resolves key ids against the provider's JWKS endpoint.
///
/// Keys stay cached for the life of the process; a miss triggers a single fetch.
#[derive(Clone)]
pub struct KeyStoreManager {
    key_url: String,
    client: reqwest::Client,
    refresh: Refresh,
    keystore: Arc<Mutex<KeyStore>>,
}

pub struct KeyStore {
    /// key set
    keys: KeySet,
    /// time of the last successfully loaded jwkset
    load_time: Option<Instant>,
    /// time of the last failed load
    fail_time: Option<Instant>,
}

impl KeyStoreManager {
    pub fn new(url: &str, client: reqwest::Client, refresh: Refresh) -> KeyStoreManager {
        KeyStoreManager {
            key_url: url.to_owned(),
            client,
            refresh,
            keystore: Arc::new(Mutex::new(KeyStore {
                keys: KeySet::default(),
                load_time: None,
                fail_time: None,
            })),
        }
    }

    pub(crate) async fn get_key(&self, header: &Header) -> Result<Arc<KeyData>, AuthError> {
        let kid = header.kid.as_deref().ok_or(AuthError::MissingKid())?;

        let mut ks_guard = self.keystore.lock().await;
        if let Some(key) = ks_guard.keys.find_kid(kid) {
            return Ok(key.clone());
        }

        let may_refresh = match self.refresh.strategy {
            RefreshStrategy::KeyNotFound => {
                ks_guard.can_refresh(self.refresh.minimal_refresh_interval, self.refresh.retry_interval)
            }
            RefreshStrategy::NoRefresh => ks_guard.load_time.is_none(),
        };
        if !may_refresh {
            debug!(kid, "key not cached, refresh not allowed yet");
            return Err(AuthError::KeyNotFound(kid.to_owned()));
        }

        ks_guard
            .refresh(&self.client, &self.key_url)
            .await
            .map_err(AuthError::KeyFetch)?;
        ks_guard
            .keys
            .find_kid(kid)
            .cloned()
            .ok_or_else(|| AuthError::KeyNotFound(kid.to_owned()))
    }
}

async fn fetch_jwks(client: &reqwest::Client, key_url: &str) -> Result<JwkSet, RefreshError> {
    let response = client.get(key_url).send().await.map_err(RefreshError::Connection)?;
    let status = response.status();
    if !status.is_success() {
        return Err(RefreshError::Status(status));
    }
    let body = response.text().await.map_err(RefreshError::Connection)?;
    serde_json::from_str::<JwkSet>(&body).map_err(|error| RefreshError::Decode { error, body })
}

impl KeyStore {
    fn can_refresh(&self, minimal_refresh_interval: Duration, minimal_retry: Duration) -> bool {
        if let Some(fail_tm) = self.fail_time {
            if let Some(load_tm) = self.load_time {
                fail_tm.elapsed() >= minimal_retry && load_tm.elapsed() >= minimal_refresh_interval
            } else {
                fail_tm.elapsed() >= minimal_retry
            }
        } else if let Some(load_tm) = self.load_time {
            load_tm.elapsed() >= minimal_refresh_interval
        } else {
            true
        }
    }

    /// One fetch attempt; the previous keys are replaced only on success.
    async fn refresh(&mut self, client: &reqwest::Client, key_url: &str) -> Result<(), RefreshError> {
        debug!(key_url, "fetching jwks");
        let fetched = fetch_jwks(client, key_url).await.and_then(|jwks| {
            let keys = KeySet::from(&jwks);
            if keys.is_empty() {
                Err(RefreshError::NoValidKeys)
            } else {
                Ok(keys)
            }
        });

        match fetched {
            Ok(keys) => {
                debug!(count = keys.len(), "jwks loaded");
                self.keys = keys;
                self.load_time = Some(Instant::now());
                Ok(())
            }
            Err(err) => {
                warn!("jwks refresh failed: {}", err);
                self.fail_time = Some(Instant::now());
                Err(err)
            }
        }
    }
}
