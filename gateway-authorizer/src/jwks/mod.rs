use std::{str::FromStr, sync::Arc};

use jsonwebtoken::{
    jwk::{AlgorithmParameters, Jwk, JwkSet},
    Algorithm, DecodingKey, Header,
};
use tracing::debug;

use crate::error::{AuthError, InitError};

use self::key_store_manager::KeyStoreManager;

pub mod key_store_manager;

#[derive(Clone)]
pub enum KeySource {
    /// Remote key set, fetched on a key id miss
    KeyStoreSource(KeyStoreManager),
    /// Pinned key set, initialized on startup
    MultiKeySource(KeySet),
}

#[derive(Clone)]
pub struct KeyData {
    pub kid: Option<String>,
    /// valid algorithms
    pub algs: Vec<Algorithm>,
    pub key: DecodingKey,
}

const RSA_ALGS: [Algorithm; 6] = [
    Algorithm::RS256,
    Algorithm::RS384,
    Algorithm::RS512,
    Algorithm::PS256,
    Algorithm::PS384,
    Algorithm::PS512,
];

fn get_valid_algs(key: &Jwk) -> Vec<Algorithm> {
    if let Some(key_alg) = key.common.key_algorithm {
        // if alg is not correct => no valid algs => empty array
        Algorithm::from_str(key_alg.to_string().as_str())
            .ok()
            .filter(|a| RSA_ALGS.contains(a))
            .map_or(vec![], |a| vec![a])
    } else {
        RSA_ALGS.to_vec()
    }
}

impl KeyData {
    /// Materializes the RSA public key from the `n` and `e` parameters.
    /// Any other key type is refused.
    pub fn from_jwk(key: &Jwk) -> Result<KeyData, AuthError> {
        match key.algorithm {
            AlgorithmParameters::RSA(ref rsa) => Ok(KeyData {
                kid: key.common.key_id.clone(),
                algs: get_valid_algs(key),
                key: DecodingKey::from_rsa_components(&rsa.n, &rsa.e)
                    .map_err(|err| AuthError::InvalidKey(err.to_string()))?,
            }),
            _ => Err(AuthError::InvalidKey(format!(
                "key {:?} is not an RSA key",
                key.common.key_id.as_deref().unwrap_or_default()
            ))),
        }
    }
}

#[derive(Clone, Default)]
pub struct KeySet(Vec<Arc<KeyData>>);

impl From<Vec<Arc<KeyData>>> for KeySet {
    fn from(value: Vec<Arc<KeyData>>) -> Self {
        KeySet(value)
    }
}

impl From<&JwkSet> for KeySet {
    /// Keeps the usable RSA keys, skipping the others.
    fn from(jwks: &JwkSet) -> Self {
        jwks.keys
            .iter()
            .filter_map(|jwk| match KeyData::from_jwk(jwk) {
                Ok(k) => Some(Arc::new(k)),
                Err(err) => {
                    debug!("skipping jwk: {}", err);
                    None
                }
            })
            .collect::<Vec<_>>()
            .into()
    }
}

impl KeySet {
    /// Parses a JWKS document held in memory.
    pub fn from_jwks_str(jwks: &str) -> Result<KeySet, InitError> {
        let set: JwkSet = serde_json::from_str(jwks)?;
        Ok(KeySet::from(&set))
    }

    /// Find the key in the set that matches the given key id, if any.
    pub fn find_kid(&self, kid: &str) -> Option<&Arc<KeyData>> {
        self.0.iter().find(|k| match &k.kid {
            Some(k) => k == kid,
            None => false,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub(crate) fn get_key(&self, header: &Header) -> Result<&Arc<KeyData>, AuthError> {
        let kid = header.kid.as_deref().ok_or(AuthError::MissingKid())?;
        self.find_kid(kid).ok_or_else(|| AuthError::KeyNotFound(kid.to_owned()))
    }
}

impl KeySource {
    pub async fn get_key(&self, header: &Header) -> Result<Arc<KeyData>, AuthError> {
        match self {
            KeySource::KeyStoreSource(kstore) => kstore.get_key(header).await,
            KeySource::MultiKeySource(keys) => keys.get_key(header).cloned(),
        }
    }
}
