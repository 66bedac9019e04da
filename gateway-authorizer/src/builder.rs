use std::sync::Arc;

use crate::{
    error::InitError,
    jwks::{key_store_manager::KeyStoreManager, KeySet, KeySource},
    secrets::{SecretResolver, SecretStore},
    validation::Validation,
    verifier::TokenVerifier,
    GatewayAuthorizer, Refresh, RefreshStrategy,
};

enum KeySourceType {
    Jwks(String),
    JwksString(String),
}

/// Gateway authorizer builder
///
/// - key set from a jwks endpoint or a pinned jwks document
/// - secret store and secret name providing the expected audience
pub struct AuthorizerBuilder {
    key_source_type: KeySourceType,
    refresh: Option<Refresh>,
    validation: Option<Validation>,
    http_client: Option<reqwest::Client>,
    secret_name: String,
    secret_store: Arc<dyn SecretStore>,
}

impl AuthorizerBuilder {
    /// Keys fetched from a JWKS endpoint
    pub fn from_jwks_url(url: &str, secret_store: Arc<dyn SecretStore>, secret_name: &str) -> AuthorizerBuilder {
        AuthorizerBuilder {
            key_source_type: KeySourceType::Jwks(url.to_owned()),
            refresh: None,
            validation: None,
            http_client: None,
            secret_name: secret_name.to_owned(),
            secret_store,
        }
    }

    /// Keys pinned from a JWKS document
    pub fn from_jwks_text(jwks: &str, secret_store: Arc<dyn SecretStore>, secret_name: &str) -> AuthorizerBuilder {
        AuthorizerBuilder {
            key_source_type: KeySourceType::JwksString(jwks.to_owned()),
            refresh: None,
            validation: None,
            http_client: None,
            secret_name: secret_name.to_owned(),
            secret_store,
        }
    }

    /// Refresh configuration for the jwk store
    pub fn refresh(mut self, refresh: Refresh) -> AuthorizerBuilder {
        if self.refresh.is_some() {
            tracing::warn!("More than one refresh configuration found!");
        }
        self.refresh = Some(refresh);
        self
    }

    /// no refresh, jwks will be loaded just once
    pub fn no_refresh(mut self) -> AuthorizerBuilder {
        if self.refresh.is_some() {
            tracing::warn!("More than one refresh configuration found!");
        }
        self.refresh = Some(Refresh {
            strategy: RefreshStrategy::NoRefresh,
            ..Default::default()
        });
        self
    }

    pub fn validation(mut self, validation: Validation) -> AuthorizerBuilder {
        self.validation = Some(validation);

        self
    }

    /// http client used for the jwks fetches (default: `reqwest::Client::new()`)
    pub fn http_client(mut self, client: reqwest::Client) -> AuthorizerBuilder {
        self.http_client = Some(client);

        self
    }

    pub fn build(self) -> Result<GatewayAuthorizer, InitError> {
        let key_source = match self.key_source_type {
            KeySourceType::Jwks(url) => {
                let client = match self.http_client {
                    Some(client) => client,
                    None => reqwest::Client::builder().build()?,
                };
                KeySource::KeyStoreSource(KeyStoreManager::new(&url, client, self.refresh.unwrap_or_default()))
            }
            KeySourceType::JwksString(jwks) => KeySource::MultiKeySource(KeySet::from_jwks_str(&jwks)?),
        };

        let verifier = TokenVerifier::new(key_source).validation(self.validation.unwrap_or_default());
        let secrets = SecretResolver::new(self.secret_store, self.secret_name);

        Ok(GatewayAuthorizer::new(secrets, verifier))
    }
}
