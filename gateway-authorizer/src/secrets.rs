use std::sync::Arc;

use async_trait::async_trait;
use aws_sdk_secretsmanager::{
    error::{DisplayErrorContext, ProvideErrorMetadata, SdkError},
    operation::get_secret_value::GetSecretValueError,
};
use serde::Deserialize;
use tracing::{debug, error};

use crate::error::SecretError;

/// Read access to a managed secret store, by logical secret name.
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Returns the secret's string payload.
    async fn secret_string(&self, name: &str) -> Result<String, SecretError>;
}

/// AWS Secrets Manager backed store.
#[derive(Clone)]
pub struct AwsSecretsManager {
    client: aws_sdk_secretsmanager::Client,
}

impl AwsSecretsManager {
    pub fn new(client: aws_sdk_secretsmanager::Client) -> Self {
        AwsSecretsManager { client }
    }
}

#[async_trait]
impl SecretStore for AwsSecretsManager {
    async fn secret_string(&self, name: &str) -> Result<String, SecretError> {
        let output = self
            .client
            .get_secret_value()
            .secret_id(name)
            .send()
            .await
            .map_err(|err| store_error(name, err))?;

        output
            .secret_string()
            .map(str::to_owned)
            .ok_or_else(|| SecretError::Malformed {
                name: name.to_owned(),
                reason: "no string payload".to_owned(),
            })
    }
}

/// Service errors are classified by code; anything else (dispatch, timeout, response)
/// keeps its whole source chain.
fn store_error<R>(name: &str, err: SdkError<GetSecretValueError, R>) -> SecretError
where
    R: std::fmt::Debug + Send + Sync + 'static,
{
    match err.as_service_error() {
        Some(service) if service.is_resource_not_found_exception() => SecretError::NotFound(name.to_owned()),
        Some(service) if service.code() == Some("AccessDeniedException") => SecretError::AccessDenied(name.to_owned()),
        _ => SecretError::Store(DisplayErrorContext(&err).to_string()),
    }
}

#[derive(Deserialize)]
struct SecretRecord {
    #[serde(rename = "aad-client-id")]
    client_id: String,
    #[serde(rename = "aad-client-secret")]
    client_secret: Option<String>,
}

/// Verifier configuration projected from the secret record.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthorizerSecrets {
    pub audience: String,
    pub azure_client_id: String,
    pub azure_client_secret: Option<String>,
}

impl std::fmt::Debug for AuthorizerSecrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthorizerSecrets")
            .field("audience", &self.audience)
            .field("azure_client_id", &self.azure_client_id)
            .field("azure_client_secret", &self.azure_client_secret.as_ref().map(|_| "***"))
            .finish()
    }
}

/// `api://<client id>`
pub fn audience_for(client_id: &str) -> String {
    format!("api://{client_id}")
}

impl AuthorizerSecrets {
    /// Parses the secret payload, which must be a JSON object carrying `aad-client-id`.
    pub fn from_payload(name: &str, payload: &str) -> Result<Self, SecretError> {
        let record: SecretRecord = serde_json::from_str(payload).map_err(|err| SecretError::Malformed {
            name: name.to_owned(),
            reason: err.to_string(),
        })?;

        Ok(AuthorizerSecrets {
            audience: audience_for(&record.client_id),
            azure_client_id: record.client_id,
            azure_client_secret: record.client_secret,
        })
    }
}

/// Reads the configured secret and projects it into the expected audience.
#[derive(Clone)]
pub struct SecretResolver {
    store: Arc<dyn SecretStore>,
    secret_name: String,
}

impl SecretResolver {
    pub fn new(store: Arc<dyn SecretStore>, secret_name: impl Into<String>) -> Self {
        SecretResolver {
            store,
            secret_name: secret_name.into(),
        }
    }

    pub fn secret_name(&self) -> &str {
        &self.secret_name
    }

    pub async fn resolve(&self) -> Result<AuthorizerSecrets, SecretError> {
        let payload = self.store.secret_string(&self.secret_name).await.map_err(|err| {
            error!(secret = %self.secret_name, "secret retrieval failed: {}", err);
            err
        })?;

        let secrets = AuthorizerSecrets::from_payload(&self.secret_name, &payload).map_err(|err| {
            error!(secret = %self.secret_name, "{}", err);
            err
        })?;
        debug!(audience = %secrets.audience, "secret resolved");

        Ok(secrets)
    }
}
