use aws_lambda_events::apigw::ApiGatewayCustomAuthorizerRequest;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::{
    error::{EventError, HandlerError},
    policy::{build_policy, AuthorizerResponse},
    secrets::SecretResolver,
    verifier::TokenVerifier,
};

const BEARER_SCHEME: &str = "Bearer";

/// TOKEN authorizer event delivered by the API gateway.
pub type AuthorizerEvent = ApiGatewayCustomAuthorizerRequest;

/// Splits on a single space: the first field must be exactly `Bearer`, the second is the token.
pub fn extract_bearer(authorization: Option<&str>) -> Result<&str, EventError> {
    let authorization = authorization.ok_or(EventError::MissingToken)?;
    let mut fields = authorization.split(' ');
    match (fields.next(), fields.next()) {
        (Some(BEARER_SCHEME), Some(token)) if !token.is_empty() => Ok(token),
        (Some(BEARER_SCHEME), _) => Err(EventError::EmptyToken),
        _ => Err(EventError::InvalidScheme),
    }
}

/// Per invocation orchestration: secret, then verification, then policy.
#[derive(Clone)]
pub struct GatewayAuthorizer {
    secrets: SecretResolver,
    verifier: TokenVerifier,
}

impl GatewayAuthorizer {
    pub fn new(secrets: SecretResolver, verifier: TokenVerifier) -> Self {
        GatewayAuthorizer { secrets, verifier }
    }

    /// Returns an allow or deny policy for `event.methodArn`.
    ///
    /// Only a secret store failure is surfaced as an error.
    pub async fn handle(&self, event: AuthorizerEvent) -> Result<AuthorizerResponse, HandlerError> {
        let method_arn = event.method_arn.as_deref().unwrap_or_default();
        info!(method_arn, "authorizer invoked");

        let token = match event
            .method_arn
            .as_ref()
            .ok_or(EventError::MissingMethodArn)
            .and_then(|_| extract_bearer(event.authorization_token.as_deref()))
        {
            Ok(token) => token,
            Err(err) => {
                info!("malformed authorization event: {}", err);
                return Ok(build_policy(false, method_arn));
            }
        };

        info!(secret = %self.secrets.secret_name(), "fetching secret");
        let secrets = self.secrets.resolve().await?;
        info!(audience = %secrets.audience, "secret fetched");

        debug!("validating token");
        let verdict = self.verifier.verify(token, &secrets.audience).await;
        info!(verdict, "token validated");

        Ok(build_policy(verdict, method_arn))
    }

    /// Same as [`handle`](Self::handle) for a raw payload: a payload that does not decode
    /// as an event (e.g. a non-string `authorizationToken`) is denied.
    pub async fn handle_value(&self, payload: Value) -> Result<AuthorizerResponse, HandlerError> {
        match AuthorizerEvent::deserialize(&payload) {
            Ok(event) => self.handle(event).await,
            Err(err) => {
                let method_arn = payload.get("methodArn").and_then(Value::as_str).unwrap_or_default();
                info!(method_arn, "undecodable authorization event: {}", err);
                Ok(build_policy(false, method_arn))
            }
        }
    }
}
