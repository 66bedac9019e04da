use chrono::Utc;
use jsonwebtoken::{decode, decode_header, TokenData};
use tracing::{error, info, warn};

use crate::{claims::RegisteredClaims, error::AuthError, jwks::KeySource, validation::Validation};

/// Decides whether a bearer token is valid for an audience.
#[derive(Clone)]
pub struct TokenVerifier {
    key_source: KeySource,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(key_source: KeySource) -> Self {
        TokenVerifier {
            key_source,
            validation: Validation::default(),
        }
    }

    /// Replaces the base validation. The audience is always set per call.
    pub fn validation(mut self, validation: Validation) -> Self {
        self.validation = validation;

        self
    }

    /// Validates the token, returning the reason of a rejection.
    pub async fn check(&self, token: &str, audience: &str) -> Result<TokenData<RegisteredClaims>, AuthError> {
        // header only, the payload is not trusted yet
        let header = decode_header(token).map_err(AuthError::MalformedToken)?;
        if !self.validation.algs.contains(&header.alg) {
            return Err(AuthError::InvalidKeyAlg(header.alg));
        }

        let key = self.key_source.get_key(&header).await?;
        if !key.algs.contains(&header.alg) {
            return Err(AuthError::InvalidKeyAlg(header.alg));
        }

        let validation = self.validation.clone().aud(&[audience]).to_jwt_validation();
        let token_data = decode::<RegisteredClaims>(token, &key.key, &validation)?;

        if !self.validation.validate_exp {
            if let Some(exp) = token_data.claims.exp.filter(|exp| exp.is_before(Utc::now())) {
                warn!(
                    exp = exp.0,
                    expired_at = ?exp.to_datetime(),
                    "accepting expired token, exp validation disabled"
                );
            }
        }

        Ok(token_data)
    }

    /// `true` iff the token is valid; the cause of a rejection is logged, never surfaced.
    pub async fn verify(&self, token: &str, audience: &str) -> bool {
        match self.check(token, audience).await {
            Ok(_) => true,
            Err(err @ AuthError::KeyFetch(_)) => {
                error!("token rejected, key set unavailable: {}", err);
                false
            }
            Err(err) => {
                info!("token rejected: {}", err);
                false
            }
        }
    }
}
