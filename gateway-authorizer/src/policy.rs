use serde::{Deserialize, Serialize};

pub const POLICY_VERSION: &str = "2012-10-17";
pub const INVOKE_ACTION: &str = "execute-api:Invoke";
/// No identity is extracted from the token.
pub const PRINCIPAL_ID: &str = "user";

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    Allow,
    Deny,
}

impl From<bool> for Effect {
    fn from(verdict: bool) -> Self {
        if verdict {
            Effect::Allow
        } else {
            Effect::Deny
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyStatement {
    pub action: String,
    pub effect: Effect,
    pub resource: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyDocument {
    pub version: String,
    pub statement: Vec<PolicyStatement>,
}

/// Custom authorizer response consumed by the API gateway.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizerResponse {
    pub principal_id: String,
    pub policy_document: PolicyDocument,
}

impl AuthorizerResponse {
    pub fn effect(&self) -> Option<Effect> {
        self.policy_document.statement.first().map(|s| s.effect)
    }
}

/// Builds the policy granting or denying `execute-api:Invoke` on `resource`.
pub fn build_policy(verdict: bool, resource: &str) -> AuthorizerResponse {
    AuthorizerResponse {
        principal_id: PRINCIPAL_ID.to_owned(),
        policy_document: PolicyDocument {
            version: POLICY_VERSION.to_owned(),
            statement: vec![PolicyStatement {
                action: INVOKE_ACTION.to_owned(),
                effect: verdict.into(),
                resource: resource.to_owned(),
            }],
        },
    }
}
