use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Method;
use serde::Deserialize;
use serde_json::json;

use super::{HttpRequest, Transport};
use crate::{config, Error, Result};

static INITIATE_AUTH_TARGET: &str = "AWSCognitoIdentityProviderService.InitiateAuth";
static AMZ_JSON: &str = "application/x-amz-json-1.1";

/// Exchanges a username and password for a bearer token.
#[async_trait]
pub trait CredentialExchanger: Send + Sync {
    async fn exchange(&self, username: &str, password: &str) -> Result<String>;
}

/// Password authentication against a Cognito user pool app client.
pub struct Cognito {
    transport: Arc<dyn Transport>,
    endpoint: String,
    client_id: String,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct InitiateAuthResponse {
    authentication_result: Option<AuthenticationResult>,
    challenge_name: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AuthenticationResult {
    access_token: Option<String>,
    expires_in: Option<i64>,
    token_type: Option<String>,
}

impl std::fmt::Debug for AuthenticationResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthenticationResult")
            .field("has_access_token", &self.access_token.is_some())
            .field("expires_in", &self.expires_in)
            .field("token_type", &self.token_type)
            .finish()
    }
}

#[derive(Deserialize, Debug, Default)]
struct ErrorResponse {
    #[serde(rename = "__type")]
    kind: Option<String>,
    #[serde(alias = "Message")]
    message: Option<String>,
}

impl Cognito {
    pub fn new(transport: Arc<dyn Transport>, identity: &config::Identity) -> Self {
        Self {
            transport,
            endpoint: identity.endpoint(),
            client_id: identity.client_id.clone(),
        }
    }
}

#[async_trait]
impl CredentialExchanger for Cognito {
    #[tracing::instrument(skip(self, password))]
    async fn exchange(&self, username: &str, password: &str) -> Result<String> {
        let request = HttpRequest::new(Method::POST, self.endpoint.as_str())
            .header("X-Amz-Target", INITIATE_AUTH_TARGET)
            .header("Content-Type", AMZ_JSON)
            .json(json!({
                "AuthFlow": "USER_PASSWORD_AUTH",
                "ClientId": self.client_id,
                "AuthParameters": {
                    "USERNAME": username,
                    "PASSWORD": password,
                },
            }));

        let rsp = self
            .transport
            .send(request)
            .await
            .map_err(|e| Error::authentication(e.to_string()))?;

        if !rsp.status.is_success() {
            let ErrorResponse { kind, message } =
                serde_json::from_str(&rsp.body).unwrap_or_default();
            let message = match (kind, message) {
                (Some(kind), Some(message)) => format!("{}: {}", kind, message),
                (Some(kind), None) => kind,
                (None, Some(message)) => message,
                (None, None) => format!("identity provider returned {}", rsp.status),
            };
            tracing::debug!(status = ?rsp.status, %message, "credential exchange rejected");
            return Err(Error::authentication(message));
        }

        let parsed: InitiateAuthResponse = serde_json::from_str(&rsp.body)
            .map_err(|e| Error::authentication(format!("malformed response: {}", e)))?;
        tracing::debug!(?parsed);

        match parsed {
            InitiateAuthResponse {
                authentication_result:
                    Some(AuthenticationResult {
                        access_token: Some(token),
                        ..
                    }),
                ..
            } => Ok(token),
            InitiateAuthResponse {
                challenge_name: Some(challenge),
                ..
            } => Err(Error::authentication(format!(
                "unsupported challenge {}",
                challenge
            ))),
            _ => Err(Error::authentication("missing access token")),
        }
    }
}
