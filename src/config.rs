use anyhow::{anyhow, Error};
use serde::{Deserialize, Serialize};

pub static USERNAME_VAR: &str = "VEHICLE_REMOTE_USERNAME";
pub static PASSWORD_VAR: &str = "VEHICLE_REMOTE_PASSWORD";

pub trait Validate: Sized {
    fn validate(self) -> Result<Self, Error>;
}

#[derive(Default, Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Config {
    pub credentials: Credentials,
    pub identity: Identity,
    pub api: Api,
}

#[derive(Serialize, Deserialize, Clone, Eq, PartialEq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// The Cognito user pool app client used for the password exchange.
#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq)]
pub struct Identity {
    pub region: String,
    pub client_id: String,
    /// Overrides `https://cognito-idp.<region>.amazonaws.com/`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq)]
pub struct Api {
    pub base_url: String,
    /// Page size used when fetching every vehicle on the account.
    pub page_limit: usize,
    pub user_agent: String,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
}

impl Config {
    /// Replace the configured credentials with the ones from the process
    /// environment, where set.
    pub fn with_env_credentials(mut self) -> Self {
        if let Ok(username) = std::env::var(USERNAME_VAR) {
            self.credentials.username = username;
        }
        if let Ok(password) = std::env::var(PASSWORD_VAR) {
            self.credentials.password = password;
        }
        self
    }
}

impl Identity {
    pub fn endpoint(&self) -> String {
        self.endpoint
            .clone()
            .unwrap_or_else(|| format!("https://cognito-idp.{}.amazonaws.com/", self.region))
    }
}

impl Validate for Config {
    fn validate(self) -> Result<Self, Error> {
        Ok(Self {
            credentials: self.credentials.validate()?,
            identity: self.identity.validate()?,
            api: self.api.validate()?,
        })
    }
}

impl Validate for Credentials {
    fn validate(self) -> Result<Self, Error> {
        if self == Self::default() {
            return Err(anyhow!(
                "credentials must be changed from default values (or set {} and {})",
                USERNAME_VAR,
                PASSWORD_VAR,
            ));
        }
        if self.username.is_empty() || self.password.is_empty() {
            return Err(anyhow!("username and password must be non-empty"));
        }
        Ok(self)
    }
}

impl Validate for Identity {
    fn validate(self) -> Result<Self, Error> {
        if self.client_id == Self::default().client_id || self.client_id.is_empty() {
            return Err(anyhow!("identity client_id must be set"));
        }
        if self.region.is_empty() {
            return Err(anyhow!("identity region must be set"));
        }
        Ok(self)
    }
}

impl Validate for Api {
    fn validate(self) -> Result<Self, Error> {
        if self.page_limit == 0 {
            return Err(anyhow!("page_limit must be at least 1"));
        }
        reqwest::Url::parse(&self.base_url)
            .map_err(|e| anyhow!("invalid base_url {:?}: {}", self.base_url, e))?;
        Ok(self)
    }
}

// Never print the password.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl Default for Credentials {
    fn default() -> Self {
        Credentials {
            username: "your_username".to_string(),
            password: "your_password".to_string(),
        }
    }
}

impl Default for Identity {
    fn default() -> Self {
        Identity {
            region: "us-east-1".to_string(),
            client_id: "your_cognito_client_id".to_string(),
            endpoint: None,
        }
    }
}

impl Default for Api {
    fn default() -> Self {
        Api {
            base_url: "https://www.vcp.cloud".to_string(),
            page_limit: 100,
            user_agent: concat!("vehicle-remote/", env!("CARGO_PKG_VERSION")).to_string(),
            connect_timeout_secs: 10,
            request_timeout_secs: 30,
        }
    }
}
