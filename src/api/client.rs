use std::{fmt, sync::Arc};

use super::{BearerToken, Cognito, CredentialExchanger, ReqwestTransport, Session, Transport};
use crate::{config, Config, Result};

/// A client for the vehicle cloud API.
///
/// A new client holds no session; [`Client::login`] (or [`Client::create`])
/// exchanges the configured credentials for a token, which every other
/// operation presents. Tokens are never refreshed, so a long-lived client
/// must log in again when the vendor stops accepting its token.
pub struct Client {
    credentials: config::Credentials,
    pub(crate) api: config::Api,
    exchanger: Arc<dyn CredentialExchanger>,
    pub(crate) transport: Arc<dyn Transport>,
    pub(crate) session: Session,
}

impl Client {
    /// Build a client that talks to the configured endpoints over reqwest.
    pub fn new(config: Config) -> Result<Self> {
        let transport: Arc<dyn Transport> = Arc::new(ReqwestTransport::new(&config.api)?);
        let exchanger = Arc::new(Cognito::new(transport.clone(), &config.identity));
        Ok(Self::with_collaborators(
            config.credentials,
            config.api,
            exchanger,
            transport,
        ))
    }

    /// Build a client and log in.
    pub async fn create(config: Config) -> Result<Self> {
        let mut client = Self::new(config)?;
        client.login().await?;
        Ok(client)
    }

    pub fn with_collaborators(
        credentials: config::Credentials,
        api: config::Api,
        exchanger: Arc<dyn CredentialExchanger>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            credentials,
            api,
            exchanger,
            transport,
            session: Session::default(),
        }
    }

    /// Exchange the credentials for a new token and replace the session.
    /// On failure the previous session is kept.
    #[tracing::instrument(skip(self), fields(username = %self.credentials.username))]
    pub async fn login(&mut self) -> Result<()> {
        let token = self
            .exchanger
            .exchange(&self.credentials.username, &self.credentials.password)
            .await?;

        let token = BearerToken::new(token);
        tracing::info!(issued_at = %token.issued_at(), "logged in");
        self.session = Session::authenticated(token);

        Ok(())
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}/{}", self.api.base_url.trim_end_matches('/'), path)
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("credentials", &self.credentials)
            .field("api", &self.api)
            .field("session", &self.session)
            .finish()
    }
}
