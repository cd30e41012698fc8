use std::fmt;

use reqwest::Method;
use serde_json::{json, Value};

use super::{Client, HttpRequest, COMMAND_PATH, COMMAND_TOKEN_HEADER};
use crate::{Error, Result};

/// The command keywords the vendor's command endpoint is known to accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    RemoteStart,
    RemoteStop,
    Arm,
    Disarm,
    Trunk,
    RemoteAux1,
    RemoteAux2,
    Location,
}

impl Command {
    pub fn keyword(self) -> &'static str {
        match self {
            Command::RemoteStart => "remote_start",
            Command::RemoteStop => "remote_stop",
            Command::Arm => "arm",
            Command::Disarm => "disarm",
            Command::Trunk => "trunk",
            Command::RemoteAux1 => "remote_aux1",
            Command::RemoteAux2 => "remote_aux2",
            Command::Location => "location",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A successful reply from the command endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandResponse {
    pub command: String,
    /// The response body, uninterpreted. Non-JSON bodies are kept as a JSON
    /// string and empty bodies become `null`.
    pub body: Value,
}

impl CommandResponse {
    pub fn message(&self) -> String {
        format!("{} command was successful!", self.command)
    }
}

fn opaque_body(body: &str) -> Value {
    if body.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_string()))
}

impl Client {
    /// Send any command keyword to a device. Keywords are not checked
    /// against [`Command`]; the vendor decides what they mean.
    #[tracing::instrument(skip(self))]
    pub async fn send_command(&self, device_key: &str, command: &str) -> Result<CommandResponse> {
        let token = self.session.require()?;

        let request = HttpRequest::new(Method::POST, self.url(COMMAND_PATH))
            .header(COMMAND_TOKEN_HEADER, token)
            .json(json!({
                "deviceKey": device_key,
                "command": command,
            }));

        let rsp = self.transport.send(request).await?;

        if !rsp.status.is_success() {
            metrics::increment_counter!("vehicle_commands_failed", "command" => command.to_string());
            tracing::warn!(status = ?rsp.status, body = %rsp.body, "command rejected");
            return Err(Error::Command {
                command: command.to_string(),
                status: rsp.status,
                body: rsp.body,
            });
        }

        metrics::increment_counter!("vehicle_commands_sent", "command" => command.to_string());
        tracing::debug!(status = ?rsp.status, "command accepted");

        Ok(CommandResponse {
            command: command.to_string(),
            body: opaque_body(&rsp.body),
        })
    }

    async fn control(&self, device_key: &str, command: Command) -> Result<String> {
        Ok(self
            .send_command(device_key, command.keyword())
            .await?
            .message())
    }

    pub async fn start(&self, device_key: &str) -> Result<String> {
        self.control(device_key, Command::RemoteStart).await
    }

    pub async fn stop(&self, device_key: &str) -> Result<String> {
        self.control(device_key, Command::RemoteStop).await
    }

    pub async fn lock(&self, device_key: &str) -> Result<String> {
        self.control(device_key, Command::Arm).await
    }

    pub async fn unlock(&self, device_key: &str) -> Result<String> {
        self.control(device_key, Command::Disarm).await
    }

    pub async fn trunk(&self, device_key: &str) -> Result<String> {
        self.control(device_key, Command::Trunk).await
    }

    pub async fn aux1(&self, device_key: &str) -> Result<String> {
        self.control(device_key, Command::RemoteAux1).await
    }

    pub async fn aux2(&self, device_key: &str) -> Result<String> {
        self.control(device_key, Command::RemoteAux2).await
    }

    /// Ask the vehicle for its location. The reply is returned as the vendor
    /// sent it.
    pub async fn location(&self, device_key: &str) -> Result<Value> {
        Ok(self
            .send_command(device_key, Command::Location.keyword())
            .await?
            .body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords() {
        assert_eq!(Command::RemoteStart.keyword(), "remote_start");
        assert_eq!(Command::RemoteStop.keyword(), "remote_stop");
        assert_eq!(Command::Arm.keyword(), "arm");
        assert_eq!(Command::Disarm.keyword(), "disarm");
        assert_eq!(Command::Trunk.keyword(), "trunk");
        assert_eq!(Command::RemoteAux1.keyword(), "remote_aux1");
        assert_eq!(Command::RemoteAux2.keyword(), "remote_aux2");
        assert_eq!(Command::Location.to_string(), "location");
    }

    #[test]
    fn success_message() {
        let rsp = CommandResponse {
            command: "arm".to_string(),
            body: Value::Null,
        };
        assert_eq!(rsp.message(), "arm command was successful!");
    }

    #[test]
    fn bodies_are_kept_opaque() {
        assert_eq!(opaque_body(""), Value::Null);
        assert_eq!(opaque_body("  \n"), Value::Null);
        assert_eq!(
            opaque_body(r#"{"status":"ok","lat":45.5}"#),
            json!({"status": "ok", "lat": 45.5})
        );
        assert_eq!(opaque_body("queued"), json!("queued"));
    }
}
