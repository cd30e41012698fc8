mod auth;
mod client;
mod command;
mod session;
mod transport;
mod vehicle;

static VEHICLES_PATH: &str = "v1/devices";
static COMMAND_PATH: &str = "v1/devices/command";
// The command endpoint wants the token in its own header, not as a bearer.
static COMMAND_TOKEN_HEADER: &str = "x-access-token";

pub use auth::{Cognito, CredentialExchanger};
pub use client::Client;
pub use command::{Command, CommandResponse};
pub use session::{BearerToken, Session};
pub use transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport};
pub use vehicle::{Vehicle, VehiclePage, VehiclesOptions};
