pub mod api;
pub mod config;
mod error;

pub use api::{Client, Command, CommandResponse, Vehicle, VehiclesOptions};
pub use config::{Config, Validate};
pub use error::{Error, Result};
