use std::{fs::File, io::prelude::*, path::PathBuf};

use anyhow::Error;
use structopt::StructOpt;

use vehicle_remote::{Client, Config, Validate, VehiclesOptions};

#[derive(Debug, StructOpt)]
struct Opt {
    /// Config file path. Credentials may instead come from
    /// VEHICLE_REMOTE_USERNAME and VEHICLE_REMOTE_PASSWORD.
    #[structopt(short, long, parse(from_os_str))]
    config: Option<PathBuf>,
    /// Command
    #[structopt(subcommand)]
    cmd: Command,
}

#[derive(Debug, StructOpt)]
enum Command {
    /// Generate a default configuration file.
    GenerateConfig {
        /// Output path for default config file
        #[structopt(short, long, parse(from_os_str))]
        output: PathBuf,
    },
    /// List the vehicles on the account.
    Vehicles {
        /// Fetch a single page of this size instead of every vehicle
        #[structopt(short, long)]
        limit: Option<usize>,
        /// Offset of the single page
        #[structopt(short, long, default_value = "0")]
        offset: usize,
    },
    /// Remote start.
    Start { device_key: String },
    /// Remote stop.
    Stop { device_key: String },
    /// Lock (arm).
    Lock { device_key: String },
    /// Unlock (disarm).
    Unlock { device_key: String },
    /// Pop the trunk.
    Trunk { device_key: String },
    /// Auxiliary output 1.
    Aux1 { device_key: String },
    /// Auxiliary output 2.
    Aux2 { device_key: String },
    /// Show the vehicle record for a device.
    Status { device_key: String },
    /// Request the vehicle's location.
    Location { device_key: String },
    /// Send an arbitrary command keyword.
    Send {
        device_key: String,
        keyword: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt::init();

    let opt = Opt::from_args();
    let config = opt.config;
    let message = match opt.cmd {
        Command::GenerateConfig { output } => {
            let config_toml = toml::to_string_pretty(&Config::default())?;
            File::create(&output)?.write_all(config_toml.as_bytes())?;
            format!("wrote default config to {}", output.display())
        }
        Command::Vehicles { limit, offset } => {
            let options = match limit {
                Some(limit) => VehiclesOptions::page(limit, offset),
                None => VehiclesOptions::All,
            };
            let vehicles = connect(config).await?.vehicles(options).await?;
            serde_json::to_string_pretty(&vehicles)?
        }
        Command::Start { device_key } => connect(config).await?.start(&device_key).await?,
        Command::Stop { device_key } => connect(config).await?.stop(&device_key).await?,
        Command::Lock { device_key } => connect(config).await?.lock(&device_key).await?,
        Command::Unlock { device_key } => connect(config).await?.unlock(&device_key).await?,
        Command::Trunk { device_key } => connect(config).await?.trunk(&device_key).await?,
        Command::Aux1 { device_key } => connect(config).await?.aux1(&device_key).await?,
        Command::Aux2 { device_key } => connect(config).await?.aux2(&device_key).await?,
        Command::Status { device_key } => match connect(config).await?.status(&device_key).await? {
            Some(vehicle) => serde_json::to_string_pretty(&vehicle)?,
            None => format!("no vehicle with device key {}", device_key),
        },
        Command::Location { device_key } => {
            let location = connect(config).await?.location(&device_key).await?;
            serde_json::to_string_pretty(&location)?
        }
        Command::Send {
            device_key,
            keyword,
        } => {
            let rsp = connect(config)
                .await?
                .send_command(&device_key, &keyword)
                .await?;
            tracing::info!(body = %rsp.body);
            rsp.message()
        }
    };

    println!("{}", message);
    Ok(())
}

/// Load the config, overlay environment credentials, and log in.
async fn connect(path: Option<PathBuf>) -> Result<Client, Error> {
    let config: Config = match path {
        Some(path) => {
            let mut buf = String::new();
            File::open(path)?.read_to_string(&mut buf)?;
            toml::from_str(&buf)?
        }
        None => Config::default(),
    };

    let config = config.with_env_credentials().validate()?;
    Ok(Client::create(config).await?)
}
