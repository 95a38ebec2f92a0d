//! Command-line client for the controller REST API.
//!
//! Lists and toggles the same devices the web board shows, using an ID
//! token copied from a signed-in browser session.
//!
//! # Usage
//!
//! ```bash
//! # List devices
//! cargo run --bin boardctl -- --controller-id bfd8dd0a devices
//!
//! # Toggle device 5
//! cargo run --bin boardctl -- --controller-id bfd8dd0a toggle 5
//!
//! # Refresh the list every 10 seconds
//! cargo run --bin boardctl -- --controller-id bfd8dd0a watch
//! ```
//!
//! # Environment Variables
//!
//! - `BACKEND_URL`: controller REST API host
//! - `CONTROLLER_ID`: controller to read and write
//! - `CONTROLBOARD_TOKEN`: ID token; prompted for when unset

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Password};
use std::time::Duration;

use controlboard::config::DEFAULT_BACKEND_URL;
use controlboard::prelude::*;

/// CLI client for a remote GPIO controller.
#[derive(Parser)]
#[command(name = "boardctl")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Controller REST API host
    #[arg(long, env = "BACKEND_URL", default_value = DEFAULT_BACKEND_URL)]
    backend_url: String,

    /// Controller to read and write
    #[arg(long, env = "CONTROLLER_ID")]
    controller_id: String,

    /// ID token sent as the Authorization header
    #[arg(long, env = "CONTROLBOARD_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 15)]
    timeout: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the controller's devices
    Devices,

    /// Flip a device on or off
    Toggle {
        /// Device (pin) id
        id: i64,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Keep listing devices until interrupted or the session ends
    Watch {
        /// Seconds between refreshes
        #[arg(short, long, default_value_t = 10)]
        interval: u64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let token = match cli.token {
        Some(token) => token,
        None => Password::new().with_prompt("ID token").interact()?,
    };

    let client = HttpControllerClient::new(&cli.backend_url, Duration::from_secs(cli.timeout))
        .context("Failed to build controller client")?;

    let result = match cli.command {
        Commands::Devices => list_devices(&client, &token, &cli.controller_id).await,
        Commands::Toggle { id, yes } => {
            toggle_device(&client, &token, &cli.controller_id, id, yes).await
        }
        Commands::Watch { interval } => {
            watch_devices(&client, &token, &cli.controller_id, interval).await
        }
    };

    result.map_err(explain)
}

/// Turns controller errors into CLI-friendly messages.
fn explain(err: anyhow::Error) -> anyhow::Error {
    match err.downcast_ref::<ControllerError>() {
        Some(controller_err) if controller_err.forces_logout() => {
            anyhow::anyhow!("Session expired, sign in again and copy a fresh ID token")
        }
        _ => err,
    }
}

async fn fetch_devices(
    client: &HttpControllerClient,
    token: &str,
    controller_id: &str,
) -> Result<DeviceMap> {
    let controller = client.get_controller(token, controller_id).await?;
    Ok(device_map(&controller))
}

/// Prints the device table.
///
/// ```text
///   ID    Name                      Power
///   ────────────────────────────────────────
///   5     Lamp                      ON
/// ```
async fn list_devices(
    client: &HttpControllerClient,
    token: &str,
    controller_id: &str,
) -> Result<()> {
    let devices = fetch_devices(client, token, controller_id).await?;

    println!(
        "{} {}",
        "Controller".bright_blue().bold(),
        controller_id.cyan()
    );
    println!();
    print_devices(&devices);

    Ok(())
}

fn print_devices(devices: &DeviceMap) {
    if devices.is_empty() {
        println!("{}", "  No devices available".yellow());
        return;
    }

    println!(
        "  {:<5} {:<25} {}",
        "ID".bright_white().bold(),
        "Name".bright_white().bold(),
        "Power".bright_white().bold()
    );
    println!("  {}", "─".repeat(40).bright_black());

    let mut sorted: Vec<&Device> = devices.values().collect();
    sorted.sort_by_key(|d| d.device_id);

    for device in sorted {
        let power = if device.power_on {
            "ON".green().bold()
        } else {
            "OFF".bright_black()
        };
        println!(
            "  {:<5} {:<25} {}",
            device.device_id.to_string().bright_black(),
            device.name.cyan(),
            power
        );
    }
}

async fn toggle_device(
    client: &HttpControllerClient,
    token: &str,
    controller_id: &str,
    device_id: i64,
    skip_confirm: bool,
) -> Result<()> {
    let devices = fetch_devices(client, token, controller_id).await?;
    let device = devices
        .get(&device_id.to_string())
        .with_context(|| format!("Device {device_id} is not on controller {controller_id}"))?;

    let target = device.toggled_value();
    println!(
        "  {} {} -> {}",
        device.name.cyan(),
        if device.power_on { "ON" } else { "OFF" },
        if target.is_high() { "ON" } else { "OFF" }
    );

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Toggle this device?")
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "Cancelled".red());
            return Ok(());
        }
    }

    let update = ControllerUpdate::single_pin(controller_id, device_id, target);
    let controller = client.update_controller(token, &update).await?;

    let echoed = device_map(&controller);
    match echoed.get(&device_id.to_string()) {
        Some(updated) if updated.power_on => println!("{}", "Device is now ON".green().bold()),
        Some(_) => println!("{}", "Device is now OFF".bright_white().bold()),
        None => println!("{}", "Update sent".green()),
    }

    Ok(())
}

async fn watch_devices(
    client: &HttpControllerClient,
    token: &str,
    controller_id: &str,
    interval: u64,
) -> Result<()> {
    let every = Duration::from_secs(interval.max(1));

    loop {
        println!(
            "{} {}",
            chrono::Local::now()
                .format("%H:%M:%S")
                .to_string()
                .bright_black(),
            controller_id.cyan()
        );

        match client.get_controller(token, controller_id).await {
            Ok(controller) => print_devices(&device_map(&controller)),
            Err(err) if err.forces_logout() => return Err(err.into()),
            Err(err) => println!("  {}", err.alert_message().red()),
        }
        println!();

        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            _ = tokio::time::sleep(every) => {}
        }
    }

    Ok(())
}
