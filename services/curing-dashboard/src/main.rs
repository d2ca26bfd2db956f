//! Curing dashboard CLI
//!
//! Runs the polling dashboard, or a single action against the backend.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use curing_dashboard::model::{
    HeaterCommand, PumpCommand, DEFAULT_HEATER_TARGET, DEFAULT_PUMP_DURATION_SECS,
};
use curing_dashboard::state::DeviceRefresh;
use curing_dashboard::view::{NotificationListView, EMPTY_NOTIFICATIONS};
use curing_dashboard::{load_config, poller, Config, Dashboard};
use tracing::Level;

#[derive(Parser)]
#[command(name = "curing-dashboard")]
#[command(about = "Polling dashboard for the concrete curing backend")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Backend base URL (overrides config file)
    #[arg(long)]
    backend_url: Option<String>,

    /// Dashboard port (overrides config file)
    #[arg(long)]
    port: Option<u16>,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: Level,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Print the current state of all four devices
    Status,
    /// List notifications
    Notifications,
    /// Acknowledge a notification
    Ack { id: u64 },
    /// Delete a notification
    Delete { id: u64 },
    /// Mark every notification read
    ReadAll,
    /// Delete read notifications
    ClearRead,
    /// Delete every notification
    ClearAll,
    /// Control the pump
    Pump {
        #[command(subcommand)]
        action: PumpAction,
    },
    /// Control the heater
    Heater {
        #[command(subcommand)]
        action: HeaterAction,
    },
}

#[derive(Subcommand)]
enum PumpAction {
    Start {
        /// Run time in seconds
        #[arg(long, default_value_t = DEFAULT_PUMP_DURATION_SECS)]
        duration: u64,
    },
    Stop,
}

#[derive(Subcommand)]
enum HeaterAction {
    Start {
        /// Target temperature in °C
        #[arg(long, default_value_t = DEFAULT_HEATER_TARGET)]
        target: f64,
    },
    Stop,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .init();

    tracing::debug!(
        "Parsed command line arguments: config={:?}, backend_url={:?}, port={:?}, log_level={:?}",
        args.config,
        args.backend_url,
        args.port,
        args.log_level
    );

    let mut config = if let Some(config_path) = &args.config {
        tracing::debug!("Loading configuration from {:?}", config_path);
        load_config(config_path)?
    } else {
        tracing::debug!("Using default configuration");
        Config::default()
    };

    if let Some(backend_url) = args.backend_url {
        config.backend.base_url = backend_url;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    match args.command {
        None => {
            tracing::info!("Starting curing dashboard");
            curing_dashboard::run(config).await?;
        }
        Some(command) => run_command(Dashboard::connect(config)?, command).await?,
    }

    Ok(())
}

async fn run_command(dashboard: Dashboard, command: Command) -> curing_dashboard::Result<()> {
    let notifications = &dashboard.notifications;
    match command {
        Command::Status => print_status(&dashboard).await,
        Command::Notifications => {
            notifications.reload().await?;
            print_notifications(&dashboard).await;
        }
        Command::Ack { id } => {
            notifications.acknowledge(id).await?;
            println!("Notification {} acknowledged", id);
        }
        Command::Delete { id } => {
            notifications.delete(id).await?;
            println!("Notification {} deleted", id);
        }
        Command::ReadAll => {
            notifications.mark_all_read().await?;
            println!("All notifications marked read");
        }
        Command::ClearRead => {
            notifications.clear_read().await?;
            println!("Read notifications deleted");
        }
        Command::ClearAll => {
            notifications.clear_all().await?;
            println!("All notifications deleted");
        }
        Command::Pump { action } => {
            let command = match action {
                PumpAction::Start { duration } => PumpCommand::Start {
                    duration_secs: duration,
                },
                PumpAction::Stop => PumpCommand::Stop,
            };
            let response = dashboard.backend.control_pump(command).await?;
            print_control("Pump", response.success, &response.message);
        }
        Command::Heater { action } => {
            let command = match action {
                HeaterAction::Start { target } => HeaterCommand::Start {
                    target_temperature: target,
                },
                HeaterAction::Stop => HeaterCommand::Stop,
            };
            let response = dashboard.backend.control_heater(command).await?;
            print_control("Heater", response.success, &response.message);
        }
    }
    Ok(())
}

async fn print_status(dashboard: &Dashboard) {
    let refresh =
        poller::fetch_devices(&dashboard.backend, dashboard.config.backend.device_source).await;
    if refresh == DeviceRefresh::Unreachable {
        println!("Backend {} unreachable", dashboard.backend.base_url());
    }
    dashboard.view.write().await.apply_devices(refresh, 0);

    let view = dashboard.view.read().await;
    let d = &view.devices;
    println!("{}", view.connection.label());
    println!(
        "Beton:    {} {} battery {}",
        d.beton.temperature, d.beton.humidity, d.beton.battery.text
    );
    println!(
        "Povrsina: {} {} battery {}",
        d.povrsina.temperature, d.povrsina.humidity, d.povrsina.battery.text
    );
    println!(
        "Pumpa:    {} {} battery {}",
        d.pump.label, d.pump.detail, d.pump.battery.text
    );
    println!(
        "Grijac:   {} {} battery {}",
        d.heater.label, d.heater.detail, d.heater.battery.text
    );
}

async fn print_notifications(dashboard: &Dashboard) {
    let view = dashboard.view.read().await;
    match &view.inbox {
        NotificationListView::Empty => println!("{}", EMPTY_NOTIFICATIONS),
        NotificationListView::Items(items) => {
            for item in items {
                let mark = if item.acknowledged { " " } else { "*" };
                println!(
                    "{} #{:<5} {:<8} {} {}",
                    mark,
                    item.id,
                    item.severity.to_string(),
                    item.time,
                    item.message
                );
            }
            println!("{} unread", view.badge.count);
        }
    }
}

fn print_control(device: &str, success: bool, message: &str) {
    let status = if success { "OK" } else { "Rejected" };
    if message.is_empty() {
        println!("{}: {}", device, status);
    } else {
        println!("{}: {} ({})", device, status, message);
    }
}
