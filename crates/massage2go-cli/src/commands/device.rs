use chrono::Utc;
use clap::{Subcommand, ValueEnum};
use massage2go_core::catalog::{mock_access_logs, GateCommand};
use massage2go_core::sim::{GatePanel, Simulator};
use massage2go_core::Config;
use serde_json::json;

use super::{block_on, print_json, print_json_line, CliResult};

#[derive(Clone, Copy, ValueEnum)]
pub enum Command {
    Open,
    Close,
}

impl From<Command> for GateCommand {
    fn from(c: Command) -> Self {
        match c {
            Command::Open => GateCommand::Open,
            Command::Close => GateCommand::Close,
        }
    }
}

#[derive(Subcommand)]
pub enum DeviceAction {
    /// Scan for nearby devices
    Scan,
    /// Scan, connect to a gate and send it a command
    Gate {
        /// Device id from a scan
        device: String,
        command: Command,
    },
    /// Show the gate access history
    Logs,
}

pub fn run(action: DeviceAction) -> CliResult {
    let config = Config::load_or_default();
    let sim = Simulator::new(&config.simulation);

    match action {
        DeviceAction::Scan => {
            let devices = block_on(sim.scan_for_devices())?;
            let rows: Vec<_> = devices
                .iter()
                .map(|d| {
                    json!({
                        "id": d.id,
                        "name": d.name,
                        "type": d.device_type,
                        "rssi": d.rssi,
                        "signal": d.signal_strength(),
                    })
                })
                .collect();
            print_json(&rows)?;
        }
        DeviceAction::Gate { device, command } => {
            let mut panel = GatePanel::new(sim, mock_access_logs(Utc::now()));
            block_on(async {
                print_json_line(&panel.scan().await)?;
                print_json_line(&panel.connect(&device).await?)?;
                print_json_line(&panel.command(command.into()).await?)?;
                if let Some(event) = panel.disconnect().await {
                    print_json_line(&event)?;
                }
                Ok::<_, Box<dyn std::error::Error>>(())
            })??;
            print_json(&json!({
                "gate": panel.gate_status(),
                "log": panel.access_log(),
            }))?;
        }
        DeviceAction::Logs => print_json(&mock_access_logs(Utc::now()))?,
    }
    Ok(())
}
