//! Simulated hardware and payment operations.
//!
//! Every operation sleeps for its configured delay and then succeeds.
//! There is no partial failure and nothing can be cancelled once started.

use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::catalog::{mock_devices, AccessLog, BluetoothDevice, GateCommand};
use crate::error::{Result, ValidationError};
use crate::events::Event;
use crate::storage::SimulationConfig;
use crate::wallet::{CardDetails, SavedCard, Wallet};

#[derive(Debug, Clone)]
pub struct Simulator {
    config: SimulationConfig,
}

impl Simulator {
    pub fn new(config: &SimulationConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    async fn delay(ms: u64) {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }

    pub async fn scan_for_devices(&self) -> Vec<BluetoothDevice> {
        Self::delay(self.config.device_scan_ms).await;
        let devices = mock_devices();
        tracing::debug!(count = devices.len(), "device scan finished");
        devices
    }

    pub async fn connect_to_device(&self, device_id: &str) -> bool {
        Self::delay(self.config.device_connect_ms).await;
        tracing::debug!(device_id, "device connected");
        true
    }

    pub async fn disconnect_from_device(&self, device_id: &str) -> bool {
        Self::delay(self.config.device_disconnect_ms).await;
        tracing::debug!(device_id, "device disconnected");
        true
    }

    pub async fn send_gate_command(&self, device_id: &str, command: GateCommand) -> bool {
        Self::delay(self.config.gate_command_ms).await;
        tracing::debug!(device_id, ?command, "gate command sent");
        true
    }

    pub async fn authorize_payment(&self, amount: f64) -> bool {
        Self::delay(self.config.payment_authorize_ms).await;
        tracing::debug!(amount, "payment authorized");
        true
    }

    /// Validate first; a rejected card returns without waiting.
    pub async fn add_card(
        &self,
        wallet: &mut Wallet,
        details: &CardDetails,
        make_default: bool,
    ) -> Result<SavedCard, ValidationError> {
        details.validate()?;
        Self::delay(self.config.card_add_ms).await;
        let id = format!("card-{}", Utc::now().timestamp_millis());
        wallet.add(id, details, make_default).cloned()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GateStatus {
    Open,
    Closed,
}

/// Scanner plus gate panel: the devices from the last scan, the one that
/// is connected, and the access log kept for this panel.
pub struct GatePanel {
    sim: Simulator,
    devices: Vec<BluetoothDevice>,
    connected: Option<BluetoothDevice>,
    gate: GateStatus,
    log: Vec<AccessLog>,
}

impl GatePanel {
    pub fn new(sim: Simulator, log: Vec<AccessLog>) -> Self {
        Self {
            sim,
            devices: Vec::new(),
            connected: None,
            gate: GateStatus::Closed,
            log,
        }
    }

    pub fn devices(&self) -> &[BluetoothDevice] {
        &self.devices
    }

    pub fn connected(&self) -> Option<&BluetoothDevice> {
        self.connected.as_ref()
    }

    pub fn gate_status(&self) -> GateStatus {
        self.gate
    }

    /// Newest first.
    pub fn access_log(&self) -> &[AccessLog] {
        &self.log
    }

    pub async fn scan(&mut self) -> Event {
        self.devices.clear();
        self.devices = self.sim.scan_for_devices().await;
        Event::DevicesDiscovered {
            count: self.devices.len(),
            at: Utc::now(),
        }
    }

    /// Connect to a device from the last scan.
    pub async fn connect(&mut self, device_id: &str) -> Result<Event> {
        let device = self
            .devices
            .iter()
            .find(|d| d.id == device_id)
            .cloned()
            .ok_or_else(|| ValidationError::InvalidValue {
                field: "device",
                message: format!("device '{device_id}' was not found by the last scan"),
            })?;
        if self.sim.connect_to_device(device_id).await {
            self.connected = Some(BluetoothDevice {
                connected: true,
                ..device
            });
        }
        Ok(Event::DeviceConnected {
            device_id: device_id.to_string(),
            at: Utc::now(),
        })
    }

    pub async fn disconnect(&mut self) -> Option<Event> {
        let device = self.connected.take()?;
        self.sim.disconnect_from_device(&device.id).await;
        Some(Event::DeviceDisconnected {
            device_id: device.id,
            at: Utc::now(),
        })
    }

    /// Send a command to the connected gate and record it in the log.
    pub async fn command(&mut self, command: GateCommand) -> Result<Event> {
        let device = self
            .connected
            .clone()
            .ok_or(ValidationError::MissingField { field: "Connected device" })?;
        let success = self.sim.send_gate_command(&device.id, command).await;
        if success {
            self.gate = match command {
                GateCommand::Open => GateStatus::Open,
                GateCommand::Close => GateStatus::Closed,
            };
        } else {
            tracing::warn!(device_id = %device.id, ?command, "gate command failed");
        }
        let at = Utc::now();
        self.log.insert(
            0,
            AccessLog {
                id: at.timestamp_millis().to_string(),
                action: command,
                timestamp: at,
                device: device.name.clone(),
                success,
            },
        );
        Ok(Event::GateCommandSent {
            device_id: device.id,
            command,
            success,
            at,
        })
    }
}
