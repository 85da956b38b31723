//! Mock Bluetooth gate/camera controllers and the gate access log.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceType {
    Gate,
    Camera,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BluetoothDevice {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub device_type: DeviceType,
    /// Received signal strength in dBm.
    pub rssi: i32,
    pub connected: bool,
}

impl BluetoothDevice {
    pub fn signal_strength(&self) -> SignalStrength {
        SignalStrength::from_rssi(self.rssi)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalStrength {
    Poor,
    Fair,
    Good,
    Excellent,
}

impl SignalStrength {
    pub fn from_rssi(rssi: i32) -> Self {
        match rssi {
            r if r >= -50 => SignalStrength::Excellent,
            r if r >= -60 => SignalStrength::Good,
            r if r >= -70 => SignalStrength::Fair,
            _ => SignalStrength::Poor,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GateCommand {
    Open,
    Close,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessLog {
    pub id: String,
    pub action: GateCommand,
    pub timestamp: DateTime<Utc>,
    /// Device display name.
    pub device: String,
    pub success: bool,
}

fn device(id: &str, name: &str, device_type: DeviceType, rssi: i32) -> BluetoothDevice {
    BluetoothDevice {
        id: id.into(),
        name: name.into(),
        device_type,
        rssi,
        connected: false,
    }
}

/// Devices "discovered" by every scan. All start disconnected.
pub fn mock_devices() -> Vec<BluetoothDevice> {
    vec![
        device("sonoff-gate-001", "Dam Safe Main Gate", DeviceType::Gate, -45),
        device("sonoff-gate-002", "Dam Safe Side Gate", DeviceType::Gate, -62),
        device("sonoff-cam-001", "Unit Camera 1", DeviceType::Camera, -55),
    ]
}

pub fn device_by_id(id: &str) -> Option<BluetoothDevice> {
    mock_devices().into_iter().find(|d| d.id == id)
}

/// Access history relative to `now`.
pub fn mock_access_logs(now: DateTime<Utc>) -> Vec<AccessLog> {
    let entry = |id: &str, action, ago: Duration| AccessLog {
        id: id.into(),
        action,
        timestamp: now - ago,
        device: "Dam Safe Main Gate".into(),
        success: true,
    };
    vec![
        entry("1", GateCommand::Open, Duration::hours(2)),
        entry("2", GateCommand::Close, Duration::hours(2) + Duration::minutes(5)),
        entry("3", GateCommand::Open, Duration::hours(24)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signal_buckets() {
        assert_eq!(SignalStrength::from_rssi(-45), SignalStrength::Excellent);
        assert_eq!(SignalStrength::from_rssi(-50), SignalStrength::Excellent);
        assert_eq!(SignalStrength::from_rssi(-55), SignalStrength::Good);
        assert_eq!(SignalStrength::from_rssi(-60), SignalStrength::Good);
        assert_eq!(SignalStrength::from_rssi(-62), SignalStrength::Fair);
        assert_eq!(SignalStrength::from_rssi(-71), SignalStrength::Poor);
    }

    #[test]
    fn devices_start_disconnected() {
        assert!(mock_devices().iter().all(|d| !d.connected));
        assert_eq!(device_by_id("sonoff-cam-001").unwrap().device_type, DeviceType::Camera);
    }

    #[test]
    fn access_logs_are_in_the_past() {
        let now = Utc::now();
        let logs = mock_access_logs(now);
        assert_eq!(logs.len(), 3);
        assert!(logs.iter().all(|l| l.timestamp < now && l.success));
    }
}
