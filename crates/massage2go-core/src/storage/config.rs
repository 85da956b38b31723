//! TOML-based application configuration.
//!
//! Holds every tunable of the simulation:
//! - Delays of the mock device, payment and auth operations
//! - Cadences of the payment, en-route and verification timers
//! - Fallback location, pricing and routing constants
//!
//! Configuration is stored at `<data_dir>/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::data_dir;
use crate::error::{ConfigError, Result};
use crate::geo::{Coordinates, FALLBACK_LOCATION};

/// Delays of the simulated async operations, in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    #[serde(default = "default_scan_ms")]
    pub device_scan_ms: u64,
    #[serde(default = "default_connect_ms")]
    pub device_connect_ms: u64,
    #[serde(default = "default_disconnect_ms")]
    pub device_disconnect_ms: u64,
    #[serde(default = "default_gate_ms")]
    pub gate_command_ms: u64,
    #[serde(default = "default_2000")]
    pub payment_authorize_ms: u64,
    #[serde(default = "default_2000")]
    pub card_add_ms: u64,
    #[serde(default = "default_auth_ms")]
    pub auth_ms: u64,
}

/// How the two payment progress indicators are driven.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressMode {
    /// Step counter and percentage run on their own timers.
    #[default]
    Independent,
    /// One percentage timer; the step display is derived from it.
    Unified,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentConfig {
    #[serde(default = "default_2000")]
    pub step_interval_ms: u64,
    #[serde(default = "default_step_count")]
    pub step_count: u8,
    #[serde(default = "default_percent_interval_ms")]
    pub percent_interval_ms: u64,
    #[serde(default = "default_confirm_delay_ms")]
    pub confirm_delay_ms: u64,
    #[serde(default)]
    pub progress_mode: ProgressMode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnRouteConfig {
    #[serde(default = "default_en_route_tick_ms")]
    pub tick_ms: u64,
    #[serde(default = "default_en_route_steps")]
    pub steps: u32,
    #[serde(default = "default_initial_eta_min")]
    pub initial_eta_min: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationConfig {
    #[serde(default = "default_verification_tick_ms")]
    pub tick_ms: u64,
    #[serde(default = "default_verification_increment")]
    pub increment_pct: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationConfig {
    #[serde(default = "default_fallback_lat")]
    pub fallback_lat: f64,
    #[serde(default = "default_fallback_lng")]
    pub fallback_lng: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingConfig {
    #[serde(default = "default_service_fee_rate")]
    pub service_fee_rate: f64,
    #[serde(default = "default_booking_fee")]
    pub booking_fee: f64,
    #[serde(default = "default_vat_rate")]
    pub vat_rate: f64,
    #[serde(default = "default_surge_min")]
    pub surge_min: f64,
    #[serde(default = "default_surge_max")]
    pub surge_max: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingConfig {
    #[serde(default = "default_road_factor")]
    pub road_factor: f64,
    #[serde(default = "default_avg_speed_kmh")]
    pub avg_speed_kmh: f64,
}

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub payment: PaymentConfig,
    #[serde(default)]
    pub en_route: EnRouteConfig,
    #[serde(default)]
    pub verification: VerificationConfig,
    #[serde(default)]
    pub location: LocationConfig,
    #[serde(default)]
    pub pricing: PricingConfig,
    #[serde(default)]
    pub routing: RoutingConfig,
}

fn default_scan_ms() -> u64 {
    2000
}
fn default_connect_ms() -> u64 {
    1500
}
fn default_disconnect_ms() -> u64 {
    500
}
fn default_gate_ms() -> u64 {
    1000
}
fn default_auth_ms() -> u64 {
    1000
}
fn default_2000() -> u64 {
    2000
}
fn default_step_count() -> u8 {
    3
}
fn default_percent_interval_ms() -> u64 {
    120
}
fn default_confirm_delay_ms() -> u64 {
    1500
}
fn default_en_route_tick_ms() -> u64 {
    1000
}
fn default_en_route_steps() -> u32 {
    50
}
fn default_initial_eta_min() -> u32 {
    5
}
fn default_verification_tick_ms() -> u64 {
    100
}
fn default_verification_increment() -> u8 {
    2
}
fn default_fallback_lat() -> f64 {
    FALLBACK_LOCATION.lat
}
fn default_fallback_lng() -> f64 {
    FALLBACK_LOCATION.lng
}
fn default_service_fee_rate() -> f64 {
    0.20
}
fn default_booking_fee() -> f64 {
    15.0
}
fn default_vat_rate() -> f64 {
    0.15
}
fn default_surge_min() -> f64 {
    1.0
}
fn default_surge_max() -> f64 {
    2.5
}
fn default_road_factor() -> f64 {
    1.3
}
fn default_avg_speed_kmh() -> f64 {
    40.0
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            device_scan_ms: default_scan_ms(),
            device_connect_ms: default_connect_ms(),
            device_disconnect_ms: default_disconnect_ms(),
            gate_command_ms: default_gate_ms(),
            payment_authorize_ms: default_2000(),
            card_add_ms: default_2000(),
            auth_ms: default_auth_ms(),
        }
    }
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            step_interval_ms: default_2000(),
            step_count: default_step_count(),
            percent_interval_ms: default_percent_interval_ms(),
            confirm_delay_ms: default_confirm_delay_ms(),
            progress_mode: ProgressMode::Independent,
        }
    }
}

impl Default for EnRouteConfig {
    fn default() -> Self {
        Self {
            tick_ms: default_en_route_tick_ms(),
            steps: default_en_route_steps(),
            initial_eta_min: default_initial_eta_min(),
        }
    }
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            tick_ms: default_verification_tick_ms(),
            increment_pct: default_verification_increment(),
        }
    }
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            fallback_lat: default_fallback_lat(),
            fallback_lng: default_fallback_lng(),
        }
    }
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            service_fee_rate: default_service_fee_rate(),
            booking_fee: default_booking_fee(),
            vat_rate: default_vat_rate(),
            surge_min: default_surge_min(),
            surge_max: default_surge_max(),
        }
    }
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            road_factor: default_road_factor(),
            avg_speed_kmh: default_avg_speed_kmh(),
        }
    }
}

impl LocationConfig {
    pub fn fallback(&self) -> Coordinates {
        Coordinates::new(self.fallback_lat, self.fallback_lng)
    }
}

impl Config {
    fn lookup<'a>(root: &'a serde_json::Value, key: &str) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }
        key.split('.').try_fold(root, |node, part| node.get(part))
    }

    /// Replace the leaf at `key`, coercing `value` to the leaf's current JSON type.
    fn assign(root: &mut serde_json::Value, key: &str, value: &str) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let (parent_path, leaf) = match key.rsplit_once('.') {
            Some((parent, leaf)) => (Some(parent), leaf),
            None => (None, key),
        };
        if leaf.is_empty() {
            return Err(unknown());
        }

        let mut parent = root;
        if let Some(path) = parent_path {
            for part in path.split('.') {
                parent = parent.get_mut(part).ok_or_else(unknown)?;
            }
        }
        let obj = parent.as_object_mut().ok_or_else(unknown)?;
        let existing = obj.get(leaf).ok_or_else(unknown)?;

        let replacement = match existing {
            serde_json::Value::Bool(_) => serde_json::Value::Bool(
                value
                    .parse::<bool>()
                    .map_err(|e| invalid(e.to_string()))?,
            ),
            serde_json::Value::Number(n) if n.is_u64() => match value.parse::<u64>() {
                Ok(v) => serde_json::Value::Number(v.into()),
                Err(e) => return Err(invalid(e.to_string())),
            },
            serde_json::Value::Number(_) => value
                .parse::<f64>()
                .ok()
                .and_then(serde_json::Number::from_f64)
                .map(serde_json::Value::Number)
                .ok_or_else(|| invalid(format!("cannot parse '{value}' as number")))?,
            _ => serde_json::Value::String(value.to_string()),
        };
        obj.insert(leaf.to_string(), replacement);
        Ok(())
    }

    fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk, writing defaults on first run.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => toml::from_str(&content).map_err(|e| {
                ConfigError::LoadFailed {
                    path: path.clone(),
                    message: e.to_string(),
                }
                .into()
            }),
            Err(_) => {
                let cfg = Self::default();
                cfg.save()?;
                Ok(cfg)
            }
        }
    }

    /// Persist to disk.
    pub fn save(&self) -> Result<()> {
        let path = Self::path()?;
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(&path, content).map_err(|e| ConfigError::SaveFailed {
            path,
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Load from disk, returning defaults on any error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "config unreadable, using defaults");
            Self::default()
        })
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        match Self::lookup(&json, key)? {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a value by dot-separated key and persist.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value does not parse as
    /// the field's type, or the config cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.apply(key, value)?;
        self.save()
    }

    /// Set a value by dot-separated key without touching disk.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::assign(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }
}
