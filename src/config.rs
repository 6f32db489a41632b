//! TOML-based scenario configuration and preset definitions.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::devices::PartitionRules;
use crate::translators::{AirConditionerTranslator, DerdTranslator, WaterHeaterTranslator};

/// Top-level scenario configuration parsed from TOML.
///
/// All fields have defaults matching the baseline scenario. Load from
/// TOML with [`ScenarioConfig::from_toml_file`] or use
/// [`ScenarioConfig::baseline`] for the built-in default.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Horizon and sampling.
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Injector inventory and class partition rules.
    #[serde(default)]
    pub inventory: InventoryConfig,
    /// DER reactive-power translator constants.
    #[serde(default)]
    pub derd: DerdTranslator,
    /// Water-heater translator constants.
    #[serde(default)]
    pub water_heater: WaterHeaterTranslator,
    /// Air-conditioner translator constants.
    #[serde(default)]
    pub air_conditioner: AirConditionerTranslator,
}

/// Horizon and sampling of the control loop.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Final simulated time (s, must be >= 0).
    pub horizon_s: f64,
    /// Control sampling period (s, must be > 0).
    pub sample_s: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            horizon_s: 100.0,
            sample_s: 1.0,
        }
    }
}

/// Injectors known to the in-process engine, and how to group them.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InventoryConfig {
    /// Injector names in inventory order.
    pub components: Vec<String>,
    pub der_markers: Vec<String>,
    pub der_exclude: Vec<String>,
    pub ac_markers: Vec<String>,
    pub wh_markers: Vec<String>,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        let rules = PartitionRules::default();
        Self {
            components: [
                "PV_LV1", "PV_LV2", "BATD_LV1", "BATC_LV2", "PV_RL_LV3", "AC2_LV1", "AC2_LV2",
                "WH_LV1", "WH_LV2", "LOAD_LV1",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            der_markers: rules.der_markers,
            der_exclude: rules.der_exclude,
            ac_markers: rules.ac_markers,
            wh_markers: rules.wh_markers,
        }
    }
}

impl InventoryConfig {
    /// Partition rules described by this section.
    pub fn rules(&self) -> PartitionRules {
        PartitionRules {
            der_markers: self.der_markers.clone(),
            der_exclude: self.der_exclude.clone(),
            ac_markers: self.ac_markers.clone(),
            wh_markers: self.wh_markers.clone(),
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"simulation.sample_s"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl ScenarioConfig {
    /// Returns the baseline scenario: 100 s horizon sampled every second.
    pub fn baseline() -> Self {
        Self {
            simulation: SimulationConfig::default(),
            inventory: InventoryConfig::default(),
            derd: DerdTranslator::default(),
            water_heater: WaterHeaterTranslator::default(),
            air_conditioner: AirConditionerTranslator::default(),
        }
    }

    /// Returns the short preset: stops just after the last signal breakpoint.
    pub fn short() -> Self {
        Self {
            simulation: SimulationConfig {
                horizon_s: 20.0,
                ..SimulationConfig::default()
            },
            ..Self::baseline()
        }
    }

    /// Returns the fine-sampling preset: half-second control period.
    pub fn fine_sampling() -> Self {
        Self {
            simulation: SimulationConfig {
                horizon_s: 30.0,
                sample_s: 0.5,
            },
            ..Self::baseline()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["baseline", "short", "fine_sampling"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "baseline" => Ok(Self::baseline()),
            "short" => Ok(Self::short()),
            "fine_sampling" => Ok(Self::fine_sampling()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("scenario", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        let s = &self.simulation;
        if !s.sample_s.is_finite() || s.sample_s <= 0.0 {
            errors.push(ConfigError::new("simulation.sample_s", "must be > 0"));
        }
        if !s.horizon_s.is_finite() || s.horizon_s < 0.0 {
            errors.push(ConfigError::new("simulation.horizon_s", "must be >= 0"));
        }

        let inv = &self.inventory;
        for (field, markers) in [
            ("inventory.der_markers", &inv.der_markers),
            ("inventory.der_exclude", &inv.der_exclude),
            ("inventory.ac_markers", &inv.ac_markers),
            ("inventory.wh_markers", &inv.wh_markers),
        ] {
            if markers.iter().any(String::is_empty) {
                errors.push(ConfigError::new(field, "markers must not be empty strings"));
            }
        }

        let d = &self.derd;
        if d.signal_ts_min >= d.signal_ts_max {
            errors.push(ConfigError::new(
                "derd.signal_ts_min",
                "must be < derd.signal_ts_max",
            ));
        }
        if d.signal_rho_min >= d.signal_rho_max {
            errors.push(ConfigError::new(
                "derd.signal_rho_min",
                "must be < derd.signal_rho_max",
            ));
        }
        if d.ts_min <= 0.0 || d.ts_min > d.ts_max {
            errors.push(ConfigError::new(
                "derd.ts_min",
                "must be > 0 and <= derd.ts_max",
            ));
        }

        let wh = &self.water_heater;
        if wh.tolerance <= 0.0 {
            errors.push(ConfigError::new("water_heater.tolerance", "must be > 0"));
        }
        if !(wh.level_duty_max < wh.level_duty_min && wh.level_duty_min < wh.level_saturation) {
            errors.push(ConfigError::new(
                "water_heater.level_duty_max",
                "levels must satisfy level_duty_max < level_duty_min < level_saturation",
            ));
        }
        for (field, duty) in [
            ("water_heater.duty_max", wh.duty_max),
            ("water_heater.duty_min", wh.duty_min),
        ] {
            if !(0.0..=1.0).contains(&duty) {
                errors.push(ConfigError::new(field, "must be in [0.0, 1.0]"));
            }
        }

        let ac = &self.air_conditioner;
        if ac.tolerance <= 0.0 {
            errors.push(ConfigError::new("air_conditioner.tolerance", "must be > 0"));
        }
        if ac
            .cycling_fractions
            .iter()
            .any(|f| !(0.0..=1.0).contains(f))
        {
            errors.push(ConfigError::new(
                "air_conditioner.cycling_fractions",
                "each fraction must be in [0.0, 1.0]",
            ));
        }

        errors
    }
}
