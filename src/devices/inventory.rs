//! Partitioning of the engine's injector inventory into device groups.

use super::types::DeviceClass;

/// Substring rules that assign injector names to device classes.
#[derive(Debug, Clone)]
pub struct PartitionRules {
    /// Any of these marks a DER.
    pub der_markers: Vec<String>,
    /// Any of these excludes an otherwise matching DER.
    pub der_exclude: Vec<String>,
    pub ac_markers: Vec<String>,
    pub wh_markers: Vec<String>,
}

impl Default for PartitionRules {
    fn default() -> Self {
        Self {
            der_markers: vec!["PV".into(), "BATD".into(), "BATC".into()],
            der_exclude: vec!["RL".into()],
            ac_markers: vec!["AC2".into()],
            wh_markers: vec!["WH".into()],
        }
    }
}

fn contains_any(name: &str, markers: &[String]) -> bool {
    markers.iter().any(|m| name.contains(m.as_str()))
}

/// Injector identifiers per device class, resolved once at start-up.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeviceGroups {
    pub der: Vec<String>,
    pub air_conditioner: Vec<String>,
    pub water_heater: Vec<String>,
}

impl DeviceGroups {
    /// Splits `names` into groups, preserving inventory order.
    ///
    /// Each rule is applied independently, so a name matching several
    /// classes lands in each of them; names matching none are dropped.
    pub fn partition(names: &[String], rules: &PartitionRules) -> Self {
        let mut groups = Self::default();
        for name in names {
            if contains_any(name, &rules.der_markers) && !contains_any(name, &rules.der_exclude) {
                groups.der.push(name.clone());
            }
            if contains_any(name, &rules.ac_markers) {
                groups.air_conditioner.push(name.clone());
            }
            if contains_any(name, &rules.wh_markers) {
                groups.water_heater.push(name.clone());
            }
        }
        groups
    }

    /// Devices of one class.
    pub fn of(&self, class: DeviceClass) -> &[String] {
        match class {
            DeviceClass::Der => &self.der,
            DeviceClass::AirConditioner => &self.air_conditioner,
            DeviceClass::WaterHeater => &self.water_heater,
        }
    }

    /// Total number of grouped devices.
    pub fn len(&self) -> usize {
        self.der.len() + self.air_conditioner.len() + self.water_heater.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
