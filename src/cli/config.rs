use std::fs;
use std::io::Write;

use crate::error::Error;
use crate::geometry::ensemble::AlignOptions;

pub const DEFAULT_SELECTION: &str = "^CA$";

/// Alignment parameters shared by the CLI workflows. Persisted as TOML
/// next to the outputs so a run can be reproduced.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignConfig {
    pub selection: String,
    pub tolerance: f64,
    pub max_iterations: usize,
}

impl Default for AlignConfig {
    fn default() -> Self {
        let opts = AlignOptions::default();
        AlignConfig {
            selection: DEFAULT_SELECTION.to_string(),
            tolerance: opts.tolerance,
            max_iterations: opts.max_iterations,
        }
    }
}

impl AlignConfig {
    pub fn from_toml(toml: &toml::Value) -> Self {
        let default = AlignConfig::default();
        AlignConfig {
            selection: toml
                .get("selection")
                .and_then(|v| v.as_str())
                .unwrap_or(&default.selection)
                .to_string(),
            tolerance: toml
                .get("tolerance")
                .and_then(|v| v.as_float())
                .unwrap_or(default.tolerance),
            max_iterations: toml
                .get("max_iterations")
                .and_then(|v| v.as_integer())
                .unwrap_or(default.max_iterations as i64) as usize,
        }
    }

    pub fn to_toml(&self) -> toml::Value {
        let mut map = toml::map::Map::new();
        map.insert("selection".to_string(), toml::Value::String(self.selection.clone()));
        map.insert("tolerance".to_string(), toml::Value::Float(self.tolerance));
        map.insert(
            "max_iterations".to_string(),
            toml::Value::Integer(self.max_iterations as i64),
        );
        toml::Value::Table(map)
    }

    pub fn align_options(&self) -> AlignOptions {
        AlignOptions {
            tolerance: self.tolerance,
            max_iterations: self.max_iterations,
        }
    }
}

pub fn read_align_config_from_file(path: &str) -> Result<AlignConfig, Error> {
    let content = fs::read_to_string(path)?;
    let value = content.parse::<toml::Value>().map_err(|e| {
        Error::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))
    })?;
    Ok(AlignConfig::from_toml(&value))
}

pub fn write_align_config_to_file(config: &AlignConfig, path: &str) -> Result<(), Error> {
    let mut file = fs::File::create(path)?;
    let content = toml::to_string(&config.to_toml()).map_err(|e| {
        Error::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))
    })?;
    file.write_all(content.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod config_tests {
    use super::*;

    #[test]
    fn test_toml_round_trip() {
        let config = AlignConfig {
            selection: "^(CA|CB)$".to_string(),
            tolerance: 1.0e-8,
            max_iterations: 250,
        };
        let parsed = AlignConfig::from_toml(&config.to_toml());
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_missing_keys_fall_back_to_defaults() {
        let value = "selection = \"^P$\"".parse::<toml::Value>().unwrap();
        let config = AlignConfig::from_toml(&value);
        assert_eq!(config.selection, "^P$");
        assert_eq!(config.max_iterations, AlignConfig::default().max_iterations);
    }
}
