//! Harness configuration: a TOML file plus environment overrides.
use std::env;
use std::path::{Path, PathBuf};

use combat_core::HookConfig;
use serde::{Deserialize, Serialize};

/// Environment variable naming the configuration file.
pub const CONFIG_ENV: &str = "COMBAT_HARNESS_CONFIG";
pub const SCENARIO_ENV: &str = "COMBAT_SCENARIO";
pub const OUTPUT_JSON_ENV: &str = "COMBAT_OUTPUT_JSON";

/// Read when [`CONFIG_ENV`] is unset and the file exists.
pub const DEFAULT_CONFIG_PATH: &str = "harness.toml";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Directory holding `skills.ron`, `items.ron` and `hooks.toml`.
    pub data_dir: PathBuf,
    pub scenario: PathBuf,
    /// Print the report as JSON on stdout instead of a summary.
    pub output_json: bool,
    /// Overrides `hooks.toml` from the data directory when set.
    pub hooks: Option<HookConfig>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            scenario: PathBuf::from("data/scenario.toml"),
            output_json: true,
            hooks: None,
        }
    }
}

impl HarnessConfig {
    /// Loads the configuration file, then applies environment overrides.
    ///
    /// - `COMBAT_HARNESS_CONFIG`: configuration file path
    /// - `COMBAT_SCENARIO`: scenario file path
    /// - `COMBAT_OUTPUT_JSON`: `true` / `false`
    pub fn load() -> anyhow::Result<Self> {
        let mut config = match read_env::<PathBuf>(CONFIG_ENV) {
            Some(path) => Self::from_file(&path)?,
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_PATH))?
            }
            None => Self::default(),
        };
        config.apply_env();
        Ok(config)
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            anyhow::anyhow!("Failed to read harness config {}: {}", path.display(), e)
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        toml::from_str(content).map_err(|e| anyhow::anyhow!("Failed to parse harness config TOML: {}", e))
    }

    fn apply_env(&mut self) {
        if let Some(scenario) = read_env::<PathBuf>(SCENARIO_ENV) {
            self.scenario = scenario;
        }
        if let Some(output_json) = read_env::<bool>(OUTPUT_JSON_ENV) {
            self.output_json = output_json;
        }
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
