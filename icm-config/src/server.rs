use std::fs::File;

use serde::{Deserialize, Serialize};
use xdg::BaseDirectories;

use crate::decoration::DecorationDefaults;

const CONFIG_PATH: &str = "icm/config.ron";

/// Persisted server configuration: socket override and decoration defaults.
/// Resolved once at startup and handed to `icm-server`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct IcmServerConfig {
    pub socket_path: Option<String>,
    pub decoration: DecorationDefaults,
}

impl Default for IcmServerConfig {
    fn default() -> Self {
        IcmServerConfig { socket_path: None, decoration: DecorationDefaults::default() }
    }
}

impl IcmServerConfig {
    /// Loads the config file from the XDG config dir, falling back to
    /// defaults (with a warning) if it is missing or fails to parse —
    /// a missing or malformed config is never fatal to server startup.
    pub fn load() -> Self {
        let path = match BaseDirectories::new().map(|dirs| dirs.find_config_file(CONFIG_PATH)) {
            Ok(Some(path)) => path,
            Ok(None) => {
                tracing::debug!("no icm config file found, using defaults");
                return Self::default();
            }
            Err(err) => {
                tracing::warn!(%err, "failed to resolve XDG config dir, using defaults");
                return Self::default();
            }
        };
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "failed to open config file, using defaults");
                return Self::default();
            }
        };
        match ron::de::from_reader(file) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "failed to parse config file, using defaults");
                Self::default()
            }
        }
    }

    pub fn write(&self) -> anyhow::Result<()> {
        let xdg = BaseDirectories::new()?;
        let path = xdg.place_config_file(CONFIG_PATH)?;
        let file = File::create(path)?;
        ron::ser::to_writer_pretty(&file, self, ron::ser::PrettyConfig::default())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_round_trips_through_ron() {
        let config = IcmServerConfig::default();
        let text = ron::ser::to_string(&config).unwrap();
        let parsed: IcmServerConfig = ron::de::from_str(&text).unwrap();
        assert_eq!(config, parsed);
    }
}
