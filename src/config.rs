use log::{info, warn};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum ConfigSortOrder {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum ConfigColorMode {
    Auto,
    Always,
    Never,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum ConfigUnit {
    Won,
    Manwon,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct Config {
    #[serde(default)]
    pub(crate) day_start_hour: Option<u32>,
    #[serde(default)]
    pub(crate) data_file: Option<PathBuf>,
    #[serde(default)]
    pub(crate) compact: bool,
    #[serde(default)]
    pub(crate) no_color: bool,
    #[serde(default)]
    pub(crate) debug: bool,
    #[serde(default)]
    pub(crate) order: Option<ConfigSortOrder>,
    #[serde(default)]
    pub(crate) color: Option<ConfigColorMode>,
    #[serde(default)]
    pub(crate) unit: Option<ConfigUnit>,
    #[serde(default)]
    pub(crate) timezone: Option<String>,
    #[serde(default)]
    pub(crate) locale: Option<String>,
    /// Monthly fuel-subsidy allowance in litres; overrides the value in the data file
    #[serde(default)]
    pub(crate) fuel_subsidy_limit: Option<f64>,
    /// Kilometres driven before tracking began; overrides the value in the data file
    #[serde(default)]
    pub(crate) mileage_correction: Option<f64>,
}

impl Config {
    pub(crate) fn load() -> Self {
        // Try config locations in order of priority
        for path in Self::get_config_paths() {
            if path.exists()
                && let Ok(content) = fs::read_to_string(&path)
            {
                match Self::parse(&content) {
                    Ok(config) => {
                        info!("Loaded config from {}", path.display());
                        return config;
                    }
                    Err(e) => warn!("Failed to parse {}: {}", path.display(), e),
                }
            }
        }

        Self::default()
    }

    fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str::<Config>(content)
    }

    fn get_config_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        // 1. XDG config: ~/.config/haulbook/config.toml
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".config").join("haulbook").join("config.toml"));
        }

        // 2. Platform config dir (e.g. ~/Library/Application Support on macOS)
        if let Some(config_dir) = dirs::config_dir() {
            let platform_path = config_dir.join("haulbook").join("config.toml");
            if !paths.contains(&platform_path) {
                paths.push(platform_path);
            }
        }

        // 3. Home directory: ~/.haulbook.toml
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".haulbook.toml"));
        }

        paths
    }
}

/// Default data file: `<data dir>/haulbook/data.json`, falling back to the working directory
pub(crate) fn default_data_file() -> PathBuf {
    dirs::data_dir()
        .or_else(dirs::home_dir)
        .map(|dir| dir.join("haulbook").join("data.json"))
        .unwrap_or_else(|| PathBuf::from("haulbook-data.json"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_paths_end_with_home_file() {
        let paths = Config::get_config_paths();
        if let Some(last) = paths.last() {
            assert!(last.ends_with(".haulbook.toml"));
        }
    }

    #[test]
    fn parses_all_keys() {
        let config = Config::parse(
            r#"
            day_start_hour = 5
            data_file = "/tmp/haul.json"
            order = "asc"
            color = "never"
            unit = "manwon"
            compact = true
            timezone = "Asia/Seoul"
            locale = "ko"
            fuel_subsidy_limit = 600
            mileage_correction = 123456.5
            "#,
        )
        .unwrap();
        assert_eq!(config.day_start_hour, Some(5));
        assert_eq!(config.data_file, Some(PathBuf::from("/tmp/haul.json")));
        assert_eq!(config.order, Some(ConfigSortOrder::Asc));
        assert_eq!(config.color, Some(ConfigColorMode::Never));
        assert_eq!(config.unit, Some(ConfigUnit::Manwon));
        assert!(config.compact);
        assert_eq!(config.fuel_subsidy_limit, Some(600.0));
        assert_eq!(config.mileage_correction, Some(123456.5));
    }

    #[test]
    fn empty_file_gives_defaults() {
        let config = Config::parse("").unwrap();
        assert!(config.day_start_hour.is_none());
        assert!(!config.debug);
    }

    #[test]
    fn bad_values_are_rejected() {
        assert!(Config::parse("unit = \"dollar\"").is_err());
        assert!(Config::parse("colour = \"never\"").is_err());
    }

    #[test]
    fn default_data_file_is_json() {
        assert!(default_data_file().ends_with("data.json") || default_data_file().ends_with("haulbook-data.json"));
    }
}
