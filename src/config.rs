use anyhow::{Context, Result};
use df_core::{EngineConfig, EngineSettings};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level configuration file layout.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub engine: EngineSettings,
}

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    EngineConfig::new(config.engine.clone())
        .with_context(|| format!("Invalid engine settings in {:?}", path))?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    let default_paths = ["./docforge.toml", "~/.config/docforge/config.toml"];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            tracing::debug!("using config file {}", path.display());
            return load_config(path);
        }
    }

    Ok(Config::default())
}

/// Command-line values that take precedence over the config file.
#[derive(Debug, Default)]
pub struct Overrides {
    pub timeout_secs: Option<f64>,
    pub max_concurrency: Option<i64>,
    pub parallel_workers: Option<usize>,
    pub no_install: bool,
}

impl Overrides {
    pub fn apply(&self, settings: &mut EngineSettings) {
        if let Some(timeout) = self.timeout_secs {
            settings.timeout_secs = timeout;
        }
        if let Some(n) = self.max_concurrency {
            settings.max_concurrency = Some(n);
        }
        if let Some(n) = self.parallel_workers {
            settings.parallel_workers = Some(n);
        }
        if self.no_install {
            settings.auto_install = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn empty_file_uses_defaults() {
        let file = write_config("");
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.engine.timeout_secs, 300.0);
        assert!(config.engine.auto_install);
        assert!(config.engine.max_concurrency.is_none());
    }

    #[test]
    fn engine_table_is_read() {
        let file = write_config(
            r#"
[engine]
max_concurrency = 4
timeout_secs = 30.5
auto_install = false
soffice_path = "/opt/libreoffice/program/soffice"
parallel_workers = 2
"#,
        );
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.engine.max_concurrency, Some(4));
        assert_eq!(config.engine.timeout_secs, 30.5);
        assert!(!config.engine.auto_install);
        assert_eq!(
            config.engine.soffice_path.as_deref(),
            Some(Path::new("/opt/libreoffice/program/soffice"))
        );
        assert_eq!(config.engine.parallel_workers, Some(2));
    }

    #[test]
    fn invalid_settings_are_rejected_at_load() {
        let file = write_config("[engine]\nmax_concurrency = 0\n");
        let err = load_config(file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("max_concurrency must be >= 1"));
    }

    #[test]
    fn malformed_toml_is_reported() {
        let file = write_config("[engine\n");
        let err = load_config(file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        assert!(load_config_or_default(Some(Path::new("/nonexistent/docforge.toml"))).is_err());
    }

    #[test]
    fn overrides_take_precedence() {
        let mut settings = EngineSettings::default();
        Overrides {
            timeout_secs: Some(5.0),
            max_concurrency: Some(2),
            parallel_workers: Some(3),
            no_install: true,
        }
        .apply(&mut settings);

        assert_eq!(settings.timeout_secs, 5.0);
        assert_eq!(settings.max_concurrency, Some(2));
        assert_eq!(settings.parallel_workers, Some(3));
        assert!(!settings.auto_install);
    }

    #[test]
    fn empty_overrides_change_nothing() {
        let mut settings = EngineSettings::default();
        Overrides::default().apply(&mut settings);
        assert_eq!(settings.timeout_secs, 300.0);
        assert!(settings.auto_install);
    }
}
