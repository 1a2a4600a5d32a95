//! Engine configuration.
//!
//! [`EngineSettings`] is the raw, user-facing shape (deserialized from the
//! `[engine]` table of a TOML file or built in code). Every field defaults
//! sensibly, so an empty table is valid. [`EngineConfig::new`] validates the
//! settings once; the resulting config is immutable for the engine's
//! lifetime.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};

/// Default per-job timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: f64 = 300.0;

// ---------------------------------------------------------------------------
// Raw settings
// ---------------------------------------------------------------------------

/// Unvalidated engine settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Maximum simultaneous invocations in the async model. `None` uses the
    /// available parallelism.
    pub max_concurrency: Option<i64>,
    /// Per-job timeout in seconds.
    pub timeout_secs: f64,
    /// Install the office suite through the package manager when missing.
    pub auto_install: bool,
    /// Explicit path to the `soffice` executable.
    pub soffice_path: Option<PathBuf>,
    /// Directory under which per-job profile directories are created.
    pub scratch_root: Option<PathBuf>,
    /// Worker-pool size for blocking batch conversion.
    pub parallel_workers: Option<usize>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            max_concurrency: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            auto_install: true,
            soffice_path: None,
            scratch_root: None,
            parallel_workers: None,
        }
    }
}

impl EngineSettings {
    /// Deserialize settings from a JSON string.
    pub fn from_json(json_str: &str) -> Result<Self> {
        serde_json::from_str(json_str)
            .map_err(|e| Error::Validation(format!("settings parse error: {e}")))
    }
}

// ---------------------------------------------------------------------------
// Validated config
// ---------------------------------------------------------------------------

/// Validated, immutable engine configuration.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    max_concurrency: usize,
    timeout: Duration,
    auto_install: bool,
    soffice_path: Option<PathBuf>,
    scratch_root: PathBuf,
    parallel_workers: usize,
}

impl EngineConfig {
    /// Validate `settings` and resolve defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] when `max_concurrency` is below 1, when
    /// `timeout_secs` is not a strictly positive finite number, or when
    /// `parallel_workers` is 0.
    pub fn new(settings: EngineSettings) -> Result<Self> {
        let max_concurrency = match settings.max_concurrency {
            Some(n) if n < 1 => {
                return Err(Error::Validation(format!(
                    "max_concurrency must be >= 1, got {n}"
                )));
            }
            Some(n) => usize::try_from(n)
                .map_err(|_| Error::Validation(format!("max_concurrency out of range: {n}")))?,
            None => available_parallelism(),
        };

        if !settings.timeout_secs.is_finite() || settings.timeout_secs <= 0.0 {
            return Err(Error::Validation(format!(
                "timeout must be > 0, got {}",
                settings.timeout_secs
            )));
        }
        let timeout = Duration::from_secs_f64(settings.timeout_secs);

        let parallel_workers = match settings.parallel_workers {
            Some(0) => {
                return Err(Error::Validation(
                    "parallel_workers must be >= 1, got 0".into(),
                ));
            }
            Some(n) => n,
            None => available_parallelism(),
        };

        let scratch_root = settings
            .scratch_root
            .unwrap_or_else(std::env::temp_dir);

        tracing::debug!(
            max_concurrency,
            timeout_secs = timeout.as_secs_f64(),
            parallel_workers,
            auto_install = settings.auto_install,
            "engine settings validated, scratch root {}",
            scratch_root.display()
        );

        Ok(Self {
            max_concurrency,
            timeout,
            auto_install: settings.auto_install,
            soffice_path: settings.soffice_path,
            scratch_root,
            parallel_workers,
        })
    }

    /// Maximum simultaneous invocations in the async model.
    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }

    /// Per-job timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn auto_install(&self) -> bool {
        self.auto_install
    }

    /// Explicit executable requested by the settings, if any.
    pub fn soffice_path(&self) -> Option<&Path> {
        self.soffice_path.as_deref()
    }

    pub fn scratch_root(&self) -> &Path {
        &self.scratch_root
    }

    /// Worker-pool size for blocking batch conversion.
    pub fn parallel_workers(&self) -> usize {
        self.parallel_workers
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_concurrency: available_parallelism(),
            timeout: Duration::from_secs_f64(DEFAULT_TIMEOUT_SECS),
            auto_install: true,
            soffice_path: None,
            scratch_root: std::env::temp_dir(),
            parallel_workers: available_parallelism(),
        }
    }
}

fn available_parallelism() -> usize {
    num_cpus::get().max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_concurrency(n: Option<i64>) -> EngineSettings {
        EngineSettings {
            max_concurrency: n,
            ..EngineSettings::default()
        }
    }

    fn with_timeout(secs: f64) -> EngineSettings {
        EngineSettings {
            timeout_secs: secs,
            ..EngineSettings::default()
        }
    }

    #[test]
    fn max_concurrency_rejects_zero_and_negative() {
        assert!(matches!(
            EngineConfig::new(with_concurrency(Some(0))),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            EngineConfig::new(with_concurrency(Some(-1))),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn max_concurrency_accepts_positive() {
        let cfg = EngineConfig::new(with_concurrency(Some(4))).unwrap();
        assert_eq!(cfg.max_concurrency(), 4);
    }

    #[test]
    fn max_concurrency_defaults_to_cpu_count() {
        let cfg = EngineConfig::new(EngineSettings::default()).unwrap();
        assert_eq!(cfg.max_concurrency(), num_cpus::get().max(1));
        assert_eq!(cfg.parallel_workers(), num_cpus::get().max(1));
    }

    #[test]
    fn timeout_rejects_zero_negative_and_nan() {
        for secs in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(
                EngineConfig::new(with_timeout(secs)).is_err(),
                "timeout {secs} should be rejected"
            );
        }
    }

    #[test]
    fn timeout_is_observable() {
        let cfg = EngineConfig::new(with_timeout(300.0)).unwrap();
        assert_eq!(cfg.timeout(), Duration::from_secs(300));

        let cfg = EngineConfig::new(with_timeout(0.25)).unwrap();
        assert_eq!(cfg.timeout(), Duration::from_millis(250));
    }

    #[test]
    fn parallel_workers_rejects_zero() {
        let settings = EngineSettings {
            parallel_workers: Some(0),
            ..EngineSettings::default()
        };
        assert!(EngineConfig::new(settings).is_err());
    }

    #[test]
    fn scratch_root_defaults_to_temp_dir() {
        let cfg = EngineConfig::new(EngineSettings::default()).unwrap();
        assert_eq!(cfg.scratch_root(), std::env::temp_dir().as_path());
    }

    #[test]
    fn empty_json_is_valid() {
        let settings = EngineSettings::from_json("{}").unwrap();
        assert_eq!(settings.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert!(settings.auto_install);
        assert!(settings.max_concurrency.is_none());
    }

    #[test]
    fn json_overrides_fields() {
        let settings = EngineSettings::from_json(
            r#"{"max_concurrency": 2, "timeout_secs": 12.5, "auto_install": false}"#,
        )
        .unwrap();
        let cfg = EngineConfig::new(settings).unwrap();
        assert_eq!(cfg.max_concurrency(), 2);
        assert_eq!(cfg.timeout(), Duration::from_secs_f64(12.5));
        assert!(!cfg.auto_install());
    }

    #[test]
    fn malformed_json_is_validation_error() {
        let err = EngineSettings::from_json("{ not json").unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[derive(Clone, Default)]
    struct LogBuffer(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn resolved_settings_are_logged() {
        let logs = LogBuffer::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            EngineConfig::new(EngineSettings {
                max_concurrency: Some(3),
                parallel_workers: Some(2),
                scratch_root: Some(PathBuf::from("/var/tmp/docforge")),
                ..EngineSettings::default()
            })
            .unwrap();
        });

        let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("engine settings validated"), "{output}");
        assert!(output.contains("max_concurrency=3"), "{output}");
        assert!(output.contains("parallel_workers=2"), "{output}");
        assert!(output.contains("/var/tmp/docforge"), "{output}");
    }
}
