use std::path::Path;
use std::time::Duration;

use sheetreport_core::config_file::{self, ConfigFile};

use crate::theme::Theme;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
pub const ENV_URL: &str = "SHEETREPORT_URL";
pub const ENV_EMAIL: &str = "SHEETREPORT_EMAIL";

/// Values given on the command line; `None` means "not given".
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub server: Option<String>,
    pub email: Option<String>,
    pub theme: Option<String>,
    pub request_timeout_secs: Option<u64>,
}

/// Effective runtime settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub base_url: String,
    pub email: Option<String>,
    pub theme: String,
    pub request_timeout: Option<Duration>,
}

impl Settings {
    /// CLI flag > environment > config file > default.
    pub fn resolve(
        cli: Overrides,
        env: impl Fn(&str) -> Option<String>,
        file: &ConfigFile,
    ) -> Self {
        let non_empty = |v: String| (!v.trim().is_empty()).then_some(v);

        let base_url = cli
            .server
            .or_else(|| env(ENV_URL).and_then(non_empty))
            .or_else(|| file.base_url().map(str::to_string))
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let email = cli
            .email
            .or_else(|| env(ENV_EMAIL).and_then(non_empty))
            .or_else(|| file.email().map(str::to_string));
        let known = |t: &String| Theme::NAMES.contains(&t.as_str());
        let theme = cli
            .theme
            .filter(known)
            .or_else(|| file.theme().map(str::to_string).filter(known))
            .unwrap_or_else(|| "default".to_string());
        let request_timeout = cli
            .request_timeout_secs
            .or_else(|| file.request_timeout_secs())
            .filter(|&secs| secs > 0)
            .map(Duration::from_secs);

        Self {
            base_url,
            email,
            theme,
            request_timeout,
        }
    }
}

/// An explicit `--config` path is read on its own; otherwise the usual
/// cascade of local and platform files applies.
pub fn load_file(explicit: Option<&Path>) -> ConfigFile {
    match explicit {
        Some(path) => config_file::load_from_path(path).unwrap_or_else(|| {
            tracing::warn!(path = %path.display(), "config file not readable, using defaults");
            ConfigFile::default()
        }),
        None => config_file::load_config(),
    }
}
