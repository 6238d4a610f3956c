use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Name of the per-directory override file.
pub const LOCAL_CONFIG_NAME: &str = ".sheetreport.toml";

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigFile {
    pub server: Option<ServerConfig>,
    pub auth: Option<AuthConfig>,
    pub display: Option<DisplayConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    pub base_url: Option<String>,
    pub request_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Pre-fills the login form. Passwords are never stored.
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    pub theme: Option<String>,
}

impl ConfigFile {
    pub fn base_url(&self) -> Option<&str> {
        self.server.as_ref()?.base_url.as_deref()
    }

    pub fn request_timeout_secs(&self) -> Option<u64> {
        self.server.as_ref()?.request_timeout_secs
    }

    pub fn email(&self) -> Option<&str> {
        self.auth.as_ref()?.email.as_deref()
    }

    pub fn theme(&self) -> Option<&str> {
        self.display.as_ref()?.theme.as_deref()
    }
}

/// Platform config directory path: `<config_dir>/sheetreport/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("sheetreport").join("config.toml"))
}

/// Load config by cascading CWD `.sheetreport.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(Path::new(LOCAL_CONFIG_NAME));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Load a config from a specific path. Returns `None` if the file doesn't
/// exist or can't be parsed.
pub fn load_from_path(path: &Path) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unparsable config");
            None
        }
    }
}

fn pick<S, T>(
    base: Option<&S>,
    overlay: Option<&S>,
    field: impl Fn(&S) -> Option<T>,
) -> Option<T> {
    overlay.and_then(&field).or_else(|| base.and_then(&field))
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    let (bs, os) = (base.server.as_ref(), overlay.server.as_ref());
    let (ba, oa) = (base.auth.as_ref(), overlay.auth.as_ref());
    let (bd, od) = (base.display.as_ref(), overlay.display.as_ref());
    ConfigFile {
        server: Some(ServerConfig {
            base_url: pick(bs, os, |s| s.base_url.clone()),
            request_timeout_secs: pick(bs, os, |s| s.request_timeout_secs),
        }),
        auth: Some(AuthConfig {
            email: pick(ba, oa, |a| a.email.clone()),
        }),
        display: Some(DisplayConfig {
            theme: pick(bd, od, |d| d.theme.clone()),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_parses() {
        let parsed: ConfigFile =
            toml::from_str("[server]\nbase_url = \"http://reports.local:9000\"\n").unwrap();
        assert_eq!(parsed.base_url(), Some("http://reports.local:9000"));
        assert_eq!(parsed.request_timeout_secs(), None);
        assert_eq!(parsed.email(), None);
        assert_eq!(parsed.theme(), None);
    }

    #[test]
    fn merge_overlay_wins() {
        let base = ConfigFile {
            server: Some(ServerConfig {
                base_url: Some("http://base".into()),
                request_timeout_secs: Some(30),
            }),
            auth: Some(AuthConfig {
                email: Some("base@example.com".into()),
            }),
            ..Default::default()
        };
        let overlay = ConfigFile {
            server: Some(ServerConfig {
                base_url: Some("http://overlay".into()),
                ..Default::default()
            }),
            display: Some(DisplayConfig {
                theme: Some("mono".into()),
            }),
            ..Default::default()
        };
        let merged = merge(base, overlay);
        assert_eq!(merged.base_url(), Some("http://overlay"));
        assert_eq!(merged.request_timeout_secs(), Some(30));
        assert_eq!(merged.email(), Some("base@example.com"));
        assert_eq!(merged.theme(), Some("mono"));
    }

    #[test]
    fn load_full_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[server]\nbase_url = \"http://reports.local\"\nrequest_timeout_secs = 15\n\n\
             [auth]\nemail = \"analyst@example.com\"\n\n\
             [display]\ntheme = \"mono\"\n",
        )
        .unwrap();
        let loaded = load_from_path(&path).unwrap();
        assert_eq!(loaded.base_url(), Some("http://reports.local"));
        assert_eq!(loaded.request_timeout_secs(), Some(15));
        assert_eq!(loaded.email(), Some("analyst@example.com"));
        assert_eq!(loaded.theme(), Some("mono"));
    }

    #[test]
    fn missing_or_broken_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_from_path(&dir.path().join("absent.toml")).is_none());
        let broken = dir.path().join("broken.toml");
        std::fs::write(&broken, "[server\nbase_url = ").unwrap();
        assert!(load_from_path(&broken).is_none());
    }
}
