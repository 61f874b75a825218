//! Settings resolution.
//!
//! Every setting is resolved once at startup from: flag or env (clap) >
//! `<data dir>/config.toml` > built-in default. The data dir itself comes
//! from `--data-dir` > `SRDFSE_DATA_DIR` > `~/.srdfse`.

use std::path::{Path, PathBuf};

use clap::Args;
use serde::Deserialize;
use srdfse_client::address::DEFAULT_SERVER;
use srdfse_client::{ConnectionError, SessionAddress};
use thiserror::Error;

const DATA_DIR_NAME: &str = ".srdfse";
const CONFIG_FILE: &str = "config.toml";
const DEFAULT_LANG: &str = "en";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("HOME directory not found; pass --data-dir")]
    NoHome,

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("No session given; pass --session or set SRDFSE_SESSION")]
    NoSession,

    #[error(transparent)]
    Address(#[from] ConnectionError),
}

/// Flags shared by every subcommand
#[derive(Debug, Default, Clone, Args)]
pub struct GlobalArgs {
    /// HTTP base of the sRDFSe server [default: http://localhost:8269]
    #[arg(long, env = "SRDFSE_SERVER", global = true)]
    pub server: Option<String>,

    /// WebSocket endpoint, when it differs from <server>/websocket
    #[arg(long, env = "SRDFSE_WS_URL", global = true)]
    pub ws_url: Option<String>,

    /// Session URL or bare session id
    #[arg(long, env = "SRDFSE_SESSION", global = true)]
    pub session: Option<String>,

    /// Language code for labels and comments [default: en]
    #[arg(long, global = true)]
    pub lang: Option<String>,

    /// Data directory for config and logs [default: ~/.srdfse]
    #[arg(long, env = "SRDFSE_DATA_DIR", global = true)]
    pub data_dir: Option<PathBuf>,
}

/// Contents of `config.toml`. Every key is optional.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub server: Option<String>,
    pub ws_url: Option<String>,
    pub session: Option<String>,
    pub lang: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub data_dir: PathBuf,
    pub server: String,
    pub ws_url: Option<String>,
    pub session: Option<String>,
    pub lang: String,
}

/// Resolve the data directory: `explicit` (flag or env) > `~/.srdfse`.
pub fn resolve_data_dir(explicit: Option<&Path>) -> Result<PathBuf, ConfigError> {
    match explicit {
        Some(dir) => Ok(dir.to_path_buf()),
        None => dirs::home_dir()
            .map(|home| home.join(DATA_DIR_NAME))
            .ok_or(ConfigError::NoHome),
    }
}

/// Read `<data_dir>/config.toml`; a missing file is an empty config.
pub fn load_file(data_dir: &Path) -> Result<FileConfig, ConfigError> {
    let path = data_dir.join(CONFIG_FILE);
    let text = match std::fs::read_to_string(&path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(FileConfig::default()),
        Err(source) => return Err(ConfigError::Read { path, source }),
    };
    toml::from_str(&text).map_err(|source| ConfigError::Parse { path, source })
}

impl Settings {
    pub fn resolve(args: &GlobalArgs, file: FileConfig, data_dir: PathBuf) -> Self {
        Self {
            data_dir,
            server: args
                .server
                .clone()
                .or(file.server)
                .unwrap_or_else(|| DEFAULT_SERVER.to_string()),
            ws_url: args.ws_url.clone().or(file.ws_url),
            session: args.session.clone().or(file.session),
            lang: args
                .lang
                .clone()
                .or(file.lang)
                .unwrap_or_else(|| DEFAULT_LANG.to_string()),
        }
    }

    /// Address of the configured session.
    pub fn address(&self) -> Result<SessionAddress, ConfigError> {
        let session = self.session.as_deref().ok_or(ConfigError::NoSession)?;
        Ok(SessionAddress::new(
            &self.server,
            session,
            self.ws_url.as_deref(),
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_data_dir_wins() {
        let dir = resolve_data_dir(Some(Path::new("/tmp/srdfse-test"))).unwrap();
        assert_eq!(dir, PathBuf::from("/tmp/srdfse-test"));
    }

    #[test]
    fn missing_config_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(load_file(dir.path()).unwrap(), FileConfig::default());
    }

    #[test]
    fn config_file_is_parsed() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("config.toml"),
            "server = \"https://rdfs.example.org\"\nlang = \"de\"\n",
        )
        .unwrap();
        let file = load_file(dir.path()).unwrap();
        assert_eq!(file.server.as_deref(), Some("https://rdfs.example.org"));
        assert_eq!(file.lang.as_deref(), Some("de"));
        assert_eq!(file.session, None);
    }

    #[test]
    fn unknown_config_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.toml"), "reconnect_attempts = 3\n").unwrap();
        assert!(matches!(
            load_file(dir.path()),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn flags_beat_file_beat_defaults() {
        let args = GlobalArgs {
            session: Some("fromflag".into()),
            ..GlobalArgs::default()
        };
        let file = FileConfig {
            server: Some("http://file:1".into()),
            session: Some("fromfile".into()),
            ..FileConfig::default()
        };
        let settings = Settings::resolve(&args, file, PathBuf::from("/d"));
        assert_eq!(settings.session.as_deref(), Some("fromflag"));
        assert_eq!(settings.server, "http://file:1");
        assert_eq!(settings.lang, "en");
        assert_eq!(settings.ws_url, None);
    }

    #[test]
    fn defaults_point_at_local_server() {
        let settings =
            Settings::resolve(&GlobalArgs::default(), FileConfig::default(), PathBuf::from("/d"));
        assert_eq!(settings.server, "http://localhost:8269");
        assert!(matches!(settings.address(), Err(ConfigError::NoSession)));
    }

    #[test]
    fn address_uses_ws_override() {
        let args = GlobalArgs {
            session: Some("http://localhost:8269/sessions/AbC123xy".into()),
            ws_url: Some("ws://proxy:9000/websocket".into()),
            ..GlobalArgs::default()
        };
        let settings = Settings::resolve(&args, FileConfig::default(), PathBuf::from("/d"));
        let address = settings.address().unwrap();
        assert_eq!(address.session_id, "AbC123xy");
        assert_eq!(address.websocket, "ws://proxy:9000/websocket");
    }
}
