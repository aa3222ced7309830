//! LCU credential discovery
//!
//! The client writes a lockfile (`name:pid:port:token:protocol`) next to its
//! install, and also exposes the same port/token on its own command line
//! (`--app-port=`, `--remoting-auth-token=`). Either source yields the
//! credentials for the local REST and websocket endpoints.

use base64::{engine::general_purpose, Engine};
use std::fs;
use std::path::{Path, PathBuf};
use sysinfo::System;
use tracing::debug;

/// Known lockfile names, in lookup order.
const LOCKFILE_NAMES: &[&str] = &["lockfile", "LeagueClientUx.lockfile", "LeagueClient.lockfile"];

const APP_PORT_ARG: &str = "--app-port=";
const AUTH_TOKEN_ARG: &str = "--remoting-auth-token=";

/// Credentials for the local client API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LcuCredentials {
    pub port: u16,
    pub token: String,
}

impl LcuCredentials {
    pub fn base_url(&self) -> String {
        format!("https://127.0.0.1:{}", self.port)
    }

    pub fn ws_url(&self) -> String {
        format!("wss://127.0.0.1:{}/", self.port)
    }

    /// Value for the `Authorization` header (user is always `riot`).
    pub fn basic_auth(&self) -> String {
        let encoded = general_purpose::STANDARD.encode(format!("riot:{}", self.token));
        format!("Basic {encoded}")
    }
}

/// Parse lockfile contents (`name:pid:port:token:protocol`).
pub fn parse_lockfile(contents: &str) -> Option<LcuCredentials> {
    let parts: Vec<&str> = contents.trim().split(':').collect();
    if parts.len() < 5 {
        return None;
    }
    let port = parts[2].parse().ok()?;
    let token = parts[3].to_string();
    if token.is_empty() {
        return None;
    }
    Some(LcuCredentials { port, token })
}

/// Extract credentials from the client process command line.
pub fn credentials_from_args<'a>(args: impl IntoIterator<Item = &'a str>) -> Option<LcuCredentials> {
    let mut port = None;
    let mut token = None;
    for arg in args {
        if let Some(v) = arg.strip_prefix(APP_PORT_ARG) {
            port = v.parse::<u16>().ok();
        } else if let Some(v) = arg.strip_prefix(AUTH_TOKEN_ARG) {
            token = Some(v.to_string());
        }
    }
    Some(LcuCredentials {
        port: port?,
        token: token?,
    })
}

/// Find and parse a lockfile under the given install directory.
pub fn from_league_dir(dir: &Path) -> Option<(LcuCredentials, PathBuf)> {
    for name in LOCKFILE_NAMES {
        let path = dir.join(name);
        if let Ok(contents) = fs::read_to_string(&path) {
            if let Some(creds) = parse_lockfile(&contents) {
                return Some((creds, path));
            }
        }
    }
    None
}

/// Scan running processes for the client UX and pull credentials off its
/// command line.
pub fn from_running_client() -> Option<LcuCredentials> {
    let mut sys = System::new();
    sys.refresh_processes();
    for process in sys.processes().values() {
        if !process.name().contains("LeagueClientUx") {
            continue;
        }
        let args: Vec<&str> = process.cmd().iter().map(String::as_str).collect();
        if let Some(creds) = credentials_from_args(args) {
            return Some(creds);
        }
    }
    None
}

/// Discover credentials, preferring an explicit install dir when given.
pub fn discover(league_dir: Option<&Path>) -> Option<LcuCredentials> {
    if let Some(dir) = league_dir {
        if let Some((creds, path)) = from_league_dir(dir) {
            debug!(lockfile = %path.display(), port = creds.port, "Found client lockfile");
            return Some(creds);
        }
    }
    from_running_client()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_well_formed_lockfile() {
        let creds = parse_lockfile("LeagueClient:4242:59999:sekrit-token:https\n").expect("creds");
        assert_eq!(creds.port, 59999);
        assert_eq!(creds.token, "sekrit-token");
        assert_eq!(creds.base_url(), "https://127.0.0.1:59999");
        assert_eq!(creds.ws_url(), "wss://127.0.0.1:59999/");
    }

    #[test]
    fn rejects_short_or_garbled_lockfiles() {
        assert!(parse_lockfile("").is_none());
        assert!(parse_lockfile("LeagueClient:4242:59999").is_none());
        assert!(parse_lockfile("LeagueClient:4242:notaport:token:https").is_none());
        assert!(parse_lockfile("LeagueClient:4242:59999::https").is_none());
    }

    #[test]
    fn extracts_credentials_from_command_line() {
        let args = [
            "--no-rads",
            "--remoting-auth-token=abc123",
            "--app-port=51234",
        ];
        let creds = credentials_from_args(args).expect("creds");
        assert_eq!(creds.port, 51234);
        assert_eq!(creds.token, "abc123");
    }

    #[test]
    fn missing_command_line_args_yield_nothing() {
        assert!(credentials_from_args(["--app-port=1234"]).is_none());
        assert!(credentials_from_args(["--remoting-auth-token=x"]).is_none());
        assert!(credentials_from_args([]).is_none());
    }

    #[test]
    fn basic_auth_encodes_riot_user() {
        let creds = LcuCredentials {
            port: 1,
            token: "token".into(),
        };
        // base64("riot:token")
        assert_eq!(creds.basic_auth(), "Basic cmlvdDp0b2tlbg==");
    }
}
