//! Flat `key = value` configuration stored in `wrapper.cfg`.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use crate::core::credentials::CredentialModes;

const API_TOKEN_KEY: &str = "api_token";
const OAUTH_CLIENT_KEY: &str = "oauth_client";

/// Immutable key/value configuration.
///
/// Lines containing `=` are split at the first `=` and both sides trimmed.
/// Everything else (blank lines, comments) is ignored. Later duplicates win.
/// Bytes that are not UTF-8 are decoded lossily, so legacy code page comments
/// do not prevent loading.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    values: HashMap<String, String>,
}

impl Config {
    /// Parse configuration line by line. Only read errors are returned.
    pub fn parse<R: BufRead>(mut reader: R) -> Result<Self> {
        let mut values = HashMap::new();
        let mut buf = Vec::new();
        for number in 1.. {
            buf.clear();
            let read = reader
                .read_until(b'\n', &mut buf)
                .with_context(|| format!("read config line {number}"))?;
            if read == 0 {
                break;
            }
            let line = String::from_utf8_lossy(&buf);
            if let Some((key, value)) = line.split_once('=') {
                values.insert(key.trim().to_string(), value.trim().to_string());
            }
        }
        Ok(Self { values })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Credential modes switched on by `api_token = true` / `oauth_client = true`.
    ///
    /// Only the exact lowercase value `true` enables a mode.
    pub fn credential_modes(&self) -> CredentialModes {
        CredentialModes {
            api_token: self.get(API_TOKEN_KEY) == Some("true"),
            oauth_client: self.get(OAUTH_CLIENT_KEY) == Some("true"),
        }
    }
}

/// Load configuration from `path`. A missing file is an error; no default is synthesized.
pub fn load_config(path: &Path) -> Result<Config> {
    debug!(path = %path.display(), "loading config");
    let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let config =
        Config::parse(BufReader::new(file)).with_context(|| format!("parse {}", path.display()))?;
    let modes = config.credential_modes();
    debug!(
        entries = config.len(),
        api_token = modes.api_token,
        oauth_client = modes.oauth_client,
        "config loaded"
    );
    Ok(config)
}
