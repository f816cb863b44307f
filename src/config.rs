use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use vaultapi::ClientConfig;

use crate::cli::ConnectionArgs;

/// Get the config directory path
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".config").join("vaultsync"))
}

/// Default settings file location
pub fn default_settings_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

/// Expand `~` and environment variables in a user-supplied path
pub fn expand_path(path: &str) -> Result<PathBuf> {
    let expanded =
        shellexpand::full(path).with_context(|| format!("Could not expand path '{}'", path))?;
    Ok(PathBuf::from(expanded.as_ref()))
}

// ============================================================================
// Settings file
// ============================================================================

/// Connection defaults from `~/.config/vaultsync/config.toml`
///
/// ```toml
/// url = "https://vault.internal:8200"
/// token_file = "~/.vault-token"
/// namespace = "team-a"
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
    /// File holding the token; used when `token` is unset
    #[serde(default)]
    pub token_file: Option<String>,
    #[serde(default)]
    pub namespace: Option<String>,
    /// Where these settings came from, for error messages
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

impl Settings {
    /// Load settings.
    ///
    /// An explicit path must exist. Without one, the default location is
    /// read if present and empty settings are used otherwise.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let path = default_settings_path()?;
                if !path.exists() {
                    log::debug!("No settings file at {}", path.display());
                    return Ok(Self::default());
                }
                path
            }
        };

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Could not read {}", path.display()))?;
        let mut settings = Self::parse(&content)
            .with_context(|| format!("Invalid settings file {}", path.display()))?;
        settings.source = Some(path);
        Ok(settings)
    }

    /// Parse settings from TOML text
    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    fn source_hint(&self) -> String {
        match &self.source {
            Some(path) => format!("set it in {}", path.display()),
            None => "set it in the settings file".to_string(),
        }
    }

    /// Read the token from `token_file`, if configured
    fn file_token(&self) -> Result<Option<String>> {
        let Some(token_file) = &self.token_file else {
            return Ok(None);
        };
        let path = expand_path(token_file)?;
        let token = fs::read_to_string(&path)
            .with_context(|| format!("Could not read token file {}", path.display()))?;
        Ok(Some(token.trim().to_string()))
    }

    /// Combine command-line/environment values with these settings.
    ///
    /// Flags and environment variables win over the file.
    pub fn resolve(&self, args: &ConnectionArgs) -> Result<ClientConfig> {
        let Some(url) = args.url.clone().or_else(|| self.url.clone()) else {
            bail!(
                "No server address: pass --url, export VAULT_ADDR, or {}",
                self.source_hint()
            );
        };

        let token = match args.token.clone().or_else(|| self.token.clone()) {
            Some(token) => token,
            None => match self.file_token()? {
                Some(token) => token,
                None => bail!(
                    "No token: pass --token, export VAULT_TOKEN, or {}",
                    self.source_hint()
                ),
            },
        };

        let namespace = args.namespace.clone().or_else(|| self.namespace.clone());

        Ok(ClientConfig::new(url, token)?.with_namespace(namespace))
    }
}
