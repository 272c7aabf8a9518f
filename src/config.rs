//! Configuration management
//!
//! Optional on-disk defaults for voice parameters, read from
//! `~/.edgebook.cfg`. Command-line flags always win over the file; the
//! file wins over the built-in defaults. A missing file is created with
//! the built-in defaults on first load.

use crate::{BookError, Result};
use ini::Ini;
use log::{debug, info};
use std::path::{Path, PathBuf};

/// Built-in defaults, also written to a fresh config file
pub const DEFAULT_RATE: &str = "+0%";
pub const DEFAULT_PITCH: &str = "+0Hz";
pub const DEFAULT_MAX_CHARS: usize = 3000;
pub const DEFAULT_OUTPUT: &str = "audiobook.mp3";

/// Persistent defaults for audiobook generation
pub struct Config {
    /// INI configuration storage
    ini: Ini,

    /// Config file path (~/.edgebook.cfg)
    path: PathBuf,
}

impl Config {
    /// Load configuration from disk or create the default file
    pub fn load() -> Result<Self> {
        Self::load_from(Self::config_path())
    }

    /// Load configuration from an explicit path
    pub fn load_from(path: PathBuf) -> Result<Self> {
        debug!("Loading config from {:?}", path);

        let ini = if path.exists() {
            Ini::load_from_file(&path)
                .map_err(|e| BookError::InvalidConfig(format!("failed to load config: {e}")))?
        } else {
            info!("Config file not found, creating default");
            let default = Self::default_config();
            default
                .write_to_file(&path)
                .map_err(|e| BookError::InvalidConfig(format!("failed to write config: {e}")))?;
            default
        };

        Ok(Self { ini, path })
    }

    /// Config file path (~/.edgebook.cfg)
    fn config_path() -> PathBuf {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        home.join(".edgebook.cfg")
    }

    /// Expose the config file path for display
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create default configuration
    fn default_config() -> Ini {
        let mut ini = Ini::new();

        ini.with_section(Some("defaults"))
            .set("rate", DEFAULT_RATE)
            .set("pitch", DEFAULT_PITCH)
            .set("max_chars", DEFAULT_MAX_CHARS.to_string())
            .set("output", DEFAULT_OUTPUT);

        ini
    }

    fn get(&self, key: &str) -> Option<&str> {
        self.ini.section(Some("defaults")).and_then(|s| s.get(key))
    }

    /// Preferred voice, if one is configured
    pub fn voice(&self) -> Option<String> {
        self.get("voice").map(str::to_string)
    }

    /// Speech rate adjustment (default "+0%")
    pub fn rate(&self) -> String {
        self.get("rate").unwrap_or(DEFAULT_RATE).to_string()
    }

    /// Speech pitch adjustment (default "+0Hz")
    pub fn pitch(&self) -> String {
        self.get("pitch").unwrap_or(DEFAULT_PITCH).to_string()
    }

    /// Maximum characters per synthesis request (default 3000)
    pub fn max_chars(&self) -> Result<usize> {
        match self.get("max_chars") {
            None => Ok(DEFAULT_MAX_CHARS),
            Some(raw) => raw.parse().map_err(|_| {
                BookError::InvalidConfig(format!(
                    "max_chars in {} must be a positive integer, got '{raw}'",
                    self.path.display()
                ))
            }),
        }
    }

    /// Default output file name (default "audiobook.mp3")
    pub fn output(&self) -> String {
        self.get("output").unwrap_or(DEFAULT_OUTPUT).to_string()
    }
}
