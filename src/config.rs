use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::browser::{
    BrowserOptions, PdfOptions, DEFAULT_NAVIGATION_TIMEOUT, DEFAULT_PDF_MARGIN_PX,
    DEFAULT_SITEMAP_PROBE_TIMEOUT,
};
use crate::Viewport;

/// Default storage root, relative to the directory holding the executable.
pub const DEFAULT_STORAGE_ROOT: &str = "scrapes";

const CONFIG_DIR_NAME: &str = "sitesnap";
const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("{0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub storage_root: PathBuf,
    pub chrome_executable: Option<PathBuf>,
    pub headless: bool,
    pub viewport: Viewport,
    pub timeouts: Timeouts,
    pub pdf: PdfConfig,
    pub sitemap: SitemapConfig,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Timeouts {
    #[serde(with = "humantime_serde")]
    pub navigation: Duration,
    #[serde(with = "humantime_serde")]
    pub sitemap_probe: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            navigation: DEFAULT_NAVIGATION_TIMEOUT,
            sitemap_probe: DEFAULT_SITEMAP_PROBE_TIMEOUT,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PdfConfig {
    pub margin_px: u32,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            margin_px: DEFAULT_PDF_MARGIN_PX,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SitemapConfig {
    /// Reject ok responses whose body has no `<urlset>`/`<sitemapindex>` root.
    pub strict: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_root: PathBuf::from(DEFAULT_STORAGE_ROOT),
            chrome_executable: None,
            headless: true,
            viewport: Viewport::default(),
            timeouts: Timeouts::default(),
            pdf: PdfConfig::default(),
            sitemap: SitemapConfig::default(),
        }
    }
}

impl Config {
    /// Load from `path`, else the per-user config file if it exists, else defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => match Self::central_config_path() {
                Some(central) if central.is_file() => Self::from_file(&central),
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// `$XDG_CONFIG_HOME/sitesnap/config.toml`, falling back to `~/.config/sitesnap/config.toml`.
    pub fn central_config_path() -> Option<PathBuf> {
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")))?;
        Some(base.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage_root.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("storage_root must not be empty".into()));
        }
        if self.viewport.width == 0 || self.viewport.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "viewport must be positive, got {}",
                self.viewport
            )));
        }
        if self.timeouts.navigation.is_zero() {
            return Err(ConfigError::Invalid("timeouts.navigation must be > 0".into()));
        }
        if self.timeouts.sitemap_probe.is_zero() {
            return Err(ConfigError::Invalid("timeouts.sitemap_probe must be > 0".into()));
        }
        Ok(())
    }

    /// Absolute storage root; relative roots sit next to the running executable.
    pub fn resolved_storage_root(&self) -> PathBuf {
        if self.storage_root.is_absolute() {
            return self.storage_root.clone();
        }
        std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
            .map(|dir| dir.join(&self.storage_root))
            .unwrap_or_else(|| self.storage_root.clone())
    }

    pub fn browser_options(&self) -> BrowserOptions {
        BrowserOptions {
            chrome_executable: self.chrome_executable.clone(),
            viewport: self.viewport,
            headless: self.headless,
            navigation_timeout: self.timeouts.navigation,
            sitemap_probe_timeout: self.timeouts.sitemap_probe,
        }
    }

    pub fn pdf_options(&self) -> PdfOptions {
        PdfOptions::a4_with_margin_px(self.pdf.margin_px)
    }
}
