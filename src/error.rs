use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Pipeline stage a fatal error was raised in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CaptureStep {
    Normalize,
    Allocate,
    Launch,
    Navigate,
    ExtractHtml,
    RenderPdf,
    Sitemap,
}

impl fmt::Display for CaptureStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CaptureStep::Normalize => "normalizing URL",
            CaptureStep::Allocate => "creating output directory",
            CaptureStep::Launch => "launching browser",
            CaptureStep::Navigate => "navigating to page",
            CaptureStep::ExtractHtml => "saving HTML",
            CaptureStep::RenderPdf => "generating PDF",
            CaptureStep::Sitemap => "saving sitemap",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum SnapError {
    #[error("Invalid URL '{input}': {reason}")]
    InvalidUrl { input: String, reason: String },

    #[error("Navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    #[error("Storage error at {}: {source}", .path.display())]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Browser error: {0}")]
    Browser(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed while {step}: {source}")]
    Capture {
        step: CaptureStep,
        #[source]
        source: Box<SnapError>,
    },
}

impl SnapError {
    pub fn invalid_url(input: impl Into<String>, reason: impl Into<String>) -> Self {
        SnapError::InvalidUrl {
            input: input.into(),
            reason: reason.into(),
        }
    }

    pub fn navigation(url: impl Into<String>, reason: impl Into<String>) -> Self {
        SnapError::Navigation {
            url: url.into(),
            reason: reason.into(),
        }
    }

    pub fn storage(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SnapError::Storage {
            path: path.into(),
            source,
        }
    }

    pub fn browser(message: impl Into<String>) -> Self {
        SnapError::Browser(message.into())
    }

    /// Tags the error with the pipeline step it came from. Already tagged errors keep their step.
    pub fn at(self, step: CaptureStep) -> Self {
        match self {
            tagged @ SnapError::Capture { .. } => tagged,
            other => SnapError::Capture {
                step,
                source: Box::new(other),
            },
        }
    }

    pub fn step(&self) -> Option<CaptureStep> {
        match self {
            SnapError::Capture { step, .. } => Some(*step),
            _ => None,
        }
    }

    /// The underlying error with any step tag removed.
    pub fn root(&self) -> &SnapError {
        match self {
            SnapError::Capture { source, .. } => source.root(),
            other => other,
        }
    }

    pub fn to_payload(&self) -> ErrorPayload {
        match self {
            SnapError::Capture { step, source } => {
                let mut payload = source.to_payload();
                payload.step.get_or_insert(*step);
                payload
            }
            SnapError::InvalidUrl { .. } => ErrorPayload::new(
                ErrorCategory::Input,
                self.to_string(),
                "Enter a host or URL such as example.com or https://example.com/page.",
            ),
            SnapError::Navigation { reason, .. } => {
                let remediation = if reason.to_ascii_lowercase().contains("timed out") {
                    "The page did not settle in time; raise timeouts.navigation in the config or check the site responds."
                } else {
                    "Check connectivity/proxy/VPN and that the site is reachable, then retry."
                };
                ErrorPayload::new(ErrorCategory::Network, self.to_string(), remediation)
            }
            SnapError::Storage { .. } => ErrorPayload::new(
                ErrorCategory::Storage,
                self.to_string(),
                "Check permissions and free space under the storage root (storage_root in the config).",
            ),
            SnapError::Browser(msg) => {
                let lower = msg.to_ascii_lowercase();
                if lower.contains("not found") || lower.contains("executable") {
                    ErrorPayload::new(
                        ErrorCategory::Browser,
                        self.to_string(),
                        "Install Chromium/Chrome or set chrome_executable in the config (or SITESNAP_CHROME).",
                    )
                } else {
                    ErrorPayload::new(
                        ErrorCategory::Browser,
                        self.to_string(),
                        "Re-run with --verbose to see browser diagnostics.",
                    )
                }
            }
            SnapError::Config(_) => ErrorPayload::new(
                ErrorCategory::Config,
                self.to_string(),
                "Check the config file (TOML) for typos; durations use humantime like \"30s\".",
            ),
        }
    }
}

pub type Result<T> = std::result::Result<T, SnapError>;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    Input,
    Network,
    Storage,
    Browser,
    Config,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPayload {
    pub category: ErrorCategory,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<CaptureStep>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remediation: Option<String>,
}

impl ErrorPayload {
    pub fn new(category: ErrorCategory, message: String, remediation: impl Into<String>) -> Self {
        Self {
            category,
            step: None,
            message,
            remediation: Some(remediation.into()),
        }
    }
}
