//! Headless browser rendering.
//!
//! The capture pipeline only talks to the [`RenderEngine`] and [`RenderSession`] traits:
//! launch a browser, navigate with an idle-network wait, read the rendered document,
//! print it to PDF and shut the browser down. [`ChromiumEngine`] implements them on top
//! of chromiumoxide.
//!
//! # Module Structure
//!
//! - [`options`] - Launch, navigation and PDF settings with their defaults
//! - [`chromium`] - Chromium implementation and executable discovery
//!
//! # Example
//!
//! ```no_run
//! use sitesnap_lib::{BrowserOptions, ChromiumEngine, NavigateOptions, RenderEngine};
//!
//! # async fn example() -> sitesnap_lib::Result<()> {
//! let engine = ChromiumEngine::new();
//! let options = BrowserOptions::default();
//! let mut session = engine.open(&options).await?;
//! let response = session
//!     .navigate("https://example.com/", &NavigateOptions::page(&options))
//!     .await?;
//! println!("ok: {}", response.is_ok());
//! session.close().await;
//! # Ok(())
//! # }
//! ```

mod chromium;
mod options;

use async_trait::async_trait;

use crate::Result;

pub use chromium::{find_chromium, ChromiumEngine};
pub use options::{
    BrowserOptions, NavigateOptions, PdfOptions, A4_PAPER_HEIGHT_IN, A4_PAPER_WIDTH_IN,
    CSS_PIXELS_PER_INCH, DEFAULT_NAVIGATION_TIMEOUT, DEFAULT_PDF_MARGIN_PX,
    DEFAULT_SITEMAP_PROBE_TIMEOUT,
};

/// Outcome of a completed navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationResponse {
    /// URL the page ended up on.
    pub url: String,
    /// HTTP status of the main document, when the engine saw one.
    pub status: Option<u16>,
}

impl NavigationResponse {
    /// True for 2xx statuses, mirroring the usual `response.ok` convention.
    pub fn is_ok(&self) -> bool {
        matches!(self.status, Some(code) if (200..300).contains(&code))
    }
}

/// Launches render sessions.
#[async_trait]
pub trait RenderEngine: Send + Sync {
    /// Start one isolated browser with a single page configured from `options`.
    async fn open(&self, options: &BrowserOptions) -> Result<Box<dyn RenderSession>>;
}

/// One live browser plus page, owned by a single capture.
#[async_trait]
pub trait RenderSession: Send {
    /// Navigate and wait for the network to go idle, bounded by `options.timeout`.
    async fn navigate(&mut self, url: &str, options: &NavigateOptions)
        -> Result<NavigationResponse>;

    /// Serialized DOM of the currently loaded document, after scripts ran.
    async fn content(&mut self) -> Result<String>;

    /// Print the currently loaded document to PDF bytes.
    async fn pdf(&mut self, options: &PdfOptions) -> Result<Vec<u8>>;

    /// Terminate the browser. Never fails; problems are logged.
    async fn close(self: Box<Self>);
}
