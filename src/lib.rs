//! Site Snapshot (sitesnap) Library
//!
//! Captures a structural snapshot of a single web page: the rendered HTML, an A4 print
//! rendering as PDF and, when one of the conventional locations answers, the site's
//! sitemap. Artifacts land in `<storage-root>/<host>/<timestamp>/`.
//!
//! # Module Overview
//!
//! - [`target`] - URL normalization and host naming
//! - [`storage`] - Output directory allocation and artifact names
//! - [`browser`] - Render engine traits and the Chromium implementation
//! - [`sitemap`] - Ordered sitemap candidate probing
//! - [`capture`] - The capture pipeline
//! - [`driver`] - Interactive prompt loop
//! - [`config`] - Configuration file support
//!
//! # Example
//!
//! ```no_run
//! use sitesnap_lib::{CapturePipeline, CaptureSettings, ChromiumEngine, Config};
//!
//! # async fn example() -> sitesnap_lib::Result<()> {
//! let config = Config::default();
//! let pipeline = CapturePipeline::new(ChromiumEngine::new(), CaptureSettings::from(&config));
//! let result = pipeline.capture("example.com").await?;
//! println!("saved to {}", result.directory().display());
//! # Ok(())
//! # }
//! ```

pub mod browser;
pub mod capture;
pub mod config;
pub mod driver;
pub mod error;
pub mod formatting;
pub mod output;
pub mod progress;
pub mod sitemap;
pub mod storage;
pub mod target;
pub mod viewport;

pub use browser::{
    find_chromium, BrowserOptions, ChromiumEngine, NavigateOptions, NavigationResponse,
    PdfOptions, RenderEngine, RenderSession, DEFAULT_NAVIGATION_TIMEOUT,
    DEFAULT_SITEMAP_PROBE_TIMEOUT,
};
pub use capture::{CapturePipeline, CaptureSettings};
pub use config::{Config, ConfigError};
pub use driver::{run_interactive, DriverSummary};
pub use error::{CaptureStep, ErrorCategory, ErrorPayload, Result, SnapError};
pub use output::{CaptureResult, GeneratedFile};
pub use progress::ProgressCallback;
pub use sitemap::{
    discover_sitemap, sitemap_candidates, DiscoveryOptions, ProbeFailure, SitemapOutcome,
    SITEMAP_PATHS,
};
pub use storage::{
    format_timestamp, OutputAllocator, OutputLocation, HTML_FILE_NAME, PDF_FILE_NAME,
    SITEMAP_FILE_NAME,
};
pub use target::{normalize_target, CaptureTarget};
pub use viewport::Viewport;
