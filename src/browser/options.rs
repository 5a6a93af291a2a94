//! Launch, navigation and print settings for render sessions.

use std::path::PathBuf;
use std::time::Duration;

use crate::Viewport;

/// Default timeout for loading the page being captured.
pub const DEFAULT_NAVIGATION_TIMEOUT: Duration = Duration::from_secs(30);

/// Default timeout for each sitemap candidate.
pub const DEFAULT_SITEMAP_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Default PDF margin on every side, in CSS pixels.
pub const DEFAULT_PDF_MARGIN_PX: u32 = 20;

/// A4 paper width in inches.
pub const A4_PAPER_WIDTH_IN: f64 = 8.27;

/// A4 paper height in inches.
pub const A4_PAPER_HEIGHT_IN: f64 = 11.69;

pub const CSS_PIXELS_PER_INCH: f64 = 96.0;

/// Configuration options for browser sessions.
#[derive(Debug, Clone)]
pub struct BrowserOptions {
    /// Explicit browser binary; discovered on the system when `None`.
    pub chrome_executable: Option<PathBuf>,
    /// Viewport dimensions for the page.
    pub viewport: Viewport,
    /// Whether to run in headless mode.
    pub headless: bool,
    /// Timeout for loading the captured page.
    pub navigation_timeout: Duration,
    /// Timeout for each sitemap candidate.
    pub sitemap_probe_timeout: Duration,
}

impl Default for BrowserOptions {
    fn default() -> Self {
        Self {
            chrome_executable: None,
            viewport: Viewport::default(),
            headless: true,
            navigation_timeout: DEFAULT_NAVIGATION_TIMEOUT,
            sitemap_probe_timeout: DEFAULT_SITEMAP_PROBE_TIMEOUT,
        }
    }
}

/// How long a single navigation may take, including the wait for network idle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigateOptions {
    pub timeout: Duration,
    pub wait_for_network_idle: bool,
}

impl NavigateOptions {
    /// Settings for the captured page itself.
    pub fn page(options: &BrowserOptions) -> Self {
        Self {
            timeout: options.navigation_timeout,
            wait_for_network_idle: true,
        }
    }

    /// Settings for one sitemap candidate.
    pub fn sitemap_probe(options: &BrowserOptions) -> Self {
        Self {
            timeout: options.sitemap_probe_timeout,
            wait_for_network_idle: true,
        }
    }
}

/// Page size and margins for the print rendering. Sizes are in inches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PdfOptions {
    pub paper_width: f64,
    pub paper_height: f64,
    pub margin: f64,
    pub print_background: bool,
}

impl PdfOptions {
    /// A4 with the same margin on all four sides.
    pub fn a4_with_margin_px(margin_px: u32) -> Self {
        Self {
            paper_width: A4_PAPER_WIDTH_IN,
            paper_height: A4_PAPER_HEIGHT_IN,
            margin: f64::from(margin_px) / CSS_PIXELS_PER_INCH,
            print_background: true,
        }
    }
}

impl Default for PdfOptions {
    fn default() -> Self {
        Self::a4_with_margin_px(DEFAULT_PDF_MARGIN_PX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn browser_options_default_values() {
        let opts = BrowserOptions::default();
        assert!(opts.chrome_executable.is_none());
        assert!(opts.headless);
        assert_eq!(opts.viewport.width, 1200);
        assert_eq!(opts.viewport.height, 800);
        assert_eq!(opts.navigation_timeout, Duration::from_secs(30));
        assert_eq!(opts.sitemap_probe_timeout, Duration::from_secs(5));
    }

    #[test]
    fn navigate_options_pick_matching_timeouts() {
        let opts = BrowserOptions {
            navigation_timeout: Duration::from_secs(12),
            sitemap_probe_timeout: Duration::from_secs(2),
            ..BrowserOptions::default()
        };

        let page = NavigateOptions::page(&opts);
        assert_eq!(page.timeout, Duration::from_secs(12));
        assert!(page.wait_for_network_idle);

        let probe = NavigateOptions::sitemap_probe(&opts);
        assert_eq!(probe.timeout, Duration::from_secs(2));
        assert!(probe.wait_for_network_idle);
    }

    #[test]
    fn default_pdf_is_a4_with_twenty_pixel_margins() {
        let pdf = PdfOptions::default();
        assert!((pdf.paper_width - 8.27).abs() < f64::EPSILON);
        assert!((pdf.paper_height - 11.69).abs() < f64::EPSILON);
        assert!((pdf.margin - 20.0 / 96.0).abs() < 1e-9);
        assert!(pdf.print_background);
    }
}
