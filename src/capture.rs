//! The capture pipeline: one URL in, `page.html` + `page.pdf` (+ `sitemap.xml`) out.
//!
//! Steps run strictly in order: normalize, allocate the output directory, launch the
//! browser, navigate, save HTML, print PDF, probe for a sitemap. The browser session is
//! closed before `capture` returns, whatever the outcome.

use chrono::{DateTime, Utc};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, warn};
use url::Url;

use crate::browser::{BrowserOptions, NavigateOptions, PdfOptions, RenderEngine, RenderSession};
use crate::config::Config;
use crate::error::CaptureStep;
use crate::output::CaptureResult;
use crate::progress::{log_progress, ProgressCallback};
use crate::sitemap::{discover_sitemap, DiscoveryOptions, SitemapOutcome};
use crate::storage::{write_artifact, OutputAllocator, OutputLocation};
use crate::target::{normalize_target, CaptureTarget};
use crate::Result;

/// Everything the pipeline needs besides the engine.
#[derive(Debug, Clone)]
pub struct CaptureSettings {
    pub storage_root: PathBuf,
    pub browser: BrowserOptions,
    pub pdf: PdfOptions,
    pub strict_sitemap: bool,
}

impl From<&Config> for CaptureSettings {
    fn from(config: &Config) -> Self {
        Self {
            storage_root: config.resolved_storage_root(),
            browser: config.browser_options(),
            pdf: config.pdf_options(),
            strict_sitemap: config.sitemap.strict,
        }
    }
}

pub struct CapturePipeline<E> {
    engine: E,
    allocator: OutputAllocator,
    browser: BrowserOptions,
    pdf: PdfOptions,
    strict_sitemap: bool,
    progress: Option<ProgressCallback>,
}

impl<E: RenderEngine> CapturePipeline<E> {
    pub fn new(engine: E, settings: CaptureSettings) -> Self {
        Self {
            engine,
            allocator: OutputAllocator::new(settings.storage_root),
            browser: settings.browser,
            pdf: settings.pdf,
            strict_sitemap: settings.strict_sitemap,
            progress: None,
        }
    }

    /// Report each step through `progress` as it starts.
    pub fn with_progress(mut self, progress: ProgressCallback) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Capture `raw_input` stamped with the current time.
    pub async fn capture(&self, raw_input: &str) -> Result<CaptureResult> {
        self.capture_at(raw_input, Utc::now()).await
    }

    /// Capture `raw_input` with an explicit start instant for the output directory name.
    pub async fn capture_at(
        &self,
        raw_input: &str,
        started_at: DateTime<Utc>,
    ) -> Result<CaptureResult> {
        let clock = Instant::now();
        let target = normalize_target(raw_input).map_err(|e| e.at(CaptureStep::Normalize))?;
        let location = self
            .allocator
            .allocate(&target.host, started_at)
            .await
            .map_err(|e| e.at(CaptureStep::Allocate))?;

        log_progress(&self.progress, "Launching browser...");
        let mut session = self
            .engine
            .open(&self.browser)
            .await
            .map_err(|e| e.at(CaptureStep::Launch))?;

        let steps = self.run_steps(session.as_mut(), &target, &location).await;
        session.close().await;
        let sitemap_source = steps?;

        let result = CaptureResult {
            url: target.url,
            html_saved: true,
            pdf_saved: true,
            sitemap_saved: sitemap_source.is_some(),
            sitemap_source,
            location,
            elapsed: clock.elapsed(),
        };
        info!(
            url = %result.url,
            directory = %result.directory().display(),
            sitemap = result.sitemap_saved,
            elapsed_ms = result.elapsed.as_millis() as u64,
            "capture finished"
        );
        Ok(result)
    }

    /// Navigate, save HTML and PDF, then try the sitemap. Returns the sitemap source if saved.
    async fn run_steps(
        &self,
        session: &mut dyn RenderSession,
        target: &CaptureTarget,
        location: &OutputLocation,
    ) -> Result<Option<Url>> {
        log_progress(&self.progress, "Navigating to page...");
        let response = session
            .navigate(target.url.as_str(), &NavigateOptions::page(&self.browser))
            .await
            .map_err(|e| e.at(CaptureStep::Navigate))?;
        if !response.is_ok() {
            warn!(url = %target.url, status = ?response.status, "page did not answer 2xx; capturing anyway");
        }

        log_progress(&self.progress, "Getting raw HTML...");
        let html = session
            .content()
            .await
            .map_err(|e| e.at(CaptureStep::ExtractHtml))?;
        write_artifact(&location.html_path(), html)
            .await
            .map_err(|e| e.at(CaptureStep::ExtractHtml))?;

        log_progress(&self.progress, "Generating PDF...");
        let pdf = session
            .pdf(&self.pdf)
            .await
            .map_err(|e| e.at(CaptureStep::RenderPdf))?;
        write_artifact(&location.pdf_path(), pdf)
            .await
            .map_err(|e| e.at(CaptureStep::RenderPdf))?;

        log_progress(&self.progress, "Attempting to fetch sitemap.xml...");
        let discovery = DiscoveryOptions {
            navigate: NavigateOptions::sitemap_probe(&self.browser),
            strict: self.strict_sitemap,
        };
        match discover_sitemap(session, &target.url, &discovery).await {
            SitemapOutcome::Found { content, source } => {
                write_artifact(&location.sitemap_path(), content)
                    .await
                    .map_err(|e| e.at(CaptureStep::Sitemap))?;
                log_progress(&self.progress, "Sitemap.xml saved successfully!");
                Ok(Some(source))
            }
            SitemapOutcome::NotFound { attempts } => {
                info!(url = %target.url, attempts = attempts.len(), "no sitemap found");
                log_progress(&self.progress, "No sitemap.xml found.");
                Ok(None)
            }
        }
    }
}
