//! Chromium-backed render sessions using chromiumoxide.

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::page::{EventLifecycleEvent, PrintToPdfParams};
use chromiumoxide::handler::viewport::Viewport as CdpViewport;
use chromiumoxide::listeners::EventStream;
use chromiumoxide::page::Page;
use futures::StreamExt;
use std::path::PathBuf;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use super::{
    BrowserOptions, NavigateOptions, NavigationResponse, PdfOptions, RenderEngine, RenderSession,
};
use crate::{Result, SnapError};

/// Environment variable that points at a browser binary.
pub const CHROME_ENV_VAR: &str = "SITESNAP_CHROME";

const PATH_CANDIDATES: &[&str] = &[
    "google-chrome",
    "google-chrome-stable",
    "chromium",
    "chromium-browser",
];

/// Find a Chromium/Chrome binary: `SITESNAP_CHROME`, then well-known names on `PATH`.
///
/// Returns `None` when nothing matches; chromiumoxide then runs its own detection.
pub fn find_chromium() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os(CHROME_ENV_VAR).map(PathBuf::from) {
        if path.exists() {
            return Some(path);
        }
        warn!(path = %path.display(), "{CHROME_ENV_VAR} points at a missing file; ignoring it");
    }

    PATH_CANDIDATES
        .iter()
        .find_map(|name| which::which(name).ok())
}

/// Launches one headless Chromium per capture.
#[derive(Debug, Clone, Default)]
pub struct ChromiumEngine;

impl ChromiumEngine {
    pub fn new() -> Self {
        Self
    }

    fn browser_config(options: &BrowserOptions) -> Result<BrowserConfig> {
        let viewport = options.viewport;
        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .arg("--disable-setuid-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-gpu")
            .arg("--no-first-run")
            .arg("--no-default-browser-check")
            .window_size(viewport.width, viewport.height)
            .viewport(CdpViewport {
                width: viewport.width,
                height: viewport.height,
                device_scale_factor: None,
                emulating_mobile: false,
                is_landscape: false,
                has_touch: false,
            })
            .request_timeout(options.navigation_timeout);

        if !options.headless {
            builder = builder.with_head();
        }

        if let Some(path) = options.chrome_executable.clone().or_else(find_chromium) {
            debug!(path = %path.display(), "using browser executable");
            builder = builder.chrome_executable(path);
        }

        builder.build().map_err(|e| {
            if e.to_ascii_lowercase().contains("detect") {
                SnapError::browser(format!("Chromium executable not found ({e})"))
            } else {
                SnapError::browser(format!("failed to build browser config: {e}"))
            }
        })
    }
}

#[async_trait]
impl RenderEngine for ChromiumEngine {
    async fn open(&self, options: &BrowserOptions) -> Result<Box<dyn RenderSession>> {
        let config = Self::browser_config(options)?;

        info!(viewport = %options.viewport, headless = options.headless, "launching browser");
        let (mut browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| SnapError::browser(format!("failed to launch Chromium: {e}")))?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("browser handler error: {e}");
                }
            }
        });

        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                shutdown(&mut browser, handler).await;
                return Err(SnapError::browser(format!("failed to open page: {e}")));
            }
        };

        Ok(Box::new(ChromiumSession {
            browser,
            page,
            handler,
        }))
    }
}

/// One browser process and its only page.
///
/// If a session is dropped without [`RenderSession::close`], chromiumoxide still kills the
/// child process because it is spawned with kill-on-drop.
pub struct ChromiumSession {
    browser: Browser,
    page: Page,
    handler: JoinHandle<()>,
}

#[async_trait]
impl RenderSession for ChromiumSession {
    async fn navigate(
        &mut self,
        url: &str,
        options: &NavigateOptions,
    ) -> Result<NavigationResponse> {
        let page = &self.page;
        let load = async {
            let mut lifecycle = if options.wait_for_network_idle {
                Some(
                    page.event_listener::<EventLifecycleEvent>()
                        .await
                        .map_err(|e| SnapError::browser(format!("lifecycle listener: {e}")))?,
                )
            } else {
                None
            };

            page.goto(url)
                .await
                .map_err(|e| SnapError::navigation(url, e.to_string()))?;
            let request = page
                .wait_for_navigation_response()
                .await
                .map_err(|e| SnapError::navigation(url, e.to_string()))?;

            if let Some(events) = lifecycle.as_mut() {
                let main_frame = page.mainframe().await.ok().flatten();
                wait_for_network_idle(events, main_frame.as_ref(), url).await?;
            }

            let status = request
                .as_ref()
                .and_then(|req| req.response.as_ref())
                .and_then(|resp| u16::try_from(resp.status).ok());
            Ok::<_, SnapError>(status)
        };

        let status = timeout(options.timeout, load).await.map_err(|_| {
            SnapError::navigation(url, format!("timed out after {:?}", options.timeout))
        })??;

        let final_url = page
            .url()
            .await
            .ok()
            .flatten()
            .unwrap_or_else(|| url.to_string());
        debug!(url, final_url = %final_url, ?status, "navigation finished");

        Ok(NavigationResponse {
            url: final_url,
            status,
        })
    }

    async fn content(&mut self) -> Result<String> {
        self.page
            .content()
            .await
            .map_err(|e| SnapError::browser(format!("failed to read page content: {e}")))
    }

    async fn pdf(&mut self, options: &PdfOptions) -> Result<Vec<u8>> {
        let params = PrintToPdfParams::builder()
            .paper_width(options.paper_width)
            .paper_height(options.paper_height)
            .margin_top(options.margin)
            .margin_bottom(options.margin)
            .margin_left(options.margin)
            .margin_right(options.margin)
            .print_background(options.print_background)
            .build();

        self.page
            .pdf(params)
            .await
            .map_err(|e| SnapError::browser(format!("failed to print PDF: {e}")))
    }

    async fn close(self: Box<Self>) {
        let ChromiumSession {
            mut browser,
            page,
            handler,
        } = *self;
        drop(page);
        shutdown(&mut browser, handler).await;
    }
}

async fn shutdown(browser: &mut Browser, handler: JoinHandle<()>) {
    if let Err(e) = browser.close().await {
        warn!("browser did not close cleanly: {e}; killing it");
        if let Some(Err(e)) = browser.kill().await {
            warn!("failed to kill browser process: {e}");
        }
    }
    match browser.wait().await {
        Ok(status) => debug!(?status, "browser exited"),
        Err(e) => warn!("failed to reap browser process: {e}"),
    }
    handler.abort();
}

/// Waits for the main frame of the new document to report `networkIdle`.
///
/// Events are only counted after the frame's `init`, so a late idle signal from the previous
/// document cannot end the wait early.
async fn wait_for_network_idle(
    events: &mut EventStream<EventLifecycleEvent>,
    main_frame: Option<&chromiumoxide::cdp::browser_protocol::page::FrameId>,
    url: &str,
) -> Result<()> {
    let mut committed = false;
    while let Some(event) = events.next().await {
        if main_frame.is_some_and(|id| *id != event.frame_id) {
            continue;
        }
        match event.name.as_str() {
            "init" => committed = true,
            "networkIdle" if committed => return Ok(()),
            _ => {}
        }
    }
    Err(SnapError::navigation(
        url,
        "browser stopped reporting page lifecycle before the network went idle",
    ))
}
