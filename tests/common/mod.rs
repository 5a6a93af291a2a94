#![allow(dead_code)]

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use sitesnap_lib::{
    BrowserOptions, CapturePipeline, CaptureSettings, NavigateOptions, NavigationResponse,
    PdfOptions, RenderEngine, RenderSession, Result, SnapError,
};

pub const FAKE_PDF: &[u8] = b"%PDF-1.4 scripted";

/// How the scripted browser answers one URL.
#[derive(Debug, Clone)]
pub enum Reply {
    Page { status: u16, body: String },
    Fail(String),
}

impl Reply {
    pub fn ok(body: &str) -> Self {
        Reply::Page {
            status: 200,
            body: body.to_string(),
        }
    }

    pub fn status(status: u16, body: &str) -> Self {
        Reply::Page {
            status,
            body: body.to_string(),
        }
    }

    pub fn timeout() -> Self {
        Reply::Fail("timed out after 30s".to_string())
    }
}

/// What the sessions did, shared with the test.
#[derive(Debug, Default)]
pub struct Journal {
    pub opened: usize,
    pub closed: usize,
    pub navigations: Vec<String>,
    pub pdf_requests: Vec<PdfOptions>,
    pub navigate_timeouts: Vec<std::time::Duration>,
}

type OpenHook = Arc<dyn Fn() + Send + Sync>;

/// A render engine that serves canned replies; unknown URLs answer 404.
#[derive(Clone, Default)]
pub struct ScriptedEngine {
    replies: Arc<HashMap<String, Reply>>,
    journal: Arc<Mutex<Journal>>,
    fail_launch: bool,
    fail_pdf: bool,
    on_open: Option<OpenHook>,
}

impl ScriptedEngine {
    pub fn new<'a>(replies: impl IntoIterator<Item = (&'a str, Reply)>) -> Self {
        Self {
            replies: Arc::new(
                replies
                    .into_iter()
                    .map(|(url, reply)| (url.to_string(), reply))
                    .collect(),
            ),
            ..Self::default()
        }
    }

    pub fn failing_launch() -> Self {
        Self {
            fail_launch: true,
            ..Self::default()
        }
    }

    pub fn with_failing_pdf(mut self) -> Self {
        self.fail_pdf = true;
        self
    }

    /// Runs `hook` each time a session opens, after the output directory exists.
    pub fn with_open_hook(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_open = Some(Arc::new(hook));
        self
    }

    pub fn journal(&self) -> std::sync::MutexGuard<'_, Journal> {
        self.journal.lock().unwrap()
    }
}

#[async_trait]
impl RenderEngine for ScriptedEngine {
    async fn open(&self, _options: &BrowserOptions) -> Result<Box<dyn RenderSession>> {
        if self.fail_launch {
            return Err(SnapError::browser("failed to launch Chromium: no such file"));
        }
        self.journal().opened += 1;
        if let Some(hook) = &self.on_open {
            hook();
        }
        Ok(Box::new(ScriptedSession {
            engine: self.clone(),
            current: None,
        }))
    }
}

struct ScriptedSession {
    engine: ScriptedEngine,
    current: Option<String>,
}

#[async_trait]
impl RenderSession for ScriptedSession {
    async fn navigate(
        &mut self,
        url: &str,
        options: &NavigateOptions,
    ) -> Result<NavigationResponse> {
        {
            let mut journal = self.engine.journal();
            journal.navigations.push(url.to_string());
            journal.navigate_timeouts.push(options.timeout);
        }
        let reply = self
            .engine
            .replies
            .get(url)
            .cloned()
            .unwrap_or_else(|| Reply::status(404, "<html><body>Not Found</body></html>"));
        match reply {
            Reply::Page { status, body } => {
                self.current = Some(body);
                Ok(NavigationResponse {
                    url: url.to_string(),
                    status: Some(status),
                })
            }
            Reply::Fail(reason) => Err(SnapError::navigation(url, reason)),
        }
    }

    async fn content(&mut self) -> Result<String> {
        self.current
            .clone()
            .ok_or_else(|| SnapError::browser("no document loaded"))
    }

    async fn pdf(&mut self, options: &PdfOptions) -> Result<Vec<u8>> {
        self.engine.journal().pdf_requests.push(*options);
        if self.engine.fail_pdf {
            return Err(SnapError::browser("failed to print PDF: target crashed"));
        }
        Ok(FAKE_PDF.to_vec())
    }

    async fn close(self: Box<Self>) {
        self.engine.journal().closed += 1;
    }
}

pub fn settings(root: &Path) -> CaptureSettings {
    CaptureSettings {
        storage_root: root.to_path_buf(),
        browser: BrowserOptions::default(),
        pdf: PdfOptions::default(),
        strict_sitemap: false,
    }
}

pub fn pipeline(engine: &ScriptedEngine, root: &Path) -> CapturePipeline<ScriptedEngine> {
    CapturePipeline::new(engine.clone(), settings(root))
}

/// Replaces `name` in the only run directory under `<root>/<host>` with a directory so
/// writing the artifact fails.
pub fn block_artifact(root: &Path, host: &str, name: &str) {
    let host_dir = root.join(host);
    let runs = entries(&host_dir);
    assert_eq!(runs.len(), 1, "expected exactly one run directory");
    std::fs::create_dir(host_dir.join(&runs[0]).join(name)).unwrap();
}

/// Names of the entries directly inside `dir`, sorted.
pub fn entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .map(|rd| {
            rd.filter_map(|e| e.ok())
                .map(|e| e.file_name().to_string_lossy().into_owned())
                .collect()
        })
        .unwrap_or_default();
    names.sort();
    names
}
