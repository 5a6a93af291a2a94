use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

use crate::storage::{OutputLocation, HTML_FILE_NAME, PDF_FILE_NAME, SITEMAP_FILE_NAME};

/// Terminal value of one capture. Only the files it describes are persisted.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureResult {
    pub url: Url,
    pub location: OutputLocation,
    pub html_saved: bool,
    pub pdf_saved: bool,
    pub sitemap_saved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sitemap_source: Option<Url>,
    #[serde(with = "humantime_serde")]
    pub elapsed: Duration,
}

/// One artifact as listed in the post-capture summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratedFile {
    pub name: &'static str,
    pub description: &'static str,
}

impl CaptureResult {
    pub fn directory(&self) -> &PathBuf {
        &self.location.directory
    }

    /// Files actually written, in capture order.
    pub fn generated_files(&self) -> Vec<GeneratedFile> {
        let mut files = Vec::with_capacity(3);
        if self.html_saved {
            files.push(GeneratedFile {
                name: HTML_FILE_NAME,
                description: "Raw HTML",
            });
        }
        if self.pdf_saved {
            files.push(GeneratedFile {
                name: PDF_FILE_NAME,
                description: "PDF version",
            });
        }
        if self.sitemap_saved {
            files.push(GeneratedFile {
                name: SITEMAP_FILE_NAME,
                description: "Site structure",
            });
        }
        files
    }
}
