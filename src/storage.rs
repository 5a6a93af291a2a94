//! Per-capture output directories: `<root>/<host>/<timestamp>/`.

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde::Serialize;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

use crate::{Result, SnapError};

/// Rendered DOM of the captured page.
pub const HTML_FILE_NAME: &str = "page.html";
/// Print rendering of the captured page.
pub const PDF_FILE_NAME: &str = "page.pdf";
/// Body of the first sitemap candidate that answered ok.
pub const SITEMAP_FILE_NAME: &str = "sitemap.xml";

/// Bound on how far the allocator walks forward past occupied timestamps.
const MAX_COLLISION_STEPS: u32 = 1000;

/// Where one capture's artifacts live. Immutable once allocated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputLocation {
    pub host: String,
    pub timestamp: String,
    pub directory: PathBuf,
}

impl OutputLocation {
    pub fn html_path(&self) -> PathBuf {
        self.directory.join(HTML_FILE_NAME)
    }

    pub fn pdf_path(&self) -> PathBuf {
        self.directory.join(PDF_FILE_NAME)
    }

    pub fn sitemap_path(&self) -> PathBuf {
        self.directory.join(SITEMAP_FILE_NAME)
    }
}

/// Formats an instant as an ISO-8601 UTC timestamp with `:` and `.` replaced by `-`.
///
/// `2024-05-01T12:30:00.000Z` becomes `2024-05-01T12-30-00-000Z`.
pub fn format_timestamp(instant: DateTime<Utc>) -> String {
    instant
        .format("%Y-%m-%dT%H:%M:%S%.3fZ")
        .to_string()
        .replace([':', '.'], "-")
}

/// Creates output directories below a fixed storage root.
#[derive(Debug, Clone)]
pub struct OutputAllocator {
    root: PathBuf,
}

impl OutputAllocator {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Creates a fresh directory for `host` stamped with `started_at`.
    ///
    /// Parent segments may already exist. The leaf never does: if another capture took the
    /// same millisecond, the stamp is moved forward one millisecond at a time.
    pub async fn allocate(
        &self,
        host: &str,
        started_at: DateTime<Utc>,
    ) -> Result<OutputLocation> {
        let host_dir = self.root.join(host);
        fs::create_dir_all(&host_dir)
            .await
            .map_err(|e| SnapError::storage(&host_dir, e))?;

        let mut instant = started_at;
        for _ in 0..MAX_COLLISION_STEPS {
            let timestamp = format_timestamp(instant);
            let directory = host_dir.join(&timestamp);
            match fs::create_dir(&directory).await {
                Ok(()) => {
                    debug!(path = %directory.display(), "allocated output directory");
                    return Ok(OutputLocation {
                        host: host.to_string(),
                        timestamp,
                        directory,
                    });
                }
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                    debug!(path = %directory.display(), "output directory taken, advancing timestamp");
                    instant += ChronoDuration::milliseconds(1);
                }
                Err(e) => return Err(SnapError::storage(directory, e)),
            }
        }

        Err(SnapError::storage(
            host_dir,
            io::Error::new(
                io::ErrorKind::AlreadyExists,
                "no free timestamp directory near the capture start",
            ),
        ))
    }
}

/// Writes one artifact into an allocated location, mapping failures to storage errors.
pub(crate) async fn write_artifact(path: &Path, contents: impl AsRef<[u8]>) -> Result<()> {
    fs::write(path, contents)
        .await
        .map_err(|e| SnapError::storage(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn instant() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap()
    }

    #[test]
    fn timestamp_is_filesystem_safe() {
        assert_eq!(format_timestamp(instant()), "2024-05-01T12-30-00-000Z");

        let with_millis = instant() + ChronoDuration::milliseconds(42);
        let stamp = format_timestamp(with_millis);
        assert_eq!(stamp, "2024-05-01T12-30-00-042Z");
        assert!(!stamp.contains([':', '.']));
    }

    #[tokio::test]
    async fn allocate_creates_nested_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let allocator = OutputAllocator::new(tmp.path().join("scrapes"));

        let location = allocator.allocate("example.com", instant()).await.unwrap();

        assert!(location.directory.is_dir());
        assert_eq!(
            location.directory,
            tmp.path()
                .join("scrapes")
                .join("example.com")
                .join("2024-05-01T12-30-00-000Z")
        );
        assert_eq!(location.html_path(), location.directory.join("page.html"));
        assert_eq!(location.sitemap_path(), location.directory.join("sitemap.xml"));
    }

    #[tokio::test]
    async fn same_instant_twice_yields_distinct_directories() {
        let tmp = tempfile::tempdir().unwrap();
        let allocator = OutputAllocator::new(tmp.path());

        let first = allocator.allocate("example.com", instant()).await.unwrap();
        let second = allocator.allocate("example.com", instant()).await.unwrap();

        assert_ne!(first.directory, second.directory);
        assert_eq!(second.timestamp, "2024-05-01T12-30-00-001Z");
        assert!(first.directory.is_dir() && second.directory.is_dir());
    }

    #[tokio::test]
    async fn allocate_reports_storage_error_when_root_is_a_file() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("not-a-dir");
        std::fs::write(&blocker, b"x").unwrap();

        let err = OutputAllocator::new(&blocker)
            .allocate("example.com", instant())
            .await
            .unwrap_err();
        assert!(matches!(err, SnapError::Storage { .. }));
    }
}
