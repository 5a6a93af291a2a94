//! Best-effort sitemap discovery over a fixed list of conventional paths.
//!
//! Candidates are probed one after another on the capture's own page, in priority order,
//! and the first ok response wins. Failing candidates are recorded and skipped; running out
//! of candidates is a normal outcome, not an error.

use tracing::debug;
use url::Url;

use crate::browser::{NavigateOptions, RenderSession};

/// Paths appended to the base URL, highest priority first.
pub const SITEMAP_PATHS: [&str; 4] = ["sitemap.xml", "sitemap_index.xml", "sitemap", "sitemap_index"];

/// Root elements accepted by strict validation.
const SITEMAP_ROOT_MARKERS: [&str; 2] = ["<urlset", "<sitemapindex"];

/// Builds the ordered candidate list for `base`.
///
/// Query and fragment are dropped and trailing slashes trimmed before appending, so both
/// `https://example.com` and `https://example.com/` probe `https://example.com/sitemap.xml`,
/// while `https://example.com/blog/` probes under `/blog`.
pub fn sitemap_candidates(base: &Url) -> Vec<Url> {
    let mut stem = base.clone();
    stem.set_query(None);
    stem.set_fragment(None);
    let stem = stem.as_str().trim_end_matches('/').to_string();

    SITEMAP_PATHS
        .iter()
        .filter_map(|path| Url::parse(&format!("{stem}/{path}")).ok())
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscoveryOptions {
    pub navigate: NavigateOptions,
    /// Require a `<urlset>` or `<sitemapindex>` root instead of trusting any ok response.
    pub strict: bool,
}

/// Why one candidate was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeFailure {
    /// Navigation failed or timed out.
    Unreachable { candidate: Url, reason: String },
    /// The server answered with a non-2xx status (or none at all).
    NotOk { candidate: Url, status: Option<u16> },
    /// Loaded fine but the document could not be read.
    Unreadable { candidate: Url, reason: String },
    /// Strict mode only: the body is not a sitemap document.
    NotASitemap { candidate: Url },
}

impl ProbeFailure {
    pub fn candidate(&self) -> &Url {
        match self {
            ProbeFailure::Unreachable { candidate, .. }
            | ProbeFailure::NotOk { candidate, .. }
            | ProbeFailure::Unreadable { candidate, .. }
            | ProbeFailure::NotASitemap { candidate } => candidate,
        }
    }
}

/// Terminal state of discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SitemapOutcome {
    Found { content: String, source: Url },
    NotFound { attempts: Vec<ProbeFailure> },
}

/// Probes each candidate in order and stops at the first ok response.
pub async fn discover_sitemap(
    session: &mut dyn RenderSession,
    base: &Url,
    options: &DiscoveryOptions,
) -> SitemapOutcome {
    let mut attempts = Vec::new();

    for candidate in sitemap_candidates(base) {
        let navigated = session.navigate(candidate.as_str(), &options.navigate).await;
        let failure = match navigated {
            Err(e) => ProbeFailure::Unreachable {
                candidate,
                reason: e.to_string(),
            },
            Ok(response) if !response.is_ok() => ProbeFailure::NotOk {
                candidate,
                status: response.status,
            },
            Ok(_) => match session.content().await {
                Err(e) => ProbeFailure::Unreadable {
                    candidate,
                    reason: e.to_string(),
                },
                Ok(content) if options.strict && !looks_like_sitemap(&content) => {
                    ProbeFailure::NotASitemap { candidate }
                }
                Ok(content) => {
                    debug!(source = %candidate, bytes = content.len(), "sitemap found");
                    return SitemapOutcome::Found {
                        content,
                        source: candidate,
                    };
                }
            },
        };

        debug!(candidate = %failure.candidate(), ?failure, "sitemap candidate skipped");
        attempts.push(failure);
    }

    SitemapOutcome::NotFound { attempts }
}

fn looks_like_sitemap(body: &str) -> bool {
    SITEMAP_ROOT_MARKERS.iter().any(|marker| body.contains(marker))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(urls: &[Url]) -> Vec<&str> {
        urls.iter().map(Url::as_str).collect()
    }

    #[test]
    fn candidates_follow_priority_order() {
        let base = Url::parse("https://example.com").unwrap();
        assert_eq!(
            strings(&sitemap_candidates(&base)),
            vec![
                "https://example.com/sitemap.xml",
                "https://example.com/sitemap_index.xml",
                "https://example.com/sitemap",
                "https://example.com/sitemap_index",
            ]
        );
    }

    #[test]
    fn candidates_append_to_the_base_path() {
        let base = Url::parse("https://example.com/blog/").unwrap();
        let candidates = sitemap_candidates(&base);
        assert_eq!(candidates[0].as_str(), "https://example.com/blog/sitemap.xml");
        assert_eq!(candidates[3].as_str(), "https://example.com/blog/sitemap_index");
    }

    #[test]
    fn candidates_drop_query_and_fragment() {
        let base = Url::parse("http://example.com/shop?page=2#top").unwrap();
        assert_eq!(
            sitemap_candidates(&base)[1].as_str(),
            "http://example.com/shop/sitemap_index.xml"
        );
    }

    #[test]
    fn candidates_keep_port() {
        let base = Url::parse("http://localhost:8080/").unwrap();
        assert_eq!(
            sitemap_candidates(&base)[0].as_str(),
            "http://localhost:8080/sitemap.xml"
        );
    }

    #[test]
    fn strict_check_accepts_urlset_and_index() {
        assert!(looks_like_sitemap(
            r#"<?xml version="1.0"?><urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9"></urlset>"#
        ));
        assert!(looks_like_sitemap("<sitemapindex><sitemap/></sitemapindex>"));
        assert!(!looks_like_sitemap("<html><body>Not found</body></html>"));
    }

    #[test]
    fn probe_failure_exposes_candidate() {
        let candidate = Url::parse("https://example.com/sitemap").unwrap();
        let failure = ProbeFailure::NotOk {
            candidate: candidate.clone(),
            status: Some(404),
        };
        assert_eq!(failure.candidate(), &candidate);
    }
}
