//! Turns user input into an absolute capture URL plus a directory-safe host name.

use url::{Host, Url};

use crate::{Result, SnapError};

const DEFAULT_SCHEME_PREFIX: &str = "https://";
const SUPPORTED_SCHEME_PREFIXES: &[&str] = &["http://", "https://"];

/// A normalized capture request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureTarget {
    /// Absolute URL, always `http` or `https`.
    pub url: Url,
    /// Host name used as a path segment under the storage root.
    pub host: String,
}

/// Normalizes raw user input into a [`CaptureTarget`].
///
/// Inputs without a scheme get `https://` prefixed once. Explicit schemes other than
/// `http`/`https` are rejected, as is anything the URL parser refuses or that has no host.
pub fn normalize_target(raw: &str) -> Result<CaptureTarget> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(SnapError::invalid_url(raw, "input is empty"));
    }

    let candidate = with_scheme(trimmed)?;
    let url = Url::parse(&candidate)
        .map_err(|e| SnapError::invalid_url(trimmed, e.to_string()))?;

    let host = match url.host() {
        Some(host) => host_identifier(&host),
        None => return Err(SnapError::invalid_url(trimmed, "URL has no host")),
    };
    if host.is_empty() {
        return Err(SnapError::invalid_url(trimmed, "URL has an empty host"));
    }

    Ok(CaptureTarget { url, host })
}

fn with_scheme(input: &str) -> Result<String> {
    let lower = input.to_ascii_lowercase();
    if SUPPORTED_SCHEME_PREFIXES
        .iter()
        .any(|prefix| lower.starts_with(prefix))
    {
        return Ok(input.to_string());
    }

    if let Some(scheme) = input
        .split_once("://")
        .map(|(head, _)| head)
        .filter(|head| is_scheme_token(head))
    {
        return Err(SnapError::invalid_url(
            input,
            format!("unsupported scheme '{scheme}'; only http and https pages can be captured"),
        ));
    }

    Ok(format!("{DEFAULT_SCHEME_PREFIX}{input}"))
}

/// `ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )`, so `example.com/out?to=https` is not a scheme.
fn is_scheme_token(value: &str) -> bool {
    let mut chars = value.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

fn host_identifier(host: &Host<&str>) -> String {
    let raw = match host {
        Host::Domain(domain) => domain.to_string(),
        Host::Ipv4(addr) => addr.to_string(),
        Host::Ipv6(addr) => addr.to_string(),
    };
    sanitize_segment(&raw)
}

/// Replaces anything that is not safe in a single path segment with `_`.
pub(crate) fn sanitize_segment(value: &str) -> String {
    value
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect::<String>()
        .trim_matches('.')
        .to_string()
}
