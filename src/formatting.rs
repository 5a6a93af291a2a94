use std::fmt::Write as FmtWrite;

use crate::output::CaptureResult;
use crate::SnapError;

/// Post-capture report: where the files went and which ones were written.
pub fn format_capture_summary(result: &CaptureResult) -> String {
    let mut buf = String::new();
    writeln!(buf, "\nScraping completed successfully!").ok();
    writeln!(buf, "Files saved in: {}", result.directory().display()).ok();
    writeln!(buf, "Generated files:").ok();
    for file in result.generated_files() {
        writeln!(buf, "- {} ({})", file.name, file.description).ok();
    }
    if let Some(source) = &result.sitemap_source {
        writeln!(buf, "Sitemap source: {source}").ok();
    }
    buf
}

/// Failure report naming the step that broke and a remediation hint.
pub fn format_capture_error(err: &SnapError) -> String {
    let payload = err.to_payload();
    let mut buf = String::new();
    let context = payload
        .step
        .map(|step| format!(" while {step}"))
        .unwrap_or_default();
    writeln!(buf, "\nError during scraping{context}: {}", payload.message).ok();
    if let Some(hint) = payload.remediation {
        writeln!(buf, "Hint: {hint}").ok();
    }
    buf
}
