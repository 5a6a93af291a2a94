//! Interactive prompt loop. Input and output are injected so the loop runs without a terminal.

use serde::Serialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::debug;

use crate::browser::RenderEngine;
use crate::capture::CapturePipeline;
use crate::formatting::{format_capture_error, format_capture_summary};

pub const BANNER: &str = "Website Structure Scraper\n------------------------\n";
pub const URL_PROMPT: &str = "\nEnter the website URL to scrape (or 'exit' to quit): ";
pub const AGAIN_PROMPT: &str = "\nWould you like to scrape another website? (y/n): ";

const EXIT_COMMAND: &str = "exit";
const AGAIN_ANSWER: &str = "y";

/// Counts of what happened during one interactive session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DriverSummary {
    pub captured: usize,
    pub failed: usize,
}

/// Prompt for URLs until the user types `exit`, declines another round, or input ends.
///
/// A failed capture is reported and the loop carries on; only I/O errors on `input` or
/// `output` end it early.
pub async fn run_interactive<R, W, E>(
    input: R,
    output: &mut W,
    pipeline: &CapturePipeline<E>,
) -> std::io::Result<DriverSummary>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
    E: RenderEngine,
{
    let mut summary = DriverSummary::default();
    let mut lines = input.lines();

    write_flush(output, BANNER).await?;
    loop {
        write_flush(output, URL_PROMPT).await?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let url = line.trim();
        if url.eq_ignore_ascii_case(EXIT_COMMAND) {
            break;
        }
        if url.is_empty() {
            continue;
        }

        write_flush(output, &format!("\nStarting to scrape {url}...\n")).await?;
        match pipeline.capture(url).await {
            Ok(result) => {
                summary.captured += 1;
                debug!(result = %to_json(&result), "capture result");
                write_flush(output, &format_capture_summary(&result)).await?;
            }
            Err(err) => {
                summary.failed += 1;
                debug!(input = url, payload = %to_json(&err.to_payload()), "capture failed: {err}");
                write_flush(output, &format_capture_error(&err)).await?;
            }
        }

        write_flush(output, AGAIN_PROMPT).await?;
        let Some(answer) = lines.next_line().await? else {
            break;
        };
        if !answer.trim().eq_ignore_ascii_case(AGAIN_ANSWER) {
            break;
        }
    }

    Ok(summary)
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| format!("<unserializable: {e}>"))
}

async fn write_flush<W: AsyncWrite + Unpin>(output: &mut W, text: &str) -> std::io::Result<()> {
    output.write_all(text.as_bytes()).await?;
    output.flush().await
}
