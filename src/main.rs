mod cli;
mod logging;
mod settings;

use std::process::ExitCode;
use std::sync::Arc;

use sitesnap_lib::formatting::format_capture_error;
use sitesnap_lib::{run_interactive, CapturePipeline, CaptureSettings, ChromiumEngine};
use tokio::io::BufReader;
use tracing::{debug, info};

use settings::{format_effective_config, load_config};

#[tokio::main]
async fn main() -> ExitCode {
    run().await
}

async fn run() -> ExitCode {
    let args = cli::parse();
    logging::init_logging(args.verbose);

    let config = match load_config(args.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(err) => {
            eprint!("{}", format_capture_error(&err));
            // Reserve exit code 2 for fatal errors.
            return ExitCode::from(2);
        }
    };
    if args.verbose {
        info!("{}", format_effective_config(&config, args.config.as_deref()));
    }

    let pipeline = CapturePipeline::new(ChromiumEngine::new(), CaptureSettings::from(&config))
        .with_progress(Arc::new(|msg: &str| println!("{msg}")));

    let input = BufReader::new(tokio::io::stdin());
    let mut output = tokio::io::stdout();
    match run_interactive(input, &mut output, &pipeline).await {
        Ok(summary) => {
            debug!(captured = summary.captured, failed = summary.failed, "session finished");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("An error occurred: {err}");
            ExitCode::FAILURE
        }
    }
}
