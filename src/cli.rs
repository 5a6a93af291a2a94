use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sitesnap")]
#[command(
    version,
    about = "Site Snapshot - Save rendered HTML, a PDF print and the sitemap of web pages",
    long_about = "Site Snapshot (sitesnap)\n\nPrompts for URLs one at a time. Each capture writes page.html, page.pdf and, when found, sitemap.xml into <storage-root>/<host>/<timestamp>/.\nType 'exit' at the URL prompt to quit."
)]
pub struct Cli {
    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(
        long,
        value_name = "PATH",
        help = "Optional config file (TOML) for storage root, browser, timeouts and PDF margin"
    )]
    pub config: Option<PathBuf>,
}

pub fn parse() -> Cli {
    Cli::parse()
}
