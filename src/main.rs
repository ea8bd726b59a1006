use chirp::core::config::{self, ChirpConfig, CliOverrides};
use clap::Parser;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;

#[derive(Parser)]
#[command(name = "chirp", about = "A terminal client for a tweet feed")]
struct Args {
    /// Base URL of the tweet API (overrides config and CHIRP_API_URL)
    #[arg(long)]
    api_url: Option<String>,

    /// Local port for the OAuth redirect listener
    #[arg(long)]
    redirect_port: Option<u16>,

    /// Skip the feed refresh on startup
    #[arg(long)]
    no_refresh: bool,

    /// Print the sign-in URL to the log instead of opening a browser
    #[arg(long)]
    no_browser: bool,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to chirp.log in current directory
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create("chirp.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let file_config = config::load_config().unwrap_or_else(|e| {
        log::warn!("{e}; falling back to default config");
        ChirpConfig::default()
    });
    let cli = CliOverrides {
        api_url: args.api_url,
        redirect_port: args.redirect_port,
        no_refresh: args.no_refresh,
        no_browser: args.no_browser,
    };
    let resolved = config::resolve(&file_config, &cli);

    log::info!("Chirp starting up against {}", resolved.api_base_url);

    chirp::tui::run(resolved)
}
