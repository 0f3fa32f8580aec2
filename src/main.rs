use clap::Parser;
use colored::Colorize;

use kopistart::cli::{Cli, Commands};
use kopistart::config;
use kopistart::runtime::modes;
use kopistart::system::logging::init_logging;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    config::init_config_from(&cli.config);
    let cfg = config::get_config();

    match cli.command {
        None | Some(Commands::Serve) => {
            // Guard must live until exit so buffered logs are flushed
            let _log_guard = init_logging(&cfg.logging)?;
            modes::run_server().await
        }
        Some(cmd) => {
            if let Err(e) = modes::run_cli(cmd).await {
                eprintln!("{}", e.format_colored());
                std::process::exit(1);
            }
            Ok(())
        }
    }
}
