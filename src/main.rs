use clap::Parser;
use gitsync::cli::{execute_command, get_log_level, Cli};
use gitsync::config::GitSyncConfig;
use tracing::{debug, error, trace};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match GitSyncConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    // -v wins over the configured filter
    let filter = match (cli.verbose, config.log_level.as_deref()) {
        (0, Some(level)) => level.to_string(),
        (verbose, _) => get_log_level(verbose).to_string(),
    };

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .with_target(cli.verbose >= 2)
        .with_line_number(cli.verbose >= 3)
        .init();

    debug!("gitsync started with verbosity level: {}", cli.verbose);
    trace!("Config: {:?}", config);

    let result = execute_command(cli.command, config).await.and_then(|value| {
        let rendered = serde_json::to_string_pretty(&value)?;
        println!("{rendered}");
        Ok(())
    });

    if let Err(e) = result {
        error!("Fatal error: {:#}", e);
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
