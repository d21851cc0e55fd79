use clap::Parser;
use museumcmd::cli::{dispatch, run_menu, App, Cli};
use museumcmd::config::Config;
use tracing_subscriber::EnvFilter;

/// `MUSEUMCMD_LOG`, then `RUST_LOG`, then `warn` (`debug` with --verbose).
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("MUSEUMCMD_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load(cli.api_url.as_deref())?;
    let app = App::new(config)?;

    match cli.command {
        None => run_menu(&app),
        Some(command) => dispatch(&app, command),
    }
}
