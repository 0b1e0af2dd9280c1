// Entrypoint for the CLI application.
// - Keeps `main` small: parse args, set up logging, build the API client
//   and hand it to the handler for the chosen subcommand.
// - Returns `anyhow::Result` so failures print with their context chain.

use std::time::Duration;

use clap::Parser;
use eero_cli::cli::{Cli, Commands};
use eero_cli::config::{resolve_session_path, ClientConfig};
use eero_cli::{ui, ApiClient, Error, FileStore, SessionStore};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let store = FileStore::new(resolve_session_path(&cli.session_file));
    tracing::debug!(path = %store.path().display(), "using session file");

    let config = ClientConfig::default()
        .with_base_url(cli.api_url.clone())
        .with_timeout(Duration::from_secs(cli.timeout));
    let mut api = ApiClient::new(config)?;

    if cli.command.needs_session() {
        match store.load() {
            Ok(credential) => api = api.with_credential(credential),
            Err(Error::NoSessionFound { location }) => {
                ui::warn_missing_session(&location);
                anyhow::bail!("no session found");
            }
            Err(e) => return Err(e.into()),
        }
    }

    match cli.command {
        Commands::Auth => {
            ui::authenticate(&mut api, &store)?;
        }
        Commands::Account => ui::show_account(&api)?,
        Commands::Networks => ui::show_networks(&api)?,
        Commands::Devices { keep_going } => ui::show_devices(&api, keep_going)?,
        Commands::Session => {
            if let Some(credential) = api.credential() {
                ui::show_session(credential);
            }
        }
    }
    Ok(())
}
