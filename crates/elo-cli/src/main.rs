//! ELO - civil-defense incident register
//!
//! Interactive terminal menu over the incident database. Database credentials
//! are kept encrypted in the data directory and asked for on first run.

mod console;
mod logging;
mod menu;
mod render;

use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use elo_core::settings::default_data_dir;
use elo_core::{CredentialVault, EloError, Reporter, SettingsManager, SqlConnector, Store};
use tracing::{error, info};

use crate::console::TerminalConsole;
use crate::menu::Menu;

/// ELO - register and follow civil-defense incidents
#[derive(Parser, Debug)]
#[command(name = "elo")]
#[command(version)]
#[command(about = "Register and follow civil-defense incidents by neighborhood")]
struct Args {
    /// Directory holding the key, credentials, settings and logs
    #[arg(long, env = "ELO_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Forget the stored database login and ask for it again
    #[arg(long)]
    reset_credentials: bool,

    /// Log filter, e.g. "debug" or "info,sqlx=warn"
    #[arg(long, env = "ELO_LOG", default_value = logging::DEFAULT_FILTER)]
    log_level: String,

    /// Disable colours
    #[arg(long)]
    plain: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.plain || !io::stdout().is_terminal() {
        colored::control::set_override(false);
    }

    let data_dir = match args.data_dir {
        Some(dir) => dir,
        None => default_data_dir()?,
    };
    let settings = SettingsManager::new(&data_dir)
        .with_context(|| format!("failed to load settings from {}", data_dir.display()))?;

    let _log_guard = logging::init_tracing(&settings.log_file(), &args.log_level)?;
    info!("Starting ELO with data directory {:?}", data_dir);

    let console = Arc::new(TerminalConsole::new());
    let vault = CredentialVault::new(
        data_dir.clone(),
        settings.get().database.connection_string(),
        console.clone(),
    );

    if args.reset_credentials && vault.clear_credentials().await? {
        console.info("Stored database login removed.");
    }

    let conn = match vault
        .acquire_connection(&SqlConnector::new(), console.as_ref())
        .await
    {
        Ok(conn) => conn,
        Err(e) => {
            report_fatal(console.as_ref(), &e);
            return Err(e.into());
        }
    };

    let mut store = Store::new(conn);
    if let Err(e) = store.migrate().await {
        report_fatal(console.as_ref(), &e);
        return Err(e.into());
    }

    let outcome = Menu::new(console.as_ref(), &mut store, settings.export_dir())
        .run()
        .await;
    match outcome {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
            info!("Input closed, leaving the menu");
        }
        Err(e) => return Err(e).context("terminal input failed"),
    }

    store.close().await?;
    console.info("Program closed.");
    info!("Program closed");
    Ok(())
}

fn report_fatal(reporter: &dyn Reporter, err: &EloError) {
    error!("Fatal: {}", err);
    if err.is_decryption() {
        reporter.critical(&format!(
            "Could not read the stored database login: {}\nRun `elo --reset-credentials` to register it again.",
            err
        ));
    } else {
        reporter.critical(&err.to_string());
    }
}
