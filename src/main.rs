//! hotprops
//!
//! Inspect a property file through the typed store, or keep it reloading on
//! its own cadence.

use anyhow::Result;
use clap::Parser;
use hotprops::cli::get::{self, GetArgs};
use hotprops::cli::show::ShowArgs;
use hotprops::cli::watch::WatchArgs;
use hotprops::cli::{Cli, Command};
use hotprops::config::Settings;
use hotprops::format::{format_mapping, format_status};
use hotprops::logging::{self, LogTarget};
use hotprops::props::{ResolutionContext, load_properties};
use hotprops::reload::ReloadScheduler;
use hotprops::store::TypedStore;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

fn run_show(path: &Path, args: &ShowArgs) -> Result<()> {
    let mapping = load_properties(path)?;
    println!("{}", format_mapping(&mapping, args.format));
    Ok(())
}

fn run_get(path: &Path, args: &GetArgs) -> Result<()> {
    let store = TypedStore::with_mapping(load_properties(path)?);
    let value = get::lookup(&store, args)?;
    println!("{}", get::render(&value));
    Ok(())
}

async fn run_watch(path: &Path, args: &WatchArgs) -> Result<()> {
    let store = Arc::new(TypedStore::new());
    let scheduler = ReloadScheduler::new(Arc::clone(&store));
    scheduler.set_source(path)?;
    println!("{}", format_status(&scheduler.status(), args.format));

    let mut cadence_rx = scheduler.subscribe_cadence();
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            signal = &mut ctrl_c => {
                signal?;
                info!("Interrupted, stopping");
                break;
            }
            changed = cadence_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                println!("{}", format_status(&scheduler.status(), args.format));
            }
        }
    }

    scheduler.shutdown().await;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init(&LogTarget::parse(&cli.log), cli.verbose)?;

    let settings = Settings::from_env().with_overrides(cli.config_path.clone(), cli.file.clone());
    let path = settings.resolve(&ResolutionContext::from_process());
    debug!(path = %path.display(), "Resolved property file");

    match cli.command {
        Command::Show(ref args) => run_show(&path, args),
        Command::Get(ref args) => run_get(&path, args),
        Command::Watch(ref args) => run_watch(&path, args).await,
        Command::Resolve => {
            println!("{}", path.display());
            Ok(())
        }
    }
}
