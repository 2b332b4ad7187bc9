//! stroomer - Stream Deck keys that send SNMP commands.
#![forbid(unsafe_code)]

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use tracing::{debug, error, info, warn};

use stroomer::action::snmp::UdpSnmpClient;
use stroomer::cli::{CheckArgs, Cli, Commands, ListArgs};
use stroomer::config::{ButtonAction, ConfigLoader, Device, LoadReport};
use stroomer::device::{DeckOperations, list_decks, open_visual_decks, spawn_watcher};
use stroomer::dispatch::Dispatcher;
use stroomer::error::StroomerError;
use stroomer::logging::init_logging;
use stroomer::style::Assets;

/// Build information embedded at compile time.
mod build_info {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");

    pub fn git_sha() -> &'static str {
        option_env!("VERGEN_GIT_SHA").unwrap_or("unknown")
    }

    pub fn git_dirty() -> &'static str {
        option_env!("VERGEN_GIT_DIRTY").unwrap_or("false")
    }

    pub fn build_timestamp() -> &'static str {
        option_env!("VERGEN_BUILD_TIMESTAMP").unwrap_or("unknown")
    }

    pub fn rustc_semver() -> &'static str {
        option_env!("VERGEN_RUSTC_SEMVER").unwrap_or("unknown")
    }

    pub fn target() -> &'static str {
        option_env!("VERGEN_CARGO_TARGET_TRIPLE").unwrap_or("unknown")
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.verbose, cli.quiet);

    if let Err(err) = run(&cli) {
        error!("{err:#}");
        if let Some(hint) = err
            .downcast_ref::<StroomerError>()
            .and_then(StroomerError::suggestion)
        {
            eprintln!("hint: {hint}");
        }
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        None | Some(Commands::Run) => cmd_run(cli),
        Some(Commands::Check(args)) => cmd_check(cli, args),
        Some(Commands::List(args)) => cmd_list(args),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
    }
}

// === Run ===

fn cmd_run(cli: &Cli) -> anyhow::Result<()> {
    let loader = ConfigLoader::new(cli.assets_dir());
    let report = match loader.load_path(cli.config_path()) {
        Ok(report) => report,
        Err(StroomerError::ConfigNotFound { path }) => {
            warn!(path = %path, "Configuration file not found; no buttons configured");
            LoadReport::default()
        }
        Err(err) => return Err(err).context("Loading configuration"),
    };

    if report.config.is_empty() {
        warn!("No devices or buttons configured; only the exit key is shown");
    }

    let decks: Arc<[Arc<dyn DeckOperations>]> = open_visual_decks()?
        .into_iter()
        .map(|deck| Arc::new(deck) as Arc<dyn DeckOperations>)
        .collect();
    if decks.is_empty() {
        warn!("{}", StroomerError::NoDevicesFound);
        return Ok(());
    }

    let dispatcher = Arc::new(
        Dispatcher::new(
            Arc::new(report.config),
            Assets::new(loader.assets_dir()),
            Arc::new(UdpSnmpClient::default()),
        )
        .with_open_decks(Arc::clone(&decks)),
    );

    let mut watchers = Vec::with_capacity(decks.len());
    for deck in decks.iter() {
        deck.reset()
            .with_context(|| format!("Resetting deck {}", deck.serial()))?;

        let info = deck.info();
        info!(
            "Opened '{}' device (serial number: '{}', fw: '{}')",
            info.product_name, info.serial, info.firmware_version
        );

        dispatcher
            .render_all(deck.as_ref())
            .with_context(|| format!("Rendering keys on deck {}", deck.serial()))?;

        let handle = spawn_watcher(Arc::clone(deck), dispatcher.clone())
            .context("Spawning deck watcher thread")?;
        watchers.push(handle);
    }

    // An exit button closes every deck, which ends all watchers.
    for handle in watchers {
        if handle.join().is_err() {
            debug!("Watcher thread ended with a panic");
        }
    }
    info!("All decks closed");
    Ok(())
}

// === Check ===

fn cmd_check(cli: &Cli, args: &CheckArgs) -> anyhow::Result<()> {
    let loader = ConfigLoader::new(cli.assets_dir());
    let report = loader
        .load_path(cli.config_path())
        .with_context(|| format!("Loading {}", cli.config_path().display()))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn print_report(report: &LoadReport) {
    println!("Devices ({}):", report.config.devices.len());
    for device in report.config.devices.values() {
        match device {
            Device::Snmp(snmp) => println!(
                "  {}: snmp {}:{} community={} version={}",
                device.name(),
                snmp.host,
                snmp.port,
                snmp.community,
                snmp.version
            ),
        }
    }

    println!("Buttons ({}):", report.config.buttons.len());
    for button in report.config.buttons.values() {
        let detail = match &button.action {
            ButtonAction::Snmp(action) => format!(
                " {} {} on {} = {} ({:?})",
                action.command, action.oid, action.device, action.value, action.value_type
            ),
            ButtonAction::Exit => String::new(),
        };
        println!(
            "  key {} (location {}) \"{}\": {}{detail}",
            button.key,
            button.location(),
            button.label,
            button.action.kind()
        );
    }

    if !report.diagnostics.is_empty() {
        println!("Problems ({}):", report.diagnostics.len());
        for diagnostic in &report.diagnostics {
            println!("  {diagnostic}");
        }
    }
}

// === List ===

fn cmd_list(args: &ListArgs) -> anyhow::Result<()> {
    let decks = list_decks()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&decks)?);
        return Ok(());
    }

    if decks.is_empty() {
        println!("{}", StroomerError::NoDevicesFound);
        return Ok(());
    }
    for deck in &decks {
        println!(
            "{} ({}) - {} keys{}",
            deck.product_name,
            deck.serial,
            deck.key_count,
            if deck.visual { "" } else { ", no displays" }
        );
    }
    Ok(())
}

// === Version ===

#[derive(Serialize)]
struct VersionInfo {
    version: &'static str,
    git_sha: &'static str,
    git_dirty: &'static str,
    build_timestamp: &'static str,
    rustc: &'static str,
    target: &'static str,
}

fn cmd_version() {
    let info = VersionInfo {
        version: build_info::VERSION,
        git_sha: build_info::git_sha(),
        git_dirty: build_info::git_dirty(),
        build_timestamp: build_info::build_timestamp(),
        rustc: build_info::rustc_semver(),
        target: build_info::target(),
    };
    println!("stroomer {}", info.version);
    println!("  git:     {} (dirty: {})", info.git_sha, info.git_dirty);
    println!("  built:   {}", info.build_timestamp);
    println!("  rustc:   {}", info.rustc);
    println!("  target:  {}", info.target);
}
