// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod reload;
pub mod watch;

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::{load_or_default, ConfigFile};
use crate::engine::{shutdown_signal, Controller, ControllerExit};
use crate::exec::AppProcess;
use crate::fs::RealFileSystem;
use crate::reload::{ExecReplacer, ImageReplacer, ProcessContext, ProcessReloader};
use crate::watch::{derive_watch_set, resolve_local_path, NameFilters, NotifyBackend, WatchSetManager};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading (+ CLI overrides)
/// - the process reloader and its termination hooks
/// - the optional application child
/// - the file watcher and the controller loop
/// - Ctrl-C / SIGTERM handling
pub async fn run(args: CliArgs) -> Result<()> {
    let cfg = effective_config(&args)?;

    if args.dry_run {
        print_dry_run(&cfg);
        return Ok(());
    }

    let mut reloader = build_reloader(&cfg, ProcessContext::capture()?, Box::new(ExecReplacer));
    if reloader.generation() > 0 {
        info!(generation = reloader.generation(), "running restarted image");
    }

    if !cfg.app().command.is_empty() {
        let app = AppProcess::spawn(&cfg.app().command)?;
        reloader.register_termination_hook(move |ctx| app.terminate(ctx.reason));
    }

    let (fs_tx, fs_rx) = mpsc::unbounded_channel::<notify::Event>();
    let backend = NotifyBackend::new(fs_tx)?;
    let manager = WatchSetManager::new(Box::new(backend));

    let mut controller = Controller::new(
        manager,
        reloader,
        Duration::from_millis(cfg.watch().debounce_ms),
        fs_rx,
    );
    controller.set_target(cfg.watch().to_target());

    match controller.run(shutdown_signal()).await {
        ControllerExit::Shutdown => info!("livewatch stopped"),
        ControllerExit::Restarted => debug!("replacer returned without taking over"),
        ControllerExit::EventsClosed => info!("file watcher stopped; exiting"),
    }
    Ok(())
}

/// The reloader for this process.
///
/// livewatch restarts itself: `context` is its own executable and argv, so
/// the new image parses the same command line and respawns the app command.
pub fn build_reloader(
    cfg: &ConfigFile,
    context: ProcessContext,
    replacer: Box<dyn ImageReplacer>,
) -> ProcessReloader {
    ProcessReloader::with_replacer(context, cfg.reload().to_settings(), replacer)
}

/// Load the config file (if any) and layer the CLI flags over it.
///
/// A relative watch path from the config file is taken relative to the
/// config file's directory; a path given on the command line is relative to
/// the working directory. With neither, the working directory is watched.
pub fn effective_config(args: &CliArgs) -> errors::Result<ConfigFile> {
    let config_path = PathBuf::from(&args.config);
    let mut raw = load_or_default(&config_path)?.into_raw();

    if let Some(path) = &args.path {
        raw.watch.path = path.clone();
    } else if !raw.watch.path.is_empty() {
        raw.watch.path = relative_to_config(&config_path, &raw.watch.path);
    }
    if raw.watch.path.is_empty() {
        raw.watch.path = ".".to_string();
    }

    if args.recursive {
        raw.watch.recursive = true;
    }
    if !args.filters.is_empty() {
        raw.watch.name_filters = args.filters.clone();
    }
    if args.disabled {
        raw.watch.enabled = false;
    }
    if let Some(ms) = args.debounce_ms {
        raw.watch.debounce_ms = ms;
    }
    if !args.command.is_empty() {
        raw.app.command = args.command.clone();
    }

    ConfigFile::try_from(raw)
}

fn relative_to_config(config_path: &Path, watch_path: &str) -> String {
    let root = match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => return watch_path.to_string(),
    };
    match resolve_local_path(watch_path) {
        Ok(Some(local)) if local.is_relative() => {
            root.join(local).to_string_lossy().into_owned()
        }
        _ => watch_path.to_string(),
    }
}

/// Simple dry-run output: effective settings plus the derived watch set.
fn print_dry_run(cfg: &ConfigFile) {
    let watch = cfg.watch();
    println!("livewatch dry-run");
    println!("  watch.path = {}", watch.path);
    println!("  watch.enabled = {}", watch.enabled);
    println!("  watch.recursive = {}", watch.recursive);
    println!("  watch.name_filters = {:?}", watch.name_filters);
    println!("  watch.debounce_ms = {}", watch.debounce_ms);
    println!("  reload.search_path_var = {}", cfg.reload().search_path_var);
    if let Some(ref root) = cfg.reload().import_root {
        println!("  reload.import_root = {}", root.display());
    }
    if !cfg.app().command.is_empty() {
        println!("  app.command = {:?}", cfg.app().command);
    }
    println!();

    let target = watch.to_target();
    let filters = NameFilters::compile(&target.name_filters);
    let derivation = derive_watch_set(&RealFileSystem, &target, &filters);
    if let Some(err) = &derivation.diagnostic {
        println!("warning: {err}");
    }
    println!("watched paths ({}):", derivation.paths.len());
    for path in &derivation.paths {
        println!("  {}", path.display());
    }

    debug!("dry-run complete (nothing watched)");
}
