use crate::accelerator::combo_to_hotkey;
use crate::app::DropttyApp;
use crate::cli::Args;
use crate::config_store::ConfigStore;
use crate::host::DesktopHost;
use crate::message::HostMessage;
use droptty_core::{paths, ConfigFile, OverlayConfig, PlatformCapabilities};
use log::{error, info, log, warn, Level};
use std::error::Error;
use winit::event_loop::{ControlFlow, EventLoop};

mod accelerator;
mod app;
mod cli;
mod config_store;
mod error_dialog;
mod hotkeys;
mod host;
mod logger;
mod message;
mod timers;
mod tray;
mod window;

/// Shown even with `--quiet`.
const DRY_RUN_LEVEL: Level = Level::Info;

fn main() {
    let args = cli::parse_args();

    if let Err(e) = logger::init_logger(args.quiet, args.verbose) {
        eprintln!("Failed to initialize logger: {}", e);
    }

    if let Err(e) = run(args) {
        error!("{e}");
        error_dialog::show_error(e.as_ref());
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    info!("Starting droptty {}", droptty_core::version());

    let capabilities = PlatformCapabilities::current();
    let config_path = args
        .config_path
        .clone()
        .or_else(paths::default_config_path)
        .ok_or("Could not determine where the config file lives")?;

    if args.write_default_config {
        ConfigFile::create_default(&config_path, &capabilities)?;
        info!("Wrote default config to {}", config_path.display());
        return Ok(());
    }

    let store = if args.use_defaults {
        info!("Using default configuration");
        ConfigStore::defaults()
    } else {
        ConfigStore::open(config_path, &capabilities)?
    };

    let config = OverlayConfig::resolve(&capabilities, store.current());
    for combo in config.hotkeys.open.iter().chain(&config.hotkeys.close) {
        if combo_to_hotkey(combo).is_none() {
            warn!("Hotkey {combo} cannot be registered globally and will be skipped");
        }
    }

    if args.dry_run {
        log!(DRY_RUN_LEVEL, "Resolved configuration: {config:#?}");
        info!("Configuration is valid");
        return Ok(());
    }

    let event_loop = EventLoop::<HostMessage>::with_user_event().build()?;
    event_loop.set_control_flow(ControlFlow::Wait);
    let proxy = event_loop.create_proxy();

    let shutdown_proxy = proxy.clone();
    ctrlc::set_handler(move || {
        info!("Received Ctrl+C, shutting down...");
        let _ = shutdown_proxy.send_event(HostMessage::Shutdown);
    })?;

    tray::install_event_handlers(proxy.clone());
    let host = DesktopHost::new(store, proxy)?;
    let mut app = DropttyApp::new(host, capabilities);
    event_loop.run_app(&mut app)?;

    info!("droptty stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dry_run_report_survives_every_log_level() {
        for (quiet, verbose) in [(false, false), (true, false), (false, true)] {
            assert!(DRY_RUN_LEVEL <= logger::max_level(quiet, verbose));
        }
    }
}
