//! Macro pad configurator CLI.
//!
//! Programs per-layer key bindings and LED settings into the 12-key +
//! 2-knob CH552 macro pad over USB, and reads them back for display
//! and verification.

use std::path::Path;

use clap::Parser;
use macropad_transport::TransportError;

// CLI definitions
mod cli;
use cli::{Cli, Commands};

// Command handlers (one module per subcommand)
mod commands;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new("macropad_driver=warn,macropad_transport=warn")
            }),
        )
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        if matches!(
            e.downcast_ref::<TransportError>(),
            Some(TransportError::AccessDenied)
        ) {
            eprintln!("{PERMISSION_MSG}");
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> commands::CommandResult {
    let dump = cli.dump.as_deref();
    let verify_layer = (!cli.no_verify).then_some(cli.verify_layer);

    match cli.command {
        // Default: program from the standard config path
        None => commands::program::run(
            Path::new("macropad.json"),
            dump,
            cli.settle_ms,
            verify_layer,
        ),
        Some(Commands::Program { config }) => {
            commands::program::run(&config, dump, cli.settle_ms, verify_layer)
        }
        Some(Commands::Read) => commands::read::run(dump),
        Some(Commands::Led { color, effect }) => {
            commands::led::run(&color, &effect, dump, cli.settle_ms)
        }
        Some(Commands::GenerateConfig { path }) => commands::generate::run(&path),
    }
}

const PERMISSION_MSG: &str = r#"
USB access denied. Either:

  1. Run with sudo:
     sudo macropad_driver

  2. Or add a udev rule (one-time):
     echo 'SUBSYSTEM=="usb", ATTR{idVendor}=="1189", ATTR{idProduct}=="8840", MODE="0666"' | sudo tee /etc/udev/rules.d/99-macropad.rules
     sudo udevadm control --reload-rules
     (then unplug and replug the pad)
"#;
