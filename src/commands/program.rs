//! Programming from a JSON config file.

use std::path::Path;
use std::time::Duration;

use macropad_transport::Transport;

use super::{open_transport, CommandResult};
use macropad_driver::{config, keycodes, programmer};
use macropad_driver::{Configuration, ProgramOptions, Programmer};

/// Program the pad from `path`, then optionally verify one layer.
pub fn run(
    path: &Path,
    dump: Option<&Path>,
    settle_ms: u64,
    verify_layer: Option<u8>,
) -> CommandResult {
    if !path.exists() {
        println!("  config file not found: {}", path.display());
        println!("  generating a starter config...");
        config::generate(path)?;
        println!(
            "  edit {} to set your key mappings, then run again",
            path.display()
        );
        return Ok(());
    }

    println!("  loading config: {}", path.display());
    let cfg = config::load(path)?;
    if cfg.is_empty() {
        return Err("no layers/bindings found in config".into());
    }

    let led_note = if cfg.leds.is_empty() {
        String::new()
    } else {
        format!(", {} LED setting(s)", cfg.leds.len())
    };
    println!(
        "  {} layer(s), {} binding(s) to write{led_note}",
        cfg.bindings.len(),
        cfg.binding_count()
    );
    print_plan(&cfg);

    let mut transport = open_transport(dump)?;
    let options = ProgramOptions {
        settle: Duration::from_millis(settle_ms),
    };

    let report = Programmer::new(&mut transport, options).program(&cfg)?;
    println!("  wrote {} buttons", report.buttons_written);
    for (layer, button, e) in &report.capacity_errors {
        eprintln!("  layer {layer} button 0x{button:02x}: {e}");
    }

    if let Some(layer) = verify_layer {
        verify(&mut transport, &cfg, layer);
    }

    println!("\n  done. Unplug and replug the pad if the new mapping doesn't take effect.");
    Ok(())
}

/// Echo the bindings about to be written.
fn print_plan(cfg: &Configuration) {
    for (layer, bindings) in &cfg.bindings {
        println!("  layer {layer}:");
        if let Some(led) = cfg.leds.get(layer) {
            println!("    led: {}", led.describe());
        }
        for entry in bindings {
            if entry.binding.is_unbound() {
                continue;
            }
            println!(
                "    {} -> {}",
                keycodes::button_label(entry.button),
                entry.binding
            );
        }
    }
}

/// Read back one layer and warn about mismatches. Never fatal: the
/// save already happened.
fn verify(transport: &mut dyn Transport, cfg: &Configuration, layer: u8) {
    if !transport.has_input() {
        println!("  no IN endpoint; skipping verification");
        return;
    }
    println!("\n  verifying layer {layer}...");
    match programmer::verify(transport, cfg, layer) {
        Ok(mismatches) if mismatches.is_empty() => println!("    all verified OK"),
        Ok(mismatches) => {
            for mismatch in mismatches {
                eprintln!("    WARNING: {mismatch}");
            }
        }
        Err(e) => eprintln!("    verify read failed: {e}"),
    }
}
