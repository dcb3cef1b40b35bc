//! Reading the pad's current configuration.

use std::path::Path;

use macropad_transport::{Transport, TransportError};

use super::{open_transport, CommandResult};
use macropad_driver::{keycodes, protocol, readback, KeystrokeBinding};

/// Read and print all three layers.
pub fn run(dump: Option<&Path>) -> CommandResult {
    let mut transport = open_transport(dump)?;
    if !transport.has_input() {
        return Err(TransportError::InputUnavailable.into());
    }

    for layer in 1..=protocol::NUM_LAYERS {
        println!("\n  layer {layer}:");
        let bindings = readback::read_layer(&mut transport, layer)?;
        if bindings.is_empty() {
            println!("    (no response)");
            continue;
        }
        for (button, entry) in &bindings {
            if entry.is_unbound() {
                continue;
            }
            let binding = KeystrokeBinding::new(entry.keystrokes.clone());
            println!("    {}: {binding}", keycodes::button_label(*button));
        }
    }
    Ok(())
}
