//! LED-only programming for all layers.

use std::path::Path;
use std::time::Duration;

use super::{open_transport, CommandResult};
use macropad_driver::{keycodes, LedSetting, ProgramOptions, Programmer};

/// Set every layer's LED to the given color and effect, then save.
pub fn run(color: &str, effect: &str, dump: Option<&Path>, settle_ms: u64) -> CommandResult {
    let led = LedSetting {
        color: keycodes::resolve_color(color)?,
        effect: keycodes::resolve_effect(effect)?,
    };

    let mut transport = open_transport(dump)?;
    println!("  setting LEDs on all layers: {}", led.describe());

    let options = ProgramOptions {
        settle: Duration::from_millis(settle_ms),
    };
    Programmer::new(&mut transport, options).program_leds(led)?;

    println!("  saved");
    Ok(())
}
