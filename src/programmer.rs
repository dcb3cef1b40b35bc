//! Programming engine: ordered writes, commits, settling, verify.
//!
//! The device accepts writes only in a strict rhythm: write frame,
//! commit frame, settling pause. Per layer, all button writes go out
//! before that layer's config writes; save-to-flash goes out exactly
//! once, after every layer. There is no rollback; an interrupted run
//! leaves the pad in a mixed state.

use std::thread;
use std::time::Duration;

use macropad_transport::{Transport, TransportError};
use tracing::{debug, info, warn};

use crate::binding::Keystroke;
use crate::config::{Configuration, LedSetting};
use crate::keycodes;
use crate::protocol::{self, CapacityError, Report, NUM_LAYERS};
use crate::readback;

/// Options controlling a programming run.
#[derive(Debug, Clone)]
pub struct ProgramOptions {
    /// Pause after every commit, required for the device to latch the
    /// preceding write.
    pub settle: Duration,
}

impl Default for ProgramOptions {
    fn default() -> Self {
        Self {
            settle: Duration::from_millis(200),
        }
    }
}

/// What a programming run wrote and what it had to skip.
#[derive(Debug, Default)]
pub struct ProgramReport {
    pub buttons_written: usize,
    /// Bindings rejected before any frame was built: (layer, button).
    pub capacity_errors: Vec<(u8, u8, CapacityError)>,
}

/// A verification failure for one button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mismatch {
    pub button: u8,
    pub expected: Keystroke,
    pub actual: Keystroke,
}

impl std::fmt::Display for Mismatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: expected mod=0x{:02x} key=0x{:02x}, got mod=0x{:02x} key=0x{:02x}",
            keycodes::button_label(self.button),
            self.expected.modifiers,
            self.expected.key,
            self.actual.modifiers,
            self.actual.key
        )
    }
}

/// Drives the write/commit/settle sequence against one transport.
pub struct Programmer<'a> {
    transport: &'a mut dyn Transport,
    options: ProgramOptions,
}

impl<'a> Programmer<'a> {
    pub fn new(transport: &'a mut dyn Transport, options: ProgramOptions) -> Self {
        Self { transport, options }
    }

    fn settle(&self) {
        if !self.options.settle.is_zero() {
            thread::sleep(self.options.settle);
        }
    }

    /// Send one write frame, its commit, and the settling pause.
    fn write_committed(&mut self, frame: &Report) -> Result<(), TransportError> {
        self.transport.send(frame)?;
        self.transport.send(&protocol::commit())?;
        self.settle();
        Ok(())
    }

    /// Program every layer in the configuration, then save to flash.
    ///
    /// Unbound bindings are skipped; over-capacity macros are rejected
    /// before any of their frames are built and the run continues.
    pub fn program(&mut self, config: &Configuration) -> Result<ProgramReport, TransportError> {
        let mut report = ProgramReport::default();

        for (&layer, bindings) in &config.bindings {
            info!("programming layer {layer} ({} buttons)", bindings.len());
            for entry in bindings {
                if entry.binding.is_unbound() {
                    debug!("layer {layer} button 0x{:02x}: unbound, no write", entry.button);
                    continue;
                }
                let frame = match protocol::button_write(entry.button, layer, &entry.binding) {
                    Ok(frame) => frame,
                    Err(e) => {
                        warn!(
                            "layer {layer} {}: {e}; not written",
                            keycodes::button_label(entry.button)
                        );
                        report.capacity_errors.push((layer, entry.button, e));
                        continue;
                    }
                };
                self.write_committed(&frame)?;
                report.buttons_written += 1;
            }

            let led = config.leds.get(&layer).map(|led| led.config_byte());
            self.write_committed(&protocol::layer_config_led(layer, led))?;
            self.write_committed(&protocol::layer_config_misc(layer))?;
        }

        self.transport.send(&protocol::save_to_flash())?;
        self.settle();
        Ok(report)
    }

    /// LED-only run: write each layer's LED config (no button writes,
    /// no misc variant), then save.
    pub fn program_leds(&mut self, led: LedSetting) -> Result<(), TransportError> {
        for layer in 1..=NUM_LAYERS {
            info!("layer {layer}: LED {}", led.describe());
            self.write_committed(&protocol::layer_config_led(layer, Some(led.config_byte())))?;
        }
        self.transport.send(&protocol::save_to_flash())?;
        self.settle();
        Ok(())
    }
}

/// Compare the intended bindings for one layer against a fresh
/// read-back.
///
/// Only single-keystroke bindings are checked; macros and unbound
/// entries are skipped, as are buttons the read-back did not return.
/// Runs after save, so a mismatch is a warning, not something that
/// can be rolled back.
pub fn verify(
    transport: &mut dyn Transport,
    config: &Configuration,
    layer: u8,
) -> Result<Vec<Mismatch>, TransportError> {
    let actual = readback::read_layer(transport, layer)?;
    let mut mismatches = Vec::new();

    let Some(bindings) = config.bindings.get(&layer) else {
        return Ok(mismatches);
    };
    for entry in bindings {
        if entry.binding.is_macro() || entry.binding.is_unbound() {
            continue;
        }
        let Some(read) = actual.get(&entry.button) else {
            continue;
        };
        let expected = entry.binding.keystrokes()[0];
        match read.keystrokes.first() {
            Some(&got) if got != expected => mismatches.push(Mismatch {
                button: entry.button,
                expected,
                actual: got,
            }),
            _ => {}
        }
    }
    Ok(mismatches)
}
