//! Wire protocol: report layout and frame builders.
//!
//! Every exchange with the pad is a fixed 65-byte report (1 report-id
//! byte + 64 data bytes, zero-padded). Writes follow a strict
//! sequence: each button or layer-config write is finalized by a
//! commit frame, and every commit needs a settling pause before the
//! next operation. Save-to-flash goes out exactly once per run, after
//! all layers.

use std::fmt;

use crate::binding::KeystrokeBinding;

pub use macropad_transport::REPORT_SIZE;

/// Frame family bytes.
pub mod cmd {
    /// Report id prefix on every frame.
    pub const REPORT_ID: u8 = 0x03;
    /// Button binding writes and the commit frame.
    pub const BUTTON: u8 = 0xFD;
    /// Layer configuration writes.
    pub const LAYER: u8 = 0xFE;
    /// Sub-command byte for layer configuration.
    pub const LAYER_SUB: u8 = 0xB0;
    /// Save-to-flash.
    pub const SAVE: u8 = 0xEF;
    /// Read-back request.
    pub const READ: u8 = 0xFA;
}

/// Layer-config variant carrying the LED byte.
pub const LAYER_VARIANT_LED: u8 = 0x08;
/// Layer-config variant with the fixed auxiliary template.
pub const LAYER_VARIANT_MISC: u8 = 0x05;

/// Layers are 1-based.
pub const NUM_LAYERS: u8 = 3;
/// Button slots per layer in the read-back protocol (18 physical).
pub const BUTTONS_PER_LAYER: usize = 24;

/// Header bytes in a button-write frame before the keystroke pairs.
const BUTTON_HEADER_LEN: usize = 11;
/// Keystroke pairs that fit in one button-write frame.
pub const MAX_KEYSTROKES: usize = (REPORT_SIZE - BUTTON_HEADER_LEN) / 2;

/// LED byte used when a layer has no override: static red.
pub const DEFAULT_LED_BYTE: u8 = 0x11;

/// A 65-byte report frame.
pub type Report = [u8; REPORT_SIZE];

/// Build a report from a prefix, zero-padding to the full size.
fn report(prefix: &[u8]) -> Report {
    let mut frame = [0u8; REPORT_SIZE];
    frame[..prefix.len()].copy_from_slice(prefix);
    frame
}

/// Pack LED effect and color into the single config byte.
pub fn led_byte(effect: u8, color: u8) -> u8 {
    ((color & 0x0F) << 4) | (effect & 0x0F)
}

/// A binding too long for one button-write frame. Raised before any
/// frame is built; nothing partial reaches the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityError {
    pub keystrokes: usize,
}

impl fmt::Display for CapacityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "macro of {} keystrokes exceeds the frame capacity of {MAX_KEYSTROKES}",
            self.keystrokes
        )
    }
}

impl std::error::Error for CapacityError {}

/// Build a button-write frame:
/// `[0x03, 0xFD, button, layer, 0x01, 0,0,0,0, 0, count, (mod,key)...]`.
///
/// Byte 9 is required padding; byte 10 is the keystroke count
/// (minimum 1; the unbound binding is written as one (0,0) pair).
pub fn button_write(
    button: u8,
    layer: u8,
    binding: &KeystrokeBinding,
) -> Result<Report, CapacityError> {
    let keystrokes = binding.keystrokes();
    if keystrokes.len() > MAX_KEYSTROKES {
        return Err(CapacityError {
            keystrokes: keystrokes.len(),
        });
    }

    let mut frame = [0u8; REPORT_SIZE];
    frame[0] = cmd::REPORT_ID;
    frame[1] = cmd::BUTTON;
    frame[2] = button;
    frame[3] = layer;
    frame[4] = 0x01;
    frame[10] = keystrokes.len() as u8;
    for (i, keystroke) in keystrokes.iter().enumerate() {
        frame[BUTTON_HEADER_LEN + i * 2] = keystroke.modifiers;
        frame[BUTTON_HEADER_LEN + i * 2 + 1] = keystroke.key;
    }
    Ok(frame)
}

/// Commit frame, required immediately after every write.
pub fn commit() -> Report {
    report(&[cmd::REPORT_ID, cmd::BUTTON, 0xFE, 0xFF])
}

/// Layer-config frame carrying the LED byte (variant 0x08).
///
/// The auxiliary payload starts at byte 5; its offset 7 holds the LED
/// byte, defaulting to static red when the layer has no override.
pub fn layer_config_led(layer: u8, led: Option<u8>) -> Report {
    let mut frame = report(&[
        cmd::REPORT_ID,
        cmd::LAYER,
        cmd::LAYER_SUB,
        layer,
        LAYER_VARIANT_LED,
    ]);
    frame[5 + 5] = 0x01;
    frame[5 + 7] = led.unwrap_or(DEFAULT_LED_BYTE);
    frame
}

/// Layer-config frame with the fixed 0x05 auxiliary template.
///
/// The template values come from a capture of the vendor tool; their
/// purpose is unknown. Auxiliary offset 7 is 0x10 here regardless of
/// the LED setting; it is not the LED byte.
pub fn layer_config_misc(layer: u8) -> Report {
    let mut frame = report(&[
        cmd::REPORT_ID,
        cmd::LAYER,
        cmd::LAYER_SUB,
        layer,
        LAYER_VARIANT_MISC,
    ]);
    frame[5] = 0xD0;
    frame[5 + 5] = 0x01;
    frame[5 + 7] = 0x10;
    frame
}

/// Save-to-flash frame, sent once per run after all layers.
pub fn save_to_flash() -> Report {
    report(&[cmd::REPORT_ID, cmd::SAVE, 0x03])
}

/// Read-back request for one layer's button bindings.
pub fn readback_request(layer: u8) -> Report {
    report(&[cmd::REPORT_ID, cmd::READ, 0x0F, 0x03, layer, 0x05])
}
