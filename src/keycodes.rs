//! Name ↔ code tables for the pad's symbol spaces.
//!
//! Four closed enumerations: HID modifier bits, HID keycodes, physical
//! button ids, and LED colors/effects. Resolution accepts a
//! case-insensitive name or a decimal string (raw integers arrive here
//! as decimal strings); color and effect values are masked to the
//! 4 bits the config byte has room for. Unknown names fail with an
//! error that lists the valid names.

use std::fmt;

/// HID modifier bitmask constants (first byte of a keyboard report).
pub mod mods {
    pub const CTRL: u8 = 0x01;
    pub const SHIFT: u8 = 0x02;
    pub const ALT: u8 = 0x04;
    pub const META: u8 = 0x08;
}

/// Modifier names, including per-OS aliases.
pub const MODIFIERS: &[(&str, u8)] = &[
    ("none", 0x00),
    ("ctrl", mods::CTRL),
    ("control", mods::CTRL),
    ("lctrl", mods::CTRL),
    ("shift", mods::SHIFT),
    ("lshift", mods::SHIFT),
    ("alt", mods::ALT),
    ("option", mods::ALT),
    ("lalt", mods::ALT),
    ("meta", mods::META),
    ("win", mods::META),
    ("cmd", mods::META),
    ("gui", mods::META),
];

/// HID keyboard usage codes the pad can emit.
///
/// Aliases (enter/return, esc/escape) map to the same code; reverse
/// lookup returns the first name listed.
pub const KEYS: &[(&str, u8)] = &[
    ("none", 0x00),
    ("a", 0x04),
    ("b", 0x05),
    ("c", 0x06),
    ("d", 0x07),
    ("e", 0x08),
    ("f", 0x09),
    ("g", 0x0A),
    ("h", 0x0B),
    ("i", 0x0C),
    ("j", 0x0D),
    ("k", 0x0E),
    ("l", 0x0F),
    ("m", 0x10),
    ("n", 0x11),
    ("o", 0x12),
    ("p", 0x13),
    ("q", 0x14),
    ("r", 0x15),
    ("s", 0x16),
    ("t", 0x17),
    ("u", 0x18),
    ("v", 0x19),
    ("w", 0x1A),
    ("x", 0x1B),
    ("y", 0x1C),
    ("z", 0x1D),
    ("1", 0x1E),
    ("2", 0x1F),
    ("3", 0x20),
    ("4", 0x21),
    ("5", 0x22),
    ("6", 0x23),
    ("7", 0x24),
    ("8", 0x25),
    ("9", 0x26),
    ("0", 0x27),
    ("enter", 0x28),
    ("return", 0x28),
    ("esc", 0x29),
    ("escape", 0x29),
    ("backspace", 0x2A),
    ("tab", 0x2B),
    ("space", 0x2C),
    ("minus", 0x2D),
    ("equal", 0x2E),
    ("lbracket", 0x2F),
    ("rbracket", 0x30),
    ("backslash", 0x31),
    ("semicolon", 0x33),
    ("quote", 0x34),
    ("grave", 0x35),
    ("comma", 0x36),
    ("period", 0x37),
    ("slash", 0x38),
    ("capslock", 0x39),
    ("f1", 0x3A),
    ("f2", 0x3B),
    ("f3", 0x3C),
    ("f4", 0x3D),
    ("f5", 0x3E),
    ("f6", 0x3F),
    ("f7", 0x40),
    ("f8", 0x41),
    ("f9", 0x42),
    ("f10", 0x43),
    ("f11", 0x44),
    ("f12", 0x45),
    ("printscreen", 0x46),
    ("scrolllock", 0x47),
    ("pause", 0x48),
    ("insert", 0x49),
    ("home", 0x4A),
    ("pageup", 0x4B),
    ("delete", 0x4C),
    ("end", 0x4D),
    ("pagedown", 0x4E),
    ("right", 0x4F),
    ("left", 0x50),
    ("down", 0x51),
    ("up", 0x52),
    ("f13", 0x68),
    ("f14", 0x69),
    ("f15", 0x6A),
    ("f16", 0x6B),
    ("f17", 0x6C),
    ("f18", 0x6D),
    ("f19", 0x6E),
    ("f20", 0x6F),
    ("f21", 0x70),
    ("f22", 0x71),
    ("f23", 0x72),
    ("f24", 0x73),
    ("mute", 0x7F),
    ("volume_up", 0x80),
    ("volume_down", 0x81),
];

/// Physical button names and their wire ids.
///
/// 24 button slots exist per layer; only these 18 have a physical
/// control (ids 0x0D-0x0F and 0x16-0x18 are dead slots). Knob 1's
/// rotation ids are reversed on the wire.
pub const BUTTONS: &[(&str, u8)] = &[
    ("key1", 0x01),
    ("key2", 0x02),
    ("key3", 0x03),
    ("key4", 0x04),
    ("key5", 0x05),
    ("key6", 0x06),
    ("key7", 0x07),
    ("key8", 0x08),
    ("key9", 0x09),
    ("key10", 0x0A),
    ("key11", 0x0B),
    ("key12", 0x0C),
    ("knob1_left", 0x15),
    ("knob1_press", 0x14),
    ("knob1_right", 0x13),
    ("knob2_left", 0x10),
    ("knob2_press", 0x11),
    ("knob2_right", 0x12),
];

/// LED color indices (high nibble of the config byte).
pub const LED_COLORS: &[(&str, u8)] = &[
    ("off", 0),
    ("red", 1),
    ("orange", 2),
    ("yellow", 3),
    ("green", 4),
    ("cyan", 5),
    ("blue", 6),
    ("purple", 7),
];

/// LED effect indices (low nibble of the config byte).
pub const LED_EFFECTS: &[(&str, u8)] = &[
    ("off", 0),
    ("static", 1),
    ("ripple", 2),
    ("wave", 3),
    ("reactive", 4),
    ("white", 5),
];

/// A name that resolved to nothing in its table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    UnknownKey(String),
    UnknownModifier(String),
    UnknownColor(String),
    UnknownEffect(String),
}

fn known_names(table: &[(&str, u8)]) -> String {
    let mut names: Vec<&str> = table.iter().map(|&(name, _)| name).collect();
    names.sort_unstable();
    names.dedup();
    names.join(", ")
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownKey(s) => {
                write!(f, "unknown key {s:?}; known keys: {}", known_names(KEYS))
            }
            Self::UnknownModifier(s) => write!(
                f,
                "unknown modifier {s:?}; known modifiers: {}",
                known_names(MODIFIERS)
            ),
            Self::UnknownColor(s) => write!(
                f,
                "unknown LED color {s:?}; known colors: {} (or 0-7)",
                known_names(LED_COLORS)
            ),
            Self::UnknownEffect(s) => write!(
                f,
                "unknown LED effect {s:?}; known effects: {} (or 0-7)",
                known_names(LED_EFFECTS)
            ),
        }
    }
}

impl std::error::Error for ResolveError {}

fn lookup(table: &[(&str, u8)], name: &str) -> Option<u8> {
    table
        .iter()
        .find(|&&(entry, _)| entry == name)
        .map(|&(_, code)| code)
}

/// Resolve a key name or decimal string to its HID keycode.
pub fn resolve_key(name: &str) -> Result<u8, ResolveError> {
    let name = name.trim().to_ascii_lowercase();
    // Single digits are keycodes for the digit keys, so the table
    // lookup must win over decimal parsing.
    if let Some(code) = lookup(KEYS, &name) {
        return Ok(code);
    }
    name.parse::<u8>()
        .map_err(|_| ResolveError::UnknownKey(name))
}

/// Resolve a modifier name or decimal string to its bitmask.
pub fn resolve_modifier(name: &str) -> Result<u8, ResolveError> {
    let name = name.trim().to_ascii_lowercase();
    if let Some(bits) = lookup(MODIFIERS, &name) {
        return Ok(bits);
    }
    name.parse::<u8>()
        .map_err(|_| ResolveError::UnknownModifier(name))
}

/// Resolve an LED color name or decimal string to its 4-bit index.
pub fn resolve_color(name: &str) -> Result<u8, ResolveError> {
    let name = name.trim().to_ascii_lowercase();
    if let Some(index) = lookup(LED_COLORS, &name) {
        return Ok(index);
    }
    name.parse::<u8>()
        .map(|v| v & 0x0F)
        .map_err(|_| ResolveError::UnknownColor(name))
}

/// Resolve an LED effect name or decimal string to its 4-bit index.
pub fn resolve_effect(name: &str) -> Result<u8, ResolveError> {
    let name = name.trim().to_ascii_lowercase();
    if let Some(index) = lookup(LED_EFFECTS, &name) {
        return Ok(index);
    }
    name.parse::<u8>()
        .map(|v| v & 0x0F)
        .map_err(|_| ResolveError::UnknownEffect(name))
}

/// Wire id for a button name, if it names a physical control.
pub fn button_id(name: &str) -> Option<u8> {
    lookup(BUTTONS, name.trim().to_ascii_lowercase().as_str())
}

fn reverse(table: &[(&'static str, u8)], code: u8) -> Option<&'static str> {
    table
        .iter()
        .find(|&&(_, entry)| entry == code)
        .map(|&(name, _)| name)
}

/// Name of a keycode for display. Code 0 has no name (unbound).
pub fn key_name(code: u8) -> Option<&'static str> {
    if code == 0 {
        return None;
    }
    reverse(KEYS, code)
}

/// Name of a button id for display.
pub fn button_name(id: u8) -> Option<&'static str> {
    reverse(BUTTONS, id)
}

/// Name of an LED color index for display.
pub fn color_name(index: u8) -> Option<&'static str> {
    reverse(LED_COLORS, index)
}

/// Name of an LED effect index for display.
pub fn effect_name(index: u8) -> Option<&'static str> {
    reverse(LED_EFFECTS, index)
}

/// Button name for display, falling back to hex for dead slots.
pub fn button_label(id: u8) -> String {
    button_name(id)
        .map(str::to_string)
        .unwrap_or_else(|| format!("button 0x{id:02x}"))
}

/// `"ctrl+shift+"`-style prefix for a modifier mask.
pub fn modifier_prefix(mask: u8) -> String {
    let mut prefix = String::new();
    if mask & mods::CTRL != 0 {
        prefix.push_str("ctrl+");
    }
    if mask & mods::SHIFT != 0 {
        prefix.push_str("shift+");
    }
    if mask & mods::ALT != 0 {
        prefix.push_str("alt+");
    }
    if mask & mods::META != 0 {
        prefix.push_str("meta+");
    }
    prefix
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_resolution_is_case_insensitive() {
        assert_eq!(resolve_key("a").unwrap(), 0x04);
        assert_eq!(resolve_key("A").unwrap(), 0x04);
        assert_eq!(resolve_key(" Enter ").unwrap(), 0x28);
        assert_eq!(resolve_key("return").unwrap(), 0x28);
    }

    #[test]
    fn digit_names_resolve_to_digit_keys_not_codes() {
        // "1" is the digit-1 key (0x1E), not keycode 1
        assert_eq!(resolve_key("1").unwrap(), 0x1E);
        assert_eq!(resolve_key("0").unwrap(), 0x27);
        // Larger decimals fall through to raw codes
        assert_eq!(resolve_key("127").unwrap(), 0x7F);
    }

    #[test]
    fn unknown_key_error_lists_known_names() {
        let err = resolve_key("foobar").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("foobar"));
        assert!(msg.contains("known keys"));
        assert!(msg.contains("volume_up"));
    }

    #[test]
    fn modifier_aliases_share_bits() {
        for name in ["ctrl", "control", "lctrl"] {
            assert_eq!(resolve_modifier(name).unwrap(), mods::CTRL);
        }
        for name in ["meta", "win", "cmd", "gui"] {
            assert_eq!(resolve_modifier(name).unwrap(), mods::META);
        }
        assert_eq!(resolve_modifier("none").unwrap(), 0);
        assert_eq!(resolve_modifier("3").unwrap(), 0x03);
        assert!(resolve_modifier("hyper").is_err());
    }

    #[test]
    fn color_and_effect_decimals_are_masked() {
        assert_eq!(resolve_color("blue").unwrap(), 6);
        assert_eq!(resolve_color("18").unwrap(), 2);
        assert_eq!(resolve_effect("wave").unwrap(), 3);
        assert_eq!(resolve_effect("17").unwrap(), 1);
        assert!(resolve_color("magenta").is_err());
        assert!(resolve_effect("strobe").is_err());
    }

    #[test]
    fn button_table_is_bidirectional() {
        assert_eq!(button_id("key1"), Some(0x01));
        assert_eq!(button_id("KNOB1_LEFT"), Some(0x15));
        assert_eq!(button_id("knob1_right"), Some(0x13));
        assert_eq!(button_name(0x15), Some("knob1_left"));
        assert_eq!(button_id("led"), None);
        // Dead slots have no name
        assert_eq!(button_name(0x0D), None);
    }

    #[test]
    fn modifier_prefix_order_is_stable() {
        assert_eq!(modifier_prefix(0x03), "ctrl+shift+");
        assert_eq!(modifier_prefix(0x0C), "alt+meta+");
        assert_eq!(modifier_prefix(0), "");
    }

    #[test]
    fn key_name_hides_the_unbound_code() {
        assert_eq!(key_name(0x04), Some("a"));
        assert_eq!(key_name(0x00), None);
        assert_eq!(key_name(0xF0), None);
    }
}
