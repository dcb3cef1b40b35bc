//! JSON configuration documents.
//!
//! A config maps layers 1-3 to button bindings and an optional LED
//! setting:
//!
//! ```json
//! {
//!   "layers": {
//!     "1": {
//!       "led": { "color": "blue", "effect": "wave" },
//!       "key1": "a",
//!       "key2": "ctrl+c",
//!       "key3": ["h", "e", "l", "l", "o"],
//!       "knob1_press": { "key": "space" }
//!     }
//!   }
//! }
//! ```
//!
//! Malformed items and out-of-range layers are reported and skipped;
//! the rest of the document still loads. Keys that name no button
//! (`_comment` and friends) are ignored.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde_json::{json, Value};
use thiserror::Error;
use tracing::warn;

use crate::binding::{BindingSpec, KeystrokeBinding, ParseBindingError};
use crate::keycodes;
use crate::protocol::{self, NUM_LAYERS};

/// LED setting for one layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedSetting {
    pub effect: u8,
    pub color: u8,
}

impl LedSetting {
    /// The packed byte that goes into the layer-config frame.
    pub fn config_byte(self) -> u8 {
        protocol::led_byte(self.effect, self.color)
    }

    /// `"wave blue"`-style description for run output.
    pub fn describe(self) -> String {
        format!(
            "{} {}",
            keycodes::effect_name(self.effect)
                .map_or_else(|| self.effect.to_string(), str::to_string),
            keycodes::color_name(self.color)
                .map_or_else(|| self.color.to_string(), str::to_string),
        )
    }
}

/// One button's binding within a layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonBinding {
    pub button: u8,
    pub binding: KeystrokeBinding,
}

/// The full logical configuration, built once per run and consumed by
/// the programmer.
#[derive(Debug, Clone, Default)]
pub struct Configuration {
    /// Layer → one entry per bound button.
    pub bindings: BTreeMap<u8, Vec<ButtonBinding>>,
    /// Layer → LED override.
    pub leds: BTreeMap<u8, LedSetting>,
}

impl Configuration {
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Total bindings across all layers.
    pub fn binding_count(&self) -> usize {
        self.bindings.values().map(Vec::len).sum()
    }
}

/// Document-level failures. Per-item problems are warned and skipped
/// instead.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Load a configuration from a JSON file.
pub fn load(path: &Path) -> Result<Configuration, ConfigError> {
    parse(&fs::read_to_string(path)?)
}

/// Parse a configuration from JSON text.
pub fn parse(text: &str) -> Result<Configuration, ConfigError> {
    let document: Value = serde_json::from_str(text)?;
    let mut config = Configuration::default();

    let Some(layers) = document.get("layers").and_then(Value::as_object) else {
        return Ok(config);
    };

    for (layer_key, layer_value) in layers {
        let layer = match layer_key.parse::<u8>() {
            Ok(layer) if (1..=NUM_LAYERS).contains(&layer) => layer,
            _ => {
                warn!("ignoring layer {layer_key:?} (must be 1-{NUM_LAYERS})");
                continue;
            }
        };
        let Some(entries) = layer_value.as_object() else {
            warn!("ignoring layer {layer}: expected an object of button bindings");
            continue;
        };

        if let Some(led_value) = entries.get("led") {
            match parse_led(led_value) {
                Ok(led) => {
                    config.leds.insert(layer, led);
                }
                Err(e) => warn!("layer {layer} led: {e}; skipping"),
            }
        }

        let mut bindings = Vec::new();
        for (name, value) in entries {
            let Some(button) = keycodes::button_id(name) else {
                continue;
            };
            match BindingSpec::from_value(value).and_then(|spec| spec.resolve()) {
                Ok(keystrokes) => bindings.push(ButtonBinding {
                    button,
                    binding: keystrokes,
                }),
                Err(e) => warn!("layer {layer} {name}: {e}; skipping"),
            }
        }
        config.bindings.insert(layer, bindings);
    }

    Ok(config)
}

/// Parse a layer's LED spec: a color-name shorthand (effect defaults
/// to static) or a `{color, effect}` object.
fn parse_led(value: &Value) -> Result<LedSetting, ParseBindingError> {
    match value {
        Value::String(color) => Ok(LedSetting {
            effect: 1,
            color: keycodes::resolve_color(color)?,
        }),
        Value::Object(map) => {
            let color = map
                .get("color")
                .map_or(Some("red".to_string()), scalar)
                .ok_or_else(|| ParseBindingError::InvalidShape(value.to_string()))?;
            let effect = map
                .get("effect")
                .map_or(Some("static".to_string()), scalar)
                .ok_or_else(|| ParseBindingError::InvalidShape(value.to_string()))?;
            Ok(LedSetting {
                effect: keycodes::resolve_effect(&effect)?,
                color: keycodes::resolve_color(&color)?,
            })
        }
        other => Err(ParseBindingError::InvalidShape(other.to_string())),
    }
}

/// String form of a scalar LED field; integers resolve through the
/// decimal-string path (color and effect indices are 4-bit either
/// way).
fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// The starter configuration written by `generate-config`.
pub fn default_config() -> Value {
    let layer = |led: Value, keys: [&str; 12]| {
        json!({
            "led": led,
            "key1": keys[0], "key2": keys[1], "key3": keys[2],
            "key4": keys[3], "key5": keys[4], "key6": keys[5],
            "key7": keys[6], "key8": keys[7], "key9": keys[8],
            "key10": keys[9], "key11": keys[10], "key12": keys[11],
            "knob1_left": "pagedown", "knob1_press": "space", "knob1_right": "pageup",
            "knob2_left": "left", "knob2_press": "enter", "knob2_right": "right"
        })
    };

    json!({
        "_comment": "Buttons: key1-key12, knob1/knob2 _left/_press/_right. Bindings: \"a\", \"ctrl+c\", {\"key\":\"c\",\"mod\":\"ctrl\"}, or a list for macros. led: color name or {color, effect}.",
        "layers": {
            "1": layer(
                json!({"color": "red", "effect": "static"}),
                ["a", "b", "c", "d", "e", "f", "g", "h", "i", "j", "k", "l"]
            ),
            "2": layer(
                json!({"color": "blue", "effect": "static"}),
                ["f1", "f2", "f3", "f4", "f5", "f6", "f7", "f8", "f9", "f10", "f11", "f12"]
            ),
            "3": layer(
                json!({"color": "green", "effect": "static"}),
                ["f13", "f14", "f15", "f16", "f17", "f18", "f19", "f20", "f21", "f22", "f23", "f24"]
            )
        }
    })
}

/// Write the starter configuration to a file, pretty-printed.
pub fn generate(path: &Path) -> Result<(), ConfigError> {
    let text = serde_json::to_string_pretty(&default_config())?;
    fs::write(path, text + "\n")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::Keystroke;

    #[test]
    fn parses_bindings_and_led() {
        let config = parse(
            r#"{
                "layers": {
                    "1": {
                        "led": {"color": "blue", "effect": "wave"},
                        "key1": "a",
                        "key2": "ctrl+c",
                        "knob1_press": ["h", "i"]
                    }
                }
            }"#,
        )
        .unwrap();

        assert_eq!(config.leds[&1], LedSetting { effect: 3, color: 6 });
        let bindings = &config.bindings[&1];
        assert_eq!(bindings.len(), 3);
        assert_eq!(config.binding_count(), 3);

        let key2 = bindings.iter().find(|b| b.button == 0x02).unwrap();
        assert_eq!(
            key2.binding.keystrokes(),
            &[Keystroke {
                modifiers: 0x01,
                key: 0x06
            }]
        );
        let knob = bindings.iter().find(|b| b.button == 0x14).unwrap();
        assert!(knob.binding.is_macro());
    }

    #[test]
    fn led_shorthand_is_static_color() {
        let config = parse(r#"{"layers": {"2": {"led": "cyan"}}}"#).unwrap();
        assert_eq!(config.leds[&2], LedSetting { effect: 1, color: 5 });
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let config = parse(
            r#"{"layers": {"1": {"_comment": "hi", "led": "red", "keyboard": "a", "key1": "b"}}}"#,
        )
        .unwrap();
        assert_eq!(config.bindings[&1].len(), 1);
    }

    #[test]
    fn out_of_range_layers_are_skipped() {
        let config =
            parse(r#"{"layers": {"0": {"key1": "a"}, "4": {"key1": "a"}, "2": {"key1": "a"}}}"#)
                .unwrap();
        assert_eq!(config.bindings.keys().copied().collect::<Vec<_>>(), vec![2]);
    }

    #[test]
    fn malformed_items_are_skipped_not_fatal() {
        let config = parse(
            r#"{"layers": {"1": {"key1": "notakey", "key2": true, "key3": "b", "led": "nocolor"}}}"#,
        )
        .unwrap();
        assert_eq!(config.bindings[&1].len(), 1);
        assert!(config.leds.is_empty());
    }

    #[test]
    fn empty_document_is_empty_config() {
        assert!(parse("{}").unwrap().is_empty());
        assert!(parse(r#"{"layers": {}}"#).unwrap().is_empty());
    }

    #[test]
    fn invalid_json_is_a_document_error() {
        assert!(matches!(parse("{"), Err(ConfigError::Json(_))));
    }

    #[test]
    fn default_config_round_trips() {
        let text = serde_json::to_string(&default_config()).unwrap();
        let config = parse(&text).unwrap();
        assert_eq!(config.bindings.len(), 3);
        assert_eq!(config.leds.len(), 3);
        for bindings in config.bindings.values() {
            assert_eq!(bindings.len(), 18);
        }
    }

    #[test]
    fn generate_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("macropad.json");
        generate(&path).unwrap();
        let config = load(&path).unwrap();
        assert_eq!(config.binding_count(), 54);
    }
}
