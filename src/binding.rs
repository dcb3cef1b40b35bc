//! Logical key bindings and the spec shapes that describe them.
//!
//! A config document describes a button's binding in one of four
//! shapes, classified into [`BindingSpec`] before any name resolution
//! happens:
//!
//! ```text
//! "a"                          — Single, bare key
//! "ctrl+shift+a"               — Single, compound (mods OR-combined)
//! {"key": "c", "mod": "ctrl"}  — Pair
//! ["h", "e", "l", "l", "o"]    — Macro (ordered, plays back in order)
//! ```
//!
//! Resolution turns a spec into a [`KeystrokeBinding`], the ordered
//! `(modifier mask, keycode)` sequence that goes on the wire.

use std::fmt;

use serde_json::Value;

use crate::keycodes::{self, ResolveError};

/// One emitted keystroke: HID modifier mask + keycode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Keystroke {
    pub modifiers: u8,
    pub key: u8,
}

impl Keystroke {
    /// The keystroke the device stores for an unbound button.
    pub const UNBOUND: Keystroke = Keystroke {
        modifiers: 0,
        key: 0,
    };

    pub fn is_unbound(self) -> bool {
        self == Self::UNBOUND
    }
}

impl fmt::Display for Keystroke {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", keycodes::modifier_prefix(self.modifiers))?;
        match keycodes::key_name(self.key) {
            Some(name) => write!(f, "{name}"),
            None => write!(f, "0x{:02x}", self.key),
        }
    }
}

/// Ordered keystroke sequence bound to one button. Never empty: an
/// empty sequence normalizes to the single unbound entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeystrokeBinding {
    keystrokes: Vec<Keystroke>,
}

impl KeystrokeBinding {
    pub fn new(mut keystrokes: Vec<Keystroke>) -> Self {
        if keystrokes.is_empty() {
            keystrokes.push(Keystroke::UNBOUND);
        }
        Self { keystrokes }
    }

    pub fn keystrokes(&self) -> &[Keystroke] {
        &self.keystrokes
    }

    /// Unbound bindings generate no write during programming.
    pub fn is_unbound(&self) -> bool {
        self.keystrokes.len() == 1 && self.keystrokes[0].is_unbound()
    }

    /// More than one keystroke; played back as a sequence.
    pub fn is_macro(&self) -> bool {
        self.keystrokes.len() > 1
    }
}

impl fmt::Display for KeystrokeBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unbound() {
            return write!(f, "(unbound)");
        }
        if self.keystrokes.len() == 1 {
            return write!(f, "{}", self.keystrokes[0]);
        }
        write!(f, "[")?;
        for (i, keystroke) in self.keystrokes.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{keystroke}")?;
        }
        write!(f, "]")
    }
}

/// Error type for classifying and resolving binding specs.
#[derive(Debug, Clone)]
pub enum ParseBindingError {
    Resolve(ResolveError),
    /// JSON value of a shape no spec form accepts.
    InvalidShape(String),
    /// Lists cannot nest inside a macro.
    NestedMacro,
}

impl fmt::Display for ParseBindingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Resolve(e) => write!(f, "{e}"),
            Self::InvalidShape(s) => write!(f, "invalid binding {s}"),
            Self::NestedMacro => write!(f, "macro entries must be keys, not nested lists"),
        }
    }
}

impl std::error::Error for ParseBindingError {}

impl From<ResolveError> for ParseBindingError {
    fn from(e: ResolveError) -> Self {
        Self::Resolve(e)
    }
}

/// A binding spec as classified from the config document, before name
/// resolution. One resolver per shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindingSpec {
    /// Bare key name or compound `"mod+mod+key"` string.
    Single(String),
    /// Structured `{key, mod}` pair.
    Pair { key: PairField, modifier: PairField },
    /// Ordered list of single-keystroke specs.
    Macro(Vec<BindingSpec>),
}

/// One field of the pair shape. A JSON string is a name (or decimal
/// string) resolved through the tables; a JSON integer is a raw code
/// taken as-is, so `{"key": 6}` is keycode 0x06 while `{"key": "6"}`
/// is the digit-6 key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PairField {
    Name(String),
    Code(u8),
}

fn pair_field(value: &Value) -> Result<PairField, ParseBindingError> {
    match value {
        Value::String(s) => Ok(PairField::Name(s.clone())),
        Value::Number(n) => n
            .as_u64()
            .and_then(|n| u8::try_from(n).ok())
            .map(PairField::Code)
            .ok_or_else(|| ParseBindingError::InvalidShape(value.to_string())),
        _ => Err(ParseBindingError::InvalidShape(value.to_string())),
    }
}

impl BindingSpec {
    /// Classify a JSON value into a spec shape.
    pub fn from_value(value: &Value) -> Result<Self, ParseBindingError> {
        match value {
            Value::String(s) => Ok(Self::Single(s.clone())),
            Value::Object(map) => {
                let key = match map.get("key") {
                    Some(v) => pair_field(v)?,
                    None => PairField::Name("none".to_string()),
                };
                let modifier = match map.get("mod").or_else(|| map.get("modifier")) {
                    Some(v) => pair_field(v)?,
                    None => PairField::Name("none".to_string()),
                };
                Ok(Self::Pair { key, modifier })
            }
            Value::Array(items) => {
                let entries = items
                    .iter()
                    .map(|item| match Self::from_value(item)? {
                        Self::Macro(_) => Err(ParseBindingError::NestedMacro),
                        entry => Ok(entry),
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Self::Macro(entries))
            }
            other => Err(ParseBindingError::InvalidShape(other.to_string())),
        }
    }

    /// Resolve names to codes, producing the wire-order keystrokes.
    pub fn resolve(&self) -> Result<KeystrokeBinding, ParseBindingError> {
        match self {
            Self::Single(spec) => Ok(KeystrokeBinding::new(vec![resolve_single(spec)?])),
            Self::Pair { key, modifier } => Ok(KeystrokeBinding::new(vec![Keystroke {
                modifiers: match modifier {
                    PairField::Name(name) => keycodes::resolve_modifier(name)?,
                    PairField::Code(code) => *code,
                },
                key: match key {
                    PairField::Name(name) => keycodes::resolve_key(name)?,
                    PairField::Code(code) => *code,
                },
            }])),
            Self::Macro(entries) => {
                let mut keystrokes = Vec::with_capacity(entries.len());
                for entry in entries {
                    keystrokes.extend_from_slice(entry.resolve()?.keystrokes());
                }
                Ok(KeystrokeBinding::new(keystrokes))
            }
        }
    }
}

/// Resolve a bare key or `"mod+mod+key"` compound. Every token before
/// the last is a modifier; order of modifiers is irrelevant.
fn resolve_single(spec: &str) -> Result<Keystroke, ParseBindingError> {
    let spec = spec.trim();
    if !spec.contains('+') {
        return Ok(Keystroke {
            modifiers: 0,
            key: keycodes::resolve_key(spec)?,
        });
    }

    let parts: Vec<&str> = spec.split('+').collect();
    let mut modifiers = 0u8;
    for part in &parts[..parts.len() - 1] {
        // Compound modifier tokens are names only; raw masks go
        // through the pair shape.
        let part = part.trim().to_ascii_lowercase();
        let known = keycodes::MODIFIERS
            .iter()
            .find(|&&(name, _)| name == part)
            .map(|&(_, bits)| bits);
        modifiers |= known.ok_or(ResolveError::UnknownModifier(part))?;
    }
    let key = keycodes::resolve_key(parts[parts.len() - 1])?;
    Ok(Keystroke { modifiers, key })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn resolve(value: Value) -> Result<KeystrokeBinding, ParseBindingError> {
        BindingSpec::from_value(&value)?.resolve()
    }

    #[test]
    fn bare_key() {
        let binding = resolve(json!("a")).unwrap();
        assert_eq!(
            binding.keystrokes(),
            &[Keystroke {
                modifiers: 0,
                key: 0x04
            }]
        );
        assert!(!binding.is_macro());
        assert!(!binding.is_unbound());
    }

    #[test]
    fn compound_combines_modifiers() {
        let binding = resolve(json!("ctrl+shift+a")).unwrap();
        assert_eq!(
            binding.keystrokes(),
            &[Keystroke {
                modifiers: 0x03,
                key: 0x04
            }]
        );
    }

    #[test]
    fn compound_modifier_order_is_irrelevant() {
        assert_eq!(
            resolve(json!("shift+ctrl+a")).unwrap(),
            resolve(json!("ctrl+shift+a")).unwrap()
        );
    }

    #[test]
    fn pair_shape_accepts_names_and_integers() {
        let binding = resolve(json!({"key": "c", "mod": "ctrl"})).unwrap();
        assert_eq!(
            binding.keystrokes(),
            &[Keystroke {
                modifiers: 0x01,
                key: 0x06
            }]
        );

        // Integers are raw codes, not digit-key names
        let binding = resolve(json!({"key": 6, "mod": 3})).unwrap();
        assert_eq!(
            binding.keystrokes(),
            &[Keystroke {
                modifiers: 0x03,
                key: 0x06
            }]
        );
    }

    #[test]
    fn integer_key_is_raw_but_digit_string_is_the_digit_key() {
        let raw = resolve(json!({"key": 6})).unwrap();
        assert_eq!(raw.keystrokes()[0].key, 0x06);

        let digit = resolve(json!({"key": "6"})).unwrap();
        assert_eq!(digit.keystrokes()[0].key, 0x23);
    }

    #[test]
    fn non_byte_integers_are_rejected() {
        assert!(matches!(
            resolve(json!({"key": 300})),
            Err(ParseBindingError::InvalidShape(_))
        ));
        assert!(matches!(
            resolve(json!({"key": 6.5})),
            Err(ParseBindingError::InvalidShape(_))
        ));
        assert!(matches!(
            resolve(json!({"key": -1})),
            Err(ParseBindingError::InvalidShape(_))
        ));
    }

    #[test]
    fn pair_defaults_to_unbound() {
        let binding = resolve(json!({})).unwrap();
        assert!(binding.is_unbound());
    }

    #[test]
    fn macro_preserves_order() {
        let binding = resolve(json!(["h", "e", "l", "l", "o"])).unwrap();
        let keys: Vec<u8> = binding.keystrokes().iter().map(|k| k.key).collect();
        assert_eq!(keys, vec![0x0B, 0x08, 0x0F, 0x0F, 0x12]);
        assert!(binding.is_macro());
    }

    #[test]
    fn macro_entries_may_mix_shapes() {
        let binding = resolve(json!(["ctrl+c", {"key": "v", "mod": "ctrl"}, "enter"])).unwrap();
        assert_eq!(
            binding.keystrokes(),
            &[
                Keystroke {
                    modifiers: 0x01,
                    key: 0x06
                },
                Keystroke {
                    modifiers: 0x01,
                    key: 0x19
                },
                Keystroke {
                    modifiers: 0,
                    key: 0x28
                },
            ]
        );
    }

    #[test]
    fn nested_list_is_rejected() {
        assert!(matches!(
            resolve(json!([["a"]])),
            Err(ParseBindingError::NestedMacro)
        ));
    }

    #[test]
    fn unknown_names_surface_resolve_errors() {
        assert!(resolve(json!("hyper+a")).is_err());
        assert!(resolve(json!("ctrl+flurp")).is_err());
        assert!(resolve(json!({"key": "flurp"})).is_err());
    }

    #[test]
    fn non_spec_shapes_are_rejected() {
        assert!(matches!(
            resolve(json!(true)),
            Err(ParseBindingError::InvalidShape(_))
        ));
        assert!(matches!(
            resolve(json!({"key": {"nested": 1}})),
            Err(ParseBindingError::InvalidShape(_))
        ));
    }

    #[test]
    fn none_binding_is_unbound() {
        let binding = resolve(json!("none")).unwrap();
        assert!(binding.is_unbound());
    }

    #[test]
    fn empty_sequence_normalizes_to_unbound() {
        let binding = KeystrokeBinding::new(Vec::new());
        assert_eq!(binding.keystrokes(), &[Keystroke::UNBOUND]);
        assert!(binding.is_unbound());
    }

    #[test]
    fn display_forms() {
        assert_eq!(resolve(json!("ctrl+shift+a")).unwrap().to_string(), "ctrl+shift+a");
        assert_eq!(resolve(json!(["h", "i"])).unwrap().to_string(), "[h, i]");
        assert_eq!(resolve(json!("none")).unwrap().to_string(), "(unbound)");
        let raw = KeystrokeBinding::new(vec![Keystroke {
            modifiers: 0,
            key: 0xF0,
        }]);
        assert_eq!(raw.to_string(), "0xf0");
    }
}
