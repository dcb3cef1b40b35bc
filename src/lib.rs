// 12-key + 2-knob CH552 macro pad configurator - shared library
// Binding parsing, wire protocol, read-back decoding, programming

pub mod binding;
pub mod config;
pub mod keycodes;
pub mod programmer;
pub mod protocol;
pub mod readback;

pub use binding::{BindingSpec, Keystroke, KeystrokeBinding};
pub use config::{ButtonBinding, ConfigError, Configuration, LedSetting};
pub use programmer::{Mismatch, ProgramOptions, ProgramReport, Programmer};
pub use readback::ReadBinding;

/// USB identity of the pad. Only this model is supported.
pub const VENDOR_ID: u16 = 0x1189;
pub const PRODUCT_ID: u16 = 0x8840;
