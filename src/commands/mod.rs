//! Command handlers for the CLI application.
//!
//! - `program`: write a full configuration to the pad
//! - `read`: dump the pad's current bindings
//! - `led`: LED-only programming for all layers
//! - `generate`: starter config file generation

pub mod generate;
pub mod led;
pub mod program;
pub mod read;

use std::path::Path;

use macropad_driver::{PRODUCT_ID, VENDOR_ID};
use macropad_transport::{FrameCapture, UsbTransport};

/// Result type for command handlers
pub type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Open the pad, attaching a frame capture sink when requested.
pub fn open_transport(dump: Option<&Path>) -> Result<UsbTransport, Box<dyn std::error::Error>> {
    let transport = UsbTransport::open(VENDOR_ID, PRODUCT_ID)?;
    println!("  device found: {VENDOR_ID:04x}:{PRODUCT_ID:04x}");
    println!("  OUT endpoint: 0x{:02x}", transport.out_address());
    match transport.in_address() {
        Some(address) => println!("  IN endpoint:  0x{address:02x}"),
        None => println!("  IN endpoint:  none (read-back unavailable)"),
    }

    match dump {
        Some(path) => {
            let capture = FrameCapture::create(path)?;
            println!("  dumping sent frames to {}", path.display());
            Ok(transport.with_capture(capture))
        }
        None => Ok(transport),
    }
}
