//! USB transport layer for CH552 macro pad communication
//!
//! This crate moves fixed 65-byte vendor reports between the
//! configurator and the pad's interrupt endpoints. It owns device
//! open/claim, endpoint discovery, the optional frame capture sink,
//! and nothing of the protocol itself: frame contents are built and
//! decoded by the caller.

pub mod capture;
pub mod error;
pub mod usb;

pub use capture::FrameCapture;
pub use error::TransportError;
pub use usb::UsbTransport;

use std::time::Duration;

/// Fixed report size: 1 report-id byte + 64 data bytes.
pub const REPORT_SIZE: usize = 65;

/// The transport boundary used by the programming engine.
///
/// One duplex channel (interrupt OUT + optional interrupt IN) owned
/// exclusively by a single run. Use is strictly sequential: callers
/// never overlap transfers, and pacing between writes is their
/// responsibility.
pub trait Transport {
    /// Send one 65-byte report on the OUT endpoint.
    fn send(&mut self, report: &[u8; REPORT_SIZE]) -> Result<(), TransportError>;

    /// Read one report from the IN endpoint.
    ///
    /// Returns `Ok(None)` when the read times out; the caller decides
    /// whether that is a normal short read or a missing mandatory
    /// response.
    fn receive(&mut self, timeout: Duration) -> Result<Option<Vec<u8>>, TransportError>;

    /// Whether an interrupt IN endpoint is available for read-back.
    fn has_input(&self) -> bool;
}
