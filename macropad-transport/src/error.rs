//! Transport error types

use thiserror::Error;

/// Errors that can occur during transport operations
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("device {vid:04x}:{pid:04x} not found (is the pad plugged in?)")]
    DeviceNotFound { vid: u16, pid: u16 },

    #[error("no interrupt {direction} endpoint found")]
    EndpointNotFound { direction: &'static str },

    #[error("this operation needs the interrupt IN endpoint, which the device did not expose")]
    InputUnavailable,

    #[error("USB access denied (run with sudo, or install a udev rule for the pad)")]
    AccessDenied,

    #[error("communication timeout")]
    Timeout,

    #[error("short write: sent {written} of {expected} bytes")]
    ShortWrite { written: usize, expected: usize },

    #[error("USB error: {0}")]
    Usb(rusb::Error),
}

impl From<rusb::Error> for TransportError {
    fn from(e: rusb::Error) -> Self {
        match e {
            rusb::Error::Access => TransportError::AccessDenied,
            rusb::Error::Timeout => TransportError::Timeout,
            other => TransportError::Usb(other),
        }
    }
}
