//! USB transport over raw interrupt endpoints.
//!
//! The pad's vendor protocol runs over the interrupt OUT endpoint of
//! its HID interface, with read-back responses arriving on the
//! interrupt IN endpoint. Reports are fixed 65-byte frames. The IN
//! endpoint is optional: without it programming still works, but
//! read-back does not.

use std::time::Duration;

use rusb::{ConfigDescriptor, Context, DeviceHandle, Direction, TransferType, UsbContext};
use tracing::debug;

use crate::capture::FrameCapture;
use crate::error::TransportError;
use crate::{Transport, REPORT_SIZE};

/// Timeout for interrupt OUT writes.
const SEND_TIMEOUT: Duration = Duration::from_secs(2);

/// One exclusively-owned duplex channel to the pad.
pub struct UsbTransport {
    handle: DeviceHandle<Context>,
    out_endpoint: u8,
    in_endpoint: Option<u8>,
    capture: Option<FrameCapture>,
}

/// Locate the first interrupt endpoint with the given direction.
/// Returns (interface number, endpoint address).
fn find_endpoint(config: &ConfigDescriptor, direction: Direction) -> Option<(u8, u8)> {
    for interface in config.interfaces() {
        for descriptor in interface.descriptors() {
            for endpoint in descriptor.endpoint_descriptors() {
                if endpoint.transfer_type() == TransferType::Interrupt
                    && endpoint.direction() == direction
                {
                    return Some((descriptor.interface_number(), endpoint.address()));
                }
            }
        }
    }
    None
}

impl UsbTransport {
    /// Open the pad by vendor/product id and claim its interrupt
    /// endpoints.
    pub fn open(vid: u16, pid: u16) -> Result<Self, TransportError> {
        let context = Context::new()?;
        let device = context
            .devices()?
            .iter()
            .find(|device| {
                device
                    .device_descriptor()
                    .map(|desc| desc.vendor_id() == vid && desc.product_id() == pid)
                    .unwrap_or(false)
            })
            .ok_or(TransportError::DeviceNotFound { vid, pid })?;

        let config = device.config_descriptor(0)?;

        let (out_interface, out_endpoint) = find_endpoint(&config, Direction::Out)
            .ok_or(TransportError::EndpointNotFound { direction: "OUT" })?;
        let in_pair = find_endpoint(&config, Direction::In);

        let mut handle = device.open()?;
        if handle.set_auto_detach_kernel_driver(true).is_err() {
            debug!("kernel driver auto-detach not supported on this platform");
        }
        if let Err(e) = handle.set_active_configuration(config.number()) {
            // Usually already active; the kernel HID driver can also
            // hold it until the interface claim detaches it.
            debug!("set_active_configuration failed ({e}), continuing");
        }
        handle.claim_interface(out_interface)?;
        if let Some((in_interface, _)) = in_pair {
            if in_interface != out_interface {
                handle.claim_interface(in_interface)?;
            }
        }

        let in_endpoint = in_pair.map(|(_, address)| address);
        debug!(
            "opened {vid:04x}:{pid:04x}, OUT endpoint 0x{out_endpoint:02x}, IN endpoint {}",
            in_endpoint.map_or("none".into(), |a| format!("0x{a:02x}"))
        );

        Ok(Self {
            handle,
            out_endpoint,
            in_endpoint,
            capture: None,
        })
    }

    /// Attach a frame capture sink; every sent frame is mirrored to it.
    pub fn with_capture(mut self, capture: FrameCapture) -> Self {
        self.capture = Some(capture);
        self
    }

    /// Address of the interrupt OUT endpoint.
    pub fn out_address(&self) -> u8 {
        self.out_endpoint
    }

    /// Address of the interrupt IN endpoint, if the device exposes one.
    pub fn in_address(&self) -> Option<u8> {
        self.in_endpoint
    }
}

impl Transport for UsbTransport {
    fn send(&mut self, report: &[u8; REPORT_SIZE]) -> Result<(), TransportError> {
        if let Some(capture) = self.capture.as_mut() {
            capture.record(report);
        }
        let written = self
            .handle
            .write_interrupt(self.out_endpoint, report, SEND_TIMEOUT)?;
        if written != REPORT_SIZE {
            return Err(TransportError::ShortWrite {
                written,
                expected: REPORT_SIZE,
            });
        }
        Ok(())
    }

    fn receive(&mut self, timeout: Duration) -> Result<Option<Vec<u8>>, TransportError> {
        let endpoint = self.in_endpoint.ok_or(TransportError::InputUnavailable)?;
        let mut buf = [0u8; REPORT_SIZE];
        match self.handle.read_interrupt(endpoint, &mut buf, timeout) {
            Ok(n) => Ok(Some(buf[..n].to_vec())),
            Err(rusb::Error::Timeout) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn has_input(&self) -> bool {
        self.in_endpoint.is_some()
    }
}
