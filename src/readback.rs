//! Decoding of the pad's read-back responses.
//!
//! Response frames mirror the button-write layout: button id at
//! byte 2, keystroke count at byte 10, `(modifier, key)` pairs from
//! byte 11. The device answers one frame per button slot; a timeout
//! before all 24 slots have answered is a normal short read.

use std::collections::BTreeMap;
use std::time::Duration;

use macropad_transport::{Transport, TransportError};
use tracing::debug;

use crate::binding::Keystroke;
use crate::protocol::{self, BUTTONS_PER_LAYER};

/// Shortest response that carries a decodable binding.
const MIN_RESPONSE_LEN: usize = 13;

/// Per-read timeout while draining responses.
const READ_TIMEOUT: Duration = Duration::from_secs(1);

/// One decoded read-back entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadBinding {
    /// Count byte as reported by the device.
    pub count: u8,
    /// Decoded pairs; may be shorter than `count` if the frame was
    /// truncated.
    pub keystrokes: Vec<Keystroke>,
}

impl ReadBinding {
    /// How the device reports an unbound button: count 0, or a single
    /// (0,0) pair.
    pub fn is_unbound(&self) -> bool {
        self.count == 0
            || (self.count == 1 && self.keystrokes.first().is_some_and(|k| k.is_unbound()))
    }
}

/// Decode one response frame. Frames shorter than 13 bytes carry no
/// binding and are discarded.
pub fn decode_response(data: &[u8]) -> Option<(u8, ReadBinding)> {
    if data.len() < MIN_RESPONSE_LEN {
        return None;
    }
    let button = data[2];
    let count = data[10];
    let mut keystrokes = Vec::with_capacity(count as usize);
    for i in 0..count as usize {
        let offset = 11 + i * 2;
        if offset + 1 >= data.len() {
            break;
        }
        keystrokes.push(Keystroke {
            modifiers: data[offset],
            key: data[offset + 1],
        });
    }
    Some((button, ReadBinding { count, keystrokes }))
}

/// Read all button bindings for one layer.
///
/// Sends the read-back request, then drains up to 24 responses with a
/// bounded per-read timeout. Stops early on timeout and returns what
/// was collected.
pub fn read_layer(
    transport: &mut dyn Transport,
    layer: u8,
) -> Result<BTreeMap<u8, ReadBinding>, TransportError> {
    transport.send(&protocol::readback_request(layer))?;

    let mut bindings = BTreeMap::new();
    for _ in 0..BUTTONS_PER_LAYER {
        let Some(data) = transport.receive(READ_TIMEOUT)? else {
            break;
        };
        match decode_response(&data) {
            Some((button, binding)) => {
                bindings.insert(button, binding);
            }
            None => debug!(
                "discarding short read-back response ({} bytes)",
                data.len()
            ),
        }
    }

    debug!("layer {layer}: {} read-back entries", bindings.len());
    Ok(bindings)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(button: u8, count: u8, pairs: &[(u8, u8)]) -> Vec<u8> {
        let mut data = vec![0x03, 0xFA, button, 0x01, 0x01, 0, 0, 0, 0, 0, count];
        for &(modifiers, key) in pairs {
            data.push(modifiers);
            data.push(key);
        }
        data.resize(65, 0);
        data
    }

    #[test]
    fn short_response_is_discarded() {
        assert_eq!(decode_response(&[0x03, 0xFA, 0x01]), None);
        assert_eq!(decode_response(&[0u8; 12]), None);
    }

    #[test]
    fn minimum_length_response_decodes() {
        let mut data = response(0x02, 1, &[(0x01, 0x06)]);
        data.truncate(13);
        let (button, binding) = decode_response(&data).unwrap();
        assert_eq!(button, 0x02);
        assert_eq!(
            binding.keystrokes,
            vec![Keystroke {
                modifiers: 0x01,
                key: 0x06
            }]
        );
    }

    #[test]
    fn macro_response_keeps_order() {
        let pairs = [(0, 0x0B), (0, 0x08), (0, 0x0F)];
        let (_, binding) = decode_response(&response(0x05, 3, &pairs)).unwrap();
        assert_eq!(binding.count, 3);
        let keys: Vec<u8> = binding.keystrokes.iter().map(|k| k.key).collect();
        assert_eq!(keys, vec![0x0B, 0x08, 0x0F]);
    }

    #[test]
    fn truncated_pairs_stop_cleanly() {
        // Count claims 5 keystrokes but the frame ends after 2
        let mut data = response(0x01, 5, &[(0, 0x04), (0, 0x05)]);
        data.truncate(15);
        let (_, binding) = decode_response(&data).unwrap();
        assert_eq!(binding.count, 5);
        assert_eq!(binding.keystrokes.len(), 2);
    }

    #[test]
    fn unbound_classification() {
        let (_, zero_count) = decode_response(&response(0x01, 0, &[])).unwrap();
        assert!(zero_count.is_unbound());

        let (_, zero_pair) = decode_response(&response(0x01, 1, &[(0, 0)])).unwrap();
        assert!(zero_pair.is_unbound());

        let (_, bound) = decode_response(&response(0x01, 1, &[(0, 0x04)])).unwrap();
        assert!(!bound.is_unbound());
    }
}
