//! Frame capture sink for protocol debugging.
//!
//! Records every sent report as one lowercase hex line in an
//! append-mode file, matching the format expected by the capture
//! comparison tooling. The sink is passed explicitly into the
//! transport; there is no ambient capture state.

use std::fmt::Write as _;
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::warn;

/// Hex-per-line capture file for sent frames.
#[derive(Debug)]
pub struct FrameCapture {
    file: File,
    path: PathBuf,
}

impl FrameCapture {
    /// Create (truncating) the capture file. Frames are appended to it
    /// for the rest of the run.
    pub fn create(path: &Path) -> io::Result<Self> {
        Ok(Self {
            file: File::create(path)?,
            path: path.to_path_buf(),
        })
    }

    /// Path the capture is being written to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Record one frame. Capture is diagnostic only, so write failures
    /// are logged rather than failing the transfer.
    pub fn record(&mut self, frame: &[u8]) {
        let mut line = String::with_capacity(frame.len() * 2 + 1);
        for byte in frame {
            let _ = write!(line, "{byte:02x}");
        }
        line.push('\n');
        if let Err(e) = self.file.write_all(line.as_bytes()) {
            warn!("frame capture write to {} failed: {e}", self.path.display());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_one_hex_line_per_frame() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frames.hex");

        let mut capture = FrameCapture::create(&path).unwrap();
        capture.record(&[0x03, 0xFD, 0xFE, 0xFF]);
        capture.record(&[0x00, 0x10, 0xAB]);
        drop(capture);

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "03fdfeff\n0010ab\n");
    }

    #[test]
    fn create_truncates_previous_capture() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frames.hex");
        std::fs::write(&path, "stale\n").unwrap();

        let capture = FrameCapture::create(&path).unwrap();
        drop(capture);

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
    }
}
