//! Traits implemented by frame sources and content detectors.

use vframe_models::{CandidateKind, FocusCandidate};

/// A decoded source frame handed to detectors.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Timestamp in seconds
    pub time: f64,
    pub width: u32,
    pub height: u32,
    /// Packed 8-bit RGB pixels, row-major
    pub pixels: Vec<u8>,
}

impl Frame {
    pub fn new(time: f64, width: u32, height: u32, pixels: Vec<u8>) -> Self {
        Self {
            time,
            width,
            height,
            pixels,
        }
    }

    /// Frame without pixel data, for detectors that work from metadata.
    pub fn blank(time: f64, width: u32, height: u32) -> Self {
        Self::new(time, width, height, Vec::new())
    }
}

/// Random-access frame provider, typically backed by a decoder.
///
/// Shared across the sampler's worker threads.
pub trait FrameSource: Sync {
    /// Frame nearest to `time`, or `None` if it cannot be produced.
    fn frame_at(&self, time: f64) -> Option<Frame>;
}

/// Content detector contract.
///
/// Implementations must be independently callable from several threads and
/// must not fail on frames where nothing is found.
#[cfg_attr(test, mockall::automock)]
pub trait ContentDetector: Send + Sync {
    /// Kind of candidate this detector reports, for logging.
    fn kind(&self) -> CandidateKind;

    /// Candidates found in `frame`, possibly none.
    fn detect(&self, frame: &Frame) -> Vec<FocusCandidate>;
}
