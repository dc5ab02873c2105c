//! Content detection interface.
//!
//! Detectors are caller-owned, stateless handles: given one frame they
//! report the points of interest they found, and "nothing found" is an empty
//! list rather than an error. The sampler runs them sparsely over the clip
//! and buffers the results for in-order replay into the decision engine.

pub mod provider;
pub mod sampler;

pub use provider::{ContentDetector, Frame, FrameSource};
pub use sampler::DetectionSampler;
