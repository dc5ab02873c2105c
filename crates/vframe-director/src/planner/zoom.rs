//! Zoom selection for focus targets.

use vframe_models::{FocusCandidate, FrameGeometry};

use crate::config::DirectorConfig;

/// Zoom that makes the target fill `target_fill` of the crop width.
///
/// Monotone in extent: small targets zoom in, large ones zoom out.
/// Point-like and synthetic targets have no size to frame and get the widest
/// crop. The result is clamped to the configured zoom range.
pub fn desired_zoom(
    candidate: &FocusCandidate,
    geometry: &FrameGeometry,
    config: &DirectorConfig,
) -> f64 {
    if candidate.synthetic || candidate.extent.is_point_like() {
        return config.min_zoom;
    }

    let (base_w, base_h) = geometry.base_crop_size();
    let crop_aspect = base_w / base_h;
    // Height expressed in crop-width units so tall targets are not cut off
    let span = candidate.extent.w.max(candidate.extent.h * crop_aspect);
    if span <= 0.0 || !span.is_finite() {
        return config.min_zoom;
    }

    config.clamp_zoom(base_w * config.target_fill / span)
}

#[cfg(test)]
mod tests {
    use super::*;
    use vframe_models::{AspectRatio, CandidateKind, Extent, Point};

    fn candidate(w: f64, h: f64) -> FocusCandidate {
        FocusCandidate::new(0.0, CandidateKind::Face, Point::new(960.0, 540.0), Extent::new(w, h), 0.9)
    }

    #[test]
    fn test_zoom_for_face() {
        let geometry = FrameGeometry::new(1920, 1080, AspectRatio::PORTRAIT);
        let config = DirectorConfig::default();

        // 607.5 * 0.45 / 200
        let zoom = desired_zoom(&candidate(200.0, 200.0), &geometry, &config);
        assert!((zoom - 1.366875).abs() < 1e-9);
    }

    #[test]
    fn test_zoom_is_monotone_and_clamped() {
        let geometry = FrameGeometry::new(1920, 1080, AspectRatio::PORTRAIT);
        let config = DirectorConfig::default();

        let tiny = desired_zoom(&candidate(10.0, 10.0), &geometry, &config);
        let small = desired_zoom(&candidate(150.0, 150.0), &geometry, &config);
        let large = desired_zoom(&candidate(800.0, 800.0), &geometry, &config);

        assert_eq!(tiny, config.max_zoom);
        assert!(small > large);
        assert_eq!(large, config.min_zoom);
    }

    #[test]
    fn test_point_like_and_fallback_use_min_zoom() {
        let geometry = FrameGeometry::new(1920, 1080, AspectRatio::PORTRAIT);
        let config = DirectorConfig::default();

        assert_eq!(desired_zoom(&candidate(0.0, 0.0), &geometry, &config), 1.0);
        let fallback = FocusCandidate::frame_center(0.0, 1920, 1080);
        assert_eq!(desired_zoom(&fallback, &geometry, &config), 1.0);
    }
}
