//! Fullscreen playback geometry and request assembly.
//!
//! Pure computation only: cover-fit scaling, effect naming, and the
//! translation of a path plus preferences into an [`EffectRequest`].
//! Everything that touches the host lives in the session layer.

use crate::host::{EffectRequest, MediaSize, SceneGeometry};
use crate::playback::registry::EFFECT_TAG;
use crate::storage::models::PlayOptions;

/// Per-play overrides on top of the stored [`PlayOptions`].
#[derive(Debug, Clone, Default)]
pub struct PlayOverrides {
    /// Skip the clear-before-play preference (replays and replaces
    /// must not cascade into a global clear).
    pub skip_clear: bool,
    /// Use this z instead of consulting the order counter.
    pub explicit_z: Option<i64>,
    /// Reuse an existing effect id instead of generating one.
    pub explicit_id: Option<String>,
    pub fade_in_override: Option<u64>,
    pub fade_out_override: Option<u64>,
    /// Suppress registry bookkeeping (used by replay, which rebuilds
    /// records itself).
    pub skip_register: bool,
}

impl PlayOverrides {
    /// Overrides for a replay pass: fixed z, reused id, no fades, no
    /// clear, no re-registration.
    #[must_use]
    pub fn replay(id: String, z: i64) -> Self {
        Self {
            skip_clear: true,
            explicit_z: Some(z),
            explicit_id: Some(id),
            fade_in_override: Some(0),
            fade_out_override: Some(0),
            skip_register: true,
        }
    }
}

/// Engine-facing effect name for an id.
#[must_use]
pub fn effect_name(id: &str) -> String {
    format!("{EFFECT_TAG}:{id}")
}

/// Scales media to cover the viewport while preserving aspect ratio.
///
/// The shorter-relative axis is pinned to the viewport and the other
/// is rounded up, so the scaled media always covers the full viewport
/// with at most a one-pixel overshoot. Returns `None` when either
/// dimension is unknown, in which case the engine plays the media at
/// its natural size.
#[must_use]
pub fn cover_fit(media: MediaSize, viewport_width: u32, viewport_height: u32) -> Option<MediaSize> {
    if media.is_zero() || viewport_width == 0 || viewport_height == 0 {
        return None;
    }
    let ar_media = f64::from(media.width) / f64::from(media.height);
    let ar_view = f64::from(viewport_width) / f64::from(viewport_height);

    let (width, height) = if ar_media < ar_view {
        // Media is relatively taller: pin width, overflow height.
        let h = (f64::from(viewport_width) / ar_media).ceil();
        (f64::from(viewport_width), h)
    } else {
        let w = (f64::from(viewport_height) * ar_media).ceil();
        (w, f64::from(viewport_height))
    };

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    Some(MediaSize {
        width: width as u32,
        height: height as u32,
    })
}

/// Assembles the engine request for one fullscreen play.
#[must_use]
pub fn build_request(
    path: &str,
    id: &str,
    z: i64,
    scene: SceneGeometry,
    natural: MediaSize,
    options: &PlayOptions,
    overrides: &PlayOverrides,
    volume: Option<f64>,
) -> EffectRequest {
    EffectRequest {
        path: path.to_string(),
        name: effect_name(id),
        z_index: z,
        fade_in_ms: overrides.fade_in_override.unwrap_or(options.fade_in),
        fade_out_ms: overrides.fade_out_override.unwrap_or(options.fade_out),
        size: cover_fit(natural, scene.viewport_width, scene.viewport_height),
        anchor: (0.5, 0.5),
        position: (scene.center_x, scene.center_y),
        volume,
        looping: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size(width: u32, height: u32) -> MediaSize {
        MediaSize { width, height }
    }

    #[test]
    fn wide_media_pins_height() {
        // 4000x1000 into 1920x1080: height pinned, width overflows.
        let fit = cover_fit(size(4000, 1000), 1920, 1080).unwrap();
        assert_eq!(fit.height, 1080);
        assert_eq!(fit.width, 4320);
    }

    #[test]
    fn tall_media_pins_width() {
        let fit = cover_fit(size(1000, 4000), 1920, 1080).unwrap();
        assert_eq!(fit.width, 1920);
        assert_eq!(fit.height, 7680);
    }

    #[test]
    fn odd_ratios_round_up_to_cover() {
        let fit = cover_fit(size(1279, 721), 1920, 1080).unwrap();
        assert!(fit.width >= 1920);
        assert!(fit.height >= 1080);
    }

    #[test]
    fn unknown_dimensions_mean_no_size() {
        assert_eq!(cover_fit(size(0, 0), 1920, 1080), None);
        assert_eq!(cover_fit(size(100, 0), 1920, 1080), None);
        assert_eq!(cover_fit(size(100, 100), 0, 1080), None);
    }

    #[test]
    fn replay_overrides_disable_fades_and_registration() {
        let o = PlayOverrides::replay("abc".into(), 10_005);
        assert!(o.skip_clear);
        assert!(o.skip_register);
        assert_eq!(o.fade_in_override, Some(0));
        assert_eq!(o.explicit_z, Some(10_005));

        let scene = SceneGeometry {
            center_x: 960.0,
            center_y: 540.0,
            viewport_width: 1920,
            viewport_height: 1080,
        };
        let req = build_request(
            "fx/orb.webm",
            "abc",
            10_005,
            scene,
            size(1920, 1080),
            &PlayOptions::default(),
            &o,
            Some(0.7),
        );
        assert_eq!(req.name, "media-orb:abc");
        assert_eq!(req.fade_in_ms, 0);
        assert_eq!(req.fade_out_ms, 0);
        assert_eq!(req.anchor, (0.5, 0.5));
        assert_eq!(req.position, (960.0, 540.0));
        assert_eq!(req.volume, Some(0.7));
        assert!(req.looping);
    }

    #[test]
    fn stored_fades_apply_without_overrides() {
        let scene = SceneGeometry {
            center_x: 0.0,
            center_y: 0.0,
            viewport_width: 100,
            viewport_height: 100,
        };
        let req = build_request(
            "maps/cave.png",
            "x",
            10_000,
            scene,
            size(0, 0),
            &PlayOptions::default(),
            &PlayOverrides::default(),
            None,
        );
        assert_eq!(req.fade_in_ms, 250);
        assert_eq!(req.fade_out_ms, 400);
        assert_eq!(req.size, None);
        assert_eq!(req.volume, None);
    }
}
