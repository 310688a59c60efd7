//! Fullscreen playback: stacking policy, now-playing bookkeeping, and
//! request assembly.

pub mod driver;
pub mod registry;

pub use driver::{build_request, cover_fit, effect_name, PlayOverrides};
pub use registry::{
    order_mode, set_order_mode, ActiveEffectRecord, NowPlayingRegistry, OrderMode, EFFECT_TAG,
    Z_BASE, Z_RANGE,
};
