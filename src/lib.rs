//! Hand side classification and landmark distance queries for camera hand tracking.
//!
//! An external detector finds hands (21 landmarks each) and a body pose in every camera frame;
//! this crate consumes those results. Each detected hand is labeled as the subject's left or
//! right hand by comparing its wrist against the pose's wrist reference points, the most recent
//! landmark set per side is cached, and hosts can query point-to-point distances or export the
//! whole state between frames.
//!
//! # Coordinates
//!
//! Landmark X and Y are normalized image-plane coordinates (`0.0` to `1.0`, Y pointing down),
//! Z is depth relative to the wrist. The camera image is mirrored for selfie view before
//! detection, which the side assignment compensates for; see [`classifier::assign_side`].
//!
//! # Frame model
//!
//! Everything is single-threaded and tick-driven: the host calls
//! [`tracking::TrackingSession::advance`] once per rendered frame and issues queries in between.
//! Missing camera frames or detector output degrade to empty placeholders and sentinel values,
//! never to errors; see [`classifier::DISTANCE_UNAVAILABLE`].

use log::LevelFilter;

pub mod classifier;
pub mod hand;
pub mod image;
pub mod landmark;
pub mod pose;
pub mod timer;
pub mod tracking;

/// macro-use only, not part of public API.
#[doc(hidden)]
pub fn init_logger(calling_crate: &'static str) {
    let log_level = LevelFilter::Debug;
    env_logger::Builder::new()
        .filter(Some(calling_crate), log_level)
        .filter(Some(env!("CARGO_PKG_NAME")), log_level)
        .parse_default_env()
        .try_init()
        .ok();
}

/// Initializes logging to *stderr*.
///
/// The calling crate and this crate will log at *debug* level; `RUST_LOG` overrides apply on
/// top.
///
/// If a global logger is already registered, this macro will do nothing.
#[macro_export]
macro_rules! init_logger {
    () => {
        $crate::init_logger(env!("CARGO_CRATE_NAME"))
    };
}
